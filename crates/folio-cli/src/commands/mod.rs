//! Command implementations.

pub mod annotate;
pub mod rank;
pub mod ranges;
pub mod renumber;
pub mod repair;
pub mod rewrite;
pub mod split;

pub use self::annotate::execute_annotate;
pub use self::rank::execute_rank;
pub use self::ranges::execute_ranges;
pub use self::renumber::execute_renumber;
pub use self::repair::execute_repair;
pub use self::rewrite::execute_rewrite;
pub use self::split::execute_split;
