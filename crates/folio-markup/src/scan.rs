//! Line-level scanning helpers shared by the detectors and parsers

/// A line of text with its byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineSpan<'a> {
    /// Offset of the first byte of the line
    pub start: usize,
    /// Offset just past the line terminator (or end of text)
    pub end: usize,
    /// Line content without its terminator
    pub text: &'a str,
}

/// Iterate the lines of `text` with their offsets
pub(crate) fn line_spans(text: &str) -> impl Iterator<Item = LineSpan<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        LineSpan {
            start,
            end: offset,
            text: raw.trim_end_matches(['\n', '\r']),
        }
    })
}

/// The fence style of a line that opens or closes a fenced code block
///
/// A fence is three or more backticks or tildes after optional indentation.
/// Nesting is not modelled: callers close an open fence on the next fence
/// line of the same style.
pub(crate) fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let style = trimmed.chars().next()?;
    if style != '`' && style != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|&c| c == style).count();
    (run >= 3).then_some(style)
}

/// Where a frontmatter block ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frontmatter {
    /// No frontmatter opener on the first line
    Absent,
    /// Closed block ending at the given offset (closing line included)
    Closed(usize),
    /// Opener without a closing delimiter
    Unterminated,
}

/// Locate a frontmatter block at the very start of `text`
pub(crate) fn frontmatter(text: &str) -> Frontmatter {
    let mut lines = line_spans(text);
    match lines.next() {
        Some(first) if first.text.trim_end() == "---" => {}
        _ => return Frontmatter::Absent,
    }
    for line in lines {
        let delimiter = line.text.trim_end();
        if delimiter == "---" || delimiter == "..." {
            return Frontmatter::Closed(line.end);
        }
    }
    Frontmatter::Unterminated
}

/// Offset of the end of the line containing `pos` (the `\n` itself, or end of text)
pub(crate) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}
