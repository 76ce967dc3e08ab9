//! Parse generation output into a grounded write result
//!
//! The generator is untrusted. Its reply may be wrapped in a Markdown fence,
//! surrounded by prose, or missing fields; none of that is an error. Claim
//! entries are parsed one at a time and bad ones are skipped, and a reply
//! with no usable JSON object falls back to the raw text as content.

use folio_domain::{ClaimMapEntry, GroundedWriteResult};
use serde_json::{Map, Value};
use tracing::warn;

/// Parse a generation reply for section `section_id`
///
/// Never fails: when the reply has no JSON object with a string `content`,
/// the whole raw reply becomes the content and both claim lists are empty.
pub fn parse_generation_response(section_id: &str, response: &str) -> GroundedWriteResult {
    match parse_strict(section_id, response) {
        Ok(result) => result,
        Err(reason) => {
            warn!(section = section_id, %reason, "Unparseable generation response; using raw text");
            GroundedWriteResult {
                section_id: section_id.to_string(),
                content: response.to_string(),
                claim_map: Vec::new(),
                unsourceable_claims: Vec::new(),
            }
        }
    }
}

fn parse_strict(section_id: &str, response: &str) -> Result<GroundedWriteResult, String> {
    let json = extract_json(response)?;
    let obj = json
        .as_object()
        .ok_or_else(|| "Expected JSON object".to_string())?;

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| "Missing or invalid 'content'".to_string())?
        .to_string();

    let claim_map = match field(obj, "claimMap", "claim_map") {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| match parse_claim_entry(entry) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping claim map entry {}: {}", idx, e);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("Ignoring claim map that is not an array");
            Vec::new()
        }
    };

    let unsourceable_claims = match field(obj, "unsourceableClaims", "unsourceable_claims") {
        Some(Value::Array(claims)) => claims
            .iter()
            .filter_map(|claim| match claim.as_str() {
                Some(text) => Some(text.to_string()),
                None => {
                    warn!("Skipping unsourceable claim that is not a string");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(GroundedWriteResult {
        section_id: section_id.to_string(),
        content,
        claim_map,
        unsourceable_claims,
    })
}

/// Look a key up under its camelCase name, then its snake_case name
fn field<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel).or_else(|| obj.get(snake))
}

/// The first JSON object in a reply
///
/// A Markdown fence is stripped first. Each `{` is then tried in turn and
/// only one value is read from it, so prose after the object is ignored
/// even when it contains braces.
fn extract_json(response: &str) -> Result<Value, String> {
    let mut text = response.trim();
    if text.starts_with("```") {
        // Skip the opening fence line (```json or ```) and a closing fence
        text = text.split_once('\n').map_or("", |(_, rest)| rest);
        text = text.trim_end();
        text = text.strip_suffix("```").unwrap_or(text);
    }
    let mut last_error = "No JSON object found".to_string();
    for (start, _) in text.match_indices('{') {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) if value.is_object() => return Ok(value),
            Some(Ok(_)) | None => {}
            Some(Err(e)) => last_error = format!("JSON parse error: {}", e),
        }
    }
    Err(last_error)
}

/// Parse one claim-map entry
fn parse_claim_entry(json: &Value) -> Result<ClaimMapEntry, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Entry is not a JSON object".to_string())?;

    let claim = obj
        .get("claim")
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| "Missing or invalid 'claim'".to_string())?
        .to_string();

    let fact_id = field(obj, "factId", "fact_id")
        .and_then(Value::as_str)
        .ok_or_else(|| "Missing or invalid 'factId'".to_string())?
        .to_string();

    let source_url = field(obj, "sourceUrl", "source_url")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let quote = obj
        .get("quote")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    Ok(ClaimMapEntry {
        claim,
        fact_id,
        source_url,
        quote,
    })
}
