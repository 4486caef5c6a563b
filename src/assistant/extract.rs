/// Assistant response extraction
///
/// The LLM is asked to reply with markdown prose plus a complete workflow
/// JSON object, but it does not always comply. Three progressively looser
/// strategies recover a flow document and a human-readable message from
/// free-form text; when none matches, the caller's current document is
/// kept and the whole text becomes the message.

use crate::flow::{normalizer, Flow};
use serde_json::Value;
use std::fmt;

/// Fixed confirmation used when the reply was pure JSON with no prose
const PURE_JSON_MESSAGE: &str = "I've updated your workflow as requested.";

/// A recovered flow plus the explanatory prose around it
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The extracted (and normalized) document, or the caller's current
    /// one when the text carried no structured data
    pub flow: Flow,
    /// Human-readable explanation with any JSON payload removed
    pub message: String,
}

/// A matched delimiter or heuristic whose capture was not valid JSON
///
/// Distinct from "no structured data found": that is a soft fallback,
/// this is a hard error carrying the raw text for manual inspection.
#[derive(Debug)]
pub struct ExtractError {
    /// The unmodified assistant text
    pub raw: String,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse workflow JSON from response")
    }
}

impl std::error::Error for ExtractError {}

/// Extract a flow document and message from assistant text
///
/// Tiers, first success wins:
/// 1. the entire text parses as JSON
/// 2. a fenced ```json code block
/// 3. the first balanced JSON object containing "name", "nodes" and
///    "connections" in textual order
/// 4. no structured data: keep `current`, text becomes the message
///
/// A tier whose delimiter matches but whose capture fails to parse is a
/// hard error; it never falls through to a looser tier.
pub fn extract(raw_text: &str, current: &Flow) -> Result<Extraction, ExtractError> {
    // Tier 1: pure JSON reply.
    if let Ok(value) = serde_json::from_str::<Value>(raw_text.trim()) {
        return Ok(Extraction {
            flow: normalizer::normalize(&value),
            message: PURE_JSON_MESSAGE.to_string(),
        });
    }

    // Tier 2: fenced ```json block. The first block is the document; the
    // message drops every fence, not just the parsed one.
    if let Some(block) = find_fenced_json(raw_text) {
        let value: Value = serde_json::from_str(block.interior.trim()).map_err(|_| ExtractError {
            raw: raw_text.to_string(),
        })?;
        return Ok(Extraction {
            flow: normalizer::normalize(&value),
            message: prose_without_fences(raw_text),
        });
    }

    // Tier 3: bare JSON object heuristic.
    if let Some((start, end)) = find_flow_object(raw_text) {
        let value: Value =
            serde_json::from_str(&raw_text[start..end]).map_err(|_| ExtractError {
                raw: raw_text.to_string(),
            })?;
        let message = join_prose(&raw_text[..start], &raw_text[end..], " ");
        return Ok(Extraction {
            flow: normalizer::normalize(&value),
            message,
        });
    }

    // Tier 4: conversation only, document unchanged.
    Ok(Extraction {
        flow: current.clone(),
        message: raw_text.to_string(),
    })
}

struct FencedBlock<'a> {
    start: usize,
    end: usize,
    interior: &'a str,
}

/// Prose with every ```json fence removed and the remnants rejoined
fn prose_without_fences(text: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let mut rest = text;
    while let Some(block) = find_fenced_json(rest) {
        segments.push(&rest[..block.start]);
        rest = &rest[block.end..];
    }
    segments.push(rest);

    let segments: Vec<&str> = segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    segments.join("\n")
}

/// Locate the first ```json ... ``` fence
fn find_fenced_json(text: &str) -> Option<FencedBlock<'_>> {
    let open = text.find("```json")?;
    let interior_start = open + "```json".len();
    let close_rel = text[interior_start..].find("```")?;
    let interior_end = interior_start + close_rel;
    Some(FencedBlock {
        start: open,
        end: interior_end + "```".len(),
        interior: &text[interior_start..interior_end],
    })
}

/// Scan for the first balanced `{...}` containing the three flow keys in order
///
/// Tracks brace depth and string/escape state instead of pattern matching,
/// so nested objects and braces inside string literals do not break it.
fn find_flow_object(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find('{') {
        let start = search_from + rel;
        if let Some(end) = balanced_object_end(bytes, start) {
            let candidate = &text[start..end];
            if has_keys_in_order(candidate, &["\"name\"", "\"nodes\"", "\"connections\""]) {
                return Some((start, end));
            }
        }
        search_from = start + 1;
    }
    None
}

/// Exclusive end index of the object starting at `start`, if balanced
fn balanced_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_keys_in_order(text: &str, keys: &[&str]) -> bool {
    let mut from = 0;
    for key in keys {
        match text[from..].find(key) {
            Some(pos) => from += pos + key.len(),
            None => return false,
        }
    }
    true
}

/// Join the prose around an extracted payload, dropping empty halves
fn join_prose(before: &str, after: &str, separator: &str) -> String {
    let before = before.trim();
    let after = after.trim();
    match (before.is_empty(), after.is_empty()) {
        (true, true) => String::new(),
        (false, true) => before.to_string(),
        (true, false) => after.to_string(),
        (false, false) => format!("{before}{separator}{after}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::catalog::starter_flow;

    fn current() -> Flow {
        starter_flow("Current")
    }

    #[test]
    fn pure_json_wins_with_fixed_message() {
        let text = r#"{"name":"F","nodes":[],"connections":{}}"#;
        let result = extract(text, &current()).unwrap();
        assert_eq!(result.flow.name, "F");
        assert_eq!(result.message, PURE_JSON_MESSAGE);
    }

    #[test]
    fn fenced_block_is_removed_from_the_message() {
        let text = "Here you go:\n```json\n{\"name\":\"F\",\"nodes\":[],\"connections\":{}}\n```\nLet me know!";
        let result = extract(text, &current()).unwrap();
        assert_eq!(result.flow.name, "F");
        assert!(result.flow.nodes.is_empty());
        assert_eq!(result.message, "Here you go:\nLet me know!");
    }

    #[test]
    fn every_fence_is_stripped_from_the_message() {
        // Assistants sometimes show a before/after pair; the first block
        // is the document and neither block may leak into the prose.
        let text = "Before:\n```json\n{\"name\":\"F\",\"nodes\":[],\"connections\":{}}\n```\nAfter:\n```json\n{\"name\":\"G\",\"nodes\":[],\"connections\":{}}\n```\nDone.";
        let result = extract(text, &current()).unwrap();
        assert_eq!(result.flow.name, "F");
        assert_eq!(result.message, "Before:\nAfter:\nDone.");
        assert!(!result.message.contains("```"));
    }

    #[test]
    fn bare_object_heuristic_keeps_surrounding_prose() {
        let text = "I built this: {\"name\":\"F\",\"nodes\":[{\"name\":\"A\"}],\"connections\":{}} and it should work.";
        let result = extract(text, &current()).unwrap();
        assert_eq!(result.flow.name, "F");
        assert_eq!(result.flow.nodes[0].name, "A");
        assert_eq!(result.message, "I built this: and it should work.");
    }

    #[test]
    fn nested_braces_do_not_break_the_scanner() {
        let text = "Done. {\"name\":\"F\",\"nodes\":[{\"name\":\"A\",\"parameters\":{\"code\":\"if (x) { y(); }\"}}],\"connections\":{}}";
        let result = extract(text, &current()).unwrap();
        assert_eq!(result.flow.nodes[0].name, "A");
    }

    #[test]
    fn plain_conversation_keeps_the_current_flow() {
        let before = current();
        let text = "I don't understand, can you clarify?";
        let result = extract(text, &before).unwrap();
        assert_eq!(result.flow, before);
        assert_eq!(result.message, text);
    }

    #[test]
    fn malformed_fenced_block_is_a_hard_error() {
        let text = "Sure!\n```json\n{\"name\": oops\n```";
        let err = extract(text, &current()).unwrap_err();
        assert_eq!(err.raw, text);
    }

    #[test]
    fn extracted_flow_is_normalized() {
        let text = "```json\n{\"name\":\"F\",\"nodes\":[{}],\"connections\":{}}\n```";
        let result = extract(text, &current()).unwrap();
        let node = &result.flow.nodes[0];
        assert!(!node.id.is_empty());
        assert_eq!(node.name, "Node 1");
        assert_eq!(node.type_version, 1);
    }
}
