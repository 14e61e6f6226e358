//! Pulls a JSON value out of an LLM's free-form text response: first a
//! fenced ```json code block, then the first balanced `{...}` substring,
//! then a last-resort raw parse of the whole string.

use serde::de::DeserializeOwned;
use studio_core::StudioError;

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json").map(|i| i + "```json".len()).or_else(|| text.find("```").map(|i| i + 3))?;
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
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
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extracts and deserializes a JSON object of type `T` from `text`,
/// trying a fenced code block, then a balanced brace scan, then a raw
/// parse of the entire string.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, StudioError> {
    if let Some(block) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str(block) {
            return Ok(value);
        }
    }
    if let Some(obj) = first_balanced_object(text) {
        if let Ok(value) = serde_json::from_str(obj) {
            return Ok(value);
        }
    }
    serde_json::from_str(text.trim())
        .map_err(|e| StudioError::InvalidAgentResponse(format!("could not extract JSON from agent response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn extracts_from_fenced_code_block() {
        let text = "Here's my answer:\n```json\n{\"x\": 1, \"y\": 2}\n```\nHope that helps!";
        let point: Point = extract_json(text).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn extracts_first_balanced_object_amid_prose() {
        let text = "Sure, the result is {\"x\": 3, \"y\": 4} as requested.";
        let point: Point = extract_json(text).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }

    #[test]
    fn extracts_nested_braces_correctly() {
        let text = "{\"x\": 1, \"y\": 2, \"meta\": {\"note\": \"contains {braces}\"}}";
        let point: Point = extract_json(text).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn raw_parse_when_no_wrapping() {
        let point: Point = extract_json("{\"x\": 5, \"y\": 6}").unwrap();
        assert_eq!(point, Point { x: 5, y: 6 });
    }

    #[test]
    fn errors_when_nothing_parses() {
        let result: Result<Point, _> = extract_json("no json here at all");
        assert!(matches!(result, Err(StudioError::InvalidAgentResponse(_))));
    }
}
