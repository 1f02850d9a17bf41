//! JSON extraction and repair for model output.
//!
//! Models wrap JSON in code fences, prefix it with prose, or emit slightly
//! invalid JSON (trailing commas, unescaped quotes, raw newlines in strings).
//! `parse_json_response` tries the plausible candidate spans in order and
//! applies one textual repair pass before giving up.

use serde_json::Value;
use tracing::debug;

use super::LlmError;

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Finds the first fenced code block anywhere in `text` and returns its body.
pub fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip an info string such as `json` when it sits alone on the fence line.
    let body_start = match after_open.find('\n') {
        Some(nl) if after_open[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => nl + 1,
        _ => 0,
    };
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Returns the outermost balanced `{...}` or `[...]` span, ignoring brackets
/// inside string literals. `None` when no span closes.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(ch) {
                    return None;
                }
                if stack.is_empty() {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from..].iter().copied().find(|c| !c.is_whitespace())
}

/// Best-effort textual repair: drops trailing commas before `}`/`]`, escapes
/// quotes that cannot terminate a string, and escapes raw control characters
/// inside strings. Already-valid JSON comes back unchanged.
pub fn repair_json(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(ch);
                continue;
            }
            match ch {
                '\\' => {
                    escaped = true;
                    out.push(ch);
                }
                '"' => match next_significant(&chars, i + 1) {
                    None | Some(',') | Some('}') | Some(']') | Some(':') => {
                        in_string = false;
                        out.push(ch);
                    }
                    Some(_) => out.push_str("\\\""),
                },
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(ch),
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' if matches!(next_significant(&chars, i + 1), None | Some('}') | Some(']')) => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Parses a JSON value out of model text.
///
/// Candidates, in order: fenced block body, the fence-stripped text, the
/// outermost balanced span. Each is tried verbatim first, then repaired.
pub fn parse_json_response(text: &str) -> Result<Value, LlmError> {
    let trimmed = text.trim();
    let mut candidates: Vec<&str> = Vec::with_capacity(3);
    for candidate in [
        fenced_block(trimmed),
        Some(strip_json_fences(trimmed)),
        extract_json_span(trimmed),
    ]
    .into_iter()
    .flatten()
    {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    let mut last_error = String::from("no JSON content found");
    for candidate in &candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = e.to_string(),
        }
    }

    for candidate in &candidates {
        let repaired = repair_json(candidate);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            debug!(
                original_len = candidate.len(),
                repaired_len = repaired.len(),
                "JSON parsed after repair"
            );
            return Ok(value);
        }
    }

    Err(LlmError::Parse(last_error))
}

/// Parses tool-call arguments: strict first, then a single repair pass.
pub fn parse_tool_arguments(arguments: &str) -> Result<Value, LlmError> {
    match serde_json::from_str::<Value>(arguments) {
        Ok(value) => Ok(value),
        Err(strict_err) => {
            let repaired = repair_json(arguments);
            serde_json::from_str::<Value>(&repaired).map_err(|_| {
                LlmError::Parse(format!("failed to parse tool call arguments: {strict_err}"))
            })
        }
    }
}

/// Heuristic truncation check used to decide whether a continuation is worth
/// requesting: dangling `,`/`:`, an unterminated string, or unclosed
/// braces/brackets.
pub fn is_content_incomplete(text: &str) -> bool {
    let trimmed = text.trim_end();
    if trimmed.ends_with(',') || trimmed.ends_with(':') {
        return true;
    }

    let mut braces = 0i64;
    let mut brackets = 0i64;
    let mut in_string = false;
    let mut escaped = false;

    for ch in trimmed.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
    }

    in_string || braces > 0 || brackets > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_fenced_block_inside_prose() {
        let input = "Here is the result:\n```json\n{\"a\": 1}\n```\nHope this helps!";
        assert_eq!(fenced_block(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_span_ignores_braces_in_strings() {
        let input = r#"Sure! {"text": "use {curly} and ] here", "n": [1, 2]} trailing"#;
        assert_eq!(
            extract_json_span(input),
            Some(r#"{"text": "use {curly} and ] here", "n": [1, 2]}"#)
        );
    }

    #[test]
    fn test_extract_span_none_when_unclosed() {
        assert_eq!(extract_json_span(r#"{"a": [1, 2"#), None);
    }

    #[test]
    fn test_parse_embedded_in_prose() {
        let value = parse_json_response("The analysis: {\"score\": 80} -- done").unwrap();
        assert_eq!(value, json!({"score": 80}));
    }

    #[test]
    fn test_trailing_comma_repaired() {
        let dirty = r#"{"skills": ["rust", "sql",], "score": 7,}"#;
        let clean = r#"{"skills": ["rust", "sql"], "score": 7}"#;
        assert_eq!(
            parse_json_response(dirty).unwrap(),
            parse_json_response(clean).unwrap()
        );
    }

    #[test]
    fn test_repair_is_identity_on_clean_json() {
        let clean = r#"{"a": "b, c", "list": [1, 2, {"x": "y"}], "q": "say \"hi\""}"#;
        assert_eq!(repair_json(clean), clean);
        assert_eq!(repair_json(&repair_json(clean)), clean);
    }

    #[test]
    fn test_repair_escapes_stray_quotes() {
        let dirty = r#"{"summary": "Led the "Phoenix" migration", "n": 1}"#;
        let value = parse_json_response(dirty).unwrap();
        assert_eq!(value["summary"], "Led the \"Phoenix\" migration");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_repair_escapes_raw_newlines() {
        let dirty = "{\"markdown\": \"# Jane\nEngineer\"}";
        let value = parse_json_response(dirty).unwrap();
        assert_eq!(value["markdown"], "# Jane\nEngineer");
    }

    #[test]
    fn test_unparseable_text_is_error() {
        let err = parse_json_response("no json here at all").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_tool_arguments_round_trip() {
        let original = json!({"summary": "x", "keyRequirements": ["a", "b"], "nested": {"k": 1.5}});
        let parsed = parse_tool_arguments(&serde_json::to_string(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_tool_arguments_repaired() {
        let parsed = parse_tool_arguments(r#"{"score": 55,}"#).unwrap();
        assert_eq!(parsed, json!({"score": 55}));
    }

    #[test]
    fn test_tool_arguments_garbage_fails() {
        assert!(parse_tool_arguments("{\"score\": ").is_err());
    }

    #[test]
    fn test_incomplete_detection() {
        assert!(is_content_incomplete(r#"{"a": 1, "b": [1, 2"#));
        assert!(is_content_incomplete(r#"{"a": 1,"#));
        assert!(is_content_incomplete(r#"{"a":"#));
        assert!(is_content_incomplete(r#"{"a": "unterminated"#));
        assert!(!is_content_incomplete(r#"{"a": 1, "b": [1, 2]}"#));
        assert!(!is_content_incomplete(r#"{"a": "brace { inside"}"#));
        assert!(!is_content_incomplete("plain prose answer."));
    }
}
