use crate::error::ProviderError;
use serde::Deserialize;
use serde_json::Value;

/// Pull the JSON object out of raw provider output.
pub fn parse_output(raw: &str) -> Result<Value, ProviderError> {
    // Claude wraps result in {"result": "...", "is_error": ...} JSON
    #[derive(Deserialize)]
    struct ClaudeOutput {
        result: String,
        #[serde(default)]
        is_error: bool,
    }

    if let Ok(claude_out) = serde_json::from_str::<ClaudeOutput>(raw.trim()) {
        if claude_out.is_error {
            return Err(ProviderError::Rejected(claude_out.result));
        }
        if let Some(value) = extract_json(&claude_out.result) {
            return Ok(value);
        }
    }

    extract_json(raw).ok_or_else(|| {
        let preview: String = raw.chars().take(200).collect();
        ProviderError::Malformed(format!("no JSON object found in output: {}", preview))
    })
}

/// Extract a JSON object from a string that might contain markdown code blocks
fn extract_json(s: &str) -> Option<Value> {
    // First try: the whole string is a JSON object
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Some(value);
        }
    }

    // Second try: extract from markdown code block
    let re = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    for cap in re.captures_iter(s) {
        let potential_json = cap.get(1)?.as_str().trim();
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(potential_json) {
            return Some(value);
        }
    }

    // Third try: first balanced object, ignoring braces inside strings
    let brace_start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[brace_start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &s[brace_start..brace_start + i + 1];
                    return serde_json::from_str::<Value>(candidate).ok();
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_direct_json() {
        let value = parse_output(r#"{"tone": "friendly"}"#).unwrap();
        assert_eq!(value, json!({"tone": "friendly"}));
    }

    #[test]
    fn test_parse_claude_wrapped() {
        let raw = r#"{"type": "result", "is_error": false, "result": "{\"priority\": \"high\"}", "session_id": "abc"}"#;
        let value = parse_output(raw).unwrap();
        assert_eq!(value, json!({"priority": "high"}));
    }

    #[test]
    fn test_parse_claude_error_envelope() {
        let raw = r#"{"type": "result", "is_error": true, "result": "rate limited"}"#;
        let err = parse_output(raw).unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(ref r) if r == "rate limited"));
    }

    #[test]
    fn test_parse_markdown_wrapped() {
        let md = r#"
Here is the assessment:

```json
{"overall_health": "good", "savings_rate": 0.1}
```
"#;
        let value = parse_output(md).unwrap();
        assert_eq!(value["overall_health"], "good");
    }

    #[test]
    fn test_parse_embedded_object_with_braces_in_strings() {
        let raw = r#"Sure! {"body": "Use code {SAVE10} today", "n": 1} Hope that helps."#;
        let value = parse_output(raw).unwrap();
        assert_eq!(value["body"], "Use code {SAVE10} today");
    }

    #[test]
    fn test_parse_no_json() {
        let err = parse_output("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
