//! Rendering of Gemini error bodies as readable diagnostics text.

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

fn extract_error_status(value: &serde_json::Value) -> Option<&str> {
    value
        .pointer("/error/status")
        .and_then(|v| v.as_str())
        .filter(|status| !status.is_empty())
}

/// Turn an HTTP status and raw response body into one diagnostics message.
///
/// JSON bodies are summarized from `error.message` (with the `error.status`
/// code when present) and pretty-printed below the summary line.
pub fn format_api_error(status: reqwest::StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    let headline = format!("API request failed with status {status}");

    if trimmed.is_empty() {
        return headline;
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            let summary = extract_error_summary(&json_value).filter(|s| !s.is_empty());
            return match (summary, extract_error_status(&json_value)) {
                (Some(summary), Some(code)) => {
                    format!("{headline}: {summary} ({code})\n{pretty_json}")
                }
                (Some(summary), None) => format!("{headline}: {summary}\n{pretty_json}"),
                (None, _) => format!("{headline}\n{pretty_json}"),
            };
        }
    }

    format!("{headline}\n{trimmed}")
}
