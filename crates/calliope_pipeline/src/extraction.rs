//! Extracting structured data from model responses.
//!
//! Even with a JSON response mime type requested, model output can
//! arrive wrapped in markdown fences or mixed with prose. Extraction
//! here is forgiving; validation is not — anything that survives
//! extraction must parse into the expected shape or the stage fails.

use calliope_error::{CalliopeResult, ContractError, ContractErrorKind};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tries, in order: ```json code blocks, balanced brackets, balanced
/// braces (whichever opens first).
///
/// # Errors
///
/// Returns a contract violation if no JSON candidate is found.
///
/// # Examples
///
/// ```
/// use calliope_pipeline::extract_json;
///
/// let response = "Here you go:\n```json\n[{\"day\": 1}]\n```";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(response: &str) -> CalliopeResult<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    // Prefer whichever structure opens first
    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let candidates: [(char, char); 2] = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('[', ']')],
        _ => [('{', '}'), ('[', ']')],
    };

    for (open, close) in candidates {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in model response"
    );

    Err(ContractError::new(ContractErrorKind::NoJson {
        response_length: response.len(),
    })
    .into())
}

/// Extract content from a markdown code block, preferring ```json.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response
        .find("```json")
        .map(|s| s + "```json".len())
        .or_else(|| {
            response.find("```").map(|s| {
                let after = s + 3;
                // Skip a possible language specifier line
                response[after..]
                    .find('\n')
                    .map(|n| after + n + 1)
                    .unwrap_or(after)
            })
        })?;

    match response[start..].find("```") {
        Some(end) => Some(response[start..start + end].trim().to_string()),
        // No closing fence, likely a truncated response
        None => Some(response[start..].trim().to_string()),
    }
}

/// Extract content between balanced delimiters, respecting strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse extracted JSON into the expected shape.
///
/// # Errors
///
/// Returns a contract violation when the JSON does not match `T`.
pub fn parse_json<T>(json_str: &str) -> CalliopeResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(100).collect();
        tracing::error!(error = %e, json_preview = %preview, "Model output failed shape validation");
        ContractError::new(ContractErrorKind::ShapeMismatch {
            message: e.to_string(),
        })
        .into()
    })
}
