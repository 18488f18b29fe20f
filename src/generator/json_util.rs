/// Utilities for pulling a JSON payload out of raw model output.
///
/// Even with a JSON response mime type requested, models occasionally wrap
/// the payload in markdown fences, prepend prose, or emit smart quotes and
/// trailing commas. Plan responses are top-level arrays and explanation
/// metadata is an object, so the scanner accepts either delimiter.

/// Check if raw output appears to be truncated mid-payload
pub fn is_truncated(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }

    if let Some(last_char) = trimmed.chars().rev().find(|c| !c.is_whitespace()) {
        if matches!(last_char, '{' | '[' | ':' | '"' | ',') {
            return true;
        }
    }

    // Brace/bracket balance, string-aware
    let mut brace_count = 0i32;
    let mut bracket_count = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in trimmed.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => brace_count += 1,
            '}' if !in_string => brace_count -= 1,
            '[' if !in_string => bracket_count += 1,
            ']' if !in_string => bracket_count -= 1,
            _ => {}
        }
    }

    brace_count != 0 || bracket_count != 0 || in_string
}

/// Strip markdown fences and normalize quote characters the model is prone
/// to substituting inside what should be plain JSON
pub fn sanitize_raw_output(raw: &str) -> String {
    let mut sanitized = raw.replace("```json", "");
    sanitized = sanitized.replace("```", "");

    sanitized = sanitized.replace('\u{201C}', "\""); // Left double quotation mark
    sanitized = sanitized.replace('\u{201D}', "\""); // Right double quotation mark
    sanitized = sanitized.replace('\u{2018}', "'"); // Left single quotation mark
    sanitized = sanitized.replace('\u{2019}', "'"); // Right single quotation mark

    remove_trailing_commas(&sanitized)
}

/// Remove trailing commas before `}` or `]`, string-aware
pub fn remove_trailing_commas(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let chars: Vec<char> = json.chars().collect();
    let mut in_string = false;
    let mut escape_next = false;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];

        if escape_next {
            escape_next = false;
            result.push(ch);
            i += 1;
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape_next = true;
                result.push(ch);
            }
            '"' => {
                in_string = !in_string;
                result.push(ch);
            }
            ',' if !in_string => {
                // Look ahead past whitespace for a closing delimiter
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    // Drop the comma
                } else {
                    result.push(ch);
                }
            }
            _ => result.push(ch),
        }
        i += 1;
    }

    result
}

/// Extract the first balanced top-level JSON object or array from the raw
/// output. Returns None when no complete payload is present.
pub fn extract_json(raw: &str) -> Option<String> {
    let sanitized = sanitize_raw_output(raw);
    let chars: Vec<char> = sanitized.chars().collect();

    let start = chars.iter().position(|&c| c == '{' || c == '[')?;
    let open = chars[start];
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &ch) in chars.iter().enumerate().skip(start) {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(chars[start..=i].iter().collect());
                }
            }
            _ => {}
        }
    }

    None
}
