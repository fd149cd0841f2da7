//! Best-effort parsing of model output into a [`TriviaResponse`].
//!
//! 1. Locate the first balanced top-level `{...}` span (string-aware).
//! 2. Require a `data` array of exactly five entries.
//! 3. Repair each question: keep only the first answer, unescape stray `\"` / `\'`.
//! 4. Check each repaired question's shape.

use serde_json::{Map, Value};

use crate::error::TriviaError;
use crate::types::{QUESTION_COUNT, TriviaQuestion, TriviaResponse};

/// Returns the first balanced `{...}` span of `raw`, ignoring braces inside JSON strings.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&raw[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses, validates and repairs raw model output.
///
/// # Errors
/// - [`TriviaError::JsonNotFound`] when no balanced object exists
/// - [`TriviaError::Json`] when the span is not valid JSON
/// - [`TriviaError::GenerationSchema`] when `data` is missing/not an array, or a
///   question is malformed after repair
/// - [`TriviaError::GenerationCount`] when `data` does not hold five entries
pub fn parse_trivia(raw: &str) -> Result<TriviaResponse, TriviaError> {
    let span = extract_json_object(raw).ok_or(TriviaError::JsonNotFound)?;
    let value: Value = serde_json::from_str(span)?;

    let data = value
        .as_object()
        .and_then(|obj| get_ci(obj, "data"))
        .and_then(Value::as_array)
        .ok_or_else(|| TriviaError::GenerationSchema("missing `data` array".into()))?;

    if data.len() != QUESTION_COUNT {
        return Err(TriviaError::GenerationCount(data.len()));
    }

    let questions = data
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut q = read_question(item)
                .map_err(|e| TriviaError::GenerationSchema(format!("question {}: {e}", i + 1)))?;
            repair(&mut q);
            q.validate()
                .map_err(|e| TriviaError::GenerationSchema(format!("question {}: {e}", i + 1)))?;
            Ok(q)
        })
        .collect::<Result<Vec<_>, TriviaError>>()?;

    Ok(TriviaResponse { data: questions })
}

/// Keeps the first answer only and unescapes quote sequences in all texts.
pub fn repair(q: &mut TriviaQuestion) {
    q.answer.truncate(1);
    q.question = unescape_quotes(&q.question);
    for text in q.options.iter_mut().chain(q.answer.iter_mut()) {
        *text = unescape_quotes(text);
    }
}

/// Replaces literal `\"` with `"` and `\'` with `'`, then trims.
pub fn unescape_quotes(s: &str) -> String {
    s.replace("\\\"", "\"").replace("\\'", "'").trim().to_string()
}

fn read_question(item: &Value) -> Result<TriviaQuestion, String> {
    let obj = item.as_object().ok_or("not an object")?;

    let question = get_ci(obj, "question")
        .and_then(Value::as_str)
        .ok_or("missing `question`")?
        .to_string();

    let options = get_ci(obj, "options")
        .and_then(Value::as_array)
        .ok_or("missing `options` array")?
        .iter()
        .map(scalar_text)
        .collect::<Option<Vec<_>>>()
        .ok_or("non-scalar option")?;

    let answer = match get_ci(obj, "answer") {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .collect::<Option<Vec<_>>>()
            .ok_or("non-scalar answer")?,
        Some(v) => vec![scalar_text(v).ok_or("non-scalar answer")?],
        None => return Err("missing `answer`".into()),
    };

    Ok(TriviaQuestion {
        question,
        options,
        answer,
    })
}

/// Case-insensitive key lookup (`question`, `Question`, `QUESTION`).
fn get_ci<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
