//! Input validation and HTML sanitisation for new todos.

use common::protocol::CreateTodoRequest;
use common::ServiceError;
use serde_json::Value;

/// Longest accepted raw `todo` value, in UTF-16 code units (the unit browsers
/// use for `maxlength`).
pub const MAX_TODO_LEN: usize = 1000;

/// Client-facing message for every create-path rejection.
pub const INVALID_TODO: &str = "Invalid todo";

/// Client-facing message for a malformed delete id.
pub const INVALID_ID: &str = "Invalid ID";

/// Client-facing message when no row carries the requested id.
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Parse a `POST /todos` body and return the text ready for storage.
///
/// The raw value must be a non-empty string of at most [`MAX_TODO_LEN`] code
/// units. It is then trimmed, must still be non-empty, and is HTML-escaped.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] with [`INVALID_TODO`] for malformed
/// JSON, a body that is not an object, a missing or non-string `todo`, or a
/// value that is too long or blank.
pub fn parse_new_todo(body: &[u8]) -> Result<String, ServiceError> {
    // serde would also accept `["text"]` as the struct's sequence form.
    let value: Value = serde_json::from_slice(body).map_err(|_| invalid_todo())?;
    if !value.is_object() {
        return Err(invalid_todo());
    }
    let req: CreateTodoRequest = serde_json::from_value(value).map_err(|_| invalid_todo())?;

    if req.todo.encode_utf16().count() > MAX_TODO_LEN {
        return Err(invalid_todo());
    }

    let trimmed = req.todo.trim();
    if trimmed.is_empty() {
        return Err(invalid_todo());
    }

    Ok(escape_html(trimmed))
}

/// Parse the id segment of `DELETE /todos/{id}`.
///
/// Reads like a lenient integer prefix parse: leading whitespace and an
/// optional sign are skipped, then the leading decimal digits are taken and
/// anything after them is ignored (`"2abc"` is 2).
///
/// # Errors
///
/// - [`ServiceError::Validation`] with [`INVALID_ID`] if there are no leading
///   digits or the value is below 1.
/// - [`ServiceError::NotFound`] with [`TODO_NOT_FOUND`] if the value is too
///   large for any row id to match.
pub fn parse_todo_id(segment: &str) -> Result<i64, ServiceError> {
    let invalid_id = || ServiceError::Validation(INVALID_ID.into());

    let s = segment.trim_start();
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits_len = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 || negative {
        return Err(invalid_id());
    }

    match unsigned[..digits_len].parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        Ok(_) => Err(invalid_id()),
        // Only digits remain, so the sole failure is overflow.
        Err(_) => Err(ServiceError::NotFound(TODO_NOT_FOUND.into())),
    }
}

/// The id segment of a `/todos/...` path: whatever sits between `/todos/` and
/// the next `/`, possibly empty.
pub fn todo_id_segment(path: &str) -> &str {
    path.strip_prefix("/todos/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("")
}

/// Escape the HTML-significant characters `& < > " ' /`.
///
/// Works in a single pass, so entities produced for one character are never
/// re-escaped.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

fn invalid_todo() -> ServiceError {
    ServiceError::Validation(INVALID_TODO.into())
}
