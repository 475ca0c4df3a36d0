use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 255;

/// Trims a user-supplied name and checks it can be stored.
pub fn normalize_name(field: &str, value: &str) -> Result<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::BadRequest(format!("{field} cannot be empty")));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::BadRequest(format!(
            "{field} cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    const INVALID_CHARS: &[char] = &['\0', '\n', '\r'];
    if value.chars().any(|c| INVALID_CHARS.contains(&c)) {
        return Err(Error::BadRequest(format!(
            "{field} contains invalid characters"
        )));
    }

    Ok(value.to_string())
}

/// Turns blank optional text into `None`.
#[must_use]
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
