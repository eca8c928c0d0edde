use std::sync::LazyLock;
use regex::Regex;
use crate::error::AppError;

static FORBIDDEN_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\\x00]").unwrap());

/// Extracts the original filename from an announcement of the form
/// `<anything>:<filename>`. Only the text after the first `:` is used.
pub fn parse_announcement(announcement: &str) -> Result<String, AppError> {
    let (_, filename) = announcement
        .split_once(':')
        .ok_or_else(|| AppError::MalformedAnnouncement(announcement.to_string()))?;
    validate_filename(filename)?;
    Ok(filename.to_string())
}

pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !FORBIDDEN_FILENAME_CHARS.is_match(name)
}

pub fn validate_filename(name: &str) -> Result<(), AppError> {
    if is_valid_filename(name) {
        Ok(())
    } else {
        Err(AppError::InvalidFilename(name.to_string()))
    }
}
