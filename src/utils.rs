// src/utils.rs
use crate::error::{ApiError, Result};

/// CV file types the import services accept
pub const CV_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

/// Join a base URL and a path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<String> {
    let ext = get_file_extension(filename).ok_or_else(|| {
        ApiError::InvalidInput(format!("File has no extension: {}", filename))
    })?;

    if !allowed.contains(&ext.as_str()) {
        return Err(ApiError::InvalidInput(format!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext, allowed
        )));
    }

    Ok(ext)
}

/// Get content type for an uploadable CV file
pub fn content_type_for(filename: &str) -> Result<&'static str> {
    let ext = validate_file_extension(filename, CV_EXTENSIONS)?;
    Ok(match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        _ => "text/plain",
    })
}

/// Reject blank required form fields before any request goes out
pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

/// Escape a path segment taken from user input or a backend id
pub fn path_segment(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("id is required".to_string()));
    }

    Ok(trimmed
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect())
}
