//! Small string helpers shared by the adapters and preview paths.

/// Truncate to at most `max_length` characters, appending `...` when the
/// input was cut.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_length).collect();
    format!("{truncated}...")
}

/// Lowercased extension of a filename or path, empty if there is none.
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((prefix, ext)) if !prefix.is_empty() && !ext.contains(['/', '\\']) => {
            ext.to_lowercase()
        }
        _ => String::new(),
    }
}

/// Final path segment of a file path (handles both separators).
pub fn filename_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// MIME type by extension, used by the image/PDF preview path.
pub fn mime_type(filename: &str) -> &'static str {
    match file_extension(filename).as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "txt" => "text/plain",
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}
