use std::path::Path;

/// Detects the MIME type of a stored file.
/// The content's magic number wins over the filename extension.
pub fn compute_file_mime(file_data: &[u8], filename: &str) -> &'static str {
    infer::get(file_data)
        .map(|mime| mime.mime_type())
        .or_else(|| mime_guess::from_path(Path::new(filename)).first_raw())
        .unwrap_or("application/octet-stream")
}
