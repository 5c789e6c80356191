use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that must not appear in the filename part of a storage key.
    /// Path separators would escape the `{user_id}/` prefix; control characters
    /// are rejected by most S3 implementations.
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[/\\\x00-\x1f\x7f]").unwrap();
}

/// Make an uploaded filename safe to embed in a storage key.
///
/// Unsafe characters become `_`; an empty result becomes `unnamed`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(name.trim(), "_");
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned.into_owned()
    }
}

/// Lowercased extension of a file name or path, if any
pub fn file_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_lowercase())
}
