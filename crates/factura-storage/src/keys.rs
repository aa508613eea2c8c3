//! Shared key generation for storage backends.
//!
//! Key format: `documents/{uuid}_{filename}`, with the filename reduced to a
//! safe character set.

use uuid::Uuid;

/// Generate a storage key for an uploaded file.
///
/// The uuid prefix keeps keys unique across re-uploads of the same filename.
/// All backends must use this format for consistency.
pub fn generate_storage_key(filename: &str) -> String {
    format!("documents/{}_{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Strip path components and unsafe characters from a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_has_documents_prefix() {
        let key = generate_storage_key("invoice.pdf");
        assert!(key.starts_with("documents/"));
        assert!(key.ends_with("_invoice.pdf"));
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir\\evil.pdf"), "evil.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my invoice (1).pdf"), "my_invoice__1_.pdf");
        assert_eq!(sanitize_filename(""), "file");
    }
}
