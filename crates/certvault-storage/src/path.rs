//! Object path composition and filename sanitization.
//!
//! Objects are addressed as `{owner_id}/{parent_folder_id | "root"}/
//! {unique_id}-{sanitized_name}`. Sanitization transliterates diacritics
//! to ASCII, collapses whitespace runs to underscores, and drops any
//! character outside `[a-zA-Z0-9._-]`.

use deunicode::deunicode;
use uuid::Uuid;

/// Fallback name when sanitization strips a filename down to nothing.
const FALLBACK_NAME: &str = "file";

/// Sanitize a user-supplied filename for use in an object path.
pub fn sanitize_file_name(name: &str) -> String {
    let ascii = deunicode(name);
    let collapsed = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let clean: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if clean.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        clean
    }
}

/// Compose the object storage path for an uploaded document.
pub fn object_path(
    owner_id: Uuid,
    parent_id: Option<Uuid>,
    unique_id: Uuid,
    file_name: &str,
) -> String {
    let parent = parent_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "root".to_string());
    format!(
        "{owner_id}/{parent}/{unique_id}-{}",
        sanitize_file_name(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_diacritics() {
        assert_eq!(
            sanitize_file_name("Certificado Aço É 01.pdf"),
            "Certificado_Aco_E_01.pdf"
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_file_name("my   report\t v2.pdf"), "my_report_v2.pdf");
    }

    #[test]
    fn test_sanitize_drops_forbidden_characters() {
        assert_eq!(sanitize_file_name("a/b\\c:d*e?.pdf"), "abcde.pdf");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_file_name("???"), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn test_object_path_shape() {
        let owner = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let unique = Uuid::new_v4();

        let with_parent = object_path(owner, Some(parent), unique, "cert.pdf");
        assert_eq!(
            with_parent,
            format!("{owner}/{parent}/{unique}-cert.pdf")
        );

        let at_root = object_path(owner, None, unique, "cert.pdf");
        assert_eq!(at_root, format!("{owner}/root/{unique}-cert.pdf"));
    }
}
