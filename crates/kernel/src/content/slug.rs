//! Page slug derivation.

/// Normalize a title or user-supplied slug: spaces become hyphens and the
/// result is lower-cased. Nothing else is rewritten.
pub fn normalize_slug(text: &str) -> String {
    text.replace(' ', "-").to_lowercase()
}

/// Derive the slug for a page from its title and the optional submitted slug.
///
/// A blank submitted slug falls back to the title.
pub fn derive_slug(title: &str, slug: Option<&str>) -> String {
    match slug {
        Some(s) if !s.trim().is_empty() => normalize_slug(s),
        _ => normalize_slug(title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_title() {
        assert_eq!(derive_slug("Contact Us", None), "contact-us");
        assert_eq!(derive_slug("About", Some("")), "about");
        assert_eq!(derive_slug("About", Some("   ")), "about");
    }

    #[test]
    fn test_submitted_slug_is_normalized() {
        assert_eq!(derive_slug("Ignored", Some("Shipping Info")), "shipping-info");
        assert_eq!(derive_slug("Ignored", Some("FAQ")), "faq");
    }

    #[test]
    fn test_only_spaces_are_rewritten() {
        assert_eq!(normalize_slug("Cats & Dogs"), "cats-&-dogs");
        assert_eq!(normalize_slug("a  b"), "a--b");
    }
}
