//! The `spherexdoc` link role.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Reference;
use crate::registry::Role;

/// Host every `spherexdoc` link points at.
pub const DOCS_HOST: &str = "spherex-docs.ipac.caltech.edu";

/// Name the role is registered under.
pub const ROLE_NAME: &str = "spherexdoc";

/// Parsed role text: what to show and where to link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDirective {
    pub display_text: String,
    /// Lower-cased document path on the docs host.
    pub path: String,
}

impl LinkDirective {
    /// Absolute URL on the docs host.
    pub fn target_url(&self) -> String {
        format!("https://{DOCS_HOST}/{}", self.path)
    }
}

/// Split role text into display text and path.
///
/// `Display Text <path>` keeps the trimmed display text and lower-cases the
/// trimmed path. Anything else is used whole: trimmed for display, trimmed
/// and lower-cased for the path. Document paths are case-insensitive.
pub fn resolve(raw: &str) -> LinkDirective {
    static EXPLICIT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?P<display>.+)<(?P<reference>.+)>").expect("valid regex")
    });

    match EXPLICIT_RE.captures(raw) {
        Some(caps) => LinkDirective {
            display_text: caps["display"].trim().to_string(),
            path: caps["reference"].trim().to_lowercase(),
        },
        None => LinkDirective {
            display_text: raw.trim().to_string(),
            path: raw.trim().to_lowercase(),
        },
    }
}

/// Links to a SPHEREx document or project given its name, the first part
/// of the URL path on [`DOCS_HOST`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherexDocRole;

impl Role for SpherexDocRole {
    fn run(&self, text: &str) -> Reference {
        let link = resolve(text);
        let refuri = link.target_url();
        Reference::external(link.display_text, refuri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_display_text() {
        let link = resolve("Display Text<path/Sub>");
        assert_eq!(link.display_text, "Display Text");
        assert_eq!(link.path, "path/sub");
    }

    #[test]
    fn explicit_form_trims_both_parts() {
        let link = resolve("  Assemble Raw Data  < SSDC-MS-002 > ");
        assert_eq!(link.display_text, "Assemble Raw Data");
        assert_eq!(link.path, "ssdc-ms-002");
        assert_eq!(
            link.target_url(),
            "https://spherex-docs.ipac.caltech.edu/ssdc-ms-002"
        );
    }

    #[test]
    fn plain_identifier() {
        let link = resolve("PLAIN-ID");
        assert_eq!(link.display_text, "PLAIN-ID");
        assert_eq!(link.path, "plain-id");
    }

    #[test]
    fn plain_identifier_is_trimmed() {
        let link = resolve("  SSDC-MS-001 ");
        assert_eq!(link.display_text, "SSDC-MS-001");
        assert_eq!(link.path, "ssdc-ms-001");
    }

    #[test]
    fn angle_brackets_without_display_text_are_plain() {
        let link = resolve("<SSDC-MS-001>");
        assert_eq!(link.display_text, "<SSDC-MS-001>");
        assert_eq!(link.path, "<ssdc-ms-001>");
    }

    #[test]
    fn role_emits_reference() {
        let node = SpherexDocRole.run("SSDC-MS-001");
        assert_eq!(node.text, "SSDC-MS-001");
        assert_eq!(node.refuri, "https://spherex-docs.ipac.caltech.edu/ssdc-ms-001");
    }

    #[test]
    fn resolution_is_repeatable() {
        let first = SpherexDocRole.run("Pipeline <SSDC-PL>");
        let second = SpherexDocRole.run("Pipeline <SSDC-PL>");
        assert_eq!(first, second);
    }
}
