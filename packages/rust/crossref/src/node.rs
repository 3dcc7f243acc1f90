//! Document nodes emitted by roles.

use serde::Serialize;

/// A hyperlink node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Visible link text.
    pub text: String,
    /// Target URL.
    pub refuri: String,
    /// CSS classes on the rendered anchor.
    pub classes: Vec<String>,
}

impl Reference {
    /// A link leaving the current site.
    pub fn external(text: impl Into<String>, refuri: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            refuri: refuri.into(),
            classes: vec!["reference".into(), "external".into()],
        }
    }

    /// Render as an HTML anchor.
    pub fn to_html(&self) -> String {
        format!(
            r#"<a class="{}" href="{}">{}</a>"#,
            escape_html(&self.classes.join(" ")),
            escape_html(&self.refuri),
            escape_html(&self.text)
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_external_anchor() {
        let node = Reference::external(
            "SSDC-MS-001",
            "https://spherex-docs.ipac.caltech.edu/ssdc-ms-001",
        );
        assert_eq!(
            node.to_html(),
            concat!(
                r#"<a class="reference external" "#,
                r#"href="https://spherex-docs.ipac.caltech.edu/ssdc-ms-001">SSDC-MS-001</a>"#,
            )
        );
    }

    #[test]
    fn serializes_as_node_record() {
        let node =
            Reference::external("Raw Data", "https://spherex-docs.ipac.caltech.edu/ssdc-ms-002");
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "text": "Raw Data",
                "refuri": "https://spherex-docs.ipac.caltech.edu/ssdc-ms-002",
                "classes": ["reference", "external"],
            })
        );
    }

    #[test]
    fn escapes_text_and_url() {
        let node = Reference::external("R&D <notes>", "https://example.org/?a=1&b=\"2\"");
        let html = node.to_html();
        assert!(html.contains(">R&amp;D &lt;notes&gt;</a>"));
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b=&quot;2&quot;\""));
    }
}
