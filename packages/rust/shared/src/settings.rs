//! The settings mapping handed to the documentation generator.
//!
//! Field names match the generator's configuration keys so the serialized
//! form can be consumed as-is by the templating layer.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cross-reference map
// ---------------------------------------------------------------------------

/// One cross-reference target: base URL plus inventory location.
///
/// Serializes as a two-element sequence, `[url, inventory]`. A `None`
/// inventory means "use the default `objects.inv` under the URL".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntersphinxTarget(pub String, pub Option<String>);

impl IntersphinxTarget {
    /// A target with the null inventory marker.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into(), None)
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Project name → cross-reference target.
pub type IntersphinxMapping = BTreeMap<String, IntersphinxTarget>;

// ---------------------------------------------------------------------------
// Templating context and theme options
// ---------------------------------------------------------------------------

/// Jinja page context used by edit-source links.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HtmlContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_version: Option<String>,
    /// Docs directory relative to the repository root (`""` at the root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_path: Option<String>,
}

/// Logo block of the PyData theme options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoOptions {
    pub text: String,
}

/// A header icon link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconLink {
    pub name: String,
    pub url: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl IconLink {
    /// The GitHub icon shown for a project's repository.
    pub fn github(url: impl Into<String>) -> Self {
        Self {
            name: "GitHub".into(),
            url: url.into(),
            icon: "fab fa-github-square".into(),
            kind: "fontawesome".into(),
        }
    }
}

/// Options for `pydata_sphinx_theme`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyDataThemeOptions {
    pub logo: LogoOptions,
    pub use_edit_page_button: bool,
    pub pygment_light_style: String,
    pub pygment_dark_style: String,
    pub icon_links: Vec<IconLink>,
}

/// Options for the technote theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnoteThemeOptions {
    pub light_logo: String,
    pub dark_logo: String,
    pub logo_link_url: String,
    pub logo_alt_text: String,
}

/// Theme options for whichever theme the preset selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ThemeOptions {
    PyData(PyDataThemeOptions),
    Technote(TechnoteThemeOptions),
}

// ---------------------------------------------------------------------------
// Extension options
// ---------------------------------------------------------------------------

/// `sphinx.ext.napoleon` options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NapoleonSettings {
    pub napoleon_google_docstring: bool,
    pub napoleon_numpy_docstring: bool,
    pub napoleon_include_init_with_doc: bool,
    pub napoleon_include_private_with_doc: bool,
    pub napoleon_include_special_with_doc: bool,
    pub napoleon_use_admonition_for_examples: bool,
    pub napoleon_use_admonition_for_notes: bool,
    pub napoleon_use_admonition_for_references: bool,
    pub napoleon_use_ivar: bool,
    pub napoleon_use_param: bool,
    pub napoleon_use_rtype: bool,
    pub napoleon_preprocess_types: bool,
    pub napoleon_type_aliases: Option<BTreeMap<String, String>>,
    pub napoleon_attr_annotations: bool,
}

/// A GitHub repository the bibliography cache pulls `.bib` files from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BibfileRepo {
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub bibfiles: Vec<String>,
}

/// Bibliography settings used by technotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BibtexSettings {
    pub documenteer_bibfile_cache_dir: String,
    pub documenteer_bibfile_github_repos: Vec<BibfileRepo>,
    pub bibtex_bibfiles: Vec<String>,
    pub bibtex_reference_style: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// The full settings mapping produced by configuration derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub project: String,
    pub copyright: String,
    pub author: String,
    pub version: String,
    pub release: String,
    pub language: String,
    pub source_suffix: BTreeMap<String, String>,
    pub root_doc: String,
    pub exclude_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rst_epilog: Option<String>,
    pub pygments_style: String,
    pub default_role: String,

    pub extensions: Vec<String>,

    pub html_theme: String,
    pub html_context: HtmlContext,
    pub html_theme_options: ThemeOptions,
    pub html_title: String,
    pub html_short_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_baseurl: Option<String>,
    pub html_show_sourcelink: bool,
    pub html_copy_source: bool,
    /// Asset search paths.
    pub html_static_path: Vec<PathBuf>,
    /// Stylesheets from the static path, by file name.
    pub html_css_files: Vec<String>,

    pub intersphinx_mapping: IntersphinxMapping,
    /// Seconds.
    pub intersphinx_timeout: f64,
    /// Days.
    pub intersphinx_cache_limit: u32,

    pub linkcheck_retries: u32,
    /// Seconds.
    pub linkcheck_timeout: u32,
    pub linkcheck_ignore: Vec<String>,

    pub automodapi_toctreedirnm: String,
    pub always_document_param_types: bool,
    pub typehints_defaults: String,
    #[serde(flatten)]
    pub napoleon: NapoleonSettings,

    pub myst_enable_extensions: Vec<String>,
    pub mermaid_output_format: String,

    #[serde(flatten)]
    pub bibtex: Option<BibtexSettings>,
}

impl Settings {
    /// PyData theme options, if this mapping uses the PyData theme.
    pub fn pydata_theme_options_mut(&mut self) -> Option<&mut PyDataThemeOptions> {
        match &mut self.html_theme_options {
            ThemeOptions::PyData(options) => Some(options),
            ThemeOptions::Technote(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersphinx_target_serializes_as_pair() {
        let target = IntersphinxTarget::new("https://docs.python.org/3");
        let json = serde_json::to_value(&target).expect("serialize");
        assert_eq!(json, serde_json::json!(["https://docs.python.org/3", null]));
    }

    #[test]
    fn icon_link_uses_type_key() {
        let link = IconLink::github("https://github.com/SPHEREx/spherex-sphinx");
        let json = serde_json::to_value(&link).expect("serialize");
        assert_eq!(json["type"], "fontawesome");
        assert_eq!(json["name"], "GitHub");
    }

    #[test]
    fn html_context_omits_unset_fields() {
        let ctx = HtmlContext {
            github_user: Some("SPHEREx".into()),
            ..HtmlContext::default()
        };
        let json = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(json, serde_json::json!({ "github_user": "SPHEREx" }));
    }
}
