//! Declarative project configuration for spherexsphinx.
//!
//! Project config lives at `spherexsphinx.toml` in the documentation
//! directory. Loading happens in two stages: a structural TOML parse into a
//! generic table, then a schema walk that collects every violation before
//! failing. A [`ResolvedConfiguration`] is only ever handed out fully valid.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use regex::Regex;
use serde::{Serialize, Serializer};
use toml::{Table, Value};
use url::Url;

use crate::error::{Result, SpherexSphinxError, Violation};

/// Declarative configuration file name.
pub const CONFIG_FILE_NAME: &str = "spherexsphinx.toml";

/// Institution appended to the current year in the default copyright.
pub const COPYRIGHT_HOLDER: &str = "California Institute of Technology";

/// Default branch used for edit-source links.
pub const DEFAULT_BRANCH: &str = "main";

/// Default documentation version label.
pub const DEFAULT_VERSION: &str = "latest";

/// Default reST epilog file, read from the docs directory when present.
pub const DEFAULT_RST_EPILOG_FILE: &str = "_rst_epilog.rst";

const PROJECT_KEYS: &[&str] = &[
    "title",
    "base_url",
    "copyright",
    "github_url",
    "github_default_branch",
    "version",
];
const SPHINX_KEYS: &[&str] = &["extensions", "intersphinx", "linkcheck", "rst_epilog_file"];

// ---------------------------------------------------------------------------
// Resolved model
// ---------------------------------------------------------------------------

/// A URL exactly as declared, checked to be an absolute http(s) URL.
///
/// The declared text is what flows into settings; the parsed form is only
/// used to inspect structure (e.g. repository path segments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredUrl {
    raw: String,
    parsed: Url,
}

impl DeclaredUrl {
    /// Parse `raw`, keeping its text. Only `http` and `https` are accepted.
    pub fn parse(raw: impl Into<String>) -> std::result::Result<Self, String> {
        let raw = raw.into();
        match Url::parse(&raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Self { raw, parsed }),
            Ok(parsed) => Err(format!(
                "expected an http(s) URL, found scheme `{}`",
                parsed.scheme()
            )),
            Err(e) => Err(format!("invalid URL {raw:?}: {e}")),
        }
    }

    /// The declared text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &Url {
        &self.parsed
    }
}

impl fmt::Display for DeclaredUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for DeclaredUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// `[project]` section after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMetadata {
    title: String,
    base_url: Option<DeclaredUrl>,
    copyright: String,
    repository_url: Option<DeclaredUrl>,
    default_branch: String,
    version: String,
}

impl ProjectMetadata {
    /// Project title, exactly as declared.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Canonical URL of the published site.
    pub fn base_url(&self) -> Option<&DeclaredUrl> {
        self.base_url.as_ref()
    }

    pub fn copyright(&self) -> &str {
        &self.copyright
    }

    /// Source repository (declared as `github_url`).
    pub fn repository_url(&self) -> Option<&DeclaredUrl> {
        self.repository_url.as_ref()
    }

    /// Branch that edit-source links point at.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Documentation version label.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// External documentation projects for cross-referencing, in declared order.
///
/// Names may repeat when built programmatically; consumers apply them in
/// order so the last declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossReferenceTargets(Vec<(String, DeclaredUrl)>);

impl CrossReferenceTargets {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclaredUrl)> {
        self.0.iter().map(|(name, url)| (name.as_str(), url))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, DeclaredUrl)> for CrossReferenceTargets {
    fn from_iter<I: IntoIterator<Item = (String, DeclaredUrl)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extension identifiers appended to the generator's base list.
///
/// Order and duplicates are kept exactly as declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionList(Vec<String>);

impl ExtensionList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for ExtensionList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Remaining `[sphinx]` options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphinxOptions {
    linkcheck_ignore: Vec<String>,
    rst_epilog_file: PathBuf,
}

impl SphinxOptions {
    /// Regular expressions of links the link checker skips.
    pub fn linkcheck_ignore(&self) -> &[String] {
        &self.linkcheck_ignore
    }

    /// reST epilog file, relative to the docs directory.
    pub fn rst_epilog_file(&self) -> &Path {
        &self.rst_epilog_file
    }
}

/// The validated aggregate read from `spherexsphinx.toml`.
///
/// Only [`validate`] builds one, so every instance is fully valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    project: ProjectMetadata,
    intersphinx: CrossReferenceTargets,
    extensions: ExtensionList,
    sphinx: SphinxOptions,
}

impl ResolvedConfiguration {
    pub fn project(&self) -> &ProjectMetadata {
        &self.project
    }

    pub fn intersphinx(&self) -> &CrossReferenceTargets {
        &self.intersphinx
    }

    pub fn extensions(&self) -> &ExtensionList {
        &self.extensions
    }

    pub fn sphinx(&self) -> &SphinxOptions {
        &self.sphinx
    }

    /// The declared project title.
    pub fn title(&self) -> &str {
        &self.project.title
    }
}

/// Copyright used when `project.copyright` is not declared.
pub fn default_copyright() -> String {
    format!("{} {COPYRIGHT_HOLDER}", chrono::Utc::now().year())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Path of the declarative file inside `dir`.
pub fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load `spherexsphinx.toml` from the given docs directory.
pub fn load_config(dir: &Path) -> Result<ResolvedConfiguration> {
    load_config_from(&config_file_path(dir))
}

/// Load the declarative configuration from a specific file path.
pub fn load_config_from(path: &Path) -> Result<ResolvedConfiguration> {
    if !path.is_file() {
        return Err(SpherexSphinxError::ConfigurationNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| SpherexSphinxError::io(path, e))?;
    tracing::debug!(?path, "loaded configuration file");
    load(&content)
}

/// Parse and validate declarative text.
pub fn load(text: &str) -> Result<ResolvedConfiguration> {
    let table: Table = text
        .parse()
        .map_err(|e: toml::de::Error| SpherexSphinxError::syntax(e.to_string().trim_end()))?;
    validate(&table)
}

/// Validate a parsed table against the schema, collecting every violation.
pub fn validate(root: &Table) -> Result<ResolvedConfiguration> {
    let mut v = Validator::default();

    let project = v.table(root, "project", "project");
    let sphinx = v.table(root, "sphinx", "sphinx");

    let empty = Table::new();
    let project = project.unwrap_or(&empty);
    let sphinx = sphinx.unwrap_or(&empty);

    v.warn_unknown(project, PROJECT_KEYS, "project");
    v.warn_unknown(sphinx, SPHINX_KEYS, "sphinx");

    let title = v.required_string(project, "title", "project.title");
    let base_url = v.url(project, "base_url", "project.base_url");
    let copyright = v.string(project, "copyright", "project.copyright");
    let repository_url = v.url(project, "github_url", "project.github_url");
    let default_branch = v.string(
        project,
        "github_default_branch",
        "project.github_default_branch",
    );
    let version = v.string(project, "version", "project.version");

    let extensions = v.string_array(sphinx, "extensions", "sphinx.extensions");
    let intersphinx = v.cross_references(sphinx);
    let linkcheck_ignore = v.linkcheck_ignore(sphinx);
    let rst_epilog_file = v.string(sphinx, "rst_epilog_file", "sphinx.rst_epilog_file");

    let (Some(title), true) = (title, v.violations.is_empty()) else {
        return Err(SpherexSphinxError::ConfigurationValidation {
            violations: v.violations,
        });
    };

    Ok(ResolvedConfiguration {
        project: ProjectMetadata {
            title,
            base_url,
            copyright: copyright.unwrap_or_else(default_copyright),
            repository_url,
            default_branch: default_branch.unwrap_or_else(|| DEFAULT_BRANCH.into()),
            version: version.unwrap_or_else(|| DEFAULT_VERSION.into()),
        },
        intersphinx,
        extensions: extensions.into_iter().collect(),
        sphinx: SphinxOptions {
            linkcheck_ignore,
            rst_epilog_file: rst_epilog_file
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RST_EPILOG_FILE)),
        },
    })
}

// ---------------------------------------------------------------------------
// Schema walker
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation::new(path, reason));
    }

    fn wrong_type(&mut self, path: &str, expected: &str, found: &Value) {
        self.push(path, format!("expected {expected}, found {}", found.type_str()));
    }

    fn warn_unknown(&self, table: &Table, known: &[&str], path: &str) {
        for key in table.keys().filter(|k| !known.contains(&k.as_str())) {
            tracing::warn!(key = %format!("{path}.{key}"), "ignoring unknown configuration key");
        }
    }

    /// Optional sub-table; a present non-table value is a violation.
    fn table<'a>(&mut self, parent: &'a Table, key: &str, path: &str) -> Option<&'a Table> {
        match parent.get(key)? {
            Value::Table(t) => Some(t),
            other => {
                self.wrong_type(path, "a table", other);
                None
            }
        }
    }

    fn string(&mut self, table: &Table, key: &str, path: &str) -> Option<String> {
        match table.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.wrong_type(path, "a string", other);
                None
            }
        }
    }

    fn required_string(&mut self, table: &Table, key: &str, path: &str) -> Option<String> {
        if !table.contains_key(key) {
            self.push(path, "field is required");
            return None;
        }
        let s = self.string(table, key, path)?;
        if s.is_empty() {
            self.push(path, "must not be empty");
            return None;
        }
        Some(s)
    }

    fn url(&mut self, table: &Table, key: &str, path: &str) -> Option<DeclaredUrl> {
        let raw = self.string(table, key, path)?;
        self.parse_url(raw, path)
    }

    fn parse_url(&mut self, raw: String, path: &str) -> Option<DeclaredUrl> {
        match DeclaredUrl::parse(raw) {
            Ok(url) => Some(url),
            Err(reason) => {
                self.push(path, reason);
                None
            }
        }
    }

    fn string_array(&mut self, table: &Table, key: &str, path: &str) -> Vec<String> {
        let items = match table.get(key) {
            None => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.wrong_type(path, "an array of strings", other);
                return Vec::new();
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => self.wrong_type(&format!("{path}[{i}]"), "a string", other),
            }
        }
        out
    }

    fn cross_references(&mut self, sphinx: &Table) -> CrossReferenceTargets {
        let Some(intersphinx) = self.table(sphinx, "intersphinx", "sphinx.intersphinx") else {
            return CrossReferenceTargets::default();
        };
        self.warn_unknown(intersphinx, &["projects"], "sphinx.intersphinx");
        let Some(projects) = self.table(intersphinx, "projects", "sphinx.intersphinx.projects")
        else {
            return CrossReferenceTargets::default();
        };

        let mut targets = Vec::with_capacity(projects.len());
        for (name, value) in projects {
            let path = format!("sphinx.intersphinx.projects.{name}");
            let Value::String(raw) = value else {
                self.wrong_type(&path, "a URL string", value);
                continue;
            };
            if let Some(url) = self.parse_url(raw.clone(), &path) {
                targets.push((name.clone(), url));
            }
        }
        CrossReferenceTargets(targets)
    }

    fn linkcheck_ignore(&mut self, sphinx: &Table) -> Vec<String> {
        let Some(linkcheck) = self.table(sphinx, "linkcheck", "sphinx.linkcheck") else {
            return Vec::new();
        };
        self.warn_unknown(linkcheck, &["ignore"], "sphinx.linkcheck");

        let patterns = self.string_array(linkcheck, "ignore", "sphinx.linkcheck.ignore");
        for (i, pattern) in patterns.iter().enumerate() {
            if let Err(e) = Regex::new(pattern) {
                self.push(
                    format!("sphinx.linkcheck.ignore[{i}]"),
                    format!("invalid regular expression: {e}"),
                );
            }
        }
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[project]
title = "SPHEREx Pipeline"
base_url = "https://spherex-docs.ipac.caltech.edu/pipeline/"
copyright = "2024 Caltech"
github_url = "https://github.com/SPHEREx/pipeline"
github_default_branch = "develop"
version = "1.2"

[sphinx]
extensions = ["sphinx_click", "sphinx_click"]

[sphinx.intersphinx.projects]
astropy = "https://docs.astropy.org/en/stable/"
numpy = "https://numpy.org/doc/stable/"

[sphinx.linkcheck]
ignore = ['^https://jira\.example\.org/']
"#;

    fn violation_paths(err: &SpherexSphinxError) -> Vec<&str> {
        err.violations().iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn full_config_loads() {
        let config = load(FULL).expect("load");
        assert_eq!(config.title(), "SPHEREx Pipeline");
        assert_eq!(
            config.project().base_url().map(DeclaredUrl::as_str),
            Some("https://spherex-docs.ipac.caltech.edu/pipeline/")
        );
        assert_eq!(config.project().copyright(), "2024 Caltech");
        assert_eq!(config.project().default_branch(), "develop");
        assert_eq!(config.project().version(), "1.2");
        assert_eq!(config.extensions().as_slice(), ["sphinx_click", "sphinx_click"]);

        let names: Vec<&str> = config.intersphinx().iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["astropy", "numpy"]);
        assert_eq!(config.sphinx().linkcheck_ignore().len(), 1);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = load("[project]\ntitle = \"Docs\"\n").expect("load");
        assert_eq!(config.project().default_branch(), "main");
        assert_eq!(config.project().version(), "latest");
        assert!(config.project().copyright().ends_with(COPYRIGHT_HOLDER));
        assert!(config.project().base_url().is_none());
        assert!(config.project().repository_url().is_none());
        assert!(config.intersphinx().is_empty());
        assert!(config.extensions().is_empty());
        assert_eq!(
            config.sphinx().rst_epilog_file(),
            Path::new(DEFAULT_RST_EPILOG_FILE)
        );
    }

    #[test]
    fn declared_urls_keep_their_text() {
        let config = load(
            r#"
[project]
title = "Docs"
base_url = "https://Spherex-Docs.ipac.caltech.edu"
github_url = "https://github.com/SPHEREx/docs"

[sphinx.intersphinx.projects]
astropy = "https://Docs.Astropy.org"
"#,
        )
        .expect("load");

        let project = config.project();
        assert_eq!(
            project.base_url().map(DeclaredUrl::as_str),
            Some("https://Spherex-Docs.ipac.caltech.edu")
        );
        assert_eq!(
            project.repository_url().map(|u| u.to_string()),
            Some("https://github.com/SPHEREx/docs".to_string())
        );

        let (name, url) = config.intersphinx().iter().next().expect("one target");
        assert_eq!(name, "astropy");
        assert_eq!(url.as_str(), "https://Docs.Astropy.org");
        assert_eq!(url.parsed().host_str(), Some("docs.astropy.org"));
    }

    #[test]
    fn declared_url_rejects_other_schemes() {
        let err = DeclaredUrl::parse("file:///tmp/docs").unwrap_err();
        assert!(err.contains("`file`"));
        assert!(DeclaredUrl::parse("docs.astropy.org").is_err());
    }

    #[test]
    fn title_is_kept_verbatim() {
        let config = load("[project]\ntitle = \"  Spaced  Title \"\n").expect("load");
        assert_eq!(config.title(), "  Spaced  Title ");
    }

    #[test]
    fn missing_title_reports_field_path() {
        let err = load("[project]\nversion = \"1.0\"\n").unwrap_err();
        assert!(matches!(err, SpherexSphinxError::ConfigurationValidation { .. }));
        assert!(err.to_string().contains("project.title"));

        let err = load("").unwrap_err();
        assert_eq!(violation_paths(&err), ["project.title"]);
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = load("[project]\ntitle = \"\"\n").unwrap_err();
        assert_eq!(err.violations()[0].reason, "must not be empty");
    }

    #[test]
    fn every_violation_is_collected() {
        let text = r#"
[project]
title = 42
base_url = "not a url"
github_url = "ftp://example.org/repo"

[sphinx]
extensions = ["ok", 3]

[sphinx.intersphinx.projects]
bad = "nope"

[sphinx.linkcheck]
ignore = ["(unclosed"]
"#;
        let err = load(text).unwrap_err();
        assert_eq!(
            violation_paths(&err),
            [
                "project.title",
                "project.base_url",
                "project.github_url",
                "sphinx.extensions[1]",
                "sphinx.intersphinx.projects.bad",
                "sphinx.linkcheck.ignore[0]",
            ]
        );
        assert_eq!(err.violations()[0].reason, "expected a string, found integer");
    }

    #[test]
    fn wrong_section_type_is_a_violation() {
        let err = load("project = \"oops\"\n").unwrap_err();
        assert_eq!(violation_paths(&err), ["project", "project.title"]);
    }

    #[test]
    fn syntax_error_carries_parser_diagnostic() {
        let err = load("[project\ntitle = \"x\"\n").unwrap_err();
        match err {
            SpherexSphinxError::ConfigurationSyntax { message } => assert!(!message.is_empty()),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, SpherexSphinxError::ConfigurationNotFound { .. }));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(config_file_path(dir.path()), FULL).expect("write");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.title(), "SPHEREx Pipeline");
    }

    #[test]
    fn default_copyright_uses_current_year() {
        let year = chrono::Utc::now().year().to_string();
        assert_eq!(default_copyright(), format!("{year} {COPYRIGHT_HOLDER}"));
    }
}
