//! Base settings preset: generator defaults plus everything derived from
//! the project's declarative configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use spherexsphinx_shared::{
    HtmlContext, IconLink, IntersphinxMapping, IntersphinxTarget, LogoOptions, NapoleonSettings,
    PyDataThemeOptions, ResolvedConfiguration, Result, Settings, SpherexSphinxError,
    ThemeOptions,
};

use crate::assets::{AssetBundle, STYLESHEET};
use crate::derive::{apply_cross_references, configure_edit_source_link, extend_extensions};
use crate::repository::RepositoryLookup;

/// Author recorded in every project's metadata.
pub const AUTHOR: &str = "SPHEREx";

/// Theme used by the base preset.
pub const HTML_THEME: &str = "pydata_sphinx_theme";

/// Theme used by the technote preset.
pub const TECHNOTE_THEME: &str = "technote";

/// Extensions every project loads before its declared ones.
pub const BASE_EXTENSIONS: &[&str] = &[
    "myst_parser",
    "sphinx_design",
    "sphinx_copybutton",
    "sphinx.ext.doctest",
    "sphinx.ext.intersphinx",
    "sphinx.ext.napoleon",
    "sphinx_autodoc_typehints",
    "sphinx_automodapi.automodapi",
    "sphinx_automodapi.smart_resolver",
    "sphinxcontrib.mermaid",
];

/// Cross-reference targets every project gets.
pub const BASE_INTERSPHINX: &[(&str, &str)] = &[
    ("python", "https://docs.python.org/3"),
    ("sphinx", "https://www.sphinx-doc.org/en/master/"),
];

const MYST_EXTENSIONS: &[&str] = &[
    "amsmath",
    "colon_fence",
    "deflist",
    "dollarmath",
    "fieldlist",
    "html_admonition",
    "html_image",
    "linkify",
    "replacements",
    "smartquotes",
    "strikethrough",
    "substitution",
    "tasklist",
];

/// Inputs derivation needs besides the configuration itself.
pub struct DerivationContext<'a> {
    /// Directory the generator runs in (holds `spherexsphinx.toml`).
    pub docs_dir: PathBuf,
    /// Static asset bundle.
    pub assets: AssetBundle,
    /// Version-control lookup for edit-source links.
    pub repository: &'a dyn RepositoryLookup,
}

/// Cross-reference map before declared targets are merged in.
pub fn base_intersphinx() -> IntersphinxMapping {
    BASE_INTERSPHINX
        .iter()
        .map(|(name, url)| (name.to_string(), IntersphinxTarget::new(*url)))
        .collect()
}

/// Extension list before declared extensions are appended.
pub fn base_extensions() -> Vec<String> {
    BASE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn napoleon_defaults() -> NapoleonSettings {
    NapoleonSettings {
        napoleon_google_docstring: false,
        napoleon_numpy_docstring: true,
        napoleon_include_init_with_doc: false,
        napoleon_include_private_with_doc: false,
        napoleon_include_special_with_doc: true,
        napoleon_use_admonition_for_examples: false,
        napoleon_use_admonition_for_notes: false,
        napoleon_use_admonition_for_references: false,
        napoleon_use_ivar: false,
        napoleon_use_param: true,
        napoleon_use_rtype: true,
        napoleon_preprocess_types: false,
        napoleon_type_aliases: None,
        napoleon_attr_annotations: true,
    }
}

/// Build the full settings mapping for a project.
///
/// The edit button is only enabled when the project declares a repository
/// URL; in that case failures computing the link abort derivation.
#[instrument(skip_all, fields(title = %config.title()))]
pub fn build_settings(
    config: &ResolvedConfiguration,
    ctx: &DerivationContext<'_>,
) -> Result<Settings> {
    let project = config.project();

    let icon_links: Vec<IconLink> = project
        .repository_url()
        .into_iter()
        .map(|url| IconLink::github(url.as_str()))
        .collect();

    let rst_epilog = read_epilog(&ctx.docs_dir.join(config.sphinx().rst_epilog_file()))?;

    let mut settings = Settings {
        project: project.title().to_string(),
        copyright: project.copyright().to_string(),
        author: AUTHOR.into(),
        version: project.version().to_string(),
        release: project.version().to_string(),
        language: "en".into(),
        source_suffix: BTreeMap::from([
            (".rst".into(), "restructuredtext".into()),
            (".txt".into(), "markdown".into()),
            (".md".into(), "markdown".into()),
        ]),
        root_doc: "index".into(),
        exclude_patterns: vec![
            "_build".into(),
            "README.rst".into(),
            config.sphinx().rst_epilog_file().display().to_string(),
        ],
        rst_epilog,
        pygments_style: "sphinx".into(),
        default_role: "py:obj".into(),

        extensions: extend_extensions(config.extensions(), &base_extensions()),

        html_theme: HTML_THEME.into(),
        html_context: HtmlContext::default(),
        html_theme_options: ThemeOptions::PyData(PyDataThemeOptions {
            logo: LogoOptions {
                text: project.title().to_string(),
            },
            use_edit_page_button: false,
            pygment_light_style: "tango".into(),
            pygment_dark_style: "github-dark".into(),
            icon_links,
        }),
        html_title: project.title().to_string(),
        html_short_title: project.title().to_string(),
        html_baseurl: project.base_url().map(|u| u.as_str().to_string()),
        html_show_sourcelink: false,
        html_copy_source: false,
        html_static_path: vec![ctx.assets.get_asset_path(STYLESHEET)?],
        html_css_files: vec![STYLESHEET.into()],

        intersphinx_mapping: apply_cross_references(config.intersphinx(), &base_intersphinx()),
        intersphinx_timeout: 10.0,
        intersphinx_cache_limit: 5,

        linkcheck_retries: 2,
        linkcheck_timeout: 15,
        linkcheck_ignore: config.sphinx().linkcheck_ignore().to_vec(),

        automodapi_toctreedirnm: "api".into(),
        always_document_param_types: true,
        typehints_defaults: "comma".into(),
        napoleon: napoleon_defaults(),

        myst_enable_extensions: MYST_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        mermaid_output_format: "raw".into(),

        bibtex: None,
    };

    if project.repository_url().is_some() {
        let link = configure_edit_source_link(project, &ctx.docs_dir, ctx.repository)?;
        link.apply_to(&mut settings);
    } else {
        debug!("no github_url declared, edit-source link disabled");
    }

    info!(
        extensions = settings.extensions.len(),
        intersphinx = settings.intersphinx_mapping.len(),
        "derived generator settings"
    );

    Ok(settings)
}

fn read_epilog(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        debug!(path = %path.display(), "no rst epilog file");
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| SpherexSphinxError::io(path, e))
}
