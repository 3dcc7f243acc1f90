//! Technote preset, layered over a caller-supplied base mapping.

use std::path::Path;

use tracing::{debug, instrument};

use spherexsphinx_shared::{
    BibfileRepo, BibtexSettings, Result, Settings, SpherexSphinxError, TechnoteThemeOptions,
    ThemeOptions,
};

use crate::assets::{AssetBundle, LOGO_DARK, LOGO_LIGHT};
use crate::settings::TECHNOTE_THEME;

/// Bibliography extension, moved to the end so it loads after the bib cache.
const BIBTEX_EXTENSION: &str = "sphinxcontrib.bibtex";

/// Extensions technotes add, in load order.
pub const TECHNOTE_EXTENSIONS: &[&str] = &[
    "sphinxcontrib.mermaid",
    "sphinx_prompt",
    "sphinx_design",
    "documenteer.ext.githubbibcache",
    BIBTEX_EXTENSION,
];

const LOGO_LINK_URL: &str = "https://spherex-docs.ipac.caltech.edu";
const BIBFILE_CACHE_DIR: &str = ".technote/bibfiles";

/// Turn `base` into technote settings for a document in `docs_dir`.
#[instrument(skip_all, fields(docs_dir = %docs_dir.display()))]
pub fn technote_settings(
    mut base: Settings,
    assets: &AssetBundle,
    docs_dir: &Path,
) -> Result<Settings> {
    if let Some(pos) = base.extensions.iter().position(|e| e == BIBTEX_EXTENSION) {
        base.extensions.remove(pos);
    }
    base.extensions.extend(TECHNOTE_EXTENSIONS.iter().map(|s| s.to_string()));

    base.html_static_path = vec![
        assets.get_asset_path(LOGO_DARK)?,
        assets.get_asset_path(LOGO_LIGHT)?,
    ];
    base.html_css_files.clear();

    base.html_theme = TECHNOTE_THEME.into();
    base.html_theme_options = ThemeOptions::Technote(TechnoteThemeOptions {
        light_logo: LOGO_LIGHT.into(),
        dark_logo: LOGO_DARK.into(),
        logo_link_url: LOGO_LINK_URL.into(),
        logo_alt_text: "SPHEREx".into(),
    });

    let bibfiles = local_bibfiles(docs_dir)?;
    debug!(count = bibfiles.len(), "found local bib files");

    base.bibtex = Some(BibtexSettings {
        documenteer_bibfile_cache_dir: BIBFILE_CACHE_DIR.into(),
        documenteer_bibfile_github_repos: vec![BibfileRepo {
            repo: "SPHEREx/spherex-tex".into(),
            git_ref: "main".into(),
            bibfiles: vec!["texmf/bibtex/bib/spherex.bib".into()],
        }],
        bibtex_bibfiles: bibfiles,
        bibtex_reference_style: "author_year".into(),
    });

    Ok(base)
}

/// `*.bib` files directly inside `dir`, sorted.
fn local_bibfiles(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SpherexSphinxError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SpherexSphinxError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "bib") {
            files.push(path.display().to_string());
        }
    }
    files.sort();
    Ok(files)
}
