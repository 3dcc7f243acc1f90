//! Derivation primitives: merge declared values into generator collections
//! and compute edit-source link metadata.
//!
//! Merges are pure: they take the generator's base collection and return a
//! new one. Precedence is last-write-wins.

use std::path::Path;

use tracing::{debug, instrument};
use url::Url;

use spherexsphinx_shared::{
    CrossReferenceTargets, ExtensionList, IntersphinxMapping, IntersphinxTarget, ProjectMetadata,
    Result, Settings, SpherexSphinxError,
};

use crate::repository::{RepositoryLookup, relative_doc_path};

/// Merge declared cross-reference targets over `base`.
///
/// Every declared name maps to `(url, None)`. Declared entries override base
/// entries of the same name, and a later declaration overrides an earlier one.
pub fn apply_cross_references(
    targets: &CrossReferenceTargets,
    base: &IntersphinxMapping,
) -> IntersphinxMapping {
    let mut merged = base.clone();
    for (name, url) in targets.iter() {
        merged.insert(name.to_string(), IntersphinxTarget::new(url.as_str()));
    }
    merged
}

/// `base` followed by the declared extensions, order and duplicates kept.
pub fn extend_extensions(extensions: &ExtensionList, base: &[String]) -> Vec<String> {
    base.iter()
        .chain(extensions.as_slice())
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Edit-source link
// ---------------------------------------------------------------------------

/// Where "edit this page" links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSourceLink {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Docs directory relative to the repository root.
    pub doc_path: String,
}

impl EditSourceLink {
    /// Enable the edit button and fill the page context.
    ///
    /// Themes without an edit button only receive the page context.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(options) = settings.pydata_theme_options_mut() {
            options.use_edit_page_button = true;
        }
        let ctx = &mut settings.html_context;
        ctx.github_user = Some(self.owner.clone());
        ctx.github_repo = Some(self.repo.clone());
        ctx.github_version = Some(self.branch.clone());
        ctx.doc_path = Some(self.doc_path.clone());
    }
}

/// Split a repository URL into `(owner, repository)`.
///
/// A trailing `.git` is stripped from the repository segment.
pub fn parse_repository_url(url: &Url) -> Result<(String, String)> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let unparsable = || {
        SpherexSphinxError::configuration(format!(
            "could not parse owner and repository from github_url {url}"
        ))
    };

    let [owner, repo, ..] = segments.as_slice() else {
        return Err(unparsable());
    };
    let repo = repo.strip_suffix(".git").unwrap_or(*repo);
    if repo.is_empty() {
        return Err(unparsable());
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// Compute edit-source link metadata for docs built from `docs_dir`.
#[instrument(skip_all, fields(docs_dir = %docs_dir.display()))]
pub fn configure_edit_source_link(
    project: &ProjectMetadata,
    docs_dir: &Path,
    repository: &dyn RepositoryLookup,
) -> Result<EditSourceLink> {
    let url = project
        .repository_url()
        .ok_or_else(|| SpherexSphinxError::configuration("repository_url not set"))?;

    let (owner, repo) = parse_repository_url(url.parsed())?;
    let root = repository.repository_root(docs_dir)?;
    let doc_path = relative_doc_path(docs_dir, &root)?;

    debug!(%owner, %repo, %doc_path, "configured edit-source link");

    Ok(EditSourceLink {
        owner,
        repo,
        branch: project.default_branch().to_string(),
        doc_path,
    })
}
