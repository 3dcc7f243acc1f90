//! Configuration derivation for spherexsphinx.
//!
//! This crate turns a [`ResolvedConfiguration`](spherexsphinx_shared::ResolvedConfiguration)
//! into the generator's settings mapping, resolving static assets and
//! repository metadata along the way.

pub mod assets;
pub mod derive;
pub mod repository;
pub mod settings;
pub mod technote;

pub use assets::{AssetBundle, get_asset_path};
pub use derive::{
    EditSourceLink, apply_cross_references, configure_edit_source_link, extend_extensions,
    parse_repository_url,
};
pub use repository::{GitRepositoryLookup, RepositoryLookup, relative_doc_path};
pub use settings::{DerivationContext, base_extensions, base_intersphinx, build_settings};
pub use technote::technote_settings;
