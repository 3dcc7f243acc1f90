//! Shared types, error model, and configuration for spherexsphinx.
//!
//! This crate is the foundation depended on by all other spherexsphinx crates.
//! It provides:
//! - [`SpherexSphinxError`]: the unified error type
//! - The declarative configuration schema ([`ResolvedConfiguration`], [`load`])
//! - The settings mapping handed to the generator ([`Settings`])

pub mod config;
pub mod error;
pub mod settings;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CONFIG_FILE_NAME, COPYRIGHT_HOLDER, CrossReferenceTargets, DeclaredUrl, ExtensionList,
    ProjectMetadata, ResolvedConfiguration, SphinxOptions, config_file_path, default_copyright,
    load, load_config, load_config_from, validate,
};
pub use error::{Result, SpherexSphinxError, Violation};
pub use settings::{
    BibfileRepo, BibtexSettings, HtmlContext, IconLink, IntersphinxMapping, IntersphinxTarget,
    LogoOptions, NapoleonSettings, PyDataThemeOptions, Settings, TechnoteThemeOptions,
    ThemeOptions,
};

/// Version of the spherexsphinx packages, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
        assert_ne!(VERSION, "0.0.0");
    }
}
