//! Static asset bundle shipped with the package.
//!
//! Assets live in an `assets/` directory and are exposed to the generator
//! through `html_static_path`. Installs place it next to the binary or under
//! `share/spherexsphinx/`; builds from source use the crate's own directory.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use spherexsphinx_shared::{Result, SpherexSphinxError};

/// Environment variable overriding the installed asset directory.
pub const ASSETS_DIR_ENV: &str = "SPHEREXSPHINX_ASSETS_DIR";

/// Dark-background logo.
pub const LOGO_DARK: &str = "spherex-logo-color-dark.png";

/// Light-background logo.
pub const LOGO_LIGHT: &str = "spherex-logo-color-light.png";

/// Stylesheet layered over the theme.
pub const STYLESHEET: &str = "spherex.css";

/// A directory of named static files.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    root: PathBuf,
}

impl AssetBundle {
    /// Bundle rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundle installed with this package.
    ///
    /// Lookup order: [`ASSETS_DIR_ENV`], then `assets/` beside the running
    /// executable, then `../share/spherexsphinx/assets` relative to it, then
    /// the crate directory recorded at build time. The last one only exists
    /// on the machine that built the binary.
    pub fn installed() -> Self {
        let env_dir = std::env::var_os(ASSETS_DIR_ENV).map(PathBuf::from);
        let exe = std::env::current_exe().ok();
        Self::new(locate_bundle(env_dir, exe.as_deref()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the named asset.
    ///
    /// Fails with [`SpherexSphinxError::AssetNotFound`] when the file is not
    /// in the bundle; a path is never returned for a missing file. Names must
    /// be a single file name, so nothing outside the bundle resolves.
    pub fn get_asset_path(&self, name: &str) -> Result<PathBuf> {
        let candidate = self.root.join(name);
        let path = std::path::absolute(&candidate).unwrap_or(candidate);

        let mut components = Path::new(name).components();
        let single_file = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        if !single_file || !path.is_file() {
            return Err(SpherexSphinxError::AssetNotFound {
                name: name.to_string(),
                path,
            });
        }

        debug!(name, path = %path.display(), "resolved asset");
        Ok(path)
    }
}

impl Default for AssetBundle {
    fn default() -> Self {
        Self::installed()
    }
}

fn locate_bundle(env_dir: Option<PathBuf>, exe: Option<&Path>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }

    if let Some(bin_dir) = exe.and_then(Path::parent) {
        let candidates = [
            bin_dir.join("assets"),
            bin_dir.join("../share/spherexsphinx/assets"),
        ];
        if let Some(dir) = candidates.into_iter().find(|d| d.is_dir()) {
            debug!(dir = %dir.display(), "using asset bundle beside executable");
            return dir;
        }
    }

    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Resolve a named asset in the installed bundle.
pub fn get_asset_path(name: &str) -> Result<PathBuf> {
    AssetBundle::installed().get_asset_path(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_assets_resolve() {
        for name in [LOGO_LIGHT, LOGO_DARK, STYLESHEET] {
            let path = get_asset_path(name).expect("asset exists");
            assert!(path.is_absolute());
            assert!(path.ends_with(name));
            assert!(path.is_file());
        }
    }

    #[test]
    fn missing_asset_fails() {
        let err = get_asset_path("nonexistant.txt").unwrap_err();
        match err {
            SpherexSphinxError::AssetNotFound { name, path } => {
                assert_eq!(name, "nonexistant.txt");
                assert!(!path.exists());
            }
            other => panic!("expected AssetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn names_cannot_escape_the_bundle() {
        let bundle = AssetBundle::installed();
        assert!(bundle.get_asset_path("../Cargo.toml").is_err());
        assert!(bundle.get_asset_path("").is_err());
    }

    #[test]
    fn env_override_takes_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = locate_bundle(Some(dir.path().to_path_buf()), None);
        assert_eq!(root, dir.path());
    }

    #[test]
    fn bundle_beside_relocated_executable() {
        let prefix = tempfile::tempdir().expect("tempdir");
        let bin = prefix.path().join("bin");
        let share = prefix.path().join("share/spherexsphinx/assets");
        std::fs::create_dir_all(&bin).expect("mkdir bin");
        std::fs::create_dir_all(&share).expect("mkdir share");
        let exe = bin.join("spherexsphinx");

        let root = locate_bundle(Some(PathBuf::new()), Some(&exe));
        assert_eq!(root, bin.join("../share/spherexsphinx/assets"));

        std::fs::create_dir(bin.join("assets")).expect("mkdir assets");
        assert_eq!(locate_bundle(None, Some(&exe)), bin.join("assets"));
    }

    #[test]
    fn falls_back_to_crate_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = locate_bundle(None, Some(&dir.path().join("spherexsphinx")));
        assert_eq!(root, Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
    }

    #[test]
    fn custom_bundle_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("extra.css"), "body {}").expect("write");
        let bundle = AssetBundle::new(dir.path());
        let path = bundle.get_asset_path("extra.css").expect("resolve");
        assert!(path.ends_with("extra.css"));
    }
}
