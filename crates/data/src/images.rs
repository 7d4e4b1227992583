use cropmatch_core::ImageRef;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Turns a catalog image path into a reference the presentation layer can load.
pub trait ImageResolver {
    fn resolve(&self, image_path: &str) -> Option<ImageRef>;
}

/// Looks images up under an asset directory. Paths may omit the extension.
#[derive(Debug, Clone)]
pub struct AssetDirResolver {
    root: PathBuf,
}

impl AssetDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, image_path: &str) -> Vec<PathBuf> {
        let base = self.root.join(image_path);
        let mut out = vec![base.clone()];
        if base.extension().is_none() {
            for ext in IMAGE_EXTENSIONS {
                out.push(base.with_extension(ext));
            }
        }
        out
    }
}

impl ImageResolver for AssetDirResolver {
    fn resolve(&self, image_path: &str) -> Option<ImageRef> {
        let trimmed = image_path.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.candidates(trimmed)
            .into_iter()
            .find(|path| path.is_file())
            .map(|path| ImageRef::new(path.to_string_lossy().into_owned()))
    }
}

/// Resolver over a fixed set of known paths, for headless use and tests.
#[derive(Debug, Clone, Default)]
pub struct KnownImages {
    paths: HashSet<String>,
}

impl KnownImages {
    pub fn new<I, T>(paths: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl ImageResolver for KnownImages {
    fn resolve(&self, image_path: &str) -> Option<ImageRef> {
        let trimmed = image_path.trim();
        self.paths
            .contains(trimmed)
            .then(|| ImageRef::new(trimmed))
    }
}
