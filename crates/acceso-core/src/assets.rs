//! Loading of bundled assets: the serialized model and its label table.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AssetError;

/// Read-only store of bundled assets rooted at a directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at `dir`.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True if the named asset exists.
    pub fn contains(&self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(AssetError::Missing {
                name: name.to_string(),
            });
        }
        Ok(path)
    }

    /// Read a named asset fully into memory.
    ///
    /// One read, no incremental copies; the returned buffer is handed to the
    /// inference backend as-is.
    pub fn read_bytes(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(name)?;
        let bytes = std::fs::read(&path)?;
        debug!("Read asset {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }

    /// Load a newline-delimited label table.
    ///
    /// Lines are trimmed; empty lines are skipped. File order is model
    /// output order, so the returned length sizes the expected output
    /// vector.
    pub fn load_labels(&self, name: &str) -> Result<Vec<String>, AssetError> {
        let path = self.resolve(name)?;
        let content = std::fs::read_to_string(&path)?;

        let labels: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(labels)
    }

    /// Load the serialized model and build an inference session for it.
    ///
    /// `input_shape` pins the session to the preprocessor's tensor shape.
    /// A missing file is `AssetError::Missing`; bytes that do not parse as a
    /// model are `AssetError::Corrupt`.
    #[cfg(feature = "tract")]
    pub fn load_model(
        &self,
        name: &str,
        input_shape: &[usize],
    ) -> Result<acceso_inference::TractBackend, AssetError> {
        let bytes = self.read_bytes(name)?;

        acceso_inference::TractBackend::from_bytes(&bytes, input_shape).map_err(|e| {
            AssetError::Corrupt {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })
    }
}
