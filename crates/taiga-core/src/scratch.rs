use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A per-pipeline scratch folder removed (best effort) when dropped.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create `<base>/<name>`, including missing parents.
    pub fn create(base: &Path, name: &str) -> io::Result<Self> {
        let path = base.join(name);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "cleaned up scratch folder"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clean up scratch folder");
            }
        }
    }
}
