//! Artifact emission.
//!
//! Emitters only see an assembled [`DispatchTable`]; they never touch
//! construction internals. All artifacts are rendered in memory first so a
//! failing render leaves no partial output behind.

use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::dispatch::DispatchTable;
use crate::log_info;

/// C source/header pair for the CBOR RPC runtime
pub mod c;
/// JSON descriptor
pub mod json;

pub use c::CEmitter;
pub use json::JsonEmitter;

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory
    pub file_name: String,
    /// Full file contents
    pub contents: String,
}

impl Artifact {
    /// Create an artifact
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), contents: contents.into() }
    }
}

/// Renders a dispatch table into output files.
pub trait Emitter {
    /// Render every file this emitter produces.
    fn render(&self, table: &DispatchTable) -> Result<Vec<Artifact>>;
}

/// Write rendered artifacts into `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)?;
        log_info!("wrote {} ({} bytes)", path.display(), artifact.contents.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifacts_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let artifacts = vec![Artifact::new("a.txt", "alpha\n"), Artifact::new("b.txt", "beta\n")];

        let written = write_artifacts(&dir, &artifacts).unwrap();

        assert_eq!(written, vec![dir.join("a.txt"), dir.join("b.txt")]);
        assert_eq!(std::fs::read_to_string(dir.join("b.txt")).unwrap(), "beta\n");
    }
}
