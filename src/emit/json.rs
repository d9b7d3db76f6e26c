//! JSON descriptor of the dispatch table.
//!
//! Carries the seed, salts, displacements and every entry so other tooling can
//! rebuild or audit the table without parsing C.

use super::{Artifact, Emitter};
use crate::core::error::Result;
use crate::dispatch::DispatchTable;

/// Writes the dispatch table as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonEmitter {
    /// Output file name
    pub file_name: String,
}

impl Emitter for JsonEmitter {
    fn render(&self, table: &DispatchTable) -> Result<Vec<Artifact>> {
        let mut contents = serde_json::to_string_pretty(table)?;
        contents.push('\n');
        Ok(vec![Artifact::new(self.file_name.as_str(), contents)])
    }
}
