//! Generation pipeline: key set -> perfect hash -> dispatch table -> artifacts.

use std::path::PathBuf;
use std::time::Instant;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::dispatch::DispatchTable;
use crate::emit::{write_artifacts, Artifact, CEmitter, Emitter, JsonEmitter};
use crate::keyset::KeySet;
use crate::mph::{construct, MphConfig};
use crate::{log_debug, log_info};

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The verified table
    pub table: DispatchTable,
    /// Salt pairs discarded before success
    pub restarts: usize,
    /// Files written (empty on a dry run)
    pub written: Vec<PathBuf>,
}

/// One-shot generator driven by a [`Config`].
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
}

impl Generator {
    /// Create a generator; the configuration is validated up front.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build and verify the dispatch table without touching the filesystem.
    pub fn build_table(&self) -> Result<DispatchTable> {
        Ok(self.build()?.0)
    }

    /// Render every configured artifact for `table`.
    pub fn render(&self, table: &DispatchTable) -> Result<Vec<Artifact>> {
        let output = &self.config.output;
        let mut artifacts = CEmitter::from(output).render(table)?;
        if output.emit_descriptor {
            let json = JsonEmitter { file_name: output.descriptor_name.clone() };
            artifacts.extend(json.render(table)?);
        }
        Ok(artifacts)
    }

    /// Build, render and write. Nothing is written unless every stage succeeds.
    pub fn run(&self) -> Result<GenerationReport> {
        let (table, restarts) = self.build()?;
        let artifacts = self.render(&table)?;

        let written = if self.config.output.dry_run {
            log_info!("dry run: {} artifacts rendered, none written", artifacts.len());
            Vec::new()
        } else {
            write_artifacts(&self.config.output.dir, &artifacts)?
        };

        Ok(GenerationReport { table, restarts, written })
    }

    fn build(&self) -> Result<(DispatchTable, usize)> {
        let started = Instant::now();

        let keyset = KeySet::build(&self.config.reserved, &self.config.methods)?;
        let mph = MphConfig::from(&self.config.hash);
        let construction = construct(&keyset.names(), &mph)?;
        let restarts = construction.restarts;
        let table = DispatchTable::assemble(&keyset, construction)?;

        log_info!(
            "dispatch table ready: {} methods, {} buckets, seed {}, {} restarts",
            table.len(),
            table.params().bucket_count(),
            table.params().seed,
            restarts
        );
        log_debug!("generation took {:?}", started.elapsed());

        Ok((table, restarts))
    }
}
