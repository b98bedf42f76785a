//! Conformance test helpers for the hashrev pipeline.
//!
//! Provides a reference host that pushes in-memory file records through the
//! revision engine and the manifest builder and returns structured results
//! for assertion in integration tests.

#![warn(missing_docs)]

use hashrev_common::{run_to_end, FileRecord, Transform};
use hashrev_engine::{EngineOptions, RevError, RevisionEngine};
use hashrev_manifest::{ManifestBuilder, ManifestError, ManifestOptions, ManifestReader};

/// Base directory of every record built by [`file`].
pub const BASE: &str = "/build";

/// Result of running records through the engine and the manifest builder.
#[derive(Debug)]
pub struct PipelineResult {
    /// Records emitted by the revision engine, in emission order.
    pub files: Vec<FileRecord>,
    /// The emitted manifest record, if any.
    pub manifest: Option<FileRecord>,
}

impl PipelineResult {
    /// Returns the manifest contents as text.
    pub fn manifest_text(&self) -> Option<&str> {
        self.manifest
            .as_ref()
            .and_then(FileRecord::bytes)
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns the relative paths of the emitted files.
    pub fn relative_paths(&self) -> Vec<String> {
        self.files.iter().map(FileRecord::relative).collect()
    }

    /// Finds the emitted record whose original relative path is `original`.
    pub fn by_original(&self, original: &str) -> Option<&FileRecord> {
        let wanted = std::path::Path::new(BASE).join(original);
        self.files
            .iter()
            .find(|r| r.original_path.as_deref() == Some(wanted.as_path()))
    }
}

/// A fatal pipeline failure from either stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The revision engine aborted the run.
    #[error(transparent)]
    Rev(#[from] RevError),
    /// The manifest builder aborted the run.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Creates an in-memory record at `BASE/<relative>`.
pub fn file(relative: &str, contents: &str) -> FileRecord {
    FileRecord::buffer(BASE, format!("{BASE}/{relative}"), contents)
}

/// Runs records through engine and manifest builder with the given options.
pub fn full_pipeline_with<R: ManifestReader>(
    inputs: Vec<FileRecord>,
    engine_options: EngineOptions,
    manifest_options: ManifestOptions,
    reader: R,
) -> Result<PipelineResult, PipelineError> {
    let mut engine = RevisionEngine::new(engine_options);
    let files = run_to_end(&mut engine, inputs)?;

    let mut builder = ManifestBuilder::new(manifest_options, reader);
    for record in &files {
        builder.add(record);
    }
    let manifest = builder.flush()?.into_iter().next();
    Ok(PipelineResult { files, manifest })
}

/// Runs records through the pipeline with default options and no prior manifest.
pub fn full_pipeline(inputs: Vec<FileRecord>) -> Result<PipelineResult, PipelineError> {
    full_pipeline_with(
        inputs,
        EngineOptions::default(),
        ManifestOptions::default(),
        hashrev_manifest::MemoryManifestReader::new(),
    )
}
