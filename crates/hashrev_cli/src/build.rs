//! `hashrev build` — revision a directory of assets.
//!
//! Drives the host side of the pipeline:
//! 1. Resolve configuration from `hashrev.toml` and CLI flags
//! 2. Read every file under the source directory into a record
//! 3. Push records through the revision engine, writing each forwarded
//!    record and handing it to the manifest builder
//! 4. Flush the engine to release deferred debug maps
//! 5. Flush the manifest builder and write the manifest

use std::path::Path;

use hashrev_common::{FileRecord, Transform};
use hashrev_config::ProjectConfig;
use hashrev_engine::{EngineOptions, RevisionEngine};
use hashrev_manifest::{FsManifestReader, ManifestBuilder, ManifestOptions};
use tracing::info;

use crate::pipeline::{discover_files, read_record, resolve_config, write_record};
use crate::{BuildArgs, GlobalArgs};

/// Effective settings after merging the config file with CLI flags.
#[derive(Debug)]
pub struct BuildSettings {
    /// Options for the revision engine.
    pub engine: EngineOptions,
    /// Options for the manifest builder, or `None` when disabled.
    pub manifest: Option<ManifestOptions>,
}

impl BuildSettings {
    /// Resolves settings; flags switch features on, never off, except
    /// `--no-manifest`.
    pub fn resolve(args: &BuildArgs, config: &ProjectConfig) -> Self {
        let engine = EngineOptions {
            hash_in_query: args.hash_in_query || config.revision.hash_in_query,
        };

        let manifest = (config.manifest.enabled && !args.no_manifest).then(|| {
            let path = args
                .manifest_path
                .clone()
                .unwrap_or_else(|| config.manifest.path.clone().into());
            ManifestOptions::with_path(path)
                .base(&args.out)
                .merge(args.merge || config.manifest.merge)
                .hash_in_query(args.hash_in_query || config.manifest.hash_in_query)
        });

        Self { engine, manifest }
    }
}

/// Counters reported at the end of a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Records written, manifest excluded.
    pub written: usize,
    /// Records that were renamed.
    pub revisioned: usize,
    /// Whether a manifest was written.
    pub manifest: bool,
}

/// Runs the `hashrev build` command.
///
/// Returns exit code 0 on success, 1 when the source directory is missing.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if !args.src.is_dir() {
        eprintln!("error: source directory {} not found", args.src.display());
        return Ok(1);
    }

    let config = resolve_config(global, &args.src)?;
    let settings = BuildSettings::resolve(args, &config);

    if !global.quiet {
        eprintln!(
            "  Revisioning {} -> {}",
            args.src.display(),
            args.out.display()
        );
    }

    let summary = build(&args.src, &args.out, settings, global)?;

    if !global.quiet {
        eprintln!(
            "     Written {} file(s), {} revisioned",
            summary.written, summary.revisioned
        );
        if summary.manifest {
            eprintln!("    Manifest updated");
        }
    }
    Ok(0)
}

/// Revisions every file under `src` into `out`.
pub fn build(
    src: &Path,
    out: &Path,
    settings: BuildSettings,
    global: &GlobalArgs,
) -> Result<BuildSummary, Box<dyn std::error::Error>> {
    let files = discover_files(src)?;
    info!(count = files.len(), src = %src.display(), "discovered files");

    let mut engine = RevisionEngine::new(settings.engine);
    let mut manifest = settings
        .manifest
        .map(|options| ManifestBuilder::new(options, FsManifestReader::new(out)));
    let mut summary = BuildSummary::default();

    for path in &files {
        let record = read_record(src, path)?;
        if let Some(forwarded) = engine.transform(record)? {
            emit(out, forwarded, manifest.as_mut(), &mut summary, global)?;
        }
    }
    for deferred in engine.flush()? {
        emit(out, deferred, manifest.as_mut(), &mut summary, global)?;
    }

    if let Some(builder) = manifest.as_mut() {
        for record in builder.flush()? {
            let written = write_record(out, &record)?;
            info!(path = %written.display(), "wrote manifest");
            summary.manifest = true;
        }
    }
    Ok(summary)
}

/// Writes one engine output and records it in the manifest.
fn emit(
    out: &Path,
    record: FileRecord,
    manifest: Option<&mut ManifestBuilder<FsManifestReader>>,
    summary: &mut BuildSummary,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    write_record(out, &record)?;
    summary.written += 1;

    if let Some(original) = &record.original_path {
        summary.revisioned += 1;
        if global.verbose && !global.quiet {
            eprintln!(
                "     {} -> {}",
                hashrev_common::rel_path(src_base(&record), original),
                record.relative()
            );
        }
    }
    if let Some(builder) = manifest {
        builder.add(&record);
    }
    Ok(())
}

fn src_base(record: &FileRecord) -> &Path {
    record.original_base.as_deref().unwrap_or(&record.base)
}
