//! The push-based stage contract shared by every pipeline component.

use crate::file::FileRecord;

/// A pipeline stage that consumes file records one at a time.
///
/// The host calls [`transform`](Transform::transform) once per record in
/// arrival order, then [`flush`](Transform::flush) exactly once when the
/// input sequence has ended. Stages own all of their per-run state; a stage
/// is never shared across runs.
pub trait Transform {
    /// Fatal error type that aborts the run.
    type Error: std::error::Error;

    /// Processes one record, returning it (possibly modified) when it should
    /// be forwarded downstream immediately.
    fn transform(&mut self, record: FileRecord) -> Result<Option<FileRecord>, Self::Error>;

    /// Signals end of input, returning any records held back until now.
    fn flush(&mut self) -> Result<Vec<FileRecord>, Self::Error>;
}

/// Pushes every record through `stage` and then flushes it.
///
/// Returns all forwarded records in emission order. Stops at the first
/// fatal error.
pub fn run_to_end<T, I>(stage: &mut T, records: I) -> Result<Vec<FileRecord>, T::Error>
where
    T: Transform,
    I: IntoIterator<Item = FileRecord>,
{
    let mut out = Vec::new();
    for record in records {
        if let Some(forwarded) = stage.transform(record)? {
            out.push(forwarded);
        }
    }
    out.extend(stage.flush()?);
    Ok(out)
}
