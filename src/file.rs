//! File container: header, batches, control and validation options.

use crate::batch::Batch;
use crate::control;
use crate::error::Result;
use crate::iat::IatBatch;
use crate::options::ValidateOpts;
use crate::record::{FileControl, FileHeader};

/// A complete ACH file.
///
/// # Lifecycle
///
/// Start from [`File::new`], set the header, add batches, then call
/// [`build`](File::build) to derive every control record bottom-up.
/// Mutating a batch afterwards leaves the file control stale until the
/// next build.
#[derive(Debug, Clone, Default)]
pub struct File {
    pub header: FileHeader,
    pub batches: Vec<Batch>,
    pub iat_batches: Vec<IatBatch>,
    pub control: FileControl,
    validate_opts: ValidateOpts,
}

impl File {
    /// Creates an empty file with strict validation.
    pub fn new() -> Self {
        File::default()
    }

    /// Replaces the file header. Nothing is validated until `build`.
    pub fn set_header(&mut self, header: FileHeader) -> &mut Self {
        self.header = header;
        self
    }

    /// Appends a batch as is; call `create` or `build` to refresh the file control.
    pub fn add_batch(&mut self, batch: Batch) -> &mut Self {
        self.batches.push(batch);
        self
    }

    pub fn add_iat_batch(&mut self, batch: IatBatch) -> &mut Self {
        self.iat_batches.push(batch);
        self
    }

    pub fn validation(&self) -> ValidateOpts {
        self.validate_opts
    }

    pub fn set_validation(&mut self, opts: ValidateOpts) -> &mut Self {
        self.validate_opts = opts;
        self
    }

    /// Recomputes all control records without validating the header.
    pub fn create(&mut self) -> Result<()> {
        control::create(self)
    }

    /// Validates the header, then recomputes all control records.
    pub fn build(&mut self) -> Result<()> {
        control::build(self)
    }

    /// Compares the file control against values recomputed from the batches.
    pub fn validate(&self) -> Result<()> {
        control::validate(self)
    }

    /// Field-level checks on every record followed by [`validate`](File::validate).
    pub fn validate_all(&self) -> Result<()> {
        control::validate_all(self)
    }

    /// Physical record count before block padding.
    pub fn line_count(&self) -> usize {
        2 + self.batches.iter().map(Batch::line_count).sum::<usize>()
            + self
                .iat_batches
                .iter()
                .map(IatBatch::line_count)
                .sum::<usize>()
    }

    /// Number of entry detail records across domestic batches.
    pub fn entry_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    /// Trace numbers of every domestic entry, in output order.
    pub fn trace_numbers(&self) -> impl Iterator<Item = &str> {
        self.batches
            .iter()
            .flat_map(|b| b.entries().iter().map(|e| e.trace_number.as_str()))
    }

    /// Collapses batches whose headers match (ignoring batch number) into one.
    ///
    /// Entries are unioned by trace number, first seen wins. Batch numbers
    /// are reassigned by position and the result has its controls rebuilt.
    pub fn flatten_batches(&self) -> Result<File> {
        let mut batches: Vec<Batch> = Vec::new();
        for batch in &self.batches {
            let existing = batches
                .iter_mut()
                .find(|b| b.header().same_batch(batch.header()));
            match existing {
                Some(target) => {
                    for entry in batch.entries() {
                        if !target.contains(&entry.trace_number) {
                            target.add_entry(entry.clone());
                        }
                    }
                }
                None => batches.push(batch.clone()),
            }
        }

        let mut out = File::new();
        out.set_header(self.header.clone())
            .set_validation(self.validate_opts);
        for (i, mut batch) in batches.into_iter().enumerate() {
            batch.header_mut().batch_number = batch_number(i);
            out.add_batch(batch);
        }
        let offset = out.batches.len();
        for (i, batch) in self.iat_batches.iter().enumerate() {
            let mut batch = batch.clone();
            batch.header.batch_number = batch_number(offset + i);
            out.add_iat_batch(batch);
        }
        out.create()?;
        Ok(out)
    }
}

/// One-based batch number for the batch at `position`.
pub(crate) fn batch_number(position: usize) -> u32 {
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}
