//! Merging many files into the fewest valid files under capacity limits.
//!
//! Inputs are bucketed by file header (origin and destination). Inside a
//! bucket, entries are poured in input order into a chain of output files:
//! each entry joins the open batch with a matching header in the newest file
//! of the chain, and when adding it would exceed the line or dollar limit
//! the newest file is sealed and a fresh one is started. Entries whose trace
//! number was already placed for the same batch header are dropped.

use crate::batch::Batch;
use crate::entry::EntryDetail;
use crate::error::Result;
use crate::file::{batch_number, File};
use crate::iat::IatBatch;
use crate::options::{Conditions, ValidateOpts};
use crate::record::{BatchHeader, FileHeader};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Merges files using the default [`Conditions`].
pub fn merge_files(files: &[File]) -> Result<Vec<File>> {
    merge_files_with(files, Conditions::default())
}

/// Merges files so that every output respects `conditions`.
///
/// Every output is built and then field-validated with the options unioned
/// across its inputs, so a relaxed rule on one input relaxes it for the
/// whole output. Any failure aborts the whole merge and no output is
/// returned. Inputs are never modified.
pub fn merge_files_with(files: &[File], conditions: Conditions) -> Result<Vec<File>> {
    let mut buckets: Vec<Bucket> = Vec::new();

    for file in files {
        let bucket = pick_bucket(&mut buckets, &file.header);
        bucket.opts = bucket.opts.union(&file.validation());

        for batch in &file.batches {
            for entry in batch.entries() {
                bucket.add_entry(batch.header(), entry, &conditions);
            }
        }
        for batch in &file.iat_batches {
            bucket.add_iat_batch(batch, &conditions);
        }
    }

    let mut out = Vec::new();
    for bucket in buckets {
        let opts = bucket.opts;
        for pending in bucket.chain {
            if pending.is_empty() {
                continue;
            }
            out.push(pending.finish(opts)?);
        }
    }
    info!("Merged {} files into {}", files.len(), out.len());
    Ok(out)
}

/// All outputs for one file header, oldest first. The last file is open.
struct Bucket {
    header: FileHeader,
    chain: Vec<OutFile>,
    opts: ValidateOpts,
    /// Trace numbers already placed, per batch header identity.
    placed: BTreeMap<BatchHeader, BTreeSet<String>>,
    placed_iat: Vec<IatBatch>,
}

impl Bucket {
    fn new(header: &FileHeader) -> Self {
        Bucket {
            header: header.clone(),
            chain: vec![OutFile::new(header.clone())],
            opts: ValidateOpts::default(),
            placed: BTreeMap::new(),
            placed_iat: Vec::new(),
        }
    }

    fn open_file(&mut self) -> &mut OutFile {
        if self.chain.is_empty() {
            self.chain.push(OutFile::new(self.header.clone()));
        }
        let last = self.chain.len() - 1;
        &mut self.chain[last]
    }

    fn seal(&mut self, reason: &str) {
        debug!(
            "Sealing output file #{} for origin {} ({})",
            self.chain.len(),
            self.header.immediate_origin,
            reason
        );
        self.chain.push(OutFile::new(self.header.clone()));
    }

    /// Seals the open file when `lines` more lines and `amount` more cents would not fit.
    fn make_room(&mut self, lines: usize, amount: u64, conditions: &Conditions) {
        let open = self.open_file();
        if open.is_empty() {
            return;
        }
        let projected_lines = open.lines + lines;
        let projected_amount = open.amount.saturating_add(amount);
        if projected_lines > conditions.effective_max_lines() {
            self.seal("line limit");
        } else if conditions
            .effective_max_dollar_amount()
            .is_some_and(|max| projected_amount > max)
        {
            self.seal("dollar limit");
        }
    }

    fn add_entry(&mut self, header: &BatchHeader, entry: &EntryDetail, conditions: &Conditions) {
        let identity = header.identity();
        let seen = self
            .placed
            .get(&identity)
            .is_some_and(|traces| traces.contains(&entry.trace_number));
        if seen {
            debug!(
                "Dropping duplicate trace number {} in batch {}",
                entry.trace_number, header.company_name
            );
            return;
        }

        let open = self.open_file();
        let new_batch_lines = match find_out_batch(header, &open.batches) {
            Some(_) => 0,
            None => 2,
        };
        self.make_room(new_batch_lines + entry.line_count(), entry.amount, conditions);

        self.open_file().insert(header, entry.clone());
        self.placed
            .entry(identity)
            .or_default()
            .insert(entry.trace_number.clone());
    }

    fn add_iat_batch(&mut self, batch: &IatBatch, conditions: &Conditions) {
        if self.placed_iat.iter().any(|placed| placed == batch) {
            debug!("Dropping duplicate IAT batch #{}", batch.header.batch_number);
            return;
        }
        let amount = batch
            .entries
            .iter()
            .fold(0u64, |sum, e| sum.saturating_add(e.amount));
        let lines = batch.line_count();
        self.make_room(lines, amount, conditions);

        let open = self.open_file();
        open.iat_batches.push(batch.clone());
        open.lines += lines;
        open.amount = open.amount.saturating_add(amount);
        self.placed_iat.push(batch.clone());
    }
}

/// An output file under construction with its running line and dollar totals.
struct OutFile {
    header: FileHeader,
    batches: Vec<Batch>,
    iat_batches: Vec<IatBatch>,
    /// Unpadded physical line count, including file header and control.
    lines: usize,
    amount: u64,
}

impl OutFile {
    fn new(header: FileHeader) -> Self {
        OutFile {
            header,
            batches: Vec::new(),
            iat_batches: Vec::new(),
            lines: 2,
            amount: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.iat_batches.is_empty()
    }

    fn insert(&mut self, header: &BatchHeader, entry: EntryDetail) {
        let idx = match find_out_batch(header, &self.batches) {
            Some(idx) => idx,
            None => {
                let mut fresh = header.clone();
                fresh.batch_number = batch_number(self.batches.len());
                self.batches.push(Batch::new(fresh));
                self.lines += 2;
                self.batches.len() - 1
            }
        };
        self.lines += entry.line_count();
        self.amount = self.amount.saturating_add(entry.amount);
        self.batches[idx].add_entry(entry);
    }

    fn finish(self, opts: ValidateOpts) -> Result<File> {
        let mut file = File::new();
        file.set_header(self.header).set_validation(opts);
        for batch in self.batches {
            file.add_batch(batch);
        }
        let offset = file.batches.len();
        for (i, mut batch) in self.iat_batches.into_iter().enumerate() {
            batch.header.batch_number = batch_number(offset + i);
            file.add_iat_batch(batch);
        }
        file.build()?;
        file.validate_all()?;
        Ok(file)
    }
}

/// Finds the bucket whose header is mergeable with `header`, creating one if needed.
fn pick_bucket<'a>(buckets: &'a mut Vec<Bucket>, header: &FileHeader) -> &'a mut Bucket {
    let idx = match buckets
        .iter()
        .position(|b| b.header.is_mergeable_with(header))
    {
        Some(idx) => idx,
        None => {
            debug!(
                "New output chain for origin {} destination {}",
                header.immediate_origin, header.immediate_destination
            );
            buckets.push(Bucket::new(header));
            buckets.len() - 1
        }
    };
    &mut buckets[idx]
}

/// Position of the batch matching `header`, ignoring batch number.
fn find_out_batch(header: &BatchHeader, batches: &[Batch]) -> Option<usize> {
    batches.iter().position(|b| b.header().same_batch(header))
}
