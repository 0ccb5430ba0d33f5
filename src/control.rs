//! Control record reconciliation.
//!
//! Aggregates flow bottom-up: entries feed each batch control, batch
//! controls feed the file control. `build` writes the aggregates,
//! `validate` recomputes them and reports the first field that disagrees.

use crate::entry::EntryDetail;
use crate::error::{AchError, Result};
use crate::file::File;
use crate::iat::IatEntryDetail;
use crate::record::{BatchControl, FileControl};
use log::debug;

/// Entry hashes keep only their ten low-order digits.
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Physical lines per block; files are padded to a whole number of blocks.
pub const BLOCKING_FACTOR: usize = 10;

/// Aggregates over a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a EntryDetail>) -> Self {
        let mut totals = Totals::default();
        for entry in entries {
            totals.count(
                entry.line_count(),
                entry.hash_value(),
                entry.amount,
                entry.is_debit(),
                entry.is_credit(),
            );
        }
        totals
    }

    pub fn from_iat_entries(entries: &[IatEntryDetail]) -> Self {
        let mut totals = Totals::default();
        for entry in entries {
            totals.count(
                entry.line_count(),
                entry.hash_value(),
                entry.amount,
                entry.is_debit(),
                entry.is_credit(),
            );
        }
        totals
    }

    /// Sums the aggregates stored in a batch control.
    pub fn from_control(control: &BatchControl) -> Self {
        Totals {
            entry_addenda_count: control.entry_addenda_count,
            entry_hash: control.entry_hash % ENTRY_HASH_MODULUS,
            total_debit: control.total_debit_entry_dollar_amount,
            total_credit: control.total_credit_entry_dollar_amount,
        }
    }

    fn count(&mut self, records: usize, hash: u64, amount: u64, debit: bool, credit: bool) {
        self.entry_addenda_count = self
            .entry_addenda_count
            .saturating_add(u32::try_from(records).unwrap_or(u32::MAX));
        self.entry_hash = (self.entry_hash + hash % ENTRY_HASH_MODULUS) % ENTRY_HASH_MODULUS;
        if debit {
            self.total_debit = self.total_debit.saturating_add(amount);
        }
        if credit {
            self.total_credit = self.total_credit.saturating_add(amount);
        }
    }

    fn merge(&mut self, other: &Totals) {
        self.entry_addenda_count = self
            .entry_addenda_count
            .saturating_add(other.entry_addenda_count);
        self.entry_hash = (self.entry_hash + other.entry_hash) % ENTRY_HASH_MODULUS;
        self.total_debit = self.total_debit.saturating_add(other.total_debit);
        self.total_credit = self.total_credit.saturating_add(other.total_credit);
    }
}

/// Number of blocks needed for `lines` physical lines, rounding up.
pub fn block_count(lines: usize) -> u32 {
    u32::try_from(lines.div_ceil(BLOCKING_FACTOR)).unwrap_or(u32::MAX)
}

/// Compares a batch control against totals computed from its entries.
pub fn check_batch_control(batch_number: u32, control: &BatchControl, totals: &Totals) -> Result<()> {
    let checks = [
        (
            "EntryAddendaCount",
            u64::from(totals.entry_addenda_count),
            u64::from(control.entry_addenda_count),
        ),
        (
            "TotalDebitEntryDollarAmount",
            totals.total_debit,
            control.total_debit_entry_dollar_amount,
        ),
        (
            "TotalCreditEntryDollarAmount",
            totals.total_credit,
            control.total_credit_entry_dollar_amount,
        ),
        ("EntryHash", totals.entry_hash, control.entry_hash),
    ];
    for (field_name, calculated, observed) in checks {
        if calculated != observed {
            return Err(AchError::BatchMismatch {
                batch_number,
                field_name,
                calculated,
                observed,
            });
        }
    }
    Ok(())
}

/// The file control a file's current batch controls and structure imply.
pub fn expected_control(file: &File) -> FileControl {
    let mut totals = Totals::default();
    for batch in &file.batches {
        totals.merge(&Totals::from_control(batch.control()));
    }
    for batch in &file.iat_batches {
        totals.merge(&Totals::from_control(&batch.control));
    }
    FileControl {
        batch_count: u32::try_from(file.batches.len() + file.iat_batches.len())
            .unwrap_or(u32::MAX),
        block_count: block_count(file.line_count()),
        entry_addenda_count: totals.entry_addenda_count,
        entry_hash: totals.entry_hash,
        total_debit_entry_dollar_amount_in_file: totals.total_debit,
        total_credit_entry_dollar_amount_in_file: totals.total_credit,
    }
}

/// Recomputes every batch control, then the file control.
///
/// Only a file without any batch is rejected.
pub fn create(file: &mut File) -> Result<()> {
    if file.batches.is_empty() && file.iat_batches.is_empty() {
        return Err(AchError::file("Batchs", "must have []*Batches to be built"));
    }
    for batch in &mut file.batches {
        batch.create();
    }
    for batch in &mut file.iat_batches {
        batch.create();
    }
    file.control = expected_control(file);
    debug!(
        "Built file control: {} batches, {} blocks, {} entry/addenda records",
        file.control.batch_count, file.control.block_count, file.control.entry_addenda_count
    );
    Ok(())
}

/// Validates the file header, then recomputes all control records.
pub fn build(file: &mut File) -> Result<()> {
    if !file.validation().skip_all {
        file.header.validate()?;
    }
    create(file)
}

/// Reports the first file control field that differs from the recomputed value.
///
/// Fields are checked in a fixed order: BatchCount, EntryAddendaCount,
/// debit total, credit total, EntryHash, BlockCount.
pub fn validate(file: &File) -> Result<()> {
    if file.validation().skip_all {
        return Ok(());
    }
    let expected = expected_control(file);
    let actual = &file.control;
    let checks = [
        (
            "BatchCount",
            u64::from(expected.batch_count),
            u64::from(actual.batch_count),
        ),
        (
            "EntryAddendaCount",
            u64::from(expected.entry_addenda_count),
            u64::from(actual.entry_addenda_count),
        ),
        (
            "TotalDebitEntryDollarAmountInFile",
            expected.total_debit_entry_dollar_amount_in_file,
            actual.total_debit_entry_dollar_amount_in_file,
        ),
        (
            "TotalCreditEntryDollarAmountInFile",
            expected.total_credit_entry_dollar_amount_in_file,
            actual.total_credit_entry_dollar_amount_in_file,
        ),
        ("EntryHash", expected.entry_hash, actual.entry_hash),
        (
            "BlockCount",
            u64::from(expected.block_count),
            u64::from(actual.block_count),
        ),
    ];
    for (field_name, calculated, observed) in checks {
        if calculated != observed {
            return Err(AchError::Mismatch {
                field_name,
                calculated,
                observed,
            });
        }
    }
    Ok(())
}

/// Field-level checks on every batch in order, then the file header and
/// control, then the aggregate comparison of [`validate`].
pub fn validate_all(file: &File) -> Result<()> {
    let opts = file.validation();
    if opts.skip_all {
        return Ok(());
    }
    for batch in &file.batches {
        batch.validate(&opts)?;
    }
    for batch in &file.iat_batches {
        batch.validate()?;
    }
    file.header.validate()?;
    file.control.validate()?;
    validate(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::partial_block(5, 1)]
    #[case::exact_block(10, 1)]
    #[case::one_over(11, 2)]
    #[case::two_blocks(20, 2)]
    #[case::large(10_001, 1_001)]
    fn test_block_count(#[case] lines: usize, #[case] blocks: u32) {
        assert_eq!(block_count(lines), blocks);
    }

    #[test]
    fn test_entry_hash_wraps() {
        let entries: Vec<EntryDetail> = (0..101)
            .map(|i| EntryDetail {
                transaction_code: 22,
                rdfi_identification: "99999999".to_string(),
                amount: 1,
                trace_number: format!("{:015}", i + 1),
                ..Default::default()
            })
            .collect();

        let totals = Totals::from_entries(&entries);
        assert_eq!(totals.entry_hash, (101 * 99_999_999) % ENTRY_HASH_MODULUS);
        assert_eq!(totals.entry_hash, 99_999_899);
        assert_eq!(totals.total_credit, 101);
        assert_eq!(totals.total_debit, 0);
    }

    #[test]
    fn test_check_batch_control_reports_first_mismatch() {
        let totals = Totals {
            entry_addenda_count: 2,
            entry_hash: 10,
            total_debit: 5,
            total_credit: 0,
        };
        let control = BatchControl {
            entry_addenda_count: 2,
            entry_hash: 11,
            total_debit_entry_dollar_amount: 6,
            ..Default::default()
        };
        let err = check_batch_control(3, &control, &totals).unwrap_err();
        assert_eq!(err.field_name(), Some("TotalDebitEntryDollarAmount"));
        assert!(err.to_string().starts_with("batch #3"));
    }
}
