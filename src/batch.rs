//! Batch container: a header, its derived control, and entries keyed by trace number.

use crate::control::{self, Totals};
use crate::entry::EntryDetail;
use crate::error::{AchError, Result};
use crate::options::ValidateOpts;
use crate::record::{service_class, BatchControl, BatchHeader};
use std::collections::BTreeMap;

/// An ordered, trace-number-keyed collection of entries.
///
/// # Invariants
///
/// - No two entries share a trace number
/// - Iteration follows first-insertion order, so output is reproducible
#[derive(Debug, Clone, Default)]
pub struct Batch {
    header: BatchHeader,
    control: BatchControl,
    entries: Vec<EntryDetail>,
    /// Trace number to position in `entries`.
    index: BTreeMap<String, usize>,
}

impl Batch {
    /// Creates an empty batch for the given header.
    pub fn new(header: BatchHeader) -> Self {
        Batch {
            header,
            ..Default::default()
        }
    }

    /// The batch header as added; merge and flatten renumber it.
    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    /// Mutable header. The control is not refreshed until `create` or `build`.
    pub fn header_mut(&mut self) -> &mut BatchHeader {
        &mut self.header
    }

    /// The last computed control record.
    pub fn control(&self) -> &BatchControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut BatchControl {
        &mut self.control
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[EntryDetail] {
        &self.entries
    }

    pub fn get_entry(&self, trace_number: &str) -> Option<&EntryDetail> {
        self.index.get(trace_number).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, trace_number: &str) -> bool {
        self.index.contains_key(trace_number)
    }

    /// Number of entries, not counting addenda.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry under its trace number.
    ///
    /// An entry with an existing trace number replaces the stored one in
    /// place and the replaced entry is returned; new trace numbers append.
    pub fn add_entry(&mut self, entry: EntryDetail) -> Option<EntryDetail> {
        match self.index.get(&entry.trace_number) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            None => {
                self.index
                    .insert(entry.trace_number.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Header and control plus every entry and addenda line.
    pub fn line_count(&self) -> usize {
        2 + self
            .entries
            .iter()
            .map(EntryDetail::line_count)
            .sum::<usize>()
    }

    /// Aggregates computed from the current entries.
    pub fn totals(&self) -> Totals {
        Totals::from_entries(&self.entries)
    }

    /// Recomputes the batch control from the current entries.
    ///
    /// Also renumbers each entry's 05 addenda; trace numbers are left alone.
    pub fn create(&mut self) {
        for entry in &mut self.entries {
            entry.sequence_addenda();
        }
        let totals = self.totals();
        self.control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: totals.entry_addenda_count,
            entry_hash: totals.entry_hash,
            total_debit_entry_dollar_amount: totals.total_debit,
            total_credit_entry_dollar_amount: totals.total_credit,
            company_identification: self.header.company_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            odfi_identification: self.header.odfi_identification.clone(),
            batch_number: self.header.batch_number,
        };
    }

    /// Recomputes the control, refusing a batch without entries.
    pub fn build(&mut self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(self.no_entries());
        }
        self.create();
        Ok(())
    }

    /// Checks header and entry fields, then the control against the entries.
    pub fn validate(&self, opts: &ValidateOpts) -> Result<()> {
        self.header.validate()?;
        if self.entries.is_empty() {
            return Err(self.no_entries());
        }
        for entry in &self.entries {
            entry.validate(opts)?;
            self.validate_direction(entry)?;
        }
        control::check_batch_control(self.header.batch_number, &self.control, &self.totals())
    }

    fn validate_direction(&self, entry: &EntryDetail) -> Result<()> {
        let msg = match self.header.service_class_code {
            service_class::CREDITS_ONLY if entry.is_debit() => "debit entry in a credits only batch",
            service_class::DEBITS_ONLY if entry.is_credit() => "credit entry in a debits only batch",
            _ => return Ok(()),
        };
        Err(AchError::field("TransactionCode", entry.transaction_code, msg))
    }

    fn no_entries(&self) -> AchError {
        AchError::file(
            "Entries",
            format!("batch #{} must have at least one entry", self.header.batch_number),
        )
    }

    /// Compares headers (ignoring batch number) and entry sets by trace number and content.
    pub fn equal(&self, other: &Batch) -> bool {
        self.header.same_batch(&other.header)
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|entry| other.get_entry(&entry.trace_number) == Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::transaction_code;
    use chrono::NaiveDate;

    fn header(batch_number: u32) -> BatchHeader {
        BatchHeader {
            service_class_code: service_class::DEBITS_ONLY,
            company_name: "Name on Account".to_string(),
            company_identification: "231380104".to_string(),
            standard_entry_class_code: "PPD".to_string(),
            company_entry_description: "REG.SALARY".to_string(),
            effective_entry_date: NaiveDate::from_ymd_opt(2019, 8, 16).unwrap(),
            originator_status_code: 1,
            odfi_identification: "12104288".to_string(),
            batch_number,
            ..Default::default()
        }
    }

    fn entry(trace_number: &str, amount: u64) -> EntryDetail {
        let mut entry = EntryDetail {
            transaction_code: transaction_code::CHECKING_DEBIT,
            dfi_account_number: "123456789".to_string(),
            amount,
            individual_name: "Wade Arnold".to_string(),
            trace_number: trace_number.to_string(),
            ..Default::default()
        };
        entry.set_rdfi("231380104").unwrap();
        entry
    }

    #[test]
    fn test_add_entry_keeps_insertion_order() {
        let mut batch = Batch::new(header(1));
        batch.add_entry(entry("121042880000003", 1));
        batch.add_entry(entry("121042880000001", 2));
        batch.add_entry(entry("121042880000002", 3));

        let traces: Vec<&str> = batch
            .entries()
            .iter()
            .map(|e| e.trace_number.as_str())
            .collect();
        assert_eq!(
            traces,
            vec!["121042880000003", "121042880000001", "121042880000002"]
        );
    }

    #[test]
    fn test_add_entry_overwrites_in_place() {
        let mut batch = Batch::new(header(1));
        batch.add_entry(entry("121042880000001", 1));
        batch.add_entry(entry("121042880000002", 2));

        let replaced = batch.add_entry(entry("121042880000001", 99));
        assert_eq!(replaced.map(|e| e.amount), Some(1));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.entries()[0].amount, 99);
        assert_eq!(batch.get_entry("121042880000001").unwrap().amount, 99);
    }

    #[test]
    fn test_create_computes_control() {
        let mut batch = Batch::new(header(4));
        batch.add_entry(entry("121042880000001", 100));
        let mut credit = entry("121042880000002", 250);
        credit.transaction_code = transaction_code::CHECKING_CREDIT;
        credit.addenda05 = vec![crate::addenda::Addenda05::new("invoice")];
        batch.add_entry(credit);

        batch.create();
        let control = batch.control();
        assert_eq!(control.entry_addenda_count, 3);
        assert_eq!(control.entry_hash, 2 * 23_138_010);
        assert_eq!(control.total_debit_entry_dollar_amount, 100);
        assert_eq!(control.total_credit_entry_dollar_amount, 250);
        assert_eq!(control.batch_number, 4);
        assert_eq!(batch.entries()[1].addenda05[0].sequence_number, 1);
        assert_eq!(batch.line_count(), 5);
    }

    #[test]
    fn test_build_requires_entries() {
        let mut batch = Batch::new(header(1));
        let err = batch.build().unwrap_err();
        assert_eq!(err.field_name(), Some("Entries"));
    }

    #[test]
    fn test_validate_detects_stale_control() {
        let mut batch = Batch::new(header(1));
        batch.add_entry(entry("121042880000001", 100));
        batch.build().unwrap();
        assert!(batch.validate(&ValidateOpts::default()).is_ok());

        batch.add_entry(entry("121042880000002", 100));
        let err = batch.validate(&ValidateOpts::default()).unwrap_err();
        assert!(matches!(
            err,
            AchError::BatchMismatch {
                field_name: "EntryAddendaCount",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_service_class_direction() {
        let mut batch = Batch::new(header(1));
        let mut credit = entry("121042880000001", 100);
        credit.transaction_code = transaction_code::CHECKING_CREDIT;
        batch.add_entry(credit);
        batch.build().unwrap();

        let err = batch.validate(&ValidateOpts::default()).unwrap_err();
        assert_eq!(err.field_name(), Some("TransactionCode"));
    }

    #[test]
    fn test_equal_ignores_batch_number_and_order() {
        let mut a = Batch::new(header(1));
        a.add_entry(entry("121042880000001", 1));
        a.add_entry(entry("121042880000002", 2));

        let mut b = Batch::new(header(9));
        b.add_entry(entry("121042880000002", 2));
        b.add_entry(entry("121042880000001", 1));
        assert!(a.equal(&b));

        b.add_entry(entry("121042880000001", 5));
        assert!(!a.equal(&b));
    }
}
