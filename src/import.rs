//! Building files from flat CSV exports.
//!
//! Each row is one entry and repeats its file and batch header columns.
//! The first row supplies the file header; rows are grouped into batches
//! by `batch_number` in order of first appearance.

use crate::addenda::Addenda05;
use crate::batch::Batch;
use crate::entry::EntryDetail;
use crate::error::{AchError, Result};
use crate::file::File;
use crate::money::Money;
use crate::record::{BatchHeader, FileHeader};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

/// Separator between payment-information values in the `addenda05` column.
pub const ADDENDA_SEPARATOR: char = '|';

/// Raw entry row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct EntryRecord {
    pub immediate_destination: String,
    pub immediate_origin: String,
    #[serde(default)]
    pub immediate_destination_name: String,
    #[serde(default)]
    pub immediate_origin_name: String,
    pub file_creation_date: NaiveDate,
    #[serde(default)]
    pub file_id_modifier: Option<String>,

    pub batch_number: u32,
    pub service_class_code: u16,
    pub company_name: String,
    pub company_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub effective_entry_date: NaiveDate,
    pub odfi_identification: String,

    pub transaction_code: u8,
    /// Full 9-digit routing number of the receiving bank.
    pub routing_number: String,
    pub dfi_account_number: String,
    /// Dollar amount, e.g. "1000.00".
    pub amount: Money,
    #[serde(default)]
    pub identification_number: String,
    pub individual_name: String,
    pub trace_number: String,
    #[serde(default)]
    pub addenda05: Option<String>,
}

impl EntryRecord {
    fn file_header(&self) -> FileHeader {
        let mut header = FileHeader::new(
            self.immediate_destination.clone(),
            self.immediate_origin.clone(),
            self.file_creation_date,
        );
        header.immediate_destination_name = self.immediate_destination_name.clone();
        header.immediate_origin_name = self.immediate_origin_name.clone();
        if let Some(modifier) = self.file_id_modifier.as_ref().filter(|m| !m.is_empty()) {
            header.file_id_modifier = modifier.clone();
        }
        header
    }

    fn batch_header(&self) -> BatchHeader {
        BatchHeader {
            service_class_code: self.service_class_code,
            company_name: self.company_name.clone(),
            company_identification: self.company_identification.clone(),
            standard_entry_class_code: self.standard_entry_class_code.clone(),
            company_entry_description: self.company_entry_description.clone(),
            effective_entry_date: self.effective_entry_date,
            originator_status_code: 1,
            odfi_identification: self.odfi_identification.clone(),
            batch_number: self.batch_number,
            ..Default::default()
        }
    }

    /// Converts the row into an entry.
    ///
    /// Fractions of a cent already fail when the row is deserialized; here a
    /// negative amount or a malformed routing number is rejected.
    fn entry(&self, row: usize) -> Result<EntryDetail> {
        let amount = self.amount.to_cents().ok_or_else(|| AchError::InvalidRecord {
            row,
            message: format!("amount {} is negative or too large", self.amount),
        })?;
        let mut entry = EntryDetail {
            transaction_code: self.transaction_code,
            dfi_account_number: self.dfi_account_number.clone(),
            amount,
            identification_number: self.identification_number.clone(),
            individual_name: self.individual_name.clone(),
            trace_number: self.trace_number.clone(),
            ..Default::default()
        };
        entry
            .set_rdfi(&self.routing_number)
            .map_err(|e| AchError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;
        if let Some(info) = &self.addenda05 {
            entry.addenda05 = info
                .split(ADDENDA_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Addenda05::new)
                .collect();
        }
        Ok(entry)
    }
}

/// Reads one file from CSV and computes its control records.
///
/// The header is not validated here; that happens on build or merge.
pub fn read_file_csv<R: Read>(reader: R) -> Result<File> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut header: Option<FileHeader> = None;
    let mut batches: Vec<Batch> = Vec::new();
    let mut positions: BTreeMap<u32, usize> = BTreeMap::new();

    for (row_idx, result) in csv_reader.deserialize::<EntryRecord>().enumerate() {
        let row = row_idx + 2; // 1-indexed, accounting for header row
        let record = result.map_err(|e| AchError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;

        let row_header = record.file_header();
        match &header {
            None => header = Some(row_header),
            Some(first) if !first.is_mergeable_with(&row_header) => {
                warn!(
                    "Row {}: file header {}/{} differs from first row, using first row",
                    row, row_header.immediate_origin, row_header.immediate_destination
                );
            }
            Some(_) => {}
        }

        let idx = *positions.entry(record.batch_number).or_insert_with(|| {
            debug!("Row {}: starting batch #{}", row, record.batch_number);
            batches.push(Batch::new(record.batch_header()));
            batches.len() - 1
        });
        let entry = record.entry(row)?;
        if batches[idx].add_entry(entry).is_some() {
            warn!(
                "Row {}: trace number {} repeated in batch #{}, keeping the last row",
                row, record.trace_number, record.batch_number
            );
        }
    }

    let mut file = File::new();
    if let Some(header) = header {
        file.set_header(header);
    }
    for batch in batches {
        file.add_batch(batch);
    }
    file.create()?;
    Ok(file)
}
