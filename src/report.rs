//! Summary CSV describing a set of files, one row per file.

use crate::error::Result;
use crate::file::File;
use crate::money::Money;
use serde::Serialize;
use std::io::Write;

/// One row of the summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// 1-based position of the file in the merge output.
    pub file: usize,
    pub immediate_origin: String,
    pub immediate_destination: String,
    pub batches: u32,
    pub entries: usize,
    pub lines: usize,
    pub blocks: u32,
    pub total_debit: Money,
    pub total_credit: Money,
    pub entry_hash: u64,
}

impl FileSummary {
    /// Summarizes a file from its control record and structure.
    pub fn new(position: usize, file: &File) -> Self {
        FileSummary {
            file: position,
            immediate_origin: file.header.immediate_origin.clone(),
            immediate_destination: file.header.immediate_destination.clone(),
            batches: file.control.batch_count,
            entries: file.entry_count(),
            lines: file.line_count(),
            blocks: file.control.block_count,
            total_debit: Money::from_cents(file.control.total_debit_entry_dollar_amount_in_file),
            total_credit: Money::from_cents(file.control.total_credit_entry_dollar_amount_in_file),
            entry_hash: file.control.entry_hash,
        }
    }
}

/// Writes one summary row per file, in order, with a header row.
pub fn write_summary<W: Write>(files: &[File], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, file) in files.iter().enumerate() {
        csv_writer.serialize(FileSummary::new(i + 1, file))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::entry::EntryDetail;
    use crate::record::{BatchHeader, FileHeader};
    use chrono::NaiveDate;

    fn sample_file() -> File {
        let date = NaiveDate::from_ymd_opt(2019, 8, 16).unwrap();
        let mut batch = Batch::new(BatchHeader {
            service_class_code: 225,
            company_name: "Acme".to_string(),
            company_identification: "132465".to_string(),
            standard_entry_class_code: "PPD".to_string(),
            company_entry_description: "PAYROLL".to_string(),
            effective_entry_date: date,
            odfi_identification: "12104288".to_string(),
            batch_number: 1,
            ..Default::default()
        });
        let mut entry = EntryDetail {
            transaction_code: 27,
            dfi_account_number: "123456789".to_string(),
            amount: 1050,
            individual_name: "Jane Doe".to_string(),
            trace_number: "121042880000001".to_string(),
            ..Default::default()
        };
        entry.set_rdfi("231380104").unwrap();
        batch.add_entry(entry);

        let mut file = File::new();
        file.set_header(FileHeader::new("231380104", "121042882", date))
            .add_batch(batch);
        file.create().unwrap();
        file
    }

    #[test]
    fn test_write_summary() {
        let mut out = Vec::new();
        write_summary(&[sample_file()], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("file,immediate_origin,immediate_destination,batches,entries,lines,blocks,total_debit,total_credit,entry_hash")
        );
        assert_eq!(
            lines.next(),
            Some("1,121042882,231380104,1,1,5,1,10.50,0.00,23138010")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_summary_writes_nothing() {
        let mut out = Vec::new();
        write_summary(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
