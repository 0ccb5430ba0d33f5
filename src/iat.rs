//! International (IAT) batches.
//!
//! IAT batches are carried through builds and merges as whole units. Only
//! the fields that feed the file control (amounts, routing numbers, record
//! counts) are interpreted; addenda bodies are opaque pre-formatted payloads.

use crate::control;
use crate::entry::transaction_code;
use crate::error::{AchError, Result, MSG_INVALID_VALUE};
use crate::fields;
use crate::record::BatchControl;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IatBatchHeader {
    pub service_class_code: u16,
    pub foreign_exchange_indicator: String,
    pub foreign_exchange_reference_indicator: u8,
    pub foreign_exchange_reference: String,
    pub iso_destination_country_code: String,
    pub originator_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub iso_originating_currency_code: String,
    pub iso_destination_currency_code: String,
    pub effective_entry_date: NaiveDate,
    pub originator_status_code: u8,
    pub odfi_identification: String,
    pub batch_number: u32,
}

/// Free-form IAT addenda; `information` is the body between the type code
/// and the entry detail sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IatAddenda {
    pub information: String,
}

impl IatAddenda {
    pub fn new(information: impl Into<String>) -> Self {
        IatAddenda {
            information: information.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IatEntryDetail {
    pub transaction_code: u8,
    pub rdfi_identification: String,
    pub check_digit: String,
    pub amount: u64,
    pub dfi_account_number: String,
    pub ofac_screening_indicator: String,
    pub secondary_ofac_screening_indicator: String,
    pub trace_number: String,

    pub addenda10: Option<IatAddenda>,
    pub addenda11: Option<IatAddenda>,
    pub addenda12: Option<IatAddenda>,
    pub addenda13: Option<IatAddenda>,
    pub addenda14: Option<IatAddenda>,
    pub addenda15: Option<IatAddenda>,
    pub addenda16: Option<IatAddenda>,
    pub addenda17: Vec<IatAddenda>,
    pub addenda18: Vec<IatAddenda>,
    pub addenda98: Option<IatAddenda>,
    pub addenda99: Option<IatAddenda>,
}

impl IatEntryDetail {
    /// Addenda records in output order, paired with their type codes.
    pub fn addenda(&self) -> Vec<(u8, &IatAddenda)> {
        let singles: [(u8, &Option<IatAddenda>); 7] = [
            (10, &self.addenda10),
            (11, &self.addenda11),
            (12, &self.addenda12),
            (13, &self.addenda13),
            (14, &self.addenda14),
            (15, &self.addenda15),
            (16, &self.addenda16),
        ];
        let mut out: Vec<(u8, &IatAddenda)> = singles
            .into_iter()
            .filter_map(|(code, addenda)| addenda.as_ref().map(|a| (code, a)))
            .collect();
        out.extend(self.addenda17.iter().map(|a| (17, a)));
        out.extend(self.addenda18.iter().map(|a| (18, a)));
        if let Some(a) = &self.addenda98 {
            out.push((98, a));
        }
        if let Some(a) = &self.addenda99 {
            out.push((99, a));
        }
        out
    }

    pub fn addenda_count(&self) -> usize {
        [
            &self.addenda10,
            &self.addenda11,
            &self.addenda12,
            &self.addenda13,
            &self.addenda14,
            &self.addenda15,
            &self.addenda16,
            &self.addenda98,
            &self.addenda99,
        ]
        .iter()
        .filter(|a| a.is_some())
        .count()
            + self.addenda17.len()
            + self.addenda18.len()
    }

    pub fn line_count(&self) -> usize {
        1 + self.addenda_count()
    }

    pub fn is_debit(&self) -> bool {
        transaction_code::is_debit(self.transaction_code)
    }

    pub fn is_credit(&self) -> bool {
        transaction_code::is_credit(self.transaction_code)
    }

    pub fn hash_value(&self) -> u64 {
        fields::hash_value(&self.rdfi_identification)
    }
}

/// An IAT batch: header, entries in order, and a derived control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IatBatch {
    pub header: IatBatchHeader,
    pub entries: Vec<IatEntryDetail>,
    pub control: BatchControl,
}

impl IatBatch {
    pub fn new(header: IatBatchHeader) -> Self {
        IatBatch {
            header,
            ..Default::default()
        }
    }

    /// Appends an entry. IAT entries are not keyed by trace number.
    pub fn add_entry(&mut self, entry: IatEntryDetail) {
        self.entries.push(entry);
    }

    /// Header and control plus every entry and addenda line.
    pub fn line_count(&self) -> usize {
        2 + self
            .entries
            .iter()
            .map(IatEntryDetail::line_count)
            .sum::<usize>()
    }

    /// Recomputes the batch control from the entries.
    pub fn create(&mut self) {
        let totals = control::Totals::from_iat_entries(&self.entries);
        self.control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: totals.entry_addenda_count,
            entry_hash: totals.entry_hash,
            total_debit_entry_dollar_amount: totals.total_debit,
            total_credit_entry_dollar_amount: totals.total_credit,
            company_identification: self.header.originator_identification.clone(),
            message_authentication_code: String::new(),
            odfi_identification: self.header.odfi_identification.clone(),
            batch_number: self.header.batch_number,
        };
    }

    pub fn validate(&self) -> Result<()> {
        if self.header.standard_entry_class_code != "IAT" {
            return Err(AchError::field(
                "StandardEntryClassCode",
                &self.header.standard_entry_class_code,
                MSG_INVALID_VALUE,
            ));
        }
        fields::require("ODFIIdentification", &self.header.odfi_identification)?;
        if self.entries.is_empty() {
            return Err(AchError::file(
                "Entries",
                format!("IAT batch #{} must have at least one entry", self.header.batch_number),
            ));
        }
        for entry in &self.entries {
            fields::digits("RDFIIdentification", &entry.rdfi_identification, 8)?;
            fields::require("TraceNumber", &entry.trace_number)?;
        }
        let totals = control::Totals::from_iat_entries(&self.entries);
        control::check_batch_control(self.header.batch_number, &self.control, &totals)
    }
}
