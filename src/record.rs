//! File and batch header/control records.

use crate::error::{AchError, Result, MSG_FIELD_INCLUSION, MSG_INVALID_VALUE};
use crate::fields;
use chrono::{NaiveDate, NaiveTime};

/// Service class codes accepted in batch headers.
pub mod service_class {
    pub const MIXED_DEBITS_AND_CREDITS: u16 = 200;
    pub const CREDITS_ONLY: u16 = 220;
    pub const DEBITS_ONLY: u16 = 225;
    pub const AUTOMATED_ACCOUNTING_ADVICES: u16 = 280;

    pub const ALL: [u16; 4] = [
        MIXED_DEBITS_AND_CREDITS,
        CREDITS_ONLY,
        DEBITS_ONLY,
        AUTOMATED_ACCOUNTING_ADVICES,
    ];
}

/// Identity of an ACH file.
///
/// Two files may be merged only when their origin and destination match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileHeader {
    /// Routing number of the receiving point, 9 digits (optionally space-prefixed).
    pub immediate_destination: String,
    /// Routing number or company identifier of the sending point.
    pub immediate_origin: String,
    pub file_creation_date: NaiveDate,
    pub file_creation_time: Option<NaiveTime>,
    /// Distinguishes files created on the same date between the same participants.
    pub file_id_modifier: String,
    pub immediate_destination_name: String,
    pub immediate_origin_name: String,
    pub reference_code: String,
}

impl FileHeader {
    pub fn new(
        immediate_destination: impl Into<String>,
        immediate_origin: impl Into<String>,
        file_creation_date: NaiveDate,
    ) -> Self {
        FileHeader {
            immediate_destination: immediate_destination.into(),
            immediate_origin: immediate_origin.into(),
            file_creation_date,
            file_id_modifier: "A".to_string(),
            ..Default::default()
        }
    }

    /// Returns `true` when both headers address the same origin and destination.
    pub fn is_mergeable_with(&self, other: &FileHeader) -> bool {
        self.immediate_origin == other.immediate_origin
            && self.immediate_destination == other.immediate_destination
    }

    /// Field rules for the file header: both routing fields present and
    /// numeric, and a file ID modifier of one uppercase letter or digit.
    pub fn validate(&self) -> Result<()> {
        fields::require("ImmediateOrigin", &self.immediate_origin)?;
        fields::require("ImmediateDestination", &self.immediate_destination)?;
        fields::numeric("ImmediateOrigin", &self.immediate_origin)?;
        fields::numeric("ImmediateDestination", &self.immediate_destination)?;
        fields::require("FileIDModifier", &self.file_id_modifier)?;

        let modifier = self.file_id_modifier.as_bytes();
        if modifier.len() != 1 || !(modifier[0].is_ascii_uppercase() || modifier[0].is_ascii_digit())
        {
            return Err(AchError::field(
                "FileIDModifier",
                &self.file_id_modifier,
                MSG_INVALID_VALUE,
            ));
        }
        Ok(())
    }
}

/// File-level aggregates derived from the batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileControl {
    pub batch_count: u32,
    pub block_count: u32,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit_entry_dollar_amount_in_file: u64,
    pub total_credit_entry_dollar_amount_in_file: u64,
}

impl FileControl {
    /// Rejects counts left at zero; aggregate equality is checked separately.
    pub fn validate(&self) -> Result<()> {
        if self.batch_count == 0 {
            return Err(AchError::field("BatchCount", 0, MSG_FIELD_INCLUSION));
        }
        if self.block_count == 0 {
            return Err(AchError::field("BlockCount", 0, MSG_FIELD_INCLUSION));
        }
        if self.entry_addenda_count == 0 {
            return Err(AchError::field("EntryAddendaCount", 0, MSG_FIELD_INCLUSION));
        }
        Ok(())
    }
}

/// Batch identity and company information.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BatchHeader {
    pub service_class_code: u16,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub company_descriptive_date: String,
    pub effective_entry_date: NaiveDate,
    pub originator_status_code: u8,
    /// First 8 digits of the originating DFI routing number.
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl BatchHeader {
    /// Returns `true` when both headers are equal in every field except `batch_number`.
    pub fn same_batch(&self, other: &BatchHeader) -> bool {
        self.service_class_code == other.service_class_code
            && self.company_name == other.company_name
            && self.company_discretionary_data == other.company_discretionary_data
            && self.company_identification == other.company_identification
            && self.standard_entry_class_code == other.standard_entry_class_code
            && self.company_entry_description == other.company_entry_description
            && self.company_descriptive_date == other.company_descriptive_date
            && self.effective_entry_date == other.effective_entry_date
            && self.originator_status_code == other.originator_status_code
            && self.odfi_identification == other.odfi_identification
    }

    /// A copy with the batch number cleared, usable as a lookup key for `same_batch`.
    pub fn identity(&self) -> BatchHeader {
        BatchHeader {
            batch_number: 0,
            ..self.clone()
        }
    }

    /// Field rules for the batch header. Stops at the first failing field.
    pub fn validate(&self) -> Result<()> {
        fields::one_of(
            "ServiceClassCode",
            self.service_class_code,
            &service_class::ALL,
        )?;
        fields::require("CompanyName", &self.company_name)?;
        fields::require("CompanyIdentification", &self.company_identification)?;
        fields::require("CompanyEntryDescription", &self.company_entry_description)?;

        let sec = self.standard_entry_class_code.as_bytes();
        if sec.len() != 3 || !sec.iter().all(u8::is_ascii_uppercase) {
            return Err(AchError::field(
                "StandardEntryClassCode",
                &self.standard_entry_class_code,
                MSG_INVALID_VALUE,
            ));
        }

        fields::require("ODFIIdentification", &self.odfi_identification)?;
        fields::digits("ODFIIdentification", &self.odfi_identification, 8)?;
        if self.batch_number == 0 {
            return Err(AchError::field("BatchNumber", 0, MSG_FIELD_INCLUSION));
        }
        Ok(())
    }
}

/// Batch-level aggregates derived from the entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchControl {
    pub service_class_code: u16,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit_entry_dollar_amount: u64,
    pub total_credit_entry_dollar_amount: u64,
    pub company_identification: String,
    pub message_authentication_code: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}
