//! Entry detail records and transaction code classification.

use crate::addenda::{
    Addenda02, Addenda05, Addenda98, Addenda98Refused, Addenda99, Addenda99Contested,
    Addenda99Dishonored,
};
use crate::error::{AchError, Result, MSG_INVALID_VALUE};
use crate::fields;
use crate::options::ValidateOpts;

/// Transaction codes grouped by account type and direction.
pub mod transaction_code {
    pub const CHECKING_RETURN_NOC_CREDIT: u8 = 21;
    pub const CHECKING_CREDIT: u8 = 22;
    pub const CHECKING_PRENOTE_CREDIT: u8 = 23;
    pub const CHECKING_ZERO_DOLLAR_REMITTANCE_CREDIT: u8 = 24;
    pub const CHECKING_RETURN_NOC_DEBIT: u8 = 26;
    pub const CHECKING_DEBIT: u8 = 27;
    pub const CHECKING_PRENOTE_DEBIT: u8 = 28;
    pub const CHECKING_ZERO_DOLLAR_REMITTANCE_DEBIT: u8 = 29;
    pub const SAVINGS_RETURN_NOC_CREDIT: u8 = 31;
    pub const SAVINGS_CREDIT: u8 = 32;
    pub const SAVINGS_PRENOTE_CREDIT: u8 = 33;
    pub const SAVINGS_ZERO_DOLLAR_REMITTANCE_CREDIT: u8 = 34;
    pub const SAVINGS_RETURN_NOC_DEBIT: u8 = 36;
    pub const SAVINGS_DEBIT: u8 = 37;
    pub const SAVINGS_PRENOTE_DEBIT: u8 = 38;
    pub const SAVINGS_ZERO_DOLLAR_REMITTANCE_DEBIT: u8 = 39;
    pub const GL_RETURN_NOC_CREDIT: u8 = 41;
    pub const GL_CREDIT: u8 = 42;
    pub const GL_PRENOTE_CREDIT: u8 = 43;
    pub const GL_ZERO_DOLLAR_REMITTANCE_CREDIT: u8 = 44;
    pub const GL_RETURN_NOC_DEBIT: u8 = 46;
    pub const GL_DEBIT: u8 = 47;
    pub const GL_PRENOTE_DEBIT: u8 = 48;
    pub const GL_ZERO_DOLLAR_REMITTANCE_DEBIT: u8 = 49;
    pub const LOAN_RETURN_NOC_CREDIT: u8 = 51;
    pub const LOAN_CREDIT: u8 = 52;
    pub const LOAN_PRENOTE_CREDIT: u8 = 53;
    pub const LOAN_ZERO_DOLLAR_REMITTANCE_CREDIT: u8 = 54;
    pub const LOAN_DEBIT: u8 = 55;
    pub const LOAN_RETURN_NOC_DEBIT: u8 = 56;

    pub fn is_credit(code: u8) -> bool {
        matches!(code, 21..=24 | 31..=34 | 41..=44 | 51..=54)
    }

    pub fn is_debit(code: u8) -> bool {
        matches!(code, 26..=29 | 36..=39 | 46..=49 | 55 | 56)
    }

    pub fn is_prenote(code: u8) -> bool {
        matches!(code % 10, 3 | 8) && (is_credit(code) || is_debit(code))
    }

    /// Zero-dollar remittance and return/NOC codes may carry a zero amount.
    pub fn allows_zero_amount(code: u8) -> bool {
        is_prenote(code)
            || matches!(code, 24 | 29 | 34 | 39 | 44 | 49 | 54)
            || matches!(code, 21 | 26 | 31 | 36 | 41 | 46 | 51 | 56)
    }
}

/// A single payment instruction with its addenda records.
///
/// `trace_number` is the entry's key inside a [`Batch`](crate::Batch).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryDetail {
    pub transaction_code: u8,
    /// First 8 digits of the receiving routing number; summed into the entry hash.
    pub rdfi_identification: String,
    pub check_digit: String,
    pub dfi_account_number: String,
    /// Amount in cents.
    pub amount: u64,
    pub identification_number: String,
    pub individual_name: String,
    pub discretionary_data: String,
    pub trace_number: String,

    pub addenda02: Option<Addenda02>,
    pub addenda05: Vec<Addenda05>,
    pub addenda98: Option<Addenda98>,
    pub addenda98_refused: Option<Addenda98Refused>,
    pub addenda99: Option<Addenda99>,
    pub addenda99_dishonored: Option<Addenda99Dishonored>,
    pub addenda99_contested: Option<Addenda99Contested>,
}

impl EntryDetail {
    pub fn is_debit(&self) -> bool {
        transaction_code::is_debit(self.transaction_code)
    }

    pub fn is_credit(&self) -> bool {
        transaction_code::is_credit(self.transaction_code)
    }

    /// Number of addenda records present on this entry.
    pub fn addenda_count(&self) -> usize {
        usize::from(self.addenda02.is_some())
            + self.addenda05.len()
            + usize::from(self.addenda98.is_some())
            + usize::from(self.addenda98_refused.is_some())
            + usize::from(self.addenda99.is_some())
            + usize::from(self.addenda99_dishonored.is_some())
            + usize::from(self.addenda99_contested.is_some())
    }

    /// Physical lines this entry occupies: itself plus one per addenda.
    pub fn line_count(&self) -> usize {
        1 + self.addenda_count()
    }

    pub fn addenda_record_indicator(&self) -> u8 {
        u8::from(self.addenda_count() > 0)
    }

    /// Contribution of this entry to an entry hash.
    pub fn hash_value(&self) -> u64 {
        fields::hash_value(&self.rdfi_identification)
    }

    /// Sets the RDFI identification and check digit from a 9-digit routing number.
    ///
    /// Anything other than exactly nine ASCII digits is rejected and leaves
    /// the entry unchanged.
    pub fn set_rdfi(&mut self, routing_number: &str) -> Result<&mut Self> {
        let routing_number = routing_number.trim();
        fields::digits("RoutingNumber", routing_number, 9)?;
        let (rdfi, check_digit) = routing_number.split_at(8);
        self.rdfi_identification = rdfi.to_string();
        self.check_digit = check_digit.to_string();
        Ok(self)
    }

    /// Numbers the 05 addenda records and ties them to this entry's trace number.
    pub fn sequence_addenda(&mut self) {
        let entry_sequence = self
            .trace_number
            .trim()
            .get(self.trace_number.trim().len().saturating_sub(7)..)
            .and_then(|tail| tail.parse().ok())
            .unwrap_or(0);
        for (i, addenda) in self.addenda05.iter_mut().enumerate() {
            addenda.sequence_number = u16::try_from(i + 1).unwrap_or(u16::MAX);
            addenda.entry_detail_sequence_number = entry_sequence;
        }
    }

    /// Checks field rules and every attached addenda.
    pub fn validate(&self, opts: &ValidateOpts) -> Result<()> {
        if !self.is_debit() && !self.is_credit() {
            return Err(AchError::field(
                "TransactionCode",
                self.transaction_code,
                MSG_INVALID_VALUE,
            ));
        }
        fields::require("RDFIIdentification", &self.rdfi_identification)?;
        fields::digits("RDFIIdentification", &self.rdfi_identification, 8)?;
        fields::numeric("CheckDigit", &self.check_digit)?;
        fields::require("TraceNumber", &self.trace_number)?;
        fields::numeric("TraceNumber", &self.trace_number)?;
        self.validate_amount(opts)?;

        if let Some(addenda) = &self.addenda02 {
            addenda.validate()?;
        }
        for addenda in &self.addenda05 {
            addenda.validate()?;
        }
        if let Some(addenda) = &self.addenda98 {
            addenda.validate()?;
        }
        if let Some(addenda) = &self.addenda98_refused {
            addenda.validate()?;
        }
        if let Some(addenda) = &self.addenda99 {
            addenda.validate(opts)?;
        }
        if let Some(addenda) = &self.addenda99_dishonored {
            addenda.validate(opts)?;
        }
        if let Some(addenda) = &self.addenda99_contested {
            addenda.validate(opts)?;
        }
        Ok(())
    }

    fn validate_amount(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.allow_invalid_amounts {
            return Ok(());
        }
        let code = self.transaction_code;
        if self.amount == 0 && !transaction_code::allows_zero_amount(code) {
            return Err(AchError::field("Amount", self.amount, MSG_INVALID_VALUE));
        }
        if self.amount != 0 && transaction_code::is_prenote(code) {
            return Err(AchError::field(
                "Amount",
                self.amount,
                "must be zero for a prenotification",
            ));
        }
        Ok(())
    }
}
