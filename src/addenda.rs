//! Addenda records attached to an [`EntryDetail`](crate::EntryDetail).
//!
//! Each addenda maps to exactly one physical 94-character line. Validation
//! is limited to the fields the control and merge logic depend on plus the
//! return/notification-of-change codes governed by [`ValidateOpts`].

use crate::error::{AchError, Result, MSG_INVALID_VALUE};
use crate::fields;
use crate::options::ValidateOpts;

/// Addenda type code 02: point-of-sale terminal information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda02 {
    pub reference_information_one: String,
    pub reference_information_two: String,
    pub terminal_identification_code: String,
    pub transaction_serial_number: String,
    /// MMDD
    pub transaction_date: String,
    pub authorization_code_or_expire_date: String,
    pub terminal_location: String,
    pub terminal_city: String,
    pub terminal_state: String,
    pub trace_number: String,
}

impl Addenda02 {
    pub fn validate(&self) -> Result<()> {
        fields::require("TerminalIdentificationCode", &self.terminal_identification_code)?;
        fields::numeric("TransactionDate", &self.transaction_date)?;
        fields::numeric("TraceNumber", &self.trace_number)
    }
}

/// Addenda type code 05: free-form payment related information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda05 {
    pub payment_related_information: String,
    /// Position of this addenda among the entry's 05 records, starting at 1.
    pub sequence_number: u16,
    /// Last seven digits of the owning entry's trace number.
    pub entry_detail_sequence_number: u32,
}

impl Addenda05 {
    pub fn new(payment_related_information: impl Into<String>) -> Self {
        Addenda05 {
            payment_related_information: payment_related_information.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequence_number == 0 {
            return Err(AchError::field(
                "SequenceNumber",
                self.sequence_number,
                crate::error::MSG_FIELD_INCLUSION,
            ));
        }
        Ok(())
    }
}

/// Addenda type code 98: notification of change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda98 {
    pub change_code: String,
    pub original_trace: String,
    pub original_dfi: String,
    pub corrected_data: String,
    pub trace_number: String,
}

impl Addenda98 {
    pub fn validate(&self) -> Result<()> {
        change_code("ChangeCode", &self.change_code)?;
        fields::require("OriginalTrace", &self.original_trace)?;
        fields::require("CorrectedData", &self.corrected_data)
    }
}

/// Addenda type code 98 with a refused change code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda98Refused {
    pub refused_change_code: String,
    pub original_trace: String,
    pub original_dfi: String,
    pub corrected_data: String,
    pub change_code: String,
    pub trace_sequence_number: String,
    pub trace_number: String,
}

impl Addenda98Refused {
    pub fn validate(&self) -> Result<()> {
        change_code("RefusedChangeCode", &self.refused_change_code)?;
        change_code("ChangeCode", &self.change_code)?;
        fields::require("OriginalTrace", &self.original_trace)
    }
}

/// Addenda type code 99: return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda99 {
    pub return_code: String,
    pub original_trace: String,
    /// YYMMDD, only for death-related returns.
    pub date_of_death: String,
    pub original_dfi: String,
    pub addenda_information: String,
    pub trace_number: String,
}

impl Addenda99 {
    pub fn validate(&self, opts: &ValidateOpts) -> Result<()> {
        return_code("ReturnCode", &self.return_code, opts, is_standard_return_code)?;
        fields::require("OriginalTrace", &self.original_trace)
    }
}

/// Addenda type code 99: dishonored return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda99Dishonored {
    pub dishonored_return_reason_code: String,
    pub original_entry_trace_number: String,
    pub original_receiving_dfi_identification: String,
    pub return_trace_number: String,
    pub return_settlement_date: String,
    pub return_reason_code: String,
    pub addenda_information: String,
    pub trace_number: String,
}

impl Addenda99Dishonored {
    pub fn validate(&self, opts: &ValidateOpts) -> Result<()> {
        return_code(
            "DishonoredReturnReasonCode",
            &self.dishonored_return_reason_code,
            opts,
            |code| matches!(code, "R61" | "R67" | "R68" | "R69" | "R70"),
        )?;
        fields::require("OriginalEntryTraceNumber", &self.original_entry_trace_number)
    }
}

/// Addenda type code 99: contested dishonored return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Addenda99Contested {
    pub contested_return_code: String,
    pub original_entry_trace_number: String,
    pub date_original_entry_returned: String,
    pub original_receiving_dfi_identification: String,
    pub original_settlement_date: String,
    pub return_trace_number: String,
    pub return_settlement_date: String,
    pub return_reason_code: String,
    pub dishonored_return_trace_number: String,
    pub dishonored_return_settlement_date: String,
    pub dishonored_return_reason_code: String,
    pub trace_number: String,
}

impl Addenda99Contested {
    pub fn validate(&self, opts: &ValidateOpts) -> Result<()> {
        return_code(
            "ContestedReturnCode",
            &self.contested_return_code,
            opts,
            |code| matches!(code, "R71" | "R72" | "R73" | "R74" | "R75" | "R76" | "R77"),
        )?;
        fields::require("OriginalEntryTraceNumber", &self.original_entry_trace_number)
    }
}

/// Standard return reason codes: R01-R53, R61-R62, R67-R77, R80-R85.
pub fn is_standard_return_code(code: &str) -> bool {
    let Some(digits) = code.strip_prefix('R') else {
        return false;
    };
    if digits.len() != 2 {
        return false;
    }
    match digits.parse::<u8>() {
        Ok(n) => matches!(n, 1..=53 | 61 | 62 | 67..=77 | 80..=85),
        Err(_) => false,
    }
}

fn return_code(
    field_name: &'static str,
    code: &str,
    opts: &ValidateOpts,
    is_standard: impl Fn(&str) -> bool,
) -> Result<()> {
    fields::require(field_name, code)?;
    if opts.custom_return_codes || is_standard(code) {
        return Ok(());
    }
    Err(AchError::field(field_name, code, MSG_INVALID_VALUE))
}

fn change_code(field_name: &'static str, code: &str) -> Result<()> {
    let valid = code.len() == 3
        && code.starts_with('C')
        && code[1..].bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(AchError::field(field_name, code, MSG_INVALID_VALUE));
    }
    Ok(())
}
