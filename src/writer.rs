//! Fixed-width NACHA rendering.
//!
//! Every record becomes one 94-character line. After the file control the
//! output is padded with all-`9` lines to a whole number of 10-line blocks.

use crate::addenda::{
    Addenda02, Addenda05, Addenda98, Addenda98Refused, Addenda99, Addenda99Contested,
    Addenda99Dishonored,
};
use crate::batch::Batch;
use crate::control::BLOCKING_FACTOR;
use crate::entry::EntryDetail;
use crate::error::Result;
use crate::file::File;
use crate::iat::{IatAddenda, IatBatch, IatEntryDetail};
use crate::record::{BatchControl, BatchHeader, FileControl, FileHeader};
use std::io::Write;

/// Length of every physical record.
pub const RECORD_LENGTH: usize = 94;

/// Renders `file` and writes it out, one record per line.
pub fn write_file<W: Write>(file: &File, mut writer: W) -> Result<()> {
    for line in render(file) {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders `file` into its physical lines, block padding included.
pub fn render(file: &File) -> Vec<String> {
    let mut lines = vec![file_header(&file.header)];
    for batch in &file.batches {
        render_batch(batch, &mut lines);
    }
    for batch in &file.iat_batches {
        render_iat_batch(batch, &mut lines);
    }
    lines.push(file_control(&file.control));

    while lines.len() % BLOCKING_FACTOR != 0 {
        lines.push("9".repeat(RECORD_LENGTH));
    }
    lines
}

fn render_batch(batch: &Batch, lines: &mut Vec<String>) {
    lines.push(batch_header(batch.header()));
    for entry in batch.entries() {
        lines.push(entry_detail(entry));
        if let Some(addenda) = &entry.addenda02 {
            lines.push(addenda02(addenda));
        }
        for addenda in &entry.addenda05 {
            lines.push(addenda05(addenda));
        }
        if let Some(addenda) = &entry.addenda98 {
            lines.push(addenda98(addenda));
        }
        if let Some(addenda) = &entry.addenda98_refused {
            lines.push(addenda98_refused(addenda));
        }
        if let Some(addenda) = &entry.addenda99 {
            lines.push(addenda99(addenda));
        }
        if let Some(addenda) = &entry.addenda99_dishonored {
            lines.push(addenda99_dishonored(addenda));
        }
        if let Some(addenda) = &entry.addenda99_contested {
            lines.push(addenda99_contested(addenda));
        }
    }
    lines.push(batch_control(batch.control()));
}

fn render_iat_batch(batch: &IatBatch, lines: &mut Vec<String>) {
    let header = &batch.header;
    lines.push(format!(
        "5{}{}{}{}{}{}{}{}{}{}{}{}   {}{}{}",
        numeric(header.service_class_code.into(), 3),
        blank(16),
        alpha(&header.foreign_exchange_indicator, 2),
        numeric(header.foreign_exchange_reference_indicator.into(), 1),
        alpha(&header.foreign_exchange_reference, 15),
        alpha(&header.iso_destination_country_code, 2),
        alpha(&header.originator_identification, 10),
        alpha(&header.standard_entry_class_code, 3),
        alpha(&header.company_entry_description, 10),
        alpha(&header.iso_originating_currency_code, 3),
        alpha(&header.iso_destination_currency_code, 3),
        header.effective_entry_date.format("%y%m%d"),
        numeric(header.originator_status_code.into(), 1),
        numeric_text(&header.odfi_identification, 8),
        numeric(header.batch_number.into(), 7),
    ));
    for entry in &batch.entries {
        lines.push(iat_entry_detail(entry));
        for (type_code, addenda) in entry.addenda() {
            lines.push(iat_addenda(type_code, addenda, &entry.trace_number));
        }
    }
    lines.push(batch_control(&batch.control));
}

fn file_header(header: &FileHeader) -> String {
    let time = header
        .file_creation_time
        .map(|t| t.format("%H%M").to_string())
        .unwrap_or_else(|| blank(4));
    format!(
        "101{}{}{}{}{}094101{}{}{}",
        routing(&header.immediate_destination),
        routing(&header.immediate_origin),
        header.file_creation_date.format("%y%m%d"),
        time,
        alpha(&header.file_id_modifier, 1),
        alpha(&header.immediate_destination_name, 23),
        alpha(&header.immediate_origin_name, 23),
        alpha(&header.reference_code, 8),
    )
}

fn file_control(control: &FileControl) -> String {
    format!(
        "9{}{}{}{}{}{}{}",
        numeric(control.batch_count.into(), 6),
        numeric(control.block_count.into(), 6),
        numeric(control.entry_addenda_count.into(), 8),
        numeric(control.entry_hash, 10),
        numeric(control.total_debit_entry_dollar_amount_in_file, 12),
        numeric(control.total_credit_entry_dollar_amount_in_file, 12),
        blank(39),
    )
}

fn batch_header(header: &BatchHeader) -> String {
    format!(
        "5{}{}{}{}{}{}{}{}   {}{}{}",
        numeric(header.service_class_code.into(), 3),
        alpha(&header.company_name, 16),
        alpha(&header.company_discretionary_data, 20),
        alpha(&header.company_identification, 10),
        alpha(&header.standard_entry_class_code, 3),
        alpha(&header.company_entry_description, 10),
        alpha(&header.company_descriptive_date, 6),
        header.effective_entry_date.format("%y%m%d"),
        numeric(header.originator_status_code.into(), 1),
        numeric_text(&header.odfi_identification, 8),
        numeric(header.batch_number.into(), 7),
    )
}

fn batch_control(control: &BatchControl) -> String {
    format!(
        "8{}{}{}{}{}{}{}{}{}{}",
        numeric(control.service_class_code.into(), 3),
        numeric(control.entry_addenda_count.into(), 6),
        numeric(control.entry_hash, 10),
        numeric(control.total_debit_entry_dollar_amount, 12),
        numeric(control.total_credit_entry_dollar_amount, 12),
        alpha(&control.company_identification, 10),
        alpha(&control.message_authentication_code, 19),
        blank(6),
        numeric_text(&control.odfi_identification, 8),
        numeric(control.batch_number.into(), 7),
    )
}

fn entry_detail(entry: &EntryDetail) -> String {
    format!(
        "6{}{}{}{}{}{}{}{}{}{}",
        numeric(entry.transaction_code.into(), 2),
        numeric_text(&entry.rdfi_identification, 8),
        alpha(&entry.check_digit, 1),
        alpha(&entry.dfi_account_number, 17),
        numeric(entry.amount, 10),
        alpha(&entry.identification_number, 15),
        alpha(&entry.individual_name, 22),
        alpha(&entry.discretionary_data, 2),
        numeric(entry.addenda_record_indicator().into(), 1),
        numeric_text(&entry.trace_number, 15),
    )
}

fn addenda02(addenda: &Addenda02) -> String {
    format!(
        "702{}{}{}{}{}{}{}{}{}{}",
        alpha(&addenda.reference_information_one, 7),
        alpha(&addenda.reference_information_two, 3),
        alpha(&addenda.terminal_identification_code, 6),
        alpha(&addenda.transaction_serial_number, 6),
        alpha(&addenda.transaction_date, 4),
        alpha(&addenda.authorization_code_or_expire_date, 6),
        alpha(&addenda.terminal_location, 27),
        alpha(&addenda.terminal_city, 15),
        alpha(&addenda.terminal_state, 2),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn addenda05(addenda: &Addenda05) -> String {
    format!(
        "705{}{}{}",
        alpha(&addenda.payment_related_information, 80),
        numeric(addenda.sequence_number.into(), 4),
        numeric(addenda.entry_detail_sequence_number.into(), 7),
    )
}

fn addenda98(addenda: &Addenda98) -> String {
    format!(
        "798{}{}{}{}{}{}{}",
        alpha(&addenda.change_code, 3),
        numeric_text(&addenda.original_trace, 15),
        blank(6),
        numeric_text(&addenda.original_dfi, 8),
        alpha(&addenda.corrected_data, 29),
        blank(15),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn addenda98_refused(addenda: &Addenda98Refused) -> String {
    format!(
        "798{}{}{}{}{}{}{}{}{}",
        alpha(&addenda.refused_change_code, 3),
        numeric_text(&addenda.original_trace, 15),
        blank(6),
        numeric_text(&addenda.original_dfi, 8),
        alpha(&addenda.corrected_data, 29),
        alpha(&addenda.change_code, 3),
        numeric_text(&addenda.trace_sequence_number, 4),
        blank(8),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn addenda99(addenda: &Addenda99) -> String {
    format!(
        "799{}{}{}{}{}{}",
        alpha(&addenda.return_code, 3),
        numeric_text(&addenda.original_trace, 15),
        alpha(&addenda.date_of_death, 6),
        numeric_text(&addenda.original_dfi, 8),
        alpha(&addenda.addenda_information, 44),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn addenda99_dishonored(addenda: &Addenda99Dishonored) -> String {
    format!(
        "799{}{}{}{}{}{}{}{}{}{}",
        alpha(&addenda.dishonored_return_reason_code, 3),
        numeric_text(&addenda.original_entry_trace_number, 15),
        blank(6),
        numeric_text(&addenda.original_receiving_dfi_identification, 8),
        blank(3),
        numeric_text(&addenda.return_trace_number, 15),
        alpha(&addenda.return_settlement_date, 3),
        alpha(&addenda.return_reason_code, 2),
        alpha(&addenda.addenda_information, 21),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn addenda99_contested(addenda: &Addenda99Contested) -> String {
    format!(
        "799{}{}{}{}{}{}{}{}{}{}{}{}{}",
        alpha(&addenda.contested_return_code, 3),
        numeric_text(&addenda.original_entry_trace_number, 15),
        alpha(&addenda.date_original_entry_returned, 6),
        numeric_text(&addenda.original_receiving_dfi_identification, 8),
        alpha(&addenda.original_settlement_date, 3),
        numeric_text(&addenda.return_trace_number, 15),
        alpha(&addenda.return_settlement_date, 3),
        alpha(&addenda.return_reason_code, 2),
        numeric_text(&addenda.dishonored_return_trace_number, 15),
        alpha(&addenda.dishonored_return_settlement_date, 3),
        alpha(&addenda.dishonored_return_reason_code, 2),
        blank(1),
        numeric_text(&addenda.trace_number, 15),
    )
}

fn iat_entry_detail(entry: &IatEntryDetail) -> String {
    format!(
        "6{}{}{}{}{}{}{}{}{}{}1{}",
        numeric(entry.transaction_code.into(), 2),
        numeric_text(&entry.rdfi_identification, 8),
        alpha(&entry.check_digit, 1),
        numeric(entry.addenda_count() as u64, 4),
        blank(13),
        numeric(entry.amount, 10),
        alpha(&entry.dfi_account_number, 35),
        blank(2),
        alpha(&entry.ofac_screening_indicator, 1),
        alpha(&entry.secondary_ofac_screening_indicator, 1),
        numeric_text(&entry.trace_number, 15),
    )
}

fn iat_addenda(type_code: u8, addenda: &IatAddenda, trace_number: &str) -> String {
    format!(
        "7{}{}{}",
        numeric(type_code.into(), 2),
        alpha(&addenda.information, 84),
        numeric_text(trace_number, 7),
    )
}

/// Left-justified, space-filled, truncated to `width`.
fn alpha(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Right-justified, zero-filled; only the low-order `width` digits are kept.
fn numeric(value: u64, width: usize) -> String {
    let digits = format!("{:0>width$}", value, width = width);
    digits[digits.len() - width..].to_string()
}

/// Numeric field held as text: right-justified and zero-filled.
///
/// Longer values keep their last `width` characters.
fn numeric_text(value: &str, width: usize) -> String {
    let trimmed = value.trim();
    let count = trimmed.chars().count();
    if count >= width {
        return trimmed.chars().skip(count - width).collect();
    }
    format!("{:0>width$}", trimmed, width = width)
}

/// Routing numbers in the file header are right-justified in 10 positions.
fn routing(value: &str) -> String {
    let trimmed = value.trim();
    format!("{:>10}", trimmed).chars().take(10).collect()
}

fn blank(width: usize) -> String {
    " ".repeat(width)
}
