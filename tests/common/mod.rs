//! Shared fixtures for the integration tests.
//!
//! The files mirror small real-world ACH files: a single PPD debit, three
//! WEB debits with payment addenda, and a mixed credit/debit payroll file.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use nacha_merge::{
    Addenda05, Batch, BatchHeader, EntryDetail, File, FileHeader, IatAddenda, IatBatch,
    IatBatchHeader, IatEntryDetail,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn entry(code: u8, routing: &str, account: &str, amount: u64, name: &str, trace: &str) -> EntryDetail {
    let mut entry = EntryDetail {
        transaction_code: code,
        dfi_account_number: account.to_string(),
        amount,
        individual_name: name.to_string(),
        trace_number: trace.to_string(),
        ..Default::default()
    };
    entry.set_rdfi(routing).unwrap();
    entry
}

fn batch_header(
    service_class_code: u16,
    company_name: &str,
    company_identification: &str,
    sec: &str,
    description: &str,
    odfi: &str,
    batch_number: u32,
) -> BatchHeader {
    BatchHeader {
        service_class_code,
        company_name: company_name.to_string(),
        company_identification: company_identification.to_string(),
        standard_entry_class_code: sec.to_string(),
        company_entry_description: description.to_string(),
        effective_entry_date: date(2019, 8, 17),
        originator_status_code: 1,
        odfi_identification: odfi.to_string(),
        batch_number,
        ..Default::default()
    }
}

/// One PPD batch with a single $1,000,000.00 debit. 5 lines.
pub fn ppd_debit_file() -> File {
    let mut header = FileHeader::new("231380104", "121042882", date(2019, 8, 16));
    header.file_creation_time = NaiveTime::from_hms_opt(11, 11, 0);
    header.immediate_destination_name = "Federal Reserve Bank".to_string();
    header.immediate_origin_name = "My Bank Name".to_string();

    let mut batch = Batch::new(batch_header(
        225,
        "Name on Account",
        "121042882",
        "PPD",
        "REG.SALARY",
        "12104288",
        1,
    ));
    batch.add_entry(entry(
        27,
        "231380104",
        "12345678",
        100_000_000,
        "Receiver Account Name",
        "121042880000001",
    ));

    let mut file = File::new();
    file.set_header(header).add_batch(batch);
    file.create().unwrap();
    file
}

/// Three WEB batches, each with one debit and one 05 addenda. 12 lines.
pub fn web_debit_file() -> File {
    let mut header = FileHeader::new("031300012", "231380104", date(2019, 8, 16));
    header.immediate_destination_name = "Federal Reserve Bank".to_string();
    header.immediate_origin_name = "My Bank Name".to_string();

    let mut file = File::new();
    file.set_header(header);
    let batches = [
        ("SUBSCRIBE", "Jane Smith", 10_000u64),
        ("ONLINEPYMT", "Paul Jones", 20_000),
        ("RENEWAL", "Sam Davis", 30_000),
    ];
    for (i, (description, name, amount)) in batches.into_iter().enumerate() {
        let number = u32::try_from(i + 1).unwrap();
        let mut batch = Batch::new(batch_header(
            225,
            "Online Merchant",
            "231380104",
            "WEB",
            description,
            "23138010",
            number,
        ));
        let mut debit = entry(
            27,
            "031300012",
            "744-5678-99",
            amount,
            name,
            &format!("23138010000000{}", number),
        );
        debit.addenda05.push(Addenda05::new("PAY-GATE payment"));
        batch.add_entry(debit);
        file.add_batch(batch);
    }
    file.create().unwrap();
    file
}

/// A payroll file: one credits-only batch and one debits-only batch. 8 lines.
pub fn payroll_file() -> File {
    let header = FileHeader::new("076401251", "076401251", date(2011, 8, 5));

    let mut credits = Batch::new(batch_header(
        220,
        "Acme Payroll",
        "1234567890",
        "PPD",
        "PAYROLL",
        "07640125",
        1,
    ));
    credits.add_entry(entry(
        22,
        "076401251",
        "12345678",
        250_000,
        "Employee One",
        "076401250000001",
    ));
    credits.add_entry(entry(
        32,
        "076401251",
        "87654321",
        125_000,
        "Employee Two",
        "076401250000002",
    ));

    let mut debits = Batch::new(batch_header(
        225,
        "Acme Payroll",
        "1234567890",
        "CCD",
        "FUNDING",
        "07640125",
        2,
    ));
    debits.add_entry(entry(
        27,
        "076401251",
        "55555555",
        375_000,
        "Acme Corp",
        "076401250000003",
    ));

    let mut file = File::new();
    file.set_header(header).add_batch(credits).add_batch(debits);
    file.create().unwrap();
    file
}

/// A single IAT credit with two addenda.
pub fn iat_batch() -> IatBatch {
    let mut batch = IatBatch::new(IatBatchHeader {
        service_class_code: 220,
        foreign_exchange_indicator: "FF".to_string(),
        iso_destination_country_code: "US".to_string(),
        originator_identification: "123456789".to_string(),
        standard_entry_class_code: "IAT".to_string(),
        company_entry_description: "TRADEPAYMT".to_string(),
        iso_originating_currency_code: "CAD".to_string(),
        iso_destination_currency_code: "USD".to_string(),
        effective_entry_date: date(2019, 8, 17),
        originator_status_code: 1,
        odfi_identification: "23138010".to_string(),
        batch_number: 1,
        ..Default::default()
    });
    batch.add_entry(IatEntryDetail {
        transaction_code: 22,
        rdfi_identification: "12104288".to_string(),
        check_digit: "2".to_string(),
        amount: 100_000,
        dfi_account_number: "123456789".to_string(),
        trace_number: "231380100000001".to_string(),
        addenda10: Some(IatAddenda::new("ANN000000000100000928383-23938")),
        addenda11: Some(IatAddenda::new("BEK Solutions")),
        ..Default::default()
    });
    batch.create();
    batch
}

/// Appends `count` single-entry PPD batches that all share one header.
///
/// Each entry copies the file's first entry with a fresh trace number.
/// Call `create` on the file afterwards.
pub fn populate_with_mock_batches(file: &mut File, count: u32) {
    let start = file.batches.last().unwrap().header().batch_number + 1;
    let template = file.batches[0].entries()[0].clone();
    let base: u64 = template.trace_number.parse().unwrap();

    for i in start..start + count {
        let mut batch = Batch::new(batch_header(
            225,
            "Example Company",
            "132465",
            "PPD",
            "Example Description",
            "12104288",
            i,
        ));
        let mut entry = template.clone();
        entry.trace_number = (base + u64::from(i) + 100_000).to_string();
        batch.add_entry(entry);
        batch.create();
        file.add_batch(batch);
    }
}

/// Domestic entries across all files.
pub fn count_trace_numbers(files: &[File]) -> usize {
    files.iter().map(File::entry_count).sum()
}

/// Compares headers, batch sets (order and batch number ignored) and control totals.
pub fn files_are_equal(f1: &File, f2: &File) -> Result<(), String> {
    if f1.header.immediate_origin != f2.header.immediate_origin {
        return Err(format!(
            "origin {} vs {}",
            f1.header.immediate_origin, f2.header.immediate_origin
        ));
    }
    if f1.header.immediate_destination != f2.header.immediate_destination {
        return Err(format!(
            "destination {} vs {}",
            f1.header.immediate_destination, f2.header.immediate_destination
        ));
    }
    if f1.batches.len() != f2.batches.len() {
        return Err(format!(
            "batch count {} vs {}",
            f1.batches.len(),
            f2.batches.len()
        ));
    }
    for batch in &f1.batches {
        if !f2.batches.iter().any(|other| batch.equal(other)) {
            return Err(format!("unable to find batch {:?}", batch.header()));
        }
    }
    if f1.iat_batches.len() != f2.iat_batches.len() {
        return Err(format!(
            "IAT batch count {} vs {}",
            f1.iat_batches.len(),
            f2.iat_batches.len()
        ));
    }
    let (c1, c2) = (&f1.control, &f2.control);
    if c1.entry_addenda_count != c2.entry_addenda_count
        || c1.total_debit_entry_dollar_amount_in_file != c2.total_debit_entry_dollar_amount_in_file
        || c1.total_credit_entry_dollar_amount_in_file
            != c2.total_credit_entry_dollar_amount_in_file
    {
        return Err(format!("controls differ: {:?} vs {:?}", c1, c2));
    }
    Ok(())
}
