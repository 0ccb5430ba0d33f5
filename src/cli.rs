//! Command-line arguments for the `nacha-merge` binary.
//!
//! Flags map onto the library's [`Conditions`] and [`ValidateOpts`]; limits
//! can also come from the `NACHA_MAX_LINES` and `NACHA_MAX_DOLLAR_AMOUNT`
//! environment variables.

use crate::error::{AchError, Result};
use crate::money::Money;
use crate::options::{Conditions, ValidateOpts};
use clap::Parser;
use std::path::PathBuf;

/// Merge NACHA ACH files into the fewest valid files
#[derive(Parser, Debug)]
#[command(name = "nacha-merge")]
#[command(about = "Merge NACHA ACH files into the fewest valid files", long_about = None)]
pub struct CliArgs {
    /// Input CSV files, one ACH file each
    #[arg(value_name = "INPUT", required = true, help = "Paths to the input CSV files")]
    pub inputs: Vec<PathBuf>,

    /// Directory that receives merged-NNN.ach outputs
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Maximum physical lines per output file
    #[arg(
        long = "max-lines",
        value_name = "LINES",
        env = "NACHA_MAX_LINES",
        default_value_t = 0,
        help = "Maximum lines per output file (0 selects the default of 10000)"
    )]
    pub max_lines: usize,

    /// Maximum total entry amount per output file, in dollars
    #[arg(
        long = "max-dollar-amount",
        value_name = "DOLLARS",
        env = "NACHA_MAX_DOLLAR_AMOUNT",
        help = "Maximum dollar amount per output file, e.g. 1000000.00 (default: unlimited)"
    )]
    pub max_dollar_amount: Option<Money>,

    /// Disable all validation
    #[arg(long = "skip-all")]
    pub skip_all: bool,

    /// Accept non-standard return reason codes
    #[arg(long = "custom-return-codes")]
    pub custom_return_codes: bool,

    /// Accept zero-dollar live entries and non-zero prenotes
    #[arg(long = "allow-invalid-amounts")]
    pub allow_invalid_amounts: bool,
}

impl CliArgs {
    /// Merge conditions from the capacity flags.
    ///
    /// Fails when the dollar limit is negative or does not fit in cents.
    pub fn conditions(&self) -> Result<Conditions> {
        let max_dollar_amount = match self.max_dollar_amount {
            Some(amount) => amount.to_cents().ok_or_else(|| {
                AchError::InvalidArgument(format!("max dollar amount {} is out of range", amount))
            })?,
            None => 0,
        };
        Ok(Conditions {
            max_lines: self.max_lines,
            max_dollar_amount,
        })
    }

    /// Validation options applied to every imported file.
    pub fn validate_opts(&self) -> ValidateOpts {
        ValidateOpts {
            skip_all: self.skip_all,
            custom_return_codes: self.custom_return_codes,
            allow_invalid_amounts: self.allow_invalid_amounts,
        }
    }
}
