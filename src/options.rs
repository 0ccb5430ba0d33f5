//! Validation options and merge conditions.
//!
//! Both travel as plain values: `ValidateOpts` is attached to each
//! [`File`](crate::File) and unioned when files are merged, `Conditions`
//! is handed to [`merge_files_with`](crate::merge_files_with).

use serde::{Deserialize, Serialize};

/// Physical line limit applied when `Conditions::max_lines` is zero.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// Relaxations of the default (strict) validation rules.
///
/// Every flag defaults to strict (`false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidateOpts {
    /// Disables all checks in `validate`, `validate_all` and header checks in `build`.
    pub skip_all: bool,

    /// Accepts return reason codes outside the standard R-code table.
    pub custom_return_codes: bool,

    /// Permits zero amounts on live entries and non-zero prenotes.
    pub allow_invalid_amounts: bool,
}

impl ValidateOpts {
    /// Combines two option sets so the result is at least as permissive as either.
    pub fn union(&self, other: &ValidateOpts) -> ValidateOpts {
        ValidateOpts {
            skip_all: self.skip_all || other.skip_all,
            custom_return_codes: self.custom_return_codes || other.custom_return_codes,
            allow_invalid_amounts: self.allow_invalid_amounts || other.allow_invalid_amounts,
        }
    }
}

/// Capacity limits for every file produced by a merge.
///
/// A zero value selects the default: [`DEFAULT_MAX_LINES`] for lines,
/// no limit for the dollar amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Conditions {
    /// Maximum physical lines per file, before block padding.
    pub max_lines: usize,

    /// Maximum sum of entry amounts per file, in cents.
    pub max_dollar_amount: u64,
}

impl Conditions {
    /// The line limit, with zero meaning [`DEFAULT_MAX_LINES`].
    ///
    /// ```
    /// use nacha_merge::{Conditions, DEFAULT_MAX_LINES};
    ///
    /// assert_eq!(Conditions::default().effective_max_lines(), DEFAULT_MAX_LINES);
    /// let small = Conditions { max_lines: 100, ..Default::default() };
    /// assert_eq!(small.effective_max_lines(), 100);
    /// ```
    pub fn effective_max_lines(&self) -> usize {
        if self.max_lines == 0 {
            DEFAULT_MAX_LINES
        } else {
            self.max_lines
        }
    }

    /// `None` when no dollar limit applies.
    pub fn effective_max_dollar_amount(&self) -> Option<u64> {
        if self.max_dollar_amount == 0 {
            None
        } else {
            Some(self.max_dollar_amount)
        }
    }
}
