//! Shared field rules used by the record validators.

use crate::error::{AchError, Result, MSG_FIELD_INCLUSION, MSG_INVALID_VALUE, MSG_NUMERIC};

/// A field counts as unset when it is blank or made entirely of zeros.
pub(crate) fn is_unset(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.bytes().all(|b| b == b'0')
}

/// Rejects a field left at its zero value.
pub(crate) fn require(field_name: &'static str, value: &str) -> Result<()> {
    if is_unset(value) {
        return Err(AchError::field(field_name, value, MSG_FIELD_INCLUSION));
    }
    Ok(())
}

/// Rejects non-digit characters; surrounding spaces are allowed.
pub(crate) fn numeric(field_name: &'static str, value: &str) -> Result<()> {
    if !value.trim().bytes().all(|b| b.is_ascii_digit()) {
        return Err(AchError::field(field_name, value, MSG_NUMERIC));
    }
    Ok(())
}

/// Rejects a numeric field that is not exactly `len` digits.
pub(crate) fn digits(field_name: &'static str, value: &str, len: usize) -> Result<()> {
    numeric(field_name, value)?;
    if value.trim().len() != len {
        return Err(AchError::field(
            field_name,
            value,
            format!("must be {} digits", len),
        ));
    }
    Ok(())
}

pub(crate) fn one_of<T>(field_name: &'static str, value: T, allowed: &[T]) -> Result<()>
where
    T: PartialEq + ToString,
{
    if !allowed.contains(&value) {
        return Err(AchError::field(field_name, value, MSG_INVALID_VALUE));
    }
    Ok(())
}

/// Parses the digits of a routing field for hashing; malformed values count as zero.
pub(crate) fn hash_value(value: &str) -> u64 {
    value.trim().parse().unwrap_or(0)
}
