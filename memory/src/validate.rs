//! Input checks shared by the components. Failures are [`MemoryError::Validation`].

use memory_core::{MemoryError, Result};

pub(crate) fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MemoryError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Value must be finite and within [0, 1].
pub(crate) fn unit_interval(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(MemoryError::validation(format!(
            "{} must be within [0.0, 1.0], got {}",
            field, value
        )));
    }
    Ok(())
}
