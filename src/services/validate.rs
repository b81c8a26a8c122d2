//! Shared field validation helpers

use super::CatalogError;

/// Reject empty or whitespace-only values; `field` names the offender in the
/// error message.
pub fn non_blank(value: &str, field: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidInput(format!(
            "{} cannot be blank",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert!(non_blank("x", "Field").is_ok());
        assert!(non_blank("", "Field").is_err());
        assert!(non_blank(" \t ", "Field").is_err());
    }
}
