use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

/// Runs the derived rules on `val` and folds in checks that need runtime context.
pub fn validate_with<T: Validate>(
    val: &T,
    extra: impl IntoIterator<Item = (&'static str, Result<(), ValidationError>)>,
) -> Result<(), ValidationErrors> {
    let mut errors = match val.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    for (field, outcome) in extra {
        if let Err(error) = outcome {
            errors.add(field, error);
        }
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn deadline_not_in_past(deadline: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if deadline < today {
        return Err(error("deadline_in_past", "deadline cannot be in the past"));
    }
    Ok(())
}

pub fn non_negative(value: Option<Decimal>) -> Result<(), ValidationError> {
    match value {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            Err(error("negative_amount", "amount cannot be negative"))
        }
        _ => Ok(()),
    }
}

pub fn not_blank(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(text) if text.trim().is_empty() => Err(error("blank", "value cannot be blank")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn deadline_today_is_accepted_yesterday_is_not() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        assert!(deadline_not_in_past(today, today).is_ok());
        assert!(deadline_not_in_past(today.pred_opt().unwrap(), today).is_err());
    }

    #[test]
    fn salary_must_not_be_negative() {
        assert!(non_negative(None).is_ok());
        assert!(non_negative(Some(Decimal::ZERO)).is_ok());
        assert!(non_negative(Some(Decimal::new(3500000, 2))).is_ok());
        assert!(non_negative(Some(Decimal::new(-1, 2))).is_err());
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        assert!(not_blank(Some("   \n")).is_err());
        assert!(not_blank(Some("Hello")).is_ok());
        assert!(not_blank(None).is_ok());
    }
}
