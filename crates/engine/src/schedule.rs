//! Installment schedule arithmetic.
//!
//! Pure functions shared by the scheduler op: monthly due dates and the
//! equal-split of a principal across N installments.

use chrono::{Months, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Upper bound on installments per purchase, matching common issuer plans.
pub const MAX_INSTALLMENTS: u32 = 60;

/// Due dates for an N-installment purchase.
///
/// Installment `i` (1-based) is due `i` calendar months after the purchase
/// date. The day-of-month is clamped to the target month's length, so a
/// purchase on Jan 31 is due Feb 28 (29 in leap years), then Mar 31, and so
/// on; the day never drifts permanently to a shorter month's length.
pub fn due_dates(purchase_date: NaiveDate, installments: u32) -> ResultEngine<Vec<NaiveDate>> {
    validate_installments(installments)?;

    let mut dates = Vec::with_capacity(installments as usize);
    for i in 1..=installments {
        let due = purchase_date
            .checked_add_months(Months::new(i))
            .ok_or_else(|| {
                EngineError::InvalidInstallments("due date out of range".to_string())
            })?;
        dates.push(due);
    }
    Ok(dates)
}

/// Splits `amount_minor` into `installments` equal parts.
///
/// Each part is the floored quotient; the division remainder is absorbed by
/// the last installment, so the parts always sum to the principal exactly.
pub fn split_amount(amount_minor: i64, installments: u32) -> ResultEngine<Vec<i64>> {
    validate_installments(installments)?;
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }

    let n = i64::from(installments);
    let per = amount_minor / n;
    if per == 0 {
        return Err(EngineError::InvalidAmount(
            "amount too small to split across installments".to_string(),
        ));
    }

    let mut parts = vec![per; installments as usize];
    if let Some(last) = parts.last_mut() {
        *last = amount_minor - per * (n - 1);
    }
    Ok(parts)
}

/// Rejects installment counts outside `1..=MAX_INSTALLMENTS`.
pub(crate) fn validate_installments(installments: u32) -> ResultEngine<()> {
    if installments == 0 {
        return Err(EngineError::InvalidInstallments(
            "installments must be >= 1".to_string(),
        ));
    }
    if installments > MAX_INSTALLMENTS {
        return Err(EngineError::InvalidInstallments(format!(
            "installments must be <= {MAX_INSTALLMENTS}"
        )));
    }
    Ok(())
}
