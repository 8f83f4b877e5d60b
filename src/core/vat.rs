use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Default VAT rate in percent.
pub const DEFAULT_VAT_RATE: Decimal = dec!(21);

/// Gross amount split into its VAT-exclusive part and the VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatSplit {
    /// VAT rate in percent.
    pub rate: Decimal,
    /// Amount excluding VAT.
    pub excl: Decimal,
    /// VAT amount.
    pub vat: Decimal,
    /// Amount including VAT, as entered.
    pub incl: Decimal,
}

impl VatSplit {
    /// Split a VAT-inclusive amount.
    ///
    /// `excl = round(incl / (1 + rate / 100), 2)` and `vat = round(incl - excl, 2)`,
    /// so `excl + vat` always equals the rounded gross amount. Rates outside
    /// `0..=100` are `InvalidInput`.
    pub fn from_gross(incl: Decimal, rate: Decimal) -> Result<Self, InvoiceError> {
        check_vat_rate(rate)?;
        let overflow = || InvoiceError::InvalidInput(format!("amount {incl} is out of range"));
        let divisor = Decimal::ONE + rate / dec!(100);
        let excl = round_half_up(incl.checked_div(divisor).ok_or_else(overflow)?, 2);
        let vat = round_half_up(incl.checked_sub(excl).ok_or_else(overflow)?, 2);
        Ok(Self {
            rate,
            excl,
            vat,
            incl,
        })
    }
}

/// Reject VAT rates outside `0..=100` percent.
pub fn check_vat_rate(rate: Decimal) -> Result<(), InvoiceError> {
    if rate < Decimal::ZERO || rate > dec!(100) {
        return Err(InvoiceError::InvalidInput(format!(
            "vat_rate must be between 0 and 100, got {rate}"
        )));
    }
    Ok(())
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse an operator-entered gross amount.
///
/// Accepts `.` or `,` as decimal separator. Empty, non-numeric, zero and
/// negative amounts are rejected.
pub fn parse_amount(input: &str) -> Result<Decimal, InvoiceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvoiceError::InvalidInput("amount must not be empty".into()));
    }
    let normalized = trimmed.replace(',', ".");
    let amount: Decimal = normalized
        .parse()
        .map_err(|_| InvoiceError::InvalidInput(format!("'{trimmed}' is not a valid amount")))?;
    if amount <= Decimal::ZERO {
        return Err(InvoiceError::InvalidInput(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

/// Format an amount for display: `€ 1,234.50`.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = round_half_up(amount, 2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("€ -{grouped}.{frac_part}")
    } else {
        format!("€ {grouped}.{frac_part}")
    }
}
