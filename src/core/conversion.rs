use crate::domain::model::{Conversion, RateRecord};
use crate::utils::error::{RatesError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses a user supplied amount. Accepts a decimal comma as well.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| RatesError::InvalidAmount {
            input: input.to_string(),
        })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(RatesError::InvalidAmount {
            input: input.to_string(),
        });
    }
    Ok(amount)
}

/// `amount * (rate_from * scale_to) / (rate_to * scale_from)`.
///
/// Both rates are in base currency per `scale` units, so the scales cancel.
/// The result is left unrounded.
pub fn convert(amount: Decimal, from: &RateRecord, to: &RateRecord) -> Result<Decimal> {
    let invalid = |record: &RateRecord| RatesError::InvalidRate {
        abbreviation: record.abbreviation.clone(),
    };

    let divisor = to
        .official_rate
        .checked_mul(Decimal::from(from.scale))
        .ok_or_else(|| invalid(to))?;
    if divisor.is_zero() {
        return Err(if to.official_rate.is_zero() {
            invalid(to)
        } else {
            invalid(from)
        });
    }

    let numerator = from
        .official_rate
        .checked_mul(Decimal::from(to.scale))
        .ok_or_else(|| invalid(from))?;
    amount
        .checked_mul(numerator)
        .and_then(|v| v.checked_div(divisor))
        .ok_or_else(|| RatesError::InvalidAmount {
            input: amount.to_string(),
        })
}

impl Conversion {
    pub fn new(amount: Decimal, from: RateRecord, to: RateRecord) -> Result<Self> {
        let converted = convert(amount, &from, &to)?;
        Ok(Self {
            amount,
            from,
            to,
            converted,
        })
    }

    pub fn rounded(&self, precision: u32) -> Decimal {
        round_amount(self.converted, precision)
    }
}

pub fn round_amount(value: Decimal, precision: u32) -> Decimal {
    value
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
