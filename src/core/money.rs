use rust_decimal::Decimal;

/// Decimal places kept for peso amounts
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount a DECIMAL(14,2) column holds
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, AMOUNT_SCALE)
}

/// Validates a stored amount: non-negative, fits DECIMAL(14,2)
pub fn validate_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} cannot be negative", field));
    }

    if amount > max_amount() {
        return Err(format!("{} cannot exceed {}", field, max_amount()));
    }

    if amount.scale() > AMOUNT_SCALE {
        return Err(format!(
            "{} must have at most {} decimal places, got {}",
            field,
            AMOUNT_SCALE,
            amount.scale()
        ));
    }

    Ok(())
}

/// Rounds an amount to the display scale
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp(AMOUNT_SCALE)
}

/// Formats an amount as a fixed two-decimal string for JSON responses
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.width$}", round_amount(amount), width = AMOUNT_SCALE as usize)
}
