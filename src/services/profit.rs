//! Profit percentage calculation.

/// Percentage change from `share` to `current`.
///
/// Returns `None` when either value is missing, zero, or not finite, so
/// callers never see `inf` or `NaN`. No rounding is applied.
pub fn compute_profit_percent(share: Option<f64>, current: Option<f64>) -> Option<f64> {
    let share = share.filter(|v| v.is_finite() && *v != 0.0)?;
    let current = current.filter(|v| v.is_finite() && *v != 0.0)?;
    Some(((current - share) / share) * 100.0)
}
