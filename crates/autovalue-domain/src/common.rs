//! Shared money helpers and display traits for pricing primitives.

/// Whole-unit monetary amount. Calculators round half away from zero.
pub type Money = f64;

/// Rounds a raw amount to whole currency units.
pub fn round_money(amount: f64) -> Money {
    if amount.is_finite() {
        amount.round()
    } else {
        0.0
    }
}

/// Converts an entity into a short user-facing label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_money_rounds_half_away_from_zero() {
        assert_eq!(round_money(4499.5), 4500.0);
        assert_eq!(round_money(-0.5), -1.0);
        assert_eq!(round_money(12.49), 12.0);
    }

    #[test]
    fn round_money_maps_non_finite_to_zero() {
        assert_eq!(round_money(f64::NAN), 0.0);
        assert_eq!(round_money(f64::INFINITY), 0.0);
    }
}
