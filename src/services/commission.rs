//! Cálculo de comisión de mecánicos
//!
//! `comisión = round(total * porcentaje / 100, 2)`, redondeando los
//! puntos medios lejos de cero (0.005 → 0.01).

use rust_decimal::{Decimal, RoundingStrategy};

/// Calcular la comisión de un servicio
pub fn calculate_commission(total_amount: Decimal, commission_percentage: Decimal) -> Decimal {
    (total_amount * commission_percentage / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Decidir qué comisión se persiste.
///
/// Una comisión enviada por el cliente se guarda tal cual. Si no viene, se
/// calcula cuando se conoce el porcentaje del mecánico; sin mecánico la
/// comisión es cero.
pub fn resolve_commission(
    submitted: Option<Decimal>,
    total_amount: Decimal,
    mechanic_percentage: Option<Decimal>,
) -> Decimal {
    match (submitted, mechanic_percentage) {
        (Some(commission), _) => commission,
        (None, Some(percentage)) => calculate_commission(total_amount, percentage),
        (None, None) => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_calculate_commission() {
        assert_eq!(calculate_commission(dec("150000"), dec("10")), dec("15000.00"));
        assert_eq!(calculate_commission(dec("99.99"), dec("15")), dec("15.00"));
        assert_eq!(calculate_commission(dec("1000"), dec("0")), dec("0"));
    }

    #[test]
    fn test_calculate_commission_rounds_midpoint_up() {
        // 0.1 * 5% = 0.005 → 0.01
        assert_eq!(calculate_commission(dec("0.1"), dec("5")), dec("0.01"));
        // 33.33 * 12.5% = 4.16625 → 4.17
        assert_eq!(calculate_commission(dec("33.33"), dec("12.5")), dec("4.17"));
    }

    #[test]
    fn test_submitted_commission_is_kept_verbatim() {
        // aunque no coincida con el porcentaje del mecánico
        let resolved = resolve_commission(Some(dec("999.99")), dec("1000"), Some(dec("10")));
        assert_eq!(resolved, dec("999.99"));
    }

    #[test]
    fn test_missing_commission_is_computed() {
        assert_eq!(resolve_commission(None, dec("2500"), Some(dec("20"))), dec("500.00"));
        assert_eq!(resolve_commission(None, dec("2500"), None), Decimal::ZERO);
    }
}
