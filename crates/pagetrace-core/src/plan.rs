/// The fixed price table: three plans at fixed unit prices (INR).
///
/// Plan identifiers arrive from the client as free-form strings; anything
/// outside this table (including the `"unknown"` default) carries no price
/// and is excluded from the per-plan breakdown.
pub const PRICE_TABLE: [(&str, i64); 3] = [("plan_99", 99), ("plan_149", 149), ("plan_199", 199)];

/// Unit price for a plan identifier, `None` for unpriced plans.
pub fn unit_price(plan: &str) -> Option<i64> {
    PRICE_TABLE
        .iter()
        .find(|(id, _)| *id == plan)
        .map(|(_, price)| *price)
}

/// Display label for a plan identifier: the `plan_` prefix becomes the
/// rupee sign, so `plan_99` renders as `₹99`. Unpriced identifiers pass
/// through unchanged.
pub fn display_label(plan: &str) -> String {
    match plan.strip_prefix("plan_") {
        Some(rest) => format!("₹{rest}"),
        None => plan.to_string(),
    }
}

/// Format a rupee amount with thousands separators, e.g. `₹1,485`.
pub fn format_rupees(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_table_covers_three_plans() {
        assert_eq!(unit_price("plan_99"), Some(99));
        assert_eq!(unit_price("plan_149"), Some(149));
        assert_eq!(unit_price("plan_199"), Some(199));
        assert_eq!(unit_price("unknown"), None);
        assert_eq!(unit_price("plan_500"), None);
    }

    #[test]
    fn display_label_replaces_plan_prefix() {
        assert_eq!(display_label("plan_99"), "₹99");
        assert_eq!(display_label("plan_199"), "₹199");
        assert_eq!(display_label("unknown"), "unknown");
    }

    #[test]
    fn format_rupees_groups_thousands() {
        assert_eq!(format_rupees(0), "₹0");
        assert_eq!(format_rupees(99), "₹99");
        assert_eq!(format_rupees(1485), "₹1,485");
        assert_eq!(format_rupees(1234567), "₹1,234,567");
    }
}
