//! Customer-facing price resolution.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{ActivePriceType, Product};

impl Product {
    /// The price field selected by `activePriceType`.
    #[must_use]
    pub fn stored_price(&self, kind: ActivePriceType) -> Option<Decimal> {
        match kind {
            ActivePriceType::Price => self.price,
            ActivePriceType::Mrp => self.mrp,
            ActivePriceType::Discounted => self.discounted_price,
            ActivePriceType::Minimum => self.minimum_price,
        }
    }

    /// Customer-facing price.
    ///
    /// Uses the field named by `activePriceType`; when that field is unset,
    /// falls back to `price`, then `mrp`.
    #[must_use]
    pub fn active_price(&self) -> Option<Decimal> {
        self.stored_price(self.active_price_type)
            .or(self.price)
            .or(self.mrp)
    }

    /// Whole-number percentage saved against the MRP, when the active price
    /// is strictly below it.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let mrp = self.mrp?;
        let active = self.active_price()?;
        if mrp <= Decimal::ZERO || active >= mrp {
            return None;
        }
        ((mrp - active) / mrp * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }
}

/// Formats an amount the way the storefront shows it, e.g. `Rs. 2,499.00`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}Rs. {grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        serde_json::from_value(serde_json::json!({ "_id": "p", "name": "Lamp" })).unwrap()
    }

    #[test]
    fn active_price_uses_selected_field() {
        let mut p = product();
        p.price = Some(Decimal::from(1000));
        p.discounted_price = Some(Decimal::from(850));
        p.active_price_type = ActivePriceType::Discounted;
        assert_eq!(p.active_price(), Some(Decimal::from(850)));
    }

    #[test]
    fn active_price_falls_back_to_price_then_mrp() {
        let mut p = product();
        p.active_price_type = ActivePriceType::Minimum;
        p.mrp = Some(Decimal::from(1200));
        assert_eq!(p.active_price(), Some(Decimal::from(1200)));
        p.price = Some(Decimal::from(999));
        assert_eq!(p.active_price(), Some(Decimal::from(999)));
    }

    #[test]
    fn active_price_none_without_any_price() {
        assert!(product().active_price().is_none());
    }

    #[test]
    fn discount_percent_rounds_to_whole_number() {
        let mut p = product();
        p.mrp = Some(Decimal::from(3199));
        p.price = Some(Decimal::from(2499));
        // 700 / 3199 = 21.88%
        assert_eq!(p.discount_percent(), Some(22));
    }

    #[test]
    fn discount_percent_none_when_active_is_mrp() {
        let mut p = product();
        p.mrp = Some(Decimal::from(500));
        p.active_price_type = ActivePriceType::Mrp;
        assert!(p.discount_percent().is_none());
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(Decimal::new(249_900, 2)), "Rs. 2,499.00");
        assert_eq!(format_price(Decimal::from(15_999_000)), "Rs. 15,999,000.00");
        assert_eq!(format_price(Decimal::new(5, 1)), "Rs. 0.50");
        assert_eq!(format_price(Decimal::from(100)), "Rs. 100.00");
    }
}
