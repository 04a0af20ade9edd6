use crate::contract::{round_cents, Product, Variant};
use crate::error::Result;
use crate::validate;
use serde::Serialize;

fn check_discount(percent: f64) -> Result<()> {
    validate::positive("discount", percent)?;
    validate::in_range("discount", percent, 0.0, 100.0)
}

fn discounted(price: f64, percent: f64) -> f64 {
    price * (1.0 - percent / 100.0)
}

// =============================================================================
// Physical goods: shipped by weight
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalProduct {
    name: String,
    sku: String,
    price: f64,
    weight_kg: f64,
    shipping_per_kg: f64,
    discount: f64,
}

impl PhysicalProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: f64,
        weight_kg: f64,
        shipping_per_kg: f64,
    ) -> Result<Self> {
        let name = name.into();
        let sku = sku.into();
        validate::non_empty("name", &name)?;
        validate::non_empty("sku", &sku)?;
        validate::amount("price", price)?;
        validate::in_range("weight_kg", weight_kg, 0.0, validate::MAX_WEIGHT_KG)?;
        validate::balance("shipping_per_kg", shipping_per_kg)?;
        Ok(Self {
            name,
            sku,
            price,
            weight_kg,
            shipping_per_kg,
            discount: 0.0,
        })
    }

    pub fn shipping_cost(&self) -> f64 {
        round_cents(self.weight_kg * self.shipping_per_kg)
    }
}

impl Variant for PhysicalProduct {
    fn kind(&self) -> &'static str {
        "PhysicalProduct"
    }

    fn label(&self) -> String {
        format!("{} [{}]", self.name, self.sku)
    }
}

impl Product for PhysicalProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn sku(&self) -> &str {
        &self.sku
    }

    fn base_price(&self) -> f64 {
        self.price
    }

    // Shipping is never discounted.
    fn final_price(&self) -> f64 {
        round_cents(discounted(self.price, self.discount) + self.shipping_cost())
    }

    fn apply_discount(&mut self, percent: f64) -> Result<()> {
        check_discount(percent)?;
        self.discount = percent;
        Ok(())
    }
}

// =============================================================================
// Digital goods: priced per licence seat
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitalProduct {
    name: String,
    sku: String,
    price: f64,
    download_mb: f64,
    seats: u32,
    discount: f64,
}

impl DigitalProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: f64,
        download_mb: f64,
        seats: u32,
    ) -> Result<Self> {
        let name = name.into();
        let sku = sku.into();
        validate::non_empty("name", &name)?;
        validate::non_empty("sku", &sku)?;
        validate::amount("price", price)?;
        validate::positive("download_mb", download_mb)?;
        validate::in_range("seats", seats, 1, 1000)?;
        Ok(Self {
            name,
            sku,
            price,
            download_mb,
            seats,
            discount: 0.0,
        })
    }

    pub fn download_mb(&self) -> f64 {
        self.download_mb
    }
}

impl Variant for DigitalProduct {
    fn kind(&self) -> &'static str {
        "DigitalProduct"
    }

    fn label(&self) -> String {
        format!("{} [{}] x{} seats", self.name, self.sku, self.seats)
    }
}

impl Product for DigitalProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn sku(&self) -> &str {
        &self.sku
    }

    fn base_price(&self) -> f64 {
        self.price
    }

    fn final_price(&self) -> f64 {
        round_cents(discounted(self.price * self.seats as f64, self.discount))
    }

    fn apply_discount(&mut self, percent: f64) -> Result<()> {
        check_discount(percent)?;
        self.discount = percent;
        Ok(())
    }
}

// =============================================================================
// Subscriptions: monthly price, with a built-in discount for long terms
// =============================================================================

/// Terms of this many months or longer get `LONG_TERM_DISCOUNT` percent off.
const LONG_TERM_MONTHS: u32 = 12;
const LONG_TERM_DISCOUNT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionProduct {
    name: String,
    sku: String,
    monthly_price: f64,
    months: u32,
    discount: f64,
}

impl SubscriptionProduct {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        monthly_price: f64,
        months: u32,
    ) -> Result<Self> {
        let name = name.into();
        let sku = sku.into();
        validate::non_empty("name", &name)?;
        validate::non_empty("sku", &sku)?;
        validate::amount("monthly_price", monthly_price)?;
        validate::in_range("months", months, 1, 60)?;
        Ok(Self {
            name,
            sku,
            monthly_price,
            months,
            discount: 0.0,
        })
    }

    pub fn months(&self) -> u32 {
        self.months
    }
}

impl Variant for SubscriptionProduct {
    fn kind(&self) -> &'static str {
        "SubscriptionProduct"
    }

    fn label(&self) -> String {
        format!("{} [{}] {} months", self.name, self.sku, self.months)
    }
}

impl Product for SubscriptionProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn sku(&self) -> &str {
        &self.sku
    }

    fn base_price(&self) -> f64 {
        self.monthly_price
    }

    fn final_price(&self) -> f64 {
        let mut total = self.monthly_price * self.months as f64;
        if self.months >= LONG_TERM_MONTHS {
            total = discounted(total, LONG_TERM_DISCOUNT);
        }
        round_cents(discounted(total, self.discount))
    }

    fn apply_discount(&mut self, percent: f64) -> Result<()> {
        check_discount(percent)?;
        self.discount = percent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_final_price_includes_shipping() {
        let mut lamp = PhysicalProduct::new("Lamp", "LMP-1", 40.0, 2.0, 1.5).unwrap();
        assert_eq!(lamp.final_price(), 43.0);

        lamp.apply_discount(25.0).unwrap();
        assert_eq!(lamp.final_price(), 33.0);
        assert_eq!(lamp.base_price(), 40.0);
    }

    #[test]
    fn test_digital_price_scales_with_seats() {
        let mut suite = DigitalProduct::new("Office", "OFF-5", 19.99, 850.0, 5).unwrap();
        assert_eq!(suite.final_price(), 99.95);

        suite.apply_discount(20.0).unwrap();
        assert_eq!(suite.final_price(), 79.96);
    }

    #[test]
    fn test_subscription_long_term_discount() {
        let short = SubscriptionProduct::new("News", "NEWS-6", 10.0, 6).unwrap();
        assert_eq!(short.final_price(), 60.0);

        let long = SubscriptionProduct::new("News", "NEWS-12", 10.0, 12).unwrap();
        assert_eq!(long.final_price(), 108.0);
    }

    #[test]
    fn test_price_boundary() {
        assert!(PhysicalProduct::new("Pin", "PIN", 0.0, 0.0, 0.0)
            .unwrap_err()
            .is_validation());
        assert!(PhysicalProduct::new("Pin", "PIN", 0.01, 0.0, 0.0).is_ok());
        assert!(DigitalProduct::new("Font", "FNT", -3.0, 1.0, 1).is_err());
        assert!(DigitalProduct::new("Font", "FNT", 3.0, 1.0, 0).is_err());
        assert!(SubscriptionProduct::new("", "EMPTY", 3.0, 1).is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        assert!(PhysicalProduct::new("Gold", "AU", 1e307, 0.0, 0.0).is_err());
        assert!(PhysicalProduct::new("Crate", "CR", 10.0, 1e300, 1e10).is_err());
        assert!(SubscriptionProduct::new("Vault", "VLT", 1e307, 12).is_err());

        let bulk = DigitalProduct::new("Suite", "STE", crate::validate::MAX_AMOUNT, 1.0, 1000).unwrap();
        assert!(bulk.final_price().is_finite());
    }

    #[test]
    fn test_discount_rejected_leaves_state() {
        let mut lamp = PhysicalProduct::new("Lamp", "LMP-1", 40.0, 0.0, 0.0).unwrap();
        assert!(lamp.apply_discount(0.0).is_err());
        assert!(lamp.apply_discount(150.0).is_err());
        assert_eq!(lamp.final_price(), 40.0);

        assert!(lamp.apply_discount(100.0).is_ok());
        assert_eq!(lamp.final_price(), 0.0);
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let mut catalog: Vec<Box<dyn Product>> = vec![
            Box::new(PhysicalProduct::new("Lamp", "LMP-1", 40.0, 2.0, 1.5).unwrap()),
            Box::new(DigitalProduct::new("Office", "OFF-1", 20.0, 850.0, 1).unwrap()),
        ];
        for product in catalog.iter_mut() {
            product.apply_discount(50.0).unwrap();
        }
        let prices: Vec<f64> = catalog.iter().map(|p| p.final_price()).collect();
        assert_eq!(prices, vec![23.0, 10.0]);
    }
}
