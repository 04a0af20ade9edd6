use crate::context::{Context, EntryId};
use crate::contract::{round_cents, Payment, Product, Receipt};
use crate::error::{Result, ShopError};
use crate::order::Order;
use crate::registry::Registry;
use crate::validate;
use std::collections::BTreeMap;
use tracing::info;

pub const MAX_QUANTITY: u32 = 99;

/// Quantities are keyed by the same ids as `products`, so both maps walk in
/// the same order.
pub struct ShoppingCart {
    products: Registry<dyn Product>,
    quantities: BTreeMap<EntryId, u32>,
    tax_rate: f64,
}

impl ShoppingCart {
    pub fn new(ctx: &Context) -> Self {
        Self {
            products: Registry::new("cart"),
            quantities: BTreeMap::new(),
            tax_rate: ctx.config.tax_rate,
        }
    }

    pub fn add(&mut self, product: Box<dyn Product>, quantity: u32) -> Result<EntryId> {
        validate::in_range("quantity", quantity, 1, MAX_QUANTITY)?;
        let id = self.products.insert(product);
        self.quantities.insert(id, quantity);
        Ok(id)
    }

    pub fn update_quantity(&mut self, id: EntryId, quantity: u32) -> Result<()> {
        validate::in_range("quantity", quantity, 1, MAX_QUANTITY)?;
        match self.quantities.get_mut(&id) {
            Some(current) => {
                *current = quantity;
                Ok(())
            }
            None => Err(ShopError::not_found(id)),
        }
    }

    pub fn remove(&mut self, id: EntryId) -> Result<Box<dyn Product>> {
        let product = self.products.remove(id)?;
        self.quantities.remove(&id);
        Ok(product)
    }

    pub fn quantity(&self, id: EntryId) -> Option<u32> {
        self.quantities.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn items(&self) -> &Registry<dyn Product> {
        &self.products
    }

    /// Discount applied to one line; other lines keep their prices.
    pub fn apply_discount(&mut self, id: EntryId, percent: f64) -> Result<()> {
        self.products.get_mut(id)?.apply_discount(percent)
    }

    pub fn subtotal(&self) -> f64 {
        let total: f64 = self
            .products
            .values()
            .zip(self.quantities.values())
            .map(|(product, quantity)| product.final_price() * *quantity as f64)
            .sum();
        round_cents(total)
    }

    pub fn tax(&self) -> f64 {
        round_cents(self.subtotal() * self.tax_rate)
    }

    pub fn total(&self) -> f64 {
        round_cents(self.subtotal() + self.tax())
    }

    /// Charges the cart total and empties the cart. On failure the cart is kept.
    pub fn checkout(&mut self, payment: &mut dyn Payment) -> Result<Receipt> {
        if self.is_empty() {
            return Err(ShopError::empty("cart"));
        }
        let receipt = payment.process(self.total())?;
        info!(items = self.len(), total = receipt.total, method = payment.method(), "checkout complete");
        self.products.clear();
        self.quantities.clear();
        Ok(receipt)
    }

    /// Moves the cart contents into a pending order.
    pub fn into_order(self, ctx: &mut Context, customer: &str) -> Result<Order> {
        let mut order = Order::new(ctx, customer)?;
        for (product, quantity) in self.products.values().zip(self.quantities.values()) {
            order.add_line(product, *quantity)?;
        }
        Ok(order)
    }
}
