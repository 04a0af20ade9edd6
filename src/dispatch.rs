//! Free functions that only know the contract, never the concrete variant.

use crate::contract::{round_cents, Account, Payment, Product, Receipt, Shape, Variant};
use crate::error::Result;
use crate::registry::Registry;
use itertools::Itertools;
use std::collections::BTreeMap;

pub fn total_area(shapes: &Registry<dyn Shape>) -> f64 {
    shapes.sum_by(|s| s.area())
}

pub fn largest_shape(shapes: &Registry<dyn Shape>) -> Option<&dyn Shape> {
    shapes
        .values()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}

/// Sum of final prices, one unit per product.
pub fn cart_value(products: &Registry<dyn Product>) -> f64 {
    round_cents(products.sum_by(|p| p.final_price()))
}

pub fn total_balance(accounts: &Registry<dyn Account>) -> f64 {
    round_cents(accounts.sum_by(|a| a.balance()))
}

/// Charges `amount` to every payment method. A failing method does not stop
/// the others; results come back in registry order.
pub fn process_all(payments: &mut Registry<dyn Payment>, amount: f64) -> Vec<Result<Receipt>> {
    let ids = payments.ids();
    ids.into_iter()
        .map(|id| payments.get_mut(id).and_then(|p| p.process(amount)))
        .collect()
}

pub fn describe_all<T: Variant + ?Sized>(registry: &Registry<T>) -> Vec<String> {
    registry
        .iter()
        .map(|(id, item)| format!("{id} {}", item.label()))
        .collect()
}

/// Number of entries per concrete kind, sorted by kind name.
pub fn group_by_kind<T: Variant + ?Sized>(registry: &Registry<T>) -> BTreeMap<&'static str, usize> {
    registry
        .values()
        .map(|item| item.kind())
        .counts()
        .into_iter()
        .collect()
}
