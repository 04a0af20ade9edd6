//! Order lifecycle.
//!
//! Transitions are guarded: an operation that does not apply to the current
//! status returns `false` and leaves the order untouched.

use crate::context::{Context, EntryId};
use crate::contract::{round_cents, Product, Variant};
use crate::error::Result;
use crate::validate;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Pending,
    Submitted,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Submitted => "Submitted",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Submitted | OrderStatus::Processing
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub sku: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> f64 {
        round_cents(self.unit_price * self.quantity as f64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    number: EntryId,
    customer: String,
    lines: Vec<OrderLine>,
    status: OrderStatus,
    tracking_number: Option<String>,
    cancel_reason: Option<String>,
    history: Vec<OrderStatus>,
}

impl Order {
    pub fn new(ctx: &mut Context, customer: impl Into<String>) -> Result<Self> {
        let customer = customer.into();
        validate::non_empty("customer", &customer)?;
        Ok(Self {
            number: ctx.next_id(),
            customer,
            lines: Vec::new(),
            status: OrderStatus::Pending,
            tracking_number: None,
            cancel_reason: None,
            history: vec![OrderStatus::Pending],
        })
    }

    pub fn number(&self) -> EntryId {
        self.number
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn history(&self) -> &[OrderStatus] {
        &self.history
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn total(&self) -> f64 {
        round_cents(self.lines.iter().map(OrderLine::total).sum())
    }

    /// Adds a line priced at the product's current final price. Only pending
    /// orders accept new lines.
    pub fn add_line(&mut self, product: &dyn Product, quantity: u32) -> Result<bool> {
        validate::in_range("quantity", quantity, 1, 10_000)?;
        if self.status != OrderStatus::Pending {
            return Ok(self.reject("add_line"));
        }
        self.lines.push(OrderLine {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            unit_price: product.final_price(),
            quantity,
        });
        Ok(true)
    }

    pub fn submit(&mut self) -> bool {
        if self.status != OrderStatus::Pending || self.lines.is_empty() {
            return self.reject("submit");
        }
        self.transition(OrderStatus::Submitted)
    }

    pub fn process(&mut self) -> bool {
        if self.status != OrderStatus::Submitted {
            return self.reject("process");
        }
        self.transition(OrderStatus::Processing)
    }

    pub fn ship(&mut self, tracking_number: &str) -> bool {
        if self.status != OrderStatus::Processing || tracking_number.trim().is_empty() {
            return self.reject("ship");
        }
        self.tracking_number = Some(tracking_number.trim().to_string());
        self.transition(OrderStatus::Shipped)
    }

    pub fn deliver(&mut self) -> bool {
        if self.status != OrderStatus::Shipped {
            return self.reject("deliver");
        }
        self.transition(OrderStatus::Delivered)
    }

    pub fn cancel(&mut self, reason: &str) -> bool {
        if !self.status.can_cancel() {
            return self.reject("cancel");
        }
        self.cancel_reason = Some(reason.to_string());
        self.transition(OrderStatus::Cancelled)
    }

    fn transition(&mut self, next: OrderStatus) -> bool {
        info!(order = %self.number, from = %self.status, to = %next, "order transition");
        self.status = next;
        self.history.push(next);
        true
    }

    fn reject(&self, operation: &str) -> bool {
        warn!(order = %self.number, status = %self.status, operation, "transition rejected");
        false
    }
}

impl Variant for Order {
    fn kind(&self) -> &'static str {
        "Order"
    }

    fn label(&self) -> String {
        format!("Order {} ({}) {}", self.number, self.customer, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{DigitalProduct, PhysicalProduct};

    fn order_with_line(ctx: &mut Context) -> Order {
        let mut order = Order::new(ctx, "ann").unwrap();
        let lamp = PhysicalProduct::new("Lamp", "LMP-1", 40.0, 0.0, 0.0).unwrap();
        assert!(order.add_line(&lamp, 2).unwrap());
        order
    }

    #[test]
    fn test_full_lifecycle() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);

        assert!(order.submit());
        assert!(order.process());
        assert!(order.ship("TRACK-1"));
        assert!(order.deliver());

        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.tracking_number(), Some("TRACK-1"));
        assert_eq!(
            order.history(),
            &[
                OrderStatus::Pending,
                OrderStatus::Submitted,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
            ]
        );
        assert!(order.status().is_final());
    }

    #[test]
    fn test_ship_from_pending_is_rejected() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);

        assert!(!order.ship("TRACK-1"));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.tracking_number(), None);
        assert_eq!(order.history().len(), 1);
    }

    #[test]
    fn test_out_of_order_transitions() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);

        assert!(!order.process());
        assert!(!order.deliver());
        assert!(order.submit());
        assert!(!order.submit());
        assert!(!order.ship("TRACK"));
        assert_eq!(order.status(), OrderStatus::Submitted);
    }

    #[test]
    fn test_empty_order_cannot_submit() {
        let mut ctx = Context::default();
        let mut order = Order::new(&mut ctx, "ann").unwrap();
        assert!(!order.submit());
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_blank_tracking_rejected() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);
        order.submit();
        order.process();
        assert!(!order.ship("   "));
        assert_eq!(order.status(), OrderStatus::Processing);
    }

    #[test]
    fn test_cancellation_rules() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);
        assert!(order.submit());
        assert!(order.cancel("changed mind"));
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(order.cancel_reason(), Some("changed mind"));

        let mut shipped = order_with_line(&mut ctx);
        shipped.submit();
        shipped.process();
        shipped.ship("T-9");
        assert!(!shipped.cancel("too late"));
        assert_eq!(shipped.status(), OrderStatus::Shipped);
    }

    #[test]
    fn test_lines_and_total() {
        let mut ctx = Context::default();
        let mut order = order_with_line(&mut ctx);
        let font = DigitalProduct::new("Font", "FNT-1", 12.5, 2.0, 1).unwrap();
        assert!(order.add_line(&font, 3).unwrap());
        assert_eq!(order.total(), 117.5);

        assert!(order.add_line(&font, 0).unwrap_err().is_validation());

        order.submit();
        assert!(!order.add_line(&font, 1).unwrap());
        assert_eq!(order.lines().len(), 2);
    }

    #[test]
    fn test_order_numbers_come_from_context() {
        let mut ctx = Context::default();
        let first = Order::new(&mut ctx, "ann").unwrap();
        let second = Order::new(&mut ctx, "bob").unwrap();
        assert!(second.number() > first.number());
        assert!(Order::new(&mut ctx, "").is_err());
    }
}
