//! Keyed, insertion-ordered container of heterogeneous variants.
//!
//! A `Registry<dyn Shape>` owns its boxed entries exclusively and exposes
//! aggregate operations without ever naming a concrete type. Keys are issued
//! by the registry itself, so an entry can never be replaced by a later insert.

use crate::context::{EntryId, IdGenerator};
use crate::contract::Variant;
use crate::error::{Result, ShopError};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

pub struct Registry<T: ?Sized> {
    name: String,
    ids: IdGenerator,
    entries: BTreeMap<EntryId, Box<T>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: IdGenerator::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes ownership of `item` and returns its key. Keys increase
    /// monotonically and are never reused, so iteration follows insertion order.
    pub fn insert(&mut self, item: Box<T>) -> EntryId {
        let id = self.ids.next_id();
        self.entries.insert(id, item);
        debug!(registry = %self.name, id = %id, size = self.entries.len(), "inserted entry");
        id
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: EntryId) -> Result<&T> {
        self.entries
            .get(&id)
            .map(|item| item.as_ref())
            .ok_or_else(|| ShopError::not_found(id))
    }

    pub fn get_mut(&mut self, id: EntryId) -> Result<&mut T> {
        self.entries
            .get_mut(&id)
            .map(|item| item.as_mut())
            .ok_or_else(|| ShopError::not_found(id))
    }

    pub fn remove(&mut self, id: EntryId) -> Result<Box<T>> {
        let item = self
            .entries
            .remove(&id)
            .ok_or_else(|| ShopError::not_found(id))?;
        debug!(registry = %self.name, id = %id, size = self.entries.len(), "removed entry");
        Ok(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> + '_ {
        self.entries.iter().map(|(id, item)| (*id, item.as_ref()))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.values().map(|item| item.as_ref())
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.keys().copied().collect()
    }

    /// First entry (in insertion order) matching `pred`.
    pub fn find<P>(&self, mut pred: P) -> Option<(EntryId, &T)>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|(_, item)| pred(*item))
    }

    pub fn filter<P>(&self, mut pred: P) -> Vec<(EntryId, &T)>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|(_, item)| pred(*item)).collect()
    }

    pub fn aggregate<A, F>(&self, init: A, mut fold: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.values().fold(init, |acc, item| fold(acc, item))
    }

    pub fn sum_by<F>(&self, f: F) -> f64
    where
        F: Fn(&T) -> f64,
    {
        self.aggregate(0.0, |acc, item| acc + f(item))
    }

    /// Applies a mutating operation to every entry, stopping at the first error.
    pub fn for_each_mut<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut T) -> Result<()>,
    {
        for item in self.entries.values_mut() {
            f(item.as_mut())?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn drain(&mut self) -> Vec<(EntryId, Box<T>)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }
}

impl<T: Variant + ?Sized> Registry<T> {
    /// JSON array of `{ id, kind, data }` in insertion order.
    pub fn snapshot(&self) -> Result<Value> {
        let items = self
            .iter()
            .map(|(id, item)| -> Result<Value> {
                Ok(json!({
                    "id": id.value(),
                    "kind": item.kind(),
                    "data": item.snapshot()?,
                }))
            })
            .collect::<Result<Vec<Value>>>()?;
        Ok(Value::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{round_cents, Shape};
    use crate::shapes::{Circle, Rectangle, Square};
    use proptest::prelude::*;

    fn shape_registry() -> (Registry<dyn Shape>, EntryId, EntryId) {
        let mut shapes: Registry<dyn Shape> = Registry::new("shapes");
        let circle = shapes.insert(Box::new(Circle::new(5.0).unwrap()));
        let rect = shapes.insert(Box::new(Rectangle::new(10.0, 20.0).unwrap()));
        (shapes, circle, rect)
    }

    #[test]
    fn test_aggregate_area() {
        let (shapes, _, _) = shape_registry();

        let total = shapes.sum_by(|s| s.area());
        assert!((total - 278.54).abs() < 0.01);
        assert_eq!(round_cents(total), 278.54);
    }

    #[test]
    fn test_aggregate_is_stable() {
        let (mut shapes, _, _) = shape_registry();
        shapes.insert(Box::new(Square::new(1.5).unwrap()));

        let kinds = |r: &Registry<dyn Shape>| {
            r.aggregate(Vec::new(), |mut acc, s| {
                acc.push(s.kind());
                acc
            })
        };
        assert_eq!(kinds(&shapes), vec!["Circle", "Rectangle", "Square"]);
        assert_eq!(kinds(&shapes), kinds(&shapes));
    }

    #[test]
    fn test_remove_and_not_found() {
        let (mut shapes, circle, rect) = shape_registry();

        let removed = shapes.remove(circle).unwrap();
        assert_eq!(removed.kind(), "Circle");
        assert_eq!(shapes.len(), 1);
        assert!(!shapes.contains(circle));

        assert_eq!(shapes.remove(circle).unwrap_err(), ShopError::not_found(circle));
        assert!(shapes.get(circle).is_err());
        assert_eq!(shapes.get(rect).unwrap().area(), 200.0);
    }

    #[test]
    fn test_find_and_filter() {
        let (shapes, _, rect) = shape_registry();

        let (id, found) = shapes.find(|s| s.area() > 100.0).unwrap();
        assert_eq!(id, rect);
        assert_eq!(found.kind(), "Rectangle");
        assert!(shapes.find(|s| s.area() > 1000.0).is_none());
        assert_eq!(shapes.filter(|s| s.perimeter() > 10.0).len(), 2);
    }

    #[test]
    fn test_for_each_mut() {
        use crate::contract::Product;
        use crate::products::PhysicalProduct;

        let mut products: Registry<dyn Product> = Registry::new("products");
        products.insert(Box::new(PhysicalProduct::new("A", "A-1", 10.0, 0.0, 0.0).unwrap()));
        products.insert(Box::new(PhysicalProduct::new("B", "B-1", 30.0, 0.0, 0.0).unwrap()));

        products.for_each_mut(|p| p.apply_discount(50.0)).unwrap();
        assert_eq!(products.sum_by(|p| p.final_price()), 20.0);

        assert!(products.for_each_mut(|p| p.apply_discount(500.0)).is_err());
    }

    #[test]
    fn test_insert_never_replaces() {
        let mut first: Registry<dyn Shape> = Registry::new("first");
        let mut second: Registry<dyn Shape> = Registry::new("second");
        let a = first.insert(Box::new(Circle::new(5.0).unwrap()));
        let b = second.insert(Box::new(Rectangle::new(10.0, 20.0).unwrap()));
        assert_eq!(a, b);

        // entries moved between registries are re-keyed by the receiver
        for (_, shape) in second.drain() {
            first.insert(shape);
        }
        assert_eq!(first.len(), 2);
        assert!((first.sum_by(|s| s.area()) - 278.54).abs() < 0.01);
    }

    #[test]
    fn test_keys_not_reused_after_remove() {
        let (mut shapes, circle, rect) = shape_registry();
        shapes.remove(rect).unwrap();
        let square = shapes.insert(Box::new(Square::new(2.0).unwrap()));

        assert!(square > rect);
        assert_eq!(shapes.ids(), vec![circle, square]);
        assert_eq!(shapes.name(), "shapes");
    }

    #[test]
    fn test_snapshot() {
        let (shapes, _, _) = shape_registry();

        let snapshot = shapes.snapshot().unwrap();
        assert_eq!(snapshot[0]["kind"], "Circle");
        assert_eq!(snapshot[0]["data"]["radius"], 5.0);
        assert_eq!(snapshot[1]["id"], 2);
        assert_eq!(snapshot[1]["data"]["width"], 10.0);
    }

    #[test]
    fn test_drain_empties() {
        let (mut shapes, circle, _) = shape_registry();
        let drained = shapes.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].0, circle);
        assert!(shapes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_sum_matches_sequential_sum(sides in prop::collection::vec(0.1f64..100.0, 0..20)) {
            let mut shapes: Registry<dyn Shape> = Registry::new("squares");
            for side in &sides {
                shapes.insert(Box::new(Square::new(*side).unwrap()));
            }
            let expected: f64 = sides.iter().map(|s| s * s).sum();
            prop_assert_eq!(shapes.len(), sides.len());
            prop_assert!((shapes.sum_by(|s| s.area()) - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_iteration_follows_insertion(count in 0usize..30) {
            let mut shapes: Registry<dyn Shape> = Registry::new("squares");
            let ids: Vec<EntryId> = (0..count)
                .map(|i| shapes.insert(Box::new(Square::new(i as f64 + 1.0).unwrap())))
                .collect();
            prop_assert_eq!(shapes.ids(), ids);
        }
    }
}
