use crate::error::{Result, ShopError};
use std::collections::VecDeque;
use std::iter::FromIterator;
use std::marker::PhantomData;
use tracing::debug;

// =============================================================================
// Phantom markers select which end `dequeue` takes from
// =============================================================================

pub struct Fifo;
pub struct Lifo;

pub trait Discipline {
    const NAME: &'static str;

    fn take<T>(items: &mut VecDeque<T>) -> Option<T>;
    fn next_ref<T>(items: &VecDeque<T>) -> Option<&T>;
    fn ordered<'a, T>(items: &'a VecDeque<T>) -> Box<dyn Iterator<Item = &'a T> + 'a>;
}

impl Discipline for Fifo {
    const NAME: &'static str = "fifo";

    fn take<T>(items: &mut VecDeque<T>) -> Option<T> {
        items.pop_front()
    }

    fn next_ref<T>(items: &VecDeque<T>) -> Option<&T> {
        items.front()
    }

    fn ordered<'a, T>(items: &'a VecDeque<T>) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(items.iter())
    }
}

impl Discipline for Lifo {
    const NAME: &'static str = "lifo";

    fn take<T>(items: &mut VecDeque<T>) -> Option<T> {
        items.pop_back()
    }

    fn next_ref<T>(items: &VecDeque<T>) -> Option<&T> {
        items.back()
    }

    fn ordered<'a, T>(items: &'a VecDeque<T>) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(items.iter().rev())
    }
}

// =============================================================================
// Ordered registry
// =============================================================================

pub struct OrderedRegistry<T, D = Fifo> {
    items: VecDeque<T>,
    _discipline: PhantomData<D>,
}

pub type FifoQueue<T> = OrderedRegistry<T, Fifo>;
pub type LifoStack<T> = OrderedRegistry<T, Lifo>;

impl<T, D: Discipline> OrderedRegistry<T, D> {
    pub fn new() -> Self {
        OrderedRegistry {
            items: VecDeque::new(),
            _discipline: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedRegistry {
            items: VecDeque::with_capacity(capacity),
            _discipline: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
        debug!(discipline = D::NAME, size = self.items.len(), "enqueued");
    }

    /// Next item per the discipline, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let item = D::take(&mut self.items);
        if item.is_some() {
            debug!(discipline = D::NAME, size = self.items.len(), "dequeued");
        }
        item
    }

    /// Like [`dequeue`](Self::dequeue) for callers that treat emptiness as an error.
    pub fn try_dequeue(&mut self) -> Result<T> {
        self.dequeue()
            .ok_or_else(|| ShopError::empty(format!("{} queue", D::NAME)))
    }

    pub fn peek(&self) -> Option<&T> {
        D::next_ref(&self.items)
    }

    /// Items in dequeue order, without removing them.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        D::ordered(&self.items)
    }

    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Some(item) = self.dequeue() {
            out.push(item);
        }
        out
    }
}

impl<T, D: Discipline> Default for OrderedRegistry<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Iterator integration
// =============================================================================

pub struct IntoIter<T, D> {
    queue: OrderedRegistry<T, D>,
}

impl<T, D: Discipline> Iterator for IntoIter<T, D> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.dequeue()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T, D: Discipline> ExactSizeIterator for IntoIter<T, D> {}

impl<T, D: Discipline> IntoIterator for OrderedRegistry<T, D> {
    type Item = T;
    type IntoIter = IntoIter<T, D>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<T, D: Discipline> FromIterator<T> for OrderedRegistry<T, D> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T, D: Discipline> Extend<T> for OrderedRegistry<T, D> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Shape, Variant};
    use crate::shapes::{Circle, Rectangle, Square};
    use proptest::prelude::*;

    #[test]
    fn test_fifo_order() {
        let mut queue: FifoQueue<&str> = FifoQueue::new();
        queue.enqueue("A");
        queue.enqueue("B");
        queue.enqueue("C");

        assert_eq!(queue.dequeue(), Some("A"));
        assert_eq!(queue.dequeue(), Some("B"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_lifo_order() {
        let mut stack: LifoStack<&str> = LifoStack::new();
        stack.enqueue("A");
        stack.enqueue("B");
        stack.enqueue("C");

        assert_eq!(stack.dequeue(), Some("C"));
        assert_eq!(stack.dequeue(), Some("B"));
        assert_eq!(stack.peek(), Some(&"A"));
    }

    #[test]
    fn test_empty_dequeue_returns_none() {
        let mut queue: FifoQueue<u32> = FifoQueue::new();
        assert_eq!(queue.dequeue(), None);
        assert!(queue.peek().is_none());

        let err = queue.try_dequeue().unwrap_err();
        assert_eq!(err, ShopError::empty("fifo queue"));
    }

    #[test]
    fn test_iter_matches_dequeue_order() {
        let stack: LifoStack<i32> = vec![1, 2, 3].into_iter().collect();
        let peeked: Vec<i32> = stack.iter().copied().collect();
        let drained: Vec<i32> = stack.into_iter().collect();
        assert_eq!(peeked, vec![3, 2, 1]);
        assert_eq!(drained, peeked);
    }

    #[test]
    fn test_holds_trait_objects() {
        let mut queue: FifoQueue<Box<dyn Shape>> = FifoQueue::with_capacity(3);
        queue.enqueue(Box::new(Circle::new(1.0).unwrap()));
        queue.enqueue(Box::new(Rectangle::new(2.0, 3.0).unwrap()));
        queue.enqueue(Box::new(Square::new(2.0).unwrap()));

        let first = queue.dequeue().unwrap();
        assert_eq!(first.kind(), "Circle");
        let areas: Vec<f64> = queue.drain().iter().map(|s| s.area()).collect();
        assert_eq!(areas, vec![6.0, 4.0]);
        assert!(queue.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fifo_preserves_order(items in prop::collection::vec(any::<u16>(), 0..50)) {
            let queue: FifoQueue<u16> = items.iter().copied().collect();
            prop_assert_eq!(queue.into_iter().collect::<Vec<_>>(), items);
        }

        #[test]
        fn prop_lifo_reverses_order(items in prop::collection::vec(any::<u16>(), 0..50)) {
            let stack: LifoStack<u16> = items.iter().copied().collect();
            let mut expected = items.clone();
            expected.reverse();
            prop_assert_eq!(stack.into_iter().collect::<Vec<_>>(), expected);
        }
    }
}
