//! # Shopfloor
//!
//! Polymorphic domain objects behind trait contracts, held in registries
//! that operate on them without knowing their concrete types.
//!
//! ## Building Blocks
//!
//! 1. **Contracts** - `Shape`, `Product`, `Payment`, `Account`, `LibraryItem`
//! 2. **Variants** - validated concrete types (`Circle`, `PhysicalProduct`, `CreditCardPayment`, ...)
//! 3. **Registries** - keyed `Registry<dyn Contract>` and FIFO/LIFO `OrderedRegistry`
//! 4. **Dispatch** - aggregate functions written against the contracts only
//! 5. **Lifecycle** - the guarded `Order` state machine
//!
//! ## Example
//!
//! ```
//! use shopfloor::prelude::*;
//!
//! let mut shapes: Registry<dyn Shape> = Registry::new("shapes");
//! shapes.insert(Box::new(Circle::new(5.0).unwrap()));
//! shapes.insert(Box::new(Rectangle::new(10.0, 20.0).unwrap()));
//!
//! assert_eq!(round_cents(total_area(&shapes)), 278.54);
//! ```
//!
//! ## Key Dependencies
//!
//! - `thiserror` - error enums
//! - `serde` / `serde_json` / `toml` - snapshots and configuration
//! - `tracing` - structured logs for registry mutations and transitions

pub mod accounts;
pub mod cart;
pub mod context;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod library;
pub mod order;
pub mod payments;
pub mod products;
pub mod queue;
pub mod registry;
pub mod shapes;
pub mod users;
pub mod validate;

pub use context::{Context, EntryId, ShopConfig};
pub use error::{Result, ShopError};
pub use registry::Registry;

pub mod prelude {
    pub use crate::accounts::{CheckingAccount, SavingsAccount};
    pub use crate::cart::ShoppingCart;
    pub use crate::context::{Context, EntryId, ShopConfig};
    pub use crate::contract::{
        round_cents, Account, LibraryItem, Payment, Product, Receipt, Shape, Snapshot, Variant,
    };
    pub use crate::dispatch::*;
    pub use crate::error::{Result, ShopError, ValidationErrors};
    pub use crate::library::{Book, Dvd, Library, Magazine};
    pub use crate::order::{Order, OrderStatus};
    pub use crate::payments::{BankTransferPayment, CreditCardPayment, PayPalPayment};
    pub use crate::products::{DigitalProduct, PhysicalProduct, SubscriptionProduct};
    pub use crate::queue::{FifoQueue, LifoStack, OrderedRegistry};
    pub use crate::registry::Registry;
    pub use crate::shapes::{Circle, Rectangle, Square, Triangle};
    pub use crate::users::User;
}
