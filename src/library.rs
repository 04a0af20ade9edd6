use crate::context::{Context, EntryId};
use crate::contract::{round_cents, LibraryItem, Variant};
use crate::error::{Result, ShopError};
use crate::registry::Registry;
use crate::validate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

// =============================================================================
// Items
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: String,
    loan_days: u32,
}

impl Book {
    pub fn new(ctx: &Context, title: &str, author: &str, isbn: &str) -> Result<Self> {
        validate::non_empty("title", title)?;
        validate::non_empty("author", author)?;
        let isbn: String = isbn.chars().filter(|c| *c != '-').collect();
        validate::digits("isbn", &isbn, 10, 13)?;
        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn,
            loan_days: ctx.config.default_loan_days,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

impl Variant for Book {
    fn kind(&self) -> &'static str {
        "Book"
    }

    fn label(&self) -> String {
        format!("\"{}\" by {}", self.title, self.author)
    }
}

impl LibraryItem for Book {
    fn title(&self) -> &str {
        &self.title
    }

    fn loan_days(&self) -> u32 {
        self.loan_days
    }

    fn daily_late_fee(&self) -> f64 {
        0.25
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dvd {
    title: String,
    runtime_minutes: u32,
}

impl Dvd {
    pub fn new(title: &str, runtime_minutes: u32) -> Result<Self> {
        validate::non_empty("title", title)?;
        validate::in_range("runtime_minutes", runtime_minutes, 1, 1000)?;
        Ok(Self {
            title: title.to_string(),
            runtime_minutes,
        })
    }
}

impl Variant for Dvd {
    fn kind(&self) -> &'static str {
        "Dvd"
    }
}

impl LibraryItem for Dvd {
    fn title(&self) -> &str {
        &self.title
    }

    fn loan_days(&self) -> u32 {
        7
    }

    fn daily_late_fee(&self) -> f64 {
        1.0
    }
}

/// Magazines charge a flat fee once late, capped regardless of days.
#[derive(Debug, Clone, Serialize)]
pub struct Magazine {
    title: String,
    issue: u32,
}

impl Magazine {
    pub fn new(title: &str, issue: u32) -> Result<Self> {
        validate::non_empty("title", title)?;
        validate::in_range("issue", issue, 1, u32::MAX)?;
        Ok(Self {
            title: title.to_string(),
            issue,
        })
    }
}

impl Variant for Magazine {
    fn kind(&self) -> &'static str {
        "Magazine"
    }

    fn label(&self) -> String {
        format!("{} #{}", self.title, self.issue)
    }
}

impl LibraryItem for Magazine {
    fn title(&self) -> &str {
        &self.title
    }

    fn loan_days(&self) -> u32 {
        3
    }

    fn daily_late_fee(&self) -> f64 {
        0.10
    }

    fn late_fee(&self, days_late: u32) -> f64 {
        round_cents((self.daily_late_fee() * days_late as f64).min(2.0))
    }
}

// =============================================================================
// Library: catalog plus loans
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    pub member: String,
    pub due_in_days: u32,
}

pub struct Library {
    catalog: Registry<dyn LibraryItem>,
    loans: HashMap<EntryId, Loan>,
    fees_collected: f64,
}

impl Library {
    pub fn new() -> Self {
        Self {
            catalog: Registry::new("library"),
            loans: HashMap::new(),
            fees_collected: 0.0,
        }
    }

    pub fn add(&mut self, item: Box<dyn LibraryItem>) -> EntryId {
        self.catalog.insert(item)
    }

    pub fn catalog(&self) -> &Registry<dyn LibraryItem> {
        &self.catalog
    }

    pub fn is_checked_out(&self, id: EntryId) -> bool {
        self.loans.contains_key(&id)
    }

    pub fn loan(&self, id: EntryId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    /// Lends an item. Returns `false` when it is already out.
    pub fn checkout(&mut self, id: EntryId, member: &str) -> Result<bool> {
        validate::non_empty("member", member)?;
        let item = self.catalog.get(id)?;
        if self.loans.contains_key(&id) {
            warn!(item = %id, member, "item already checked out");
            return Ok(false);
        }
        let loan = Loan {
            member: member.to_string(),
            due_in_days: item.loan_days(),
        };
        info!(item = %id, title = item.title(), member, due = loan.due_in_days, "checked out");
        self.loans.insert(id, loan);
        Ok(true)
    }

    /// Closes a loan and returns the late fee owed.
    pub fn return_item(&mut self, id: EntryId, days_late: u32) -> Result<f64> {
        let item = self.catalog.get(id)?;
        let loan = self
            .loans
            .remove(&id)
            .ok_or_else(|| ShopError::not_found(format!("loan for {id}")))?;
        let fee = item.late_fee(days_late);
        self.fees_collected = round_cents(self.fees_collected + fee);
        info!(item = %id, member = %loan.member, fee, "returned");
        Ok(fee)
    }

    /// Removes an item from the catalog; items on loan cannot be withdrawn.
    pub fn withdraw(&mut self, id: EntryId) -> Result<Box<dyn LibraryItem>> {
        if self.loans.contains_key(&id) {
            return Err(ShopError::validation("item", format!("{id} is on loan")));
        }
        self.catalog.remove(id)
    }

    pub fn available(&self) -> Vec<(EntryId, &dyn LibraryItem)> {
        self.catalog
            .iter()
            .filter(|(id, _)| !self.loans.contains_key(id))
            .collect()
    }

    pub fn fees_collected(&self) -> f64 {
        self.fees_collected
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
