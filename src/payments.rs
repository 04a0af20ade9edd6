use crate::contract::{round_cents, Payment, Receipt, Variant};
use crate::error::{Result, ShopError};
use crate::validate;
use serde::{Serialize, Serializer};
use tracing::info;

/// Luhn checksum over an all-digit string. An all-zero number passes the
/// arithmetic but is never a real card.
fn luhn_valid(number: &str) -> bool {
    if number.chars().all(|c| c == '0') {
        return false;
    }
    let sum: u32 = number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn mask(number: &str) -> String {
    let visible = number.len().saturating_sub(4);
    format!("{}{}", "*".repeat(visible), &number[visible..])
}

fn serialize_masked<S: Serializer>(number: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&mask(number))
}

/// Shared amount checks for every payment method.
fn check_amount(method: &str, amount: f64, limit: f64) -> Result<()> {
    validate::amount("amount", amount)?;
    if amount > limit {
        return Err(ShopError::declined(
            method,
            format!("amount {amount:.2} exceeds limit {limit:.2}"),
        ));
    }
    Ok(())
}

// =============================================================================
// Credit card: percentage fee plus a fixed charge
// =============================================================================

const CARD_RATE: f64 = 0.029;
const CARD_FIXED: f64 = 0.30;

#[derive(Debug, Clone, Serialize)]
pub struct CreditCardPayment {
    holder: String,
    #[serde(serialize_with = "serialize_masked")]
    card_number: String,
    limit: f64,
    processed: f64,
}

impl CreditCardPayment {
    pub fn new(holder: impl Into<String>, card_number: &str, limit: f64) -> Result<Self> {
        let holder = holder.into();
        let card_number: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
        validate::non_empty("holder", &holder)?;
        validate::digits("card_number", &card_number, 13, 19)?;
        if !luhn_valid(&card_number) {
            return Err(ShopError::validation("card_number", "failed checksum"));
        }
        validate::amount("limit", limit)?;
        Ok(Self {
            holder,
            card_number,
            limit,
            processed: 0.0,
        })
    }

    pub fn masked_number(&self) -> String {
        mask(&self.card_number)
    }

    pub fn processed_total(&self) -> f64 {
        self.processed
    }
}

impl Variant for CreditCardPayment {
    fn kind(&self) -> &'static str {
        "CreditCardPayment"
    }

    fn label(&self) -> String {
        format!("Card {} ({})", self.masked_number(), self.holder)
    }
}

impl Payment for CreditCardPayment {
    fn method(&self) -> &'static str {
        "credit_card"
    }

    fn fee(&self, amount: f64) -> f64 {
        round_cents(amount * CARD_RATE + CARD_FIXED)
    }

    fn process(&mut self, amount: f64) -> Result<Receipt> {
        check_amount(self.method(), amount, self.limit)?;
        let receipt = Receipt::new(self.method(), amount, self.fee(amount));
        self.processed = round_cents(self.processed + receipt.total);
        info!(method = self.method(), card = %self.masked_number(), total = receipt.total, "payment processed");
        Ok(receipt)
    }
}

// =============================================================================
// PayPal: percentage fee, identified by email
// =============================================================================

const PAYPAL_RATE: f64 = 0.034;

#[derive(Debug, Clone, Serialize)]
pub struct PayPalPayment {
    email: String,
    limit: f64,
    processed: f64,
}

impl PayPalPayment {
    pub fn new(email: impl Into<String>, limit: f64) -> Result<Self> {
        let email = email.into();
        validate::email("email", &email)?;
        validate::amount("limit", limit)?;
        Ok(Self {
            email,
            limit,
            processed: 0.0,
        })
    }

    pub fn processed_total(&self) -> f64 {
        self.processed
    }
}

impl Variant for PayPalPayment {
    fn kind(&self) -> &'static str {
        "PayPalPayment"
    }

    fn label(&self) -> String {
        format!("PayPal {}", self.email)
    }
}

impl Payment for PayPalPayment {
    fn method(&self) -> &'static str {
        "paypal"
    }

    fn fee(&self, amount: f64) -> f64 {
        round_cents(amount * PAYPAL_RATE)
    }

    fn process(&mut self, amount: f64) -> Result<Receipt> {
        check_amount(self.method(), amount, self.limit)?;
        let receipt = Receipt::new(self.method(), amount, self.fee(amount));
        self.processed = round_cents(self.processed + receipt.total);
        info!(method = self.method(), email = %self.email, total = receipt.total, "payment processed");
        Ok(receipt)
    }
}

// =============================================================================
// Bank transfer: flat fee, requires sufficient prefunded balance
// =============================================================================

const TRANSFER_FEE: f64 = 1.50;

#[derive(Debug, Clone, Serialize)]
pub struct BankTransferPayment {
    iban: String,
    balance: f64,
    limit: f64,
    processed: f64,
}

impl BankTransferPayment {
    pub fn new(iban: &str, balance: f64, limit: f64) -> Result<Self> {
        let iban: String = iban.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
        if !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ShopError::validation("iban", "must be alphanumeric"));
        }
        validate::in_range("iban", iban.len(), 15, 34)?;
        if !iban[..2].chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ShopError::validation("iban", "must start with a country code"));
        }
        validate::balance("balance", balance)?;
        validate::amount("limit", limit)?;
        Ok(Self {
            iban,
            balance,
            limit,
            processed: 0.0,
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn processed_total(&self) -> f64 {
        self.processed
    }
}

impl Variant for BankTransferPayment {
    fn kind(&self) -> &'static str {
        "BankTransferPayment"
    }

    fn label(&self) -> String {
        format!("Transfer from {}", mask(&self.iban))
    }
}

impl Payment for BankTransferPayment {
    fn method(&self) -> &'static str {
        "bank_transfer"
    }

    fn fee(&self, _amount: f64) -> f64 {
        TRANSFER_FEE
    }

    fn process(&mut self, amount: f64) -> Result<Receipt> {
        check_amount(self.method(), amount, self.limit)?;
        let receipt = Receipt::new(self.method(), amount, self.fee(amount));
        if receipt.total > self.balance {
            return Err(ShopError::InsufficientFunds {
                requested: receipt.total,
                available: self.balance,
            });
        }
        self.balance = round_cents(self.balance - receipt.total);
        self.processed = round_cents(self.processed + receipt.total);
        info!(method = self.method(), total = receipt.total, remaining = self.balance, "payment processed");
        Ok(receipt)
    }
}
