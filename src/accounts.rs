use crate::contract::{round_cents, Account, Variant};
use crate::error::{Result, ShopError};
use crate::validate;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Interest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub balance_after: f64,
}

fn record(history: &mut Vec<Transaction>, kind: TransactionKind, amount: f64, balance_after: f64) {
    history.push(Transaction {
        kind,
        amount,
        balance_after,
    });
}

// =============================================================================
// Savings: earns interest, limited number of withdrawals per period
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SavingsAccount {
    holder: String,
    balance: f64,
    interest_rate: f64,
    withdrawals_per_period: u32,
    withdrawals_used: u32,
    history: Vec<Transaction>,
}

impl SavingsAccount {
    pub fn new(
        holder: impl Into<String>,
        opening_balance: f64,
        interest_rate: f64,
        withdrawals_per_period: u32,
    ) -> Result<Self> {
        let holder = holder.into();
        validate::non_empty("holder", &holder)?;
        validate::balance("opening_balance", opening_balance)?;
        validate::in_range("interest_rate", interest_rate, 0.0, 0.25)?;
        Ok(Self {
            holder,
            balance: round_cents(opening_balance),
            interest_rate,
            withdrawals_per_period,
            withdrawals_used: 0,
            history: Vec::new(),
        })
    }

    /// Credits one period of interest and resets the withdrawal allowance.
    pub fn add_interest(&mut self) -> f64 {
        let interest = round_cents(self.balance * self.interest_rate);
        self.balance = round_cents(self.balance + interest);
        self.withdrawals_used = 0;
        record(&mut self.history, TransactionKind::Interest, interest, self.balance);
        interest
    }

    pub fn withdrawals_left(&self) -> u32 {
        self.withdrawals_per_period.saturating_sub(self.withdrawals_used)
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }
}

impl Variant for SavingsAccount {
    fn kind(&self) -> &'static str {
        "SavingsAccount"
    }

    fn label(&self) -> String {
        format!("Savings ({})", self.holder)
    }
}

impl Account for SavingsAccount {
    fn holder(&self) -> &str {
        &self.holder
    }

    fn balance(&self) -> f64 {
        self.balance
    }

    fn deposit(&mut self, amount: f64) -> Result<f64> {
        validate::amount("amount", amount)?;
        self.balance = round_cents(self.balance + amount);
        record(&mut self.history, TransactionKind::Deposit, amount, self.balance);
        debug!(holder = %self.holder, amount, balance = self.balance, "savings deposit");
        Ok(self.balance)
    }

    fn withdraw(&mut self, amount: f64) -> Result<f64> {
        validate::amount("amount", amount)?;
        if self.withdrawals_left() == 0 {
            return Err(ShopError::validation(
                "withdrawal",
                format!("limit of {} per period reached", self.withdrawals_per_period),
            ));
        }
        if amount > self.balance {
            return Err(ShopError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance = round_cents(self.balance - amount);
        self.withdrawals_used += 1;
        record(&mut self.history, TransactionKind::Withdrawal, amount, self.balance);
        debug!(holder = %self.holder, amount, balance = self.balance, "savings withdrawal");
        Ok(self.balance)
    }
}

// =============================================================================
// Checking: may go negative down to the overdraft limit
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CheckingAccount {
    holder: String,
    balance: f64,
    overdraft_limit: f64,
    history: Vec<Transaction>,
}

impl CheckingAccount {
    pub fn new(holder: impl Into<String>, opening_balance: f64, overdraft_limit: f64) -> Result<Self> {
        let holder = holder.into();
        validate::non_empty("holder", &holder)?;
        validate::balance("opening_balance", opening_balance)?;
        validate::balance("overdraft_limit", overdraft_limit)?;
        Ok(Self {
            holder,
            balance: round_cents(opening_balance),
            overdraft_limit,
            history: Vec::new(),
        })
    }

    pub fn available(&self) -> f64 {
        round_cents(self.balance + self.overdraft_limit)
    }

    pub fn is_overdrawn(&self) -> bool {
        self.balance < 0.0
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }
}

impl Variant for CheckingAccount {
    fn kind(&self) -> &'static str {
        "CheckingAccount"
    }

    fn label(&self) -> String {
        format!("Checking ({})", self.holder)
    }
}

impl Account for CheckingAccount {
    fn holder(&self) -> &str {
        &self.holder
    }

    fn balance(&self) -> f64 {
        self.balance
    }

    fn deposit(&mut self, amount: f64) -> Result<f64> {
        validate::amount("amount", amount)?;
        self.balance = round_cents(self.balance + amount);
        record(&mut self.history, TransactionKind::Deposit, amount, self.balance);
        debug!(holder = %self.holder, amount, balance = self.balance, "checking deposit");
        Ok(self.balance)
    }

    fn withdraw(&mut self, amount: f64) -> Result<f64> {
        validate::amount("amount", amount)?;
        if amount > self.available() {
            return Err(ShopError::InsufficientFunds {
                requested: amount,
                available: self.available(),
            });
        }
        self.balance = round_cents(self.balance - amount);
        record(&mut self.history, TransactionKind::Withdrawal, amount, self.balance);
        debug!(holder = %self.holder, amount, balance = self.balance, "checking withdrawal");
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_deposit_withdraw() {
        let mut savings = SavingsAccount::new("Ann", 100.0, 0.02, 2).unwrap();
        assert_eq!(savings.deposit(50.0).unwrap(), 150.0);
        assert_eq!(savings.withdraw(30.0).unwrap(), 120.0);
        assert_eq!(savings.history().len(), 2);
        assert_eq!(savings.history()[1].kind, TransactionKind::Withdrawal);
    }

    #[test]
    fn test_savings_withdrawal_limit_and_interest() {
        let mut savings = SavingsAccount::new("Ann", 1000.0, 0.05, 1).unwrap();
        savings.withdraw(100.0).unwrap();
        assert!(savings.withdraw(10.0).unwrap_err().is_validation());
        assert_eq!(savings.balance(), 900.0);

        assert_eq!(savings.add_interest(), 45.0);
        assert_eq!(savings.balance(), 945.0);
        assert_eq!(savings.withdrawals_left(), 1);
    }

    #[test]
    fn test_savings_insufficient_funds() {
        let mut savings = SavingsAccount::new("Ann", 10.0, 0.0, 5).unwrap();
        let err = savings.withdraw(10.01).unwrap_err();
        assert!(matches!(err, ShopError::InsufficientFunds { .. }));
        assert_eq!(savings.balance(), 10.0);
        assert!(savings.history().is_empty());
    }

    #[test]
    fn test_checking_overdraft() {
        let mut checking = CheckingAccount::new("Bob", 50.0, 100.0).unwrap();
        assert_eq!(checking.withdraw(120.0).unwrap(), -70.0);
        assert!(checking.is_overdrawn());
        assert_eq!(checking.available(), 30.0);

        let err = checking.withdraw(30.01).unwrap_err();
        assert_eq!(
            err,
            ShopError::InsufficientFunds {
                requested: 30.01,
                available: 30.0
            }
        );
    }

    #[test]
    fn test_invalid_amounts() {
        let mut checking = CheckingAccount::new("Bob", 0.0, 0.0).unwrap();
        assert!(checking.deposit(-5.0).unwrap_err().is_validation());
        assert!(checking.deposit(0.0).is_err());
        assert!(CheckingAccount::new("Bob", -1.0, 0.0).is_err());
        assert!(SavingsAccount::new("Ann", 0.0, 0.5, 1).is_err());
    }

    #[test]
    fn test_oversized_amounts_rejected() {
        let mut checking = CheckingAccount::new("Ann", 0.0, 0.0).unwrap();
        assert!(checking.deposit(1e307).unwrap_err().is_validation());
        assert_eq!(checking.balance(), 0.0);
        assert!(CheckingAccount::new("Ann", f64::MAX, 0.0).is_err());

        let mut savings = SavingsAccount::new("Ann", 1e12, 0.2, 1).unwrap();
        savings.add_interest();
        assert!(savings.balance().is_finite());
    }

    #[test]
    fn test_balance_query_is_idempotent() {
        let accounts: Vec<Box<dyn Account>> = vec![
            Box::new(SavingsAccount::new("Ann", 10.0, 0.01, 1).unwrap()),
            Box::new(CheckingAccount::new("Bob", 20.0, 0.0).unwrap()),
        ];
        for account in &accounts {
            assert_eq!(account.balance(), account.balance());
        }
    }
}
