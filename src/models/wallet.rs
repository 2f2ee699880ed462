//! Wallet entity: the balance container owned by one account holder.

use rust_decimal::Decimal;

use crate::error::AppError;

/// Decimal places stored by the `NUMERIC(15, 2)` money columns.
pub const MONEY_SCALE: u32 = 2;

/// Balance container owned by exactly one account holder.
///
/// Mapped from the `balance` column of `account_holders`. The balance never
/// goes negative: `subtract_balance` refuses to overdraw.
#[derive(Debug, Clone, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct Wallet {
    balance: Decimal,
}

impl Wallet {
    pub fn new(balance: Decimal) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn add_balance(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Remove `amount` from the wallet.
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` if the wallet holds less than `amount`; the
    /// balance is left untouched in that case.
    pub fn subtract_balance(&mut self, amount: Decimal) -> Result<(), AppError> {
        if self.balance < amount {
            return Err(AppError::InsufficientBalance);
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn add_then_subtract() {
        let mut wallet = Wallet::new(dec!(10.00));
        wallet.add_balance(dec!(5.50));
        assert_eq!(wallet.balance(), dec!(15.50));

        wallet.subtract_balance(dec!(15.50)).unwrap();
        assert_eq!(wallet.balance(), Decimal::ZERO);
    }

    #[test]
    fn subtract_refuses_overdraft() {
        let mut wallet = Wallet::new(dec!(20));
        let err = wallet.subtract_balance(dec!(20.01)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance));
        assert_eq!(wallet.balance(), dec!(20));
        assert!(!wallet.can_cover(dec!(20.01)));
        assert!(wallet.can_cover(dec!(20)));
    }
}
