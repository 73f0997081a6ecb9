//! Transaction rule source port trait.

use crate::domain::error::FincastError;
use crate::domain::transaction::TransactionRule;

/// Supplies an immutable snapshot of the rules for one projection run.
pub trait TransactionPort {
    fn load_transactions(&self) -> Result<Vec<TransactionRule>, FincastError>;
}
