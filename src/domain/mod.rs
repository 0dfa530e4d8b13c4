pub mod balance;
pub mod command;
pub mod error;
pub mod expense;
pub mod money;
pub mod traits;

pub use balance::BalanceResult;
#[cfg(test)]
pub use balance::Standing;
pub use command::Command;
pub use error::Error;
pub use expense::{Expense, ExpenseId, MemberId, Split};
pub use money::Money;
pub use traits::{BalanceReport, CommandStream, DeadLetterQueue, ExpenseStore};
