use futures::Stream;

use crate::domain::{BalanceResult, Command, Error, Expense, ExpenseId, MemberId};

pub trait CommandStream {
    type CmdStream: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::CmdStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// The group/expense store of record.
pub trait ExpenseStore {
    fn members(&self) -> Vec<MemberId>;
    fn expenses(&self) -> Vec<Expense>;

    fn add_member(&mut self, member: MemberId) -> Result<(), Error>;

    fn add_expense(&mut self, expense: Expense) -> Result<(), Error>;

    fn settle_split(&mut self, expense: ExpenseId, member: MemberId) -> Result<(), Error>;

    fn unsettle_split(&mut self, expense: ExpenseId, member: MemberId) -> Result<(), Error>;

    fn replace_splits(
        &mut self,
        expense: ExpenseId,
        participants: &[MemberId],
    ) -> Result<(), Error>;

    fn delete_expense(&mut self, expense: ExpenseId) -> Result<Expense, Error>;
}

pub trait BalanceReport {
    fn render(&mut self, balances: &BalanceResult) -> Result<(), Error>;
}
