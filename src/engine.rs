use crate::domain::{
    BalanceResult, Command, Error, Expense, MemberId, Money,
    traits::{BalanceReport, CommandStream, DeadLetterQueue, ExpenseStore},
};

use futures::StreamExt;
use tracing::{debug, info};

/// Reduces a group's expenses to net balances and pairwise debts.
///
/// Every member in `members` gets a net entry, zero if untouched. Expenses
/// without splits are skipped and settled splits contribute nothing, as do
/// zero shares. Each
/// unsettled split of someone other than the payer moves one share from
/// that participant to the payer. The payer's own split nets to zero: the
/// payer is only credited for what others owe.
///
/// This is total: ids outside `members` and negative amounts flow through
/// the arithmetic unchanged.
pub fn compute_balances(members: &[MemberId], expenses: &[Expense]) -> BalanceResult {
    let mut result = BalanceResult::default();
    for member in members {
        result.net_balance.insert(*member, Money::ZERO);
    }

    for expense in expenses {
        apply_expense(&mut result, expense);
    }

    result
}

fn apply_expense(result: &mut BalanceResult, expense: &Expense) {
    let Some(share) = expense.amount.share(expense.splits.len()) else {
        return;
    };
    if share.is_zero() {
        return;
    }
    let payer = expense.payer_id;

    let mut unsettled_non_payer = 0;
    for split in expense
        .splits
        .iter()
        .filter(|s| !s.is_settled() && s.member_id != payer)
    {
        *result
            .owes
            .entry(split.member_id)
            .or_default()
            .entry(payer)
            .or_default() += share;
        *result
            .owed
            .entry(payer)
            .or_default()
            .entry(split.member_id)
            .or_default() += share;
        *result.net_balance.entry(split.member_id).or_default() -= share;
        unsettled_non_payer += 1;
    }

    if unsettled_non_payer > 0 {
        *result.net_balance.entry(payer).or_default() += share * unsettled_non_payer;
    }
}

#[derive(Debug)]
pub struct Engine<I, S, D>
where
    I: CommandStream,
    S: ExpenseStore,
    D: DeadLetterQueue,
{
    ingestion: I,
    store: S,
    dlq: D,
}

impl<I, S, D> Engine<I, S, D>
where
    I: CommandStream,
    S: ExpenseStore,
    D: DeadLetterQueue,
{
    pub fn new(ingestion: I, store: S, dlq: D) -> Self {
        Self {
            ingestion,
            store,
            dlq,
        }
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut res = self.ingestion.stream();
        let (mut applied, mut rejected) = (0usize, 0usize);

        while let Some(cmd) = res.next().await {
            match cmd.and_then(|cmd| self.apply_command(cmd)) {
                Ok(()) => applied += 1,
                Err(e) => {
                    rejected += 1;
                    self.dlq.report(&e);
                }
            }
        }

        info!(applied, rejected, "journal processed");
        Ok(())
    }

    fn apply_command(&mut self, cmd: Command) -> Result<(), Error> {
        debug!(%cmd, "applying");
        match cmd {
            Command::Join { member } => self.store.add_member(member),
            Command::AddExpense {
                expense,
                payer,
                amount,
                participants,
            } => self
                .store
                .add_expense(Expense::new(expense, amount, payer, &participants)),
            Command::Settle { expense, member } => self.store.settle_split(expense, member),
            Command::Unsettle { expense, member } => self.store.unsettle_split(expense, member),
            Command::Resplit {
                expense,
                participants,
            } => self.store.replace_splits(expense, &participants),
            Command::Delete { expense } => self.store.delete_expense(expense).map(|_| ()),
        }
    }

    /// Recomputes balances from the store's current snapshot.
    pub fn balances(&self) -> BalanceResult {
        compute_balances(&self.store.members(), &self.store.expenses())
    }

    pub fn flush<R: BalanceReport>(&self, report: &mut R) -> Result<(), Error> {
        report.render(&self.balances())
    }
}
