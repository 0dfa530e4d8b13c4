use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::debug;

use crate::domain::{Error, Expense, ExpenseId, ExpenseStore, MemberId, Split};

/// Group/expense store of record, held in memory.
///
/// Every mutation is validated up front; a rejected command leaves the
/// store untouched.
#[derive(Default, Debug)]
pub struct InMemoryStore {
    members: BTreeSet<MemberId>,
    expenses: BTreeMap<ExpenseId, Expense>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            members: BTreeSet::new(),
            expenses: BTreeMap::new(),
        }
    }

    fn check_participants(&self, participants: &[MemberId]) -> Result<(), Error> {
        if participants.is_empty() {
            return Err(Error::Store(
                "At least one participant is required".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for member in participants {
            if !self.members.contains(member) {
                return Err(Error::Store(format!(
                    "Participant {} is not a group member",
                    member
                )));
            }
            if !seen.insert(*member) {
                return Err(Error::Store(format!("Participant {} listed twice", member)));
            }
        }
        Ok(())
    }

    fn expense_mut(&mut self, expense: ExpenseId) -> Result<&mut Expense, Error> {
        self.expenses
            .get_mut(&expense)
            .ok_or_else(|| Error::Store(format!("Expense {} not found", expense)))
    }
}

fn split_mut(expense: &mut Expense, member: MemberId) -> Result<&mut Split, Error> {
    let expense_id = expense.id;
    expense.split_of_mut(member).ok_or_else(|| {
        Error::Store(format!(
            "Member {} is not involved in expense {}",
            member, expense_id
        ))
    })
}

impl ExpenseStore for InMemoryStore {
    fn members(&self) -> Vec<MemberId> {
        self.members.iter().copied().collect()
    }

    fn expenses(&self) -> Vec<Expense> {
        self.expenses.values().cloned().collect()
    }

    fn add_member(&mut self, member: MemberId) -> Result<(), Error> {
        if !self.members.insert(member) {
            return Err(Error::Store(format!("Member {} already joined", member)));
        }
        Ok(())
    }

    fn add_expense(&mut self, expense: Expense) -> Result<(), Error> {
        if expense.amount.is_negative() {
            return Err(Error::Store(format!(
                "Expense {} has a negative amount {}",
                expense.id, expense.amount
            )));
        }
        if !self.members.contains(&expense.payer_id) {
            return Err(Error::Store(format!(
                "Payer {} is not a group member",
                expense.payer_id
            )));
        }
        let participants: Vec<MemberId> = expense.splits.iter().map(|s| s.member_id).collect();
        self.check_participants(&participants)?;

        match self.expenses.entry(expense.id) {
            Entry::Vacant(e) => {
                debug!(%expense, "expense recorded");
                e.insert(expense);
                Ok(())
            }
            Entry::Occupied(_) => Err(Error::Store(format!(
                "Expense ID {} already exists",
                expense.id
            ))),
        }
    }

    fn settle_split(&mut self, expense: ExpenseId, member: MemberId) -> Result<(), Error> {
        let expense = self.expense_mut(expense)?;
        if expense.payer_id == member {
            return Err(Error::Store(format!(
                "Member {} is the payer of expense {} and cannot settle it",
                member, expense.id
            )));
        }

        let split = split_mut(expense, member)?;
        if split.is_settled() {
            return Err(Error::Store(format!(
                "Split of member {} on expense {} is already settled",
                member, split.expense_id
            )));
        }
        split.settle(Utc::now());
        Ok(())
    }

    fn unsettle_split(&mut self, expense: ExpenseId, member: MemberId) -> Result<(), Error> {
        let split = split_mut(self.expense_mut(expense)?, member)?;
        if !split.is_settled() {
            return Err(Error::Store(format!(
                "Split of member {} on expense {} is not settled",
                member, split.expense_id
            )));
        }
        split.reopen();
        Ok(())
    }

    fn replace_splits(
        &mut self,
        expense: ExpenseId,
        participants: &[MemberId],
    ) -> Result<(), Error> {
        self.check_participants(participants)?;
        let expense = self.expense_mut(expense)?;
        expense.splits = Expense::fresh_splits(expense.id, participants);
        Ok(())
    }

    fn delete_expense(&mut self, expense: ExpenseId) -> Result<Expense, Error> {
        self.expenses
            .remove(&expense)
            .ok_or_else(|| Error::Store(format!("Expense {} not found", expense)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Money;

    const A: MemberId = MemberId(1);
    const B: MemberId = MemberId(2);
    const C: MemberId = MemberId(3);

    fn store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for m in [A, B, C] {
            store.add_member(m).unwrap();
        }
        store
            .add_expense(Expense::new(ExpenseId(1), Money::from(60), A, &[A, B, C]))
            .unwrap();
        store
    }

    fn is_store_err<T: core::fmt::Debug>(res: Result<T, Error>, needle: &str) -> bool {
        matches!(res, Err(Error::Store(msg)) if msg.contains(needle))
    }

    #[test]
    fn rejects_duplicate_member() {
        let mut store = store();
        assert!(is_store_err(store.add_member(A), "already joined"));
        assert_eq!(store.members(), vec![A, B, C]);
    }

    #[test]
    fn rejects_invalid_expenses_without_mutating() {
        let mut store = store();
        let cases = [
            (
                Expense::new(ExpenseId(1), Money::from(10), A, &[A]),
                "already exists",
            ),
            (
                Expense::new(ExpenseId(2), Money::from(-10), A, &[A, B]),
                "negative",
            ),
            (
                Expense::new(ExpenseId(3), Money::from(10), MemberId(9), &[A]),
                "Payer 9",
            ),
            (
                Expense::new(ExpenseId(4), Money::from(10), A, &[A, MemberId(9)]),
                "Participant 9",
            ),
            (
                Expense::new(ExpenseId(5), Money::from(10), A, &[B, B]),
                "twice",
            ),
            (Expense::new(ExpenseId(6), Money::from(10), A, &[]), "At least one"),
        ];

        for (expense, needle) in cases {
            assert!(is_store_err(store.add_expense(expense), needle), "{}", needle);
        }
        assert_eq!(store.expenses().len(), 1);
        assert_eq!(store.expenses()[0].amount, Money::from(60));
    }

    #[test]
    fn zero_amount_is_accepted() {
        let mut store = store();
        store
            .add_expense(Expense::new(ExpenseId(2), Money::ZERO, B, &[A, B]))
            .unwrap();
        assert_eq!(store.expenses().len(), 2);
    }

    #[test]
    fn settle_stamps_and_guards() {
        let mut store = store();

        store.settle_split(ExpenseId(1), B).unwrap();
        let expense = &store.expenses()[0];
        let split = expense.split_of(B).unwrap();
        assert!(split.is_settled());
        assert!(split.settled_at.is_some());

        assert!(is_store_err(store.settle_split(ExpenseId(1), B), "already settled"));
        assert!(is_store_err(store.settle_split(ExpenseId(1), A), "payer"));
        assert!(is_store_err(store.settle_split(ExpenseId(2), B), "not found"));

        store.add_member(MemberId(4)).unwrap();
        assert!(is_store_err(
            store.settle_split(ExpenseId(1), MemberId(4)),
            "not involved"
        ));
    }

    #[test]
    fn unsettle_reopens_settled_split() {
        let mut store = store();
        assert!(is_store_err(store.unsettle_split(ExpenseId(1), C), "not settled"));

        store.settle_split(ExpenseId(1), C).unwrap();
        store.unsettle_split(ExpenseId(1), C).unwrap();

        let expense = &store.expenses()[0];
        assert_eq!(expense.split_of(C).unwrap().settled_at, None);
    }

    #[test]
    fn resplit_replaces_with_fresh_splits() {
        let mut store = store();
        store.settle_split(ExpenseId(1), B).unwrap();

        store.replace_splits(ExpenseId(1), &[B, C]).unwrap();
        let expense = &store.expenses()[0];
        assert_eq!(expense.splits.len(), 2);
        assert!(expense.splits.iter().all(|s| !s.is_settled()));
        assert!(expense.split_of(A).is_none());

        assert!(is_store_err(store.replace_splits(ExpenseId(1), &[]), "At least one"));
        assert!(is_store_err(store.replace_splits(ExpenseId(9), &[A]), "not found"));
        assert_eq!(store.expenses()[0].splits.len(), 2);
    }

    #[test]
    fn delete_removes_expense_and_splits() {
        let mut store = store();
        let removed = store.delete_expense(ExpenseId(1)).unwrap();
        assert_eq!(removed.splits.len(), 3);
        assert!(store.expenses().is_empty());
        assert!(is_store_err(store.delete_expense(ExpenseId(1)), "not found"));
    }
}
