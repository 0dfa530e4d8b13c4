use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u32);

impl core::fmt::Display for MemberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One participant's share of an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub expense_id: ExpenseId,
    pub member_id: MemberId,
    pub settled_at: Option<DateTime<Utc>>, // present iff the split is settled
}

impl Split {
    pub fn unsettled(expense_id: ExpenseId, member_id: MemberId) -> Self {
        Self {
            expense_id,
            member_id,
            settled_at: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    pub fn settle(&mut self, at: DateTime<Utc>) {
        self.settled_at = Some(at);
    }

    pub fn reopen(&mut self) {
        self.settled_at = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub payer_id: MemberId,
    pub splits: Vec<Split>,
}

impl Expense {
    /// Creates an expense with one unsettled split per participant.
    pub fn new(id: ExpenseId, amount: Money, payer_id: MemberId, participants: &[MemberId]) -> Self {
        Self {
            id,
            amount,
            payer_id,
            splits: Self::fresh_splits(id, participants),
        }
    }

    pub fn fresh_splits(id: ExpenseId, participants: &[MemberId]) -> Vec<Split> {
        participants
            .iter()
            .map(|member_id| Split::unsettled(id, *member_id))
            .collect()
    }

    #[cfg(test)]
    pub fn split_of(&self, member_id: MemberId) -> Option<&Split> {
        self.splits.iter().find(|s| s.member_id == member_id)
    }

    pub fn split_of_mut(&mut self, member_id: MemberId) -> Option<&mut Split> {
        self.splits.iter_mut().find(|s| s.member_id == member_id)
    }
}

impl core::fmt::Display for Expense {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "expense={},payer={},amount={},splits={}",
            self.id,
            self.payer_id,
            self.amount,
            self.splits.len()
        )
    }
}
