use crate::domain::{ExpenseId, MemberId, Money};

/// A single mutation of the group ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Join {
        member: MemberId,
    },
    AddExpense {
        expense: ExpenseId,
        payer: MemberId,
        amount: Money,
        participants: Vec<MemberId>,
    },
    Settle {
        expense: ExpenseId,
        member: MemberId,
    },
    Unsettle {
        expense: ExpenseId,
        member: MemberId,
    },
    Resplit {
        expense: ExpenseId,
        participants: Vec<MemberId>,
    },
    Delete {
        expense: ExpenseId,
    },
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::Join { member } => write!(f, "join,member={}", member),
            Command::AddExpense {
                expense,
                payer,
                amount,
                participants,
            } => write!(
                f,
                "add,expense={},payer={},amount={},participants={}",
                expense,
                payer,
                amount,
                participants.len()
            ),
            Command::Settle { expense, member } => {
                write!(f, "settle,expense={},member={}", expense, member)
            }
            Command::Unsettle { expense, member } => {
                write!(f, "unsettle,expense={},member={}", expense, member)
            }
            Command::Resplit {
                expense,
                participants,
            } => write!(
                f,
                "resplit,expense={},participants={}",
                expense,
                participants.len()
            ),
            Command::Delete { expense } => write!(f, "delete,expense={}", expense),
        }
    }
}
