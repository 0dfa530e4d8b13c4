use std::collections::BTreeMap;

use crate::domain::{MemberId, Money};

pub type Ledger = BTreeMap<MemberId, BTreeMap<MemberId, Money>>;

/// Output of a balance computation.
///
/// `owes[a][b]` is what `a` owes `b`; `owed[b][a]` mirrors it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceResult {
    pub net_balance: BTreeMap<MemberId, Money>, // positive: creditor, negative: debtor
    pub owes: Ledger,
    pub owed: Ledger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Owed,
    Owes,
    /// Zero net with open cross entries that cancel out.
    Even,
    SettledUp,
}

impl Standing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standing::Owed => "owed",
            Standing::Owes => "owes",
            Standing::Even => "even",
            Standing::SettledUp => "settled up",
        }
    }
}

impl BalanceResult {
    pub fn net(&self, member: MemberId) -> Money {
        self.net_balance.get(&member).copied().unwrap_or(Money::ZERO)
    }

    #[cfg(test)]
    pub fn owes_to(&self, debtor: MemberId, creditor: MemberId) -> Money {
        self.owes
            .get(&debtor)
            .and_then(|row| row.get(&creditor))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Standing of `member`, judged on the net as displayed.
    pub fn standing(&self, member: MemberId) -> Standing {
        let net = self.net(member).rounded();
        if net.is_negative() {
            return Standing::Owes;
        }
        if !net.is_zero() {
            return Standing::Owed;
        }
        let open = |ledger: &Ledger| ledger.get(&member).is_some_and(|row| !row.is_empty());
        if open(&self.owes) || open(&self.owed) {
            Standing::Even
        } else {
            Standing::SettledUp
        }
    }

    /// Every `(debtor, creditor, amount)` entry, ordered by debtor then creditor.
    pub fn debts(&self) -> impl Iterator<Item = (MemberId, MemberId, Money)> + '_ {
        self.owes.iter().flat_map(|(debtor, row)| {
            row.iter()
                .map(move |(creditor, amount)| (*debtor, *creditor, *amount))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(u32, u32, i64)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (from, to, amount) in entries {
            ledger
                .entry(MemberId(*from))
                .or_default()
                .insert(MemberId(*to), Money::from(*amount));
        }
        ledger
    }

    #[test]
    fn standing_follows_net_sign_and_open_entries() {
        let mut result = BalanceResult::default();
        result.net_balance.insert(MemberId(1), Money::from(10));
        result.net_balance.insert(MemberId(2), Money::from(-10));
        result.net_balance.insert(MemberId(3), Money::ZERO);
        result.net_balance.insert(MemberId(4), Money::ZERO);
        result.owes = ledger(&[(2, 1, 10), (4, 1, 5), (1, 4, 5)]);
        result.owed = ledger(&[(1, 2, 10), (1, 4, 5), (4, 1, 5)]);

        assert_eq!(result.standing(MemberId(1)), Standing::Owed);
        assert_eq!(result.standing(MemberId(2)), Standing::Owes);
        assert_eq!(result.standing(MemberId(3)), Standing::SettledUp);
        assert_eq!(result.standing(MemberId(4)), Standing::Even);
    }

    #[test]
    fn standing_ignores_residue_below_display_precision() {
        let third = Money::from(1).share(3).unwrap();
        let mut result = BalanceResult::default();
        result.net_balance.insert(MemberId(1), third * 3 - Money::from(1));

        assert_eq!(result.standing(MemberId(1)), Standing::SettledUp);
    }

    #[test]
    fn debts_are_flattened_in_order() {
        let result = BalanceResult {
            owes: ledger(&[(3, 1, 7), (2, 1, 4), (2, 0, 1)]),
            ..Default::default()
        };
        let debts: Vec<_> = result.debts().collect();
        assert_eq!(
            debts,
            vec![
                (MemberId(2), MemberId(0), Money::from(1)),
                (MemberId(2), MemberId(1), Money::from(4)),
                (MemberId(3), MemberId(1), Money::from(7)),
            ]
        );
        assert_eq!(result.owes_to(MemberId(3), MemberId(1)), Money::from(7));
        assert_eq!(result.owes_to(MemberId(1), MemberId(3)), Money::ZERO);
    }
}
