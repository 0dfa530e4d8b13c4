use std::io::Write;

use crate::domain::{BalanceReport, BalanceResult, Error};

/// Renders balances as two CSV tables separated by a blank line:
/// per-member standing, then debts.
pub struct CsvReport<W: Write> {
    out: W,
}

impl<W: Write> CsvReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_tables(&mut self, balances: &BalanceResult) -> Result<(), csv::Error> {
        let mut table = csv::Writer::from_writer(&mut self.out);
        table.write_record(["member", "net", "status"])?;
        for (member, net) in &balances.net_balance {
            table.write_record([
                member.to_string(),
                net.to_string(),
                balances.standing(*member).as_str().to_string(),
            ])?;
        }
        table.flush()?;
        drop(table);

        self.out.write_all(b"\n")?;

        let mut table = csv::Writer::from_writer(&mut self.out);
        table.write_record(["debtor", "creditor", "amount"])?;
        for (debtor, creditor, amount) in balances.debts() {
            table.write_record([
                debtor.to_string(),
                creditor.to_string(),
                amount.to_string(),
            ])?;
        }
        table.flush()?;
        Ok(())
    }
}

impl<W: Write> BalanceReport for CsvReport<W> {
    fn render(&mut self, balances: &BalanceResult) -> Result<(), Error> {
        self.write_tables(balances)
            .map_err(|e| Error::Report(e.to_string()))
    }
}
