use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{Command, Error, ExpenseId, MemberId, Money};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    expense: Option<ExpenseId>,
    #[serde(default)]
    member: Option<MemberId>,
    #[serde(default)]
    amount: Option<Money>,
    #[serde(default)]
    participants: Option<String>,
}

fn parse_participants(raw: Option<String>) -> Result<Vec<MemberId>, Error> {
    let raw = raw.unwrap_or_default();
    raw.split_whitespace()
        .map(|id| {
            id.parse::<u32>()
                .map(MemberId)
                .map_err(|_| Error::Ingestion(format!("Invalid participant id: {}", id)))
        })
        .collect()
}

fn required<T>(value: Option<T>, column: &str, kind: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::Ingestion(format!("Missing {} for {} row", column, kind)))
}

impl TryFrom<CsvRow> for Command {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let kind = row.kind.trim().to_ascii_lowercase();
        let cmd = match kind.as_str() {
            "join" => Command::Join {
                member: required(row.member, "member", &kind)?,
            },
            "expense" => Command::AddExpense {
                expense: required(row.expense, "expense", &kind)?,
                payer: required(row.member, "member", &kind)?,
                amount: required(row.amount, "amount", &kind)?,
                participants: parse_participants(row.participants)?,
            },
            "settle" => Command::Settle {
                expense: required(row.expense, "expense", &kind)?,
                member: required(row.member, "member", &kind)?,
            },
            "unsettle" => Command::Unsettle {
                expense: required(row.expense, "expense", &kind)?,
                member: required(row.member, "member", &kind)?,
            },
            "resplit" => Command::Resplit {
                expense: required(row.expense, "expense", &kind)?,
                participants: parse_participants(row.participants)?,
            },
            "delete" => Command::Delete {
                expense: required(row.expense, "expense", &kind)?,
            },
            other => {
                return Err(Error::Ingestion(format!(
                    "Invalid command type: {}",
                    other
                )));
            }
        };

        Ok(cmd)
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvReader<R> {
    type CmdStream = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::CmdStream {
        // The stream owns the reader, so a second call yields nothing.
        let reader = match self.reader.take() {
            Some(r) => r,
            None => return Box::pin(stream::iter(Vec::<Result<Command, Error>>::new())),
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
