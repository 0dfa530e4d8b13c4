use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "splitease")]
#[command(about = "Replays a group expense journal and prints who owes whom")]
pub struct Config {
    /// CSV journal of group commands.
    pub input: PathBuf,

    /// Log filter for stderr output (also read from `SPLITEASE_LOG`).
    #[arg(long, env = "SPLITEASE_LOG", default_value = "warn")]
    pub log_level: String,
}
