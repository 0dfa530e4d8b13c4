use tracing::warn;

use crate::domain::{DeadLetterQueue, Error};

/// Dead-letter sink that logs every rejected command.
#[derive(Default, Debug)]
pub struct TracingDlq {}

impl DeadLetterQueue for TracingDlq {
    fn report(&self, error: &Error) {
        warn!(%error, "command rejected");
    }
}
