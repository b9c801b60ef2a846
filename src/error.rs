use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::CustomerId;

#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error("invalid configuration: {field} must be greater than zero (got {value})")]
    Configuration { field: &'static str, value: i64 },

    #[error("could not read schedule {}: {source}", path.display())]
    ScheduleIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed schedule at line {line}: {reason}")]
    ScheduleFormat { line: usize, reason: String },

    #[error("{queue} queue was signalled ready but it is empty")]
    QueueUnderflow { queue: &'static str },

    #[error("no signals registered for customer {0}")]
    UnknownCustomer(CustomerId),

    #[error("could not spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("thread {0} panicked")]
    ActorPanicked(String),
}

/// La agenda declara una cantidad de clientes distinta a la que trae.
/// No es fatal: se atiende a los que efectivamente están listados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleMismatch {
    pub declared: usize,
    pub actual: usize,
}

impl fmt::Display for ScheduleMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schedule declares {} customers but lists {}; using {}",
            self.declared, self.actual, self.actual
        )
    }
}
