use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerCountError {
    #[error("worker count must not be empty")]
    Empty,
    #[error("invalid worker count {input:?}: expected a base-10 integer")]
    Invalid { input: String },
}

/// Number of collaborator instances requested on the command line.
///
/// The value is kept exactly as given. Zero and negative counts are accepted
/// and simply spawn nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCount(i64);

impl WorkerCount {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn spawn_count(self) -> usize {
        usize::try_from(self.0).unwrap_or(0)
    }
}

impl FromStr for WorkerCount {
    type Err = WorkerCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(WorkerCountError::Empty);
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| WorkerCountError::Invalid {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
