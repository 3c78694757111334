use std::{io, path::PathBuf};

use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start collaborator {index} ({})", .program.display())]
    Spawn {
        index: usize,
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for collaborator {index}")]
    Wait {
        index: usize,
        #[source]
        source: io::Error,
    },
    #[error("waiter task for a collaborator did not finish")]
    WaitTask(#[from] JoinError),
}

impl LaunchError {
    /// Index of the collaborator the error refers to, when known.
    pub fn index(&self) -> Option<usize> {
        match self {
            LaunchError::Spawn { index, .. } | LaunchError::Wait { index, .. } => Some(*index),
            LaunchError::WaitTask(_) => None,
        }
    }
}
