use std::process::{ExitCode, ExitStatus};

use tokio::{process::Child, task::JoinSet};
use tracing::{debug, info};

use crate::{collaborator::CollaboratorOptions, errors::LaunchError};

/// Order in which spawned collaborators are reaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WaitOrder {
    /// Reap whichever child finishes first.
    #[default]
    Completion,
    /// Block on each child in the order it was started.
    Spawn,
}

/// What a finished run reports as the launcher's own exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Exit 0 whatever the children returned.
    #[default]
    Ignore,
    /// Exit 1 if any child exited unsuccessfully.
    Propagate,
}

pub struct SpawnedChild {
    index: usize,
    pid: Option<u32>,
    child: Child,
}

impl SpawnedChild {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    async fn wait(mut self) -> Result<ChildOutcome, LaunchError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| LaunchError::Wait {
                index: self.index,
                source,
            })?;

        if status.success() {
            debug!(index = self.index, pid = ?self.pid, %status, "collaborator exited");
        } else {
            info!(index = self.index, pid = ?self.pid, %status, "collaborator exited unsuccessfully");
        }

        Ok(ChildOutcome {
            index: self.index,
            pid: self.pid,
            status,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildOutcome {
    pub index: usize,
    pub pid: Option<u32>,
    pub status: ExitStatus,
}

/// Outcomes of every collaborator, in the order their waits returned.
#[derive(Debug, Default)]
pub struct LaunchReport {
    outcomes: Vec<ChildOutcome>,
}

impl LaunchReport {
    pub fn outcomes(&self) -> &[ChildOutcome] {
        &self.outcomes
    }

    pub fn spawned(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ChildOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.status.success())
    }

    pub fn exit_status(&self, policy: ExitPolicy) -> u8 {
        match policy {
            ExitPolicy::Propagate if self.failures().next().is_some() => 1,
            _ => 0,
        }
    }

    pub fn exit_code(&self, policy: ExitPolicy) -> ExitCode {
        ExitCode::from(self.exit_status(policy))
    }
}

pub struct Launcher {
    options: CollaboratorOptions,
    wait_order: WaitOrder,
}

impl Launcher {
    pub fn new(options: CollaboratorOptions) -> Self {
        Self {
            options,
            wait_order: WaitOrder::default(),
        }
    }

    pub fn wait_order(mut self, value: WaitOrder) -> Self {
        self.wait_order = value;
        self
    }

    pub fn options(&self) -> &CollaboratorOptions {
        &self.options
    }

    pub async fn run(&self, count: usize) -> Result<LaunchReport, LaunchError> {
        let children = self.spawn_all(count)?;
        wait_all(children, self.wait_order).await
    }

    /// Starts `count` collaborators.
    ///
    /// Stops at the first spawn failure. Children started before it keep
    /// running and are not waited on. `count` is not trusted for
    /// preallocation, so an oversized request fails on the OS spawn instead.
    pub fn spawn_all(&self, count: usize) -> Result<Vec<SpawnedChild>, LaunchError> {
        let mut children = Vec::new();
        for index in 0..count {
            let child = self
                .options
                .command(index)
                .spawn()
                .map_err(|source| LaunchError::Spawn {
                    index,
                    program: self.options.program_path().to_path_buf(),
                    source,
                })?;
            let pid = child.id();
            debug!(index, pid = ?pid, "collaborator started");
            children.push(SpawnedChild { index, pid, child });
        }
        Ok(children)
    }
}

/// Waits on every child exactly once.
pub async fn wait_all(
    children: Vec<SpawnedChild>,
    order: WaitOrder,
) -> Result<LaunchReport, LaunchError> {
    let mut outcomes = Vec::new();

    match order {
        WaitOrder::Spawn => {
            for child in children {
                outcomes.push(child.wait().await?);
            }
        }
        WaitOrder::Completion => {
            let mut waiters = JoinSet::new();
            for child in children {
                waiters.spawn(child.wait());
            }
            while let Some(result) = waiters.join_next().await {
                outcomes.push(result??);
            }
        }
    }

    Ok(LaunchReport { outcomes })
}
