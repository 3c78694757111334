use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::{
    collaborator::{CollaboratorOptions, DEFAULT_PROGRAM, PROGRAM_ENV},
    launch::{ExitPolicy, Launcher, WaitOrder},
    worker_count::WorkerCount,
};

/// Spawn N garbage collector workers and wait for all of them to exit.
#[derive(Debug, Parser)]
#[command(version)]
pub struct CliArgs {
    /// Number of collaborator instances to start. Zero or negative starts none.
    #[arg(allow_negative_numbers = true)]
    pub workers: WorkerCount,

    /// Executable started for every worker.
    #[arg(long, env = PROGRAM_ENV, default_value = DEFAULT_PROGRAM)]
    pub collaborator: PathBuf,

    /// Order in which finished workers are reaped.
    #[arg(long, value_enum, default_value_t = WaitOrder::Completion)]
    pub wait_order: WaitOrder,

    /// Exit with status 1 if any worker exited unsuccessfully.
    #[arg(long)]
    pub fail_on_child_error: bool,

    /// Arguments passed to every worker.
    #[arg(last = true)]
    pub collaborator_args: Vec<OsString>,
}

impl CliArgs {
    pub fn launcher(&self) -> Launcher {
        let options = CollaboratorOptions::default()
            .program(&self.collaborator)
            .args(&self.collaborator_args);
        Launcher::new(options).wait_order(self.wait_order)
    }

    pub fn exit_policy(&self) -> ExitPolicy {
        if self.fail_on_child_error {
            ExitPolicy::Propagate
        } else {
            ExitPolicy::Ignore
        }
    }
}
