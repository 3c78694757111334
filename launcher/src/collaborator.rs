use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "./standalone-gc";
pub const PROGRAM_ENV: &str = "GC_LAUNCHER_COLLABORATOR";
/// Set on every child to its spawn index.
pub const WORKER_INDEX_ENV: &str = "GC_LAUNCHER_WORKER_INDEX";

/// How every collaborator instance is started.
#[derive(Debug, Clone)]
pub struct CollaboratorOptions {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl Default for CollaboratorOptions {
    fn default() -> Self {
        let program = std::env::var_os(PROGRAM_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM));
        Self {
            program,
            args: Vec::new(),
            current_dir: None,
        }
    }
}

impl CollaboratorOptions {
    pub fn program(mut self, value: impl Into<PathBuf>) -> Self {
        self.program = value.into();
        self
    }
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = values.into_iter().map(Into::into).collect();
        self
    }
    pub fn current_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(value.into());
        self
    }

    pub fn program_path(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Builds the command for the instance spawned at `index`.
    ///
    /// Children share the launcher's standard streams and environment. They
    /// are not tied to the handle's lifetime: dropping it leaves the process
    /// running.
    pub fn command(&self, index: usize) -> Command {
        let mut command = Command::new(&self.program);

        command
            .args(&self.args)
            .env(WORKER_INDEX_ENV, index.to_string())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);

        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        command
    }
}
