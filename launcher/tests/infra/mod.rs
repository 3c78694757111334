use std::{
    fs,
    path::Path,
    process::{ExitStatus, Stdio},
    time::{Duration, Instant},
};

use anyhow::Context;
use tempfile::TempDir;
use tokio::process::Command;

pub const LAUNCHER: &str = env!("CARGO_BIN_EXE_gc-launcher");
pub const STUB_GC: &str = env!("CARGO_BIN_EXE_stub-gc");

pub struct StubOptions {
    sleep_ms: Vec<u64>,
    exit_codes: Vec<u8>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            sleep_ms: vec![0],
            exit_codes: vec![0],
        }
    }
}

impl StubOptions {
    pub fn sleep_ms(mut self, value: &[u64]) -> Self {
        self.sleep_ms = value.to_vec();
        self
    }
    pub fn exit_codes(mut self, value: &[u8]) -> Self {
        self.exit_codes = value.to_vec();
        self
    }

    fn apply(&self, command: &mut Command, record_dir: &Path) {
        command
            .env("STUB_GC_RECORD_DIR", record_dir)
            .env("STUB_GC_SLEEP_MS", join(&self.sleep_ms))
            .env("STUB_GC_EXIT_CODES", join(&self.exit_codes));
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One launcher invocation against the stub collaborator.
pub struct LauncherRun {
    pub status: ExitStatus,
    pub stderr: String,
    pub elapsed: Duration,
    record_dir: TempDir,
}

impl LauncherRun {
    pub async fn start(args: &[&str], stub: StubOptions) -> anyhow::Result<Self> {
        Self::start_with(args, stub, |command| {
            command.env("GC_LAUNCHER_COLLABORATOR", STUB_GC);
        })
        .await
    }

    pub async fn start_with(
        args: &[&str],
        stub: StubOptions,
        configure: impl FnOnce(&mut Command),
    ) -> anyhow::Result<Self> {
        let record_dir = tempfile::tempdir()?;
        let mut command = Command::new(LAUNCHER);

        command
            .args(args)
            .env_remove("GC_LAUNCHER_COLLABORATOR")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        stub.apply(&mut command, record_dir.path());
        configure(&mut command);

        let start = Instant::now();
        let output = command.output().await.context("could not run launcher")?;
        let elapsed = start.elapsed();

        Ok(Self {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
            record_dir,
        })
    }

    pub fn record_dir(&self) -> &Path {
        self.record_dir.path()
    }

    /// Worker indices in the order the launcher reaped them. Needs the run
    /// to log at debug level.
    pub fn exit_order(&self) -> Vec<usize> {
        self.stderr
            .lines()
            .filter(|line| line.contains("collaborator exited"))
            .filter_map(|line| {
                let rest = &line[line.find("index=")? + "index=".len()..];
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
            .collect()
    }

    /// Pids recorded by every stub instance that started.
    pub fn started(&self) -> anyhow::Result<Vec<u32>> {
        let mut pids = Vec::new();
        for entry in fs::read_dir(self.record_dir())? {
            let content = fs::read_to_string(entry?.path())?;
            pids.push(content.trim().parse()?);
        }
        Ok(pids)
    }
}

/// Directory holding a `standalone-gc` link to the stub, for runs relying on
/// the default collaborator path.
pub fn default_collaborator_dir() -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    std::os::unix::fs::symlink(STUB_GC, dir.path().join("standalone-gc"))?;
    Ok(dir)
}
