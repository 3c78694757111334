//! Stand-in for `standalone-gc` used by the system tests.
//!
//! Every instance claims the lowest free slot in `STUB_GC_RECORD_DIR` by
//! creating `<dir>/<slot>` and writes its pid into it. It then sleeps and
//! exits as configured for its spawn index (`GC_LAUNCHER_WORKER_INDEX`),
//! falling back to the slot when started outside the launcher:
//!
//! - `STUB_GC_SLEEP_MS`: comma separated sleep durations in milliseconds.
//! - `STUB_GC_EXIT_CODES`: comma separated exit codes.
//!
//! The last entry of a list applies to all later indices.

use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::Path,
    process::ExitCode,
    time::Duration,
};

use anyhow::{Context, anyhow};

const RECORD_DIR_ENV: &str = "STUB_GC_RECORD_DIR";
const SLEEP_ENV: &str = "STUB_GC_SLEEP_MS";
const EXIT_CODES_ENV: &str = "STUB_GC_EXIT_CODES";
const WORKER_INDEX_ENV: &str = "GC_LAUNCHER_WORKER_INDEX";

fn claim_slot(dir: &Path) -> anyhow::Result<usize> {
    for slot in 0.. {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(slot.to_string()))
        {
            Ok(mut file) => {
                writeln!(file, "{}", std::process::id())?;
                return Ok(slot);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e).context("could not create slot file"),
        }
    }
    Err(anyhow!("no free slot"))
}

fn nth_entry<T: std::str::FromStr>(var: &str, slot: usize) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(list) = std::env::var(var) else {
        return Ok(None);
    };
    let entries: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();
    let Some(entry) = entries.get(slot).or(entries.last()) else {
        return Ok(None);
    };
    let value = entry
        .parse()
        .with_context(|| format!("invalid entry {entry:?} in {var}"))?;
    Ok(Some(value))
}

fn main() -> anyhow::Result<ExitCode> {
    let slot = match std::env::var_os(RECORD_DIR_ENV) {
        Some(dir) => claim_slot(Path::new(&dir))?,
        None => 0,
    };

    let index = match std::env::var(WORKER_INDEX_ENV) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {WORKER_INDEX_ENV} {value:?}"))?,
        Err(_) => slot,
    };

    if let Some(millis) = nth_entry::<u64>(SLEEP_ENV, index)? {
        std::thread::sleep(Duration::from_millis(millis));
    }

    let code = nth_entry::<u8>(EXIT_CODES_ENV, index)?.unwrap_or(0);
    Ok(ExitCode::from(code))
}
