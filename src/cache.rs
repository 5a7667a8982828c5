//! Dropping the kernel's page cache before a measurement.

use crate::error::Error;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Asks the kernel to discard clean page-cache pages, so the next reads
/// hit the medium. Needs root; without it sysctl fails and reads may be
/// served from memory.
pub(crate) fn drop_caches() -> Result<(), Error> {
    debug!("Dropping page cache");
    let status = Command::new("sysctl")
        .args(["-q", "vm.drop_caches=1"])
        .status()
        .map_err(|error| Error::CacheDrop(format!("could not run sysctl: {error}")))?;
    check_status(status)
}

fn check_status(status: ExitStatus) -> Result<(), Error> {
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(Error::CacheDrop(format!("sysctl returned {code}"))),
        None => Err(Error::CacheDrop(format!("sysctl was interrupted: {status}"))),
    }
}
