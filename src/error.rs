//! Everything that can go wrong while measuring a single target.

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Could not open {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not determine the size of {path:?}")]
    Size {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Target is too small ({size} bytes) for blocks of {block_size} bytes")]
    TooSmall { size: u64, block_size: u64 },

    #[error("I/O error at offset {offset}: {cause}")]
    Io { offset: u64, cause: io::Error },

    #[error("No block could be read, there is nothing to report")]
    NoSamples,

    #[error("Could not drop the page cache: {0}")]
    CacheDrop(String),

    #[cfg_attr(target_os = "linux", allow(dead_code))]
    #[error("Block device {path:?} can not be sized on this platform")]
    UnsupportedPlatform { path: PathBuf },
}
