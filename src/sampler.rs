//! The timed read loop.

use crate::{
    cache,
    error::Error,
    offsets::Offsets,
    options::{Pattern, SampleOptions},
    platform,
};
use rand::Rng;
use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom},
    os::unix::fs::FileTypeExt,
    path::Path,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

/// What came out of one target's read loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sample {
    /// Number of blocks fully read before the loop finished or aborted.
    pub completed: u64,
    pub block_size: u64,
    pub elapsed: Duration,
    pub pattern: Pattern,
}

/// Opens the target, sizes it and runs the read loop over it.
///
/// The handle is dropped, and so closed, on every return path.
#[tracing::instrument(skip(opts, rng))]
pub(crate) fn measure<R: Rng>(
    path: &Path,
    opts: &SampleOptions,
    rng: &mut R,
) -> Result<Sample, Error> {
    if opts.drop_cache {
        if let Err(error) = cache::drop_caches() {
            warn!(%error, "Reading through whatever is cached");
        }
    }
    let mut dev = open(path, opts.noatime)?;
    let size = target_size(&dev, path)?;
    info!(size, "Sampling");
    sample(&mut dev, size, opts, rng)
}

fn open(path: &Path, noatime: bool) -> Result<File, Error> {
    let mut options = OpenOptions::new();
    options.read(true);
    if noatime {
        platform::request_noatime(&mut options);
    }
    let file = options.open(path).map_err(|source| Error::Open {
        path: path.to_owned(),
        source,
    })?;
    platform::advise_noreuse(&file);
    Ok(file)
}

fn target_size(file: &File, path: &Path) -> Result<u64, Error> {
    let metadata = file.metadata().map_err(|source| Error::Size {
        path: path.to_owned(),
        source,
    })?;
    if metadata.file_type().is_block_device() {
        platform::describe_block_device(path);
        platform::block_device_size(file, path)
    } else {
        Ok(metadata.len())
    }
}

/// Reads `opts.block_count` blocks of `opts.block_size` bytes from `dev`,
/// which is `size` bytes long, timing the whole loop.
///
/// The first failing seek or read (a short read counts as failing) ends the
/// loop early; the sample then covers the blocks read up to that point.
pub(crate) fn sample<D: Read + Seek, R: Rng>(
    dev: &mut D,
    size: u64,
    opts: &SampleOptions,
    rng: &mut R,
) -> Result<Sample, Error> {
    let offsets = Offsets::new(size, opts.block_size, opts.pattern, rng)?;
    let mut buf = vec![0; opts.block_size as usize];

    let mut completed = 0;
    let start = Instant::now();
    for offset in offsets.take(usize::try_from(opts.block_count).unwrap_or(usize::MAX)) {
        if let Err(error) = read_block(dev, offset, &mut buf) {
            error!(error = %error, completed, "Aborting reads");
            break;
        }
        completed += 1;
    }
    let elapsed = start.elapsed();
    debug!(completed, ?elapsed, "Read loop done");

    if completed == 0 {
        return Err(Error::NoSamples);
    }
    Ok(Sample {
        completed,
        block_size: opts.block_size,
        elapsed,
        pattern: opts.pattern,
    })
}

fn read_block<D: Read + Seek>(dev: &mut D, offset: u64, buf: &mut [u8]) -> Result<(), Error> {
    let io_error = |cause| Error::Io { offset, cause };
    dev.seek(SeekFrom::Start(offset)).map_err(io_error)?;
    let read = dev.read(buf).map_err(io_error)?;
    if read != buf.len() {
        return Err(io_error(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("short read: {read} of {} bytes", buf.len()),
        )));
    }
    Ok(())
}
