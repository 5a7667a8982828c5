//! Linux specifics: device geometry, open flags and cache advice.

use crate::error::Error;
use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::{fs::OpenOptionsExt, io::AsRawFd},
    path::Path,
};
use tracing::debug;

// linux/fs.h: _IO(0x12, 96), the device size in 512-byte sectors.
const BLKGETSIZE: libc::c_ulong = 0x1260;
const SECTOR_SIZE: u64 = 512;

pub(crate) fn request_noatime(options: &mut OpenOptions) {
    options.custom_flags(libc::O_NOATIME);
}

/// Tells the kernel we won't come back for these pages. Only a hint, so
/// failures are ignored.
pub(crate) fn advise_noreuse(file: &File) {
    let ret = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_NOREUSE) };
    if ret != 0 {
        debug!(error = %io::Error::from_raw_os_error(ret), "posix_fadvise(NOREUSE) failed");
    }
}

pub(crate) fn block_device_size(file: &File, path: &Path) -> Result<u64, Error> {
    let mut sectors: libc::c_ulong = 0;
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), BLKGETSIZE as _, &mut sectors) };
    if ret < 0 {
        return Err(Error::Size {
            path: path.to_owned(),
            source: io::Error::last_os_error(),
        });
    }
    Ok(u64::from(sectors).saturating_mul(SECTOR_SIZE))
}

/// Logs what block-utils knows about the device, if anything.
pub(crate) fn describe_block_device(path: &Path) {
    match block_utils::get_device_from_path(path) {
        Ok((partition, Some(device))) => debug!(
            ?partition,
            media_type = ?device.media_type,
            capacity = device.capacity,
            serial = ?device.serial_number,
            "Block device"
        ),
        Ok((_, None)) => debug!("block-utils does not know this device"),
        Err(error) => debug!(?error, "Could not describe block device"),
    }
}
