//! Fallbacks for platforms without Linux's device geometry ioctl.

use crate::error::Error;
use std::{
    fs::{File, OpenOptions},
    path::Path,
};
use tracing::warn;

pub(crate) fn request_noatime(_options: &mut OpenOptions) {
    warn!("O_NOATIME is not available on this platform, access times may be updated");
}

pub(crate) fn advise_noreuse(_file: &File) {}

pub(crate) fn block_device_size(_file: &File, path: &Path) -> Result<u64, Error> {
    Err(Error::UnsupportedPlatform {
        path: path.to_owned(),
    })
}

pub(crate) fn describe_block_device(_path: &Path) {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_devices_are_rejected() {
        let file = tempfile::tempfile().expect("temp file");
        let res = block_device_size(&file, Path::new("/dev/disk0"));
        assert!(matches!(
            res,
            Err(Error::UnsupportedPlatform { path }) if path == Path::new("/dev/disk0")
        ));
    }
}
