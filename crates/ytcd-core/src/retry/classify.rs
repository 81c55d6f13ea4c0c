//! Classify I/O errors into retry policy error kinds.

use std::io;

use super::policy::ErrorKind;

/// Classify an I/O error for retry decisions.
///
/// Only malformed input is treated as permanent; everything else the
/// filesystem can report (full disk, stale NFS handle, permission flip)
/// has a chance of clearing up while we back off.
pub fn classify_io_error(e: &io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => ErrorKind::Permanent,
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted => ErrorKind::Timeout,
        io::ErrorKind::WouldBlock => ErrorKind::Busy,
        _ => ErrorKind::Storage,
    }
}
