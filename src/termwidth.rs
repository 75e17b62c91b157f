//! Terminal width detection, concretely implemented via an `ioctl` probe
//! of the standard output file descriptor.
//!
//! Spec treats this as an opaque "terminal width service"; the teacher
//! crate already depends on `libc` for exactly this kind of low-level
//! syscall, so this module grounds the service in it rather than
//! inventing a new dependency.

use libc::{c_ushort, ioctl, TIOCGWINSZ};
use std::os::unix::io::RawFd;

/// Default column count used when no better information is available.
pub const DEFAULT_COLUMNS: u16 = 80;

#[repr(C)]
#[derive(Default)]
struct WinSize {
    ws_row: c_ushort,
    ws_col: c_ushort,
    ws_xpixel: c_ushort,
    ws_ypixel: c_ushort,
}

/// Probes the terminal width of file descriptor `fd` via `TIOCGWINSZ`.
fn ioctl_columns(fd: RawFd) -> Option<u16> {
    let mut ws = WinSize::default();
    // SAFETY: `ws` is a plain-old-data struct matching the kernel's
    // `struct winsize` layout, and `fd` is a caller-supplied descriptor;
    // a failing ioctl (e.g. fd is not a tty) is reported via its return
    // value and does not write through the pointer.
    let rc = unsafe { ioctl(fd, TIOCGWINSZ, &mut ws as *mut WinSize) };
    if rc == 0 && ws.ws_col > 0 {
        Some(ws.ws_col)
    } else {
        None
    }
}

/// Resolves the number of display columns to use for line wrapping.
///
/// Tries, in order: the `ioctl(TIOCGWINSZ)` size of stdout, the
/// `COLUMNS` environment variable, and finally [`DEFAULT_COLUMNS`] —
/// the same fallback chain systemd's own `columns()` helper uses.
pub fn columns() -> u16 {
    use std::os::unix::io::AsRawFd;

    if let Some(cols) = ioctl_columns(std::io::stdout().as_raw_fd()) {
        return cols;
    }

    if let Ok(val) = std::env::var("COLUMNS") {
        if let Ok(cols) = val.trim().parse::<u16>() {
            if cols > 0 {
                return cols;
            }
        }
    }

    DEFAULT_COLUMNS
}
