//! Unix raw-mode session
//!
//! Implements cbreak-mode toggling and raw reads using POSIX termios,
//! mirroring what `tty.setcbreak` does: clear the ICANON and ECHO local
//! flags and set VMIN=1, VTIME=0 so each read returns a single byte as
//! soon as it arrives, without echoing it.

use std::os::fd::BorrowedFd;
use std::os::unix::io::RawFd;
use std::time::Duration;

use nix::libc::{self, STDIN_FILENO};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use nix::unistd::{isatty, read};

use super::{TtyError, TtyResult, WindowSize};

/// Exclusive cbreak-mode access to a terminal file descriptor.
///
/// The previous termios settings are captured on open and restored when
/// the session is dropped, so the terminal comes back out of raw mode on
/// every exit path, including early returns through `?`.
///
/// Raw-mode toggling is process-global state: keep at most one session
/// open per descriptor, from a single thread.
#[derive(Debug)]
pub struct TtySession {
    fd: RawFd,
    saved: Option<Termios>,
}

impl TtySession {
    /// Enter cbreak mode on the given descriptor.
    ///
    /// Fails with [`TtyError::UnsupportedDevice`] if the descriptor is
    /// not a terminal; no settings are captured in that case, so there
    /// is nothing to restore.
    pub fn open(fd: RawFd) -> TtyResult<Self> {
        if !isatty(fd).unwrap_or(false) {
            return Err(TtyError::UnsupportedDevice);
        }

        // SAFETY: the caller's fd outlives this borrow; we only hand it
        // to tcgetattr/tcsetattr within this function
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let saved = termios::tcgetattr(borrowed).map_err(TtyError::GetAttr)?;

        let mut raw = saved.clone();
        raw.local_flags.remove(LocalFlags::ICANON);
        raw.local_flags.remove(LocalFlags::ECHO);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        termios::tcsetattr(borrowed, SetArg::TCSANOW, &raw).map_err(TtyError::SetAttr)?;

        Ok(TtySession {
            fd,
            saved: Some(saved),
        })
    }

    /// Enter cbreak mode on standard input
    pub fn from_stdin() -> TtyResult<Self> {
        Self::open(STDIN_FILENO)
    }

    /// The descriptor this session controls
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// Wait for input with a bounded timeout.
    ///
    /// Returns true if a byte is readable, false if the timeout expired.
    fn poll_read(&self, timeout: Duration) -> TtyResult<bool> {
        // SAFETY: the fd is valid for the lifetime of this session
        let borrowed = unsafe { BorrowedFd::borrow_raw(self.fd) };
        let mut fds = [PollFd::new(&borrowed, PollFlags::POLLIN)];
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;
        let n = poll(&mut fds, timeout_ms).map_err(TtyError::Poll)?;
        Ok(n > 0
            && fds[0]
                .revents()
                .is_some_and(|r| r.contains(PollFlags::POLLIN)))
    }

    /// Read one byte at a time until `terminator` is seen.
    ///
    /// The terminator is included in the returned buffer. Each byte is
    /// preceded by a `poll(2)` wait of at most `timeout`; a terminal
    /// that never replies (output redirected, query unimplemented)
    /// yields [`TtyError::Timeout`] instead of hanging the thread.
    pub fn read_until(&self, terminator: u8, timeout: Duration) -> TtyResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(24);
        loop {
            if !self.poll_read(timeout)? {
                return Err(TtyError::Timeout(timeout));
            }
            let mut byte = [0u8; 1];
            let n = read(self.fd, &mut byte).map_err(TtyError::Read)?;
            if n == 0 {
                return Err(TtyError::IncompleteResponse);
            }
            buffer.push(byte[0]);
            if byte[0] == terminator {
                break;
            }
        }
        tracing::trace!(
            response = %crate::ansi::escape_controls(&String::from_utf8_lossy(&buffer)),
            "received from tty"
        );
        Ok(buffer)
    }

    /// Restore the saved settings now, reporting any failure.
    ///
    /// Dropping the session restores them too, but silently.
    pub fn restore(mut self) -> TtyResult<()> {
        if let Some(saved) = self.saved.take() {
            // SAFETY: the fd is still valid; the session owns the mode change
            let borrowed = unsafe { BorrowedFd::borrow_raw(self.fd) };
            termios::tcsetattr(borrowed, SetArg::TCSANOW, &saved).map_err(TtyError::SetAttr)?;
        }
        Ok(())
    }
}

impl Drop for TtySession {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            // SAFETY: the fd is still valid; nothing else restored it
            let borrowed = unsafe { BorrowedFd::borrow_raw(self.fd) };
            if let Err(e) = termios::tcsetattr(borrowed, SetArg::TCSANOW, &saved) {
                tracing::warn!("failed to restore terminal attributes: {e}");
            }
        }
    }
}

/// Ask the kernel for the terminal dimensions via `TIOCGWINSZ`.
pub fn window_size(fd: RawFd) -> TtyResult<WindowSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for querying window size
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(TtyError::WindowSize(nix::errno::Errno::last()))
    } else {
        Ok(WindowSize {
            rows: winsize.ws_row,
            cols: winsize.ws_col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_read_until_includes_terminator_and_stops() {
        let pty = nix::pty::openpty(None, None).expect("Failed to open pty");
        let slave_fd = pty.slave.as_raw_fd();

        // cbreak first so the report is not held in a canonical-mode
        // line buffer
        let session = TtySession::open(slave_fd).expect("Failed to open session");

        let mut master = File::from(pty.master);
        master
            .write_all(b"\x1b[10;20Rjunk")
            .expect("Failed to write report");

        let buffer = session
            .read_until(b'R', Duration::from_millis(500))
            .expect("Failed to read report");
        assert_eq!(buffer, b"\x1b[10;20R");
    }

    #[test]
    fn test_read_until_times_out_on_silence() {
        let pty = nix::pty::openpty(None, None).expect("Failed to open pty");
        let slave_fd = pty.slave.as_raw_fd();

        let session = TtySession::open(slave_fd).expect("Failed to open session");

        // nothing ever written to the master
        let timeout = Duration::from_millis(100);
        match session.read_until(b'R', timeout) {
            Err(TtyError::Timeout(after)) => assert_eq!(after, timeout),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_open_on_non_tty_is_unsupported() {
        let file = std::fs::File::open("/dev/null").expect("Failed to open /dev/null");
        match TtySession::open(file.as_raw_fd()) {
            Err(TtyError::UnsupportedDevice) => {}
            other => panic!("expected UnsupportedDevice, got {other:?}"),
        }
    }

    #[test]
    fn test_window_size_on_non_tty_fails() {
        let file = std::fs::File::open("/dev/null").expect("Failed to open /dev/null");
        assert!(window_size(file.as_raw_fd()).is_err());
    }

    #[test]
    fn test_open_on_tty_restores_on_drop() {
        // Only meaningful when the test runner itself has a tty
        let Ok(file) = std::fs::File::open("/dev/tty") else {
            return;
        };
        let fd = file.as_raw_fd();

        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let before = termios::tcgetattr(borrowed).expect("Failed to get attributes");

        {
            let session = TtySession::open(fd).expect("Failed to open session");
            assert_eq!(session.fd(), fd);
            let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
            let during = termios::tcgetattr(borrowed).expect("Failed to get attributes");
            assert!(!during.local_flags.contains(LocalFlags::ICANON));
            assert!(!during.local_flags.contains(LocalFlags::ECHO));
        }

        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let after = termios::tcgetattr(borrowed).expect("Failed to get attributes");
        assert_eq!(before.local_flags, after.local_flags);
        assert_eq!(before.control_chars, after.control_chars);
    }
}
