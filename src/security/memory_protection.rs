//! Pins the seed buffer's pages in RAM so key material cannot be swapped
//! to disk while the store is live.
//!
//! Uses `libc::mlock` on Unix and `VirtualLock` on Windows, behind the
//! `memlock` cargo feature. Failure to pin is reported to the caller, who
//! decides whether to continue (locked memory quotas are commonly
//! exhausted inside containers, and an unpinned seed still zeroizes).

#[cfg(all(windows, feature = "memlock"))]
use winapi::shared::minwindef::LPVOID;
#[cfg(all(windows, feature = "memlock"))]
use winapi::um::memoryapi::{VirtualLock, VirtualUnlock};

/// Pin the pages backing `buf` in physical memory.
#[cfg(all(unix, feature = "memlock"))]
pub fn pin_buffer(buf: &[u8]) -> Result<(), std::io::Error> {
    if buf.is_empty() {
        return Ok(());
    }
    // safety: the slice guarantees a valid (ptr, len) region for the call.
    let res = unsafe { libc::mlock(buf.as_ptr() as *const std::ffi::c_void, buf.len()) };
    if res != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Release the pin on the pages backing `buf`.
#[cfg(all(unix, feature = "memlock"))]
pub fn unpin_buffer(buf: &[u8]) -> Result<(), std::io::Error> {
    if buf.is_empty() {
        return Ok(());
    }
    let res = unsafe { libc::munlock(buf.as_ptr() as *const std::ffi::c_void, buf.len()) };
    if res != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Pin the pages backing `buf` in physical memory.
#[cfg(all(windows, feature = "memlock"))]
pub fn pin_buffer(buf: &[u8]) -> Result<(), std::io::Error> {
    if buf.is_empty() {
        return Ok(());
    }
    let res = unsafe { VirtualLock(buf.as_ptr() as LPVOID, buf.len()) };
    if res == 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Release the pin on the pages backing `buf`.
#[cfg(all(windows, feature = "memlock"))]
pub fn unpin_buffer(buf: &[u8]) -> Result<(), std::io::Error> {
    if buf.is_empty() {
        return Ok(());
    }
    let res = unsafe { VirtualUnlock(buf.as_ptr() as LPVOID, buf.len()) };
    if res == 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

// No-op fallbacks when the feature is disabled or the platform is unknown.
#[cfg(not(feature = "memlock"))]
pub fn pin_buffer(_buf: &[u8]) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(not(feature = "memlock"))]
pub fn unpin_buffer(_buf: &[u8]) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_unpin_round_trip() {
        let buf = vec![0xA5u8; 64];
        // mlock can fail under RLIMIT_MEMLOCK in CI; the contract is only
        // that unpin succeeds after a successful pin.
        if pin_buffer(&buf).is_ok() {
            unpin_buffer(&buf).unwrap();
        }
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        assert!(pin_buffer(&[]).is_ok());
    }
}
