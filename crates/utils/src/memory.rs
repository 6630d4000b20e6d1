use buildenv_core::{Error, Result};

/// Lock all current and future pages of the process into RAM
#[cfg(target_os = "linux")]
pub fn lock_all() -> Result<()> {
    // SAFETY: mlockall takes no pointers and only affects this process
    let rc = unsafe { libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) };
    if rc != 0 {
        return Err(Error::mlock(std::io::Error::last_os_error().to_string()));
    }
    tracing::debug!("Locked process memory");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn lock_all() -> Result<()> {
    Err(Error::unsupported(
        "mlock",
        "memory locking is only available on Linux",
    ))
}
