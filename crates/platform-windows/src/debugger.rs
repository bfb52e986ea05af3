//! Local and remote debugger presence.

/// `Some(1)` if a local or remote debugger is attached, `Some(0)` if not.
/// `None` off Windows.
pub fn debugger_flag() -> Option<u64> {
    #[cfg(target_os = "windows")]
    {
        Some(u64::from(debugger_present_windows()))
    }
    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

#[cfg(target_os = "windows")]
fn debugger_present_windows() -> bool {
    use std::ffi::c_void;

    extern "system" {
        fn IsDebuggerPresent() -> i32;
        fn GetCurrentProcess() -> *mut c_void;
        fn CheckRemoteDebuggerPresent(process: *mut c_void, present: *mut i32) -> i32;
    }

    // SAFETY: no preconditions.
    if unsafe { IsDebuggerPresent() } != 0 {
        return true;
    }

    let mut remote = 0i32;
    // SAFETY: the pseudo-handle is always valid and `remote` outlives the call.
    let queried = unsafe { CheckRemoteDebuggerPresent(GetCurrentProcess(), &mut remote) };
    queried != 0 && remote != 0
}
