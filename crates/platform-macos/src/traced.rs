//! `P_TRACED` lookup for the current process.

/// `Some(1)` when the kernel reports this process as traced, `Some(0)` when
/// not, `None` if the sysctl failed.
pub fn traced_flag() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        traced_flag_macos()
    }
    #[cfg(not(target_os = "macos"))]
    {
        None
    }
}

/// sizeof(struct kinfo_proc) on 64-bit macOS.
pub const KINFO_PROC_SIZE: usize = 648;
/// offsetof(kinfo_proc, kp_proc.p_flag): the 16-byte `p_un` union and the
/// `p_vmspace` and `p_sigacts` pointers come first.
const P_FLAG_OFFSET: usize = 32;
const P_TRACED: i32 = 0x0000_0800;

/// Reads `p_flag & P_TRACED` out of the first `len` bytes sysctl filled in.
pub fn traced_from_kinfo(buf: &[u8; KINFO_PROC_SIZE], len: usize) -> Option<bool> {
    if len < P_FLAG_OFFSET + 4 {
        return None;
    }
    let p_flag = i32::from_ne_bytes([
        buf[P_FLAG_OFFSET],
        buf[P_FLAG_OFFSET + 1],
        buf[P_FLAG_OFFSET + 2],
        buf[P_FLAG_OFFSET + 3],
    ]);
    Some((p_flag & P_TRACED) != 0)
}

#[cfg(target_os = "macos")]
fn traced_flag_macos() -> Option<u64> {
    // Raw kinfo_proc bytes; libc no longer exposes the struct.
    let mut mib: [libc::c_int; 4] = [
        libc::CTL_KERN,
        libc::KERN_PROC,
        libc::KERN_PROC_PID,
        // SAFETY: getpid has no preconditions.
        unsafe { libc::getpid() },
    ];
    let mut buf = [0u8; KINFO_PROC_SIZE];
    let mut size = KINFO_PROC_SIZE;

    // SAFETY: mib, buf and size outlive the call and size matches buf.
    let ret = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            4,
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };
    if ret != 0 {
        return None;
    }
    traced_from_kinfo(&buf, size).map(u64::from)
}
