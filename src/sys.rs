//! Safe wrappers for platform-specific unsafe operations.
//!
//! Every `unsafe` block in the codebase lives here. Call sites use the safe
//! public API and never touch `unsafe` directly.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static INTERRUPT_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

extern "C" fn handle_sigint(_signal: libc::c_int) {
    // Only an atomic store happens here; that is async-signal-safe.
    if let Some(flag) = INTERRUPT_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

/// Install a SIGINT handler that sets the returned flag.
///
/// The batch driver polls the flag between recordings, so Ctrl-C finishes the
/// in-flight file and then stops cleanly with a partial summary. Installing
/// more than once returns the same flag.
///
/// # Safety
/// `sigaction` is a standard POSIX call; the handler body is restricted to an
/// atomic store.
pub fn install_interrupt_handler() -> Arc<AtomicBool> {
    let flag = INTERRUPT_FLAG
        .get_or_init(|| Arc::new(AtomicBool::new(false)))
        .clone();

    // SAFETY: we register a handler whose body is a single atomic store,
    // which is async-signal-safe; the sigaction struct is fully initialized.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_sigint as usize;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut());
    }

    flag
}
