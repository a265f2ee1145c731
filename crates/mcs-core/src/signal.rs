//! Process-wide termination flag driven by POSIX signals.
//!
//! The engines poll [`termination_requested`] between measurements and
//! sweeps and exit their outer loops cleanly, preserving partial results.
//! The flag is a single process-wide atomic: it is cleared on entry to each
//! outer sampling call and therefore not re-entrant across engines sampling
//! concurrently in the same process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::OnceLock;

use signal_hook::consts::{SIGINT, SIGTERM};

use crate::errors::{ErrorInfo, McsError};

static TERMINATION_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();
static HOOK_OUTCOME: OnceLock<Result<(), String>> = OnceLock::new();

fn flag() -> &'static Arc<AtomicBool> {
    TERMINATION_FLAG.get_or_init(|| Arc::new(AtomicBool::new(false)))
}

/// Registers SIGINT and SIGTERM to set the termination flag.
///
/// Idempotent; the handlers stay installed for the lifetime of the process.
pub fn install_termination_hook() -> Result<(), McsError> {
    let outcome = HOOK_OUTCOME.get_or_init(|| {
        for signum in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signum, Arc::clone(flag()))
                .map_err(|err| err.to_string())?;
        }
        Ok(())
    });
    outcome.clone().map_err(|message| {
        McsError::Rng(
            ErrorInfo::new("signal-install", message)
                .with_hint("signal handlers could not be registered for this process"),
        )
    })
}

/// Returns whether a termination signal has been observed since the last
/// [`reset_termination_flag`].
pub fn termination_requested() -> bool {
    flag().load(Ordering::SeqCst)
}

/// Clears the termination flag. Engines call this on entry to an outer
/// sampling call so stale signals from a previous run are not observed.
pub fn reset_termination_flag() {
    flag().store(false, Ordering::SeqCst);
}

/// Sets the termination flag as if a signal had been delivered. Intended for
/// tests and for embedding hosts that manage signals themselves.
pub fn request_termination() {
    flag().store(true, Ordering::SeqCst);
}
