use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::info;

/// Process-wide edit-mode flag, handed explicitly to whoever renders or
/// edits bound fields. Clones share the same flag.
#[derive(Clone, Default)]
pub struct EditMode {
    on: Arc<AtomicBool>,
}

impl EditMode {
    pub fn new(on: bool) -> Self { Self { on: Arc::new(AtomicBool::new(on)) } }

    pub fn is_on(&self) -> bool { self.on.load(Ordering::SeqCst) }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        let now = !self.on.fetch_xor(true, Ordering::SeqCst);
        info!(event = "edit_mode_toggled", on = now);
        now
    }
}
