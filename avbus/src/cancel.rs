use core::sync::atomic::{AtomicBool, Ordering};

/// A blocking call was abandoned through its [`CancelToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cancelled;

/// Stops a blocking receive loop
///
/// The loop checks the token before every poll, so cancellation takes effect within one poll
/// of the underlying transport. The token may be cancelled from another thread or from an
/// interrupt handler.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Re-arms the token for another blocking call.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub(crate) fn check(token: Option<&CancelToken>) -> Result<(), Cancelled> {
        match token {
            Some(token) if token.is_cancelled() => Err(Cancelled),
            _ => Ok(()),
        }
    }
}
