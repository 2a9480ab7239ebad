use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::BakeError;
use crate::BakeResult;

/// Cooperative cancellation signal shared between a host and a running
/// generation pass. Clones observe the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}

	/// Return [`BakeError::Cancelled`] once the signal has been raised.
	pub fn check(&self) -> BakeResult<()> {
		if self.is_cancelled() {
			return Err(BakeError::Cancelled);
		}

		Ok(())
	}
}
