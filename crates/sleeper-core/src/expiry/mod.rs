//! Action performed when an armed timer runs out.
//!
//! The host supplies an [`ExpiryAction`] at activation time; the worker owns a
//! clone of the [`ExpiryHandle`] for its whole lifetime.
mod action;
pub use action::{ExpiryAction, ExpiryHandle, expiry_fn};

mod noop;
pub use noop::NoOpExpiry;

use std::sync::Arc;

/// Create an expiry handle that does nothing.
#[inline]
pub fn noop_expiry() -> ExpiryHandle {
    Arc::new(NoOpExpiry)
}
