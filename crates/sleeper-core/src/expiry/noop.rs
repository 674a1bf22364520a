use crate::expiry::action::ExpiryAction;

/// Expiry action that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpExpiry;

impl ExpiryAction for NoOpExpiry {
    #[inline(always)]
    fn on_expiry(&self) {}
}
