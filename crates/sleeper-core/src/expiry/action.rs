use std::sync::Arc;

/// Host capability invoked when a deadline is reached.
///
/// # Contract
/// - Called at most once per worker lifetime.
/// - Called on the timer worker thread, never on the thread that armed the timer.
///   If the host action must run on its own main loop, the implementation is
///   responsible for dispatching it there.
/// - Never called once the worker has observed a Shutdown command. Expiry is
///   declared under the command cell lock; a Shutdown published after that
///   point does not suppress the call, and `shutdown_and_join` waits for it to
///   return.
/// - Called without any timer lock held, so the action may publish commands.
///   Tearing the timer down from here (`shutdown_and_join` or dropping the
///   controller) only requests shutdown: the worker cannot join itself, so the
///   call returns without waiting. Host teardown that must wait for the worker
///   has to be marshalled off the worker thread.
pub trait ExpiryAction: Send + Sync + 'static {
    /// Perform the terminal action (e.g. request host exit).
    fn on_expiry(&self);
}

impl<F> ExpiryAction for F
where
    F: Fn() + Send + Sync + 'static,
{
    #[inline]
    fn on_expiry(&self) {
        self()
    }
}

/// Shared handle to an expiry action.
pub type ExpiryHandle = Arc<dyn ExpiryAction>;

/// Wrap a closure into an [`ExpiryHandle`].
///
/// # Examples
/// ```
/// use sleeper_core::{ExpiryAction, expiry_fn};
///
/// let handle = expiry_fn(|| tracing::info!("time is up"));
/// handle.on_expiry();
/// ```
pub fn expiry_fn<F>(f: F) -> ExpiryHandle
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}
