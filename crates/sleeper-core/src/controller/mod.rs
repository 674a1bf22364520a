//! Caller-facing API over the timer worker.
//! - Owns the worker thread handle.
//! - Publishes commands into the shared cell; never blocks except on shutdown.
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, info, instrument};

use crate::{
    cell::SharedCommandCell,
    config::TimerConfig,
    error::TimerError,
    expiry::ExpiryHandle,
    worker::{StatusBoard, TimerStatus, TimerWorker},
};
use sleeper_model::{Command, Minutes, Preset, RawMinutes};

pub use crate::cell::CommandSeq;

/// Handle to a running timer worker.
///
/// Exactly one worker thread exists per controller. [`TimerController::shutdown_and_join`]
/// consumes the controller, so no command can be published after shutdown.
/// Dropping a controller that was not shut down performs the same shutdown.
pub struct TimerController {
    cell: Arc<SharedCommandCell>,
    status: Arc<StatusBoard>,
    worker: Option<JoinHandle<()>>,
    cancelable: bool,
}

impl TimerController {
    /// Create a fresh command cell and start the worker thread.
    ///
    /// `expiry` is moved to the worker and invoked there at most once.
    pub fn spawn(cfg: &TimerConfig, expiry: ExpiryHandle) -> Result<Self, TimerError> {
        cfg.validate()?;

        let cell = Arc::new(SharedCommandCell::new());
        let status = Arc::new(StatusBoard::new());
        let worker = TimerWorker::new(Arc::clone(&cell), Arc::clone(&status), expiry, cfg.minute());

        let handle = thread::Builder::new()
            .name(cfg.thread_name.clone())
            .spawn(move || worker.run())
            .map_err(TimerError::Spawn)?;

        info!(thread = %cfg.thread_name, "timer worker spawned");
        Ok(Self {
            cell,
            status,
            worker: Some(handle),
            cancelable: false,
        })
    }

    /// Start or restart the countdown with `minutes`.
    ///
    /// Out-of-range values are rejected and nothing is published.
    #[instrument(level = "debug", skip(self))]
    pub fn arm(&mut self, minutes: RawMinutes) -> Result<CommandSeq, TimerError> {
        let minutes = Minutes::new(minutes)?;
        Ok(self.arm_minutes(minutes))
    }

    /// Start or restart the countdown, substituting the default for out-of-range values.
    #[instrument(level = "debug", skip(self))]
    pub fn arm_or_default(&mut self, minutes: RawMinutes) -> CommandSeq {
        let valid = Minutes::or_default(minutes);
        if RawMinutes::from(valid) != minutes {
            debug!(requested = minutes, using = %valid, "timer value out of range, using default");
        }
        self.arm_minutes(valid)
    }

    /// Start or restart the countdown from a fixed menu entry.
    #[instrument(level = "debug", skip(self))]
    pub fn arm_preset(&mut self, preset: Preset) -> CommandSeq {
        self.arm_minutes(preset.minutes())
    }

    /// Drop the active countdown. A no-op for the worker when nothing is armed.
    #[instrument(level = "debug", skip(self))]
    pub fn cancel(&mut self) -> CommandSeq {
        self.cancelable = false;
        self.cell.publish(Command::Cancel)
    }

    /// Publish Shutdown and block until the worker thread has exited.
    ///
    /// Returns the worker's final status. If the deadline was already declared
    /// reached, this waits for the expiry action to return.
    ///
    /// When called from inside the expiry action (i.e. on the worker thread),
    /// the worker is not joined; it exits as soon as the action returns.
    #[instrument(level = "debug", skip(self))]
    pub fn shutdown_and_join(mut self) -> Result<TimerStatus, TimerError> {
        self.stop()?;
        Ok(self.status.snapshot())
    }

    /// Latest status reported by the worker.
    pub fn status(&self) -> TimerStatus {
        self.status.snapshot()
    }

    /// Wait until the worker applied command `seq`, exited, or `timeout` elapsed.
    pub fn wait_applied(&self, seq: CommandSeq, timeout: Duration) -> TimerStatus {
        self.status.wait_applied(seq, timeout)
    }

    /// Whether a cancel would be meaningful from the caller's point of view.
    ///
    /// True after a successful arm, false initially and after [`TimerController::cancel`].
    /// Mirrors the sensitivity of a "Cancel" menu entry; it does not track expiry.
    #[inline]
    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    fn arm_minutes(&mut self, minutes: Minutes) -> CommandSeq {
        self.cancelable = true;
        self.cell.publish(Command::arm(minutes))
    }

    fn stop(&mut self) -> Result<(), TimerError> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        self.cell.publish(Command::Shutdown);

        // Called from the expiry action: the worker exits once the action returns.
        if handle.thread().id() == thread::current().id() {
            debug!("shutdown requested from the timer worker, not joining");
            return Ok(());
        }

        handle.join().map_err(|_| TimerError::WorkerPanicked)?;
        debug!("timer worker joined");
        Ok(())
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!(error = %e, "timer worker did not stop cleanly");
        }
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("status", &self.status.snapshot())
            .field("running", &self.worker.is_some())
            .field("cancelable", &self.cancelable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc,
        },
        time::Instant,
    };

    use parking_lot::Mutex;

    use super::*;
    use crate::{expiry::expiry_fn, worker::TimerState};
    use sleeper_model::{TIMER_DEFAULT, TIMER_MAX, TIMER_MIN};

    const WAIT: Duration = Duration::from_secs(5);

    fn config(minute_ms: u64) -> TimerConfig {
        TimerConfig {
            minute_ms,
            ..Default::default()
        }
    }

    fn counting(minute_ms: u64) -> (TimerController, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let ctrl = TimerController::spawn(
            &config(minute_ms),
            expiry_fn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
        (ctrl, fired)
    }

    fn reporting(minute_ms: u64) -> (TimerController, mpsc::Receiver<Instant>) {
        let (tx, rx) = mpsc::channel();
        let ctrl = TimerController::spawn(
            &config(minute_ms),
            expiry_fn(move || {
                let _ = tx.send(Instant::now());
            }),
        )
        .unwrap();
        (ctrl, rx)
    }

    #[test]
    fn arm_then_cancel_never_fires_for_any_duration() {
        let (mut ctrl, fired) = counting(1_000);

        let mut last = 0;
        for d in TIMER_MIN..=TIMER_MAX {
            ctrl.arm(i64::from(d)).unwrap();
            last = ctrl.cancel();
        }

        let status = ctrl.wait_applied(last, WAIT);
        assert_eq!(status.state, TimerState::Idle);
        assert_eq!(status.applied, last);

        let status = ctrl.shutdown_and_join().unwrap();
        assert_eq!(status.state, TimerState::Terminated);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fires_exactly_once_not_before_deadline() {
        let minute = Duration::from_millis(5);
        for d in [1u16, 3, 10] {
            let (mut ctrl, rx) = reporting(5);

            let armed_at = Instant::now();
            ctrl.arm(i64::from(d)).unwrap();

            let fired_at = rx.recv_timeout(WAIT).expect("timer must fire");
            assert!(fired_at >= armed_at + minute * u32::from(d));
            assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

            let status = ctrl.shutdown_and_join().unwrap();
            assert_eq!(status.state, TimerState::Fired);
        }
    }

    #[test]
    fn longest_duration_fires_once_after_full_span() {
        let (mut ctrl, rx) = reporting(1);

        let armed_at = Instant::now();
        ctrl.arm(i64::from(TIMER_MAX)).unwrap();

        let fired_at = rx.recv_timeout(WAIT).expect("timer must fire");
        assert!(fired_at >= armed_at + Duration::from_millis(999));
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        let status = ctrl.shutdown_and_join().unwrap();
        assert_eq!(status.state, TimerState::Fired);
    }

    #[test]
    fn rearm_uses_latest_duration_only() {
        // shorter second arm: fires on d2, once
        let (mut ctrl, rx) = reporting(10);
        ctrl.arm(50).unwrap();
        let rearmed_at = Instant::now();
        ctrl.arm(2).unwrap();

        let fired_at = rx.recv_timeout(WAIT).expect("timer must fire");
        assert!(fired_at >= rearmed_at + Duration::from_millis(20));
        assert!(fired_at < rearmed_at + Duration::from_millis(500));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(ctrl);

        // longer second arm: the first deadline has no effect
        let (mut ctrl, rx) = reporting(10);
        ctrl.arm(1).unwrap();
        let rearmed_at = Instant::now();
        ctrl.arm(20).unwrap();

        let fired_at = rx.recv_timeout(WAIT).expect("timer must fire");
        assert!(fired_at >= rearmed_at + Duration::from_millis(200));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn cancel_without_timer_is_noop() {
        let (mut ctrl, fired) = counting(1_000);
        assert!(!ctrl.is_cancelable());

        let seq = ctrl.cancel();
        let status = ctrl.wait_applied(seq, WAIT);
        assert_eq!(status.state, TimerState::Idle);
        assert_eq!(status.applied, seq);

        ctrl.shutdown_and_join().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn out_of_range_arm_is_rejected_and_behaves_as_cancel() {
        let (mut ctrl, fired) = counting(1_000);

        for raw in [0, 1000] {
            let seq = ctrl.arm(30).unwrap();
            assert!(ctrl.wait_applied(seq, WAIT).state.is_armed());

            let err = ctrl.arm(raw).unwrap_err();
            assert!(matches!(err, TimerError::InvalidDuration(_)));

            // controller layer: nothing was published, the timer is still armed
            assert_eq!(ctrl.status().applied, seq);
            assert!(!ctrl.cell.is_pending());

            // worker layer: the same value published directly cancels
            let seq = ctrl.cell.publish(Command::Arm(raw));
            assert_eq!(ctrl.wait_applied(seq, WAIT).state, TimerState::Idle);
        }

        ctrl.shutdown_and_join().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arm_or_default_substitutes_default() {
        let (mut ctrl, _) = counting(1_000);

        let seq = ctrl.arm_or_default(5000);
        let status = ctrl.wait_applied(seq, WAIT);
        assert!(matches!(
            status.state,
            TimerState::Armed { minutes, .. } if minutes.get() == TIMER_DEFAULT
        ));

        let seq = ctrl.arm_or_default(15);
        assert!(matches!(
            ctrl.wait_applied(seq, WAIT).state,
            TimerState::Armed { minutes, .. } if minutes.get() == 15
        ));
    }

    #[test]
    fn arm_preset_uses_preset_value() {
        let (mut ctrl, _) = counting(1_000);

        let seq = ctrl.arm_preset(Preset::DEFAULTS[2]);
        assert!(matches!(
            ctrl.wait_applied(seq, WAIT).state,
            TimerState::Armed { minutes, .. } if minutes.get() == 90
        ));
    }

    #[test]
    fn cancelable_follows_arm_and_cancel() {
        let (mut ctrl, _) = counting(1_000);

        assert!(!ctrl.is_cancelable());
        ctrl.arm_preset(Preset::DEFAULTS[0]);
        assert!(ctrl.is_cancelable());
        ctrl.cancel();
        assert!(!ctrl.is_cancelable());

        assert!(ctrl.arm(0).is_err());
        assert!(!ctrl.is_cancelable());
        ctrl.arm_or_default(0);
        assert!(ctrl.is_cancelable());
    }

    #[test]
    fn shutdown_returns_from_idle_and_armed() {
        let (ctrl, _) = counting(1_000);
        let status = ctrl.shutdown_and_join().unwrap();
        assert_eq!(status.state, TimerState::Terminated);

        let (mut ctrl, fired) = counting(1_000);
        let seq = ctrl.arm(999).unwrap();
        ctrl.wait_applied(seq, WAIT);

        let start = Instant::now();
        let status = ctrl.shutdown_and_join().unwrap();
        assert_eq!(status.state, TimerState::Terminated);
        assert!(start.elapsed() < WAIT);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn shutdown_before_deadline_suppresses_expiry() {
        for _ in 0..20 {
            let (mut ctrl, fired) = counting(100);
            ctrl.arm(1).unwrap();
            ctrl.shutdown_and_join().unwrap();

            std::thread::sleep(Duration::from_millis(5));
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        }

        let (mut ctrl, fired) = counting(50);
        ctrl.arm(1).unwrap();
        ctrl.shutdown_and_join().unwrap();
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn shutdown_after_fire_returns_immediately() {
        let (mut ctrl, rx) = reporting(1);
        ctrl.arm(1).unwrap();
        rx.recv_timeout(WAIT).expect("timer must fire");

        // commands after expiry are published into a cell nobody reads
        ctrl.cancel();
        let status = ctrl.shutdown_and_join().unwrap();
        assert_eq!(status.state, TimerState::Fired);
    }

    #[test]
    fn storm_settles_on_last_command() {
        let (mut ctrl, fired) = counting(60_000);

        let mut last_seq = 0;
        let mut expected = None;
        for i in 0..5_000i64 {
            (last_seq, expected) = match i % 4 {
                0 => (ctrl.arm(i % 999 + 1).unwrap(), Some(i % 999 + 1)),
                1 => (ctrl.cancel(), None),
                2 => (ctrl.cell.publish(Command::Arm(1000 + i)), None),
                _ => (
                    ctrl.arm_or_default(i),
                    Some(RawMinutes::from(Minutes::or_default(i))),
                ),
            };
        }

        let status = ctrl.wait_applied(last_seq, WAIT);
        assert_eq!(status.applied, last_seq);
        match expected {
            Some(raw) => assert!(matches!(
                status.state,
                TimerState::Armed { minutes, .. } if RawMinutes::from(minutes) == raw
            )),
            None => assert_eq!(status.state, TimerState::Idle),
        }

        let seq = ctrl.cancel();
        assert_eq!(ctrl.wait_applied(seq, WAIT).state, TimerState::Idle);

        ctrl.shutdown_and_join().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drop_stops_worker_and_releases_expiry() {
        let expiry = expiry_fn(|| {});
        let ctrl = TimerController::spawn(&config(1_000), Arc::clone(&expiry)).unwrap();
        assert_eq!(Arc::strong_count(&expiry), 2);

        drop(ctrl);
        assert_eq!(Arc::strong_count(&expiry), 1);
    }

    #[test]
    fn worker_panic_is_reported() {
        let mut ctrl =
            TimerController::spawn(&config(1), expiry_fn(|| panic!("expiry failed"))).unwrap();
        ctrl.arm(1).unwrap();

        let now = Instant::now();
        while !ctrl.status().state.is_final() && now.elapsed() < WAIT {
            std::thread::sleep(Duration::from_millis(1));
        }

        let err = ctrl.shutdown_and_join().unwrap_err();
        assert!(matches!(err, TimerError::WorkerPanicked));
    }

    #[test]
    fn shutdown_from_expiry_action_does_not_join_itself() {
        let slot: Arc<Mutex<Option<TimerController>>> = Arc::new(Mutex::new(None));
        let (tx, rx) = mpsc::channel();

        let taken = Arc::clone(&slot);
        let ctrl = TimerController::spawn(
            &config(1),
            expiry_fn(move || {
                if let Some(ctrl) = taken.lock().take() {
                    let _ = tx.send(ctrl.shutdown_and_join().map(|s| s.state));
                }
            }),
        )
        .unwrap();
        *slot.lock() = Some(ctrl);

        slot.lock().as_mut().unwrap().arm(1).unwrap();

        let result = rx.recv_timeout(WAIT).expect("expiry action must complete");
        assert!(matches!(result, Ok(TimerState::Fired)));
        assert!(slot.lock().is_none());
    }

    #[test]
    fn drop_from_expiry_action_does_not_join_itself() {
        let slot: Arc<Mutex<Option<TimerController>>> = Arc::new(Mutex::new(None));
        let (tx, rx) = mpsc::channel();

        let taken = Arc::clone(&slot);
        let ctrl = TimerController::spawn(
            &config(1),
            expiry_fn(move || {
                drop(taken.lock().take());
                let _ = tx.send(());
            }),
        )
        .unwrap();
        *slot.lock() = Some(ctrl);

        slot.lock().as_mut().unwrap().arm(2).unwrap();
        rx.recv_timeout(WAIT).expect("expiry action must complete");
    }

    #[test]
    fn spawn_rejects_invalid_config() {
        let err = TimerController::spawn(&config(0), crate::expiry::noop_expiry()).unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig(_)));
    }

    #[test]
    fn worker_thread_uses_configured_name() {
        let (tx, rx) = mpsc::channel();
        let cfg = TimerConfig {
            minute_ms: 1,
            thread_name: "named-timer".into(),
            ..Default::default()
        };
        let mut ctrl = TimerController::spawn(
            &cfg,
            expiry_fn(move || {
                let _ = tx.send(std::thread::current().name().map(str::to_owned));
            }),
        )
        .unwrap();
        ctrl.arm(1).unwrap();

        assert_eq!(rx.recv_timeout(WAIT).unwrap().as_deref(), Some("named-timer"));
    }
}
