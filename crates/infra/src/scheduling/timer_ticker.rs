//! Display ticker for the workout timer.
//!
//! Drives [`WorkoutTimerService::tick`] on a fixed interval for one timer
//! instance. The loop exits on its own once the tick reports the timer stale
//! (paused, stopped or replaced) or completed; callers restart it after a
//! resume or reset. Join handles are tracked and cancellation is explicit.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gymtrack_core::WorkoutTimerService;
//! use gymtrack_domain::TimerType;
//! use gymtrack_infra::scheduling::{SchedulerResult, TimerTicker, TimerTickerConfig};
//!
//! # async fn example(service: Arc<WorkoutTimerService>) -> SchedulerResult<()> {
//! let id = service.start_timer(TimerType::Rest, 90, None);
//! let mut ticker = TimerTicker::new(service, TimerTickerConfig::default());
//! ticker.start(id)?;
//! // ... user rests ...
//! ticker.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use gymtrack_core::{TickOutcome, WorkoutTimerService};
use gymtrack_domain::{TimerConfig, TimerId};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Configuration for the timer ticker.
#[derive(Debug, Clone)]
pub struct TimerTickerConfig {
    /// Interval between display ticks.
    pub tick_interval: Duration,
    /// Timeout for awaiting the tick task join handle.
    pub join_timeout: Duration,
}

impl Default for TimerTickerConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_secs(1), join_timeout: Duration::from_secs(2) }
    }
}

impl From<&TimerConfig> for TimerTickerConfig {
    fn from(config: &TimerConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            ..Self::default()
        }
    }
}

/// Ticker with explicit lifecycle management.
pub struct TimerTicker {
    service: Arc<WorkoutTimerService>,
    config: TimerTickerConfig,
    handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    timer_id: Option<TimerId>,
}

impl TimerTicker {
    pub fn new(service: Arc<WorkoutTimerService>, config: TimerTickerConfig) -> Self {
        Self {
            service,
            config,
            handle: None,
            cancellation: CancellationToken::new(),
            timer_id: None,
        }
    }

    /// Start ticking `timer_id`.
    ///
    /// # Errors
    /// Returns [`SchedulerError::AlreadyRunning`] while a previous tick loop
    /// is still alive.
    #[instrument(skip(self))]
    pub fn start(&mut self, timer_id: TimerId) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let service = Arc::clone(&self.service);
        let period = self.config.tick_interval;

        self.handle = Some(tokio::spawn(async move {
            Self::tick_loop(service, timer_id, period, cancel).await;
        }));
        self.timer_id = Some(timer_id);
        debug!(interval_ms = period.as_millis(), "Timer ticker started");
        Ok(())
    }

    /// Cancel the tick loop and wait for it to finish.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NotRunning`] when no loop is alive, or a
    /// timeout/join error if the task does not wind down.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            self.handle = None;
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();
        self.join().await?;
        debug!("Timer ticker stopped");
        Ok(())
    }

    /// Stop any live loop, then start ticking `timer_id`.
    ///
    /// # Errors
    /// Propagates join failures from stopping the previous loop.
    pub async fn restart(&mut self, timer_id: TimerId) -> SchedulerResult<()> {
        if self.is_running() {
            self.stop().await?;
        }
        self.start(timer_id)
    }

    /// Returns true while the tick loop is active.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Timer the most recent loop was started for.
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer_id
    }

    async fn join(&mut self) -> SchedulerResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let join_timeout = self.config.join_timeout;
        tokio::time::timeout(join_timeout, handle)
            .await
            .map_err(|_| SchedulerError::Timeout {
                millis: u64::try_from(join_timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))
    }

    async fn tick_loop(
        service: Arc<WorkoutTimerService>,
        timer_id: TimerId,
        period: Duration,
        cancel: CancellationToken,
    ) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(timer_id = %timer_id, "Timer ticker cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match service.tick(timer_id) {
                        TickOutcome::Updated(value) => {
                            trace!(timer_id = %timer_id, displayed = value, "Timer tick");
                        }
                        TickOutcome::Completed => {
                            info!(timer_id = %timer_id, "Countdown finished");
                            break;
                        }
                        TickOutcome::Stale => {
                            debug!(timer_id = %timer_id, "Timer no longer active; ticker exiting");
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl Drop for TimerTicker {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("TimerTicker dropped while running; cancelling tick loop");
            self.cancellation.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gymtrack_common::time::{Clock, MockClock};
    use gymtrack_core::{EventLog, LogStoreConfig};
    use gymtrack_domain::{TimerStatus, TimerType};

    use super::*;
    use crate::storage::{DirectoryExportSink, MemoryLogStorage};

    fn service(clock: &MockClock) -> Arc<WorkoutTimerService> {
        let clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let log = Arc::new(EventLog::new(
            LogStoreConfig::default(),
            Arc::new(MemoryLogStorage::new()),
            Arc::new(DirectoryExportSink::new(std::env::temp_dir())),
            Arc::clone(&clock),
        ));
        Arc::new(WorkoutTimerService::new(clock, log))
    }

    fn fast_config() -> TimerTickerConfig {
        TimerTickerConfig {
            tick_interval: Duration::from_millis(5),
            join_timeout: Duration::from_secs(2),
        }
    }

    async fn wait_until_idle(ticker: &TimerTicker) {
        for _ in 0..200 {
            if !ticker.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn countdown_completion_ends_the_loop() {
        let clock = MockClock::new();
        let service = service(&clock);
        let id = service.start_timer(TimerType::Rest, 2, None);
        let mut ticker = TimerTicker::new(Arc::clone(&service), fast_config());

        ticker.start(id).expect("start succeeds");
        clock.advance_secs(3);
        wait_until_idle(&ticker).await;

        assert!(!ticker.is_running());
        assert_eq!(service.status(), TimerStatus::Idle);
        assert!(matches!(ticker.stop().await, Err(SchedulerError::NotRunning)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn pausing_makes_the_loop_exit() {
        let clock = MockClock::new();
        let service = service(&clock);
        let id = service.start_timer(TimerType::Exercise, 0, None);
        let mut ticker = TimerTicker::new(Arc::clone(&service), fast_config());

        ticker.start(id).expect("start succeeds");
        assert!(service.pause_timer());
        wait_until_idle(&ticker).await;
        assert!(!ticker.is_running());

        assert!(service.resume_timer());
        ticker.restart(id).await.expect("restart succeeds");
        assert!(ticker.is_running());
        ticker.stop().await.expect("stop succeeds");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_start_is_rejected() {
        let clock = MockClock::new();
        let service = service(&clock);
        let id = service.start_timer(TimerType::Exercise, 0, None);
        let mut ticker = TimerTicker::new(service, fast_config());

        ticker.start(id).expect("first start");
        let err = ticker.start(id).expect_err("second start fails");
        assert!(matches!(err, SchedulerError::AlreadyRunning));
        ticker.stop().await.expect("stop succeeds");
        assert_eq!(ticker.timer_id(), Some(id));
    }
}
