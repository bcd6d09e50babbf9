//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use gymtrack_common::time::{Clock, SystemClock};
use gymtrack_core::{EventLog, LogStoreConfig, LoggedClient, UserTracker, WorkoutTimerService};
use gymtrack_domain::{Config, GymTrackError, Result, TimerId};
use gymtrack_infra::{
    DirectoryExportSink, FileLogStorage, InMemoryBackend, SchedulerError, TimerTicker,
    TimerTickerConfig,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Application context - holds all services and dependencies
///
/// Constructed once at startup; call [`AppContext::shutdown`] before exit.
pub struct AppContext {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub event_log: Arc<EventLog>,
    pub timer: Arc<WorkoutTimerService>,
    pub tracker: Arc<UserTracker>,
    pub database: Arc<LoggedClient<InMemoryBackend>>,

    // One tick loop at a time; restarting replaces it.
    ticker: Mutex<TimerTicker>,
}

impl AppContext {
    /// Create the context with the default configuration
    pub fn new() -> Result<Self> {
        Self::new_with_config(Config::default())
    }

    /// Create the context with a custom configuration and the system clock
    pub fn new_with_config(config: Config) -> Result<Self> {
        Self::new_with_clock(config, Arc::new(SystemClock))
    }

    /// Create the context with a custom configuration and clock
    ///
    /// # Errors
    /// Returns `GymTrackError::Storage` if the log storage directory cannot
    /// be created.
    pub fn new_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let storage = FileLogStorage::new(&config.logging.storage_dir)?;
        let export_sink = DirectoryExportSink::new(&config.logging.export_dir);

        let event_log = Arc::new(EventLog::new(
            LogStoreConfig::from(&config.logging),
            Arc::new(storage),
            Arc::new(export_sink),
            Arc::clone(&clock),
        ));

        let timer = Arc::new(WorkoutTimerService::new(Arc::clone(&clock), Arc::clone(&event_log)));
        let tracker = Arc::new(UserTracker::new(Arc::clone(&event_log)));

        if let Some(url) = config.backend.url.as_deref() {
            warn!(url, "Hosted backend configured but not available; using in-memory backend");
        }
        let database = Arc::new(
            LoggedClient::new(InMemoryBackend::new(), Arc::clone(&event_log))
                .with_slow_query_threshold(Duration::from_millis(
                    config.logging.slow_query_threshold_ms,
                )),
        );

        let ticker = TimerTicker::new(Arc::clone(&timer), TimerTickerConfig::from(&config.timer));

        info!(
            session_id = event_log.session_id(),
            restored_logs = event_log.len(),
            storage_dir = %config.logging.storage_dir,
            production = config.logging.production,
            "AppContext initialized"
        );

        Ok(Self { config, clock, event_log, timer, tracker, database, ticker: Mutex::new(ticker) })
    }

    /// Drive display ticks for `timer_id`, replacing any running tick loop.
    ///
    /// # Errors
    /// Returns `GymTrackError::Internal` if the previous loop fails to stop.
    pub async fn start_ticker(&self, timer_id: TimerId) -> Result<()> {
        let mut ticker = self.ticker.lock().await;
        ticker.restart(timer_id).await.map_err(GymTrackError::from)
    }

    /// Stop the tick loop if one is running.
    ///
    /// # Errors
    /// Returns `GymTrackError::Internal` if the loop does not wind down.
    pub async fn stop_ticker(&self) -> Result<()> {
        let mut ticker = self.ticker.lock().await;
        match ticker.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether a tick loop is currently alive.
    pub async fn is_ticking(&self) -> bool {
        self.ticker.lock().await.is_running()
    }

    /// Stop background work. Idempotent.
    ///
    /// The event log persists on every append, so there is nothing to flush.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        self.stop_ticker().await?;
        debug!(
            timer_status = %self.timer.status(),
            log_entries = self.event_log.len(),
            "AppContext shutdown complete"
        );
        Ok(())
    }
}
