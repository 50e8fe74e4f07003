use std::sync::{Arc, Mutex};

use tracing::info;

use crate::app::error::{AcquisitionError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::pipeline::Pipeline;
use crate::scheduler::{Scheduler, SchedulerHandle, Timer, TokioTimer};
use crate::store::SharedStore;

/// Everything a component needs, constructed once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: SharedStore,
    pub pipeline: Pipeline,
    timer: Arc<dyn Timer + Send + Sync>,
    poller: Mutex<Option<SchedulerHandle>>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.transport).map_err(AcquisitionError::from)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_parts(config, fetcher, Arc::new(TokioTimer))
    }

    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        timer: Arc<dyn Timer + Send + Sync>,
    ) -> Self {
        Self {
            config,
            store: SharedStore::new(),
            pipeline: Pipeline::new(fetcher),
            timer,
            poller: Mutex::new(None),
        }
    }

    /// Start background polling unless it is already running.
    ///
    /// Returns true if this call started it.
    pub fn ensure_polling(&self) -> bool {
        let mut poller = self.poller.lock().unwrap_or_else(|e| e.into_inner());
        if poller.is_some() {
            return false;
        }

        info!("Starting background polling");
        let scheduler = Scheduler::with_timer(
            self.store.clone(),
            self.pipeline.clone(),
            self.config.poll_interval(),
            self.timer.clone(),
        );
        *poller = Some(scheduler.start());
        true
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(SchedulerHandle::is_running)
    }

    pub fn stop_polling(&self) {
        if let Some(handle) = self.poller.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.stop();
        }
    }
}
