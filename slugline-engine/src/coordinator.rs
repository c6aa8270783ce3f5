//! Async coordination
//!
//! Every dispatcher job runs on tokio's blocking pool while holding a
//! semaphore permit, so an async caller never blocks a scheduler thread and
//! at most `max_in_flight` jobs run at once. A job that has started always
//! runs to completion; cancelling only discards its result.

use crate::{
    assembler::ResultAssembler,
    dispatcher::BatchDispatcher,
    error::{EngineError, Result},
    executor::ExecutionMode,
};
use slugline_core::{collect_texts, ConfigError, SlugConfig, SlugInput};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};

/// Default number of concurrent dispatcher jobs
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Counting gate on concurrent dispatcher jobs
///
/// Clones share their permits, so every coordinator built over one gate is
/// held to one limit.
#[derive(Debug, Clone)]
pub struct InFlightGate {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl InFlightGate {
    /// Create a gate admitting `limit` jobs at once
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    /// Maximum number of jobs admitted at once
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Jobs currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.limit - self.permits.available_permits()
    }

    async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| EngineError::Cancelled)
    }
}

impl Default for InFlightGate {
    fn default() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT)),
            limit: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Bounded async front end for a [`BatchDispatcher`]
#[derive(Debug, Clone)]
pub struct AsyncCoordinator {
    dispatcher: Arc<BatchDispatcher>,
    gate: InFlightGate,
    max_in_flight: usize,
}

impl AsyncCoordinator {
    /// Create a coordinator allowing `max_in_flight` concurrent jobs
    pub fn new(dispatcher: BatchDispatcher, max_in_flight: usize) -> Result<Self> {
        Self::from_shared(Arc::new(dispatcher), max_in_flight)
    }

    /// Create a coordinator over a dispatcher that is shared elsewhere
    pub fn from_shared(dispatcher: Arc<BatchDispatcher>, max_in_flight: usize) -> Result<Self> {
        Ok(Self::with_gate(dispatcher, InFlightGate::new(max_in_flight)?))
    }

    /// Create a coordinator whose jobs count against an existing gate
    pub fn with_gate(dispatcher: Arc<BatchDispatcher>, gate: InFlightGate) -> Self {
        Self {
            dispatcher,
            max_in_flight: gate.limit(),
            gate,
        }
    }

    /// Cap the jobs a single batch keeps outstanding
    ///
    /// The cap applies per call, on top of the gate's limit.
    pub fn limit_batch(mut self, max_in_flight: usize) -> Result<Self> {
        if max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency.into());
        }
        self.max_in_flight = max_in_flight.min(self.gate.limit());
        Ok(self)
    }

    /// The underlying dispatcher
    pub fn dispatcher(&self) -> &Arc<BatchDispatcher> {
        &self.dispatcher
    }

    /// The gate this coordinator's jobs count against
    pub fn gate(&self) -> &InFlightGate {
        &self.gate
    }

    /// Concurrency limit for one batch
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Jobs currently holding a permit, across every user of the gate
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Slugify one text off the scheduler thread
    pub async fn slugify(&self, text: &str, config: &Arc<SlugConfig>) -> Result<String> {
        let permit = self.gate.acquire().await?;

        let dispatcher = self.dispatcher.clone();
        let config = config.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            dispatcher.slugify_one(&text, &config)
        })
        .await
        .map_err(join_failure)
    }

    /// Slugify a batch, preserving input order
    ///
    /// Serial and thread batches are split into `chunk_size` segments, each
    /// its own job. A process batch is a single job, since the dispatcher
    /// already spreads it over worker processes.
    pub async fn batch_slugify(
        &self,
        texts: &[&str],
        config: &Arc<SlugConfig>,
    ) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let segment_size = match self.dispatcher.mode() {
            ExecutionMode::Process => texts.len(),
            _ => self.dispatcher.config().chunk_size,
        };

        let mut assembler = ResultAssembler::new(texts.len());
        let mut jobs = JoinSet::new();
        for (i, segment) in texts.chunks(segment_size).enumerate() {
            if jobs.len() >= self.max_in_flight {
                if let Some(joined) = jobs.join_next().await {
                    place_joined(&mut assembler, joined)?;
                }
            }
            let permit = self.gate.acquire().await?;

            let start = i * segment_size;
            let owned: Vec<String> = segment.iter().map(|s| s.to_string()).collect();
            let dispatcher = self.dispatcher.clone();
            let config = config.clone();

            jobs.spawn_blocking(move || {
                let _permit = permit;
                let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
                (start, dispatcher.dispatch(&refs, &config))
            });
        }

        while let Some(joined) = jobs.join_next().await {
            place_joined(&mut assembler, joined)?;
        }
        assembler.finish()
    }

    /// Validate every item, then slugify the batch
    pub async fn batch_slugify_inputs<T: SlugInput>(
        &self,
        items: &[T],
        config: &Arc<SlugConfig>,
    ) -> Result<Vec<String>> {
        let texts = collect_texts(items)?;
        self.batch_slugify(&texts, config).await
    }

    /// Slugify a batch unless `signal` resolves first
    ///
    /// On cancellation, queued jobs are dropped and running ones finish in
    /// the background with their results discarded.
    pub async fn batch_slugify_until<F>(
        &self,
        texts: &[&str],
        config: &Arc<SlugConfig>,
        signal: F,
    ) -> Result<Vec<String>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.batch_slugify(texts, config) => result,
            () = signal => {
                log::debug!("batch of {} items cancelled", texts.len());
                Err(EngineError::Cancelled)
            }
        }
    }
}

type Joined = std::result::Result<(usize, Result<Vec<String>>), JoinError>;

fn place_joined(assembler: &mut ResultAssembler, joined: Joined) -> Result<()> {
    let (start, slugs) = joined.map_err(join_failure)?;
    assembler.place(start, slugs?)
}

fn join_failure(err: JoinError) -> EngineError {
    if err.is_cancelled() {
        EngineError::Cancelled
    } else {
        EngineError::WorkerFailed(format!("slug job panicked: {err}"))
    }
}
