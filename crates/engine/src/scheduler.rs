// VDB - Verification Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Verification scheduling
//!
//! The backend cannot run two verifications at once. Before a new run is
//! started every running one is asked to stop and awaited with a timeout;
//! runs that do not react in time are aborted and the new request refused.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::{
    sync::{watch, Mutex as AsyncMutex},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, error, info, warn};
use vdb_common::types::ProofLog;

use crate::{error::DebugError, session::DebugCoordinator};

/// Cooperative cancellation signal handed to a running verification
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// Whether the verification was asked to stop
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the verification is asked to stop
    pub async fn stopped(&mut self) {
        // a dropped sender means the scheduler is gone, which also ends the run
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// The verifier producing proof logs
pub trait VerificationBackend: Send + Sync + 'static {
    /// Whether the backend accepts verification requests
    fn is_ready(&self) -> bool;

    /// Verify a document. Implementations should return early once `stop`
    /// fires; the scheduler aborts them after the stop timeout otherwise.
    fn verify(
        &self,
        uri: &str,
        manually_triggered: bool,
        stop: StopSignal,
    ) -> impl Future<Output = eyre::Result<ProofLog>> + Send;
}

#[derive(Debug)]
struct Running {
    generation: u64,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs at most one verification at a time and feeds the results to the
/// [`DebugCoordinator`]
#[derive(Debug)]
pub struct VerificationScheduler<B> {
    backend: Arc<B>,
    coordinator: Arc<DebugCoordinator>,
    running: Arc<Mutex<HashMap<String, Running>>>,
    next_generation: AtomicU64,
    // held from stopping the old runs until the new one is registered
    start_lock: AsyncMutex<()>,
}

impl<B: VerificationBackend> VerificationScheduler<B> {
    /// Create a scheduler for `backend`
    pub fn new(backend: Arc<B>, coordinator: Arc<DebugCoordinator>) -> Self {
        Self {
            backend,
            coordinator,
            running: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            start_lock: AsyncMutex::new(()),
        }
    }

    /// The coordinator receiving completed runs
    pub fn coordinator(&self) -> &Arc<DebugCoordinator> {
        &self.coordinator
    }

    /// The verification backend
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Whether a verification of `uri` is in flight
    pub fn is_running(&self, uri: &str) -> bool {
        self.running.lock().get(uri).is_some_and(|running| !running.handle.is_finished())
    }

    /// Start verifying `uri`, stopping every other verification first
    pub async fn request_verification(
        &self,
        uri: &str,
        manually_triggered: bool,
    ) -> Result<(), DebugError> {
        if self.coordinator.task(uri).is_none() {
            return Err(DebugError::UnknownDocument(uri.to_string()));
        }
        if !self.backend.is_ready() {
            if manually_triggered {
                warn!("The verification backend is not ready yet");
            }
            error!(uri, "verification refused, backend not ready");
            return Err(DebugError::BackendUnavailable);
        }
        let _starting = self.start_lock.lock().await;
        if !self.stop_all_running_verifications().await {
            return Err(DebugError::ConcurrentVerificationConflict);
        }

        self.coordinator.verification_started(uri)?;
        info!(uri, manually_triggered, "start or restart verification");

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (stop_tx, stop) = StopSignal::new();
        let backend = Arc::clone(&self.backend);
        let coordinator = Arc::clone(&self.coordinator);
        let running = Arc::clone(&self.running);
        let owned_uri = uri.to_string();

        // hold the lock across the spawn so the task cannot unregister itself first
        let mut guard = self.running.lock();
        let handle = tokio::spawn(async move {
            let uri = owned_uri;
            let result = backend.verify(&uri, manually_triggered, stop.clone()).await;

            {
                let mut running = running.lock();
                if running.get(&uri).is_some_and(|entry| entry.generation == generation) {
                    running.remove(&uri);
                }
            }

            if stop.is_stopped() {
                info!(%uri, "verification stopped, results discarded");
                return;
            }
            match result {
                Ok(log) => {
                    coordinator.on_verification_complete(&uri, log);
                }
                Err(e) => error!(%uri, "verification failed: {e}"),
            }
        });
        guard.insert(uri.to_string(), Running { generation, stop_tx, handle });
        Ok(())
    }

    /// Ask every running verification to stop and wait for them.
    ///
    /// Returns `false` if one of them did not terminate within the stop
    /// timeout; such runs are aborted.
    pub async fn stop_all_running_verifications(&self) -> bool {
        let runs: Vec<_> = self.running.lock().drain().collect();
        let results = join_all(runs.into_iter().map(|(uri, run)| self.stop(uri, run))).await;
        results.into_iter().all(|stopped| stopped)
    }

    /// Stop the verification of one document. Returns `true` if nothing was
    /// running or the run terminated in time.
    pub async fn stop_verification(&self, uri: &str) -> bool {
        let run = self.running.lock().remove(uri);
        match run {
            Some(run) => self.stop(uri.to_string(), run).await,
            None => true,
        }
    }

    /// Wait until the verification of `uri` finishes
    pub async fn wait(&self, uri: &str) -> bool {
        let run = self.running.lock().remove(uri);
        match run {
            Some(run) => run.handle.await.is_ok(),
            None => true,
        }
    }

    async fn stop(&self, uri: String, mut run: Running) -> bool {
        if run.handle.is_finished() {
            return true;
        }
        debug!(%uri, "stopping verification");
        let _ = run.stop_tx.send(true);

        let stop_timeout = self.coordinator.config().stop_timeout();
        match timeout(stop_timeout, &mut run.handle).await {
            Ok(_) => true,
            Err(_) => {
                warn!(%uri, ?stop_timeout, "verification did not stop in time, aborting");
                run.handle.abort();
                false
            }
        }
    }
}
