//! Connection Manager
//!
//! Owns the process-wide link to the store. `ensure_ready` is called at the
//! start of every request; it is cheap when warm, and during a cold start
//! concurrent callers share a single connection attempt.
//!
//! ```text
//! Disconnected --connect--> Connecting --ok--> Connected
//!                           Connecting --err--> Error --(next call)--> Connecting
//! Connected --ping fails--> Disconnected
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::settings::{ConnectionSettings, DATABASE_URL_KEY};
use crate::domain::errors::ConnectionError;
use crate::ports::StoreConnector;

/// Lifecycle state of the store link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Error => write!(f, "error"),
        }
    }
}

type Outcome<H> = Result<H, ConnectionError>;
type OutcomeReceiver<H> = watch::Receiver<Option<Outcome<H>>>;

enum Slot<H> {
    Disconnected,
    /// An attempt is in flight; its outcome is published on the channel
    Connecting(OutcomeReceiver<H>),
    Connected { handle: H, generation: u64 },
    Failed(ConnectionError),
}

struct Shared<H> {
    slot: Slot<H>,
    /// Bumped on every successful connect so a stale ping result can't
    /// evict a newer link
    generation: u64,
}

enum Step<H> {
    Ping(H, u64),
    Wait(OutcomeReceiver<H>),
    Connect,
}

/// Lazily connects to the store and hands out verified handles.
///
/// The handle never leaves the manager except as a clone returned from
/// [`ConnectionManager::ensure_ready`].
pub struct ConnectionManager<C: StoreConnector> {
    connector: Arc<C>,
    settings: ConnectionSettings,
    shared: Arc<Mutex<Shared<C::Handle>>>,
}

impl<C: StoreConnector> ConnectionManager<C> {
    pub fn new(connector: C, settings: ConnectionSettings) -> Self {
        Self {
            connector: Arc::new(connector),
            settings,
            shared: Arc::new(Mutex::new(Shared {
                slot: Slot::Disconnected,
                generation: 0,
            })),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Return a live handle, connecting first if needed.
    ///
    /// - Connected: pings the held handle; on ping failure the link is
    ///   dropped and a fresh attempt is made in the same call.
    /// - Connecting: waits for the in-flight attempt and returns its outcome.
    /// - Disconnected / Error: starts a new attempt.
    ///
    /// A missing connection string fails with `Configuration` on every call
    /// without touching the connector. Nothing is retried internally; the
    /// next call is the retry.
    pub async fn ensure_ready(&self) -> Result<C::Handle, ConnectionError> {
        let Some(url) = self.settings.database_url() else {
            let err = ConnectionError::Configuration(format!("{} is not set", DATABASE_URL_KEY));
            tracing::error!("❌ Store connection unavailable: {}", err);
            self.shared.lock().await.slot = Slot::Failed(err.clone());
            return Err(err);
        };

        loop {
            let mut shared = self.shared.lock().await;
            let step = match &shared.slot {
                Slot::Connected { handle, generation } => Step::Ping(handle.clone(), *generation),
                Slot::Connecting(outcome) => Step::Wait(outcome.clone()),
                Slot::Disconnected | Slot::Failed(_) => Step::Connect,
            };

            let outcome = match step {
                Step::Ping(handle, generation) => {
                    drop(shared);
                    match self.ping(&handle).await {
                        Ok(()) => return Ok(handle),
                        Err(err) => {
                            self.mark_stale(generation, &err).await;
                            continue;
                        }
                    }
                }
                Step::Wait(outcome) => {
                    drop(shared);
                    outcome
                }
                Step::Connect => {
                    let outcome = self.start_attempt(&mut shared, url);
                    drop(shared);
                    outcome
                }
            };

            return self.wait_for(outcome).await;
        }
    }

    /// Current lifecycle state, without touching the store
    pub async fn state(&self) -> ConnectionState {
        match &self.shared.lock().await.slot {
            Slot::Disconnected => ConnectionState::Disconnected,
            Slot::Connecting(_) => ConnectionState::Connecting,
            Slot::Connected { .. } => ConnectionState::Connected,
            Slot::Failed(_) => ConnectionState::Error,
        }
    }

    /// Error from the most recent failed attempt, while in the Error state
    pub async fn last_error(&self) -> Option<ConnectionError> {
        match &self.shared.lock().await.slot {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    async fn ping(&self, handle: &C::Handle) -> Result<(), ConnectionError> {
        let timeout = self.settings.ping_timeout;
        match tokio::time::timeout(timeout, self.connector.ping(handle)).await {
            Ok(result) => result,
            Err(_) => Err(ConnectionError::Timeout(format!(
                "liveness ping exceeded {:?}",
                timeout
            ))),
        }
    }

    async fn mark_stale(&self, generation: u64, err: &ConnectionError) {
        let mut shared = self.shared.lock().await;
        if matches!(shared.slot, Slot::Connected { generation: current, .. } if current == generation)
        {
            shared.slot = Slot::Disconnected;
            tracing::warn!(
                "⚠️  Liveness ping failed ({}), dropping store link: {}",
                err.kind(),
                err
            );
        }
    }

    /// Move to Connecting and run the attempt on its own task, so a caller
    /// that goes away mid-attempt can't leave the other waiters hanging.
    fn start_attempt(
        &self,
        shared: &mut Shared<C::Handle>,
        url: &str,
    ) -> OutcomeReceiver<C::Handle> {
        let (tx, rx) = watch::channel(None);
        shared.slot = Slot::Connecting(rx.clone());
        tracing::info!("🔌 Connecting to store...");

        let connector = Arc::clone(&self.connector);
        let state = Arc::clone(&self.shared);
        let url = url.to_string();
        let timeout = self.settings.connect_timeout;

        tokio::spawn(async move {
            // Inner task turns a panicking connector into an ordinary failure
            let attempt = tokio::spawn(async move { connector.connect(&url).await });
            let abort = attempt.abort_handle();
            let outcome = match tokio::time::timeout(timeout, attempt).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_err)) => Err(ConnectionError::Transport(format!(
                    "connection attempt aborted: {}",
                    join_err
                ))),
                Err(_) => {
                    abort.abort();
                    Err(ConnectionError::Timeout(format!(
                        "no connection within {:?}",
                        timeout
                    )))
                }
            };

            let mut shared = state.lock().await;
            match &outcome {
                Ok(handle) => {
                    shared.generation += 1;
                    let generation = shared.generation;
                    shared.slot = Slot::Connected {
                        handle: handle.clone(),
                        generation,
                    };
                    tracing::info!("✅ Store connected");
                }
                Err(err) => {
                    shared.slot = Slot::Failed(err.clone());
                    tracing::error!("❌ Store connection failed ({}): {}", err.kind(), err);
                }
            }
            drop(shared);

            tx.send_replace(Some(outcome));
        });

        rx
    }

    async fn wait_for(&self, mut outcome: OutcomeReceiver<C::Handle>) -> Outcome<C::Handle> {
        let resolved = outcome
            .wait_for(Option::is_some)
            .await
            .map(|value| (*value).clone());

        if let Ok(Some(result)) = resolved {
            return result;
        }

        // The attempt vanished without publishing; free the slot for the next call
        let err =
            ConnectionError::Transport("connection attempt ended without a result".to_string());
        let mut shared = self.shared.lock().await;
        if matches!(&shared.slot, Slot::Connecting(current) if current.same_channel(&outcome)) {
            shared.slot = Slot::Failed(err.clone());
        }
        tracing::error!("❌ Store connection failed ({}): {}", err.kind(), err);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Connector whose handles are the attempt number
    #[derive(Default)]
    struct FakeConnector {
        attempts: AtomicUsize,
        pings: AtomicUsize,
        connect_delay_ms: AtomicU64,
        ping_delay_ms: AtomicU64,
        failures_left: AtomicUsize,
        panics_left: AtomicUsize,
        ping_broken: AtomicBool,
    }

    impl FakeConnector {
        fn slow(delay_ms: u64) -> Self {
            let connector = Self::default();
            connector.connect_delay_ms.store(delay_ms, Ordering::SeqCst);
            connector
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StoreConnector for FakeConnector {
        type Handle = usize;

        async fn connect(&self, _url: &str) -> Result<usize, ConnectionError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let delay = self.connect_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            let panicking = self
                .panics_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if panicking {
                panic!("connector blew up on attempt {}", attempt);
            }
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(ConnectionError::Transport("connection refused".into()));
            }
            Ok(attempt)
        }

        async fn ping(&self, _handle: &usize) -> Result<(), ConnectionError> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            let delay = self.ping_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.ping_broken.load(Ordering::SeqCst) {
                return Err(ConnectionError::Transport("socket closed".into()));
            }
            Ok(())
        }
    }

    fn settings() -> ConnectionSettings {
        ConnectionSettings::new(Some("fake://store".into()))
    }

    async fn call_concurrently(
        manager: &Arc<ConnectionManager<FakeConnector>>,
        callers: usize,
    ) -> Vec<Result<usize, ConnectionError>> {
        let tasks: Vec<_> = (0..callers)
            .map(|_| {
                let manager = Arc::clone(manager);
                tokio::spawn(async move { manager.ensure_ready().await })
            })
            .collect();

        let mut results = Vec::with_capacity(callers);
        for task in tasks {
            results.push(task.await.unwrap());
        }
        results
    }

    #[tokio::test]
    async fn test_starts_disconnected() {
        let manager = ConnectionManager::new(FakeConnector::default(), settings());
        assert_eq!(manager.state().await, ConnectionState::Disconnected);
        assert_eq!(manager.connector().attempts(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_cold_start_makes_one_attempt() {
        let manager = Arc::new(ConnectionManager::new(FakeConnector::slow(50), settings()));

        let results = call_concurrently(&manager, 16).await;

        assert_eq!(manager.connector().attempts(), 1);
        assert!(results.iter().all(|r| r == &Ok(1)));
        assert_eq!(manager.state().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_concurrent_failure_fans_out_then_next_call_retries() {
        let connector = FakeConnector::slow(50);
        connector.failures_left.store(1, Ordering::SeqCst);
        let manager = Arc::new(ConnectionManager::new(connector, settings()));

        let results = call_concurrently(&manager, 8).await;

        assert_eq!(manager.connector().attempts(), 1);
        let expected = Err(ConnectionError::Transport("connection refused".into()));
        assert!(results.iter().all(|r| r == &expected));
        assert_eq!(manager.state().await, ConnectionState::Error);
        assert_eq!(manager.last_error().await, expected.err());

        // The failure doesn't poison later requests
        assert_eq!(manager.ensure_ready().await, Ok(2));
        assert_eq!(manager.state().await, ConnectionState::Connected);
        assert_eq!(manager.last_error().await, None);
    }

    #[tokio::test]
    async fn test_warm_call_pings_and_reuses_handle() {
        let manager = ConnectionManager::new(FakeConnector::default(), settings());

        assert_eq!(manager.ensure_ready().await, Ok(1));
        // A fresh link isn't pinged
        assert_eq!(manager.connector().pings.load(Ordering::SeqCst), 0);

        assert_eq!(manager.ensure_ready().await, Ok(1));
        assert_eq!(manager.ensure_ready().await, Ok(1));
        assert_eq!(manager.connector().attempts(), 1);
        assert_eq!(manager.connector().pings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ping_failure_forces_fresh_attempt() {
        let manager = ConnectionManager::new(FakeConnector::default(), settings());
        assert_eq!(manager.ensure_ready().await, Ok(1));

        manager.connector().ping_broken.store(true, Ordering::SeqCst);

        assert_eq!(manager.ensure_ready().await, Ok(2));
        assert_eq!(manager.connector().attempts(), 2);
    }

    #[tokio::test]
    async fn test_ping_timeout_forces_fresh_attempt() {
        let manager = ConnectionManager::new(
            FakeConnector::default(),
            settings().with_ping_timeout(Duration::from_millis(20)),
        );
        assert_eq!(manager.ensure_ready().await, Ok(1));

        manager.connector().ping_delay_ms.store(500, Ordering::SeqCst);

        assert_eq!(manager.ensure_ready().await, Ok(2));
    }

    #[tokio::test]
    async fn test_missing_url_is_configuration_error_without_attempts() {
        let manager =
            ConnectionManager::new(FakeConnector::default(), ConnectionSettings::new(None));

        for _ in 0..3 {
            let err = manager.ensure_ready().await.unwrap_err();
            assert!(matches!(err, ConnectionError::Configuration(_)));
            assert!(!err.is_retryable());
        }
        assert_eq!(manager.connector().attempts(), 0);
        assert_eq!(manager.state().await, ConnectionState::Error);
    }

    #[tokio::test]
    async fn test_connect_timeout() {
        let manager = ConnectionManager::new(
            FakeConnector::slow(500),
            settings().with_connect_timeout(Duration::from_millis(20)),
        );

        let err = manager.ensure_ready().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Timeout(_)));
        assert_eq!(manager.state().await, ConnectionState::Error);
    }

    #[tokio::test]
    async fn test_abandoned_caller_does_not_strand_waiters() {
        let manager = Arc::new(ConnectionManager::new(FakeConnector::slow(50), settings()));

        let first = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.ensure_ready().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        first.abort();

        assert_eq!(manager.ensure_ready().await, Ok(1));
        assert_eq!(manager.connector().attempts(), 1);
    }

    #[tokio::test]
    async fn test_panicking_connect_does_not_wedge_the_manager() {
        let connector = FakeConnector::default();
        connector.panics_left.store(1, Ordering::SeqCst);
        let manager = ConnectionManager::new(connector, settings());

        let err = manager.ensure_ready().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Transport(_)));
        assert_eq!(manager.state().await, ConnectionState::Error);

        assert_eq!(manager.ensure_ready().await, Ok(2));
        assert_eq!(manager.connector().attempts(), 2);
        assert_eq!(manager.state().await, ConnectionState::Connected);
    }
}
