//! InMemoryStore - Vec-backed vehicle store for testing and development.
//!
//! Implements both [`StoreConnector`] and [`VehicleRepository`], so it can sit
//! behind a [`crate::ConnectionManager`] exactly like a real database. Links
//! can be made to fail or silently die to exercise the connection lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    ConnectionError, DomainError, ListQuery, NewVehicle, SortOrder, VehiclePatch, VehicleRecord,
};
use crate::ports::{StoreConnector, VehicleRepository};

/// Handle to an in-memory link. Only the most recent session is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySession {
    pub id: usize,
}

#[derive(Default)]
struct Inner {
    records: RwLock<Vec<VehicleRecord>>,
    connect_attempts: AtomicUsize,
    live_session: AtomicUsize,
    failing_connects: AtomicUsize,
}

/// In-memory vehicle store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows directly, bypassing connection checks
    pub fn with_records(records: Vec<VehicleRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut stored) = store.inner.records.write() {
            stored.extend(records);
        }
        store
    }

    /// Number of `connect` calls so far
    pub fn connect_attempts(&self) -> usize {
        self.inner.connect_attempts.load(Ordering::SeqCst)
    }

    /// Make the next `count` connects fail with a transport error
    pub fn fail_next_connects(&self, count: usize) {
        self.inner.failing_connects.store(count, Ordering::SeqCst);
    }

    /// Kill every open session, as a dropped network link would
    pub fn drop_sessions(&self) {
        self.inner.live_session.store(0, Ordering::SeqCst);
    }

    fn check_session(&self, session: &MemorySession) -> Result<(), ConnectionError> {
        if session.id != 0 && session.id == self.inner.live_session.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ConnectionError::Transport(format!(
                "session {} is closed",
                session.id
            )))
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<VehicleRecord>>, DomainError> {
        self.inner
            .records
            .read()
            .map_err(|_| DomainError::Repository("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<VehicleRecord>>, DomainError> {
        self.inner
            .records
            .write()
            .map_err(|_| DomainError::Repository("lock poisoned".into()))
    }
}

#[async_trait]
impl StoreConnector for InMemoryStore {
    type Handle = MemorySession;

    async fn connect(&self, _url: &str) -> Result<MemorySession, ConnectionError> {
        let id = self.inner.connect_attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let failing = self
            .inner
            .failing_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ConnectionError::Transport("connection refused".into()));
        }

        self.inner.live_session.store(id, Ordering::SeqCst);
        Ok(MemorySession { id })
    }

    async fn ping(&self, session: &MemorySession) -> Result<(), ConnectionError> {
        self.check_session(session)
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    type Handle = MemorySession;

    async fn find(
        &self,
        session: &MemorySession,
        query: &ListQuery,
    ) -> Result<Vec<VehicleRecord>, DomainError> {
        self.check_session(session)?;
        let records = self.read()?;

        // Newest insert first, so equal timestamps still come out newest first
        let mut rows: Vec<VehicleRecord> = records
            .iter()
            .rev()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();

        match query.order {
            SortOrder::CreatedAtDesc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        Ok(rows)
    }

    async fn find_by_id(
        &self,
        session: &MemorySession,
        id: Uuid,
    ) -> Result<Option<VehicleRecord>, DomainError> {
        self.check_session(session)?;
        let records = self.read()?;
        Ok(records.iter().find(|r| r.record_id == id).cloned())
    }

    async fn insert(
        &self,
        session: &MemorySession,
        vehicle: &NewVehicle,
    ) -> Result<VehicleRecord, DomainError> {
        self.check_session(session)?;
        let record = VehicleRecord::from_new(Uuid::new_v4(), vehicle.clone(), Utc::now());
        self.write()?.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        session: &MemorySession,
        id: Uuid,
        patch: &VehiclePatch,
    ) -> Result<Option<VehicleRecord>, DomainError> {
        self.check_session(session)?;
        let mut records = self.write()?;
        Ok(records.iter_mut().find(|r| r.record_id == id).map(|record| {
            record.apply(patch, Utc::now());
            record.clone()
        }))
    }

    async fn distinct_makes(&self, session: &MemorySession) -> Result<Vec<String>, DomainError> {
        self.check_session(session)?;
        Ok(self.read()?.iter().map(|r| r.make.clone()).collect())
    }

    async fn distinct_years(&self, session: &MemorySession) -> Result<Vec<i32>, DomainError> {
        self.check_session(session)?;
        Ok(self.read()?.iter().map(|r| r.year).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_list_query, ListFilters};
    use crate::{ConnectionManager, ConnectionSettings};

    fn manager(store: &InMemoryStore) -> ConnectionManager<InMemoryStore> {
        ConnectionManager::new(
            store.clone(),
            ConnectionSettings::new(Some("memory://autolot".into())),
        )
    }

    async fn seeded(store: &InMemoryStore, session: &MemorySession, rows: &[(&str, &str, i32)]) {
        for (title, make, year) in rows {
            store
                .insert(session, &NewVehicle::new(*title, *make, "Model", *year, 1000.0))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_make_filter_scenario() {
        let store = InMemoryStore::new();
        let session = store.connect("memory://").await.unwrap();
        seeded(
            &store,
            &session,
            &[
                ("2020 Toyota Camry", "Toyota", 2020),
                ("2020 Toyota RAV4", "TOYOTA", 2020),
                ("2019 Honda Civic", "Honda", 2019),
            ],
        )
        .await;

        let query = build_list_query(&ListFilters {
            make: Some("toyota".into()),
            ..ListFilters::default()
        });
        let rows = store.find(&session, &query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.make.eq_ignore_ascii_case("toyota")));
    }

    #[tokio::test]
    async fn test_no_filters_returns_everything_newest_first() {
        let store = InMemoryStore::new();
        let session = store.connect("memory://").await.unwrap();
        seeded(
            &store,
            &session,
            &[("first", "A", 2001), ("second", "B", 2002), ("third", "C", 2003)],
        )
        .await;

        let rows = store.find(&session, &ListQuery::default()).await.unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp_and_reports_missing() {
        let store = InMemoryStore::new();
        let session = store.connect("memory://").await.unwrap();
        let created = store
            .insert(&session, &NewVehicle::new("t", "m", "x", 2020, 1.0))
            .await
            .unwrap();

        let updated = store
            .update(&session, created.record_id, &VehiclePatch::sold(true))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.sold);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        let missing = store
            .update(&session, Uuid::new_v4(), &VehiclePatch::sold(true))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_dropped_sessions_reject_queries_until_reconnect() {
        let store = InMemoryStore::new();
        let manager = manager(&store);

        let session = manager.ensure_ready().await.unwrap();
        store.drop_sessions();
        assert!(store.find(&session, &ListQuery::default()).await.is_err());

        let fresh = manager.ensure_ready().await.unwrap();
        assert_ne!(fresh, session);
        assert_eq!(store.connect_attempts(), 2);
        assert!(store.find(&fresh, &ListQuery::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_connect_is_retried_by_next_call() {
        let store = InMemoryStore::new();
        store.fail_next_connects(1);
        let manager = manager(&store);

        assert!(manager.ensure_ready().await.is_err());
        assert!(manager.ensure_ready().await.is_ok());
        assert_eq!(store.connect_attempts(), 2);
    }
}
