//! Store Connector Port
//!
//! How a link to the persisted store is opened and checked.

use async_trait::async_trait;

use crate::domain::errors::ConnectionError;

/// Opens and pings links to the persisted store.
///
/// The handle is whatever the adapter needs to run queries (a pool, a
/// client). It is owned by the connection manager and handed out as clones.
#[async_trait]
pub trait StoreConnector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    /// Establish a new link using `url`
    async fn connect(&self, url: &str) -> Result<Self::Handle, ConnectionError>;

    /// Lightweight round-trip proving `handle` still works
    async fn ping(&self, handle: &Self::Handle) -> Result<(), ConnectionError>;
}
