//! Location list synchronizer
//!
//! Owns the list of locations as observed by the UI and keeps it consistent
//! with the remote service: every successful mutation is followed by a full
//! re-fetch, and a failure never touches the current entries.
//!
//! State is published through a `tokio::sync::watch` channel. Subscribers are
//! woken only when the snapshot actually changes. Overlapping operations are
//! not serialized; whichever completion is applied last wins.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::Location;
use crate::service::LocationService;
use crate::{LocationError, Result};

/// Snapshot of what the UI currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub entries: Vec<Location>,
    /// Message of the last failed operation; cleared on success
    pub last_error: Option<String>,
}

/// Which entry `remove` should delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Position in the current entries
    Index(usize),
    /// Location id
    Id(String),
}

impl From<usize> for RemoveTarget {
    fn from(index: usize) -> Self {
        RemoveTarget::Index(index)
    }
}

impl From<&Location> for RemoveTarget {
    fn from(location: &Location) -> Self {
        RemoveTarget::Id(location.id.clone())
    }
}

impl From<&str> for RemoveTarget {
    fn from(id: &str) -> Self {
        RemoveTarget::Id(id.to_string())
    }
}

pub struct LocationListSynchronizer<S: LocationService> {
    service: Arc<S>,
    state: watch::Sender<ListState>,
}

impl<S: LocationService> LocationListSynchronizer<S> {
    /// Start with an empty list
    pub fn new(service: Arc<S>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self { service, state }
    }

    /// Receiver notified whenever entries or the last error change
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Location> {
        self.state.borrow().entries.clone()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Replace the entries with the server's list.
    pub async fn refresh(&self) -> Result<()> {
        match self.service.fetch_locations().await {
            Ok(locations) => {
                info!("Location list refreshed ({} entries)", locations.len());
                self.state.send_if_modified(|state| {
                    let changed = state.entries != locations || state.last_error.is_some();
                    state.entries = locations;
                    state.last_error = None;
                    changed
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Add a location on the server, then re-fetch the list.
    pub async fn add(&self, location: Location) -> Result<()> {
        debug!(id = %location.id, "Adding location");
        match self.service.add_location(&location).await {
            Ok(()) => self.refresh().await,
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Remove a location on the server, then re-fetch the list.
    ///
    /// A target that does not resolve against the current entries fails
    /// with [`LocationError::CannotRemove`] without contacting the server.
    pub async fn remove(&self, target: impl Into<RemoveTarget>) -> Result<()> {
        let target = target.into();
        let Some(id) = self.resolve(&target) else {
            warn!(?target, "Remove target not found in current entries");
            return Err(self.fail(LocationError::CannotRemove));
        };

        debug!(%id, "Removing location");
        match self.service.remove_location(&id).await {
            Ok(()) => self.refresh().await,
            Err(err) => Err(self.fail(err)),
        }
    }

    fn resolve(&self, target: &RemoveTarget) -> Option<String> {
        let state = self.state.borrow();
        match target {
            RemoveTarget::Index(index) => state.entries.get(*index).map(|l| l.id.clone()),
            RemoveTarget::Id(id) => state
                .entries
                .iter()
                .find(|l| &l.id == id)
                .map(|l| l.id.clone()),
        }
    }

    /// Record the error's user message, leaving entries untouched.
    fn fail(&self, err: LocationError) -> LocationError {
        let message = err.user_message();
        warn!("Location operation failed: {}", message);
        self.state.send_if_modified(|state| {
            if state.last_error.as_deref() == Some(message.as_str()) {
                return false;
            }
            state.last_error = Some(message);
            true
        });
        err
    }
}
