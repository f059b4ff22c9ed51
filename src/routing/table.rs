//! Live feed route table.
//!
//! # Responsibilities
//! - Map request paths to feed payloads
//! - Refuse feed paths that collide with fixed (non-feed) routes
//! - Expose `register` / `replace` / `unregister` as the only mutations
//!
//! # Design Decisions
//! - Dispatch takes a shard read lock only; it never waits on a reload
//! - Mutations are serialized by an internal mutex
//! - Entries are `Arc`s so a request keeps serving the payload it looked up
//!   even if the path is replaced mid-response

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Bytes;
use dashmap::DashMap;

use crate::snapshot::{FeedKind, FeedRoute, RenderedFeed};

/// A registered feed endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub kind: FeedKind,
    pub path: String,
    pub body: Bytes,
    /// Generation of the snapshot the payload came from.
    pub generation: u64,
}

impl RouteEntry {
    pub fn from_feed(feed: &RenderedFeed, generation: u64) -> Self {
        Self {
            kind: feed.kind,
            path: feed.path.clone(),
            body: feed.body.clone(),
            generation,
        }
    }

    pub fn route(&self) -> FeedRoute {
        FeedRoute {
            kind: self.kind,
            path: self.path.clone(),
        }
    }
}

/// The route table refused a mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("path {path} is reserved for {owner}")]
    Reserved { path: String, owner: &'static str },

    #[error("path {path} is already registered for the {existing} feed")]
    Occupied { path: String, existing: FeedKind },

    #[error("path {path} is not registered")]
    NotRegistered { path: String },
}

impl RouteError {
    pub fn path(&self) -> &str {
        match self {
            Self::Reserved { path, .. } | Self::Occupied { path, .. } | Self::NotRegistered { path } => path,
        }
    }
}

#[derive(Debug)]
enum Reservation {
    Exact(String, &'static str),
    Prefix(String, &'static str),
}

impl Reservation {
    fn owner_of(&self, path: &str) -> Option<&'static str> {
        match self {
            Reservation::Exact(reserved, owner) => (reserved == path).then_some(*owner),
            Reservation::Prefix(prefix, owner) => {
                let nested = path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
                nested.then_some(*owner)
            }
        }
    }
}

/// Feed routes, keyed by exact request path.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: DashMap<String, Arc<RouteEntry>>,
    reserved: Vec<Reservation>,
    mutation: Mutex<()>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as owned by a fixed route.
    pub fn reserve(mut self, path: impl Into<String>, owner: &'static str) -> Self {
        self.reserved.push(Reservation::Exact(path.into(), owner));
        self
    }

    /// Mark `prefix` and everything below it as owned by a fixed route tree.
    pub fn reserve_prefix(mut self, prefix: impl Into<String>, owner: &'static str) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        self.reserved.push(Reservation::Prefix(prefix, owner));
        self
    }

    /// Look up the entry serving `path`.
    pub fn dispatch(&self, path: &str) -> Option<Arc<RouteEntry>> {
        self.routes.get(path).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered routes, sorted by path.
    pub fn routes(&self) -> Vec<FeedRoute> {
        let mut routes: Vec<FeedRoute> = self.routes.iter().map(|r| r.value().route()).collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));
        routes
    }

    /// Add a route at a path nobody owns yet.
    pub fn register(&self, entry: RouteEntry) -> Result<(), RouteError> {
        let _guard = self.lock();

        if let Some(owner) = self.reserved.iter().find_map(|r| r.owner_of(&entry.path)) {
            return Err(RouteError::Reserved {
                path: entry.path,
                owner,
            });
        }
        if let Some(existing) = self.routes.get(&entry.path) {
            return Err(RouteError::Occupied {
                path: entry.path,
                existing: existing.kind,
            });
        }

        tracing::debug!(path = %entry.path, kind = %entry.kind, "Feed route registered");
        self.routes.insert(entry.path.clone(), Arc::new(entry));
        Ok(())
    }

    /// Swap the entry at an already registered path in place. The path is
    /// never unregistered in between. Returns the previous entry.
    pub fn replace(&self, entry: RouteEntry) -> Result<Arc<RouteEntry>, RouteError> {
        let _guard = self.lock();

        match self.routes.get_mut(&entry.path) {
            Some(mut slot) => {
                tracing::debug!(path = %entry.path, kind = %entry.kind, "Feed route replaced");
                Ok(std::mem::replace(slot.value_mut(), Arc::new(entry)))
            }
            None => Err(RouteError::NotRegistered { path: entry.path }),
        }
    }

    /// Remove the route at `path`, returning it if it was registered.
    pub fn unregister(&self, path: &str) -> Option<Arc<RouteEntry>> {
        let _guard = self.lock();
        let removed = self.routes.remove(path).map(|(_, entry)| entry);
        if removed.is_some() {
            tracing::debug!(path = %path, "Feed route unregistered");
        }
        removed
    }

    /// Put a previously removed or replaced entry back, bypassing checks.
    pub(crate) fn restore(&self, entry: Arc<RouteEntry>) {
        let _guard = self.lock();
        self.routes.insert(entry.path.clone(), entry);
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
