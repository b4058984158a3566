pub mod access;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use std::sync::Arc;

use access::RouteTable;
use services::{BackendApi, SessionCache, SessionService};

/// Shared application state: the route map, the request-scoped session
/// store, and the process-wide hydrated session cache.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub sessions: SessionService,
    pub cache: SessionCache,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            routes: Arc::new(RouteTable::console()),
            sessions: SessionService::new(backend),
            cache: SessionCache::new(),
        }
    }
}
