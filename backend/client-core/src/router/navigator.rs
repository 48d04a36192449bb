//! The single owner of the current location.
//!
//! All navigation, including the redirect that follows a 401, goes through
//! [`Navigator`], which runs the guard and keeps the history stack.

use crate::error::router::RouterError;
use crate::router::guard::{GuardDecision, NavigationGuard};
use crate::router::{LOGIN_PATH, MatchedRoute, RouteTable};
use crate::session::{Session, SessionEvent};

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Guard redirects allowed within one navigation.
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// New history entry.
    Push,
    /// Overwrite the current entry; back cannot return to it.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: MatchedRoute,
    pub mode: NavigationMode,
    /// Location originally asked for, when the guard redirected.
    pub redirected_from: Option<String>,
}

pub struct Navigator {
    table: RouteTable,
    guard: NavigationGuard,
    history: Vec<MatchedRoute>,
    events: broadcast::Receiver<SessionEvent>,
}

impl Navigator {
    pub fn new(table: RouteTable, session: Session) -> Self {
        Self {
            table,
            events: session.subscribe(),
            guard: NavigationGuard::new(session),
            history: Vec::new(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<&MatchedRoute> {
        self.history.last()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn push(&mut self, location: &str) -> Result<Navigation, RouterError> {
        self.navigate(location, NavigationMode::Push)
    }

    pub fn replace(&mut self, location: &str) -> Result<Navigation, RouterError> {
        self.navigate(location, NavigationMode::Replace)
    }

    /// Step back one entry. The guard sees the previous location again.
    pub fn back(&mut self) -> Result<Option<Navigation>, RouterError> {
        if self.history.len() < 2 {
            return Ok(None);
        }

        self.history.pop();
        let previous = match self.history.last() {
            Some(route) => route.full_path.clone(),
            None => return Ok(None),
        };
        self.replace(&previous).map(Some)
    }

    /// React to a session change. On invalidation, leave for `/` unless
    /// already there.
    pub fn on_session_event(
        &mut self,
        event: SessionEvent,
    ) -> Result<Option<Navigation>, RouterError> {
        if event != SessionEvent::Invalidated {
            return Ok(None);
        }

        match self.current() {
            Some(current) if current.path != LOGIN_PATH => {
                info!("Session invalidated on {}, returning to {LOGIN_PATH}", current.path);
                self.replace(LOGIN_PATH).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Handle every session event published since the last call.
    ///
    /// Returns the redirect, if one happened.
    pub fn sync_session(&mut self) -> Result<Option<Navigation>, RouterError> {
        let mut redirected = None;

        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(navigation) = self.on_session_event(event)? {
                        redirected = Some(navigation);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {skipped} session events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        Ok(redirected)
    }

    fn navigate(
        &mut self,
        location: &str,
        mode: NavigationMode,
    ) -> Result<Navigation, RouterError> {
        let mut target = location.to_string();
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            let route = self.table.resolve(&target).ok_or_else(|| RouterError::NoMatch {
                path: target.clone(),
                location: ErrorLocation::from(Location::caller()),
            })?;

            match self.guard.before_each(&route) {
                GuardDecision::Proceed => {
                    self.commit(route.clone(), mode);
                    debug!("Navigated ({mode:?}) to {}", route.full_path);
                    return Ok(Navigation {
                        route,
                        mode,
                        redirected_from,
                    });
                }
                GuardDecision::Redirect(name) => {
                    redirected_from.get_or_insert_with(|| route.full_path.clone());
                    target = self.table.path_for(name, &[])?;
                }
            }
        }

        Err(RouterError::RedirectLoop {
            path: location.to_string(),
            hops: MAX_REDIRECTS,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn commit(&mut self, route: MatchedRoute, mode: NavigationMode) {
        match mode {
            NavigationMode::Replace if !self.history.is_empty() => {
                if let Some(last) = self.history.last_mut() {
                    *last = route;
                }
            }
            _ => self.history.push(route),
        }
    }
}
