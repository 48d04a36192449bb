//! Authentication gate evaluated before every navigation.

use crate::router::{MatchedRoute, RouteName};
use crate::session::Session;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Replace the navigation with one to this route.
    Redirect(RouteName),
}

/// The guard rule on its own: destination metadata and token presence in,
/// decision out.
pub fn evaluate(to: &MatchedRoute, authenticated: bool) -> GuardDecision {
    if to.requires_auth && !authenticated {
        GuardDecision::Redirect(RouteName::Login)
    } else if to.is(RouteName::Login) && authenticated {
        GuardDecision::Redirect(RouteName::Dashboard)
    } else {
        GuardDecision::Proceed
    }
}

#[derive(Clone)]
pub struct NavigationGuard {
    session: Session,
}

impl NavigationGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn before_each(&self, to: &MatchedRoute) -> GuardDecision {
        let decision = evaluate(to, self.session.is_authenticated());
        if let GuardDecision::Redirect(target) = decision {
            debug!("Guard redirects {} to {target}", to.full_path);
        }
        decision
    }
}
