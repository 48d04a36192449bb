//! Backend resource each view loads when it is shown.

use crate::router::{MatchedRoute, RouteName};

/// API path the view for `route` fetches on entry, if any.
pub fn resource_for(route: &MatchedRoute) -> Option<String> {
    let name = route.name?;

    let path = match name {
        RouteName::Dashboard => "/dashboard-stats".to_string(),
        RouteName::Users => "/users".to_string(),
        RouteName::UserProfile => format!("/users/{}/profile", route.param("id")?),
        RouteName::Companies => "/companies".to_string(),
        RouteName::CompanyProfile => format!("/companies/{}/profile", route.param("id")?),
        RouteName::Calls => "/calls".to_string(),
        RouteName::Followups => "/followups".to_string(),
        RouteName::Orders => "/orders".to_string(),
        RouteName::Products => "/products".to_string(),
        RouteName::Admin => "/admin/app-users".to_string(),
        RouteName::Login | RouteName::NotFound => return None,
    };

    Some(path)
}
