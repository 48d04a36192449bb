//! Declarative route table for the CRM views.
//!
//! The table is a tree of [`RouteRecord`]s compiled into flat patterns.
//! Meta markers are inherited from parent records, so everything under the
//! `/app` layout requires authentication without repeating the flag.

pub mod guard;
pub mod navigator;
pub mod views;

pub use guard::{GuardDecision, NavigationGuard};
pub use navigator::{Navigation, NavigationMode, Navigator};

use crate::error::router::RouterError;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

pub const LOGIN_PATH: &str = "/";
pub const APP_LAYOUT_PATH: &str = "/app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    Dashboard,
    Users,
    UserProfile,
    Companies,
    CompanyProfile,
    Calls,
    Followups,
    Orders,
    Products,
    Admin,
    NotFound,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Login => "login",
            RouteName::Dashboard => "dashboard",
            RouteName::Users => "users",
            RouteName::UserProfile => "user-profile",
            RouteName::Companies => "companies",
            RouteName::CompanyProfile => "company-profile",
            RouteName::Calls => "calls",
            RouteName::Followups => "followups",
            RouteName::Orders => "orders",
            RouteName::Products => "products",
            RouteName::Admin => "admin",
            RouteName::NotFound => "not-found",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
}

/// One node of the route tree. Child paths are relative to the parent.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<RouteName>,
    pub meta: RouteMeta,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &'static str, name: RouteName) -> Self {
        Self {
            path,
            name: Some(name),
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    /// An unnamed record that only groups children (a layout).
    pub fn layout(path: &'static str) -> Self {
        Self {
            path,
            name: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    name: Option<RouteName>,
    template: String,
    segments: Vec<Segment>,
    requires_auth: bool,
}

/// The result of resolving a location against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    pub name: Option<RouteName>,
    /// Path without query or fragment, always starting with `/`.
    pub path: String,
    /// Path as requested, query and fragment included.
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub requires_auth: bool,
}

impl MatchedRoute {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is(&self, name: RouteName) -> bool {
        self.name == Some(name)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        let mut routes = Vec::new();
        for record in &records {
            compile(record, "", false, &mut routes);
        }
        Self { routes }
    }

    /// Match `location` against the table in declaration order.
    pub fn resolve(&self, location: &str) -> Option<MatchedRoute> {
        let path = normalize_path(location);
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.routes.iter().find_map(|route| {
            match_segments(&route.segments, &parts).map(|params| MatchedRoute {
                name: route.name,
                path: path.clone(),
                full_path: location.to_string(),
                params,
                requires_auth: route.requires_auth,
            })
        })
    }

    /// Concrete path for a named route.
    #[track_caller]
    pub fn path_for(&self, name: RouteName, params: &[(&str, &str)]) -> Result<String, RouterError> {
        let route = self
            .routes
            .iter()
            .find(|route| route.name == Some(name))
            .ok_or_else(|| RouterError::UnknownRoute {
                name: name.as_str(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut path = String::new();
        for segment in &route.segments {
            path.push('/');
            match segment {
                Segment::Static(value) => path.push_str(value),
                Segment::Param(key) => {
                    let value = params
                        .iter()
                        .find(|(k, _)| *k == key.as_str())
                        .map(|(_, v)| *v)
                        .ok_or_else(|| RouterError::MissingParam {
                            name: name.as_str(),
                            param: key.clone(),
                            location: ErrorLocation::from(Location::caller()),
                        })?;
                    path.push_str(value);
                }
                Segment::CatchAll => {}
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Route templates in match order, e.g. `/app/users/:id`.
    pub fn templates(&self) -> impl Iterator<Item = (&str, Option<RouteName>, bool)> {
        self.routes
            .iter()
            .map(|route| (route.template.as_str(), route.name, route.requires_auth))
    }
}

impl Default for RouteTable {
    /// The CRM application's routes.
    fn default() -> Self {
        Self::new(vec![
            RouteRecord::new(LOGIN_PATH, RouteName::Login),
            RouteRecord::layout(APP_LAYOUT_PATH)
                .requires_auth()
                .with_children(vec![
                    RouteRecord::new("dashboard", RouteName::Dashboard),
                    RouteRecord::new("users", RouteName::Users),
                    RouteRecord::new("users/:id", RouteName::UserProfile),
                    RouteRecord::new("companies", RouteName::Companies),
                    RouteRecord::new("companies/:id", RouteName::CompanyProfile),
                    RouteRecord::new("calls", RouteName::Calls),
                    RouteRecord::new("followups", RouteName::Followups),
                    RouteRecord::new("orders", RouteName::Orders),
                    RouteRecord::new("products", RouteName::Products),
                    RouteRecord::new("admin", RouteName::Admin),
                ]),
            RouteRecord::new("*", RouteName::NotFound),
        ])
    }
}

fn compile(record: &RouteRecord, parent: &str, inherited_auth: bool, out: &mut Vec<CompiledRoute>) {
    let template = if record.path.starts_with('/') || record.path == "*" {
        record.path.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), record.path)
    };
    let requires_auth = inherited_auth || record.meta.requires_auth;

    let segments = template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s == "*" {
                Segment::CatchAll
            } else if let Some(param) = s.strip_prefix(':') {
                Segment::Param(param.to_string())
            } else {
                Segment::Static(s.to_string())
            }
        })
        .collect();

    out.push(CompiledRoute {
        name: record.name,
        template: template.clone(),
        segments,
        requires_auth,
    });

    for child in &record.children {
        compile(child, &template, requires_auth, out);
    }
}

fn normalize_path(location: &str) -> String {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();

    for (index, segment) in segments.iter().enumerate() {
        match segment {
            Segment::CatchAll => {
                params.insert("pathMatch".to_string(), parts[index.min(parts.len())..].join("/"));
                return Some(params);
            }
            Segment::Static(expected) => {
                if parts.get(index) != Some(&expected.as_str()) {
                    return None;
                }
            }
            Segment::Param(key) => {
                let value = parts.get(index)?;
                params.insert(key.clone(), (*value).to_string());
            }
        }
    }

    (segments.len() == parts.len()).then_some(params)
}
