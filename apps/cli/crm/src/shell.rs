//! Command-line view layer over the client core.
//!
//! [`CrmShell`] plays the part of the page: it navigates, loads the backend
//! resource for whatever route the guard lands on, and follows the login
//! redirect when a request ends the session.

use crate::error::CrmError;

use client_core::router::LOGIN_PATH;
use client_core::router::navigator::Navigation;
use client_core::router::views::resource_for;
use client_core::{CrmClient, Navigator, RouteTable};
use models::{TokenResponse, UserAuthInfo};

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

/// What one navigation rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShellView {
    pub path: String,
    pub route: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Why the view ended up somewhere other than requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ShellView {
    fn from_navigation(navigation: &Navigation) -> Self {
        Self {
            path: navigation.route.full_path.clone(),
            route: navigation.route.name.map(|name| name.as_str()),
            redirected_from: navigation.redirected_from.clone(),
            data: None,
            notice: None,
        }
    }
}

pub struct CrmShell {
    client: CrmClient,
    navigator: Navigator,
}

impl CrmShell {
    pub fn new(client: CrmClient) -> Self {
        let navigator = Navigator::new(RouteTable::default(), client.session().clone());
        Self { client, navigator }
    }

    pub fn client(&self) -> &CrmClient {
        &self.client
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Navigate to `path` and load the resource behind the resulting view.
    ///
    /// A 401 while loading ends on the login view instead of failing; every
    /// other request error is returned.
    pub async fn open(&mut self, path: &str) -> Result<ShellView, CrmError> {
        let navigation = self.navigator.push(path)?;
        let mut view = ShellView::from_navigation(&navigation);

        let Some(resource) = resource_for(&navigation.route) else {
            return Ok(view);
        };

        match self.client.get::<Value>(&resource).await {
            Ok(data) => {
                view.data = Some(data);
                Ok(view)
            }
            Err(e) => match self.navigator.sync_session()? {
                Some(redirect) => {
                    warn!(
                        "Session ended while loading {resource}, showing {}",
                        redirect.route.full_path
                    );
                    let mut login = ShellView::from_navigation(&redirect);
                    login.redirected_from = Some(view.path);
                    login.notice = Some(e.to_string());
                    Ok(login)
                }
                None => Err(e.into()),
            },
        }
    }

    /// Log in, then land wherever the guard sends an authenticated user.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(TokenResponse, ShellView), CrmError> {
        let token = self.client.login(username, password).await?;
        self.navigator.sync_session()?;

        let view = self.open(LOGIN_PATH).await?;
        info!("Signed in, showing {}", view.path);
        Ok((token, view))
    }

    /// Log out and return to the login view. The local session ends even if
    /// the server call fails; that failure is still returned.
    pub async fn logout(&mut self) -> Result<ShellView, CrmError> {
        let outcome = self.client.logout().await;
        self.navigator.sync_session()?;
        outcome?;

        let navigation = self.navigator.replace(LOGIN_PATH)?;
        Ok(ShellView::from_navigation(&navigation))
    }

    pub async fn whoami(&mut self) -> Result<UserAuthInfo, CrmError> {
        let outcome = self.client.me().await;
        self.navigator.sync_session()?;
        Ok(outcome?)
    }
}
