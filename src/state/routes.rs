//! Route table built from the workspace's route list.

use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use super::Publisher;
use crate::domain::{PathMatch, Route};

/// Routes of the current workspace, matched by longest base URL first.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: RwLock<Option<Vec<Route>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether routes have been published yet.
    pub fn is_initialized(&self) -> bool {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Routes in match order.
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    /// Find the route serving `path`.
    ///
    /// A route with `pathMatch: full` only matches its exact base URL;
    /// otherwise the base URL is a segment-aligned prefix.
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let guard = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let routes = guard.as_ref()?;
        let path = normalize(path);
        routes
            .iter()
            .find(|route| matches_path(route, &path))
            .cloned()
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn matches_path(route: &Route, path: &str) -> bool {
    let base = normalize(&route.base_url);
    match route.path_match {
        Some(PathMatch::Full) => path == base,
        _ => {
            base == "/"
                || path == base
                || path
                    .strip_prefix(base.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        }
    }
}

#[async_trait]
impl Publisher<Vec<Route>> for RouteTable {
    async fn publish(&self, mut routes: Vec<Route>) -> Result<()> {
        // Longest base URL first so nested applications win over their parents
        routes.sort_by(|a, b| {
            normalize(&b.base_url)
                .len()
                .cmp(&normalize(&a.base_url).len())
        });
        for route in &routes {
            debug!(
                "Route {} -> {} ({})",
                route.base_url, route.remote_entry_url, route.app_id
            );
        }
        info!("Initialized route table with {} route(s)", routes.len());
        *self.routes.write().unwrap_or_else(PoisonError::into_inner) = Some(routes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn route(base_url: &str, app_id: &str) -> Route {
        Route {
            url: format!("http://localhost{}", base_url),
            base_url: base_url.to_string(),
            remote_entry_url: format!("http://remote/{}/remoteEntry.js", app_id),
            app_id: app_id.to_string(),
            product_name: "product".to_string(),
            technology: Some("Angular".to_string()),
            exposed_module: "./Module".to_string(),
            path_match: None,
            remote_name: None,
            element_name: None,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let table = RouteTable::new();
        assert!(!table.is_initialized());
        assert!(table.resolve("/admin").is_none());

        table
            .publish(vec![
                route("/admin", "admin-ui"),
                route("/admin/users", "user-ui"),
                route("/", "home-ui"),
            ])
            .await
            .unwrap();

        assert!(table.is_initialized());
        assert_eq!(table.resolve("/admin/users/42").unwrap().app_id, "user-ui");
        assert_eq!(table.resolve("/admin/settings").unwrap().app_id, "admin-ui");
        assert_eq!(table.resolve("/administration").unwrap().app_id, "home-ui");
        assert_eq!(table.routes()[0].app_id, "user-ui");
    }

    #[tokio::test]
    async fn test_full_path_match() {
        let table = RouteTable::new();
        let mut exact = route("/help", "help-ui");
        exact.path_match = Some(PathMatch::Full);
        table.publish(vec![exact]).await.unwrap();

        assert!(table.resolve("/help/").is_some());
        assert!(table.resolve("help").is_some());
        assert!(table.resolve("/help/topics").is_none());
    }
}
