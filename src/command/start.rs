use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::api::{ApiClient, AuthenticatedClient};
use crate::auth::{AuthProvider, AuthSessionStore};
use crate::config::ShellConfig;
use crate::domain::{RemoteComponent, Route, Theme, UserProfile, WorkspaceIdentity};
use crate::initializers::{startup_tasks, Fetchers};
use crate::startup::{ReadinessGate, StartupReport, StartupSequencer, TaskState};
use crate::state::{AppState, ConfigurationService};

/// Everything the shell published during startup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShellSnapshot {
    report: StartupReport,
    workspace: Option<WorkspaceIdentity>,
    routes: Vec<Route>,
    theme: Option<Theme>,
    css_variables: BTreeMap<String, String>,
    slots: BTreeMap<String, Vec<RemoteComponent>>,
    user_profile: Option<UserProfile>,
    configuration: BTreeMap<String, String>,
    /// Whether each state holder received its startup data
    services: BTreeMap<&'static str, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<ResolvedPath>,
}

/// Route lookup requested with `--resolve`.
#[derive(Debug, Serialize)]
struct ResolvedPath {
    path: String,
    route: Option<Route>,
}

impl ShellSnapshot {
    fn capture(state: &AppState, report: StartupReport, resolve: Option<String>) -> Self {
        let slots = state
            .slots
            .slot_names()
            .into_iter()
            .map(|name| {
                let components = state.slots.components_for(&name);
                (name, components)
            })
            .collect();
        let services = BTreeMap::from([
            ("routes", state.routes.is_initialized()),
            ("slotRegistry", state.slots.is_initialized()),
            ("configuration", state.configuration.is_initialized()),
        ]);
        let resolved = resolve.map(|path| ResolvedPath {
            route: state.routes.resolve(&path),
            path,
        });

        Self {
            report,
            workspace: state.current_workspace.current(),
            routes: state.routes.routes(),
            theme: state.theme.current(),
            css_variables: state.theme.css_variables(),
            slots,
            user_profile: state.user_profile.current(),
            configuration: state.configuration.all(),
            services,
            resolved,
        }
    }
}

pub async fn run_start(
    config_dir: &Path,
    application_path: Option<String>,
    bff_url: Option<String>,
    json: bool,
    resolve: Option<String>,
) -> Result<()> {
    let config = ShellConfig::load(config_dir)?.with_overrides(bff_url, application_path);
    config.validate()?;

    let session_store = AuthSessionStore::new(config_dir);
    let (state, report) = boot(config_dir, &config, session_store).await?;
    let snapshot = ShellSnapshot::capture(&state, report, resolve);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize shell state")?
        );
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

/// Wire collaborators, run the startup sequence and return the populated state.
async fn boot(
    config_dir: &Path,
    config: &ShellConfig,
    session_store: AuthSessionStore,
) -> Result<(AppState, StartupReport)> {
    info!(
        "🚀 Starting portal shell for {} via {}",
        config.application_path, config.bff_url
    );

    let state = AppState::new(ConfigurationService::new(
        Some(config.env_file_path(config_dir)),
        config.configuration_defaults(),
    ));
    let auth = Arc::new(AuthProvider::new(session_store));
    let client = AuthenticatedClient::new(ApiClient::new(None)?, config.bff_url.clone(), auth.clone());

    let (resolver, auth_gate) = ReadinessGate::new("auth");
    let mut sequencer = StartupSequencer::new().with_timeout(config.startup_timeout());
    sequencer.register(startup_tasks(
        &state,
        Fetchers::from_client(client),
        &auth_gate,
        config.retry_policy(),
        &config.application_path,
    ))?;
    let board = sequencer.status_board();

    let ((), outcome) = tokio::join!(auth.initialize(resolver), sequencer.run());
    if outcome.is_err() {
        for status in board.snapshot() {
            error!(
                "   [{}] {} ({} attempt(s))",
                status.state, status.id, status.attempts
            );
        }
    }
    let report = outcome.context("Portal shell failed to start")?;
    Ok((state, report))
}

fn print_summary(snapshot: &ShellSnapshot) {
    println!("✅ Portal shell ready in {} ms", snapshot.report.elapsed_ms);
    if let Some(workspace) = &snapshot.workspace {
        println!(
            "   Workspace: {} ({})",
            workspace.workspace_name, workspace.base_url
        );
    }
    println!("   Routes: {}", snapshot.routes.len());
    for route in &snapshot.routes {
        println!("     {} -> {} {}", route.base_url, route.app_id, route.exposed_module);
    }
    if let Some(theme) = &snapshot.theme {
        println!(
            "   Theme: {} ({} CSS variables)",
            theme.name.as_deref().unwrap_or("<unnamed>"),
            snapshot.css_variables.len()
        );
    }
    for (slot, components) in &snapshot.slots {
        let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        println!("   Slot {}: {}", slot, names.join(", "));
    }
    if let Some(profile) = &snapshot.user_profile {
        let name = profile
            .person
            .preferred_name()
            .unwrap_or_else(|| profile.user_id.clone());
        println!("   User: {}", name);
    }
    for (service, ready) in &snapshot.services {
        println!("   {}: {}", service, if *ready { "ready" } else { "not ready" });
    }
    for task in &snapshot.report.tasks {
        let marker = if task.state == TaskState::Done { "✅" } else { "❌" };
        println!(
            "   {} {} [{}] ({} attempt(s))",
            marker, task.id, task.state, task.attempts
        );
    }
    let degraded: Vec<&str> = snapshot.report.degraded().map(|t| t.id.as_str()).collect();
    if !degraded.is_empty() {
        println!("⚠️  Degraded: {}", degraded.join(", "));
    }
    if let Some(resolved) = &snapshot.resolved {
        match &resolved.route {
            Some(route) => println!(
                "   {} is served by {} ({} {})",
                resolved.path, route.app_id, route.remote_entry_url, route.exposed_module
            ),
            None => println!("   No route serves {}", resolved.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::startup::StartupError;
    use crate::state::DEFAULT_LANG_KEY;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_bff(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/shell-bff/workspaceConfig"))
            .and(body_json(serde_json::json!({"url": "/admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "workspace": {"name": "admin", "baseUrl": "/admin"},
                "routes": [{
                    "url": "http://portal/admin/help",
                    "baseUrl": "/admin/help",
                    "remoteEntryUrl": "http://remote/help/remoteEntry.js",
                    "appId": "help-ui",
                    "productName": "help",
                    "exposedModule": "./Help"
                }],
                "theme": {"name": "light", "properties": r##"{"general": {"primary-color": "#fff"}}"##},
                "remoteComponents": [],
                "shellRemoteComponents": []
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/shell-bff/userProfile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "userProfile": {"userId": "u-1", "person": {"displayName": "Ada"}}
            })))
            .mount(server)
            .await;
    }

    fn config_for(server: &MockServer) -> ShellConfig {
        ShellConfig {
            bff_url: format!("{}/shell-bff/", server.uri()),
            application_path: "/admin".to_string(),
            retry_max_attempts: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_boot_populates_state() {
        let server = MockServer::start().await;
        mount_bff(&server).await;
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("env.json"), r#"{"DEFAULT_LANG": "de"}"#).unwrap();

        let store = AuthSessionStore::with_env_token(tmp.path(), Some("abc".to_string()));
        let (state, report) = boot(tmp.path(), &config_for(&server), store).await.unwrap();

        assert!(report.tasks.iter().all(|t| t.state == TaskState::Done));
        assert_eq!(state.current_workspace.current().unwrap().workspace_name, "admin");
        assert_eq!(state.routes.resolve("/admin/help/faq").unwrap().app_id, "help-ui");
        assert_eq!(state.configuration.get(DEFAULT_LANG_KEY).as_deref(), Some("de"));

        let snapshot = ShellSnapshot::capture(&state, report, None);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["userProfile"]["userId"], "u-1");
        assert_eq!(json["cssVariables"]["--primary-color"], "#fff");
        assert_eq!(json["services"]["routes"], true);
        assert_eq!(json["services"]["slotRegistry"], true);
        assert_eq!(json["services"]["configuration"], true);
        assert!(json.get("resolved").is_none());
        assert_eq!(snapshot.report.degraded().count(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_resolves_requested_path() {
        let server = MockServer::start().await;
        mount_bff(&server).await;
        let tmp = TempDir::new().unwrap();

        let store = AuthSessionStore::with_env_token(tmp.path(), Some("abc".to_string()));
        let (state, report) = boot(tmp.path(), &config_for(&server), store).await.unwrap();

        let snapshot = ShellSnapshot::capture(&state, report, Some("/admin/help/faq".to_string()));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["resolved"]["path"], "/admin/help/faq");
        assert_eq!(json["resolved"]["route"]["appId"], "help-ui");

        let missing = ShellSnapshot::capture(&state, snapshot.report, Some("/other".to_string()));
        let resolved = missing.resolved.unwrap();
        assert_eq!(resolved.path, "/other");
        assert!(resolved.route.is_none());
    }

    #[tokio::test]
    async fn test_boot_without_credentials_fails() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();

        let store = AuthSessionStore::with_env_token(tmp.path(), None);
        let err = boot(tmp.path(), &config_for(&server), store).await.unwrap_err();

        let startup = err
            .downcast_ref::<StartupError>()
            .expect("startup error in chain");
        assert!(matches!(startup, StartupError::GateRejected { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
