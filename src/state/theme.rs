use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::Publisher;
use crate::domain::Theme;

/// Holds the applied theme and derives CSS custom properties from it.
#[derive(Debug, Default)]
pub struct ThemeEngine {
    applied: RwLock<Option<Theme>>,
}

impl ThemeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Theme> {
        self.applied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// CSS variables for the applied theme, `--<key>` → value.
    ///
    /// Keys are unique across groups; if two groups define the same key the
    /// group that sorts last wins.
    pub fn css_variables(&self) -> BTreeMap<String, String> {
        self.current()
            .map(|theme| css_variables(&theme))
            .unwrap_or_default()
    }
}

pub fn css_variables(theme: &Theme) -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();
    for (group_name, group) in &theme.properties {
        let Some(group) = group.as_object() else {
            debug!("Theme group {} is not an object, skipped", group_name);
            continue;
        };
        for (key, value) in group {
            let Some(value) = css_value(value) else {
                continue;
            };
            if let Some(previous) = variables.insert(format!("--{}", key), value) {
                debug!(
                    "Theme key {} in group {} replaces earlier value {}",
                    key, group_name, previous
                );
            }
        }
    }
    variables
}

/// Scalar leaves become CSS values; empty strings, nulls and nested values
/// are dropped.
fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
impl Publisher<Theme> for ThemeEngine {
    async fn publish(&self, theme: Theme) -> Result<()> {
        let variables = css_variables(&theme).len();
        info!(
            "🎨 Applying theme {} ({} CSS variables)",
            theme.name.as_deref().unwrap_or("<unnamed>"),
            variables
        );
        *self.applied.write().unwrap_or_else(PoisonError::into_inner) = Some(theme);
        Ok(())
    }
}
