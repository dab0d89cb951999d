//! Shell slot registry.
//!
//! Slots are named places in the shell layout that remote components render
//! into. The workspace configuration says which components go into which
//! slot; the component definitions themselves come from the published
//! remote-component list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{Initialize, Publisher, StateSlot};
use crate::domain::{RemoteComponent, SlotMapping};

#[derive(Debug)]
pub struct SlotRegistry {
    initialized: AtomicBool,
    mappings: RwLock<HashMap<String, Vec<String>>>,
    remote_components: Arc<StateSlot<Vec<RemoteComponent>>>,
}

impl SlotRegistry {
    pub fn new(remote_components: Arc<StateSlot<Vec<RemoteComponent>>>) -> Self {
        Self {
            initialized: AtomicBool::new(false),
            mappings: RwLock::new(HashMap::new()),
            remote_components,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Names of the slots that have components assigned.
    pub fn slot_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Remote components assigned to `slot`, in mapping order.
    ///
    /// Names without a published component definition are skipped.
    pub fn components_for(&self, slot: &str) -> Vec<RemoteComponent> {
        let names = match self
            .mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slot)
        {
            Some(names) => names.clone(),
            None => return Vec::new(),
        };
        let available = self.remote_components.current().unwrap_or_default();

        names
            .iter()
            .filter_map(|name| {
                let found = available.iter().find(|c| &c.name == name).cloned();
                if found.is_none() {
                    debug!("Slot {}: remote component {} not registered", slot, name);
                }
                found
            })
            .collect()
    }
}

#[async_trait]
impl Initialize for SlotRegistry {
    async fn init(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            warn!("Slot registry already initialized");
            return Ok(());
        }
        info!("Slot registry initialized");
        Ok(())
    }
}

#[async_trait]
impl Publisher<Vec<SlotMapping>> for SlotRegistry {
    async fn publish(&self, mappings: Vec<SlotMapping>) -> Result<()> {
        let mut map = HashMap::with_capacity(mappings.len());
        for mapping in mappings {
            map.entry(mapping.slot_name)
                .or_insert_with(Vec::new)
                .extend(mapping.remote_components);
        }
        debug!("Slot registry received {} slot mapping(s)", map.len());
        *self.mappings.write().unwrap_or_else(PoisonError::into_inner) = map;
        Ok(())
    }
}
