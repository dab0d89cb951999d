use std::fmt::Debug;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use super::Publisher;

/// Replace-on-publish reactive state holder.
///
/// Subscribers always see the latest published value; intermediate values
/// may be skipped.
#[derive(Debug)]
pub struct StateSlot<T> {
    name: &'static str,
    tx: watch::Sender<Option<T>>,
}

impl<T> StateSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Latest published value, if any.
    pub fn current(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }

    /// Wait for the first published value.
    #[allow(dead_code)]
    pub async fn first(&self) -> Option<T> {
        let mut rx = self.subscribe();
        let value = rx.wait_for(Option::is_some).await.ok()?;
        value.clone()
    }
}

#[async_trait]
impl<T> Publisher<T> for StateSlot<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    async fn publish(&self, value: T) -> Result<()> {
        debug!("Publishing {}", self.name);
        self.tx.send_replace(Some(value));
        Ok(())
    }
}
