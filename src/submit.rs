//! Simulated submission: log the values, wait, report success.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::AppEvent;
use crate::error::Result;
use crate::form::FormValues;

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);
pub const SUCCESS_MESSAGE: &str = "Data submitted successfully!";

#[derive(Clone, Debug)]
pub struct MockSubmitter {
    delay: Duration,
}

impl MockSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Stand-in for a remote write; only fails if the payload cannot be encoded.
    pub async fn submit(&self, values: &FormValues) -> Result<()> {
        let payload = serde_json::to_string(values)?;
        info!(rows = values.users.len(), %payload, "submitted data");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    /// Run [`submit`](Self::submit) in the background and report through the app channel.
    pub fn spawn(
        &self,
        rt: &Handle,
        values: FormValues,
        tx: UnboundedSender<AppEvent>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        rt.spawn(async move {
            let result = this.submit(&values).await;
            if tx.send(AppEvent::SubmitFinished { result }).is_err() {
                debug!("submit result dropped, ui channel closed");
            }
        })
    }
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}
