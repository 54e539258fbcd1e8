//! Remote seed loader.
//!
//! Fetches the initial row list once per session from a remote collection
//! endpoint. The fetch runs on the tokio runtime and reports back to the UI
//! thread over the app channel, tagged with the epoch of the session that
//! started it so a late result can be discarded.
//!
use std::fmt::{Display, Formatter};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::AppEvent;
use crate::error::{Context, Result};
use crate::form::UserRecord;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Why the seed could not be loaded.
#[derive(Debug)]
pub enum SeedError {
    Transport(reqwest::Error),
    Status(u16),
    Decode(serde_json::Error),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Transport(e) => write!(f, "request failed: {e}"),
            SeedError::Status(code) => write!(f, "endpoint answered HTTP {code}"),
            SeedError::Decode(e) => write!(f, "malformed payload: {e}"),
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Transport(e) => Some(e),
            SeedError::Status(_) => None,
            SeedError::Decode(e) => Some(e),
        }
    }
}

/// Project a JSON array of user objects onto records. Extra fields are ignored;
/// an element without string `username` and `email` rejects the whole payload.
pub fn parse_seed(body: &[u8]) -> std::result::Result<Vec<UserRecord>, SeedError> {
    serde_json::from_slice::<Vec<UserRecord>>(body).map_err(SeedError::Decode)
}

#[derive(Clone, Debug)]
pub struct SeedClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SeedClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .with_ctx(|| "build http client".to_string())?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self) -> std::result::Result<Vec<UserRecord>, SeedError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(SeedError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SeedError::Status(status.as_u16()));
        }
        let body = resp.bytes().await.map_err(SeedError::Transport)?;
        parse_seed(&body)
    }
}

/// An in-flight seed fetch. Dropping it aborts the task.
#[derive(Debug)]
pub struct SeedTask {
    epoch: u64,
    handle: JoinHandle<()>,
}

impl SeedTask {
    pub fn spawn(
        rt: &Handle,
        client: SeedClient,
        epoch: u64,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        info!(endpoint = client.endpoint(), epoch, "fetching seed rows");
        let handle = rt.spawn(async move {
            let result = client.fetch().await;
            match &result {
                Ok(rows) => info!(rows = rows.len(), "seed rows fetched"),
                Err(e) => warn!(error = %e, "seed fetch failed"),
            }
            if tx.send(AppEvent::SeedLoaded { epoch, result }).is_err() {
                debug!(epoch, "seed result dropped, ui channel closed");
            }
        });
        Self { epoch, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for SeedTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(epoch = self.epoch, "aborting seed fetch");
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seed_drops_extra_fields() {
        let body = br#"[{"username":"bob","email":"bob@y.com","extra":"ignored","id":2}]"#;
        let rows = parse_seed(body).unwrap();
        assert_eq!(rows, vec![UserRecord::new("bob", "bob@y.com")]);
    }

    #[test]
    fn parse_seed_rejects_non_array() {
        let err = parse_seed(br#"{"username":"bob","email":"bob@y.com"}"#).unwrap_err();
        assert!(matches!(err, SeedError::Decode(_)));
        assert!(err.to_string().starts_with("malformed payload"));
    }

    #[test]
    fn parse_seed_rejects_missing_field() {
        assert!(parse_seed(br#"[{"username":"bob"}]"#).is_err());
        assert!(parse_seed(br#"[{"username":"bob","email":7}]"#).is_err());
    }

    #[test]
    fn parse_seed_accepts_empty_array() {
        assert!(parse_seed(b"[]").unwrap().is_empty());
    }

    #[test]
    fn status_error_display() {
        assert_eq!(SeedError::Status(503).to_string(), "endpoint answered HTTP 503");
    }
}
