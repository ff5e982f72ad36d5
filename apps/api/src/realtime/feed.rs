//! Change feed: PostgreSQL LISTEN/NOTIFY fanned out over a tokio broadcast channel.
//!
//! Each content table has a row trigger that calls `pg_notify` on [`CHANNEL`]
//! with `{"table", "op", "id"}`. One listener task per process forwards those
//! payloads to every subscriber. Events emitted while the LISTEN connection is
//! down are lost, so every drop is logged and published as
//! [`FeedMessage::Resync`]. A connection that cannot be re-established is
//! retried with capped exponential backoff.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::content::tables::ContentTable;

pub const CHANNEL: &str = "portfolio_changes";

const FEED_CAPACITY: usize = 256;
const MIN_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ContentTable,
    pub op: ChangeOp,
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// What subscribers receive. `Resync` means changes may have been missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    Change(ChangeEvent),
    Resync,
}

/// Parses a trigger payload. Notifications for tables outside the content set fail.
pub fn parse_payload(payload: &str) -> Result<ChangeEvent, serde_json::Error> {
    serde_json::from_str(payload)
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<FeedMessage>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.tx.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(FeedMessage::Change(event)).unwrap_or(0)
    }

    pub fn publish_resync(&self) -> usize {
        self.tx.send(FeedMessage::Resync).unwrap_or(0)
    }

    /// Spawns the LISTEN task. It runs for the lifetime of the process.
    pub fn spawn_listener(&self, database_url: String) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            let mut backoff = MIN_BACKOFF;
            let mut reconnecting = false;
            loop {
                let started = Instant::now();
                if let Err(e) = feed.listen(&database_url, reconnecting).await {
                    warn!("Change listener stopped: {e:#}; reconnecting in {backoff:?}");
                }
                reconnecting = true;
                if started.elapsed() > MAX_BACKOFF {
                    backoff = MIN_BACKOFF;
                }
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
            }
        })
    }

    /// Runs until the connection fails in a way sqlx cannot recover from.
    ///
    /// `try_recv` yields `None` when the connection drops; the next call
    /// reconnects and re-issues LISTEN, so each drop is a resync point.
    async fn listen(&self, database_url: &str, reconnecting: bool) -> Result<()> {
        let mut listener = PgListener::connect(database_url)
            .await
            .context("failed to open LISTEN connection")?;
        listener
            .listen(CHANNEL)
            .await
            .context("failed to LISTEN on change channel")?;
        info!("Listening for content changes on '{CHANNEL}'");
        if reconnecting {
            self.publish_resync();
        }

        loop {
            let Some(notification) = listener
                .try_recv()
                .await
                .context("LISTEN connection failed")?
            else {
                let receivers = self.publish_resync();
                warn!(receivers, "Change listener connection dropped; asking subscribers to resync");
                continue;
            };
            match parse_payload(notification.payload()) {
                Ok(event) => {
                    let receivers = self.publish(event.clone());
                    debug!(table = %event.table, op = ?event.op, receivers, "Content changed");
                }
                Err(e) => warn!(
                    "Ignoring malformed change payload {:?}: {e}",
                    notification.payload()
                ),
            }
        }
    }
}

pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}
