use std::collections::HashSet;
use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::content::tables::ContentTable;
use crate::errors::AppError;
use crate::realtime::{ChangeEvent, FeedMessage};
use crate::state::AppState;

/// Emitted when a subscriber may have missed changes. Clients re-fetch everything.
pub const RESYNC_EVENT: &str = "resync";

/// Payload of a `resync` event.
#[derive(Debug, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ResyncReason {
    /// The subscriber fell behind the broadcast buffer.
    Lagged { missed: u64 },
    /// The database LISTEN connection dropped.
    Reconnected,
}

#[derive(Debug, Deserialize)]
pub struct ChangesQuery {
    /// Comma-separated table names. Absent means every table.
    pub tables: Option<String>,
}

/// Parses `?tables=a,b`. `None` means no filtering.
pub fn parse_table_filter(raw: Option<&str>) -> Result<Option<HashSet<ContentTable>>, AppError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.parse::<ContentTable>()
                .map_err(|e| AppError::Validation(e.to_string()))
        })
        .collect::<Result<HashSet<_>, _>>()
        .map(Some)
}

pub fn to_sse_event(event: &ChangeEvent) -> Event {
    Event::default()
        .event(event.table.as_str())
        .data(serde_json::to_string(event).unwrap_or_default())
}

pub fn resync_event(reason: &ResyncReason) -> Event {
    Event::default()
        .event(RESYNC_EVENT)
        .data(serde_json::to_string(reason).unwrap_or_default())
}

/// GET /api/v1/changes
///
/// Server-sent events, one per content change, named after the changed table.
pub async fn handle_changes(
    State(state): State<AppState>,
    Query(query): Query<ChangesQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let filter = parse_table_filter(query.tables.as_deref())?;
    let receiver = state.changes.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(move |message| match message {
        Ok(FeedMessage::Change(event)) => {
            let wanted = filter.as_ref().map_or(true, |f| f.contains(&event.table));
            wanted.then(|| Ok(to_sse_event(&event)))
        }
        Ok(FeedMessage::Resync) => Some(Ok(resync_event(&ResyncReason::Reconnected))),
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            debug!(missed, "Change subscriber lagged; asking client to resync");
            Some(Ok(resync_event(&ResyncReason::Lagged { missed })))
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter_when_absent_or_blank() {
        assert!(parse_table_filter(None).unwrap().is_none());
        assert!(parse_table_filter(Some("  ")).unwrap().is_none());
    }

    #[test]
    fn test_filter_parses_list() {
        let filter = parse_table_filter(Some("projects, social_links,"))
            .unwrap()
            .unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.contains(&ContentTable::Projects));
        assert!(filter.contains(&ContentTable::SocialLinks));
    }

    #[test]
    fn test_resync_reason_payloads() {
        assert_eq!(
            serde_json::to_string(&ResyncReason::Lagged { missed: 3 }).unwrap(),
            r#"{"reason":"lagged","missed":3}"#
        );
        assert_eq!(
            serde_json::to_string(&ResyncReason::Reconnected).unwrap(),
            r#"{"reason":"reconnected"}"#
        );
    }

    #[test]
    fn test_filter_rejects_unknown_table() {
        let err = parse_table_filter(Some("projects,passwords")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("passwords")));
    }
}
