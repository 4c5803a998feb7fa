//! Feed message classification.
//!
//! The realtime feed multiplexes subscription acknowledgements, informational
//! notices, request errors and table data on one socket. [`FeedMessage::parse`]
//! sorts a raw frame into one of those.

use crate::error::Result;
use crate::orderbook::Operation;
use serde_json::Value;

/// One decoded feed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Acknowledgement of a subscription topic.
    Subscribed(String),
    /// Informational notice (e.g., the welcome banner).
    Info(String),
    /// Error reported by the feed for a request.
    Error(String),
    /// Table data.
    Table(Operation),
    /// Anything else (heartbeats, unsubscribe acks, ...).
    Other(Value),
}

impl FeedMessage {
    /// Parses and classifies a raw frame.
    ///
    /// A frame is table data only when it carries `table`, `action` and `data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the frame is not valid JSON. Rows of `data`
    /// that do not decode are kept on the operation as rejected rows.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;

        if let Some(topic) = value.get("subscribe") {
            return Ok(Self::Subscribed(text_of(topic)));
        }
        if let Some(info) = value.get("info") {
            return Ok(Self::Info(text_of(info)));
        }
        if let Some(error) = value.get("error") {
            return Ok(Self::Error(text_of(error)));
        }

        let is_table = ["table", "action", "data"]
            .iter()
            .all(|key| value.get(key).is_some_and(|v| !v.is_null()));
        if is_table {
            return Ok(Self::Table(serde_json::from_value(value)?));
        }

        Ok(Self::Other(value))
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_subscription_ack() {
        let msg = FeedMessage::parse(
            r#"{"success":true,"subscribe":"orderBookL2_25:XBTUSD","request":{"op":"subscribe","args":["orderBookL2_25:XBTUSD"]}}"#,
        )
        .unwrap();
        assert_eq!(msg, FeedMessage::Subscribed("orderBookL2_25:XBTUSD".into()));
    }

    #[test]
    fn test_info_and_error() {
        let info = FeedMessage::parse(r#"{"info":"Welcome to the BitMEX Realtime API.","version":"2.0"}"#)
            .unwrap();
        assert!(matches!(info, FeedMessage::Info(ref s) if s.starts_with("Welcome")));

        let error = FeedMessage::parse(r#"{"status":400,"error":"Unknown table: foo"}"#).unwrap();
        assert_eq!(error, FeedMessage::Error("Unknown table: foo".into()));
    }

    #[test]
    fn test_table_frame() {
        let msg = FeedMessage::parse(
            r#"{"table":"orderBookL2_25","action":"update","keys":["symbol","id","side"],"data":[{"symbol":"XBTUSD","id":1,"side":"Buy","size":80}]}"#,
        )
        .unwrap();

        let FeedMessage::Table(op) = msg else {
            panic!("expected table frame");
        };
        assert_eq!(op.action, "update");
        assert_eq!(op.rows().unwrap()[0].fragment().unwrap().size, Some(Some(80)));
    }

    #[test]
    fn test_incomplete_table_frame_is_other() {
        let msg = FeedMessage::parse(r#"{"table":"orderBookL2_25","action":"update"}"#).unwrap();
        assert!(matches!(msg, FeedMessage::Other(_)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(FeedMessage::parse("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_table_frame_with_unreadable_rows() {
        let msg = FeedMessage::parse(
            r#"{"table":"orderBookL2","action":"insert","data":[1,{"symbol":"XBTUSD","id":2,"side":"Sell","size":3,"price":10}]}"#,
        )
        .unwrap();

        let FeedMessage::Table(op) = msg else {
            panic!("expected table frame");
        };
        let rows = op.rows().unwrap();
        assert!(rows[0].is_rejected());
        assert_eq!(rows[1].fragment().unwrap().id, Some(2));
    }
}
