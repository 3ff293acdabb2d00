use crate::core::PlayerId;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Client -> Server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundEvent {
    /// 新規ゲームの作成要求
    Init,
    Join { join: String },
    Watch { watch: String },
    Play { column: i64 },
}

impl OutboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::Init => "init",
            OutboundEvent::Join { .. } => "join",
            OutboundEvent::Watch { .. } => "watch",
            OutboundEvent::Play { .. } => "play",
        }
    }

    pub fn encode(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Server -> Client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundEvent {
    Init {
        join: String,
        watch: String,
    },
    Play {
        player: PlayerId,
        column: i64,
        row: i64,
    },
    Win {
        player: PlayerId,
    },
    Error {
        message: String,
    },
}

impl InboundEvent {
    pub const TAGS: [&'static str; 4] = ["init", "play", "win", "error"];

    /// Decodes one text frame.
    ///
    /// The tag is checked before the payload so an unrecognised `type`
    /// surfaces as [`ClientError::UnknownEvent`] rather than a generic
    /// serde error.
    pub fn decode(raw: &str) -> Result<Self, ClientError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(ClientError::MissingType)?;

        if !Self::TAGS.contains(&tag) {
            return Err(ClientError::UnknownEvent(tag.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_events_use_wire_field_names() {
        let cases = [
            (OutboundEvent::Init, json!({"type": "init"})),
            (
                OutboundEvent::Join { join: "abc".into() },
                json!({"type": "join", "join": "abc"}),
            ),
            (
                OutboundEvent::Watch { watch: "xyz".into() },
                json!({"type": "watch", "watch": "xyz"}),
            ),
            (
                OutboundEvent::Play { column: 3 },
                json!({"type": "play", "column": 3}),
            ),
        ];

        for (event, expected) in cases {
            let encoded: serde_json::Value =
                serde_json::from_str(&event.encode().unwrap()).unwrap();
            assert_eq!(encoded, expected, "{}", event.kind());
        }
    }

    #[test]
    fn decode_play() {
        let event =
            InboundEvent::decode(r#"{"type":"play","player":"A","column":2,"row":0}"#).unwrap();
        assert_eq!(
            event,
            InboundEvent::Play {
                player: "A".into(),
                column: 2,
                row: 0
            }
        );
    }

    #[test]
    fn decode_ignores_extra_fields() {
        let event =
            InboundEvent::decode(r#"{"type":"win","player":"red","moves":12}"#).unwrap();
        assert_eq!(event, InboundEvent::Win { player: "red".into() });
    }

    #[test]
    fn unknown_tag_is_reported_by_name() {
        let err = InboundEvent::decode(r#"{"type":"bogus"}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnknownEvent(ref tag) if tag == "bogus"));
    }

    #[test]
    fn missing_or_non_string_tag() {
        assert!(matches!(
            InboundEvent::decode(r#"{"player":"red"}"#),
            Err(ClientError::MissingType)
        ));
        assert!(matches!(
            InboundEvent::decode(r#"{"type":7}"#),
            Err(ClientError::MissingType)
        ));
    }

    #[test]
    fn known_tag_with_bad_payload_is_a_decode_error() {
        assert!(matches!(
            InboundEvent::decode(r#"{"type":"play","player":"red"}"#),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            InboundEvent::decode("not json"),
            Err(ClientError::Decode(_))
        ));
    }
}
