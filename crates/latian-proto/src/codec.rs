//! JSON text codec for wire records.

use crate::{Directive, InboundMessage, ProtocolError};

/// Encode a directive as one JSON text message.
pub fn encode_directive(directive: &Directive) -> Result<String, ProtocolError> {
    serde_json::to_string(directive).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decode a directive. Used by peers and tests.
pub fn decode_directive(text: &str) -> Result<Directive, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Encode an inbound answer. Used by peers and tests.
pub fn encode_inbound(message: &InboundMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decode an inbound answer.
pub fn decode_inbound(text: &str) -> Result<InboundMessage, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{EventRecord, ExerciseKind, InputPrompt};

    fn encoded(directive: &Directive) -> Value {
        serde_json::from_str(&encode_directive(directive).unwrap()).unwrap()
    }

    #[test]
    fn message_is_tagged_record() {
        assert_eq!(
            encoded(&Directive::Message("hello".into())),
            json!({"type": "message", "data": "hello"})
        );
    }

    #[test]
    fn unwrite_carries_count() {
        assert_eq!(
            encoded(&Directive::UnwriteMessages(3)),
            json!({"type": "unwrite_messages", "data": 3})
        );
    }

    #[test]
    fn input_carries_prompt_fields() {
        let directive = Directive::Input(InputPrompt {
            message: Some("pick mode".into()),
            signal_only: false,
            options: Some(vec!["rep".into(), "timed".into()]),
        });

        assert_eq!(
            encoded(&directive),
            json!({
                "type": "input",
                "data": {"message": "pick mode", "signal_only": false, "options": ["rep", "timed"]}
            })
        );
    }

    #[test]
    fn event_uses_type_field_for_kind() {
        let directive = Directive::Event(EventRecord {
            prefix: Some("+".into()),
            kind: ExerciseKind::Timed,
            exercise: "plank".into(),
            value: 42,
        });

        assert_eq!(
            encoded(&directive),
            json!({
                "type": "event",
                "data": {"prefix": "+", "type": "timed", "exercise": "plank", "value": 42}
            })
        );
    }

    #[test]
    fn unit_directives_have_only_type() {
        assert_eq!(encoded(&Directive::InputOk), json!({"type": "input_ok"}));
        assert_eq!(encoded(&Directive::InputInvalid), json!({"type": "input_invalid"}));
        assert_eq!(encoded(&Directive::UnwriteTimer), json!({"type": "unwrite_timer"}));
    }

    #[test]
    fn kind_matches_encoded_type() {
        let directives = [
            Directive::Message(String::new()),
            Directive::UnwriteMessages(1),
            Directive::Input(InputPrompt::default()),
            Directive::InputOk,
            Directive::InputInvalid,
            Directive::Timer(5),
            Directive::UnwriteTimer,
        ];

        for directive in directives {
            assert_eq!(encoded(&directive)["type"], directive.kind());
        }
    }

    #[test]
    fn inbound_decodes_input_field() {
        let message = decode_inbound(r#"{"input": "timed"}"#).unwrap();
        assert_eq!(message.input, "timed");
    }

    #[test]
    fn inbound_rejects_missing_input() {
        let err = decode_inbound(r#"{"value": "timed"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn inbound_rejects_non_json() {
        assert!(decode_inbound("timed").is_err());
    }
}
