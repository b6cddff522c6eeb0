//! Sber Salut adapter
//!
//! The SmartApp envelope: caller identity under `uuid` (a subject
//! claim plus a user id), the utterance under `payload.message`, NLU
//! shaped like Alice's (the skill's Sber NLU is configured with the
//! same intent names). The response echoes `sessionId`, `messageId`
//! and the whole `uuid` block.

use super::{
    first_non_empty, parse_entities, parse_nlu_intents, parse_state, response_block,
    state_to_value, str_at,
};
use crate::turn::{Platform, SkillResponse, Turn};
use serde_json::{json, Value};

pub(super) fn parse(body: &Value) -> Turn {
    let caller_id = first_non_empty(&[
        str_at(body, &["uuid", "sub"]),
        str_at(body, &["uuid", "userId"]),
    ]);

    Turn {
        platform: Platform::Sber,
        caller_id,
        command: str_at(body, &["request", "command"])
            .unwrap_or_default()
            .to_lowercase(),
        original_text: str_at(body, &["payload", "message", "original_text"])
            .unwrap_or_default()
            .to_string(),
        intents: parse_nlu_intents(body),
        entities: parse_entities(body),
        is_session_new: body
            .get("payload")
            .and_then(|p| p.get("new_session"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        state: parse_state(body),
    }
}

pub(super) fn encode(body: &Value, resp: &SkillResponse) -> Value {
    json!({
        "messageName": "ANSWER_TO_USER",
        "sessionId": body.get("sessionId").cloned().unwrap_or(Value::Null),
        "messageId": body.get("messageId").cloned().unwrap_or(Value::Null),
        "uuid": body.get("uuid").cloned().unwrap_or(Value::Null),
        // Sber buttons have no hide flag.
        "response": response_block(resp, false),
        "session_state": state_to_value(&resp.state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::intents;
    use crate::turn::{Button, DialogState};
    use serde_json::json;

    fn request() -> Value {
        json!({
            "messageId": 11,
            "sessionId": "sber-sess",
            "uuid": {"sub": "sber-sub", "userId": "sber-user"},
            "payload": {
                "new_session": true,
                "message": {"original_text": "Расписание на понедельник"}
            },
            "request": {
                "command": "расписание на понедельник",
                "nlu": {
                    "intents": {
                        "schedule_list": {
                            "slots": {"when": {"type": "WEEKDAY", "value": "Monday"}}
                        }
                    },
                    "entities": []
                }
            },
            "state": {"session": {"scene": "schedule"}}
        })
    }

    #[test]
    fn parses_canonical_turn() {
        let turn = parse(&request());
        assert_eq!(turn.platform, Platform::Sber);
        assert_eq!(turn.caller_id.as_deref(), Some("sber-sub"));
        assert_eq!(turn.original_text, "Расписание на понедельник");
        assert!(turn.is_session_new);
        assert_eq!(turn.intents[0].name, intents::SCHEDULE_LIST);
        assert_eq!(
            turn.intents[0].slots.get("when").map(String::as_str),
            Some("Monday")
        );
        assert_eq!(turn.state.scene.as_deref(), Some("schedule"));
    }

    #[test]
    fn subject_claim_falls_back_to_user_id() {
        let mut body = request();
        body["uuid"]["sub"] = json!("");
        let turn = parse(&body);
        assert_eq!(turn.caller_id.as_deref(), Some("sber-user"));
    }

    #[test]
    fn encode_echoes_identity_fields() {
        let body = request();
        let resp = SkillResponse::new(
            "Пар нет! Отдыхайте!",
            DialogState {
                scene: Some("schedule".to_string()),
                group: None,
                extra: serde_json::Map::new(),
            },
        )
        .with_buttons(vec![Button::suggestion("Помощь")]);

        let wire = encode(&body, &resp);
        assert_eq!(wire["messageName"], "ANSWER_TO_USER");
        assert_eq!(wire["sessionId"], "sber-sess");
        assert_eq!(wire["messageId"], 11);
        assert_eq!(wire["uuid"]["sub"], "sber-sub");
        assert_eq!(wire["response"]["buttons"][0]["title"], "Помощь");
        assert!(wire["response"]["buttons"][0].get("hide").is_none());
        assert_eq!(wire["session_state"]["scene"], "schedule");
    }
}
