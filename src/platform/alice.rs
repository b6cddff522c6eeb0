//! Yandex Alice adapter
//!
//! Request envelope: `{meta, session, request: {command,
//! original_utterance, nlu: {intents, entities}}, state, version}`.
//! Response: `{response, version, session_state}` with the persisted
//! state under `session_state`.

use super::{
    first_non_empty, parse_entities, parse_nlu_intents, parse_state, response_block,
    state_to_value, str_at,
};
use crate::turn::{Platform, SkillResponse, Turn};
use serde_json::{json, Value};

pub(super) fn parse(body: &Value) -> Turn {
    let caller_id = first_non_empty(&[
        str_at(body, &["session", "user", "user_id"]),
        str_at(body, &["session", "application", "application_id"]),
    ]);

    Turn {
        platform: Platform::Alice,
        caller_id,
        command: str_at(body, &["request", "command"])
            .unwrap_or_default()
            .to_lowercase(),
        original_text: str_at(body, &["request", "original_utterance"])
            .unwrap_or_default()
            .to_string(),
        intents: parse_nlu_intents(body),
        entities: parse_entities(body),
        is_session_new: body
            .get("session")
            .and_then(|s| s.get("new"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        state: parse_state(body),
    }
}

pub(super) fn encode(body: &Value, resp: &SkillResponse) -> Value {
    json!({
        "response": response_block(resp, true),
        "version": str_at(body, &["version"]).unwrap_or("1.0"),
        "session_state": state_to_value(&resp.state),
    })
}
