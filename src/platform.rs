//! Platform adapters
//!
//! Each adapter translates one platform's raw webhook payload into
//! the canonical [`Turn`] and the abstract [`SkillResponse`] back
//! into that platform's wire shape. Parsing is lenient: missing
//! fields degrade to empty values and the dialog engine copes, the
//! same way the platforms' own examples tolerate partial envelopes.

mod alice;
mod marusia;
mod sber;

use crate::dialog::intents;
use crate::turn::{DialogState, Entity, Intent, Platform, SkillResponse, Turn};
use serde_json::{Map, Value};

pub fn parse_request(platform: Platform, body: &Value) -> Turn {
    match platform {
        Platform::Alice => alice::parse(body),
        Platform::Marusia => marusia::parse(body),
        Platform::Sber => sber::parse(body),
    }
}

/// Encode the response for the platform that produced the request.
/// `body` is the original request envelope, needed for the derived
/// session echo fields.
pub fn encode_response(platform: Platform, body: &Value, resp: &SkillResponse) -> Value {
    match platform {
        Platform::Alice => alice::encode(body, resp),
        Platform::Marusia => marusia::encode(body, resp),
        Platform::Sber => sber::encode(body, resp),
    }
}

/// First non-empty string wins; all empty means the turn is anonymous.
fn first_non_empty(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(|s| (*s).to_string())
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cursor = value;
    for key in path {
        cursor = cursor.get(key)?;
    }
    cursor.as_str()
}

/// Persisted state lives at `state.session` in all three request
/// envelopes; unknown keys are preserved for the echo.
fn parse_state(body: &Value) -> DialogState {
    body.get("state")
        .and_then(|s| s.get("session"))
        .and_then(|s| serde_json::from_value(s.clone()).ok())
        .unwrap_or_default()
}

fn state_to_value(state: &DialogState) -> Value {
    serde_json::to_value(state).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Yandex-namespaced intent names used by Alice and (by NLU
/// configuration) Sber, mapped to the canonical vocabulary.
fn canonical_intent_name(name: &str) -> &str {
    match name {
        "YANDEX.HELP" => intents::HELP,
        "YANDEX.WHAT_CAN_YOU_DO" => intents::WHAT_CAN_YOU_DO,
        "YANDEX.CONFIRM" => intents::CONFIRM,
        "YANDEX.REJECT" => intents::REJECT,
        other => other,
    }
}

/// Unwrap the `{name: {slots: {slot: {type, value}}}}` intent map.
/// At most one intent arrives in practice; order within the map is
/// not meaningful.
fn parse_nlu_intents(body: &Value) -> Vec<Intent> {
    let Some(map) = body
        .get("request")
        .and_then(|r| r.get("nlu"))
        .and_then(|n| n.get("intents"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    map.iter()
        .map(|(name, payload)| {
            let mut intent = Intent::named(canonical_intent_name(name));
            if let Some(slots) = payload.get("slots").and_then(Value::as_object) {
                for (slot_name, slot) in slots {
                    if let Some(value) = unwrap_slot_value(slot) {
                        intent.slots.insert(slot_name.clone(), value);
                    }
                }
            }
            intent
        })
        .collect()
}

fn unwrap_slot_value(slot: &Value) -> Option<String> {
    match slot.get("value") {
        Some(Value::String(s)) => Some(s.clone()),
        // A datetime-typed slot carries its day in the entities
        // sequence; the slot value is just the marker.
        Some(_) if slot_is_datetime(slot) => Some("YandexDatetime".to_string()),
        _ => None,
    }
}

fn slot_is_datetime(slot: &Value) -> bool {
    slot.get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.contains("DATETIME"))
}

/// Relative-date entities: `{value: {day: 0|1}}`. Anything else in
/// the entity list is ignored.
fn parse_entities(body: &Value) -> Vec<Entity> {
    let Some(list) = body
        .get("request")
        .and_then(|r| r.get("nlu"))
        .and_then(|n| n.get("entities"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    list.iter()
        .filter_map(|e| e.get("value").and_then(|v| v.get("day")).and_then(Value::as_u64))
        .filter(|day| *day <= 1)
        .map(|day| Entity::RelativeDay(u8::try_from(day).unwrap_or(0)))
        .collect()
}

/// The `{text, tts, buttons?, end_session}` block shared by the Alice
/// and Marusia envelopes.
fn response_block(resp: &SkillResponse, with_hide: bool) -> Value {
    let mut block = Map::new();
    block.insert("text".to_string(), Value::String(resp.text.clone()));
    block.insert("tts".to_string(), Value::String(resp.tts.clone()));
    if !resp.buttons.is_empty() {
        let buttons: Vec<Value> = resp
            .buttons
            .iter()
            .map(|b| {
                let mut button = Map::new();
                button.insert("title".to_string(), Value::String(b.title.clone()));
                if let Some(payload) = &b.payload {
                    button.insert("payload".to_string(), Value::String(payload.clone()));
                }
                if let Some(url) = &b.url {
                    button.insert("url".to_string(), Value::String(url.clone()));
                }
                if with_hide {
                    button.insert("hide".to_string(), Value::Bool(b.hide));
                }
                Value::Object(button)
            })
            .collect();
        block.insert("buttons".to_string(), Value::Array(buttons));
    }
    block.insert("end_session".to_string(), Value::Bool(resp.end_session));
    Value::Object(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_non_empty_skips_blank_candidates() {
        assert_eq!(
            first_non_empty(&[Some(""), None, Some("abc")]),
            Some("abc".to_string())
        );
        assert_eq!(first_non_empty(&[Some(""), None]), None);
    }

    #[test]
    fn nlu_intents_are_unwrapped_and_canonicalized() {
        let body = json!({
            "request": {
                "nlu": {
                    "intents": {
                        "YANDEX.CONFIRM": {"slots": {}},
                    }
                }
            }
        });
        let parsed = parse_nlu_intents(&body);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, intents::CONFIRM);
    }

    #[test]
    fn datetime_slot_becomes_the_marker_value() {
        let body = json!({
            "request": {
                "nlu": {
                    "intents": {
                        "schedule_count": {
                            "slots": {
                                "when": {
                                    "type": "YANDEX.DATETIME",
                                    "value": {"day": 1, "day_is_relative": true}
                                }
                            }
                        }
                    }
                }
            }
        });
        let parsed = parse_nlu_intents(&body);
        assert_eq!(
            parsed[0].slots.get("when").map(String::as_str),
            Some("YandexDatetime")
        );
    }

    #[test]
    fn entities_keep_only_relative_days() {
        let body = json!({
            "request": {
                "nlu": {
                    "entities": [
                        {"type": "YANDEX.DATETIME", "value": {"day": 1, "day_is_relative": true}},
                        {"type": "YANDEX.NUMBER", "value": 42},
                        {"type": "YANDEX.DATETIME", "value": {"day": 6}}
                    ]
                }
            }
        });
        assert_eq!(parse_entities(&body), vec![Entity::RelativeDay(1)]);
    }
}
