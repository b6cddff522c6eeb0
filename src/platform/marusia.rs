//! VK Marusia adapter
//!
//! Marusia's webhook carries no NLU intent map, so this adapter
//! derives canonical intents from the command text with the fixed
//! phrase lists the skill is registered with. The response must echo
//! `session_id`/`user_id`/`message_id` and the request version.

use super::{first_non_empty, parse_state, response_block, state_to_value, str_at};
use crate::dialog::intents;
use crate::turn::{Entity, Intent, Platform, SkillResponse, Turn};
use serde_json::{json, Value};

const CONFIRM_PHRASES: [&str; 4] = ["да", "согласен", "верно", "правильно"];
const REJECT_PHRASES: [&str; 4] = ["нет", "не согласен", "неверно", "неправильно"];
const UPDATE_PHRASES: [&str; 3] = ["изменить группу", "сменить группу", "поменять группу"];

pub(super) fn parse(body: &Value) -> Turn {
    let caller_id = first_non_empty(&[
        str_at(body, &["session", "user_id"]),
        str_at(body, &["session", "application", "application_id"]),
    ]);

    let command = str_at(body, &["request", "command"])
        .unwrap_or_default()
        .to_lowercase();
    let (intents, entities) = derive_intents(&command);

    Turn {
        platform: Platform::Marusia,
        caller_id,
        original_text: str_at(body, &["request", "original_utterance"])
            .unwrap_or_default()
            .to_string(),
        command,
        intents,
        entities,
        is_session_new: body
            .get("session")
            .and_then(|s| s.get("new"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        state: parse_state(body),
    }
}

/// Phrase matching stands in for the NLU the other platforms run
/// upstream. One intent per utterance, first matching rule wins.
fn derive_intents(command: &str) -> (Vec<Intent>, Vec<Entity>) {
    let command = command.trim();
    if command.is_empty() {
        return (Vec::new(), Vec::new());
    }

    if command.contains("помощь") || command.contains("что ты умеешь") {
        return (vec![Intent::named(intents::HELP)], Vec::new());
    }
    if command == "выход" {
        return (vec![Intent::named(intents::EXIT)], Vec::new());
    }
    if CONFIRM_PHRASES.contains(&command) {
        return (vec![Intent::named(intents::CONFIRM)], Vec::new());
    }
    if REJECT_PHRASES.contains(&command) {
        return (vec![Intent::named(intents::REJECT)], Vec::new());
    }
    if UPDATE_PHRASES.iter().any(|p| command.contains(p)) {
        return (vec![Intent::named(intents::GROUP_UPDATE)], Vec::new());
    }
    if command.contains("сколько пар") {
        return with_day_slot(intents::SCHEDULE_COUNT, command);
    }
    if command.contains("расписание") {
        return with_day_slot(intents::SCHEDULE_LIST, command);
    }
    if looks_like_group_code(command) {
        return (vec![Intent::named(intents::GROUP_SET)], Vec::new());
    }
    (Vec::new(), Vec::new())
}

fn with_day_slot(intent_name: &str, command: &str) -> (Vec<Intent>, Vec<Entity>) {
    let mut intent = Intent::named(intent_name);
    let mut entities = Vec::new();

    if command.contains("сегодня") {
        intent.slots.insert("when".to_string(), "YandexDatetime".to_string());
        entities.push(Entity::RelativeDay(0));
    } else if command.contains("завтра") {
        intent.slots.insert("when".to_string(), "YandexDatetime".to_string());
        entities.push(Entity::RelativeDay(1));
    } else if let Some(weekday) = find_weekday(command) {
        intent.slots.insert("when".to_string(), weekday.to_string());
    }

    (vec![intent], entities)
}

fn find_weekday(command: &str) -> Option<&'static str> {
    const WEEKDAYS: [(&str, &str); 7] = [
        ("понедельник", "Monday"),
        ("вторник", "Tuesday"),
        ("сред", "Wednesday"),
        ("четверг", "Thursday"),
        ("пятниц", "Friday"),
        ("суббот", "Saturday"),
        ("воскресень", "Sunday"),
    ];
    WEEKDAYS
        .iter()
        .find(|(stem, _)| command.contains(stem))
        .map(|(_, name)| *name)
}

/// Cheap pre-filter only; the group resolver does the real matching.
fn looks_like_group_code(command: &str) -> bool {
    let len = command.chars().count();
    if !(5..=10).contains(&len) {
        return false;
    }
    command
        .chars()
        .filter(|c| *c != ' ')
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit())
}

pub(super) fn encode(body: &Value, resp: &SkillResponse) -> Value {
    let session = body.get("session").cloned().unwrap_or(Value::Null);
    json!({
        "response": response_block(resp, true),
        "session": {
            "session_id": session.get("session_id").cloned().unwrap_or(Value::Null),
            "user_id": session.get("user_id").cloned().unwrap_or(Value::Null),
            "message_id": session.get("message_id").cloned().unwrap_or(Value::Null),
        },
        "version": str_at(body, &["version"]).unwrap_or("1.0"),
        "session_state": state_to_value(&resp.state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::DialogState;
    use serde_json::json;

    fn request(command: &str) -> Value {
        json!({
            "session": {
                "session_id": "m-sess",
                "user_id": "marusia-user",
                "message_id": 7,
                "new": false,
                "application": {"application_id": "marusia-app"}
            },
            "request": {
                "command": command,
                "original_utterance": command,
            },
            "state": {"session": {"scene": "group", "group": "ИКБО-01-20"}},
            "version": "1.0"
        })
    }

    #[test]
    fn phrases_map_to_canonical_intents() {
        let cases = [
            ("помощь", intents::HELP),
            ("что ты умеешь", intents::HELP),
            ("да", intents::CONFIRM),
            ("нет", intents::REJECT),
            ("изменить группу", intents::GROUP_UPDATE),
            ("выход", intents::EXIT),
            ("икбо 01 20", intents::GROUP_SET),
        ];
        for (command, expected) in cases {
            let turn = parse(&request(command));
            assert_eq!(turn.intents.len(), 1, "{command}");
            assert_eq!(turn.intents[0].name, expected, "{command}");
        }
    }

    #[test]
    fn schedule_phrases_carry_the_day() {
        let turn = parse(&request("сколько пар сегодня"));
        assert_eq!(turn.intents[0].name, intents::SCHEDULE_COUNT);
        assert_eq!(
            turn.intents[0].slots.get("when").map(String::as_str),
            Some("YandexDatetime")
        );
        assert_eq!(turn.entities, vec![Entity::RelativeDay(0)]);

        let turn = parse(&request("расписание на завтра"));
        assert_eq!(turn.intents[0].name, intents::SCHEDULE_LIST);
        assert_eq!(turn.entities, vec![Entity::RelativeDay(1)]);

        let turn = parse(&request("расписание на пятницу"));
        assert_eq!(
            turn.intents[0].slots.get("when").map(String::as_str),
            Some("Friday")
        );
        assert!(turn.entities.is_empty());
    }

    #[test]
    fn unmatched_utterance_has_no_intents() {
        let turn = parse(&request("какая сегодня погода"));
        assert!(turn.intents.is_empty());
    }

    #[test]
    fn caller_prefers_session_user_id() {
        let turn = parse(&request("да"));
        assert_eq!(turn.caller_id.as_deref(), Some("marusia-user"));
        assert_eq!(turn.state.group.as_deref(), Some("ИКБО-01-20"));
    }

    #[test]
    fn encode_echoes_session_fields() {
        let body = request("да");
        let resp = SkillResponse::new(
            "Отлично",
            DialogState {
                scene: Some("group".to_string()),
                group: None,
                extra: serde_json::Map::new(),
            },
        );
        let wire = encode(&body, &resp);
        assert_eq!(wire["session"]["session_id"], "m-sess");
        assert_eq!(wire["session"]["user_id"], "marusia-user");
        assert_eq!(wire["session"]["message_id"], 7);
        assert_eq!(wire["version"], "1.0");
        assert_eq!(wire["session_state"]["scene"], "group");
        assert_eq!(wire["response"]["end_session"], false);
    }
}
