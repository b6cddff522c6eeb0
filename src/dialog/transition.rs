//! Scene transition rules
//!
//! One pure function per table. Local intents are consulted before
//! global ones; the ordering lets a scene capture the conversation
//! (the group confirmation flow keeps "да"/"нет" to itself even
//! though they are recognized globally).

use super::intents;
use super::scene::SceneId;
use crate::turn::Turn;

/// Advance from the current scene for this turn. `None` means no
/// intent matched anywhere and the current scene's fallback applies.
pub fn advance(current: SceneId, turn: &Turn) -> Option<SceneId> {
    handle_local_intents(current, turn).or_else(|| handle_global_intents(turn))
}

fn handle_local_intents(current: SceneId, turn: &Turn) -> Option<SceneId> {
    match current {
        // The entry scenes accept anything the global table accepts.
        SceneId::Welcome | SceneId::WelcomeDefault | SceneId::Helper => {
            handle_global_intents(turn)
        }
        SceneId::GroupManager => turn
            .intents
            .iter()
            .any(|i| intents::is_group_management(&i.name))
            .then_some(SceneId::GroupManager),
        SceneId::Schedule => intents::has_schedule_intent(turn).then_some(SceneId::Schedule),
        SceneId::GoodBye => None,
    }
}

fn handle_global_intents(turn: &Turn) -> Option<SceneId> {
    if turn.intents.iter().any(|i| intents::is_help(&i.name)) {
        return Some(SceneId::Helper);
    }
    if intents::has_schedule_intent(turn) {
        return Some(SceneId::Schedule);
    }
    if turn
        .intents
        .iter()
        .any(|i| intents::is_group_management(&i.name))
    {
        return Some(SceneId::GroupManager);
    }
    if turn.intents.iter().any(|i| intents::is_exit(&i.name)) {
        return Some(SceneId::GoodBye);
    }
    None
}
