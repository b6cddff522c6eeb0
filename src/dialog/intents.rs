//! Canonical intent vocabulary
//!
//! Platform adapters normalize their namespaced or phrase-derived
//! intents into these names; everything past the adapter boundary
//! speaks only this vocabulary.

use crate::turn::Turn;

pub const HELP: &str = "help";
pub const WHAT_CAN_YOU_DO: &str = "what_can_you_do";
pub const CONFIRM: &str = "confirm";
pub const REJECT: &str = "reject";
pub const GROUP_SET: &str = "user_study_group_set";
pub const GROUP_UPDATE: &str = "user_study_group_update";
pub const SCHEDULE_COUNT: &str = "schedule_count";
pub const SCHEDULE_LIST: &str = "schedule_list";
pub const EXIT: &str = "exit";

pub fn is_help(name: &str) -> bool {
    name == HELP || name == WHAT_CAN_YOU_DO
}

pub fn is_schedule(name: &str) -> bool {
    name == SCHEDULE_COUNT || name == SCHEDULE_LIST
}

/// Confirm/reject are group-management intents: they only make sense
/// inside the group confirmation flow.
pub fn is_group_management(name: &str) -> bool {
    matches!(name, CONFIRM | REJECT | GROUP_SET | GROUP_UPDATE)
}

pub fn is_exit(name: &str) -> bool {
    name == EXIT
}

pub fn has_schedule_intent(turn: &Turn) -> bool {
    turn.intents.iter().any(|i| is_schedule(&i.name))
}
