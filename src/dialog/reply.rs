//! Scene reply handlers
//!
//! One stateless handler per scene. Side effects go through the
//! collaborator traits in [`SceneDeps`], never through scene fields;
//! anything a handler wants the next turn to see must ride in the
//! outgoing state blob.

use super::intents;
use super::scene::SceneId;
use crate::resolver::resolve_group;
use crate::schedule::{
    count_text, lesson_count, render_list, resolve_day, sunday_text, week_parity,
};
use crate::schedule_api::{ApiError, ScheduleApi};
use crate::store::{StoreError, UserStore};
use crate::turn::{Button, DialogState, SkillResponse, Turn};
use chrono::NaiveDate;
use thiserror::Error;

pub const WELCOME_TEXT: &str =
    "Привет! Теперь я умею показывать расписание РТУ МИРЭА. Для начала скажите мне свою группу.";
pub const WELCOME_DEFAULT_TEXT: &str = "Привет! Какое расписание вы хотите посмотреть?";
pub const HELPER_TEXT: &str =
    "Я могу показать расписание твоей группы. Или, например, сказать количество пар сегодня";
pub const FALLBACK_TEXT: &str =
    "Не понимаю. Попробуйте сформулировать иначе. Скажите \"Помощь\" или \"Что ты умеешь\" и я помогу";
pub const GOODBYE_TEXT: &str = "До свидания, обращайтесь ко мне ещё!";
pub const NO_GROUP_TEXT: &str =
    "Я ещё не знаю вашу группу. Скажите, например, \"Моя группа ИКБО-01-20\", и я её запомню";
pub const GROUP_RETRY_TEXT: &str = "Не расслышала группу. Назовите её ещё раз, пожалуйста";
pub const GROUP_REJECT_TEXT: &str = "Давайте попробуем еще раз. Назовите вашу группу";
pub const GROUP_UPDATE_TEXT: &str = "Хорошо, назовите новую группу и я её запомню";
pub const NO_DAY_TEXT: &str = "Не поняла, на какой день нужно расписание. Попробуйте ещё раз";

/// Failure of an external collaborator while producing a reply. The
/// orchestrator converts these into a generic apology response.
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Collaborators and calendar context a reply may need. `today` is
/// injected so date arithmetic stays deterministic under test.
pub struct SceneDeps<'a> {
    pub users: &'a dyn UserStore,
    pub api: &'a dyn ScheduleApi,
    pub semester_start: NaiveDate,
    pub today: NaiveDate,
}

/// Outgoing state for a scene: the scene token plus echoed foreign
/// keys. The staged group is dropped unless a handler re-stages it.
fn state_for(scene: SceneId, turn: &Turn) -> DialogState {
    DialogState {
        scene: Some(scene.as_wire().to_string()),
        group: None,
        extra: turn.state.extra.clone(),
    }
}

fn respond(scene: SceneId, turn: &Turn, text: impl Into<String>) -> SkillResponse {
    SkillResponse::new(text, state_for(scene, turn))
}

/// Fixed "didn't understand" reply; the unmatched utterance is logged
/// for intent-coverage review.
pub fn fallback(scene: SceneId, turn: &Turn) -> SkillResponse {
    tracing::error!(utterance = %turn.original_text, "incomprehensible intent");
    respond(scene, turn, FALLBACK_TEXT)
}

/// Produce the reply for a scene. A fresh dispatch per turn; no state
/// is carried between calls.
pub async fn reply(
    scene: SceneId,
    turn: &Turn,
    deps: &SceneDeps<'_>,
) -> Result<SkillResponse, ReplyError> {
    match scene {
        SceneId::Welcome => Ok(respond(scene, turn, WELCOME_TEXT)),
        SceneId::WelcomeDefault => Ok(respond(scene, turn, WELCOME_DEFAULT_TEXT)),
        SceneId::Helper => Ok(helper_reply(turn)),
        SceneId::GroupManager => group_manager_reply(turn, deps).await,
        SceneId::Schedule => schedule_reply(turn, deps).await,
        SceneId::GoodBye => Ok(respond(scene, turn, GOODBYE_TEXT).ending_session()),
    }
}

fn helper_reply(turn: &Turn) -> SkillResponse {
    respond(SceneId::Helper, turn, HELPER_TEXT).with_buttons(vec![
        Button::suggestion("Расписание на сегодня"),
        Button::suggestion("Расписание на завтра"),
        Button::suggestion("Сколько пар сегодня"),
        Button::suggestion("Расписание на понедельник"),
        Button::suggestion("Изменить группу"),
    ])
}

async fn group_manager_reply(
    turn: &Turn,
    deps: &SceneDeps<'_>,
) -> Result<SkillResponse, ReplyError> {
    let scene = SceneId::GroupManager;
    let Some(intent) = turn.primary_intent() else {
        return Ok(fallback(scene, turn));
    };

    match intent.name.as_str() {
        intents::GROUP_SET => {
            let groups = deps.api.list_groups().await?;
            match resolve_group(&turn.command, &groups) {
                Some(group) => {
                    let mut resp = respond(scene, turn, format!("Ваша группа {group}, верно?"))
                        .with_buttons(vec![
                            Button::suggestion("Да"),
                            Button::suggestion("Нет"),
                        ]);
                    resp.state.group = Some(group.to_string());
                    Ok(resp)
                }
                // Nothing resolvable: ask again instead of confirming
                // a phantom group.
                None => Ok(respond(scene, turn, GROUP_RETRY_TEXT)),
            }
        }
        intents::CONFIRM => {
            let staged = turn
                .state
                .group
                .as_deref()
                .filter(|g| !g.is_empty());
            let (Some(group), Some(user_id)) = (staged, turn.caller_id.as_deref()) else {
                return Ok(respond(scene, turn, GROUP_RETRY_TEXT));
            };
            commit_group(turn, deps, user_id, group).await?;
            let text = format!(
                "Отлично, я запомнила, что вы из {group}. \
                 Для просмотра расписания скажите \"Расписание на сегодня\" или \"Расписание на понедельник\"\n\
                 Для просмотра помощи скажите \"Помощь\".\n\
                 Чтобы изменить группу скажите \"Изменить группу\""
            );
            Ok(respond(scene, turn, text).with_buttons(vec![
                Button::suggestion("Расписание на сегодня"),
                Button::suggestion("Расписание на завтра"),
                Button::suggestion("Сколько пар сегодня"),
                Button::suggestion("Помощь"),
                Button::suggestion("Что ты умеешь?"),
                Button::suggestion("Изменить группу"),
            ]))
        }
        intents::REJECT => Ok(respond(scene, turn, GROUP_REJECT_TEXT)),
        intents::GROUP_UPDATE => Ok(respond(scene, turn, GROUP_UPDATE_TEXT)),
        _ => Ok(fallback(scene, turn)),
    }
}

/// Commit a confirmed group, creating the record when the caller was
/// never seen before (a platform may deliver the first turn of a
/// session straight into the confirmation flow).
async fn commit_group(
    turn: &Turn,
    deps: &SceneDeps<'_>,
    user_id: &str,
    group: &str,
) -> Result<(), ReplyError> {
    match deps.users.update_user(user_id, group).await {
        Ok(()) => Ok(()),
        Err(StoreError::UserNotFound(_)) => {
            deps.users.create_user(user_id, group, turn.platform).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn schedule_reply(turn: &Turn, deps: &SceneDeps<'_>) -> Result<SkillResponse, ReplyError> {
    let scene = SceneId::Schedule;
    let Some(intent) = turn.primary_intent().cloned() else {
        return Ok(fallback(scene, turn));
    };

    let Some(resolved) = resolve_day(turn.slot("when"), turn.relative_day(), deps.today) else {
        return Ok(respond(scene, turn, NO_DAY_TEXT));
    };

    // Sunday is answered without touching the schedule service.
    if resolved.is_sunday() {
        return Ok(respond(scene, turn, sunday_text(resolved.label)));
    }

    let Some(user_id) = turn.caller_id.as_deref() else {
        return Ok(respond(scene, turn, NO_GROUP_TEXT));
    };
    let group = match deps.users.get_user(user_id).await? {
        Some(user) if !user.study_group.is_empty() => user.study_group,
        _ => return Ok(respond(scene, turn, NO_GROUP_TEXT)),
    };

    let doc = deps.api.full_schedule(&group).await?;
    let parity = week_parity(resolved.date, deps.semester_start);

    let text = match intent.name.as_str() {
        intents::SCHEDULE_COUNT => {
            let count = lesson_count(&doc, resolved.digit, parity);
            count_text(&resolved, count)
        }
        intents::SCHEDULE_LIST => {
            render_list(&doc, &group, resolved.digit, resolved.date, parity)
        }
        _ => return Ok(fallback(scene, turn)),
    };
    Ok(respond(scene, turn, text))
}
