//! Turn orchestrator
//!
//! Ties one webhook call together: decode the platform payload, pick
//! the current scene (from persisted state or the session-start
//! rules), run the state machine, and encode the reply. Whatever goes
//! wrong, the platform gets a well-formed response body.

use crate::dialog::{self, intents, SceneDeps, SceneId};
use crate::platform;
use crate::schedule_api::ScheduleApi;
use crate::store::UserStore;
use crate::turn::{DialogState, Platform, SkillResponse, Turn};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::sync::Arc;

pub const APOLOGY_TEXT: &str = "Что-то пошло не так. Попробуйте ещё раз позже";

/// Stateless conversation engine; everything per-turn lives on the
/// stack, shared handles are the two external collaborators.
pub struct Engine {
    users: Arc<dyn UserStore>,
    api: Arc<dyn ScheduleApi>,
    semester_start: NaiveDate,
}

impl Engine {
    pub fn new(
        users: Arc<dyn UserStore>,
        api: Arc<dyn ScheduleApi>,
        semester_start: NaiveDate,
    ) -> Self {
        Self {
            users,
            api,
            semester_start,
        }
    }

    /// Handle one webhook call end to end. Never fails: collaborator
    /// errors collapse into an apology response.
    pub async fn handle(&self, platform: Platform, body: &Value) -> Value {
        let turn = platform::parse_request(platform, body);
        tracing::info!(
            platform = platform.as_db_str(),
            command = %turn.command,
            scene = turn.state.scene.as_deref().unwrap_or(""),
            "handling turn"
        );

        let response = match self.route(&turn).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "turn failed, apologizing");
                apology(&turn)
            }
        };
        platform::encode_response(platform, body, &response)
    }

    async fn route(&self, turn: &Turn) -> Result<SkillResponse, dialog::ReplyError> {
        let deps = SceneDeps {
            users: self.users.as_ref(),
            api: self.api.as_ref(),
            semester_start: self.semester_start,
            today: Local::now().date_naive(),
        };

        // Mid-conversation: the platform replayed our scene token.
        if let Some(token) = turn.state.scene.as_deref() {
            let current = SceneId::from_wire(token).unwrap_or_else(|| {
                tracing::warn!(token, "unknown persisted scene, recovering via Welcome");
                SceneId::Welcome
            });
            return match dialog::advance(current, turn) {
                Some(next) => dialog::reply(next, turn, &deps).await,
                None => Ok(dialog::fallback(current, turn)),
            };
        }

        // Session start. Anonymous callers cannot have a stored group;
        // the Schedule scene phrases that for schedule intents.
        let Some(user_id) = turn.caller_id.as_deref() else {
            let scene = if intents::has_schedule_intent(turn) {
                SceneId::Schedule
            } else {
                SceneId::Welcome
            };
            return dialog::reply(scene, turn, &deps).await;
        };

        let scene = match deps.users.get_user(user_id).await? {
            None => {
                deps.users.create_user(user_id, "", turn.platform).await?;
                SceneId::Welcome
            }
            Some(user) if user.study_group.is_empty() => SceneId::Welcome,
            // Deep link: a returning user asking for the schedule in
            // the first breath skips the greeting.
            Some(_) if turn.is_session_new && intents::has_schedule_intent(turn) => {
                SceneId::Schedule
            }
            Some(_) => SceneId::WelcomeDefault,
        };
        dialog::reply(scene, turn, &deps).await
    }
}

fn apology(turn: &Turn) -> SkillResponse {
    SkillResponse::new(
        APOLOGY_TEXT,
        DialogState {
            scene: turn.state.scene.clone(),
            group: None,
            extra: turn.state.extra.clone(),
        },
    )
}
