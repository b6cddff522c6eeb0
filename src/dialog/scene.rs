//! Scene identifiers
//!
//! The wire string is stored by the remote platform inside the state
//! blob and replayed on the next turn, so it must stay stable across
//! deployments no matter how the Rust side is refactored. The enum is
//! the only place the mapping lives.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneId {
    Welcome,
    WelcomeDefault,
    Helper,
    GroupManager,
    Schedule,
    GoodBye,
}

impl SceneId {
    /// Stable token persisted in the platform state blob.
    pub fn as_wire(self) -> &'static str {
        match self {
            SceneId::Welcome => "welcome",
            SceneId::WelcomeDefault => "welcome_default",
            SceneId::Helper => "helper",
            SceneId::GroupManager => "group",
            SceneId::Schedule => "schedule",
            SceneId::GoodBye => "exit",
        }
    }

    /// `None` for tokens from renamed or removed scenes; the caller
    /// falls back to `Welcome` rather than failing the turn.
    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "welcome" => SceneId::Welcome,
            "welcome_default" => SceneId::WelcomeDefault,
            "helper" => SceneId::Helper,
            "group" => SceneId::GroupManager,
            "schedule" => SceneId::Schedule,
            "exit" => SceneId::GoodBye,
            _ => return None,
        })
    }
}
