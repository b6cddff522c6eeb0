//! Dialog scene state machine
//!
//! The conversation core: a fixed set of scenes, their intent
//! dispatch, and the local-then-global transition rule. Scenes are
//! stateless handlers keyed by [`SceneId`]; the only state that
//! survives a turn is the blob the platform round-trips for us.

pub mod intents;
pub mod reply;
mod scene;
mod transition;

pub use reply::{fallback, reply, ReplyError, SceneDeps};
pub use scene::SceneId;
pub use transition::advance;
