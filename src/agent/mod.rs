//! Agent module - orchestration and conversation management
//!
//! Contains the loop that coordinates model gateway calls and tool dispatch.

pub mod conversation;
pub mod loop_state;
pub mod orchestrator;

pub use conversation::Conversation;
pub use loop_state::{LoopState, RunPhase};
pub use orchestrator::Agent;
