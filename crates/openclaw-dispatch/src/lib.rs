//! `openclaw-dispatch` — agent dispatch pipelines (§4.2): the subprocess
//! primitive shared by every pipeline, the five pipeline bodies
//! (plan/think/prompt-dry/ask/adhoc), and the owner-notification
//! abstraction used by all of them plus the question–answer rendezvous.

pub mod cmd;
pub mod error;
pub mod json;
pub mod notify;
pub mod pipelines;
pub mod prompts;
pub mod thinking;

pub use cmd::{agent_cmd, run_agent, AgentOutput};
pub use error::{DispatchError, Result};
pub use notify::{send_owner_message, OwnerNotifier};
pub use pipelines::{
    dispatch_followup, queued_reply, record_conversation, run_adhoc_pipeline, run_ask_pipeline,
    run_plan_pipeline, run_prompt_dry_pipeline, run_think_pipeline, DispatchContext,
};
pub use thinking::thinking_from_temp;
