//! Capability execution
//!
//! Invokes one capability with a query, normalizes its reply to text, and
//! records the attempt. Invocation failures are converted into a failed
//! `CapabilityResult`; nothing raises past this boundary.

use crate::activity::ActivityRecorder;
use crate::agents::AgentInvoker;
use crate::models::{AgentActivity, Capability, CapabilityResult};
use crate::state::WorkflowState;
use std::sync::Arc;
use tracing::{error, info};

pub struct Executor {
    agents: Arc<dyn AgentInvoker>,
    recorder: Arc<ActivityRecorder>,
}

impl Executor {
    pub fn new(agents: Arc<dyn AgentInvoker>, recorder: Arc<ActivityRecorder>) -> Self {
        Self { agents, recorder }
    }

    /// Execute one capability invocation and track it end to end. Exactly
    /// one activity record is written per call, success or failure.
    pub async fn execute(
        &self,
        capability: Capability,
        query: &str,
        state: &mut WorkflowState,
    ) -> (CapabilityResult, AgentActivity) {
        state.set_active_capability(capability.name());
        state.add_message(format!("Executing with {}", capability.name()));

        let mut activity = AgentActivity::new(capability, query);
        activity.mark_running();

        info!(
            capability = %capability,
            query = %query.chars().take(100).collect::<String>(),
            "sending query to agent"
        );

        match self.agents.invoke(capability, query).await {
            Ok(reply) => {
                let text = reply.into_text().trim().to_string();

                info!(capability = %capability, chars = text.len(), "agent response received");

                activity.complete(text.clone());
                self.recorder.record(&activity);
                state.add_activity(activity.clone());
                state.add_message(format!("Agent response: {} characters", text.len()));

                let text = if text.is_empty() {
                    "No response from agent".to_string()
                } else {
                    text
                };

                (CapabilityResult::ok(text), activity)
            }
            Err(e) => {
                let error_msg = format!("Error executing {} query: {}", capability.name(), e);
                error!("{}", error_msg);

                activity.fail(e.to_string());
                self.recorder.record(&activity);
                state.add_message(format!("Error: {}", error_msg));

                (CapabilityResult::failed(error_msg), activity)
            }
        }
    }
}
