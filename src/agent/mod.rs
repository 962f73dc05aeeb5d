//! Main orchestrator
//!
//! QUERY FLOW: INPUT → ROUTE → EXECUTE → FALLBACK? → COMPLETE
//!
//! Every call gets its own workflow state, so concurrent callers cannot
//! corrupt each other's run. The orchestrator always returns a response;
//! anything escaping the pipeline is converted to readable error text.

use crate::fallback::FallbackCoordinator;
use crate::models::{WorkflowMetadata, WorkflowStatus};
use crate::router::Router;
use crate::state::WorkflowState;
use crate::Result;
use chrono::Utc;
use tracing::{error, info};

pub struct Orchestrator {
    fallback: FallbackCoordinator,
}

impl Orchestrator {
    pub fn new(fallback: FallbackCoordinator) -> Self {
        Self { fallback }
    }

    /// Handle one user query end to end.
    pub async fn handle(&self, query: &str) -> (String, WorkflowMetadata) {
        let mut state = WorkflowState::new();
        state.reset();

        info!(query = %query, "new query received");

        match self.process(query, &mut state).await {
            Ok(response) => {
                state.set_status(WorkflowStatus::Complete);
                state.final_response = Some(response.clone());
                log_summary(&state);
                (response, state.metadata())
            }
            Err(e) => {
                state.set_status(WorkflowStatus::Error);
                let error_msg = format!("Error processing query: {}", e);
                error!("Critical error: {}", error_msg);
                (error_msg, state.metadata())
            }
        }
    }

    async fn process(&self, query: &str, state: &mut WorkflowState) -> Result<String> {
        state.user_query = Some(query.to_string());
        state.start_time = Some(Utc::now());

        state.set_status(WorkflowStatus::Routing);
        state.add_message(format!(
            "Received query: {}...",
            query.chars().take(50).collect::<String>()
        ));

        let decision = Router::route(query);

        state.set_status(WorkflowStatus::Processing);

        let response = self
            .fallback
            .execute_with_fallback(decision.target, &decision.augmented_query, query, state)
            .await;

        Ok(response)
    }
}

fn log_summary(state: &WorkflowState) {
    info!(
        status = %state.status,
        capabilities = ?state.active_capabilities,
        current = ?state.current_capability,
        messages = state.messages.len(),
        response_chars = state.final_response.as_deref().map_or(0, str::len),
        "query processing complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityRecorder;
    use crate::agents::{AgentInvoker, AgentReply, MockAgentTeam};
    use crate::error::AgentError;
    use crate::executor::Executor;
    use crate::models::Capability;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct ScriptedTeam {
        replies: Mutex<VecDeque<crate::Result<AgentReply>>>,
    }

    #[async_trait]
    impl AgentInvoker for ScriptedTeam {
        async fn invoke(
            &self,
            _capability: Capability,
            _query: &str,
        ) -> crate::Result<AgentReply> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(AgentReply::Text("script exhausted".to_string())))
        }
    }

    fn temp_log_dir() -> PathBuf {
        std::env::temp_dir().join(format!("agent-router-test-{}", Uuid::new_v4()))
    }

    fn orchestrator_with(team: Arc<dyn AgentInvoker>, dir: &PathBuf) -> Orchestrator {
        let recorder = Arc::new(ActivityRecorder::new(dir.clone()));
        Orchestrator::new(FallbackCoordinator::new(Executor::new(team, recorder)))
    }

    #[tokio::test]
    async fn test_finance_query_end_to_end() {
        let dir = temp_log_dir();
        let orchestrator = orchestrator_with(Arc::new(MockAgentTeam), &dir);

        let (response, metadata) = orchestrator
            .handle("What is the current price of AAPL?")
            .await;

        assert!(!response.is_empty());
        assert_eq!(metadata.status, WorkflowStatus::Complete);
        assert_eq!(metadata.active_capabilities, vec!["finance_agent"]);
        assert!(metadata.start_time.is_some());

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_failed_fallback_still_completes() {
        let dir = temp_log_dir();
        let team = Arc::new(ScriptedTeam {
            replies: Mutex::new(
                vec![
                    Err(AgentError::LlmError("symbol not found".to_string())),
                    Ok(AgentReply::Text(
                        "- no listed company by that name\n- try refining the query".to_string(),
                    )),
                ]
                .into(),
            ),
        });
        let orchestrator = orchestrator_with(team, &dir);

        let (response, metadata) = orchestrator
            .handle("stock ticker for a company that doesn't exist, give me the price")
            .await;

        // the domain call failed; the orchestration itself did not
        assert!(response.contains("Error executing finance_agent query"));
        assert_eq!(metadata.status, WorkflowStatus::Complete);
        assert_eq!(
            metadata.active_capabilities,
            vec!["finance_agent", "search_agent"]
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_directive_query_routes_to_conversation() {
        let dir = temp_log_dir();
        let orchestrator = orchestrator_with(Arc::new(MockAgentTeam), &dir);

        let (response, metadata) = orchestrator
            .handle("Explain inflation in 3 bullet points")
            .await;

        assert_eq!(metadata.status, WorkflowStatus::Complete);
        assert_eq!(metadata.active_capabilities, vec!["chat_agent"]);
        // the mock echoes the augmented query, directive suffix included
        assert!(response.contains("bullet"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_metadata_messages_are_capped() {
        let dir = temp_log_dir();
        let orchestrator = orchestrator_with(Arc::new(MockAgentTeam), &dir);

        let (_, metadata) = orchestrator.handle("hello").await;
        assert!(metadata.messages.len() <= 10);
        assert!(!metadata.messages.is_empty());

        fs::remove_dir_all(dir).unwrap();
    }
}
