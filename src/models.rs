//! Core data models for the agent router

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Capabilities =================
//

/// The three answering services queries can be routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ContentSearch,
    FinancialData,
    GeneralConversation,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::ContentSearch => "search_agent",
            Capability::FinancialData => "finance_agent",
            Capability::GeneralConversation => "chat_agent",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

//
// ================= Routing =================
//

/// Classification outcome for one query. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingDecision {
    pub target: Capability,
    pub augmented_query: String,
    pub directives: Option<String>,
}

//
// ================= Capability results =================
//

/// Outcome of a single capability invocation.
///
/// `succeeded` is false iff the underlying invocation returned an error,
/// in which case `text` holds a readable error description instead of a
/// domain answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub text: String,
    pub succeeded: bool,
}

impl CapabilityResult {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            succeeded: true,
        }
    }

    pub fn failed(text: String) -> Self {
        Self {
            text,
            succeeded: false,
        }
    }
}

//
// ================= Activity =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

/// One capability invocation attempt, tracked from start to terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentActivity {
    pub activity_id: Uuid,
    pub capability: Capability,
    pub query: String,
    pub status: ActivityStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub tools_used: Vec<String>,
}

impl AgentActivity {
    pub fn new(capability: Capability, query: &str) -> Self {
        Self {
            activity_id: Uuid::new_v4(),
            capability,
            query: query.to_string(),
            status: ActivityStatus::Pending,
            start_time: Utc::now(),
            end_time: None,
            result: None,
            error: None,
            tools_used: Vec::new(),
        }
    }

    pub fn mark_running(&mut self) {
        self.status = ActivityStatus::Running;
    }

    /// Terminal state: invocation succeeded.
    pub fn complete(&mut self, result: String) {
        self.status = ActivityStatus::Complete;
        self.result = Some(result);
        self.end_time = Some(Utc::now());
    }

    /// Terminal state: invocation failed.
    pub fn fail(&mut self, error: String) {
        self.status = ActivityStatus::Failed;
        self.error = Some(error);
        self.end_time = Some(Utc::now());
    }
}

//
// ================= Workflow =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Idle,
    Routing,
    Processing,
    Complete,
    Error,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::Routing => "routing",
            WorkflowStatus::Processing => "processing",
            WorkflowStatus::Complete => "complete",
            WorkflowStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Read-only workflow snapshot handed back to the caller with each response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub status: WorkflowStatus,
    pub active_capabilities: Vec<String>,
    pub current_capability: Option<String>,
    /// Last 10 status messages.
    pub messages: Vec<String>,
    pub start_time: Option<DateTime<Utc>>,
}
