//! Per-query workflow state
//!
//! Tracks status, capabilities touched, and accumulated status messages for
//! one orchestration run. Every `handle` call operates on its own instance;
//! `reset` reinitializes every field so nothing leaks across queries.

use crate::models::{AgentActivity, WorkflowMetadata, WorkflowStatus};
use chrono::{DateTime, Utc};
use tracing::info;

/// How many trailing messages the metadata snapshot carries.
const METADATA_MESSAGE_COUNT: usize = 10;

#[derive(Debug)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    pub active_capabilities: Vec<String>,
    pub current_capability: Option<String>,
    pub messages: Vec<String>,
    pub user_query: Option<String>,
    pub final_response: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub activities: Vec<AgentActivity>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            status: WorkflowStatus::Idle,
            active_capabilities: Vec::new(),
            current_capability: None,
            messages: Vec::new(),
            user_query: None,
            final_response: None,
            start_time: None,
            activities: Vec::new(),
        }
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialize every field and stamp a fresh start time.
    pub fn reset(&mut self) {
        *self = Self::default();
        self.start_time = Some(Utc::now());
    }

    pub fn set_status(&mut self, status: WorkflowStatus) {
        self.status = status;
        info!("[workflow status] {}", status);
    }

    /// Mark a capability current, appending it to the active set if new.
    pub fn set_active_capability(&mut self, name: &str) {
        self.current_capability = Some(name.to_string());
        if !self.active_capabilities.iter().any(|active| active == name) {
            self.active_capabilities.push(name.to_string());
        }
    }

    /// Append a status message and emit it as an observability event.
    pub fn add_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("[workflow] {}", message);
        self.messages.push(message);
    }

    pub fn add_activity(&mut self, activity: AgentActivity) {
        self.activities.push(activity);
    }

    /// Read-only snapshot for the caller.
    pub fn metadata(&self) -> WorkflowMetadata {
        let tail = self.messages.len().saturating_sub(METADATA_MESSAGE_COUNT);

        WorkflowMetadata {
            status: self.status,
            active_capabilities: self.active_capabilities.clone(),
            current_capability: self.current_capability.clone(),
            messages: self.messages[tail..].to_vec(),
            start_time: self.start_time,
        }
    }
}
