//! Append-only activity recording
//!
//! Every capability invocation, successful or not, produces one entry in a
//! dated log file: a timestamped header followed by an indented structured
//! dump of the activity. Recording is best-effort; sink failures are logged
//! and swallowed so they can never abort a query.

use crate::models::{ActivityStatus, AgentActivity};
use crate::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::error;

/// Queries are truncated in records to bound entry size.
const QUERY_RECORD_CAP: usize = 100;

/// On-disk form of one activity entry. The result is recorded by length
/// only; the full text already went back to the caller.
#[derive(Debug, Serialize)]
struct ActivityRecord<'a> {
    agent: &'a str,
    query: String,
    status: ActivityStatus,
    start_time: String,
    end_time: Option<String>,
    result_length: usize,
    error: Option<&'a str>,
    tools_used: &'a [String],
}

impl<'a> ActivityRecord<'a> {
    fn from_activity(activity: &'a AgentActivity) -> Self {
        Self {
            agent: activity.capability.name(),
            query: activity.query.chars().take(QUERY_RECORD_CAP).collect(),
            status: activity.status,
            start_time: activity.start_time.to_rfc3339(),
            end_time: activity.end_time.map(|t| t.to_rfc3339()),
            result_length: activity.result.as_deref().map_or(0, str::len),
            error: activity.error.as_deref(),
            tools_used: &activity.tools_used,
        }
    }
}

/// Durable sink for capability invocation records
pub struct ActivityRecorder {
    log_dir: PathBuf,
}

impl ActivityRecorder {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Record one invocation attempt. Sink errors never propagate.
    pub fn record(&self, activity: &AgentActivity) {
        if let Err(e) = self.try_record(activity) {
            error!("Error saving agent activity: {}", e);
        }
    }

    fn try_record(&self, activity: &AgentActivity) -> Result<()> {
        fs::create_dir_all(&self.log_dir)?;

        let now = Utc::now();
        let log_file = self
            .log_dir
            .join(format!("agent_activities_{}.log", now.format("%Y%m%d")));

        let record = ActivityRecord::from_activity(activity);
        let body = serde_json::to_string_pretty(&record)?;

        let mut sink = OpenOptions::new().create(true).append(true).open(log_file)?;
        writeln!(sink, "\n{}", "=".repeat(80))?;
        writeln!(sink, "[{}] AGENT ACTIVITY LOG", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(sink, "{}", "=".repeat(80))?;
        writeln!(sink, "{}", body)?;

        Ok(())
    }
}
