//! Fallback coordination
//!
//! One permitted recovery hop: when the finance agent fails on a query
//! carrying a ticker/stock cue, ask the search agent for the ticker symbol,
//! then retry the finance agent once with the discovered symbol. Any
//! failure inside the hop reverts to the primary result, so fallback can
//! never make a query worse.

use crate::executor::Executor;
use crate::models::Capability;
use crate::state::WorkflowState;
use tracing::{info, warn};

/// Longest token accepted as a ticker symbol.
const MAX_TICKER_LEN: usize = 10;

pub struct FallbackCoordinator {
    executor: Executor,
}

impl FallbackCoordinator {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Execute the primary capability; on a finance failure with a
    /// ticker/stock cue in the original query, attempt discovery + retry.
    pub async fn execute_with_fallback(
        &self,
        capability: Capability,
        query: &str,
        original_query: &str,
        state: &mut WorkflowState,
    ) -> String {
        info!(capability = %capability, "attempting primary execution");

        let (primary, _) = self.executor.execute(capability, query, state).await;
        if primary.succeeded {
            return primary.text;
        }

        let original_lower = original_query.to_lowercase();
        let has_ticker_cue =
            original_lower.contains("ticker") || original_lower.contains("stock");

        if capability != Capability::FinancialData || !has_ticker_cue {
            return primary.text;
        }

        info!("finance agent failed with a ticker cue present, attempting ticker discovery");

        match self.attempt_ticker_fallback(original_query, state).await {
            Some(recovered) => recovered,
            None => primary.text,
        }
    }

    /// Discovery + retry. `None` means the hop produced nothing better and
    /// the primary result stands.
    async fn attempt_ticker_fallback(
        &self,
        original_query: &str,
        state: &mut WorkflowState,
    ) -> Option<String> {
        let company_name = strip_lookup_boilerplate(original_query);
        let discovery_query = format!(
            "Find the stock ticker symbol for {}. Return ONLY the ticker symbol.",
            company_name
        );

        info!(query = %discovery_query, "search agent discovering ticker");

        let (discovery, _) = self
            .executor
            .execute(Capability::ContentSearch, &discovery_query, state)
            .await;

        if !discovery.succeeded {
            warn!("ticker discovery failed: {}", discovery.text);
            return None;
        }

        let ticker = extract_ticker(&discovery.text)?;
        info!(ticker = %ticker, "ticker found, retrying finance agent");

        let retried = if company_name.is_empty() {
            original_query.to_string()
        } else {
            original_query.replace(&company_name, &ticker)
        };
        let retry_query = format!("{} (use ticker: {})", retried, ticker);

        let (retry, _) = self
            .executor
            .execute(Capability::FinancialData, &retry_query, state)
            .await;

        if retry.succeeded {
            info!(chars = retry.text.len(), "fallback retry succeeded");
            Some(retry.text)
        } else {
            warn!("fallback retry failed: {}", retry.text);
            None
        }
    }
}

/// Strip known lookup boilerplate to leave a bare entity name.
fn strip_lookup_boilerplate(query: &str) -> String {
    query
        .replace("stock price", "")
        .replace("ticker", "")
        .trim()
        .to_string()
}

/// Pick a ticker-like token out of a search reply.
///
/// First line of length <= 10 that is all-uppercase or carries a suffix
/// separator wins; otherwise the first non-bullet, non-empty line is
/// upper-cased and truncated. Short ordinary answer lines can satisfy the
/// first rule, so a hit is a candidate, not a guarantee.
fn extract_ticker(response: &str) -> Option<String> {
    for line in response.lines() {
        let line = line.trim();
        if !line.is_empty()
            && line.chars().count() <= MAX_TICKER_LEN
            && (is_all_uppercase(line) || line.contains('.'))
        {
            return Some(line.to_string());
        }
    }

    for line in response.lines() {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('-') && !line.starts_with('•') {
            return Some(
                line.chars()
                    .take(MAX_TICKER_LEN)
                    .collect::<String>()
                    .to_uppercase(),
            );
        }
    }

    None
}

/// At least one cased character and no lowercase ones.
fn is_all_uppercase(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityRecorder;
    use crate::agents::{AgentInvoker, AgentReply};
    use crate::error::AgentError;
    use crate::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// Replays a fixed reply sequence in call order and counts calls.
    struct ScriptedTeam {
        replies: Mutex<VecDeque<Result<AgentReply>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTeam {
        fn new(replies: Vec<Result<AgentReply>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AgentInvoker for ScriptedTeam {
        async fn invoke(&self, _capability: Capability, _query: &str) -> Result<AgentReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(AgentReply::Text("script exhausted".to_string())))
        }
    }

    fn failure() -> Result<AgentReply> {
        Err(AgentError::LlmError("symbol not found".to_string()))
    }

    fn text(reply: &str) -> Result<AgentReply> {
        Ok(AgentReply::Text(reply.to_string()))
    }

    fn coordinator(team: Arc<ScriptedTeam>, dir: &std::path::Path) -> FallbackCoordinator {
        FallbackCoordinator::new(Executor::new(
            team,
            Arc::new(ActivityRecorder::new(dir.to_path_buf())),
        ))
    }

    fn temp_log_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("agent-router-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_primary_success_short_circuits() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![text("AAPL trades at $150.50")]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::FinancialData,
                "price of AAPL stock",
                "price of AAPL stock",
                &mut state,
            )
            .await;

        assert_eq!(answer, "AAPL trades at $150.50");
        assert_eq!(team.call_count(), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_fallback_recovers_with_discovered_ticker() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![
            failure(),
            text("AAPL"),
            text("Apple Inc. (AAPL) trades at $150.50"),
        ]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::FinancialData,
                "stock price of Apple",
                "stock price of Apple",
                &mut state,
            )
            .await;

        assert_eq!(answer, "Apple Inc. (AAPL) trades at $150.50");
        assert_eq!(team.call_count(), 3);
        assert_eq!(
            state.active_capabilities,
            vec!["finance_agent", "search_agent"]
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_no_fallback_without_ticker_cue() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![failure()]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::FinancialData,
                "dividend yield of Apple",
                "dividend yield of Apple",
                &mut state,
            )
            .await;

        assert!(answer.contains("symbol not found"));
        assert_eq!(team.call_count(), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_no_fallback_for_other_capabilities() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![failure()]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::ContentSearch,
                "search stock market history",
                "search stock market history",
                &mut state,
            )
            .await;

        assert!(answer.contains("symbol not found"));
        assert_eq!(team.call_count(), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_unusable_discovery_reply_reverts_to_primary() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![
            failure(),
            text("- no listed company by that name\n- try refining the query"),
        ]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::FinancialData,
                "stock ticker for Zyxqon, give me the price",
                "stock ticker for Zyxqon, give me the price",
                &mut state,
            )
            .await;

        assert!(answer.contains("symbol not found"));
        assert_eq!(team.call_count(), 2);

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_failed_retry_reverts_to_primary() {
        let dir = temp_log_dir();
        let team = ScriptedTeam::new(vec![failure(), text("AAPL"), failure()]);
        let coordinator = coordinator(team.clone(), &dir);
        let mut state = WorkflowState::new();

        let answer = coordinator
            .execute_with_fallback(
                Capability::FinancialData,
                "stock price of Apple",
                "stock price of Apple",
                &mut state,
            )
            .await;

        assert!(answer.contains("Error executing finance_agent query"));
        assert_eq!(team.call_count(), 3);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_extract_ticker_prefers_short_uppercase_line() {
        let reply = "Sure, here you go\nAAPL\nmore detail below";
        assert_eq!(extract_ticker(reply).as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_extract_ticker_accepts_suffix_separator() {
        assert_eq!(extract_ticker("TCS.NS").as_deref(), Some("TCS.NS"));
    }

    #[test]
    fn test_extract_ticker_short_dotted_prose_wins() {
        // A short dotted line qualifies even when it is prose; the
        // precedence order is deliberate.
        assert_eq!(extract_ticker("Sure.\nAAPL").as_deref(), Some("Sure."));
    }

    #[test]
    fn test_extract_ticker_falls_back_to_first_plain_line() {
        let reply = "- candidates considered\nthe symbol is probably msft";
        assert_eq!(extract_ticker(reply).as_deref(), Some("THE SYMBOL"));
    }

    #[test]
    fn test_extract_ticker_rejects_bullet_only_reply() {
        let reply = "- no listed company by that name\n• try refining the query\n";
        assert_eq!(extract_ticker(reply), None);
        assert_eq!(extract_ticker(""), None);
    }

    #[test]
    fn test_strip_lookup_boilerplate() {
        assert_eq!(strip_lookup_boilerplate("stock price Apple"), "Apple");
        assert_eq!(
            strip_lookup_boilerplate("ticker for Apple Inc"),
            "for Apple Inc"
        );
        assert_eq!(strip_lookup_boilerplate("stock price ticker"), "");
    }
}
