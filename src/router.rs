//! Query router
//!
//! Classifies user queries by priority-ordered keyword match:
//! - Financial terms win first (e.g., "price of AAPL" → finance agent)
//! - Research/web terms next (e.g., "search recent news" → search agent)
//! - Everything else falls through to general conversation
//!
//! Formatting directives embedded in the query ("in 3 bullet points",
//! "keep it brief") are extracted and appended as an instruction suffix.

use crate::models::{Capability, RoutingDecision};
use tracing::info;

/// Static keyword lists — zero allocation
const FINANCIAL_KEYWORDS: &[&str] = &[
    "stock", "price", "finance", "company info", "analyst", "portfolio",
    "earnings", "pe ratio", "dividend", "invest", "buy", "sell", "hold",
    "share", "nse", "bse", "market cap", "valuation", "rating", "credit rating",
];

const RESEARCH_KEYWORDS: &[&str] = &[
    "search", "research", "find", "look up", "recent news", "google",
    "internet", "web", "latest", "current", "today",
];

const DIRECTIVE_KEYWORDS: &[&str] = &[
    "line", "paragraph", "word", "bullet", "table", "format", "summary",
    "brief", "detailed", "simple",
];

/// Keyword-based query classifier
pub struct Router;

impl Router {
    /// Classify a query into a target capability and augment it with any
    /// extracted formatting directives. Total: every query gets a decision.
    pub fn route(query: &str) -> RoutingDecision {
        let query_lower = query.to_lowercase();

        let directives = extract_directives(&query_lower);

        let target = if FINANCIAL_KEYWORDS.iter().any(|kw| query_lower.contains(kw)) {
            Capability::FinancialData
        } else if RESEARCH_KEYWORDS.iter().any(|kw| query_lower.contains(kw)) {
            Capability::ContentSearch
        } else {
            Capability::GeneralConversation
        };

        let augmented_query = match &directives {
            Some(found) => format!("{}\n\n[IMPORTANT: User Instructions: {}]", query, found),
            None => query.to_string(),
        };

        info!(capability = %target, directives = ?directives, "query routed");

        RoutingDecision {
            target,
            augmented_query,
            directives,
        }
    }
}

/// Collect formatting-directive tokens in list order, joined by spaces.
fn extract_directives(query_lower: &str) -> Option<String> {
    let found: Vec<&str> = DIRECTIVE_KEYWORDS
        .iter()
        .filter(|kw| query_lower.contains(**kw))
        .copied()
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found.join(" "))
    }
}
