//! Capability agents and the invocation boundary
//!
//! Each capability is a named answering service invoked with a plain text
//! query. A capability may answer with a rich object (content or message
//! field), a bare string, or anything else; `AgentReply` is the closed set
//! of those shapes and `into_text` is the single normalization rule,
//! applied exactly once at this boundary.

use crate::gemini::GeminiClient;
use crate::models::Capability;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Reply shapes a capability invocation can produce.
#[derive(Debug, Clone)]
pub enum AgentReply {
    /// Rich response object exposing content and/or message fields.
    Rich {
        content: Option<String>,
        message: Option<String>,
    },
    /// Bare string reply.
    Text(String),
    /// Anything else; stringified on extraction.
    Raw(Value),
}

impl AgentReply {
    /// Normalize a reply to plain text. Precedence: content field, bare
    /// string, message field, stringified value.
    pub fn into_text(self) -> String {
        match self {
            AgentReply::Rich {
                content: Some(content),
                ..
            } => content,
            AgentReply::Text(text) => text,
            AgentReply::Rich {
                content: None,
                message: Some(message),
            } => message,
            AgentReply::Rich {
                content: None,
                message: None,
            } => String::new(),
            AgentReply::Raw(value) => match value {
                Value::String(text) => text,
                other => other.to_string(),
            },
        }
    }
}

/// Invocation boundary for capability agents
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, capability: Capability, query: &str) -> Result<AgentReply>;
}

//
// ================= Gemini-backed team =================
//

const FINANCE_ROLE: &str = r#"You are an expert financial analyst.

Guidelines:
- Always fetch and present the actual data, never links or referrals
- Return exact prices with currency symbol and timestamp
- Use ₹ for Indian stocks and $ for US stocks
- Give clear Buy/Hold/Sell guidance with valuation and risk factors
- Structure responses with sections: Price, Valuation, Risks, Recommendation"#;

const SEARCH_ROLE: &str = r#"You are an expert web intelligence agent.

Guidelines:
- Always return the actual data found, never just sources
- Present each value with its source and timestamp
- When asked for a ticker symbol, return the symbol alone
- Provide actionable insights, not raw dumps"#;

const CHAT_ROLE: &str = r#"You are the lead coordinator of a financial intelligence team.

Guidelines:
- Deliver complete, actionable answers in clear language
- Respect user formatting instructions (line limits, bullets, tables)
- Be confident and decisive; avoid disclaimers and redirections"#;

fn role_prompt(capability: Capability) -> &'static str {
    match capability {
        Capability::FinancialData => FINANCE_ROLE,
        Capability::ContentSearch => SEARCH_ROLE,
        Capability::GeneralConversation => CHAT_ROLE,
    }
}

/// The real agent team: three Gemini roles behind one pooled client.
pub struct GeminiAgentTeam {
    client: GeminiClient,
}

impl GeminiAgentTeam {
    pub fn new(api_key: String) -> Self {
        Self {
            client: GeminiClient::new(api_key),
        }
    }
}

#[async_trait]
impl AgentInvoker for GeminiAgentTeam {
    async fn invoke(&self, capability: Capability, query: &str) -> Result<AgentReply> {
        let answer = self.client.generate(role_prompt(capability), query).await?;

        // The Gemini candidate is a rich response carrying its text in a
        // content field.
        Ok(AgentReply::Rich {
            content: Some(answer),
            message: None,
        })
    }
}

//
// ================= Mock team =================
//

/// Mock agent team for development & testing
/// Keeps the router functional without LLM dependency
pub struct MockAgentTeam;

#[async_trait]
impl AgentInvoker for MockAgentTeam {
    async fn invoke(&self, capability: Capability, query: &str) -> Result<AgentReply> {
        Ok(AgentReply::Text(format!(
            "[{}] mock answer for: {}",
            capability.name(),
            query
        )))
    }
}
