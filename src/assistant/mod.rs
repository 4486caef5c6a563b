/// Conversational workflow assistant
///
/// Invokes the LLM with the current flow and chat history, then recovers
/// a usable document from whatever text comes back. The recovered flow is
/// normalized and wired up before it reaches the editing session.

// Anthropic API client with timeout
pub mod client;

// Three-tier flow recovery from free-form text
pub mod extract;

// System/user prompt assembly
pub mod prompt;

pub use client::ChatClient;
pub use extract::{extract, ExtractError, Extraction};
pub use prompt::{ChatMessage, ChatRole};

use crate::flow::{repair, Flow};
use anyhow::Result;

/// Outcome of one assistant turn
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// Updated flow, already normalized and repaired
    pub flow: Flow,
    /// Conversational explanation for the chat transcript
    pub message: String,
    /// Unmodified assistant text, kept for diagnostics
    pub raw: String,
}

/// Run one full assistant turn: prompt, complete, extract, repair
pub async fn respond(
    client: &ChatClient,
    flow: &Flow,
    history: &[ChatMessage],
) -> Result<AssistantReply> {
    let system = prompt::system_prompt(flow, history);
    let user = prompt::user_prompt(history);

    let raw = client.complete(&system, &user).await?;

    let extraction = extract::extract(&raw, flow)?;
    Ok(AssistantReply {
        flow: repair::repair(extraction.flow),
        message: extraction.message,
        raw,
    })
}
