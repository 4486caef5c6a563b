/// Prompt assembly for the workflow assistant
///
/// The system prompt carries the assistant rules, the serialized current
/// flow, and the full conversation transcript; the user prompt restates
/// the latest request. The LLM is asked to answer with markdown prose
/// around a complete workflow JSON object, which the extractor then takes
/// apart again.

use crate::flow::Flow;
use serde::{Deserialize, Serialize};

/// One turn of the conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "assistant"
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Build the system prompt embedding flow state and history
pub fn system_prompt(flow: &Flow, history: &[ChatMessage]) -> String {
    let flow_json =
        serde_json::to_string_pretty(flow).unwrap_or_else(|_| "{}".to_string());
    let transcript = history
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert n8n workflow assistant. You help users create, modify, \
and optimize n8n workflows through natural conversation.\n\n\
IMPORTANT RULES:\n\
1. Always respond with a valid, complete n8n workflow JSON\n\
2. Consider the full conversation history to avoid repeating yourself\n\
3. When modifying workflows, explain what you changed and suggest next steps\n\
4. Be helpful and proactive in suggesting improvements\n\
5. Format your conversational explanation using Markdown for clarity\n\
6. Format your response as: [Markdown explanation] [JSON object] [more Markdown if needed]\n\n\
Current workflow JSON:\n{flow_json}\n\n\
Full conversation history:\n{transcript}\n\n\
Please respond with a conversational explanation (in Markdown) followed by the updated workflow JSON."
    )
}

/// Build the user prompt from the latest message in the transcript
pub fn user_prompt(history: &[ChatMessage]) -> String {
    let latest = history
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    format!(
        "Based on the conversation history and current workflow, please help with: {latest}"
    )
}
