//! Prompt templates for RAG generation

use crate::providers::ChatMessage;
use crate::types::RetrievedDocument;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved passages into one context block, nearest first
    pub fn build_context(documents: &[RetrievedDocument]) -> String {
        documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the user prompt around the question and its context
    ///
    /// Body lines carry a four-space indent and the prompt ends with an indented blank line.
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "You are an AI assistant. Answer the question with well-structured details.\n    \n    \
             Question: {question}\n    \
             Retrieved Information: {context}\n\n    \
             Explain the answer clearly, expanding when necessary.\n    \
             Answer:\n    ",
            question = question,
            context = context
        )
    }

    /// Two-message exchange: system framing followed by the templated user prompt
    pub fn build_messages(
        system_prompt: &str,
        question: &str,
        documents: &[RetrievedDocument],
    ) -> Vec<ChatMessage> {
        let context = Self::build_context(documents);
        vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(Self::build_rag_prompt(question, &context)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ChatRole;

    fn doc(id: usize, text: &str) -> RetrievedDocument {
        RetrievedDocument {
            id,
            text: text.to_string(),
            distance: 0.0,
            similarity: 1.0,
        }
    }

    #[test]
    fn test_context_space_joined_in_order() {
        let docs = vec![
            doc(3, "The Moon landing happened in 1969."),
            doc(0, "Water boils at 100 degrees Celsius at sea level."),
        ];
        assert_eq!(
            PromptBuilder::build_context(&docs),
            "The Moon landing happened in 1969. Water boils at 100 degrees Celsius at sea level."
        );
    }

    #[test]
    fn test_prompt_contains_query_and_context() {
        let prompt = PromptBuilder::build_rag_prompt("When?", "In 1969.");
        assert!(prompt.starts_with("You are an AI assistant."));
        assert!(prompt.contains("Question: When?\n"));
        assert!(prompt.contains("Retrieved Information: In 1969.\n"));
        assert!(prompt.contains("Explain the answer clearly"));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn test_prompt_exact_layout() {
        let prompt = PromptBuilder::build_rag_prompt("When?", "In 1969.");
        let expected = [
            "You are an AI assistant. Answer the question with well-structured details.",
            "    ",
            "    Question: When?",
            "    Retrieved Information: In 1969.",
            "",
            "    Explain the answer clearly, expanding when necessary.",
            "    Answer:",
            "    ",
        ]
        .join("\n");
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_messages_roles() {
        let messages = PromptBuilder::build_messages(
            "You are a helpful assistant.",
            "When?",
            &[doc(3, "The Moon landing happened in 1969.")],
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, "You are a helpful assistant.");
        assert_eq!(messages[1].role, ChatRole::User);
        assert!(messages[1].content.contains("The Moon landing happened in 1969."));
    }
}
