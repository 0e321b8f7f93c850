//! Turn-based prompt formatting for the `/complete` endpoint.

/// Participant in a completion-style conversation.
///
/// Distinct from [`models::message::Role`](crate::models::message::Role):
/// the legacy prompt format spells roles `Human`/`Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Human,
    Assistant,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Human => f.write_str("Human"),
            Speaker::Assistant => f.write_str("Assistant"),
        }
    }
}

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
}

/// Ordered conversation history that renders into the prompt format the
/// `/complete` endpoint expects.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn add_message(&mut self, speaker: Speaker, content: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            content: content.into(),
        });
    }

    /// Turns recorded so far.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Render the conversation as a completion prompt.
    ///
    /// Each turn becomes `\n\n{Speaker}: {content}`; the prompt always ends
    /// with an empty `Assistant:` turn marking where the completion goes.
    pub fn generate_prompt(&self) -> String {
        let mut prompt = String::new();
        for turn in &self.turns {
            prompt.push_str(&format!("\n\n{}: {}", turn.speaker, turn.content));
        }
        prompt.push_str("\n\nAssistant:");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conversation_prompt() {
        let conversation = Conversation::new();
        assert_eq!(conversation.generate_prompt(), "\n\nAssistant:");
    }

    #[test]
    fn test_multi_turn_prompt() {
        let mut conversation = Conversation::new();
        conversation.add_message(Speaker::Human, "Hello");
        conversation.add_message(Speaker::Assistant, "Hi! How can I help?");
        conversation.add_message(Speaker::Human, "Tell me a joke.");

        assert_eq!(
            conversation.generate_prompt(),
            "\n\nHuman: Hello\n\nAssistant: Hi! How can I help?\n\nHuman: Tell me a joke.\n\nAssistant:"
        );
    }
}
