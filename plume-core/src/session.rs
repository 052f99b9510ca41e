use crate::model::{Content, Role, Turn};

/// Ordered turn history for one chat. One conversation has one exclusive
/// owner; turns are only ever appended or cleared wholesale.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_turn(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn {
            role,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Request payload for the next completion call: every stored turn in
    /// wire form, then `next_user_text` as a final user entry. History is not
    /// mutated here; the pending turn is recorded only after a successful
    /// response.
    pub fn build_request_payload(&self, next_user_text: &str) -> Vec<Content> {
        let mut contents: Vec<Content> = self.turns.iter().map(Content::from_turn).collect();
        contents.push(Content::user(next_user_text));
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::Conversation;
    use crate::model::Role;

    #[test]
    fn payload_is_history_plus_pending_text() {
        let mut conversation = Conversation::new();
        conversation.append_turn(Role::User, "question une");
        conversation.append_turn(Role::Assistant, "réponse une");
        conversation.append_turn(Role::User, "question deux");
        conversation.append_turn(Role::Assistant, "réponse deux");

        let payload = conversation.build_request_payload("question trois");

        assert_eq!(payload.len(), 2 * 2 + 1);
        let roles: Vec<&str> = payload.iter().map(|content| content.role).collect();
        assert_eq!(roles, vec!["user", "model", "user", "model", "user"]);
        assert_eq!(payload[4].parts[0].text, "question trois");
    }

    #[test]
    fn payload_does_not_append_to_history() {
        let conversation = Conversation::new();
        let _ = conversation.build_request_payload("hi");
        assert!(conversation.turns().is_empty());
    }

    #[test]
    fn clear_then_payload_yields_single_user_entry() {
        let mut conversation = Conversation::new();
        conversation.append_turn(Role::User, "ancien");
        conversation.append_turn(Role::Assistant, "historique");
        conversation.clear();

        let payload = conversation.build_request_payload("hi");
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].role, "user");
        assert_eq!(payload[0].parts[0].text, "hi");
    }
}
