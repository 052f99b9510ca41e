use crate::error::PlumeError;
use crate::model::{Content, RenderedMessage, Role};
use crate::render;
use crate::session::Conversation;

/// Fixed user-visible failure message; every completion error collapses to it.
pub const APOLOGY_MESSAGE: &str = "Désolé, une erreur s'est produite. Veuillez réessayer.";

/// Capability interface the controller drives. The core never touches a
/// concrete UI toolkit.
pub trait DisplaySurface {
    fn show_message(&mut self, message: &RenderedMessage);
    fn show_pending(&mut self);
    fn clear_pending(&mut self);
    fn clear_all(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse,
}

/// One chat session: the conversation history plus the controller state
/// machine. At most one completion call is outstanding; a submit while
/// awaiting is dropped silently and the user's input is left untouched.
pub struct ChatSession {
    conversation: Conversation,
    state: ControllerState,
    pending_text: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            state: ControllerState::Idle,
            pending_text: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Idle + non-empty input: shows the user's message and the pending
    /// indicator, moves to `AwaitingResponse`, and returns the payload for
    /// the completion call. Anything else is a silent no-op.
    pub fn submit(&mut self, text: &str, surface: &mut dyn DisplaySurface) -> Option<Vec<Content>> {
        let text = text.trim();
        if text.is_empty() || self.state == ControllerState::AwaitingResponse {
            return None;
        }

        surface.show_message(&render::render(Role::User, text));
        surface.show_pending();

        let payload = self.conversation.build_request_payload(text);
        self.pending_text = Some(text.to_string());
        self.state = ControllerState::AwaitingResponse;
        Some(payload)
    }

    /// The completion call succeeded: show the reply and record the exchange,
    /// user turn first.
    pub fn complete(&mut self, reply: &str, surface: &mut dyn DisplaySurface) {
        if self.state != ControllerState::AwaitingResponse {
            return;
        }

        surface.clear_pending();
        surface.show_message(&render::render(Role::Assistant, reply));

        if let Some(text) = self.pending_text.take() {
            self.conversation.append_turn(Role::User, text);
            self.conversation.append_turn(Role::Assistant, reply);
        }
        self.state = ControllerState::Idle;
    }

    /// The completion call failed: show the apology as an assistant message.
    /// The failed exchange is not recorded, so future payloads are unaffected.
    pub fn fail(&mut self, err: &PlumeError, surface: &mut dyn DisplaySurface) {
        if self.state != ControllerState::AwaitingResponse {
            return;
        }

        log::error!("completion call failed: {err}");
        surface.clear_pending();
        surface.show_message(&render::render(Role::Assistant, APOLOGY_MESSAGE));

        self.pending_text = None;
        self.state = ControllerState::Idle;
    }

    /// Empties the display and the history. Disallowed while a response is
    /// outstanding.
    pub fn clear_conversation(&mut self, surface: &mut dyn DisplaySurface) {
        if self.state == ControllerState::AwaitingResponse {
            return;
        }
        self.conversation.clear();
        surface.clear_all();
    }
}
