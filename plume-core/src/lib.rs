pub mod citation;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod markdown;
pub mod model;
pub mod render;
pub mod session;
pub mod theme;

pub use citation::extract;
pub use client::{CompletionApi, DEFAULT_API_URL, GeminiClient};
pub use config::Config;
pub use controller::{APOLOGY_MESSAGE, ChatSession, ControllerState, DisplaySurface};
pub use error::{PlumeError, Result};
pub use markdown::{enhance, highlight, render_markdown};
pub use model::{
    Content, ExtractionResult, Part, Reference, RenderedMessage, Role, Turn,
};
pub use render::render;
pub use session::Conversation;
pub use theme::{ThemePreference, ThemeStore};
