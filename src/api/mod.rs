//! Handlers for slash commands, button clicks and direct messages

pub mod event_handler;
pub mod interactive_handler;
pub mod slash_handler;

pub use event_handler::handle_direct_message;
pub use interactive_handler::handle_public_repost;
pub use slash_handler::handle_ai_command;
