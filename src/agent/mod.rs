//! Conversational turn handling

mod runner;

pub use runner::{Chatbot, TurnReply};
