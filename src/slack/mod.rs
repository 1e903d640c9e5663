//! Slack message formatting and webhook payloads

pub mod message_formatter;
pub mod response_builder;

pub use message_formatter::format_release_message;
