//! Shared types for the GR Perform AI proxy.
//!
//! - [`protocol`]: the canonical chat-completion schema plus the vendor wire
//!   formats the adapters translate to and from.
//! - [`error`]: the proxy error taxonomy with its HTTP status mapping.

pub mod error;
pub mod protocol;

pub use error::ProxyError;
pub use protocol::chat::{
    AssistantMessage, CanonicalResponse, ChatMessage, ChatRequest, ChatRole, Choice, Usage,
};
