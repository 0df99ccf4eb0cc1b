//! Proxy engine: validate → throttle → adapter call → retry/fallback.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod router;
pub mod throttle;
pub mod validate;

pub use adapters::{ProviderAdapter, ProviderKind};
pub use config::{AiConfig, GeminiConfig, GroqConfig, OllamaConfig};
pub use router::{ChatFailure, ChatRouter};
pub use throttle::ThrottleGate;
pub use validate::{parse_chat_request, MAX_BODY_BYTES};
