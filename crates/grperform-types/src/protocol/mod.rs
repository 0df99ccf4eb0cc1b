//! Protocol type definitions.
//!
//! The canonical schema lives in [`chat`]; every adapter produces it
//! regardless of upstream vendor. [`ollama`] and [`gemini`] hold the upstream
//! wire shapes for the two vendors whose formats differ from the canonical
//! one (the OpenAI-compatible upstream speaks the canonical shape natively).

pub mod chat;
pub mod gemini;
pub mod ollama;
