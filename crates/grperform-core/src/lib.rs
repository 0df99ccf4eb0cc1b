//! Core proxy engine for the GR Perform AI proxy.
//!
//! Everything lives under [`proxy`]: request validation, the process-wide
//! throttle gate, the three provider adapters, the 429 retry policy and the
//! fallback-aware router.

pub mod proxy;
