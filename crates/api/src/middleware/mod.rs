//! HTTP middleware and request extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (all origins, methods and headers)
//! 3. `TraceLayer` (request span with status and latency)
//!
//! The stack is assembled in [`crate::routes::app`].

pub mod auth;

pub use auth::UnverifiedBearerToken;
