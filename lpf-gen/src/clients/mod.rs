//! HTTP clients for external providers
//!
//! Each client wraps a reqwest `Client` with an explicit timeout, typed
//! response structs, and taxonomy-mapped errors. Base URLs are
//! configurable so the external contracts stay best-effort mappings.

pub mod gemini;
pub mod newsapi;
pub mod supabase;
