//! HTMX request extractors and response helpers
//!
//! Builds on `axum-htmx`: the extractors and response headers used by the
//! handlers are re-exported here next to the local [`HxSwapOob`] container.

mod swap_oob;

pub use swap_oob::{HxSwapOob, SwapStrategy};

pub use axum_htmx::{HxHistoryRestoreRequest, HxRequest, HxResponseTrigger};

/// Event fired on the client after any successful profile mutation
pub const USERS_CHANGED_EVENT: &str = "users-changed";
