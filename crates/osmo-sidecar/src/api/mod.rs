//! HTTP API surface.

mod server;

pub use server::{create_router, AppState};
