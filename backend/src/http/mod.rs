//! HTTP server module for the task service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - JSON extraction, rejection mapping                     │
//! │  - CORS, compression, tracing                             │
//! │  - Generated API docs                                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Validation (services::validation)                        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service + Repository Layer (db/)                         │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod docs;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use docs::ApiDoc;
pub use error::AppError;
pub use router::create_router;
pub use state::AppState;
