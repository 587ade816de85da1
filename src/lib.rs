//! # os-tracker
//!
//! REST API and WebSocket backend for tracking workshop service orders.
//!
//! Users, service orders and their comments live in process memory.
//! Every successful order mutation is announced to connected realtime
//! clients, and unmatched paths serve the bundled single-page frontend.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)  ── Actor extractor (auth)
//!     ├── WS Handler (ws/)      ── OriginPolicy (cors)
//!     │
//!     ├── OrderService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── Store (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod cors;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
