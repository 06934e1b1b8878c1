//! HTTP answer service client.
//!
//! Implements the `AnswerClient` trait against the advisory backend's
//! JSON API (`POST /api/chat`, `GET /api/status`, `GET /api/examples`).

mod api;
mod classify;
mod client;
mod config;


pub use client::{HttpAnswerClient, ServiceStatus};
pub use config::HttpAnswerConfig;
