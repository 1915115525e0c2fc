//! TickTrader Web API client
//!
//! This crate provides a client for the TickTrader Web API: public market
//! data, account information and trade management. Private requests are
//! signed with HMAC-SHA256 using the account's Web API id, key and secret.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod transport;

pub use auth::{sign, Credentials};
pub use client::TickTraderClient;
pub use config::ClientConfig;
pub use endpoints::{ApiRequest, Auth, Resource};
pub use transport::{ApiResponse, HttpRequest, HttpTransport, ReqwestTransport};

pub use ticktrader_core::*;
