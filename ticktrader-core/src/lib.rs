//! Core types for the TickTrader Web API client
//!
//! This crate defines the request bodies sent to the Web API and the
//! client-wide error type.

pub mod error;
pub mod types;

pub use error::{Result, TickTraderError};
pub use types::{
    CreateTradeRequest, DeleteTradeType, ModifyTradeRequest, RequestDirection, TradeHistoryRequest,
    TradeSide, TradeType, JSON_CONTENT_TYPE,
};
