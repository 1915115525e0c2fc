//! Request bodies sent to the TickTrader Web API
//!
//! Field names follow the server's PascalCase JSON convention. Optional fields
//! that are `None` are left out of the serialized body entirely.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Content type used for every JSON request body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

// ============================================================================
// Trade Enums
// ============================================================================

/// Type of trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    Market,
    Limit,
    Stop,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Market => "Market",
            TradeType::Limit => "Limit",
            TradeType::Stop => "Stop",
        }
    }
}

/// Side of trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

/// Paging direction of a trade history request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDirection {
    #[default]
    Forward,
    Backward,
}

/// Kind of trade deletion, sent as the `type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTradeType {
    Cancel,
    Close,
    CloseBy,
}

impl DeleteTradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteTradeType::Cancel => "Cancel",
            DeleteTradeType::Close => "Close",
            DeleteTradeType::CloseBy => "CloseBy",
        }
    }
}

// ============================================================================
// Create / Modify
// ============================================================================

/// New trade request
///
/// `price` is ignored by the server for `Market` trades. `immediate_or_cancel`
/// only applies to `Limit` trades and `expired_timestamp` (milliseconds since
/// the Unix epoch) only to pending (`Limit`, `Stop`) trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTradeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "Type")]
    pub trade_type: TradeType,
    pub side: TradeSide,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immediate_or_cancel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateTradeRequest {
    pub fn new(
        trade_type: TradeType,
        side: TradeSide,
        symbol: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            client_id: None,
            trade_type,
            side,
            symbol: symbol.into(),
            price: None,
            amount,
            stop_loss: None,
            take_profit: None,
            expired_timestamp: None,
            immediate_or_cancel: None,
            comment: None,
        }
    }

    /// Market trade at the current price
    pub fn market(side: TradeSide, symbol: impl Into<String>, amount: f64) -> Self {
        Self::new(TradeType::Market, side, symbol, amount)
    }

    /// Pending limit trade
    pub fn limit(side: TradeSide, symbol: impl Into<String>, price: f64, amount: f64) -> Self {
        Self::new(TradeType::Limit, side, symbol, amount).with_price(price)
    }

    /// Pending stop trade
    pub fn stop(side: TradeSide, symbol: impl Into<String>, price: f64, amount: f64) -> Self {
        Self::new(TradeType::Stop, side, symbol, amount).with_price(price)
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_take_profit(mut self, take_profit: f64) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    pub fn with_expiration(mut self, expired_timestamp: i64) -> Self {
        self.expired_timestamp = Some(expired_timestamp);
        self
    }

    pub fn with_immediate_or_cancel(mut self, immediate_or_cancel: bool) -> Self {
        self.immediate_or_cancel = Some(immediate_or_cancel);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Modify trade request. Price of `Market` trades cannot be changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyTradeRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ModifyTradeRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            price: None,
            stop_loss: None,
            take_profit: None,
            expired_timestamp: None,
            comment: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_take_profit(mut self, take_profit: f64) -> Self {
        self.take_profit = Some(take_profit);
        self
    }

    pub fn with_expiration(mut self, expired_timestamp: i64) -> Self {
        self.expired_timestamp = Some(expired_timestamp);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

// ============================================================================
// Trade History
// ============================================================================

/// Trade history request
///
/// Without timestamp bounds the server reads from the beginning (`Forward`) or
/// from now (`Backward`). Reports come in pages of 100; pass the id of the last
/// processed record as `request_from_id` to get the next page. The last page
/// has `IsLastReport` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeHistoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_direction: Option<RequestDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_from_id: Option<String>,
}

impl TradeHistoryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, timestamp_from: i64, timestamp_to: i64) -> Self {
        self.timestamp_from = Some(timestamp_from);
        self.timestamp_to = Some(timestamp_to);
        self
    }

    pub fn with_from(mut self, timestamp_from: i64) -> Self {
        self.timestamp_from = Some(timestamp_from);
        self
    }

    pub fn with_to(mut self, timestamp_to: i64) -> Self {
        self.timestamp_to = Some(timestamp_to);
        self
    }

    pub fn with_direction(mut self, direction: RequestDirection) -> Self {
        self.request_direction = Some(direction);
        self
    }

    /// Continue after the given trade history record id
    pub fn after(mut self, request_from_id: impl Into<String>) -> Self {
        self.request_from_id = Some(request_from_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trade_json_field_names() {
        let request = CreateTradeRequest::limit(TradeSide::Buy, "EURUSD", 1.1, 10000.0)
            .with_client_id("my-trade-1")
            .with_immediate_or_cancel(true);

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"ClientId":"my-trade-1","Type":"Limit","Side":"Buy","Symbol":"EURUSD","Price":1.1,"Amount":10000.0,"ImmediateOrCancel":true}"#
        );
    }

    #[test]
    fn test_market_trade_omits_unset_fields() {
        let request = CreateTradeRequest::market(TradeSide::Sell, "EURUSD", 1000.0);
        let parsed: serde_json::Value = serde_json::to_value(&request).unwrap();

        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(parsed["Type"], "Market");
        assert_eq!(parsed["Side"], "Sell");
        assert!(object.get("Price").is_none());
        assert!(object.get("Comment").is_none());
    }

    #[test]
    fn test_modify_trade_json() {
        let request = ModifyTradeRequest::new(42)
            .with_stop_loss(1.05)
            .with_comment("tighten");

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"Id":42,"StopLoss":1.05,"Comment":"tighten"}"#);
    }

    #[test]
    fn test_trade_history_json() {
        assert_eq!(
            serde_json::to_string(&TradeHistoryRequest::new()).unwrap(),
            "{}"
        );

        let request = TradeHistoryRequest::new()
            .between(1_500_000_000_000, 1_600_000_000_000)
            .with_direction(RequestDirection::Backward)
            .after("123-456");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"TimestampFrom":1500000000000,"TimestampTo":1600000000000,"RequestDirection":"Backward","RequestFromId":"123-456"}"#
        );
    }

    #[test]
    fn test_default_direction_is_forward() {
        assert_eq!(RequestDirection::default(), RequestDirection::Forward);
    }

    #[test]
    fn test_delete_trade_type_names() {
        assert_eq!(DeleteTradeType::Cancel.as_str(), "Cancel");
        assert_eq!(DeleteTradeType::Close.as_str(), "Close");
        assert_eq!(DeleteTradeType::CloseBy.as_str(), "CloseBy");
    }
}
