//! Endpoint table of the TickTrader Web API
//!
//! Every client operation is described here as an [`ApiRequest`]: verb, path
//! (with query) and optional JSON body, plus whether it has to be signed.
//! Nothing in this module touches the network.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::Serialize;
use ticktrader_core::{
    CreateTradeRequest, DeleteTradeType, ModifyTradeRequest, Result, TradeHistoryRequest,
};

const API_PREFIX: &str = "/api/v1";

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a name-keyed path segment twice.
///
/// The server decodes these segments twice, so `EUR/USD` goes out as
/// `EUR%252FUSD`. Keep it this way for wire compatibility.
pub fn encode_path_segment(value: &str) -> String {
    let once = utf8_percent_encode(value, URI_COMPONENT).to_string();
    utf8_percent_encode(&once, URI_COMPONENT).to_string()
}

// ============================================================================
// Request Descriptor
// ============================================================================

/// Whether a request carries an `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Signed,
}

/// HTTP request descriptor for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base address, including any query string
    pub path: String,
    /// Serialized JSON body
    pub body: Option<String>,
    pub auth: Auth,
}

impl ApiRequest {
    fn new(method: Method, path: String, auth: Auth) -> Self {
        Self {
            method,
            path,
            body: None,
            auth,
        }
    }

    fn public(path: String) -> Self {
        Self::new(Method::GET, path, Auth::Public)
    }

    fn signed(method: Method, path: String) -> Self {
        Self::new(method, path, Auth::Signed)
    }

    fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    pub fn is_signed(&self) -> bool {
        self.auth == Auth::Signed
    }

    /// Absolute URL under the given base address
    pub fn url(&self, address: &str) -> String {
        format!("{}{}", address, self.path)
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Collections that can be listed or looked up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Currency,
    Symbol,
    Tick,
    Level2,
    /// Cash accounts only
    Asset,
    /// Net accounts only
    Position,
}

impl Resource {
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Currency => "currency",
            Resource::Symbol => "symbol",
            Resource::Tick => "tick",
            Resource::Level2 => "level2",
            Resource::Asset => "asset",
            Resource::Position => "position",
        }
    }
}

// ============================================================================
// Public Endpoints
// ============================================================================

pub fn public_trade_session() -> ApiRequest {
    ApiRequest::public(format!("{}/public/tradesession", API_PREFIX))
}

pub fn public_list(resource: Resource) -> ApiRequest {
    ApiRequest::public(format!("{}/public/{}", API_PREFIX, resource.segment()))
}

pub fn public_by_name(resource: Resource, name: &str) -> ApiRequest {
    ApiRequest::public(format!(
        "{}/public/{}/{}",
        API_PREFIX,
        resource.segment(),
        encode_path_segment(name)
    ))
}

// ============================================================================
// Account Endpoints
// ============================================================================

pub fn account() -> ApiRequest {
    ApiRequest::signed(Method::GET, format!("{}/account", API_PREFIX))
}

pub fn trade_session() -> ApiRequest {
    ApiRequest::signed(Method::GET, format!("{}/tradesession", API_PREFIX))
}

pub fn list(resource: Resource) -> ApiRequest {
    ApiRequest::signed(
        Method::GET,
        format!("{}/{}", API_PREFIX, resource.segment()),
    )
}

pub fn by_name(resource: Resource, name: &str) -> ApiRequest {
    ApiRequest::signed(
        Method::GET,
        format!(
            "{}/{}/{}",
            API_PREFIX,
            resource.segment(),
            encode_path_segment(name)
        ),
    )
}

// ============================================================================
// Trade Endpoints
// ============================================================================

pub fn all_trades() -> ApiRequest {
    ApiRequest::signed(Method::GET, format!("{}/trade", API_PREFIX))
}

pub fn trade(trade_id: i64) -> ApiRequest {
    ApiRequest::signed(Method::GET, format!("{}/trade/{}", API_PREFIX, trade_id))
}

pub fn create_trade(request: &CreateTradeRequest) -> Result<ApiRequest> {
    ApiRequest::signed(Method::POST, format!("{}/trade", API_PREFIX)).with_json(request)
}

pub fn modify_trade(request: &ModifyTradeRequest) -> Result<ApiRequest> {
    ApiRequest::signed(Method::PUT, format!("{}/trade", API_PREFIX)).with_json(request)
}

fn delete_trade(kind: DeleteTradeType, trade_id: i64) -> String {
    format!(
        "{}/trade?type={}&id={}",
        API_PREFIX,
        kind.as_str(),
        trade_id
    )
}

pub fn cancel_trade(trade_id: i64) -> ApiRequest {
    ApiRequest::signed(
        Method::DELETE,
        delete_trade(DeleteTradeType::Cancel, trade_id),
    )
}

/// Close a market trade, partially when `amount` is given
pub fn close_trade(trade_id: i64, amount: Option<f64>) -> ApiRequest {
    let mut path = delete_trade(DeleteTradeType::Close, trade_id);
    if let Some(amount) = amount {
        path.push_str(&format!("&amount={}", amount));
    }
    ApiRequest::signed(Method::DELETE, path)
}

pub fn close_by_trade(trade_id: i64, by_trade_id: i64) -> ApiRequest {
    let mut path = delete_trade(DeleteTradeType::CloseBy, trade_id);
    path.push_str(&format!("&byid={}", by_trade_id));
    ApiRequest::signed(Method::DELETE, path)
}

pub fn trade_history(request: &TradeHistoryRequest) -> Result<ApiRequest> {
    ApiRequest::signed(Method::POST, format!("{}/tradehistory", API_PREFIX)).with_json(request)
}

pub fn trade_history_by_trade_id(
    trade_id: i64,
    request: &TradeHistoryRequest,
) -> Result<ApiRequest> {
    ApiRequest::signed(
        Method::POST,
        format!("{}/tradehistory/{}", API_PREFIX, trade_id),
    )
    .with_json(request)
}
