//! TickTrader Web API client
//!
//! Provides one method per Web API operation. Public market data methods are
//! sent as-is; account and trading methods are signed with the configured
//! credentials. Every method resolves to the raw [`ApiResponse`] or the
//! transport's failure.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use ticktrader_core::{
    CreateTradeRequest, ModifyTradeRequest, Result, TickTraderError, TradeHistoryRequest,
    JSON_CONTENT_TYPE,
};
use tracing::{debug, instrument};

use crate::auth::{self, current_timestamp_millis};
use crate::config::ClientConfig;
use crate::endpoints::{self, ApiRequest, Resource};
use crate::transport::{ApiResponse, HttpRequest, HttpTransport, ReqwestTransport};

/// TickTrader Web API client
pub struct TickTraderClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl TickTraderClient<ReqwestTransport> {
    /// Create a client using the default reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from `TICKTRADER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: HttpTransport> TickTraderClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base address
    pub fn address(&self) -> &str {
        self.config.address()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Request Preparation
    // ========================================================================

    /// Resolve a descriptor into a wire request, signing it with the current time
    pub fn prepare(&self, request: &ApiRequest) -> Result<HttpRequest> {
        self.prepare_at(request, current_timestamp_millis())
    }

    /// Resolve a descriptor into a wire request, signing it with `timestamp_millis`
    pub fn prepare_at(&self, request: &ApiRequest, timestamp_millis: i64) -> Result<HttpRequest> {
        let url = request.url(self.config.address());
        let mut headers = HeaderMap::new();

        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        if request.is_signed() {
            let authorization = auth::sign(
                request.method.as_str(),
                &url,
                request.body.as_deref(),
                self.config.credentials(),
                timestamp_millis,
            )?;
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&authorization).map_err(|e| {
                    TickTraderError::signing(format!("Invalid header value: {}", e))
                })?,
            );
        }

        Ok(HttpRequest {
            method: request.method.clone(),
            url,
            headers,
            body: request.body.clone(),
        })
    }

    /// Prepare and send a request
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let http_request = self.prepare(&request)?;
        debug!(
            "Sending {} {} (signed: {})",
            http_request.method,
            http_request.url,
            request.is_signed()
        );
        self.transport.send(http_request).await
    }

    // ========================================================================
    // Public Market Data
    // ========================================================================

    /// Get public trade session information
    #[instrument(skip(self))]
    pub async fn get_public_trade_session(&self) -> Result<ApiResponse> {
        self.execute(endpoints::public_trade_session()).await
    }

    /// Get list of all available public currencies
    #[instrument(skip(self))]
    pub async fn get_public_all_currencies(&self) -> Result<ApiResponse> {
        self.execute(endpoints::public_list(Resource::Currency)).await
    }

    /// Get public currency by name
    #[instrument(skip(self))]
    pub async fn get_public_currency(&self, currency: &str) -> Result<ApiResponse> {
        self.execute(endpoints::public_by_name(Resource::Currency, currency))
            .await
    }

    /// Get list of all available public symbols
    #[instrument(skip(self))]
    pub async fn get_public_all_symbols(&self) -> Result<ApiResponse> {
        self.execute(endpoints::public_list(Resource::Symbol)).await
    }

    /// Get public symbol by name
    #[instrument(skip(self))]
    pub async fn get_public_symbol(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::public_by_name(Resource::Symbol, symbol))
            .await
    }

    /// Get list of all available public feed ticks
    #[instrument(skip(self))]
    pub async fn get_public_all_ticks(&self) -> Result<ApiResponse> {
        self.execute(endpoints::public_list(Resource::Tick)).await
    }

    /// Get public feed tick by symbol name
    #[instrument(skip(self))]
    pub async fn get_public_tick(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::public_by_name(Resource::Tick, symbol))
            .await
    }

    /// Get list of all available public feed level2 ticks
    #[instrument(skip(self))]
    pub async fn get_public_all_ticks_level2(&self) -> Result<ApiResponse> {
        self.execute(endpoints::public_list(Resource::Level2)).await
    }

    /// Get public feed level2 tick by symbol name
    #[instrument(skip(self))]
    pub async fn get_public_tick_level2(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::public_by_name(Resource::Level2, symbol))
            .await
    }

    // ========================================================================
    // Account (signed)
    // ========================================================================

    /// Get account information
    #[instrument(skip(self))]
    pub async fn get_account(&self) -> Result<ApiResponse> {
        self.execute(endpoints::account()).await
    }

    /// Get trade session information
    #[instrument(skip(self))]
    pub async fn get_trade_session(&self) -> Result<ApiResponse> {
        self.execute(endpoints::trade_session()).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_currencies(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Currency)).await
    }

    #[instrument(skip(self))]
    pub async fn get_currency(&self, currency: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Currency, currency))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_symbols(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Symbol)).await
    }

    #[instrument(skip(self))]
    pub async fn get_symbol(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Symbol, symbol)).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_ticks(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Tick)).await
    }

    #[instrument(skip(self))]
    pub async fn get_tick(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Tick, symbol)).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_ticks_level2(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Level2)).await
    }

    #[instrument(skip(self))]
    pub async fn get_tick_level2(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Level2, symbol)).await
    }

    /// Get all cash account assets (currency with amount). Cash accounts only.
    #[instrument(skip(self))]
    pub async fn get_all_assets(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Asset)).await
    }

    /// Get cash account asset by currency name. Cash accounts only.
    #[instrument(skip(self))]
    pub async fn get_asset(&self, currency: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Asset, currency)).await
    }

    /// Get all positions. Net accounts only.
    #[instrument(skip(self))]
    pub async fn get_all_positions(&self) -> Result<ApiResponse> {
        self.execute(endpoints::list(Resource::Position)).await
    }

    /// Get position by symbol. Net accounts only.
    #[instrument(skip(self))]
    pub async fn get_position(&self, symbol: &str) -> Result<ApiResponse> {
        self.execute(endpoints::by_name(Resource::Position, symbol))
            .await
    }

    // ========================================================================
    // Trading (signed)
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_all_trades(&self) -> Result<ApiResponse> {
        self.execute(endpoints::all_trades()).await
    }

    #[instrument(skip(self))]
    pub async fn get_trade(&self, trade_id: i64) -> Result<ApiResponse> {
        self.execute(endpoints::trade(trade_id)).await
    }

    /// Create a new trade
    #[instrument(skip(self))]
    pub async fn create_trade(&self, request: &CreateTradeRequest) -> Result<ApiResponse> {
        self.execute(endpoints::create_trade(request)?).await
    }

    /// Modify an existing trade
    #[instrument(skip(self))]
    pub async fn modify_trade(&self, request: &ModifyTradeRequest) -> Result<ApiResponse> {
        self.execute(endpoints::modify_trade(request)?).await
    }

    /// Cancel a pending trade
    #[instrument(skip(self))]
    pub async fn cancel_trade(&self, trade_id: i64) -> Result<ApiResponse> {
        self.execute(endpoints::cancel_trade(trade_id)).await
    }

    /// Close a market trade, partially when `amount` is given
    #[instrument(skip(self))]
    pub async fn close_trade(&self, trade_id: i64, amount: Option<f64>) -> Result<ApiResponse> {
        self.execute(endpoints::close_trade(trade_id, amount)).await
    }

    /// Close a market trade by another one
    #[instrument(skip(self))]
    pub async fn close_by_trade(&self, trade_id: i64, by_trade_id: i64) -> Result<ApiResponse> {
        self.execute(endpoints::close_by_trade(trade_id, by_trade_id))
            .await
    }

    /// Get one page of account trade history
    ///
    /// Pages hold up to 100 records. Feed the id of the last record back via
    /// [`TradeHistoryRequest::after`] until the report has `IsLastReport` set.
    #[instrument(skip(self))]
    pub async fn get_trade_history(&self, request: &TradeHistoryRequest) -> Result<ApiResponse> {
        self.execute(endpoints::trade_history(request)?).await
    }

    /// Get one page of trade history for a single trade
    #[instrument(skip(self))]
    pub async fn get_trade_history_by_trade_id(
        &self,
        trade_id: i64,
        request: &TradeHistoryRequest,
    ) -> Result<ApiResponse> {
        self.execute(endpoints::trade_history_by_trade_id(trade_id, request)?)
            .await
    }
}

impl<T> Clone for TickTraderClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for TickTraderClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickTraderClient")
            .field("address", &self.config.address())
            .field("credentials", self.config.credentials())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use ticktrader_core::TradeSide;

    fn client() -> TickTraderClient {
        let config = ClientConfig::new("http://x", Credentials::new("A", "B", "C")).unwrap();
        TickTraderClient::new(config).unwrap()
    }

    #[test]
    fn test_prepare_signed_get() {
        let request = client().prepare_at(&endpoints::account(), 1000).unwrap();

        assert_eq!(request.url, "http://x/api/v1/account");
        assert_eq!(
            request.headers.get(AUTHORIZATION).unwrap(),
            "HMAC A:B:1000:Jp6Daa3arar8KkxwSYT8p2uwtHp5gG/SNzG/EdnPvZQ="
        );
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_prepare_signs_full_url_with_query() {
        let request = client()
            .prepare_at(&endpoints::close_trade(42, None), 1000)
            .unwrap();

        assert_eq!(request.url, "http://x/api/v1/trade?type=Close&id=42");
        // base64(HMAC-SHA256("C", "1000ABDELETEhttp://x/api/v1/trade?type=Close&id=42"))
        assert_eq!(
            request.headers.get(AUTHORIZATION).unwrap(),
            "HMAC A:B:1000:WZhprHlKn0bv7ePB63ZWGX7jbvA/CqagWN7zJ8upCuU="
        );
    }

    #[test]
    fn test_prepare_json_body() {
        let trade = CreateTradeRequest::market(TradeSide::Buy, "EURUSD", 1000.0);
        let api_request = endpoints::create_trade(&trade).unwrap();
        let request = client().prepare_at(&api_request, 1000).unwrap();

        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/json; charset=UTF-8"
        );
        assert_eq!(request.body, api_request.body);

        let expected = auth::sign(
            "POST",
            "http://x/api/v1/trade",
            api_request.body.as_deref(),
            &Credentials::new("A", "B", "C"),
            1000,
        )
        .unwrap();
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), expected.as_str());
    }

    #[test]
    fn test_prepare_public_unsigned() {
        let config = ClientConfig::public("http://x").unwrap();
        let client = TickTraderClient::new(config).unwrap();

        let request = client
            .prepare(&endpoints::public_by_name(Resource::Symbol, "EUR/USD"))
            .unwrap();
        assert_eq!(request.url, "http://x/api/v1/public/symbol/EUR%252FUSD");
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_prepare_signed_without_credentials() {
        let config = ClientConfig::public("http://x").unwrap();
        let client = TickTraderClient::new(config).unwrap();

        let err = client.prepare(&endpoints::account()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("http://x"));
        assert!(!debug.contains("\"C\""));
    }
}
