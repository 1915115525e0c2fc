//! Command-line interface
//!
//! One subcommand per Web API operation. Name arguments are optional: without
//! one the whole collection is listed.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ticktrader_core::{
    CreateTradeRequest, ModifyTradeRequest, RequestDirection, TradeHistoryRequest, TradeSide,
    TradeType,
};
use ticktrader_web::{ApiResponse, TickTraderClient};
use tracing::info;

/// TickTrader Web API CLI
#[derive(Parser)]
#[command(name = "ticktrader")]
#[command(about = "Query market data and manage trades through the TickTrader Web API")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Public market data (no credentials needed)
    #[command(subcommand)]
    Public(MarketCommands),
    /// Market data through the authenticated API
    #[command(subcommand)]
    Market(MarketCommands),
    /// Account information
    Account,
    /// Cash account assets
    Assets {
        /// Currency name
        currency: Option<String>,
    },
    /// Net account positions
    Positions {
        /// Symbol name
        symbol: Option<String>,
    },
    /// Open trades
    Trades {
        /// Trade id
        id: Option<i64>,
    },
    /// Create a new trade
    Create(CreateArgs),
    /// Modify an existing trade
    Modify(ModifyArgs),
    /// Cancel a pending trade
    Cancel {
        /// Trade id
        id: i64,
    },
    /// Close a market trade
    Close {
        /// Trade id
        id: i64,
        /// Amount to close (whole trade if omitted)
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Close a market trade by another one
    CloseBy {
        /// Trade id
        id: i64,
        /// Id of the opposite trade
        by_id: i64,
    },
    /// One page of trade history
    History(HistoryArgs),
}

/// Market data subcommands, shared by the public and authenticated APIs
#[derive(Subcommand)]
pub enum MarketCommands {
    /// Trade session information
    Session,
    /// Currencies
    Currencies {
        /// Currency name
        name: Option<String>,
    },
    /// Symbols
    Symbols {
        /// Symbol name
        name: Option<String>,
    },
    /// Feed ticks
    Ticks {
        /// Symbol name
        symbol: Option<String>,
    },
    /// Level2 feed ticks
    Level2 {
        /// Symbol name
        symbol: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Market,
    Limit,
    Stop,
}

impl From<TypeArg> for TradeType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Market => TradeType::Market,
            TypeArg::Limit => TradeType::Limit,
            TypeArg::Stop => TradeType::Stop,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SideArg {
    Buy,
    Sell,
}

impl From<SideArg> for TradeSide {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Buy => TradeSide::Buy,
            SideArg::Sell => TradeSide::Sell,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Forward,
    Backward,
}

impl From<DirectionArg> for RequestDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Forward => RequestDirection::Forward,
            DirectionArg::Backward => RequestDirection::Backward,
        }
    }
}

/// Arguments for create command
#[derive(Args)]
pub struct CreateArgs {
    /// Trade type
    #[arg(long = "type", value_enum)]
    pub trade_type: TypeArg,
    /// Trade side
    #[arg(long, value_enum)]
    pub side: SideArg,
    /// Trade symbol (e.g. EURUSD)
    #[arg(long)]
    pub symbol: String,
    /// Trade amount
    #[arg(long)]
    pub amount: f64,
    /// Price of limit / stop trades
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub stop_loss: Option<f64>,
    #[arg(long)]
    pub take_profit: Option<f64>,
    /// Expiration of pending trades (milliseconds since the Unix epoch)
    #[arg(long)]
    pub expired: Option<i64>,
    /// Immediate-or-cancel (limit trades only)
    #[arg(long)]
    pub ioc: bool,
    /// Client trade id
    #[arg(long)]
    pub client_id: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

impl CreateArgs {
    fn into_request(self) -> CreateTradeRequest {
        CreateTradeRequest {
            client_id: self.client_id,
            trade_type: self.trade_type.into(),
            side: self.side.into(),
            symbol: self.symbol,
            price: self.price,
            amount: self.amount,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            expired_timestamp: self.expired,
            immediate_or_cancel: self.ioc.then_some(true),
            comment: self.comment,
        }
    }
}

/// Arguments for modify command
#[derive(Args)]
pub struct ModifyArgs {
    /// Trade id
    pub id: i64,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub stop_loss: Option<f64>,
    #[arg(long)]
    pub take_profit: Option<f64>,
    /// Expiration of pending trades (milliseconds since the Unix epoch)
    #[arg(long)]
    pub expired: Option<i64>,
    #[arg(long)]
    pub comment: Option<String>,
}

impl ModifyArgs {
    fn into_request(self) -> ModifyTradeRequest {
        ModifyTradeRequest {
            id: self.id,
            price: self.price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            expired_timestamp: self.expired,
            comment: self.comment,
        }
    }
}

/// Arguments for history command
#[derive(Args)]
pub struct HistoryArgs {
    /// Only history of this trade
    #[arg(long)]
    pub trade_id: Option<i64>,
    /// Lower timestamp bound (milliseconds)
    #[arg(long)]
    pub from: Option<i64>,
    /// Upper timestamp bound (milliseconds)
    #[arg(long)]
    pub to: Option<i64>,
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,
    /// Continue after this trade history record id
    #[arg(long)]
    pub after: Option<String>,
}

impl HistoryArgs {
    fn to_request(&self) -> TradeHistoryRequest {
        TradeHistoryRequest {
            timestamp_from: self.from,
            timestamp_to: self.to,
            request_direction: self.direction.map(Into::into),
            request_from_id: self.after.clone(),
        }
    }
}

// ============================================================================
// Execution
// ============================================================================

pub async fn execute(client: &TickTraderClient, command: Commands) -> Result<()> {
    let response = match command {
        Commands::Public(cmd) => public(client, cmd).await?,
        Commands::Market(cmd) => market(client, cmd).await?,
        Commands::Account => client.get_account().await?,
        Commands::Assets { currency } => match currency {
            Some(currency) => client.get_asset(&currency).await?,
            None => client.get_all_assets().await?,
        },
        Commands::Positions { symbol } => match symbol {
            Some(symbol) => client.get_position(&symbol).await?,
            None => client.get_all_positions().await?,
        },
        Commands::Trades { id } => match id {
            Some(id) => client.get_trade(id).await?,
            None => client.get_all_trades().await?,
        },
        Commands::Create(args) => {
            let request = args.into_request();
            info!(
                "Creating {} {} trade: {} {}",
                request.trade_type.as_str(),
                request.side.as_str(),
                request.amount,
                request.symbol
            );
            client.create_trade(&request).await?
        }
        Commands::Modify(args) => client.modify_trade(&args.into_request()).await?,
        Commands::Cancel { id } => client.cancel_trade(id).await?,
        Commands::Close { id, amount } => client.close_trade(id, amount).await?,
        Commands::CloseBy { id, by_id } => client.close_by_trade(id, by_id).await?,
        Commands::History(args) => {
            let request = args.to_request();
            match args.trade_id {
                Some(trade_id) => {
                    client
                        .get_trade_history_by_trade_id(trade_id, &request)
                        .await?
                }
                None => client.get_trade_history(&request).await?,
            }
        }
    };

    print_response(&response);
    Ok(())
}

async fn public(client: &TickTraderClient, command: MarketCommands) -> Result<ApiResponse> {
    let response = match command {
        MarketCommands::Session => client.get_public_trade_session().await?,
        MarketCommands::Currencies { name } => match name {
            Some(name) => client.get_public_currency(&name).await?,
            None => client.get_public_all_currencies().await?,
        },
        MarketCommands::Symbols { name } => match name {
            Some(name) => client.get_public_symbol(&name).await?,
            None => client.get_public_all_symbols().await?,
        },
        MarketCommands::Ticks { symbol } => match symbol {
            Some(symbol) => client.get_public_tick(&symbol).await?,
            None => client.get_public_all_ticks().await?,
        },
        MarketCommands::Level2 { symbol } => match symbol {
            Some(symbol) => client.get_public_tick_level2(&symbol).await?,
            None => client.get_public_all_ticks_level2().await?,
        },
    };
    Ok(response)
}

async fn market(client: &TickTraderClient, command: MarketCommands) -> Result<ApiResponse> {
    let response = match command {
        MarketCommands::Session => client.get_trade_session().await?,
        MarketCommands::Currencies { name } => match name {
            Some(name) => client.get_currency(&name).await?,
            None => client.get_all_currencies().await?,
        },
        MarketCommands::Symbols { name } => match name {
            Some(name) => client.get_symbol(&name).await?,
            None => client.get_all_symbols().await?,
        },
        MarketCommands::Ticks { symbol } => match symbol {
            Some(symbol) => client.get_tick(&symbol).await?,
            None => client.get_all_ticks().await?,
        },
        MarketCommands::Level2 { symbol } => match symbol {
            Some(symbol) => client.get_tick_level2(&symbol).await?,
            None => client.get_all_ticks_level2().await?,
        },
    };
    Ok(response)
}

/// Pretty-print JSON bodies, anything else as received
fn print_response(response: &ApiResponse) {
    match response.json::<serde_json::Value>() {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", response.text()),
        },
        Err(_) => println!("{}", response.text()),
    }
}
