//! Terminal front-end
//!
//! Wires the store, market, session and ledger together and turns commands
//! into text. The interactive shell runs price ticks and user commands on
//! one task: a command always sees a consistent set of prices and the
//! session is never touched by two commands at once.

use super::cli::{Command, ShellLine};
use super::format::format_price;
use super::render::{render_account, render_catalog, render_chart, render_history, render_portfolio};
use crate::application::ledger::Ledger;
use crate::application::portfolio_valuation_service::PortfolioValuationService;
use crate::application::session::Session;
use crate::application::trading_desk::TradingDesk;
use crate::config::{Config, StorageBackend};
use crate::domain::errors::AuthError;
use crate::domain::ports::MarketDataService;
use crate::domain::repositories::StateStore;
use crate::domain::trading::types::TradeRequest;
use crate::infrastructure::simulated_market::SimulatedMarketDataService;
use crate::infrastructure::trade_export::export_trades_csv;
use crate::infrastructure::{InMemoryStateStore, JsonFileStore};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

const PROMPT: &str = "> ";

pub struct App {
    config: Config,
    market: SimulatedMarketDataService,
    ledger: Arc<Ledger>,
    desk: TradingDesk,
    valuation: PortfolioValuationService,
    session: Session,
}

impl App {
    /// Build from configuration, opening the configured store
    pub async fn open(config: Config) -> Result<Self> {
        let store: Arc<dyn StateStore> = match config.storage.backend {
            StorageBackend::File => {
                let store = JsonFileStore::open(&config.storage.data_dir).await?;
                info!("App: Using state file {:?}", store.path());
                Arc::new(store)
            }
            StorageBackend::Memory => {
                info!("App: Using in-memory state (nothing is saved)");
                Arc::new(InMemoryStateStore::new())
            }
        };
        let market = SimulatedMarketDataService::from_config(&config.simulation)?;
        Self::assemble(config, store, market).await
    }

    pub async fn assemble(
        config: Config,
        store: Arc<dyn StateStore>,
        market: SimulatedMarketDataService,
    ) -> Result<Self> {
        let session = Session::restore(
            store.clone(),
            config.starting_balance,
            config.min_password_len,
        )
        .await?;

        let ledger = Arc::new(Ledger::new(store));
        let market_port: Arc<dyn MarketDataService> = Arc::new(market.clone());
        let desk = TradingDesk::new(ledger.clone(), market_port.clone());
        let valuation = PortfolioValuationService::new(market_port, ledger.clone());

        Ok(Self {
            config,
            market,
            ledger,
            desk,
            valuation,
            session,
        })
    }

    pub fn market(&self) -> &SimulatedMarketDataService {
        &self.market
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command and return what should be shown.
    /// User mistakes come back as text; only storage faults are errors.
    pub async fn execute(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Catalog => {
                let assets = self.market.get_assets().await?;
                Ok(render_catalog(&assets))
            }
            Command::Chart { asset, timeframe } => {
                let Some(found) = self.market.get_asset(&asset).await? else {
                    return Ok(format!("Unknown asset: {}", asset));
                };
                let series = self
                    .market
                    .get_historical_series(&found.id, timeframe.to_days())
                    .await?;
                Ok(render_chart(&found, timeframe, &series))
            }
            Command::Register {
                email,
                password,
                name,
            } => {
                let result = self
                    .session
                    .register(&email, &password, &name.join(" "))
                    .await;
                auth_reply(result.map(|a| format!("Welcome, {}!\n{}", a.name, render_account(a))))
            }
            Command::Login { email, password } => {
                let result = self.session.login(&email, &password).await;
                auth_reply(result.map(|a| format!("Welcome back, {}!\n{}", a.name, render_account(a))))
            }
            Command::Logout => {
                self.session.logout().await?;
                Ok("Signed out".to_string())
            }
            Command::Whoami => Ok(match self.session.account() {
                Some(account) => render_account(account),
                None => "Not signed in".to_string(),
            }),
            Command::Buy { asset, amount } => {
                self.trade(TradeRequest::buy(&asset, &amount)).await
            }
            Command::Sell { asset, amount } => {
                self.trade(TradeRequest::sell(&asset, &amount)).await
            }
            Command::Portfolio { .. } => self.portfolio_view().await,
            Command::History { csv } => {
                let trades = self.ledger.trades().await?;
                if let Some(path) = csv {
                    export_trades_csv(&path, &trades).await?;
                    return Ok(format!("Exported {} trades to {}", trades.len(), path.display()));
                }
                Ok(render_history(&trades))
            }
            Command::Shell => Ok("Already in the shell".to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    async fn trade(&mut self, request: TradeRequest) -> Result<String> {
        let outcome = self.desk.submit(&mut self.session, request).await;
        Ok(match (outcome.success, outcome.balance) {
            (true, Some(balance)) => format!("{}\nBalance: {}", outcome.message, format_price(balance)),
            _ => outcome.message,
        })
    }

    async fn portfolio_view(&self) -> Result<String> {
        let cash = self.session.balance().unwrap_or_default();
        let valuation = self.valuation.valuate().await?;
        Ok(render_portfolio(&valuation, cash))
    }

    /// Interactive loop: ticks the market on the configured interval and
    /// executes lines from `input` until `quit` or end of input.
    pub async fn run_shell<R, W>(&mut self, input: R, mut out: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(Duration::from_millis(
            self.config.simulation.tick_interval_ms,
        ));
        ticker.tick().await;

        writeln!(out, "cryptosim shell. Type 'help' for commands, 'quit' to leave.")?;
        if let Some(account) = self.session.account() {
            writeln!(out, "Signed in as {}", account.email)?;
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.market.tick().await;
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        write!(out, "{}", PROMPT)?;
                        out.flush()?;
                        continue;
                    }

                    match ShellLine::parse_line(line) {
                        Ok(Command::Quit) => break,
                        Ok(command) => match self.execute(command).await {
                            Ok(text) => writeln!(out, "{}", text.trim_end())?,
                            Err(e) => {
                                error!("App: Command failed: {:#}", e);
                                writeln!(out, "Error: {:#}", e)?;
                            }
                        },
                        Err(e) => writeln!(out, "{}", e.to_string().trim_end())?,
                    }
                    write!(out, "{}", PROMPT)?;
                    out.flush()?;
                }
            }
        }

        writeln!(out)?;
        Ok(())
    }

    /// Re-render the portfolio every refresh period while prices tick,
    /// until Ctrl-C.
    pub async fn watch_portfolio<W: Write>(&mut self, mut out: W) -> Result<()> {
        let ticker = self.market.spawn_ticker(Duration::from_millis(
            self.config.simulation.tick_interval_ms,
        ));
        let mut refresh =
            tokio::time::interval(Duration::from_millis(self.config.portfolio_refresh_ms));

        let result = loop {
            tokio::select! {
                _ = refresh.tick() => {
                    match self.portfolio_view().await {
                        Ok(text) => {
                            writeln!(out, "{}", text)?;
                            out.flush()?;
                        }
                        Err(e) => break Err(e),
                    }
                }
                _ = tokio::signal::ctrl_c() => break Ok(()),
            }
        };

        ticker.abort();
        result
    }
}

fn auth_reply(result: std::result::Result<String, AuthError>) -> Result<String> {
    match result {
        Ok(text) => Ok(text),
        Err(AuthError::Storage(e)) => Err(e),
        Err(e) => Ok(e.to_string()),
    }
}
