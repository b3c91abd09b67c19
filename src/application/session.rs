//! Session
//!
//! Holds the signed-in account and mirrors it into the state store: the
//! account is loaded when the session is restored and saved after every
//! change. Components that need the account receive the session explicitly.

use crate::domain::account::{Account, name_from_email, validate_credentials};
use crate::domain::errors::{AuthError, TradingError};
use crate::domain::repositories::{StateStore, keys};
use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Account id handed out by `login`, which has no registration record
const LOGIN_ACCOUNT_ID: &str = "1";

pub struct Session {
    store: Arc<dyn StateStore>,
    account: Option<Account>,
    starting_balance: Decimal,
    min_password_len: usize,
}

impl Session {
    /// Create a session and load any persisted account
    pub async fn restore(
        store: Arc<dyn StateStore>,
        starting_balance: Decimal,
        min_password_len: usize,
    ) -> Result<Self> {
        let account = match store.get(keys::USER).await? {
            Some(raw) => Some(
                serde_json::from_str::<Account>(&raw)
                    .context("Failed to parse persisted user JSON")?,
            ),
            None => None,
        };

        if let Some(account) = &account {
            info!("Session: Restored {} (balance ${})", account.email, account.balance);
        }

        Ok(Self {
            store,
            account,
            starting_balance,
            min_password_len,
        })
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.account.is_some()
    }

    pub fn require_account(&self) -> Result<&Account, TradingError> {
        self.account.as_ref().ok_or(TradingError::NotSignedIn)
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.account.as_ref().map(|a| a.balance)
    }

    /// Mock sign-in: any valid email/password pair gets a fresh account
    /// funded with the starting balance.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Account, AuthError> {
        if let Err(e) = validate_credentials(email, password, self.min_password_len) {
            warn!("Session: Login rejected for '{}': {}", email, e);
            return Err(e);
        }

        let account = Account::new(
            LOGIN_ACCOUNT_ID,
            email.trim(),
            &name_from_email(email.trim()),
            self.starting_balance,
        );
        self.sign_in(account).await
    }

    /// Mock registration: like `login`, but with a chosen display name and a
    /// timestamp-based id.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<&Account, AuthError> {
        validate_credentials(email, password, self.min_password_len)?;
        if name.trim().is_empty() {
            return Err(AuthError::InvalidCredentials {
                reason: "name is required".to_string(),
            });
        }

        let id = Utc::now().timestamp_millis().to_string();
        let account = Account::new(&id, email.trim(), name.trim(), self.starting_balance);
        self.sign_in(account).await
    }

    /// Forget the account, in memory and in the store.
    /// Holdings and trade history are left untouched.
    pub async fn logout(&mut self) -> Result<()> {
        self.store.remove(keys::USER).await?;
        if let Some(account) = self.account.take() {
            info!("Session: {} signed out", account.email);
        }
        Ok(())
    }

    /// Overwrite the balance and persist it. No-op when signed out.
    pub async fn update_balance(&mut self, balance: Decimal) -> Result<()> {
        let Some(current) = &self.account else {
            return Ok(());
        };

        let mut updated = current.clone();
        updated.balance = balance;
        self.store
            .set(keys::USER, serde_json::to_string(&updated)?)
            .await?;
        self.account = Some(updated);
        Ok(())
    }

    /// Swap in an account the ledger has already persisted
    pub(crate) fn replace_account(&mut self, account: Account) {
        self.account = Some(account);
    }

    async fn sign_in(&mut self, account: Account) -> Result<&Account, AuthError> {
        let raw = serde_json::to_string(&account)
            .context("Failed to serialize user")
            .map_err(AuthError::Storage)?;
        self.store
            .set(keys::USER, raw)
            .await
            .map_err(AuthError::Storage)?;

        info!(
            "Session: {} signed in (id {}, balance ${})",
            account.email, account.id, account.balance
        );
        Ok(&*self.account.insert(account))
    }
}
