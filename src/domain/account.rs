use crate::domain::errors::AuthError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The signed-in user and their simulated cash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: &str, email: &str, name: &str, balance: Decimal) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            balance,
        }
    }
}

/// Mock credential rules: any non-empty email with a long-enough password
pub fn validate_credentials(
    email: &str,
    password: &str,
    min_password_len: usize,
) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::InvalidCredentials {
            reason: "email is required".to_string(),
        });
    }
    if password.chars().count() < min_password_len {
        return Err(AuthError::InvalidCredentials {
            reason: format!("password must be at least {} characters", min_password_len),
        });
    }
    Ok(())
}

/// Display name derived from the local part of an email
pub fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
