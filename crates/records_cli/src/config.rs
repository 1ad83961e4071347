use std::env;
use std::path::PathBuf;
use dotenvy::dotenv;
use anyhow::{Context, Result};

use records_core::session::{Session, SessionToken};
use records_core::Role;

#[derive(Clone, Debug)]
pub struct Config {
    pub store_path: PathBuf,
    pub role: Role,
    pub user_id: String,
    pub user_name: String,
    token: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present

        let role = env::var("RECORDS_ROLE").unwrap_or_else(|_| "registrar".to_string());

        Ok(Config {
            store_path: env::var("RECORDS_STORE")
                .unwrap_or_else(|_| "requests.json".to_string())
                .into(),

            role: role
                .parse()
                .with_context(|| format!("RECORDS_ROLE '{}' is not one of admin, accounting, registrar, student", role))?,

            user_id: env::var("RECORDS_USER_ID")
                .unwrap_or_else(|_| "local-operator".to_string()),

            user_name: env::var("RECORDS_USER_NAME")
                .unwrap_or_else(|_| "Local Operator".to_string()),

            token: env::var("RECORDS_TOKEN")
                .unwrap_or_else(|_| "local-cli".to_string()),
        })
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id.clone(),
            display_name: self.user_name.clone(),
            role: self.role,
            token: SessionToken::new(self.token.clone()),
        }
    }
}
