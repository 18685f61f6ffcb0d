use crate::error::{Error, Result};
use crate::services::attendance_risk::{
    AttendancePolicy, ExcusedPolicy, DEFAULT_BORDERLINE_BAND, DEFAULT_THRESHOLD,
};
use crate::services::calendar_aggregator::{UrgencyPolicy, DEFAULT_TIGHT_DAYS};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_rps: u32,
    pub log_format: LogFormat,
    pub attendance: AttendancePolicy,
    pub urgency: UrgencyPolicy,
    pub upcoming_limit: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let excused: ExcusedPolicy = get_env_or("EXCUSED_POLICY", "denominator_only").parse()?;
        let attendance = AttendancePolicy::new(
            get_env_parse_or("ATTENDANCE_THRESHOLD", DEFAULT_THRESHOLD)?,
            get_env_parse_or("ATTENDANCE_BORDERLINE_BAND", DEFAULT_BORDERLINE_BAND)?,
            excused,
        )?;

        let tight_days: i64 = get_env_parse_or("DEADLINE_TIGHT_DAYS", DEFAULT_TIGHT_DAYS)?;
        if tight_days < 1 {
            return Err(Error::Config(format!(
                "DEADLINE_TIGHT_DAYS must be at least 1, got {}",
                tight_days
            )));
        }

        let log_format = match get_env_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" | "text" => LogFormat::Pretty,
            other => {
                return Err(Error::Config(format!("Unsupported LOG_FORMAT: {}", other)));
            }
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:3000"),
            database_url: get_env_or("DATABASE_URL", "sqlite://data/console.db"),
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            api_rps: get_env_parse_or("API_RPS", 50)?,
            log_format,
            attendance,
            urgency: UrgencyPolicy { tight_days },
            upcoming_limit: get_env_parse_or("UPCOMING_LIMIT", 10)?,
        })
    }

    /// Defaults for everything except the database location.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            database_url: database_url.into(),
            database_max_connections: 5,
            api_rps: 1000,
            log_format: LogFormat::Pretty,
            attendance: AttendancePolicy::default(),
            urgency: UrgencyPolicy::default(),
            upcoming_limit: 10,
        }
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    get_config()
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
