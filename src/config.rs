use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Detection and simulation parameters shared by the batch and live paths.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Forward candles examined to resolve a trade.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
    /// Void the rest of a day once a London candle closes outside the range
    /// before any sweep was found.
    #[serde(default = "default_void_on_outside_close")]
    pub void_on_outside_close: bool,
    #[serde(default)]
    pub indicators: IndicatorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
    #[serde(default = "default_ema_period")]
    pub ema_period: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default = "default_candles_path")]
    pub candles_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,
    #[serde(skip)]
    pub token: String,
    #[serde(skip)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// One JSON object per event instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_lookahead() -> usize {
    30
}

fn default_void_on_outside_close() -> bool {
    true
}

fn default_atr_period() -> usize {
    14
}

fn default_ema_period() -> usize {
    20
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_ticker() -> String {
    "EURUSD".to_string()
}

fn default_candles_path() -> PathBuf {
    PathBuf::from("data/price/EURUSD.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("data/models/EURUSD_model.json")
}

fn default_poll_interval_secs() -> u64 {
    180
}

fn default_score_threshold() -> f64 {
    0.5
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
            void_on_outside_close: default_void_on_outside_close(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            atr_period: default_atr_period(),
            ema_period: default_ema_period(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            ticker: default_ticker(),
            candles_path: default_candles_path(),
            model_path: default_model_path(),
            poll_interval_secs: default_poll_interval_secs(),
            score_threshold: default_score_threshold(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api_base_url(),
            token: String::new(),
            chat_id: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl IndicatorConfig {
    /// Index of the first candle at which every indicator is defined.
    pub fn warmup(&self) -> usize {
        self.atr_period
            .max(self.ema_period)
            .max(self.rsi_period)
            .max(self.macd_slow)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, period) in [
            ("atr_period", self.atr_period),
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
        ] {
            if period == 0 {
                bail!("indicators.{} must be > 0", name);
            }
        }
        if self.macd_fast >= self.macd_slow {
            bail!(
                "indicators.macd_fast ({}) must be below indicators.macd_slow ({})",
                self.macd_fast,
                self.macd_slow
            );
        }
        Ok(())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lookahead == 0 {
            bail!("engine.lookahead must be > 0");
        }
        self.indicators.validate()
    }
}

impl LiveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            bail!("live.ticker must not be empty");
        }
        if self.poll_interval_secs == 0 {
            bail!("live.poll_interval_secs must be > 0");
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            bail!(
                "live.score_threshold must be within [0, 1], got {}",
                self.score_threshold
            );
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Read a TOML file and pull Telegram credentials from `.env` or the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        config.telegram.token = std::env::var("TELEGRAM_TOKEN").unwrap_or_default();
        config.telegram.chat_id = std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default();
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("invalid TOML")?;
        config.engine.validate().context("engine section is invalid")?;
        config.live.validate().context("live section is invalid")?;
        Ok(config)
    }
}
