use anyhow::{bail, Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TelegramResponse {
    pub fn into_result(self) -> Result<(), AppError> {
        if self.ok {
            return Ok(());
        }
        Err(AppError::Telegram {
            code: self.error_code.unwrap_or_default(),
            msg: self.description.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

/// Bot API client posting to one chat.
pub struct TelegramNotifier {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(base_url: &str, token: &str, chat_id: &str) -> Result<Self> {
        if token.is_empty() {
            bail!(AppError::Config("TELEGRAM_TOKEN is not set".to_string()));
        }
        if chat_id.is_empty() {
            bail!(AppError::Config("TELEGRAM_CHAT_ID is not set".to_string()));
        }
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn from_config(config: &TelegramConfig) -> Result<Self> {
        Self::new(&config.api_base_url, &config.token, &config.chat_id)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn check(resp: reqwest::blocking::Response, method: &str) -> Result<()> {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if let Ok(parsed) = serde_json::from_str::<TelegramResponse>(&body) {
            return Ok(parsed.into_result()?);
        }
        bail!("{} failed with status {}: {}", method, status, body)
    }
}

impl Notifier for TelegramNotifier {
    fn send_message(&self, text: &str) -> Result<()> {
        tracing::info!(chat_id = %self.chat_id, chars = text.len(), "Sending telegram message");
        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .context("sendMessage HTTP failed")?;
        Self::check(resp, "sendMessage")
    }

    fn send_photo(&self, image: &[u8]) -> Result<()> {
        tracing::info!(chat_id = %self.chat_id, bytes = image.len(), "Sending telegram photo");
        let photo = Part::bytes(image.to_vec())
            .file_name("signal.png")
            .mime_str("image/png")
            .context("invalid photo mime type")?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .part("photo", photo);
        let resp = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .context("sendPhoto HTTP failed")?;
        Self::check(resp, "sendPhoto")
    }
}
