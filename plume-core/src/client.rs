use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::{PlumeError, Result};
use crate::model::{Content, GenerateRequest};

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// The completion collaborator. One call submits the whole conversation
/// context and yields the generated reply text.
pub trait CompletionApi {
    fn generate(&self, contents: &[Content]) -> Result<String>;
}

pub struct GeminiClient {
    api_url: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl CompletionApi for GeminiClient {
    fn generate(&self, contents: &[Content]) -> Result<String> {
        let request = GenerateRequest::new(contents.to_vec());
        log::debug!("completion call with {} content entries", contents.len());

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PlumeError::ModelNotFound);
        }
        if !status.is_success() {
            return Err(PlumeError::HttpStatus(status.as_u16()));
        }

        let body: Value = response.json()?;
        reply_text(&body).ok_or(PlumeError::MalformedResponse)
    }
}

fn reply_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .map(ToString::to_string)
}
