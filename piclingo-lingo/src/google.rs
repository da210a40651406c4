use crate::error::{Result, TranslateError};
use async_trait::async_trait;
use piclingo_core::languages;
use piclingo_core::translation::{Translation, Translator};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) piclingo";
/// Longest text sent in one request
const MAX_TEXT_LEN: usize = 5000;

/// Client for `translate_a/single?client=gtx`
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(TranslateError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for one call. `sl` is `auto` for detection.
    pub fn request_url(&self, text: &str, sl: &str, tl: &str) -> String {
        format!(
            "{}/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.base_url,
            urlencoding::encode(sl),
            urlencoding::encode(tl),
            urlencoding::encode(text)
        )
    }

    async fn fetch(&self, text: &str, sl: &str, tl: &str) -> Result<Value> {
        let url = self.request_url(text, sl, tl);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslateError::RateLimit);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::InvalidResponse(format!("HTTP {}: {}", status, body)));
        }

        Ok(response.json().await?)
    }
}

/// Extract `(translated text, detected source)` from a gtx response.
///
/// The body is a nested array: element 0 holds `[translated, original, ..]`
/// segments, element 2 the detected source language.
pub fn parse_response(body: &Value) -> Result<(String, Option<String>)> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::InvalidResponse("missing translation segments".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::InvalidResponse("empty translation".to_string()));
    }

    let detected = body.get(2).and_then(Value::as_str).map(str::to_lowercase);
    Ok((text, detected))
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, src: Option<&str>, dest: &str) -> piclingo_core::Result<Translation> {
        let dest = languages::resolve_code(dest)?;
        let src = src.map(languages::resolve_code).transpose()?;

        if text.trim().is_empty() {
            return Ok(Translation {
                text: String::new(),
                src: src.unwrap_or("auto").to_string(),
                dest: dest.to_string(),
            });
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(TranslateError::InvalidResponse(format!(
                "text too long ({} bytes, max {})",
                text.len(),
                MAX_TEXT_LEN
            ))
            .into());
        }

        let body = self.fetch(text, src.unwrap_or("auto"), dest).await?;
        let (translated, detected) = parse_response(&body)?;
        debug!("gtx {:?} -> {:?} (detected {:?})", text, translated, detected);

        let src = match src {
            Some(code) => code.to_string(),
            None => detected.unwrap_or_else(|| "auto".to_string()),
        };

        Ok(Translation {
            text: translated,
            src,
            dest: dest.to_string(),
        })
    }
}
