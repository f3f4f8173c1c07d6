use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Context, FetchError, Result};

use super::FetchResult;

/// Thin wrapper over `reqwest::Client` that maps failures onto `FetchError`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .with_context(|| format!("Invalid user agent: {user_agent}"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self { client })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> FetchResult<T> {
        debug!("GET {url} {query:?}");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::network(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::network(format!(
                "{url} returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| FetchError::network(format!("failed to read body from {url}: {err}")))?;

        decode_json(url, &body)
    }
}

pub fn decode_json<T: DeserializeOwned>(source: &str, body: &str) -> FetchResult<T> {
    serde_json::from_str(body)
        .map_err(|err| FetchError::format(format!("{source}: {err}")))
}

/// Substitute `{key}` placeholders in a URL template.
pub fn render_template(template: &str, replacements: &HashMap<&str, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            let key = read_placeholder(&mut chars)?;
            let value = replacements.get(key.as_str()).ok_or_else(|| {
                AppError::message(format!(
                    "No replacement provided for placeholder `{}` in template",
                    key
                ))
            })?;
            result.push_str(value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// List the placeholder names a template refers to, in order of appearance.
pub fn template_placeholders(template: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '{' {
            keys.push(read_placeholder(&mut chars)?);
        }
    }

    Ok(keys)
}

fn read_placeholder<I>(chars: &mut std::iter::Peekable<I>) -> Result<String>
where
    I: Iterator<Item = char>,
{
    let mut key = String::new();
    let mut closed = false;
    while let Some(&next) = chars.peek() {
        chars.next();
        if next == '}' {
            closed = true;
            break;
        }
        key.push(next);
    }

    if !closed {
        return Err(AppError::message(format!(
            "Unterminated placeholder in template: {{{key}"
        )));
    }

    if key.is_empty() {
        return Err(AppError::message(
            "Encountered empty placeholder `{}` in template",
        ));
    }

    Ok(key)
}
