use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::domain::ApiKey;
use crate::error::classify;
use crate::error::MailchimpError;
use crate::payload::Params;

/// Every request authenticates as this user; only the password (api key)
/// matters to the service
const BASIC_AUTH_USER: &str = "mcuser";

/// The verbs the api understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Patch,
}

impl Method {
    /// `GET` and `DELETE` carry their parameters in the query string; the rest
    /// send them as a json body
    fn uses_query(self) -> bool { matches!(self, Self::Get | Self::Delete) }
}

impl FromStr for Method {
    type Err = MailchimpError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = s.trim().to_lowercase();
        match method.as_str() {
            "get" => Ok(Self::Get),
            "put" => Ok(Self::Put),
            "post" => Ok(Self::Post),
            "delete" => Ok(Self::Delete),
            "patch" => Ok(Self::Patch),
            _ => Err(MailchimpError::InvalidMethod(method)),
        }
    }
}

impl Display for Method {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        };
        write!(f, "{s}")
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A successful response. The status travels with the body, rather than being
/// stashed on the client, so one client can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// `Null` if the response had no body (e.g. 204)
    pub json: Value,
    pub text: String,
}

impl ApiResponse {
    pub fn into_json(self) -> Value { self.json }
}

/// Client for the Mailchimp marketing api (v3.0).
///
/// Cloning is cheap; the underlying `reqwest::Client` (and its connection
/// pool) is shared.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    http_client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl MailchimpClient {
    /// Talk to the datacenter named in the api key
    pub fn new(
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, MailchimpError> {
        let base_url = api_key.base_url();
        Self::with_base_url(base_url, api_key, timeout)
    }

    /// Talk to an arbitrary host (e.g. a mock server); `base_url` is fixed for
    /// the lifetime of the client
    pub fn with_base_url(
        base_url: String,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, MailchimpError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    /// Make a single authenticated request to `endpoint` (relative to the base
    /// url, e.g. `/lists`), and return the decoded response.
    ///
    /// `method` is checked before anything is sent. Any status >= 400 is
    /// returned as an error (see `error::classify`); nothing is retried.
    #[tracing::instrument(
        name = "Calling Mailchimp API",
        skip(self, params),
        fields(http.status=tracing::field::Empty),
        err
    )]
    pub async fn call(
        &self,
        method: &str,
        endpoint: &str,
        params: &Params,
    ) -> Result<ApiResponse, MailchimpError> {
        let method: Method = method.parse()?;

        let mut url = format!("{}{}", self.base_url, endpoint);

        let request = if method.uses_query() {
            let query = query_string(params)?;
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
            self.http_client.request(method.into(), &url)
        } else {
            let request = self.http_client.request(method.into(), &url);
            match params.is_empty() {
                true => request,
                false => request.json(params),
            }
        };

        let response = request
            .basic_auth(BASIC_AUTH_USER, Some(self.api_key.expose_secret()))
            .send()
            .await
            .with_context(|| format!("Failed to send {method} {endpoint}"))?;

        let status = response.status().as_u16();
        tracing::Span::current().record("http.status", status);

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        let json = decode(status, &text)?;

        classify(status, &json, &text)?;

        Ok(ApiResponse { status, json, text })
    }
}

/// Url-encode `params` for a `GET`/`DELETE`. Lists are sent comma-separated
/// (`fields=lists.id,lists.name`), the way the api expects them; `null`
/// entries are left out. Nested objects have no query representation.
fn query_string(params: &Params) -> Result<String, MailchimpError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        let value = match value {
            Value::Null => continue,
            Value::Array(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| query_value(key, item))
                .collect::<Result<Vec<_>, _>>()?
                .join(","),
            other => query_value(key, other)?,
        };
        pairs.push((key.as_str(), value));
    }
    let query = serde_urlencoded::to_string(pairs).context("Failed to encode query parameters")?;
    Ok(query)
}

fn query_value(
    key: &str,
    value: &Value,
) -> Result<String, MailchimpError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(anyhow::anyhow!("Query parameter {key:?} must be a scalar or a list of scalars").into())
        }
    }
}

/// An empty body decodes to `Null`. A body that isn't json is only an error on
/// success; on failure the status is what matters, and the raw text is kept
/// anyway.
fn decode(
    status: u16,
    text: &str,
) -> Result<Value, MailchimpError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(json) => Ok(json),
        Err(_) if status >= 400 => Ok(Value::Null),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("Failed to decode response body (status {status})"))
            .into()),
    }
}
