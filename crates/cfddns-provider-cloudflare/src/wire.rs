//! Cloudflare API v4 wire types
//!
//! Every response is wrapped in the same envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "errors": [],
//!   "messages": [],
//!   "result": [ ... ],
//!   "result_info": { "page": 1, "per_page": 100, "total_pages": 3, "count": 100, "total_count": 250 }
//! }
//! ```

use cfddns_core::{DnsRecord, Error, Result};
use reqwest::StatusCode;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub(crate) const PROVIDER: &str = "cloudflare";

/// Response envelope shared by all endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Pagination details of a list response
#[derive(Debug, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// A DNS record as returned by `/zones/:zone_id/dns_records`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiDnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(deserialize_with = "deserialize_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: Option<bool>,
}

impl From<ApiDnsRecord> for DnsRecord {
    fn from(r: ApiDnsRecord) -> Self {
        DnsRecord {
            id: r.id,
            name: r.name,
            record_type: r.record_type,
            content: r.content,
            ttl: r.ttl,
            proxied: r.proxied,
        }
    }
}

/// Body of `PUT /zones/:zone_id/dns_records/:record_id`
#[derive(Debug, Serialize)]
pub(crate) struct UpdateRecordRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl<'a> From<&'a DnsRecord> for UpdateRecordRequest<'a> {
    fn from(r: &'a DnsRecord) -> Self {
        Self {
            name: &r.name,
            record_type: &r.record_type,
            content: &r.content,
            ttl: r.ttl,
            proxied: r.proxied,
        }
    }
}

/// Accept a TTL sent as an integer, a float (truncated) or a numeric string
fn deserialize_ttl<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ttl {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Ttl::deserialize(deserializer)? {
        Ttl::Int(v) => u32::try_from(v).map_err(|_| de::Error::custom(format!("ttl out of range: {}", v))),
        Ttl::Float(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => Ok(v.trunc() as u32),
        Ttl::Float(v) => Err(de::Error::custom(format!("ttl out of range: {}", v))),
        Ttl::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("ttl is not an integer: {:?}", s))),
    }
}

/// Map a non-success HTTP status to an error
pub(crate) fn status_error(status: StatusCode, body: &str, action: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: zone or record not found. Status: {}", action, status)),
        429 => Error::rate_limited(format!("Rate limit exceeded. Please retry later. Status: {}", status)),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {} - {}", status, body),
        ),
        _ => Error::provider(PROVIDER, format!("{} failed: {} - {}", action, status, body)),
    }
}

/// Decode a response envelope and unwrap its result
pub(crate) fn decode<T>(body: &str, action: &str) -> Result<(T, Option<ResultInfo>)>
where
    T: for<'de> Deserialize<'de>,
{
    let response: ApiResponse<T> = serde_json::from_str(body)
        .map_err(|e| Error::json(format!("{}: failed to parse response: {}", action, e)))?;

    if !response.success {
        let messages: Vec<String> = response
            .errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} ({})", e.message, code),
                None => e.message.clone(),
            })
            .collect();
        return Err(Error::provider(
            PROVIDER,
            format!("{} failed: {}", action, messages.join("; ")),
        ));
    }

    let result = response
        .result
        .ok_or_else(|| Error::json(format!("{}: response has no result", action)))?;
    Ok((result, response.result_info))
}

/// Whether another page follows the requested `page`
///
/// The page number echoed by the API wins over the requested one.
pub(crate) fn has_next_page(info: Option<&ResultInfo>, page: u32) -> bool {
    let Some(info) = info else {
        return false;
    };
    match info.total_pages {
        Some(total) => info.page.unwrap_or(page) < total,
        None => false,
    }
}
