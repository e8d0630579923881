//! Datastream Web Service (DSWS) client over the REST/JSON interface.
//!
//! Authenticates with `GetToken`, caches the token until shortly before it
//! expires, and issues `GetData` requests for time series (`Kind = 1`) and
//! static snapshots (`Kind = 0`).

use std::cell::RefCell;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Credentials, DataProvider, SnapshotRequest, TimeSeriesRequest};
use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{SeriesKey, SeriesTable, SnapshotCell, SnapshotRecord};

/// DSWS value type code reported for per-symbol errors.
const TYPE_ERROR: i64 = 0;
const ERROR_PREFIX: &str = "$$ER";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TokenRequest<'a> {
    user_name: &'a str,
    password: &'a str,
    properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenResponse {
    token_value: Option<String>,
    token_expiry: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataType {
    pub value: String,
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instrument {
    pub value: String,
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateBlock {
    pub start: String,
    pub end: String,
    pub frequency: String,
    pub kind: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataRequest {
    pub instrument: Instrument,
    pub data_types: Vec<DataType>,
    pub date: DateBlock,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetDataRequest<'a> {
    data_request: &'a DataRequest,
    properties: Option<Vec<Property>>,
    token_value: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetDataResponse {
    data_response: Option<DataResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataResponse {
    #[serde(default)]
    pub dates: Option<Vec<String>>,
    #[serde(default)]
    pub data_type_values: Option<Vec<DataTypeValue>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataTypeValue {
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub symbol_values: Vec<SymbolValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SymbolValue {
    pub symbol: String,
    #[serde(default, rename = "Type")]
    pub value_type: Option<i64>,
    #[serde(default)]
    pub value: Value,
}

impl SymbolValue {
    fn error_message(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) if s.starts_with(ERROR_PREFIX) => Some(s.as_str()),
            Value::String(s) if self.value_type == Some(TYPE_ERROR) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

fn symbol_set(instruments: &[String]) -> Instrument {
    Instrument {
        value: instruments.join(","),
        properties: Some(vec![Property {
            key: "IsSymbolSet".to_string(),
            value: Value::Bool(true),
        }]),
    }
}

fn data_types(fields: &[String]) -> Vec<DataType> {
    fields
        .iter()
        .map(|f| DataType {
            value: f.clone(),
            properties: None,
        })
        .collect()
}

/// Build the `GetData` payload for a time-series query.
pub fn time_series_request(request: &TimeSeriesRequest) -> DataRequest {
    DataRequest {
        instrument: symbol_set(&request.instruments),
        data_types: data_types(&request.fields),
        date: DateBlock {
            start: request.start.clone(),
            end: request
                .end
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            frequency: "D".to_string(),
            kind: 1,
        },
        tag: None,
    }
}

/// Build the `GetData` payload for a static snapshot query.
pub fn snapshot_request(request: &SnapshotRequest) -> DataRequest {
    DataRequest {
        instrument: symbol_set(&request.instruments),
        data_types: data_types(&request.fields),
        date: DateBlock {
            start: String::new(),
            end: String::new(),
            frequency: String::new(),
            kind: 0,
        },
        tag: None,
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Parse a WCF JSON date such as `/Date(1565568000000+0000)/`.
pub fn parse_json_date(raw: &str) -> Option<DateTime<Utc>> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;
    // Millis may carry a leading sign; anything after it is a zone offset.
    let sign_len = usize::from(inner.starts_with('-'));
    let digits_end = inner[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| i + sign_len)
        .unwrap_or(inner.len());
    let millis: i64 = inner[..digits_end].parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}

/// Decode a time-series response into a [`SeriesTable`].
///
/// Columns appear in response order. Symbols reported as errors, and
/// non-numeric values, become missing observations.
pub fn series_from_response(response: &DataResponse) -> Result<SeriesTable> {
    let dates = response
        .dates
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|raw| {
            parse_json_date(raw)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DashboardError::Provider(format!("Unparseable date: {}", raw)))
        })
        .collect::<Result<Vec<NaiveDate>>>()?;

    let mut table = SeriesTable::new(dates);
    for dtv in response.data_type_values.as_deref().unwrap_or_default() {
        for sv in &dtv.symbol_values {
            let key = if dtv.data_type.is_empty() {
                SeriesKey::new(&sv.symbol)
            } else {
                SeriesKey::with_field(&sv.symbol, &dtv.data_type)
            };

            let values = match (&sv.value, sv.error_message()) {
                (_, Some(msg)) => {
                    tracing::warn!(symbol = %sv.symbol, error = msg, "provider returned no series");
                    vec![None; table.len()]
                }
                (Value::Array(items), None) => {
                    let mut values: Vec<Option<f64>> =
                        items.iter().map(|v| v.as_f64().filter(|x| x.is_finite())).collect();
                    values.resize(table.len(), None);
                    values
                }
                (other, None) => vec![other.as_f64(); table.len()],
            };
            table.push_column(key, values)?;
        }
    }
    Ok(table)
}

fn snapshot_cell(sv: &SymbolValue) -> SnapshotCell {
    if let Some(msg) = sv.error_message() {
        tracing::warn!(symbol = %sv.symbol, error = msg, "provider returned no value");
        return SnapshotCell::Missing;
    }
    match &sv.value {
        Value::Number(n) => n
            .as_f64()
            .filter(|x| x.is_finite())
            .map(SnapshotCell::Number)
            .unwrap_or(SnapshotCell::Missing),
        Value::String(s) => match parse_json_date(s) {
            Some(dt) => SnapshotCell::Date(dt.date_naive()),
            None if s.trim().is_empty() => SnapshotCell::Missing,
            None => SnapshotCell::Text(s.clone()),
        },
        Value::Bool(b) => SnapshotCell::Text(b.to_string()),
        _ => SnapshotCell::Missing,
    }
}

/// Decode a static response into long-format records.
pub fn snapshot_from_response(response: &DataResponse) -> Vec<SnapshotRecord> {
    response
        .data_type_values
        .as_deref()
        .unwrap_or_default()
        .iter()
        .flat_map(|dtv| {
            dtv.symbol_values
                .iter()
                .map(move |sv| SnapshotRecord::new(&sv.symbol, &dtv.data_type, snapshot_cell(sv)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DatastreamClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Token {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Token {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => {
                let margin = chrono::Duration::from_std(config::TOKEN_RENEW_MARGIN)
                    .unwrap_or_else(|_| chrono::Duration::zero());
                now + margin < expiry
            }
            None => true,
        }
    }
}

/// Blocking DSWS client.
pub struct DatastreamClient {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    client: Option<Client>,
    token: RefCell<Option<Token>>,
}

impl DatastreamClient {
    pub fn new(credentials: Credentials, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url
            .or_else(|| std::env::var(config::ENV_BASE_URL).ok())
            .unwrap_or_else(|| config::DSWS_BASE_URL.to_string());
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout,
            client: Some(client),
            token: RefCell::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| DashboardError::InvalidArgument("Datastream client is closed".into()))
    }

    /// Return a valid token, requesting a new one when missing or near expiry.
    fn token(&self) -> Result<String> {
        if let Some(token) = self.token.borrow().as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let url = format!("{}/GetToken", self.base_url);
        tracing::info!(user = %self.credentials.username, "requesting Datastream token");
        let body = TokenRequest {
            user_name: &self.credentials.username,
            password: &self.credentials.password,
            properties: None,
        };
        let resp = self.client()?.post(&url).json(&body).send()?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(DashboardError::Auth(format!(
                "GetToken returned {}: {}",
                status,
                fault_message(&text)
            )));
        }
        let parsed: TokenResponse = resp.json()?;
        let value = parsed
            .token_value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DashboardError::Auth("GetToken returned no token".into()))?;
        let expires_at = parsed.token_expiry.as_deref().and_then(parse_json_date);

        *self.token.borrow_mut() = Some(Token {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    /// Send one `GetData` request.
    pub fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        let token = self.token()?;
        let url = format!("{}/GetData", self.base_url);
        tracing::info!(
            instruments = %request.instrument.value,
            kind = request.date.kind,
            start = %request.date.start,
            "Datastream GetData"
        );
        let body = GetDataRequest {
            data_request: request,
            properties: None,
            token_value: &token,
        };
        let resp = self.client()?.post(&url).json(&body).send()?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.token.borrow_mut().take();
                return Err(DashboardError::Auth(fault_message(&text)));
            }
            return Err(DashboardError::Provider(format!(
                "GetData returned {}: {}",
                status,
                fault_message(&text)
            )));
        }
        let parsed: GetDataResponse = resp.json()?;
        parsed
            .data_response
            .ok_or_else(|| DashboardError::Provider("GetData returned no DataResponse".into()))
    }

    /// Drop the HTTP client and cached token.
    pub fn close(&mut self) {
        self.client = None;
        self.token.borrow_mut().take();
    }
}

impl DataProvider for DatastreamClient {
    fn time_series(&self, request: &TimeSeriesRequest) -> Result<SeriesTable> {
        let response = self.get_data(&time_series_request(request))?;
        series_from_response(&response)
    }

    fn snapshot(&self, request: &SnapshotRequest) -> Result<Vec<SnapshotRecord>> {
        let response = self.get_data(&snapshot_request(request))?;
        Ok(snapshot_from_response(&response))
    }
}

/// Pull `Message` out of a DSWS fault body, or fall back to the raw text.
fn fault_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("Message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
