//! Fetches, normalizes, and caches tabular records for the rendering core.
//!
//! This is the external collaborator of the core: all network failure
//! handling lives here. Records are served from a time-boxed in-process
//! cache keyed by sheet identifier; the core itself never performs I/O.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use regex::Regex;
use reqwest::blocking::Client;

use crate::{DataRecord, Error, Result};

const DEFAULT_ENDPOINT: &str = "https://opensheet.elk.sh";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default staleness window for cached sheets.
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(5 * 60);

struct CachedSheet {
    records: Vec<DataRecord>,
    fetched_at: Instant,
}

/// Connector to the published-sheet endpoint with an in-process cache.
pub struct SheetConnector {
    client: Client,
    endpoint: String,
    cache: Mutex<HashMap<String, CachedSheet>>,
    cache_window: Duration,
}

impl SheetConnector {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the connector at a different endpoint (mirrors, tests).
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            cache: Mutex::new(HashMap::new()),
            cache_window: DEFAULT_CACHE_WINDOW,
        })
    }

    pub fn cache_window(mut self, window: Duration) -> Self {
        self.cache_window = window;
        self
    }

    /// Pull the document id out of a sheet URL, if it carries one.
    pub fn extract_sheet_id(url: &str) -> Option<String> {
        static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            [
                Regex::new(r"/d/([A-Za-z0-9-_]+)").unwrap(),
                Regex::new(r"spreadsheet/d/([A-Za-z0-9-_]+)").unwrap(),
                Regex::new(r"/spreadsheets/d/([A-Za-z0-9-_]+)").unwrap(),
            ]
        });

        patterns
            .iter()
            .find_map(|p| p.captures(url).map(|caps| caps[1].to_string()))
    }

    /// Fetch one tab of a sheet, bypassing the cache.
    pub fn fetch(&self, sheet_id: &str, tab: &str) -> Result<Vec<DataRecord>> {
        if sheet_id.is_empty() {
            return Err(Error::InvalidParameter("sheet id must not be empty".into()));
        }

        let mut endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::Other(format!("bad endpoint {}: {}", self.endpoint, e)))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| Error::Other(format!("endpoint {} cannot carry a path", self.endpoint)))?
            .push(sheet_id)
            .push(tab);

        let response = self
            .client
            .get(endpoint)
            .send()
            .map_err(|e| Error::NetworkError(format!("failed to fetch sheet {}: {}", sheet_id, e)))?;

        if !response.status().is_success() {
            return Err(Error::NetworkError(format!(
                "sheet endpoint returned {} for {}",
                response.status(),
                sheet_id
            )));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| Error::FormatError(format!("response was not JSON: {}", e)))?;

        let rows = body
            .as_array()
            .ok_or_else(|| Error::FormatError("expected an array of rows".into()))?;

        rows.iter().map(normalize_record).collect()
    }

    /// Fetch through the cache: a hit inside the staleness window performs
    /// no network request.
    pub fn load(&self, sheet_url: &str, tab: &str) -> Result<Vec<DataRecord>> {
        let sheet_id = Self::extract_sheet_id(sheet_url)
            .ok_or_else(|| Error::InvalidParameter("unrecognized sheet URL".into()))?;
        self.load_by_id(&sheet_id, tab)
    }

    pub fn load_by_id(&self, sheet_id: &str, tab: &str) -> Result<Vec<DataRecord>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(sheet_id) {
                if cached.fetched_at.elapsed() < self.cache_window {
                    return Ok(cached.records.clone());
                }
            }
        }

        let records = self.fetch(sheet_id, tab)?;

        match self.cache.lock() {
            Ok(mut cache) => {
                cache.insert(
                    sheet_id.to_string(),
                    CachedSheet { records: records.clone(), fetched_at: Instant::now() },
                );
            }
            Err(_) => log::warn!("sheet cache poisoned; serving uncached result"),
        }

        Ok(records)
    }

    pub fn invalidate(&self, sheet_id: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(sheet_id);
        }
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

fn normalize_record(row: &serde_json::Value) -> Result<DataRecord> {
    let object = row
        .as_object()
        .ok_or_else(|| Error::FormatError("expected row objects".into()))?;

    let mut record = DataRecord::new();
    let mut unnamed = 0usize;

    for (key, value) in object {
        let mut normalized = normalize_key(key);
        if normalized.is_empty() {
            normalized = format!("field_{}", unnamed);
            unnamed += 1;
        }
        record.insert(normalized, value.clone());
    }

    Ok(record)
}

/// Header key normalization: lowercase, trimmed, whitespace collapsed to
/// underscores, non-alphanumerics stripped, then snake converted to camel.
fn normalize_key(key: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static SNAKE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let snake = SNAKE.get_or_init(|| Regex::new(r"_([a-z])").unwrap());

    let lowered = key.to_lowercase();
    let collapsed = whitespace.replace_all(lowered.trim(), "_");
    let cleaned: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    let trimmed = cleaned.trim_matches('_');

    snake
        .replace_all(trimmed, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}
