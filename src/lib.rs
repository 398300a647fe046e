//! Card Grid Rendering Core
//!
//! A small rendering engine that turns a declarative style set and rows of
//! tabular data into responsive card markup and stylesheet fragments.
//!
//! # Features
//!
//! - **Grid layout generation**: breakpoint-banded CSS for an N-column card
//!   grid with configurable gap and card widths
//! - **Template binding**: resolves record fields against placeholder tokens
//!   with fallback chains, defaults, and asset-URL rewriting
//! - **Sheets collaborator** (feature `sheets`): fetches and caches record
//!   rows from a published spreadsheet
//!
//! # Example
//!
//! ```
//! use cardgrid::{GridConfig, rendering::grid};
//!
//! # fn main() -> Result<(), cardgrid::Error> {
//! let config = GridConfig {
//!     columns: 4,
//!     gap: 24.0,
//!     ..Default::default()
//! };
//!
//! let stylesheet = grid::generate_full_layout(&config, cardgrid::DEFAULT_CONTAINER)?;
//! assert!(stylesheet.to_css().contains("@media (min-width: 1024px)"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod descriptor;
pub mod rendering;

// Sheet fetch-and-cache collaborator (network-backed, feature-gated)
#[cfg(feature = "sheets")]
pub mod sheets;

pub use descriptor::StyleDescriptor;
pub use rendering::template::{FieldValue, RenderedCard};
pub use rendering::{BreakpointBand, LayoutRule, LayoutStylesheet};

/// Selector the layout generator targets when the caller does not override it.
pub const DEFAULT_CONTAINER: &str = ".grid-container";

/// Configuration for one grid layout generation call
///
/// The defaults mirror the composer's built-in grid: three columns, a 24px
/// gap, 300px minimum card width inside a 1200px container.
///
/// # Examples
///
/// ```
/// let config = cardgrid::GridConfig::default();
/// assert_eq!(config.columns, 3);
/// assert_eq!(config.gap, 24.0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Number of columns at the widest configured tier
    pub columns: u32,
    /// Gap between cards in pixels
    pub gap: f64,
    /// Minimum card width in pixels, used to derive breakpoints
    pub min_width: f64,
    /// Maximum container width in pixels
    pub max_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            gap: 24.0,
            min_width: 300.0,
            max_width: 1200.0,
        }
    }
}

/// One row of externally sourced tabular data.
///
/// Keys vary per sheet; there is no fixed schema. Key order follows the
/// source column order, which the legacy rendering heuristics rely on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRecord(pub serde_json::Map<String, serde_json::Value>);

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text form of a value if the key is present with a non-empty value.
    ///
    /// Numbers render through their JSON display form; empty strings and
    /// nulls count as absent.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Keys in source column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.columns, 3);
        assert_eq!(config.min_width, 300.0);
        assert_eq!(config.max_width, 1200.0);
    }

    #[test]
    fn test_record_text_access() {
        let mut record = DataRecord::new();
        record.insert("name", serde_json::json!("Lamp"));
        record.insert("price", serde_json::json!(99));
        record.insert("note", serde_json::json!(""));

        assert_eq!(record.get_text("name").as_deref(), Some("Lamp"));
        assert_eq!(record.get_text("price").as_deref(), Some("99"));
        assert_eq!(record.get_text("note"), None);
        assert_eq!(record.get_text("missing"), None);
    }

    #[test]
    fn test_record_preserves_key_order() {
        let record: DataRecord =
            serde_json::from_str(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
