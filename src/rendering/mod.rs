//! Rendering core: layout stylesheet generation and record-to-card binding.

pub mod assets;
pub mod grid;
pub mod page;
pub mod template;
pub mod units;

use std::fmt;

/// Viewport band one layout rule applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakpointBand {
    /// Container sizing, active at every width
    Base,
    /// Viewports wider than the configured container
    Oversize,
    /// Fixed single-column band, `max-width: 599px`
    Mobile,
    /// Fixed three-column band, 600–1023px
    Tablet,
    /// Formula-derived intermediate tier
    Columns { columns: u32, min_px: f64, max_px: f64 },
    /// Highest configured tier, `min-width: 1024px` and unbounded above
    Desktop { columns: u32 },
}

/// One emitted CSS rule block plus the band it belongs to.
#[derive(Debug, Clone)]
pub struct LayoutRule {
    pub band: BreakpointBand,
    pub css: String,
}

/// Ordered layout rule blocks for one grid configuration.
///
/// Rule order is significant: consumers rely on CSS cascade order, so later
/// rules are expected to win ties at equal specificity. `to_css` preserves
/// emission order.
#[derive(Debug, Clone)]
pub struct LayoutStylesheet {
    rules: Vec<LayoutRule>,
}

impl LayoutStylesheet {
    pub(crate) fn new(rules: Vec<LayoutRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[LayoutRule] {
        &self.rules
    }

    /// The stylesheet as one CSS string, rules in emission order.
    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .map(|r| r.css.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for LayoutStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
