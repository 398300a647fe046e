//! Responsive grid layout generation.
//!
//! The mobile and tablet bands are fixed policy tiers: one column below
//! 600px and exactly three columns up to 1023px, no matter what the
//! configuration says. Only tiers from 1024px upward derive from the
//! column-width formula. Unifying the two would change visible output.

use std::collections::HashMap;

use crate::rendering::units;
use crate::rendering::{BreakpointBand, LayoutRule, LayoutStylesheet};
use crate::{GridConfig, Result};

/// Generate the full breakpoint-banded stylesheet for one grid config.
///
/// Emission order: base rule, oversize rule, mobile, tablet, ascending
/// intermediate tiers, desktop last. Any domain violation surfaces before a
/// single rule is emitted.
pub fn generate_full_layout(config: &GridConfig, container: &str) -> Result<LayoutStylesheet> {
    // Validates columns/gap up front so no partial stylesheet escapes.
    units::column_width(config.columns, config.gap)?;

    let mut rules = Vec::new();

    rules.push(LayoutRule {
        band: BreakpointBand::Base,
        css: format!(
            "/* Base Grid Styles */\n{container} {{\n  display: grid;\n  gap: {gap}px;\n  max-width: {max}px;\n  width: 100%;\n  margin: 0 auto;\n}}",
            container = container,
            gap = config.gap,
            max = config.max_width,
        ),
    });

    rules.push(LayoutRule {
        band: BreakpointBand::Oversize,
        css: format!(
            "@media (min-width: {over}px) {{\n  {container} {{\n    max-width: {max}px;\n    padding: 0 calc((100vw - {max}px) / 2);\n  }}\n}}",
            over = config.max_width + 1.0,
            container = container,
            max = config.max_width,
        ),
    });

    rules.push(LayoutRule {
        band: BreakpointBand::Mobile,
        css: format!(
            "/* Mobile (1 column) - max 599px */\n@media (max-width: 599px) {{\n  {container} {{\n    grid-template-columns: 1fr;\n  }}\n}}",
            container = container,
        ),
    });

    rules.push(LayoutRule {
        band: BreakpointBand::Tablet,
        css: format!(
            "/* Tablet (3 columns) - 600px to 1023px */\n@media (min-width: 600px) and (max-width: 1023px) {{\n  {container} {{\n    grid-template-columns: repeat(3, 1fr);\n  }}\n}}",
            container = container,
        ),
    });

    for i in 2..=config.columns {
        // The tablet band already owns the 3-column tier.
        if i == 3 {
            continue;
        }
        let width = units::column_width(i, config.gap)?;

        if i == config.columns {
            // The highest configured tier claims every viewport from 1024px up,
            // overriding whatever band the formula would have produced.
            rules.push(LayoutRule {
                band: BreakpointBand::Desktop { columns: i },
                css: format!(
                    "/* Desktop ({i} columns) - 1024px and up */\n@media (min-width: 1024px) {{\n  {container} {{\n    grid-template-columns: repeat({i}, {width});\n  }}\n}}",
                    i = i,
                    container = container,
                    width = width,
                ),
            });
        } else {
            let min_px = units::breakpoint_width(i - 1, config.gap, config.min_width)? + 1.0;
            let max_px = units::breakpoint_width(i, config.gap, config.min_width)?;
            rules.push(LayoutRule {
                band: BreakpointBand::Columns { columns: i, min_px, max_px },
                css: format!(
                    "/* {i} columns */\n@media (min-width: {min}px) and (max-width: {max}px) {{\n  {container} {{\n    grid-template-columns: repeat({i}, {width});\n  }}\n}}",
                    i = i,
                    min = min_px,
                    max = max_px,
                    container = container,
                    width = width,
                ),
            });
        }
    }

    Ok(LayoutStylesheet::new(rules))
}

const CARD_VARIABLE_DEFAULTS: [(&str, &str); 6] = [
    ("--card-bg", "#ffffff"),
    ("--card-text", "#1f2937"),
    ("--card-border", "#e5e7eb"),
    ("--card-shadow", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
    ("--card-radius", "12px"),
    ("--card-padding", "1.5rem"),
];

/// Non-responsive visual rule set for a single card.
///
/// Parameterized by the same custom-property names the binding engine
/// injects; unspecified variables fall back to fixed constants. Total.
pub fn generate_card_base_style(overrides: &HashMap<String, String>) -> String {
    let var = |name: &str| -> String {
        overrides.get(name).cloned().unwrap_or_else(|| {
            CARD_VARIABLE_DEFAULTS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_default()
        })
    };

    format!(
        ".card {{\n  background: {bg};\n  color: {text};\n  border: 1px solid {border};\n  box-shadow: {shadow};\n  border-radius: {radius};\n  padding: {padding};\n  transition: box-shadow 0.3s ease, transform 0.3s ease;\n}}\n\n.card:hover {{\n  box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.15);\n  transform: translateY(-2px);\n}}\n\n.card-cover {{\n  width: 100%;\n  height: 200px;\n  object-fit: cover;\n  border-radius: calc({radius} - 4px);\n  margin-bottom: 1rem;\n}}\n\n.card-title {{\n  font-size: 1.25rem;\n  font-weight: 600;\n  margin-bottom: 0.5rem;\n  color: {text};\n}}\n\n.card-description {{\n  font-size: 0.875rem;\n  line-height: 1.5;\n  color: {text};\n  opacity: 0.8;\n  margin-bottom: 1rem;\n}}\n\n.card-tags {{\n  display: flex;\n  flex-wrap: wrap;\n  gap: 0.5rem;\n}}\n\n.card-tag {{\n  padding: 0.25rem 0.75rem;\n  background: {border};\n  color: {text};\n  border-radius: 9999px;\n  font-size: 0.75rem;\n  font-weight: 500;\n}}",
        bg = var("--card-bg"),
        text = var("--card-text"),
        border = var("--card-border"),
        shadow = var("--card-shadow"),
        radius = var("--card-radius"),
        padding = var("--card-padding"),
    )
}
