//! Page assembly: concatenates rendered cards inside the grid container and
//! packages everything into an exportable document.
//!
//! Cards are emitted in input record order; the rendering itself carries no
//! ordering dependency, but downstream consumers do.

use std::collections::HashMap;

use crate::descriptor::StyleDescriptor;
use crate::rendering::{grid, template};
use crate::{DataRecord, GridConfig, Result, DEFAULT_CONTAINER};

/// The grid container with one card per record.
///
/// With no records, emits `columns * 3` dashed placeholder cards so an
/// unconnected grid still previews its shape.
pub fn render_grid_section(
    style: &StyleDescriptor,
    records: &[DataRecord],
    config: &GridConfig,
) -> String {
    let mut html = String::from("<div class=\"grid-container\">");

    if records.is_empty() {
        let total = config.columns * 3;
        for i in 1..=total {
            html.push_str(&format!(
                "<div class=\"card placeholder-card\" style=\"background: #f9fafb; border: 2px dashed #d1d5db; display: flex; align-items: center; justify-content: center; min-height: 200px; color: #9ca3af; font-size: 14px;\">Card {}</div>",
                i
            ));
        }
    } else {
        for record in records {
            let card = template::bind_record(style, Some(record));
            html.push_str(&format!("<div class=\"card\">{}</div>", card.markup));
        }
    }

    html.push_str("</div>");
    html
}

/// Card style fragments for one descriptor, assembled per rendering mode.
///
/// Templated: variable block, text styles, entry animation, then the
/// descriptor's own style fragment (its selectors read the variables).
/// Legacy: the built-in `.card` rule set plus hover/text/animation rules.
pub fn card_styles(style: &StyleDescriptor) -> String {
    let animation = style.animation();

    match style {
        StyleDescriptor::Templated(templated) => {
            let mut parts = vec![
                template::generate_variable_block(style),
                template::generate_text_styles_css(style.typography()),
                template::generate_animation_css(animation),
                templated.template.style_fragment.clone(),
            ];
            parts.retain(|part| !part.is_empty());
            parts.join("\n")
        }
        StyleDescriptor::Legacy(_) => {
            let card = style.card();
            let mut css = format!(
                ".card {{\n  background: {};\n  color: {};\n  border: 1px solid {};\n  border-radius: {}px;\n  padding: {}px;\n  box-shadow: {};\n  display: flex;\n  flex-direction: column;\n",
                card.background,
                card.text_color,
                card.border_color,
                card.corner_radius,
                card.inner_padding,
                card.shadow.css_value(),
            );
            if animation.enabled {
                css.push_str("  transition: transform 0.2s ease, box-shadow 0.2s ease;\n");
            }
            css.push('}');

            for extra in [
                template::generate_hover_css(animation),
                template::generate_text_styles_css(style.typography()),
                template::generate_animation_css(animation),
            ] {
                if !extra.is_empty() {
                    css.push('\n');
                    css.push_str(&extra);
                }
            }
            css
        }
    }
}

/// A complete standalone HTML document: layout stylesheet, card styles, and
/// the grid section with every record bound in order.
pub fn export_standalone_html(
    style: &StyleDescriptor,
    records: &[DataRecord],
    config: &GridConfig,
    title: &str,
) -> Result<String> {
    let layout = grid::generate_full_layout(config, DEFAULT_CONTAINER)?;

    // Placeholder pages carry only the base card rules; descriptor styling
    // waits until real records arrive.
    let styles = if records.is_empty() {
        grid::generate_card_base_style(&HashMap::new())
    } else {
        card_styles(style)
    };

    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>{}</title>\n", title));
    html.push_str("  <style>\n");
    html.push_str(&layout.to_css());
    html.push_str("\n\n");
    html.push_str(&styles);
    html.push_str("\n  </style>\n</head>\n<body>\n");
    html.push_str(&render_grid_section(style, records, config));
    html.push_str("\n</body>\n</html>");

    Ok(html)
}
