//! Binds data records against style descriptors and emits the companion
//! style fragments (custom-property block, text styles, animation rules).
//!
//! Binding is best-effort by design: a malformed or incomplete record must
//! still produce a renderable card, so resolution never fails. Degradation
//! is visible in the output (empty substitutions, pass-through URLs) and in
//! the [`FieldValue`] provenance attached to each rendered card.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::descriptor::{
    AnimationSpec, Segment, StyleDescriptor, TemplatedStyle, TextStyle, Typography, TypographyRole,
};
use crate::rendering::assets;
use crate::DataRecord;

/// Reserved field name whose resolved values pass through asset-URL
/// normalization before substitution.
pub const IMAGE_FIELD: &str = "image";

/// Where a field's rendered value came from.
///
/// Distinguishes "resolved from the record" from "declared default used"
/// from "nothing at all" — the empty string is not used as a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    FromRecord(String),
    DefaultUsed(String),
    Missing,
}

impl FieldValue {
    /// Text that ends up in the markup; `Missing` substitutes as empty.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FromRecord(s) | Self::DefaultUsed(s) => s,
            Self::Missing => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Output of one binding call.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub markup: String,
    /// Resolved value per declared field (templated mode) or per inferred
    /// role (legacy mode).
    pub applied: BTreeMap<String, FieldValue>,
}

/// Resolve one logical field against a record through its ranked candidate
/// source-column names.
///
/// The first candidate present with a non-empty value wins; matching is on
/// exact key equality. Without a match (or without a record) the declared
/// default applies; an empty default resolves to `Missing`.
pub fn resolve_field(
    record: Option<&DataRecord>,
    candidates: &[String],
    default: &str,
) -> FieldValue {
    if let Some(record) = record {
        for key in candidates {
            if let Some(value) = record.get_text(key) {
                return FieldValue::FromRecord(value);
            }
        }
    }
    if default.is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::DefaultUsed(default.to_string())
    }
}

fn image_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<img\s+").unwrap())
}

/// Stamp every image tag so it can be read back programmatically after
/// export (cross-origin rasterization), not merely displayed.
pub fn mark_images_fetchable(markup: &str) -> String {
    image_tag()
        .replace_all(markup, "<img crossorigin=\"anonymous\" ")
        .into_owned()
}

/// Bind one record (or none, for placeholder output) against a descriptor.
pub fn bind_record(style: &StyleDescriptor, record: Option<&DataRecord>) -> RenderedCard {
    match style {
        StyleDescriptor::Templated(templated) => bind_templated(templated, record),
        StyleDescriptor::Legacy(_) => bind_legacy(record),
    }
}

fn bind_templated(style: &TemplatedStyle, record: Option<&DataRecord>) -> RenderedCard {
    let mut applied = BTreeMap::new();

    for (name, spec) in &style.fields {
        let candidates = style
            .data_mapping
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mut value = resolve_field(record, candidates, &spec.default);

        // Placeholder image URLs authored as defaults stay as authored.
        if name == IMAGE_FIELD {
            if let FieldValue::FromRecord(url) = &value {
                if url != &spec.default {
                    value = FieldValue::FromRecord(assets::normalize_asset_url(url));
                }
            }
        }

        applied.insert(name.clone(), value);
    }

    let mut markup = String::new();
    for segment in style.template.compiled.segments() {
        match segment {
            Segment::Literal(text) => markup.push_str(text),
            Segment::Field(name) => {
                markup.push_str(applied.get(name).map(FieldValue::as_str).unwrap_or(""));
            }
        }
    }

    RenderedCard {
        markup: mark_images_fetchable(&markup),
        applied,
    }
}

fn find_key<'a>(keys: &[&'a str], needles: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find(|key| {
            let lower = key.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
        .copied()
}

/// Built-in card layout for descriptors that predate the templated format.
///
/// Field roles are inferred by case-insensitive substring matching over the
/// record's own keys; declared fields and mappings play no part here.
fn bind_legacy(record: Option<&DataRecord>) -> RenderedCard {
    let mut applied = BTreeMap::new();
    let Some(record) = record else {
        return RenderedCard { markup: String::new(), applied };
    };

    let keys: Vec<&str> = record.keys().collect();
    let name_key = find_key(&keys, &["name"]).or_else(|| keys.first().copied());
    let desc_key = find_key(&keys, &["desc"]);
    let price_key = find_key(&keys, &["price"]);
    let image_key = find_key(&keys, &["image", "url"]);
    let tags_key = find_key(&keys, &["tag"]);
    let subtitle_key = find_key(&keys, &["subtitle", "category"]);

    let name_text = name_key.and_then(|k| record.get_text(k));
    let mut markup = String::new();

    if let Some(url) = image_key.and_then(|k| record.get_text(k)) {
        let src = assets::normalize_asset_url(&url);
        markup.push_str(&format!(
            "<img crossorigin=\"anonymous\" src=\"{}\" alt=\"{}\" style=\"width: 100%; aspect-ratio: 1/1; object-fit: cover; border-radius: 8px; margin-bottom: 12px;\">",
            src,
            name_text.as_deref().unwrap_or("")
        ));
        applied.insert("image".to_string(), FieldValue::FromRecord(src));
    }

    if let Some(subtitle) = subtitle_key.and_then(|k| record.get_text(k)) {
        markup.push_str(&format!("<div class=\"subtitle\">{}</div>", subtitle));
        applied.insert("subtitle".to_string(), FieldValue::FromRecord(subtitle));
    }

    if let Some(name) = &name_text {
        markup.push_str(&format!("<h3>{}</h3>", name));
        applied.insert("name".to_string(), FieldValue::FromRecord(name.clone()));
    }

    if let Some(price) = price_key.and_then(|k| record.get_text(k)) {
        markup.push_str(&format!("<div class=\"price\">{}</div>", price));
        applied.insert("price".to_string(), FieldValue::FromRecord(price));
    }

    if let Some(desc) = desc_key.and_then(|k| record.get_text(k)) {
        markup.push_str(&format!("<p>{}</p>", desc));
        applied.insert("description".to_string(), FieldValue::FromRecord(desc));
    }

    if let Some(tags) = tags_key.and_then(|k| record.get_text(k)) {
        markup.push_str(
            "<div style=\"display: flex; gap: 8px; flex-wrap: wrap; margin-top: 8px;\">",
        );
        for tag in tags.split(',') {
            markup.push_str(&format!("<span class=\"badge\">{}</span>", tag.trim()));
        }
        markup.push_str("</div>");
        applied.insert("tags".to_string(), FieldValue::FromRecord(tags));
    }

    RenderedCard { markup, applied }
}

fn push_role_variables(css: &mut String, role: TypographyRole, style: &TextStyle) {
    let role = role.as_str();
    if let Some(color) = &style.color {
        css.push_str(&format!("  --{}-color: {};\n", role, color));
    }
    if let Some(size) = style.font_size {
        css.push_str(&format!("  --{}-font-size: {}px;\n", role, size));
    }
    if let Some(weight) = style.font_weight {
        css.push_str(&format!("  --{}-font-weight: {};\n", role, weight));
    }
    if let Some(height) = style.line_height {
        css.push_str(&format!("  --{}-line-height: {};\n", role, height));
    }
    if let Some(spacing) = style.letter_spacing {
        css.push_str(&format!("  --{}-letter-spacing: {}px;\n", role, spacing));
    }
    if let Some(align) = &style.text_align {
        css.push_str(&format!("  --{}-text-align: {};\n", role, align));
    }
    if let Some(transform) = &style.text_transform {
        css.push_str(&format!("  --{}-text-transform: {};\n", role, transform));
    }
}

/// The `.card` custom-property block that parameterizes the card rule sets.
///
/// Emits the `--card-*` appearance variables and, per typography role the
/// descriptor specifies, that role's `--{role}-*` variables in canonical
/// role order. Missing roles emit nothing; defaults live elsewhere.
pub fn generate_variable_block(style: &StyleDescriptor) -> String {
    let card = style.card();
    let mut css = String::from(".card {\n");
    css.push_str(&format!("  --card-bg: {};\n", card.background));
    css.push_str(&format!("  --card-text: {};\n", card.text_color));
    css.push_str(&format!("  --card-border: {};\n", card.border_color));
    css.push_str(&format!("  --card-radius: {}px;\n", card.corner_radius));
    css.push_str(&format!("  --card-padding: {}px;\n", card.inner_padding));
    css.push_str(&format!("  --card-shadow: {};\n", card.shadow.css_value()));

    for role in TypographyRole::ALL {
        if let Some(text_style) = style.typography().get(&role) {
            push_role_variables(&mut css, role, text_style);
        }
    }

    css.push('}');
    css
}

const TEXT_STYLE_SELECTORS: [(TypographyRole, &str); 6] = [
    (TypographyRole::Title, ".card h3"),
    (TypographyRole::Subtitle, ".card .subtitle"),
    (TypographyRole::Description, ".card p"),
    (TypographyRole::Price, ".card .price"),
    (TypographyRole::Badge, ".card .badge"),
    (TypographyRole::Button, ".card button"),
];

/// Selector-scoped typography rules for the built-in legacy card layout.
pub fn generate_text_styles_css(typography: &Typography) -> String {
    let mut css = String::new();

    for (role, selector) in TEXT_STYLE_SELECTORS {
        let Some(style) = typography.get(&role) else {
            continue;
        };
        css.push_str(&format!("\n{} {{", selector));
        if let Some(size) = style.font_size {
            css.push_str(&format!("font-size: {}px;", size));
        }
        if let Some(weight) = style.font_weight {
            css.push_str(&format!("font-weight: {};", weight));
        }
        if let Some(color) = &style.color {
            css.push_str(&format!("color: {};", color));
        }
        if let Some(height) = style.line_height {
            css.push_str(&format!("line-height: {};", height));
        }
        if let Some(spacing) = style.letter_spacing {
            css.push_str(&format!("letter-spacing: {}px;", spacing));
        }
        if let Some(align) = &style.text_align {
            css.push_str(&format!("text-align: {};", align));
        }
        if let Some(transform) = &style.text_transform {
            css.push_str(&format!("text-transform: {};", transform));
        }
        css.push('}');
    }

    css
}

fn entry_keyframes(kind: &str) -> Option<(&'static str, &'static str)> {
    match kind {
        "fade" => Some(("opacity: 0;", "opacity: 1;")),
        "slideUp" => Some((
            "transform: translateY(20px); opacity: 0;",
            "transform: translateY(0); opacity: 1;",
        )),
        "slideDown" => Some((
            "transform: translateY(-20px); opacity: 0;",
            "transform: translateY(0); opacity: 1;",
        )),
        "slideLeft" => Some((
            "transform: translateX(20px); opacity: 0;",
            "transform: translateX(0); opacity: 1;",
        )),
        "slideRight" => Some((
            "transform: translateX(-20px); opacity: 0;",
            "transform: translateX(0); opacity: 1;",
        )),
        "scale" => Some((
            "transform: scale(0.9); opacity: 0;",
            "transform: scale(1); opacity: 1;",
        )),
        _ => None,
    }
}

/// Entry-animation rules. Disabled animation (or an unknown keyframe
/// preset) emits nothing.
pub fn generate_animation_css(animation: &AnimationSpec) -> String {
    if !animation.enabled || !animation.entry.enabled {
        return String::new();
    }
    let Some((from, to)) = entry_keyframes(&animation.entry.kind) else {
        return String::new();
    };

    let duration = if animation.entry.duration > 0.0 {
        animation.entry.duration
    } else {
        0.4
    };
    let delay = if animation.entry.stagger { 0.1 } else { 0.0 };

    format!(
        "@keyframes cardEntry {{\n  from {{ {from} }}\n  to {{ {to} }}\n}}\n.card {{\n  animation: cardEntry {duration}s ease-out {delay}s backwards;\n}}",
        from = from,
        to = to,
        duration = duration,
        delay = delay,
    )
}

/// Hover-interaction rules for the built-in card layout.
pub fn generate_hover_css(animation: &AnimationSpec) -> String {
    if !animation.enabled {
        return String::new();
    }
    let hover = &animation.hover;
    let mut css = String::new();

    if hover.card_lift {
        let lift = if hover.lift_distance > 0.0 { hover.lift_distance } else { 4.0 };
        css.push_str(&format!(".card:hover {{\n  transform: translateY(-{}px);\n", lift));
        if hover.card_shadow {
            let intensity = if hover.shadow_intensity > 0.0 {
                hover.shadow_intensity
            } else {
                0.15
            };
            css.push_str(&format!("  box-shadow: 0 12px 24px rgba(0,0,0,{});\n", intensity));
        }
        css.push('}');
    }

    if hover.image_zoom {
        if !css.is_empty() {
            css.push('\n');
        }
        let scale = if hover.image_scale > 0.0 { hover.image_scale } else { 1.05 };
        css.push_str(&format!(
            ".card img {{\n  transition: transform 0.2s ease;\n}}\n.card:hover img {{\n  transform: scale({});\n}}",
            scale
        ));
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StyleDescriptor;

    fn style() -> StyleDescriptor {
        StyleDescriptor::from_value(&serde_json::json!({
            "id": "test-card",
            "name": "Test Card",
            "cardStyle": {"bg": "#fff", "text": "#111", "border": "#eee", "radius": 8, "padding": 16, "shadow": "sm"},
            "textStyles": {
                "title": {"fontSize": 16, "fontWeight": 600, "color": "#111827"}
            },
            "template": {
                "html": "<img src=\"{{image}}\" alt=\"{{name}}\" /><h3>{{name}}</h3><span class=\"card-price\">{{price}}</span>",
                "css": ""
            },
            "fields": {
                "image": {"required": true, "default": "https://placeholder.example/p.png"},
                "name": {"required": true, "default": "Product Name"},
                "price": {"required": false, "default": ""}
            },
            "dataMapping": {
                "image": ["image", "url"],
                "name": ["name", "title"],
                "price": ["price"]
            }
        }))
        .unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> DataRecord {
        let mut record = DataRecord::new();
        for (key, value) in pairs {
            record.insert(*key, serde_json::json!(value));
        }
        record
    }

    #[test]
    fn first_matching_candidate_wins() {
        let card = bind_record(&style(), Some(&record(&[("title", "Lamp")])));
        assert_eq!(card.applied["name"], FieldValue::FromRecord("Lamp".into()));
        assert!(card.markup.contains("<h3>Lamp</h3>"));
    }

    #[test]
    fn empty_record_falls_back_to_defaults() {
        let card = bind_record(&style(), Some(&record(&[])));
        assert_eq!(
            card.applied["name"],
            FieldValue::DefaultUsed("Product Name".into())
        );
        assert!(card.markup.contains("<h3>Product Name</h3>"));
    }

    #[test]
    fn missing_field_with_empty_default_substitutes_nothing() {
        let card = bind_record(&style(), None);
        assert!(card.applied["price"].is_missing());
        assert!(card.markup.contains("<span class=\"card-price\"></span>"));
        // Non-empty defaults still appear verbatim.
        assert!(card.markup.contains("Product Name"));
    }

    #[test]
    fn record_sourced_image_urls_are_normalized() {
        let card = bind_record(
            &style(),
            Some(&record(&[("url", "https://drive.google.com/file/d/XYZ/view")])),
        );
        assert!(card
            .markup
            .contains("src=\"https://lh3.googleusercontent.com/d/XYZ=w1600\""));
    }

    #[test]
    fn default_image_url_is_not_rewritten() {
        let card = bind_record(&style(), None);
        assert_eq!(
            card.applied["image"],
            FieldValue::DefaultUsed("https://placeholder.example/p.png".into())
        );
    }

    #[test]
    fn binding_is_idempotent() {
        let descriptor = style();
        let row = record(&[("name", "Chair"), ("price", "$120")]);
        let first = bind_record(&descriptor, Some(&row));
        let second = bind_record(&descriptor, Some(&row));
        assert_eq!(first.markup, second.markup);
    }

    #[test]
    fn image_tags_carry_the_fetchable_flag() {
        let card = bind_record(&style(), None);
        assert!(card.markup.contains("<img crossorigin=\"anonymous\" src="));
    }

    #[test]
    fn placeholder_repeats_substitute_globally() {
        let descriptor = StyleDescriptor::from_value(&serde_json::json!({
            "id": "twice",
            "name": "Twice",
            "template": {"html": "<p>{{name}} and {{name}}</p>", "css": ""},
            "fields": {"name": {"default": "X"}},
            "dataMapping": {"name": ["name"]}
        }))
        .unwrap();
        let card = bind_record(&descriptor, None);
        assert_eq!(card.markup, "<p>X and X</p>");
    }

    #[test]
    fn legacy_heuristics_infer_roles_from_record_keys() {
        let legacy = StyleDescriptor::from_value(&serde_json::json!({
            "id": "old",
            "name": "Old"
        }))
        .unwrap();
        let row = record(&[
            ("Product Name", "Desk"),
            ("Price", "$250"),
            ("Description", "Oak desk"),
            ("Image URL", "https://example.com/desk.jpg"),
            ("Tags", "wood, office"),
        ]);
        let card = bind_record(&legacy, Some(&row));
        assert!(card.markup.contains("<h3>Desk</h3>"));
        assert!(card.markup.contains("<div class=\"price\">$250</div>"));
        assert!(card.markup.contains("<p>Oak desk</p>"));
        assert!(card.markup.contains("<span class=\"badge\">wood</span>"));
        assert!(card.markup.contains("<span class=\"badge\">office</span>"));
        assert!(card.markup.contains("crossorigin=\"anonymous\""));
    }

    #[test]
    fn legacy_name_falls_back_to_first_record_key() {
        let legacy = StyleDescriptor::from_value(&serde_json::json!({
            "id": "old",
            "name": "Old"
        }))
        .unwrap();
        let card = bind_record(&legacy, Some(&record(&[("headline", "First!")])));
        assert!(card.markup.contains("<h3>First!</h3>"));
    }

    #[test]
    fn variable_block_contains_card_and_role_variables() {
        let css = generate_variable_block(&style());
        assert!(css.starts_with(".card {"));
        assert!(css.contains("--card-bg: #fff;"));
        assert!(css.contains("--card-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);"));
        assert!(css.contains("--title-font-size: 16px;"));
        // No subtitle style was declared, so no subtitle variables appear.
        assert!(!css.contains("--subtitle-"));
    }

    #[test]
    fn animation_css_is_empty_unless_enabled_and_known() {
        let mut animation = AnimationSpec::default();
        assert_eq!(generate_animation_css(&animation), "");

        animation.enabled = true;
        animation.entry.enabled = true;
        animation.entry.kind = "fadeInUp".to_string();
        assert_eq!(generate_animation_css(&animation), "");

        animation.entry.kind = "slideUp".to_string();
        animation.entry.duration = 0.3;
        animation.entry.stagger = true;
        let css = generate_animation_css(&animation);
        assert!(css.contains("@keyframes cardEntry"));
        assert!(css.contains("animation: cardEntry 0.3s ease-out 0.1s backwards;"));
    }

    #[test]
    fn hover_css_reflects_flags() {
        let mut animation = AnimationSpec::default();
        animation.enabled = true;
        animation.hover.card_lift = true;
        animation.hover.card_shadow = true;
        animation.hover.image_zoom = true;
        let css = generate_hover_css(&animation);
        assert!(css.contains("transform: translateY(-4px);"));
        assert!(css.contains("box-shadow: 0 12px 24px rgba(0,0,0,0.15);"));
        assert!(css.contains("transform: scale(1.05);"));
    }
}
