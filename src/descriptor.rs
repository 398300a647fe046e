//! Style-set documents: parsing, validation, and the compiled template form.
//!
//! A style set arrives as one JSON document (historically an entry in a
//! `STYLE_SETS` array). Two formats exist in the wild: the templated format
//! nests appearance under `cardStyle` and carries `template`/`fields`/
//! `dataMapping`, while the legacy format spreads flat `cardBg`/`cardText`/…
//! keys at the top level and has no template at all. The distinction is
//! resolved exactly once, at load time, into [`StyleDescriptor`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, GridConfig, Result};

/// Shadow preset names a style set may carry.
///
/// Unknown names (including raw CSS shadow strings found in some documents)
/// fall back to `Md` rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowLevel {
    None,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ShadowLevel {
    pub fn from_name(name: &str) -> Self {
        match name {
            "none" => Self::None,
            "sm" => Self::Sm,
            "md" => Self::Md,
            "lg" => Self::Lg,
            "xl" => Self::Xl,
            _ => Self::Md,
        }
    }

    pub fn css_value(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sm => "0 1px 2px rgba(0, 0, 0, 0.05)",
            Self::Md => "0 4px 6px rgba(0, 0, 0, 0.1)",
            Self::Lg => "0 10px 15px rgba(0, 0, 0, 0.1)",
            Self::Xl => "0 20px 25px rgba(0, 0, 0, 0.15)",
        }
    }
}

/// Visual parameters shared by both descriptor formats.
#[derive(Debug, Clone)]
pub struct CardAppearance {
    pub background: String,
    pub text_color: String,
    pub border_color: String,
    pub accent_color: Option<String>,
    /// Corner radius in pixels
    pub corner_radius: f64,
    /// Inner padding in pixels
    pub inner_padding: f64,
    pub shadow: ShadowLevel,
}

impl Default for CardAppearance {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            border_color: "#e5e7eb".to_string(),
            accent_color: None,
            corner_radius: 12.0,
            inner_padding: 16.0,
            shadow: ShadowLevel::Md,
        }
    }
}

/// The fixed typography roles a style set may specify.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TypographyRole {
    Title,
    Subtitle,
    Description,
    Price,
    Badge,
    Button,
    Author,
    Role,
}

impl TypographyRole {
    /// Canonical emission order for variable blocks.
    pub const ALL: [TypographyRole; 8] = [
        Self::Title,
        Self::Subtitle,
        Self::Description,
        Self::Price,
        Self::Badge,
        Self::Button,
        Self::Author,
        Self::Role,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Description => "description",
            Self::Price => "price",
            Self::Badge => "badge",
            Self::Button => "button",
            Self::Author => "author",
            Self::Role => "role",
        }
    }
}

/// Per-role typography settings. Absent properties emit nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: Option<f64>,
    pub font_weight: Option<u32>,
    pub color: Option<String>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align: Option<String>,
    pub text_transform: Option<String>,
}

pub type Typography = BTreeMap<TypographyRole, TextStyle>;

/// Hover-interaction flags of a style set's animation block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoverAnimation {
    pub card_lift: bool,
    pub lift_distance: f64,
    pub card_shadow: bool,
    pub shadow_intensity: f64,
    pub image_zoom: bool,
    pub image_scale: f64,
    pub button_color_change: bool,
    pub button_hover_color: String,
}

/// Entry-animation settings. `kind` names a keyframe preset; unknown names
/// simply produce no entry CSS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryAnimation {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: f64,
    pub delay: f64,
    pub stagger: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSpec {
    pub enabled: bool,
    pub hover: HoverAnimation,
    pub entry: EntryAnimation,
}

/// Declared field of a templated style set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub required: bool,
    pub default: String,
}

/// One node of a compiled template: literal text or a field reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(String),
}

/// Template markup pre-split into literal/field segments.
///
/// Built once at load; binding becomes a single pass over the segment list,
/// and every field reference is known statically.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

fn placeholder_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap())
}

impl CompiledTemplate {
    pub fn compile(markup: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for caps in placeholder_token().captures_iter(markup) {
            let whole = caps.get(0).unwrap();
            if whole.start() > cursor {
                segments.push(Segment::Literal(markup[cursor..whole.start()].to_string()));
            }
            segments.push(Segment::Field(caps[1].to_string()));
            cursor = whole.end();
        }
        if cursor < markup.len() {
            segments.push(Segment::Literal(markup[cursor..].to_string()));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Markup plus companion stylesheet fragment of a templated style set.
#[derive(Debug, Clone)]
pub struct CardTemplate {
    pub markup: String,
    pub style_fragment: String,
    pub compiled: CompiledTemplate,
}

/// Templated-format style set.
#[derive(Debug, Clone)]
pub struct TemplatedStyle {
    pub id: String,
    pub name: String,
    pub card: CardAppearance,
    pub grid: Option<GridConfig>,
    pub fields: BTreeMap<String, FieldSpec>,
    pub data_mapping: BTreeMap<String, Vec<String>>,
    pub template: CardTemplate,
    pub typography: Typography,
    pub animation: AnimationSpec,
}

/// Legacy-format style set: no template, no field mapping. Rendering falls
/// back to the built-in heuristic card layout.
#[derive(Debug, Clone)]
pub struct LegacyStyle {
    pub id: String,
    pub name: String,
    pub card: CardAppearance,
    pub typography: Typography,
    pub animation: AnimationSpec,
}

/// A style descriptor with its format resolved at load time.
#[derive(Debug, Clone)]
pub enum StyleDescriptor {
    Legacy(LegacyStyle),
    Templated(TemplatedStyle),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCardStyle {
    bg: Option<String>,
    text: Option<String>,
    border: Option<String>,
    accent: Option<String>,
    radius: Option<f64>,
    padding: Option<f64>,
    shadow: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTemplate {
    html: String,
    css: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStyleSet {
    id: Value,
    name: String,
    grid: Option<GridConfig>,
    card_style: Option<RawCardStyle>,
    card_bg: Option<String>,
    card_text: Option<String>,
    card_border: Option<String>,
    card_accent: Option<String>,
    card_radius: Option<f64>,
    card_padding: Option<f64>,
    card_shadow: Option<String>,
    text_styles: Option<Typography>,
    animation: Option<AnimationSpec>,
    template: Option<RawTemplate>,
    fields: Option<BTreeMap<String, FieldSpec>>,
    data_mapping: Option<BTreeMap<String, Vec<String>>>,
}

fn id_text(id: &Value) -> Result<String> {
    match id {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::InvalidStyleSet("missing or empty id".into())),
    }
}

impl StyleDescriptor {
    /// Load one style set from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::InvalidStyleSet(format!("not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Load one style set from a parsed JSON document.
    pub fn from_value(value: &Value) -> Result<Self> {
        let raw: RawStyleSet = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidStyleSet(format!("malformed document: {}", e)))?;

        let id = id_text(&raw.id)?;
        let card = card_appearance(&raw);
        let typography = raw.text_styles.unwrap_or_default();
        let animation = raw.animation.unwrap_or_default();

        // Format detection: a template with markup selects the templated
        // path; everything else renders through the legacy heuristics.
        let template = match raw.template {
            Some(t) if !t.html.is_empty() => t,
            _ => {
                return Ok(Self::Legacy(LegacyStyle {
                    id,
                    name: raw.name,
                    card,
                    typography,
                    animation,
                }));
            }
        };

        let fields = raw.fields.unwrap_or_default();
        let data_mapping = raw.data_mapping.unwrap_or_default();
        let compiled = CompiledTemplate::compile(&template.html);

        for key in data_mapping.keys() {
            if !fields.contains_key(key) {
                return Err(Error::InvalidStyleSet(format!(
                    "{}: dataMapping key '{}' has no matching field",
                    id, key
                )));
            }
        }
        for name in compiled.field_names() {
            if !fields.contains_key(name) {
                return Err(Error::InvalidStyleSet(format!(
                    "{}: template references undeclared field '{}'",
                    id, name
                )));
            }
        }

        Ok(Self::Templated(TemplatedStyle {
            id,
            name: raw.name,
            card,
            grid: raw.grid,
            fields,
            data_mapping,
            template: CardTemplate {
                markup: template.html,
                style_fragment: template.css,
                compiled,
            },
            typography,
            animation,
        }))
    }

    /// Load a whole style-set collection (a JSON array of documents).
    pub fn load_collection(text: &str) -> Result<Vec<Self>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::InvalidStyleSet(format!("not valid JSON: {}", e)))?;
        let entries = value
            .as_array()
            .ok_or_else(|| Error::InvalidStyleSet("expected an array of style sets".into()))?;
        entries.iter().map(Self::from_value).collect()
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Legacy(s) => &s.id,
            Self::Templated(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Legacy(s) => &s.name,
            Self::Templated(s) => &s.name,
        }
    }

    pub fn card(&self) -> &CardAppearance {
        match self {
            Self::Legacy(s) => &s.card,
            Self::Templated(s) => &s.card,
        }
    }

    pub fn typography(&self) -> &Typography {
        match self {
            Self::Legacy(s) => &s.typography,
            Self::Templated(s) => &s.typography,
        }
    }

    pub fn animation(&self) -> &AnimationSpec {
        match self {
            Self::Legacy(s) => &s.animation,
            Self::Templated(s) => &s.animation,
        }
    }

    /// Grid configuration embedded in the document, when present.
    pub fn grid(&self) -> Option<&GridConfig> {
        match self {
            Self::Legacy(_) => None,
            Self::Templated(s) => s.grid.as_ref(),
        }
    }

    pub fn is_templated(&self) -> bool {
        matches!(self, Self::Templated(_))
    }
}

fn card_appearance(raw: &RawStyleSet) -> CardAppearance {
    let defaults = CardAppearance::default();

    if let Some(style) = &raw.card_style {
        return CardAppearance {
            background: style.bg.clone().unwrap_or(defaults.background),
            text_color: style.text.clone().unwrap_or(defaults.text_color),
            border_color: style.border.clone().unwrap_or(defaults.border_color),
            accent_color: style.accent.clone(),
            corner_radius: style.radius.unwrap_or(defaults.corner_radius),
            inner_padding: style.padding.unwrap_or(defaults.inner_padding),
            shadow: style
                .shadow
                .as_deref()
                .map(ShadowLevel::from_name)
                .unwrap_or_default(),
        };
    }

    // Legacy documents keep appearance keys flat at the top level.
    CardAppearance {
        background: raw.card_bg.clone().unwrap_or(defaults.background),
        text_color: raw.card_text.clone().unwrap_or(defaults.text_color),
        border_color: raw.card_border.clone().unwrap_or(defaults.border_color),
        accent_color: raw.card_accent.clone(),
        corner_radius: raw.card_radius.unwrap_or(defaults.corner_radius),
        inner_padding: raw.card_padding.unwrap_or(defaults.inner_padding),
        shadow: raw
            .card_shadow
            .as_deref()
            .map(ShadowLevel::from_name)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templated_doc() -> serde_json::Value {
        serde_json::json!({
            "id": "minimal-card",
            "name": "Minimal Card",
            "cardStyle": {"bg": "#ffffff", "text": "#1f2937", "border": "#f3f4f6", "radius": 8, "padding": 16, "shadow": "none"},
            "template": {
                "html": "<h3 class=\"card-title\">{{name}}</h3><span class=\"card-price\">{{price}}</span>",
                "css": ".card { overflow: hidden; }"
            },
            "fields": {
                "name": {"required": true, "default": "Product Name"},
                "price": {"required": true, "default": "$99"}
            },
            "dataMapping": {
                "name": ["name", "title"],
                "price": ["price"]
            }
        })
    }

    #[test]
    fn template_presence_selects_templated_format() {
        let descriptor = StyleDescriptor::from_value(&templated_doc()).unwrap();
        assert!(descriptor.is_templated());

        let legacy = serde_json::json!({
            "id": 7,
            "name": "Old Style",
            "cardBg": "#fafafa",
            "cardShadow": "lg"
        });
        let descriptor = StyleDescriptor::from_value(&legacy).unwrap();
        assert!(!descriptor.is_templated());
        assert_eq!(descriptor.id(), "7");
        assert_eq!(descriptor.card().background, "#fafafa");
        assert_eq!(descriptor.card().shadow, ShadowLevel::Lg);
    }

    #[test]
    fn compile_splits_literals_and_fields() {
        let compiled = CompiledTemplate::compile("<b>{{name}}</b> costs {{price}}");
        assert_eq!(
            compiled.segments(),
            &[
                Segment::Literal("<b>".into()),
                Segment::Field("name".into()),
                Segment::Literal("</b> costs ".into()),
                Segment::Field("price".into()),
            ]
        );
    }

    #[test]
    fn mapping_key_without_field_is_rejected() {
        let mut doc = templated_doc();
        doc["dataMapping"]["category"] = serde_json::json!(["category"]);
        let err = StyleDescriptor::from_value(&doc).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn undeclared_placeholder_is_rejected() {
        let mut doc = templated_doc();
        doc["template"]["html"] = serde_json::json!("<p>{{summary}}</p>");
        let err = StyleDescriptor::from_value(&doc).unwrap_err();
        assert!(err.to_string().contains("summary"));
    }

    #[test]
    fn unknown_shadow_names_fall_back_to_md() {
        assert_eq!(ShadowLevel::from_name("xl"), ShadowLevel::Xl);
        assert_eq!(
            ShadowLevel::from_name("0 4px 6px -1px rgba(0,0,0,0.05)"),
            ShadowLevel::Md
        );
    }

    #[test]
    fn collection_loads_every_entry() {
        let text = format!("[{}]", templated_doc());
        let sets = StyleDescriptor::load_collection(&text).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id(), "minimal-card");
    }
}
