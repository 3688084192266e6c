use std::{fs::File, io::BufReader, path::Path};

use crate::{
    assets::icons::IconId,
    assets::source::ResourceSource,
    foundation::core::Rgba8,
    foundation::error::{PosterError, PosterResult},
};

/// Complete declarative description of one poster.
///
/// A `PosterSpec` is a pure input: the engine never mutates it and re-renders from scratch
/// whenever a new one is submitted. Every field has a default so partial JSON documents are
/// accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterSpec {
    pub title: String,
    pub body: String,
    /// Quote text; the quote box is only drawn when this is non-blank.
    pub quote: String,
    /// Background image; `None` paints the template's two-stop fill.
    pub background: Option<ResourceSource>,
    pub template: Template,
    pub language: Language,
    /// Draw the top/bottom caption pair for [`PosterSpec::language`].
    pub captions: bool,
    pub positions: TextPositions,
    pub fonts: FontFamilies,
    pub font_sizes: FontSizes,
    pub custom_fonts: CustomFonts,
    pub fills: TextFills,
    pub quote_box: QuoteBox,
    pub frame: Frame,
    pub crop: ImageCrop,
    pub clipart: Option<Clipart>,
    pub social_row: IconRow,
    pub place_row: IconRow,
    pub gradient: GradientConfig,
}

impl Default for PosterSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            quote: String::new(),
            background: None,
            template: Template::default(),
            language: Language::default(),
            captions: true,
            positions: TextPositions::default(),
            fonts: FontFamilies::default(),
            font_sizes: FontSizes::default(),
            custom_fonts: CustomFonts::default(),
            fills: TextFills::default(),
            quote_box: QuoteBox::default(),
            frame: Frame::default(),
            crop: ImageCrop::default(),
            clipart: None,
            social_row: IconRow::social(),
            place_row: IconRow::place(),
            gradient: GradientConfig::default(),
        }
    }
}

/// Color template supplying background, body text and quote box colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    ClassicalBlue,
    GoldenElegance,
    RoyalPurple,
}

/// Resolved colors of a [`Template`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplatePalette {
    pub primary: Rgba8,
    pub secondary: Rgba8,
    pub text: Rgba8,
    pub quote_background: Rgba8,
    pub quote_border: Rgba8,
}

impl Template {
    pub fn palette(self) -> TemplatePalette {
        match self {
            Template::ClassicalBlue => TemplatePalette {
                primary: Rgba8::rgb(0x1e, 0x3a, 0x8a),
                secondary: Rgba8::rgb(0xfb, 0xbf, 0x24),
                text: Rgba8::rgb(0xff, 0xff, 0xff),
                quote_background: Rgba8::rgba(251, 191, 36, 51),
                quote_border: Rgba8::rgb(0xfb, 0xbf, 0x24),
            },
            Template::GoldenElegance => TemplatePalette {
                primary: Rgba8::rgb(0x92, 0x40, 0x0e),
                secondary: Rgba8::rgb(0xfb, 0xbf, 0x24),
                text: Rgba8::rgb(0xff, 0xff, 0xff),
                quote_background: Rgba8::rgba(255, 255, 255, 26),
                quote_border: Rgba8::rgb(0xfb, 0xbf, 0x24),
            },
            Template::RoyalPurple => TemplatePalette {
                primary: Rgba8::rgb(0x58, 0x1c, 0x87),
                secondary: Rgba8::rgb(0xa8, 0x55, 0xf7),
                text: Rgba8::rgb(0xff, 0xff, 0xff),
                quote_background: Rgba8::rgba(168, 85, 247, 77),
                quote_border: Rgba8::rgb(0xa8, 0x55, 0xf7),
            },
        }
    }
}

/// Supported caption languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Amharic,
    Oromic,
}

impl Language {
    /// `(top, bottom)` caption texts.
    pub fn captions(self) -> (&'static str, &'static str) {
        match self {
            Language::Amharic => (
                "በስመ አብ ወወልድ ወመንፈስ ቅዱስ አሐዱ አምላክ አሜን",
                "የጅማ ዩንቨርስቲ ቴክኖሎጂ ኢንስቲትዩት ግቢ ጉባኤ",
            ),
            Language::Oromic => (
                "Maqaa Abbaa kan ilmaa kan afuura qulqulluu waaqa tokko ameen",
                "Yaa'ii Mooraa Inistiitiyuutii Teeknooloojii Yuunivarsiitii Jimmaa",
            ),
        }
    }
}

/// Vertical offsets (pixels) of the text blocks. `quote_y` is the top edge of the quote box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextPositions {
    pub title_y: i32,
    pub text_y: i32,
    pub quote_y: i32,
}

impl Default for TextPositions {
    fn default() -> Self {
        Self {
            title_y: 120,
            text_y: 400,
            quote_y: 750,
        }
    }
}

/// Text roles that carry their own font, size and fill.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Title,
    Body,
    Quote,
    Caption,
}

impl FontRole {
    pub const ALL: [FontRole; 4] = [
        FontRole::Title,
        FontRole::Body,
        FontRole::Quote,
        FontRole::Caption,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontRole::Title => "title",
            FontRole::Body => "body",
            FontRole::Quote => "quote",
            FontRole::Caption => "caption",
        }
    }

    /// Titles are set bold; every other role uses the regular weight.
    pub fn is_bold(self) -> bool {
        matches!(self, FontRole::Title)
    }
}

/// Configured system family lists (CSS syntax) per role.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontFamilies {
    pub title: String,
    pub body: String,
    pub quote: String,
    pub caption: String,
}

impl Default for FontFamilies {
    fn default() -> Self {
        let georgia = "Georgia, serif".to_string();
        Self {
            title: georgia.clone(),
            body: georgia.clone(),
            quote: georgia.clone(),
            caption: georgia,
        }
    }
}

impl FontFamilies {
    pub fn get(&self, role: FontRole) -> &str {
        match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
            FontRole::Quote => &self.quote,
            FontRole::Caption => &self.caption,
        }
    }
}

/// Font sizes in pixels per role.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: f32,
    pub body: f32,
    pub quote: f32,
    pub caption: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 72.0,
            body: 32.0,
            quote: 28.0,
            caption: 24.0,
        }
    }
}

impl FontSizes {
    pub fn get(&self, role: FontRole) -> f32 {
        match role {
            FontRole::Title => self.title,
            FontRole::Body => self.body,
            FontRole::Quote => self.quote,
            FontRole::Caption => self.caption,
        }
    }
}

/// Optional custom font resources per role; these win over [`FontFamilies`] when they load.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CustomFonts {
    pub title: Option<ResourceSource>,
    pub body: Option<ResourceSource>,
    pub quote: Option<ResourceSource>,
    pub caption: Option<ResourceSource>,
}

impl CustomFonts {
    pub fn get(&self, role: FontRole) -> Option<&ResourceSource> {
        match role {
            FontRole::Title => self.title.as_ref(),
            FontRole::Body => self.body.as_ref(),
            FontRole::Quote => self.quote.as_ref(),
            FontRole::Caption => self.caption.as_ref(),
        }
    }
}

/// Text fill: a flat color or the fixed golden ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextFill {
    Solid { color: Rgba8 },
    Golden,
}

/// Per-role fill overrides. `None` selects the role default: golden for title and quote, the
/// template text color for body, `#ffd700` for captions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextFills {
    pub title: Option<TextFill>,
    pub body: Option<TextFill>,
    pub quote: Option<TextFill>,
    pub caption: Option<TextFill>,
}

/// Label color shared by captions and icon rows.
pub const LABEL_GOLD: Rgba8 = Rgba8::rgb(0xff, 0xd7, 0x00);

impl TextFills {
    pub fn resolve(&self, role: FontRole, template: Template) -> TextFill {
        let explicit = match role {
            FontRole::Title => self.title,
            FontRole::Body => self.body,
            FontRole::Quote => self.quote,
            FontRole::Caption => self.caption,
        };
        explicit.unwrap_or(match role {
            FontRole::Title | FontRole::Quote => TextFill::Golden,
            FontRole::Body => TextFill::Solid {
                color: template.palette().text,
            },
            FontRole::Caption => TextFill::Solid { color: LABEL_GOLD },
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteBoxStyle {
    Rectangle,
    #[default]
    Rounded,
    Circle,
    Diamond,
    /// Quote text only, without quotation marks, fill or stroke.
    None,
}

/// Quote box style and size. The box is horizontally centered; its top edge is `quote_y`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuoteBox {
    pub style: QuoteBoxStyle,
    pub width: f64,
    pub height: f64,
}

impl Default for QuoteBox {
    fn default() -> Self {
        Self {
            style: QuoteBoxStyle::Rounded,
            width: 600.0,
            height: 150.0,
        }
    }
}

/// Outer decorative frame catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    #[default]
    None,
    Solid,
    Thin,
    Thick,
    Double,
    Dashed,
    Dotted,
    DashDot,
    Rounded,
    Inset,
    Glow,
    Neon,
    Shadow,
    CornerBrackets,
    TwoCorners,
    DiagonalTopLeft,
    DiagonalBottomRight,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 17] = [
        FrameStyle::None,
        FrameStyle::Solid,
        FrameStyle::Thin,
        FrameStyle::Thick,
        FrameStyle::Double,
        FrameStyle::Dashed,
        FrameStyle::Dotted,
        FrameStyle::DashDot,
        FrameStyle::Rounded,
        FrameStyle::Inset,
        FrameStyle::Glow,
        FrameStyle::Neon,
        FrameStyle::Shadow,
        FrameStyle::CornerBrackets,
        FrameStyle::TwoCorners,
        FrameStyle::DiagonalTopLeft,
        FrameStyle::DiagonalBottomRight,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Frame {
    pub style: FrameStyle,
    pub color: Rgba8,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            style: FrameStyle::None,
            color: LABEL_GOLD,
        }
    }
}

/// Extra placement applied to the background after cover-fitting.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageCrop {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Multiplier on top of the cover scale, around the canvas center.
    pub scale: f64,
}

impl Default for ImageCrop {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

/// Inserted clipart image, placed by its center.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Clipart {
    pub source: ResourceSource,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// One icon + label entry in a row.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RowItem {
    pub icon: IconId,
    #[serde(default)]
    pub label: String,
}

impl RowItem {
    pub fn new(icon: IconId, label: impl Into<String>) -> Self {
        Self {
            icon,
            label: label.into(),
        }
    }
}

/// How row items are centered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowArrangement {
    /// All items on one line; the whole row is centered.
    #[default]
    Inline,
    /// One item per line, each centered on its own; lines are `gap` pixels apart.
    Stacked,
}

/// A horizontal icon + label row.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IconRow {
    #[serde(default)]
    pub items: Vec<RowItem>,
    pub gap: f64,
    /// Vertical center of the row.
    pub y: f64,
    /// Horizontal center; `None` centers on the canvas.
    #[serde(default)]
    pub center_x: Option<f64>,
    #[serde(default)]
    pub arrangement: RowArrangement,
}

impl IconRow {
    /// Social links row (telegram, instagram, tiktok) at the bottom edge.
    pub fn social() -> Self {
        Self {
            items: vec![
                RowItem::new(IconId::Telegram, ""),
                RowItem::new(IconId::Instagram, ""),
                RowItem::new(IconId::Tiktok, ""),
            ],
            gap: 50.0,
            y: 1020.0,
            center_x: None,
            arrangement: RowArrangement::Inline,
        }
    }

    /// Place / time / date row.
    pub fn place() -> Self {
        Self {
            items: vec![
                RowItem::new(IconId::Location, ""),
                RowItem::new(IconId::Clock, ""),
                RowItem::new(IconId::Calendar, ""),
            ],
            gap: 40.0,
            y: 900.0,
            center_x: None,
            arrangement: RowArrangement::Inline,
        }
    }

    pub fn has_visible_items(&self) -> bool {
        self.items.iter().any(|i| !i.label.trim().is_empty())
    }
}

/// Gradient overlay configuration: one unified gradient or independent top/bottom zones.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GradientConfig {
    Unified(UnifiedGradient),
    TwoZone(TwoZoneGradient),
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self::Unified(UnifiedGradient::default())
    }
}

impl GradientConfig {
    pub fn is_enabled(&self) -> bool {
        match self {
            GradientConfig::Unified(u) => u.enabled,
            GradientConfig::TwoZone(z) => z.enabled && (z.top.enabled || z.bottom.enabled),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    Top,
    Bottom,
    Both,
    #[default]
    Center,
}

/// Compositing mode of a gradient layer onto what is below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Darken,
    Lighten,
}

/// One gradient stop. `opacity` and `position` are percentages, clamped to `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    pub color: Rgba8,
    #[serde(default = "default_stop_opacity")]
    pub opacity: f64,
    pub position: f64,
}

fn default_stop_opacity() -> f64 {
    100.0
}

impl GradientStop {
    pub fn new(color: Rgba8, opacity: f64, position: f64) -> Self {
        Self {
            color,
            opacity,
            position,
        }
    }
}

fn default_overlay_stops() -> Vec<GradientStop> {
    let navy = Rgba8::rgb(0x08, 0x37, 0x65);
    vec![
        GradientStop::new(navy, 80.0, 0.0),
        GradientStop::new(navy, 0.0, 100.0),
    ]
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UnifiedGradient {
    pub enabled: bool,
    pub kind: GradientKind,
    pub direction: GradientDirection,
    /// Axis rotation in degrees; 0 points straight into the canvas from the anchor edge.
    pub angle_deg: f64,
    /// Coverage in pixels along the axis (radius for radial).
    pub height: f64,
    /// Global strength in percent; scales every stop opacity.
    pub intensity: f64,
    pub blend: BlendMode,
    pub stops: Vec<GradientStop>,
}

impl Default for UnifiedGradient {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: GradientKind::Linear,
            direction: GradientDirection::Center,
            angle_deg: 0.0,
            height: 400.0,
            intensity: 100.0,
            blend: BlendMode::Normal,
            stops: default_overlay_stops(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TwoZoneGradient {
    pub enabled: bool,
    pub intensity: f64,
    pub blend: BlendMode,
    pub top: ZoneGradient,
    pub bottom: ZoneGradient,
}

impl Default for TwoZoneGradient {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 100.0,
            blend: BlendMode::Normal,
            top: ZoneGradient::default(),
            bottom: ZoneGradient::default(),
        }
    }
}

/// One edge zone of a [`TwoZoneGradient`]. Stop position 0 sits on the zone's edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ZoneGradient {
    pub enabled: bool,
    pub height: f64,
    pub kind: GradientKind,
    pub angle_deg: f64,
    /// Radial center in canvas pixels; defaults to the middle of the zone's edge.
    pub center: Option<[f64; 2]>,
    pub stops: Vec<GradientStop>,
}

impl Default for ZoneGradient {
    fn default() -> Self {
        Self {
            enabled: true,
            height: 300.0,
            kind: GradientKind::Linear,
            angle_deg: 0.0,
            center: None,
            stops: default_overlay_stops(),
        }
    }
}

impl PosterSpec {
    /// Parse a poster spec from a JSON string.
    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PosterError::validation(format!("parse poster spec JSON: {e}")))
    }

    /// Parse a poster spec from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PosterResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PosterError::validation(format!("parse poster spec JSON: {e}")))
    }

    /// Parse a poster spec from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosterError::validation(format!("open poster spec JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> PosterResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PosterError::serde(e.to_string()))
    }

    /// Validate numeric invariants. Text content is never rejected.
    pub fn validate(&self) -> PosterResult<()> {
        for role in FontRole::ALL {
            let size = self.font_sizes.get(role);
            if !size.is_finite() || size <= 0.0 {
                return Err(PosterError::validation(format!(
                    "font_sizes.{} must be finite and > 0",
                    role.name()
                )));
            }
        }

        let qb = &self.quote_box;
        for (name, v) in [("width", qb.width), ("height", qb.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PosterError::validation(format!(
                    "quote_box.{name} must be finite and > 0"
                )));
            }
        }

        let c = &self.crop;
        if !c.offset_x.is_finite() || !c.offset_y.is_finite() {
            return Err(PosterError::validation("crop offsets must be finite"));
        }
        if !c.scale.is_finite() || c.scale <= 0.0 {
            return Err(PosterError::validation("crop.scale must be finite and > 0"));
        }

        if let Some(clip) = &self.clipart {
            if !clip.center_x.is_finite() || !clip.center_y.is_finite() {
                return Err(PosterError::validation("clipart center must be finite"));
            }
            if !clip.width.is_finite() || clip.width <= 0.0 {
                return Err(PosterError::validation(
                    "clipart width must be finite and > 0",
                ));
            }
            if !clip.height.is_finite() || clip.height <= 0.0 {
                return Err(PosterError::validation(
                    "clipart height must be finite and > 0",
                ));
            }
        }

        validate_row(&self.social_row, "social_row")?;
        validate_row(&self.place_row, "place_row")?;

        match &self.gradient {
            GradientConfig::Unified(u) => {
                validate_coverage(u.height, "gradient.height")?;
                validate_finite(u.angle_deg, "gradient.angle_deg")?;
                validate_percent(u.intensity, "gradient.intensity")?;
                validate_stops(&u.stops, "gradient.stops")?;
            }
            GradientConfig::TwoZone(z) => {
                validate_percent(z.intensity, "gradient.intensity")?;
                for (name, zone) in [("top", &z.top), ("bottom", &z.bottom)] {
                    validate_coverage(zone.height, &format!("gradient.{name}.height"))?;
                    validate_finite(zone.angle_deg, &format!("gradient.{name}.angle_deg"))?;
                    if let Some([x, y]) = zone.center
                        && (!x.is_finite() || !y.is_finite())
                    {
                        return Err(PosterError::validation(format!(
                            "gradient.{name}.center must be finite"
                        )));
                    }
                    validate_stops(&zone.stops, &format!("gradient.{name}.stops"))?;
                }
            }
        }

        Ok(())
    }
}

fn validate_row(row: &IconRow, field: &str) -> PosterResult<()> {
    if !row.gap.is_finite() || row.gap < 0.0 {
        return Err(PosterError::validation(format!(
            "{field}.gap must be finite and >= 0"
        )));
    }
    if !row.y.is_finite() {
        return Err(PosterError::validation(format!("{field}.y must be finite")));
    }
    if let Some(x) = row.center_x
        && !x.is_finite()
    {
        return Err(PosterError::validation(format!(
            "{field}.center_x must be finite when set"
        )));
    }
    Ok(())
}

fn validate_finite(v: f64, field: &str) -> PosterResult<()> {
    if !v.is_finite() {
        return Err(PosterError::validation(format!("{field} must be finite")));
    }
    Ok(())
}

fn validate_coverage(v: f64, field: &str) -> PosterResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(PosterError::validation(format!(
            "{field} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn validate_percent(v: f64, field: &str) -> PosterResult<()> {
    if !v.is_finite() || !(0.0..=100.0).contains(&v) {
        return Err(PosterError::validation(format!(
            "{field} must be within [0, 100]"
        )));
    }
    Ok(())
}

// Out-of-range stop values are clamped at synthesis time; only non-finite ones are rejected.
fn validate_stops(stops: &[GradientStop], field: &str) -> PosterResult<()> {
    for (i, s) in stops.iter().enumerate() {
        if !s.opacity.is_finite() || !s.position.is_finite() {
            return Err(PosterError::validation(format!(
                "{field}[{i}] opacity/position must be finite"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
