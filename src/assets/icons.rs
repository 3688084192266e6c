//! Built-in icon glyphs addressed by static identifiers.
//!
//! Glyphs are small flat SVG marks rasterized at icon size by the loader. They are embedded so
//! a poster never depends on network access for its row icons.

/// Identifier of a built-in icon glyph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IconId {
    Telegram,
    Instagram,
    Tiktok,
    Location,
    Clock,
    Calendar,
}

impl IconId {
    pub const ALL: [IconId; 6] = [
        IconId::Telegram,
        IconId::Instagram,
        IconId::Tiktok,
        IconId::Location,
        IconId::Clock,
        IconId::Calendar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IconId::Telegram => "telegram",
            IconId::Instagram => "instagram",
            IconId::Tiktok => "tiktok",
            IconId::Location => "location",
            IconId::Clock => "clock",
            IconId::Calendar => "calendar",
        }
    }

    /// Embedded SVG document for this glyph (24x24 viewBox).
    pub fn svg(self) -> &'static str {
        match self {
            IconId::Telegram => TELEGRAM,
            IconId::Instagram => INSTAGRAM,
            IconId::Tiktok => TIKTOK,
            IconId::Location => LOCATION,
            IconId::Clock => CLOCK,
            IconId::Calendar => CALENDAR,
        }
    }
}

const TELEGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<circle cx="12" cy="12" r="12" fill="#0088cc"/>
<path d="M5.4 11.7 17.2 7.1c.6-.2 1.1.1.9 1l-2 9.4c-.1.7-.6.8-1.1.5l-3-2.2-1.5 1.4c-.2.2-.3.3-.6.3l.2-3.1 5.6-5.1c.2-.2 0-.3-.4-.1L8.4 13.5l-3-.9c-.6-.2-.6-.6.1-.9z" fill="#ffffff"/>
</svg>"##;

const INSTAGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<rect x="1" y="1" width="22" height="22" rx="6" fill="#E4405F"/>
<circle cx="12" cy="12" r="5" fill="none" stroke="#ffffff" stroke-width="2"/>
<circle cx="17.6" cy="6.4" r="1.4" fill="#ffffff"/>
</svg>"##;

const TIKTOK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<rect x="0" y="0" width="24" height="24" rx="5" fill="#000000"/>
<path d="M13.5 4h2.6c.2 1.8 1.4 3.1 3.2 3.3v2.6c-1.2 0-2.3-.4-3.2-1v5.6c0 2.9-2.3 5.1-5.1 5.1S5.9 17.4 5.9 14.5s2.3-5.1 5.1-5.1v2.7c-1.3 0-2.4 1.1-2.4 2.4s1.1 2.4 2.4 2.4 2.5-1.1 2.5-2.4z" fill="#ff0050"/>
</svg>"##;

const LOCATION: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<path d="M12 1.5c-4.1 0-7.5 3.3-7.5 7.4 0 5.3 7.5 13.6 7.5 13.6s7.5-8.3 7.5-13.6c0-4.1-3.4-7.4-7.5-7.4zm0 10.2a2.8 2.8 0 1 1 0-5.6 2.8 2.8 0 0 1 0 5.6z" fill="#ffd700"/>
</svg>"##;

const CLOCK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<circle cx="12" cy="12" r="10" fill="none" stroke="#ffd700" stroke-width="2.4"/>
<path d="M12 6v6.5l4.2 2.5" fill="none" stroke="#ffd700" stroke-width="2.4" stroke-linecap="round"/>
</svg>"##;

const CALENDAR: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
<rect x="2.5" y="4" width="19" height="17.5" rx="2.5" fill="none" stroke="#ffd700" stroke-width="2.2"/>
<path d="M2.5 9.5h19M7.5 2v4M16.5 2v4" stroke="#ffd700" stroke-width="2.2" stroke-linecap="round"/>
<rect x="6.5" y="12.5" width="3.5" height="3.5" fill="#ffd700"/>
</svg>"##;
