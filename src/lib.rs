//! posterkit composes fixed-size 1080x1080 posters from a declarative [`PosterSpec`].
//!
//! A render pass runs in stages:
//!
//! - validate the poster and resolve its resources (images, fonts, icons) with bounded waits
//!   and documented fallbacks
//! - compile it into an ordered, backend-agnostic plan of layers
//! - paint the layers on the CPU and publish the finished [`Poster`]
//!
//! [`Engine`] drives the stages and guarantees that a pass superseded by a newer spec never
//! publishes. Completed posters go out through an [`Exporter`].
#![forbid(unsafe_code)]

mod assets;
mod compile;
mod composition;
mod engine;
mod foundation;
mod layout;
mod paint;
mod render;
mod text;

pub use crate::assets::icons::IconId;
pub use crate::assets::loader::LoaderTimeouts;
pub use crate::assets::source::{FsFetcher, ResourceFetcher, ResourceSource, decode_data_url};
pub use crate::composition::model::{
    BlendMode, Clipart, CustomFonts, FontFamilies, FontRole, FontSizes, Frame, FrameStyle,
    GradientConfig, GradientDirection, GradientKind, GradientStop, IconRow, ImageCrop, Language,
    PosterSpec, QuoteBox, QuoteBoxStyle, RowArrangement, RowItem, Template, TemplatePalette,
    TextFill, TextFills, TextPositions, TwoZoneGradient, UnifiedGradient, ZoneGradient,
};
pub use crate::engine::config::EngineConfig;
pub use crate::engine::export::{Exporter, PngFileExporter, ShareExporter, ShareTarget, encode_png};
pub use crate::engine::orchestrator::{Engine, EngineState, RenderOutcome};
pub use crate::foundation::core::{Canvas, Rgba8};
pub use crate::foundation::error::{PosterError, PosterResult};
pub use crate::render::backend::Poster;
