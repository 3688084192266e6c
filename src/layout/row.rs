use crate::{
    assets::icons::IconId,
    composition::model::{IconRow, RowArrangement},
    foundation::error::PosterResult,
};

/// Drawn icon edge length in pixels.
pub const ICON_SIZE: f64 = 24.0;
/// Space between an icon and its label.
pub const TEXT_MARGIN: f64 = 8.0;
/// Label font size in pixels.
pub const LABEL_SIZE_PX: f32 = 20.0;

/// One positioned row item.
#[derive(Clone, Debug, PartialEq)]
pub struct RowPlacement {
    pub icon: IconId,
    /// Trimmed label text.
    pub label: String,
    /// Left edge of the icon.
    pub x: f64,
    /// Vertical center of the icon and label.
    pub y: f64,
    pub text_width: f64,
    /// `ICON_SIZE + TEXT_MARGIN + text_width`.
    pub width: f64,
}

impl RowPlacement {
    pub fn label_x(&self) -> f64 {
        self.x + ICON_SIZE + TEXT_MARGIN
    }
}

/// Computed layout of an [`IconRow`].
#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Left edge of the leftmost item.
    pub start_x: f64,
    /// Inline: sum of item widths plus gaps. Stacked: widest item.
    pub total_width: f64,
    pub placements: Vec<RowPlacement>,
}

impl RowLayout {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Lay out `row` on a canvas `canvas_width` pixels wide.
///
/// Items with a blank label are dropped before anything is measured, so the remaining items
/// re-center without leaving a gap. `measure` returns the label advance at [`LABEL_SIZE_PX`].
pub fn layout_row<F>(row: &IconRow, canvas_width: f64, mut measure: F) -> PosterResult<RowLayout>
where
    F: FnMut(&str) -> PosterResult<f64>,
{
    let center_x = row.center_x.unwrap_or(canvas_width * 0.5);

    let mut sized = Vec::new();
    for item in &row.items {
        let label = item.label.trim();
        if label.is_empty() {
            continue;
        }
        let text_width = measure(label)?;
        sized.push((item.icon, label.to_string(), text_width));
    }
    if sized.is_empty() {
        return Ok(RowLayout {
            start_x: center_x,
            total_width: 0.0,
            placements: Vec::new(),
        });
    }

    let item_width = |text_width: f64| ICON_SIZE + TEXT_MARGIN + text_width;
    let mut placements = Vec::with_capacity(sized.len());

    let (start_x, total_width) = match row.arrangement {
        RowArrangement::Inline => {
            let total = sized.iter().map(|(_, _, tw)| item_width(*tw)).sum::<f64>()
                + row.gap * (sized.len() - 1) as f64;
            let start_x = center_x - total * 0.5;
            let mut x = start_x;
            for (icon, label, text_width) in sized {
                let width = item_width(text_width);
                placements.push(RowPlacement {
                    icon,
                    label,
                    x,
                    y: row.y,
                    text_width,
                    width,
                });
                x += width + row.gap;
            }
            (start_x, total)
        }
        RowArrangement::Stacked => {
            for (i, (icon, label, text_width)) in sized.into_iter().enumerate() {
                let width = item_width(text_width);
                placements.push(RowPlacement {
                    icon,
                    label,
                    x: center_x - width * 0.5,
                    y: row.y + row.gap * i as f64,
                    text_width,
                    width,
                });
            }
            let widest = placements.iter().map(|p| p.width).fold(0.0f64, f64::max);
            (center_x - widest * 0.5, widest)
        }
    };

    Ok(RowLayout {
        start_x,
        total_width,
        placements,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/row.rs"]
mod tests;
