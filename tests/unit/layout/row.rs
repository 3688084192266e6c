use super::*;
use crate::composition::model::RowItem;

fn mono(s: &str) -> PosterResult<f64> {
    Ok(s.chars().count() as f64 * 10.0)
}

fn social(labels: [&str; 3]) -> IconRow {
    let mut row = IconRow::social();
    for (item, label) in row.items.iter_mut().zip(labels) {
        item.label = label.to_string();
    }
    row
}

#[test]
fn blank_labels_are_dropped_without_leaving_a_gap() {
    let layout = layout_row(&social(["@a", "", "@c"]), 1080.0, mono).unwrap();
    assert_eq!(layout.placements.len(), 2);
    assert_eq!(layout.placements[0].icon, IconId::Telegram);
    assert_eq!(layout.placements[1].icon, IconId::Tiktok);

    // 24 + 8 + 20 per item, one 50 px gap between them.
    assert_eq!(layout.total_width, 52.0 * 2.0 + 50.0);
    let first = &layout.placements[0];
    let second = &layout.placements[1];
    assert_eq!(second.x - (first.x + first.width), 50.0);
}

#[test]
fn row_is_centered_on_the_canvas() {
    for labels in [["@a", "", "@c"], ["telegram", "insta", "t"], ["", "", "solo"]] {
        let layout = layout_row(&social(labels), 1080.0, mono).unwrap();
        let end = layout.start_x + layout.total_width;
        assert!((layout.start_x + layout.total_width * 0.5 - 540.0).abs() < 1e-9);
        let last = layout.placements.last().unwrap();
        assert!((last.x + last.width - end).abs() < 1e-9);
    }
}

#[test]
fn explicit_center_overrides_canvas_center() {
    let mut row = social(["@a", "@b", "@c"]);
    row.center_x = Some(300.0);
    let layout = layout_row(&row, 1080.0, mono).unwrap();
    assert!((layout.start_x + layout.total_width * 0.5 - 300.0).abs() < 1e-9);
}

#[test]
fn labels_follow_icon_and_margin() {
    let layout = layout_row(&social(["@a", "", ""]), 1080.0, mono).unwrap();
    let p = &layout.placements[0];
    assert_eq!(p.label_x(), p.x + 32.0);
    assert_eq!(p.y, 1020.0);
}

#[test]
fn all_blank_row_is_empty() {
    let layout = layout_row(&social(["", " ", "\t"]), 1080.0, mono).unwrap();
    assert!(layout.is_empty());
    assert_eq!(layout.total_width, 0.0);
}

#[test]
fn stacked_rows_center_each_item() {
    let row = IconRow {
        items: vec![
            RowItem::new(IconId::Location, "Jimma"),
            RowItem::new(IconId::Clock, "9:00"),
        ],
        gap: 30.0,
        y: 800.0,
        center_x: None,
        arrangement: RowArrangement::Stacked,
    };
    let layout = layout_row(&row, 1080.0, mono).unwrap();
    for p in &layout.placements {
        assert!((p.x + p.width * 0.5 - 540.0).abs() < 1e-9);
    }
    assert_eq!(layout.placements[1].y, 830.0);
    assert_eq!(layout.total_width, 32.0 + 50.0);
}

#[test]
fn measurement_failure_propagates() {
    let err = layout_row(&social(["@a", "", ""]), 1080.0, |_| {
        Err(crate::foundation::error::PosterError::measurement("no font"))
    });
    assert!(err.is_err());
}
