use super::*;

fn poster() -> Poster {
    Poster {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 50, 25, 0, 128],
    }
}

#[derive(Default)]
struct Collect {
    shared: Vec<(Vec<u8>, Option<String>)>,
}

impl ShareTarget for Collect {
    fn share(&mut self, png: Vec<u8>, caption: Option<&str>) -> PosterResult<()> {
        self.shared.push((png, caption.map(str::to_owned)));
        Ok(())
    }
}

#[test]
fn png_round_trips_as_straight_alpha() {
    let png = encode_png(&poster()).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [100, 50, 0, 128]);
}

#[test]
fn mismatched_buffer_is_rejected() {
    let bad = Poster {
        width: 4,
        height: 4,
        data: vec![0; 4],
    };
    assert!(encode_png(&bad).is_err());
}

#[test]
fn file_exporter_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("posterkit_export_{}", std::process::id()));
    let path = dir.join("nested").join("poster.png");
    let mut exporter = PngFileExporter::new(&path);
    exporter.export(&poster()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn share_exporter_forwards_bytes_and_caption() {
    let mut exporter = ShareExporter::new(Collect::default()).with_caption("Join us");
    exporter.export(&poster()).unwrap();
    let target = exporter.into_inner();
    assert_eq!(target.shared.len(), 1);
    assert_eq!(target.shared[0].1.as_deref(), Some("Join us"));
    assert_eq!(&target.shared[0].0[1..4], b"PNG");
}
