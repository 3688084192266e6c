use super::*;

// Fixed-advance measurer: every char is 10px wide.
fn mono(s: &str) -> PosterResult<f64> {
    Ok(s.chars().count() as f64 * 10.0)
}

#[test]
fn wraps_greedily_before_overflowing_word() {
    let lines = wrap_words("The quick brown fox jumps over the lazy dog", 160.0, mono).unwrap();
    assert_eq!(
        lines,
        vec!["The quick brown", "fox jumps over", "the lazy dog"]
    );
}

#[test]
fn lines_fit_and_rejoin_to_original_text() {
    let text = "The quick brown fox jumps over the lazy dog";
    let widest_word = text
        .split(' ')
        .map(|w| mono(w).unwrap())
        .fold(0.0f64, f64::max);
    for max in [widest_word, 90.0, 120.0, 250.0, 10_000.0] {
        let max = max.max(widest_word);
        let lines = wrap_words(text, max, mono).unwrap();
        for l in &lines {
            assert!(mono(l).unwrap() <= max, "line '{l}' exceeds {max}");
            assert!(!l.is_empty());
        }
        assert_eq!(lines.join(" ").trim(), text);
    }
}

#[test]
fn over_wide_first_word_is_never_deferred() {
    let lines = wrap_words("supercalifragilistic is long", 50.0, mono).unwrap();
    assert_eq!(lines, vec!["supercalifragilistic", "is", "long"]);
}

#[test]
fn blank_text_produces_no_lines() {
    assert!(wrap_words("", 100.0, mono).unwrap().is_empty());
    assert!(wrap_words("   ", 100.0, mono).unwrap().is_empty());
}

#[test]
fn measurement_errors_propagate() {
    let err = wrap_words("a b", 100.0, |_| {
        Err(crate::foundation::error::PosterError::measurement("boom"))
    })
    .unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn centered_lines_straddle_anchor() {
    let slots = place_lines(&[100.0, 40.0], 540.0, 400.0, 48.0, Anchor::Center);
    assert_eq!(slots[0], LineSlot { left: 490.0, top: 400.0 });
    assert_eq!(slots[1], LineSlot { left: 520.0, top: 448.0 });

    let left = place_lines(&[100.0], 12.0, 5.0, 10.0, Anchor::Left);
    assert_eq!(left[0].left, 12.0);
}

#[test]
fn golden_ramp_is_ordered() {
    assert!(GOLDEN_STOPS.windows(2).all(|w| w[0].0 < w[1].0));
    assert_eq!(GOLDEN_STOPS[0].1, Rgba8::rgb(255, 215, 0));
}
