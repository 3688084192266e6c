use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PosterError::resource("x")
            .to_string()
            .contains("resource load failure:")
    );
    assert!(
        PosterError::timeout("x")
            .to_string()
            .contains("resource timeout:")
    );
    assert!(
        PosterError::measurement("x")
            .to_string()
            .contains("measurement failure:")
    );
    assert!(
        PosterError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        PosterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PosterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_local_conditions_are_recoverable() {
    assert!(PosterError::resource("x").is_recoverable());
    assert!(PosterError::timeout("x").is_recoverable());
    assert!(PosterError::measurement("x").is_recoverable());
    assert!(!PosterError::validation("x").is_recoverable());
    assert!(!PosterError::evaluation("x").is_recoverable());
}
