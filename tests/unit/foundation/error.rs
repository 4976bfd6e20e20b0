use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CrtError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CrtError::config("x").to_string().contains("config error:"));
    assert!(
        CrtError::pipeline("x")
            .to_string()
            .contains("pipeline error:")
    );
}

#[test]
fn io_errors_convert_and_keep_kind() {
    let err: CrtError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
    match err {
        CrtError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn every_variant_has_a_prefixed_message() {
    let errors = [
        CrtError::validation("a"),
        CrtError::config("b"),
        CrtError::pipeline("c"),
        CrtError::from(std::io::Error::other("d")),
    ];
    for err in &errors {
        let prefix = match err {
            CrtError::Validation(_) => "validation error: ",
            CrtError::Config(_) => "config error: ",
            CrtError::Pipeline(_) => "pipeline error: ",
            CrtError::Io(_) => "io error: ",
        };
        assert!(err.to_string().starts_with(prefix), "{err}");
    }
}
