use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        RasterError::canvas("x")
            .to_string()
            .contains("canvas error:")
    );
    assert!(
        RasterError::output("x")
            .to_string()
            .contains("canvas output error:")
    );
    assert!(
        RasterError::destroy("x")
            .to_string()
            .contains("canvas destroy error:")
    );
    assert_eq!(RasterError::EmptyCanvas.to_string(), "canvas is empty");
}

#[test]
fn kernel_errors_report_offending_row() {
    let err = RasterError::from(KernelError::ColumnCount { row: 1, found: 2 });
    let msg = err.to_string();
    assert!(msg.contains("row 1"));
    assert!(msg.contains("2 were found"));

    let err = RasterError::from(KernelError::RowCount { found: 4 });
    assert!(err.to_string().contains("4 row(s)"));
}

#[test]
fn kinds_separate_configuration_empty_and_engine() {
    assert_eq!(
        RasterError::from(KernelError::RowNotSequence { row: 0 }).kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        RasterError::InvalidDimension {
            width: 0,
            height: 3
        }
        .kind(),
        ErrorKind::Configuration
    );
    assert_eq!(RasterError::EmptyCanvas.kind(), ErrorKind::EmptyCanvas);
    assert_eq!(RasterError::canvas("decode").kind(), ErrorKind::Engine);
    assert_eq!(RasterError::destroy("free").kind(), ErrorKind::Engine);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Engine);
}
