use cadenza_derive::cadenza_error;
use std::borrow::Cow;

#[cadenza_error]
pub enum SampleError {
    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Bad input{}: {message}", format_context(.context))]
    BadInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn missing_file() -> Result<Vec<u8>, SampleError> {
    std::fs::read("/definitely/not/here.bin").context("reading sample")
}

#[test]
fn cadenza_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/cadenza_error_pass.rs");
    t.compile_fail("tests/ui/cadenza_error_no_context.rs");
    t.compile_fail("tests/ui/cadenza_error_bad_context_type.rs");
    t.compile_fail("tests/ui/cadenza_error_tuple_variant.rs");
}

#[test]
fn source_results_gain_context() {
    let err = missing_file().expect_err("file must be missing");
    assert!(matches!(err, SampleError::Io { context: Some(ref c), .. } if c == "reading sample"));
    assert!(err.to_string().starts_with("I/O failure (reading sample): "));
}

#[test]
fn own_results_gain_context() {
    let res: Result<(), SampleError> =
        Err(SampleError::BadInput { message: "empty".into(), context: None });

    let err = res.context("validating upload").expect_err("still an error");
    assert_eq!(err.to_string(), "Bad input (validating upload): empty");
}

#[test]
fn question_mark_converts_sources() {
    fn inner() -> Result<u64, SampleError> {
        let meta = std::fs::metadata("/definitely/not/here.bin")?;
        Ok(meta.len())
    }

    let err = inner().expect_err("must fail");
    assert!(matches!(err, SampleError::Io { context: None, .. }));
    assert!(err.to_string().starts_with("I/O failure: "));
}
