use crate::error::CliError;

use guidelight::{EndeavorError, GuidelightError};

#[test]
fn given_library_error_when_converted_then_message_is_transparent() {
    let err: CliError = EndeavorError::authentication("no client id or secret specified").into();

    assert!(matches!(
        err,
        CliError::Guidelight(GuidelightError::Endeavor(_))
    ));
    assert!(err.to_string().starts_with("Authentication Error: no client id"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn given_argument_error_when_displayed_then_includes_location() {
    let err = CliError::argument("--timeout: bad");

    assert!(err.to_string().contains("Argument Error: --timeout: bad"));
    assert!(err.to_string().contains("error.rs"));
}
