use crate::HttpStatusCode;

#[test]
fn given_401_and_403_when_checking_auth_failure_then_both_match() {
    assert!(HttpStatusCode(401).is_auth_failure());
    assert!(HttpStatusCode(403).is_auth_failure());
    assert!(!HttpStatusCode(404).is_auth_failure());
}

#[test]
fn given_status_ranges_when_classified_then_boundaries_hold() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());

    assert!(HttpStatusCode(400).is_client_error());
    assert!(HttpStatusCode(499).is_client_error());
    assert!(!HttpStatusCode(500).is_client_error());

    assert!(HttpStatusCode(500).is_server_error());
    assert!(HttpStatusCode(599).is_server_error());
    assert!(!HttpStatusCode(600).is_server_error());
}
