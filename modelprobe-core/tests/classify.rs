use modelprobe_core::{ErrorClassifier, Handbook, TransportFailureKind};

#[test]
fn http_status_maps_to_category() {
    let c = Handbook.classify_http(401, "not json");
    assert_eq!(c.code, "unknown");
    assert_eq!(c.category, "authentication failed");
}

#[test]
fn body_type_becomes_code() {
    let body = r#"{"error": {"type": "invalid_request_error", "message": "bad"}}"#;
    let c = Handbook.classify_http(400, body);
    assert_eq!(c.code, "invalid_request_error");
    assert_eq!(c.category, "bad request");
}

#[test]
fn body_code_is_used_when_type_missing() {
    let body = r#"{"error": {"code": "model_not_found"}}"#;
    let c = Handbook.classify_http(404, body);
    assert_eq!(c.code, "model_not_found");
    assert_eq!(c.category, "model not found");
}

#[test]
fn numeric_body_code_is_stringified() {
    let body = r#"{"error": {"code": 1234}}"#;
    let c = Handbook.classify_http(500, body);
    assert_eq!(c.code, "1234");
    assert_eq!(c.category, "server error");
}

#[test]
fn unknown_status_maps_to_unknown_category() {
    let c = Handbook.classify_http(418, "");
    assert_eq!(c.code, "unknown");
    assert_eq!(c.category, "unknown error");
}

#[test]
fn transport_kinds_map_to_handbook() {
    let c = Handbook.classify_transport(TransportFailureKind::Timeout, "deadline elapsed");
    assert_eq!(c.code, "timeout");
    assert_eq!(c.category, "request timeout");

    let c = Handbook.classify_transport(TransportFailureKind::Connect, "refused");
    assert_eq!(c.code, "connection_error");

    let c = Handbook.classify_transport(TransportFailureKind::Tls, "bad cert");
    assert_eq!(c.code, "ssl_error");

    let c = Handbook.classify_transport(TransportFailureKind::Protocol, "invalid status line");
    assert!(c.remedy.starts_with("HTTP client error: invalid status line."));

    let c = Handbook.classify_transport(TransportFailureKind::Other, "");
    assert_eq!(c.category, "unknown error");
}

#[test]
fn classification_is_deterministic() {
    let body = r#"{"error": {"type": "quota_exceeded"}}"#;
    assert_eq!(Handbook.classify_http(429, body), Handbook.classify_http(429, body));
}
