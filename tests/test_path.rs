use courier::config::AddressingMode;
use courier::rpc::error::ErrorCode;
use courier::rpc::path::{PATH_FIELD, PathError, extract_request_path, resolve_location};
use serde_json::{Value, json};

const ROOT: &str = "src/shared/protocols";

#[test]
fn test_resolve_simple_protocol() {
    let path = resolve_location("src/shared/protocols/PtlHello.proto", ROOT).unwrap();
    assert_eq!(path.as_str(), "/Hello");
}

#[test]
fn test_resolve_nested_protocol() {
    let path = resolve_location("src/shared/protocols/user/auth/PtlLogin.proto", ROOT).unwrap();
    assert_eq!(path.as_str(), "/user/auth/Login");
}

#[test]
fn test_resolve_is_deterministic() {
    let location = "src/shared/protocols/PtlHello.proto";
    let first = resolve_location(location, ROOT).unwrap();
    let second = resolve_location(location, ROOT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_resolve_tolerates_trailing_slash_on_root() {
    let path = resolve_location("src/shared/protocols/PtlHello.proto", "src/shared/protocols/")
        .unwrap();
    assert_eq!(path.as_str(), "/Hello");
}

#[test]
fn test_resolve_outside_root_fails() {
    let result = resolve_location("somewhere/else/PtlHello.proto", ROOT);
    assert!(matches!(result, Err(PathError::OutsideRoot { .. })));
}

#[test]
fn test_resolve_missing_suffix_fails() {
    let result = resolve_location("src/shared/protocols/PtlHello.rs", ROOT);
    assert!(matches!(result, Err(PathError::BadConvention { .. })));
}

#[test]
fn test_resolve_missing_name_prefix_fails() {
    let result = resolve_location("src/shared/protocols/Hello.proto", ROOT);
    assert!(matches!(result, Err(PathError::BadConvention { .. })));
}

#[test]
fn test_resolve_empty_name_fails() {
    let result = resolve_location("src/shared/protocols/Ptl.proto", ROOT);
    assert!(matches!(result, Err(PathError::BadConvention { .. })));
}

#[test]
fn test_extract_path_mode_with_root_slash() {
    let mut args = json!({ "name": "world" });
    let path =
        extract_request_path(AddressingMode::Path, "/Hello", "/", Some(&mut args)).unwrap();
    assert_eq!(path, "/Hello");
}

#[test]
fn test_extract_path_mode_strips_url_root() {
    let path = extract_request_path(AddressingMode::Path, "/rpc/user/Login", "/rpc", None).unwrap();
    assert_eq!(path, "/user/Login");
}

#[test]
fn test_extract_path_mode_wrong_root_is_invalid_path() {
    let result = extract_request_path(AddressingMode::Path, "/other/Hello", "/rpc", None);
    assert_eq!(result, Err(ErrorCode::InvalidPath));
}

#[test]
fn test_extract_path_mode_empty_path_cannot_be_resolved() {
    let result = extract_request_path(AddressingMode::Path, "/rpc", "/rpc", None);
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_path_mode_rejects_reserved_field() {
    // A field-addressed client talking to a path-addressed server.
    let mut args = json!({ PATH_FIELD: "/Hello", "name": "world" });
    let result = extract_request_path(AddressingMode::Path, "/Hello", "/", Some(&mut args));
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_field_mode_reads_and_strips_field() {
    let mut args = json!({ PATH_FIELD: "/Hello", "name": "world" });
    let path = extract_request_path(AddressingMode::Field, "/", "/", Some(&mut args)).unwrap();

    assert_eq!(path, "/Hello");
    // The reserved field is gone; the handler never sees it.
    assert!(args.get(PATH_FIELD).is_none());
    assert_eq!(args, json!({ "name": "world" }));
}

#[test]
fn test_extract_field_mode_missing_field_cannot_be_resolved() {
    let mut args = json!({ "name": "world" });
    let result = extract_request_path(AddressingMode::Field, "/Hello", "/", Some(&mut args));
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_field_mode_without_body_cannot_be_resolved() {
    let result = extract_request_path(AddressingMode::Field, "/Hello", "/", None);
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_field_mode_non_string_field_cannot_be_resolved() {
    let mut args = json!({ PATH_FIELD: 42 });
    let result = extract_request_path(AddressingMode::Field, "/", "/", Some(&mut args));
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_field_mode_empty_field_cannot_be_resolved() {
    let mut args = json!({ PATH_FIELD: "" });
    let result = extract_request_path(AddressingMode::Field, "/", "/", Some(&mut args));
    assert_eq!(result, Err(ErrorCode::ReqCantBeResolved));
}

#[test]
fn test_extract_field_mode_normalizes_leading_slash() {
    let mut args: Value = json!({ PATH_FIELD: "Hello" });
    let path = extract_request_path(AddressingMode::Field, "/", "/", Some(&mut args)).unwrap();
    assert_eq!(path, "/Hello");
}
