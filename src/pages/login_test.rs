use super::*;

#[test]
fn validate_login_input_trims_username() {
    assert_eq!(
        validate_login_input("  ana  ", "secret"),
        Ok(LoginRequest { username: "ana".to_owned(), password: "secret".to_owned() })
    );
}

#[test]
fn validate_login_input_keeps_password_verbatim() {
    let request = validate_login_input("ana", " pass word ").unwrap();
    assert_eq!(request.password, " pass word ");
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "secret"), Err("Enter both username and password."));
    assert_eq!(validate_login_input("ana", ""), Err("Enter both username and password."));
}
