use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Length is checked on the trimmed name, which is what gets stored.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if (3..=50).contains(&len) {
        Ok(())
    } else {
        let mut err = ValidationError::new("length");
        err.message = Some("Username must be 3-50 characters".into());
        Err(err)
    }
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "candidate" | "recruiter" => Ok(()),
        _ => {
            let mut err = ValidationError::new("role");
            err.message = Some("Role must be 'candidate' or 'recruiter'".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(role: &str) -> RegisterPayload {
        RegisterPayload {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password: "hunter22".into(),
            full_name: "John Doe".into(),
            role: role.into(),
        }
    }

    #[test]
    fn accepts_both_portal_roles() {
        assert!(payload("candidate").validate().is_ok());
        assert!(payload("recruiter").validate().is_ok());
    }

    #[test]
    fn rejects_unknown_role_and_short_password() {
        let mut p = payload("admin");
        p.password = "123".into();
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("role"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn username_length_ignores_surrounding_spaces() {
        let mut p = payload("candidate");
        p.username = "  a ".into();
        assert!(p.validate().unwrap_err().field_errors().contains_key("username"));
        p.username = "  abc  ".into();
        assert!(p.validate().is_ok());
    }
}
