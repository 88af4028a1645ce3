use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{run_gates, Gate, Rejection};

pub const EMAIL_REQUIRED: &str = "O campo \"email\" é obrigatório";
pub const EMAIL_FORMAT: &str = "O \"email\" deve ter o formato \"email@email.com\"";
pub const PASSWORD_REQUIRED: &str = "O campo \"password\" é obrigatório";
pub const PASSWORD_TOO_SHORT: &str = "A \"senha\" deve ter pelo menos 6 caracteres";

const MIN_PASSWORD_CHARS: usize = 6;

// Something, an @, something, a dot, something. Unanchored.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
}

static LOGIN_GATES: &[Gate<LoginPayload>] = &[
    Gate { name: "email", check: check_email },
    Gate { name: "password", check: check_password },
];

pub fn validate_login(payload: &LoginPayload) -> Result<LoginCredentials, Rejection> {
    run_gates(LOGIN_GATES, payload)?;

    let email = payload
        .email
        .as_ref()
        .and_then(Value::as_str)
        .ok_or(Rejection::new("email", EMAIL_FORMAT))?;

    Ok(LoginCredentials {
        email: email.to_string(),
    })
}

fn check_email(payload: &LoginPayload) -> Result<(), Rejection> {
    match payload.email.as_ref() {
        None => Err(Rejection::new("email", EMAIL_REQUIRED)),
        Some(Value::String(email)) if email.is_empty() => Err(Rejection::new("email", EMAIL_REQUIRED)),
        Some(Value::String(email)) if EMAIL_RE.is_match(email) => Ok(()),
        Some(_) => Err(Rejection::new("email", EMAIL_FORMAT)),
    }
}

fn check_password(payload: &LoginPayload) -> Result<(), Rejection> {
    match payload.password.as_ref() {
        None => Err(Rejection::new("password", PASSWORD_REQUIRED)),
        Some(Value::String(password)) if password.is_empty() => {
            Err(Rejection::new("password", PASSWORD_REQUIRED))
        }
        Some(Value::String(password)) if password.chars().count() >= MIN_PASSWORD_CHARS => Ok(()),
        Some(_) => Err(Rejection::new("password", PASSWORD_TOO_SHORT)),
    }
}
