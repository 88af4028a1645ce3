use rand::RngCore;
use thiserror::Error;

/// Shape failures of a presented session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token não encontrado")]
    Missing,

    #[error("Token inválido")]
    Invalid,
}

/// Issue a random lowercase-hex token of `length` characters.
///
/// Tokens are not recorded anywhere; the auth gate only checks their shape.
pub fn generate_token(length: usize) -> String {
    let mut bytes = vec![0u8; (length + 1) / 2];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut token = hex::encode(bytes);
    token.truncate(length);
    token
}

/// Check the raw `Authorization` value. Only its length matters.
pub fn check_token(raw: Option<&str>, length: usize) -> Result<(), TokenError> {
    let token = raw.ok_or(TokenError::Missing)?;

    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    if token.chars().count() != length {
        return Err(TokenError::Invalid);
    }
    Ok(())
}

/// First four characters, for logs
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{}****", prefix)
}
