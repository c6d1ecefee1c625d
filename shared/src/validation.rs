//! Input validation functions

/// bcrypt only reads the first 72 bytes of a password
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate password length
///
/// Anything past [`MAX_PASSWORD_BYTES`] would be silently ignored by the
/// hash, so it is rejected up front.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}
