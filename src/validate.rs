//! Input checks run before the login calls.

pub const PHONE_PREFIX: &str = "09";
pub const PHONE_LEN: usize = 11;
pub const OTP_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("phone number is required")]
    EmptyPhone,

    #[error("phone number must start with 09 and be 11 digits")]
    InvalidPhone,

    #[error("verification code must be 6 digits")]
    InvalidOtp,
}

fn all_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Check an Iranian mobile number and return it trimmed.
///
/// # Errors
///
/// `EmptyPhone` for blank input, `InvalidPhone` for anything that is not
/// `09` followed by nine digits.
pub fn validate_phone(input: &str) -> Result<&str, ValidationError> {
    let phone = input.trim();
    if phone.is_empty() {
        return Err(ValidationError::EmptyPhone);
    }
    if phone.len() != PHONE_LEN || !phone.starts_with(PHONE_PREFIX) || !all_ascii_digits(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone)
}

/// Check a one-time code and return it trimmed.
///
/// # Errors
///
/// `InvalidOtp` unless the input is exactly six ASCII digits.
pub fn validate_otp(input: &str) -> Result<&str, ValidationError> {
    let otp = input.trim();
    if otp.len() != OTP_LEN || !all_ascii_digits(otp) {
        return Err(ValidationError::InvalidOtp);
    }
    Ok(otp)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
