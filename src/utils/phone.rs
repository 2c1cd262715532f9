use regex::Regex;
use std::sync::OnceLock;
use crate::error::{AppError, AppResult};

fn whatsapp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^62\d{8,13}$").expect("valid regex"))
}

/// Normalise an Indonesian WhatsApp number to `62xxxxxxxxxx`.
///
/// Accepts `08…`, `8…`, `+62…` and `62…`, ignoring spaces, dashes and brackets.
pub fn format_whatsapp_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(rest) = digits.strip_prefix('0') {
        format!("62{rest}")
    } else if digits.starts_with('8') {
        format!("62{digits}")
    } else {
        digits
    }
}

/// Normalise and validate a WhatsApp number, returning the stored form.
pub fn normalize_whatsapp_number(phone: &str) -> AppResult<String> {
    let formatted = format_whatsapp_number(phone);
    if !whatsapp_regex().is_match(&formatted) {
        return Err(AppError::ValidationError(
            "Invalid WhatsApp number, expected an Indonesian number like 081234567890".to_string(),
        ));
    }
    Ok(formatted)
}
