//! Request checks run before anything is sent to the external API.

use super::types::{CalorieRequest, LoginData, RegisterData};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MIN_SERVINGS: f64 = 0.1;
pub const MAX_SERVINGS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// # Errors
///
/// Returns the first field that fails its rule.
pub fn register(data: &RegisterData) -> Result<(), ValidationError> {
    if data.first_name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::new("first_name", "First name must be at least 2 characters"));
    }
    if data.last_name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::new("last_name", "Last name must be at least 2 characters"));
    }
    email(&data.email)?;
    if data.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::new("password", "Password must be at least 8 characters"));
    }
    Ok(())
}

/// # Errors
///
/// Returns the first field that fails its rule.
pub fn login(data: &LoginData) -> Result<(), ValidationError> {
    email(&data.email)?;
    if data.password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }
    Ok(())
}

/// # Errors
///
/// Returns the first field that fails its rule.
pub fn calorie(req: &CalorieRequest) -> Result<(), ValidationError> {
    if req.dish_name.trim().is_empty() {
        return Err(ValidationError::new("dish_name", "Dish name is required"));
    }
    if !req.servings.is_finite() || req.servings < MIN_SERVINGS {
        return Err(ValidationError::new("servings", "Servings must be greater than 0"));
    }
    if req.servings > MAX_SERVINGS {
        return Err(ValidationError::new("servings", "Servings cannot exceed 50"));
    }
    Ok(())
}

/// Loose `local@domain.tld` shape check; the API does the real validation.
fn email(raw: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("email", "Please enter a valid email address");
    let (local, domain) = raw.trim().split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && !raw.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if well_formed { Ok(()) } else { Err(invalid()) }
}
