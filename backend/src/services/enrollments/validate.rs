use crate::error::AppError;
use regex::Regex;
use tracker_common::requests::EnrollRequest;

/// Enrollment form after trimming and normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentForm {
    pub batch_code: String,
    pub name: String,
    pub mobile_number: String,
    /// Lowercased.
    pub email: String,
    pub is_walk_in: bool,
}

/// Checks the enrollment form and returns its normalised values.
///
/// - name: 3 to 50 characters
/// - mobile number: exactly 10 digits
/// - email: `something@domain.tld`, stored lowercase
pub fn validate_form(req: &EnrollRequest) -> Result<EnrollmentForm, AppError> {
    let batch_code = req.batch_id.trim();
    let name = req.name.trim();
    let mobile_number = req.mobile_number.trim();
    let email = req.email.trim().to_lowercase();

    if batch_code.is_empty() || name.is_empty() || mobile_number.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: batchId, name, mobileNumber or email".to_string(),
        ));
    }

    let name_len = name.chars().count();
    if name_len < 3 {
        return Err(AppError::Validation(
            "Name must be at least 3 characters long".to_string(),
        ));
    }
    if name_len > 50 {
        return Err(AppError::Validation(
            "Name must be at most 50 characters long".to_string(),
        ));
    }

    let mobile_re = Regex::new(r"^[0-9]{10}$")?;
    if !mobile_re.is_match(mobile_number) {
        return Err(AppError::Validation(
            "Mobile number must be exactly 10 digits".to_string(),
        ));
    }

    let email_re = Regex::new(r"^\S+@\S+\.\S+$")?;
    if !email_re.is_match(&email) {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }

    Ok(EnrollmentForm {
        batch_code: batch_code.to_string(),
        name: name.to_string(),
        mobile_number: mobile_number.to_string(),
        email,
        is_walk_in: req.is_walk_in,
    })
}
