use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{GeoPoint, BLOOD_GROUPS};

/// Register a new donor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDonorRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(custom(function = "validate_blood_group"))]
    pub blood_group: String,
    #[validate(range(min = 1, max = 120))]
    pub age: i32,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_month"))]
    pub last_donation_month: Option<String>,
}

/// Register a new receiver
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReceiverRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(length(min = 1))]
    pub hospital_name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Register a new hospital
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterHospitalRequest {
    #[validate(length(min = 1))]
    pub hospital_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Login request
///
/// `userType` selects which account table the email is looked up in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub user_type: crate::models::domain::Role,
}

/// Donor profile update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonorRequest {
    #[validate(custom(function = "validate_blood_group"))]
    pub blood_group: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(range(min = 1, max = 120))]
    pub age: i32,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_month"))]
    pub last_donation_month: Option<String>,
}

/// Receiver asking a donor for blood
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestPayload {
    #[serde(alias = "donor_id")]
    pub donor_id: i64,
}

impl RegisterDonorRequest {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl RegisterReceiverRequest {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl RegisterHospitalRequest {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl UpdateDonorRequest {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn validate_blood_group(value: &str) -> Result<(), ValidationError> {
    if BLOOD_GROUPS.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("blood_group"))
    }
}

/// Months come from an HTML month input, e.g. `2024-03`
fn validate_month(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    // An empty month input means "never donated"
    if value.is_empty() {
        return Ok(());
    }

    let bytes = value.as_bytes();
    let shaped = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !shaped {
        return Err(ValidationError::new("month"));
    }

    chrono::NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("month"))
}

/// Blank month strings are stored as no month at all
pub fn normalize_month(month: Option<String>) -> Option<String> {
    month
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donor_request() -> RegisterDonorRequest {
        RegisterDonorRequest {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "hunter2".to_string(),
            contact: "555-0100".to_string(),
            blood_group: "O+".to_string(),
            age: 30,
            latitude: 12.97,
            longitude: 77.59,
            last_donation_month: Some("2024-03".to_string()),
        }
    }

    #[test]
    fn test_valid_donor_request() {
        assert!(donor_request().validate().is_ok());
    }

    #[test]
    fn test_invalid_blood_group() {
        let mut req = donor_request();
        req.blood_group = "C+".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_latitude() {
        let mut req = donor_request();
        req.latitude = 91.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_month_format() {
        let mut req = donor_request();
        req.last_donation_month = Some("March".to_string());
        assert!(req.validate().is_err());

        req.last_donation_month = Some(String::new());
        assert!(req.validate().is_ok());

        req.last_donation_month = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_month_must_be_year_dash_month() {
        for month in ["2024-3", "24-03", "2024-13", "2024-00", "2024/03", "+202-03", "2024-03-01"] {
            assert!(validate_month(month).is_err(), "{} accepted", month);
        }
        for month in ["2024-03", "1999-12", " 2024-03 ", "  ", ""] {
            assert!(validate_month(month).is_ok(), "{:?} rejected", month);
        }
    }

    #[test]
    fn test_blank_month_passes_and_is_dropped() {
        let mut req = donor_request();
        req.last_donation_month = Some("  ".to_string());
        assert!(req.validate().is_ok());
        assert_eq!(normalize_month(req.last_donation_month), None);
    }

    #[test]
    fn test_normalize_month() {
        assert_eq!(normalize_month(Some("  ".to_string())), None);
        assert_eq!(normalize_month(Some("2024-01".to_string())), Some("2024-01".to_string()));
        assert_eq!(normalize_month(Some(" 2024-01 ".to_string())), Some("2024-01".to_string()));
    }

    #[test]
    fn test_login_request_user_type() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"email":"a@b.com","password":"x","userType":"receiver"}"#,
        )
        .unwrap();
        assert_eq!(req.user_type, crate::models::Role::Receiver);
    }
}
