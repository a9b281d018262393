use serde::{Deserialize, Serialize};

use super::validate::{is_valid_email, is_valid_phone, phone_digits, FieldErrors};
use super::{Endpoint, WizardForm};
use crate::api::AgentRegistration;

const MIN_PASSWORD_LEN: usize = 8;
const DEFAULT_COUNTRY_CODE: &str = "+1";

/// Property manager sign-up: account, business, services, review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PmRegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Never serialized, so drafts stay free of secrets. A resumed
    /// draft asks for the password again at review.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,

    pub company_name: String,
    pub phone: String,
    pub city: String,
    pub state: String,

    pub property_types: Vec<String>,
    pub services: Vec<String>,
}

impl WizardForm for PmRegistrationForm {
    const STEPS: u32 = 4;
    const KIND: &'static str = "pm-registration";

    type Payload = AgentRegistration;
    type Response = ();

    fn step_title(step: u32) -> &'static str {
        match step {
            1 => "Account",
            2 => "Business",
            3 => "Services",
            _ => "Review",
        }
    }

    fn validate_step(&self, step: u32) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => {
                errors.require("first_name", &self.first_name, "First name is required");
                errors.require("last_name", &self.last_name, "Last name is required");
                if errors.require("email", &self.email, "Email is required") {
                    errors.check("email", is_valid_email(&self.email), "Please enter a valid email address");
                }
                self.check_password(&mut errors);
            }
            2 => {
                errors.require("company_name", &self.company_name, "Company name is required");
                if errors.require("phone", &self.phone, "Phone number is required") {
                    errors.check("phone", is_valid_phone(&self.phone), "Phone number must be 10 digits");
                }
                errors.require("city", &self.city, "City is required");
                errors.require("state", &self.state, "State is required");
            }
            3 => {
                errors.check(
                    "property_types",
                    !self.property_types.is_empty(),
                    "Select at least one property type",
                );
            }
            _ => self.check_password(&mut errors),
        }
        errors
    }

    fn endpoint() -> Endpoint {
        Endpoint::Legacy("agent/save")
    }

    fn payload(&self) -> AgentRegistration {
        AgentRegistration {
            company_name: self.company_name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: phone_digits(&self.phone),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.confirm_password.clone(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            property_types: self.property_types.clone(),
            services: self.services.clone(),
        }
    }
}

impl PmRegistrationForm {
    fn check_password(&self, errors: &mut FieldErrors) {
        if errors.require("password", &self.password, "Password is required") {
            errors.check(
                "password",
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                "Password must be at least 8 characters",
            );
        }
        errors.check(
            "confirm_password",
            self.password == self.confirm_password,
            "Passwords do not match",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_step() {
        let form = PmRegistrationForm {
            first_name: "Sam".into(),
            last_name: "Ortiz".into(),
            email: "sam@ortizpm.com".into(),
            password: "short".into(),
            confirm_password: "other".into(),
            ..Default::default()
        };
        let errors = form.validate_step(1);
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_business_step_ignores_account_fields() {
        let form = PmRegistrationForm {
            company_name: "Ortiz PM".into(),
            phone: "512-555-0100".into(),
            city: "Austin".into(),
            state: "TX".into(),
            ..Default::default()
        };
        assert!(form.validate_step(2).is_empty());
    }

    #[test]
    fn test_services_step() {
        let mut form = PmRegistrationForm::default();
        assert!(form.validate_step(3).contains("property_types"));
        form.property_types.push("condo".into());
        assert!(form.validate_step(3).is_empty());
    }

    #[test]
    fn test_review_step_requires_password() {
        let mut form = PmRegistrationForm::default();
        assert_eq!(form.validate_step(4).get("password"), Some("Password is required"));
        form.password = "longenough".into();
        form.confirm_password = "longenough".into();
        assert!(form.validate_step(4).is_empty());
    }

    #[test]
    fn test_passwords_never_serialized() {
        let form = PmRegistrationForm {
            email: "sam@ortizpm.com".into(),
            password: "hunter2hunter2".into(),
            confirm_password: "hunter2hunter2".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("confirm_password").is_none());
        assert!(!value.to_string().contains("hunter2"));

        let back: PmRegistrationForm = serde_json::from_value(value).unwrap();
        assert_eq!(back.email, "sam@ortizpm.com");
        assert!(back.password.is_empty());
    }

    #[test]
    fn test_payload_carries_every_field() {
        let form = PmRegistrationForm {
            first_name: " Sam ".into(),
            last_name: "Ortiz".into(),
            email: "sam@ortizpm.com".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            company_name: "Ortiz PM".into(),
            phone: "512-555-0142".into(),
            city: "Austin".into(),
            state: "TX".into(),
            property_types: vec!["condo".into()],
            services: vec!["leasing".into()],
        };
        let body = serde_json::to_value(form.payload()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "company_name": "Ortiz PM",
                "email": "sam@ortizpm.com",
                "mobile": "5125550142",
                "country_code": "+1",
                "first_name": "Sam",
                "last_name": "Ortiz",
                "password": "longenough",
                "password_confirmation": "longenough",
                "city": "Austin",
                "state": "TX",
                "property_types": ["condo"],
                "services": ["leasing"]
            })
        );
    }

    #[test]
    fn test_payload_digits_only() {
        let form = PmRegistrationForm {
            company_name: " Ortiz PM ".into(),
            email: "sam@ortizpm.com".into(),
            phone: "(512) 555-0100".into(),
            ..Default::default()
        };
        let payload = form.payload();
        assert_eq!(payload.company_name, "Ortiz PM");
        assert_eq!(payload.mobile, "5125550100");
        assert_eq!(payload.country_code, "+1");
    }
}
