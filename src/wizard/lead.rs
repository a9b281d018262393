use serde::{Deserialize, Serialize};

use super::validate::{is_valid_email, is_valid_phone, is_valid_zip, phone_digits, FieldErrors};
use super::{Endpoint, WizardForm};
use crate::api::{LeadConfirmation, LeadSubmission};

const LEAD_SOURCE: &str = "landing-page";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    #[default]
    Email,
    Phone,
}

impl PreferredContact {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferredContact::Email => "email",
            PreferredContact::Phone => "phone",
        }
    }
}

/// The owner-facing "get started" form: property, location, contact, extras.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeadForm {
    pub property_type: String,

    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub number_of_units: Option<u32>,
    pub square_footage: Option<u32>,

    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_contact: PreferredContact,

    pub additional_services: Vec<String>,
}

impl WizardForm for LeadForm {
    const STEPS: u32 = 4;
    const KIND: &'static str = "lead";

    type Payload = LeadSubmission;
    type Response = LeadConfirmation;

    fn step_title(step: u32) -> &'static str {
        match step {
            1 => "Property Type",
            2 => "Location & Details",
            3 => "Contact Information",
            _ => "Additional Services",
        }
    }

    fn validate_step(&self, step: u32) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => {
                errors.require("property_type", &self.property_type, "Please select a property type");
            }
            2 => {
                errors.require("street_address", &self.street_address, "Street address is required");
                errors.require("city", &self.city, "City is required");
                errors.require("state", &self.state, "State is required");
                if errors.require("zip_code", &self.zip_code, "ZIP code is required") {
                    errors.check("zip_code", is_valid_zip(&self.zip_code), "ZIP code must be 5 digits");
                }
            }
            3 => {
                errors.require("full_name", &self.full_name, "Full name is required");
                if errors.require("email", &self.email, "Email is required") {
                    errors.check("email", is_valid_email(&self.email), "Please enter a valid email address");
                }
                if !self.phone.trim().is_empty() {
                    errors.check("phone", is_valid_phone(&self.phone), "Phone number must be 10 digits");
                }
            }
            _ => {}
        }
        errors
    }

    fn endpoint() -> Endpoint {
        Endpoint::Rest("home-page-lead")
    }

    fn payload(&self) -> LeadSubmission {
        LeadSubmission {
            property_type: self.property_type.trim().to_string(),
            street_address: self.street_address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            number_of_units: self.number_of_units,
            square_footage: self.square_footage,
            additional_services: self.additional_services.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: phone_digits(&self.phone),
            preferred_contact: self.preferred_contact.as_str().to_string(),
            source: LEAD_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Wizard;

    fn complete() -> LeadForm {
        LeadForm {
            property_type: "single-family".into(),
            street_address: "12 Elm St".into(),
            city: "Austin".into(),
            state: "TX".into(),
            zip_code: "78701".into(),
            full_name: "Jordan Lee".into(),
            email: "jordan@example.com".into(),
            phone: "(512) 555-0100".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_step_one_requires_property_type() {
        let errors = LeadForm::default().validate_step(1);
        assert_eq!(errors.get("property_type"), Some("Please select a property type"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_step_two_zip_rules() {
        let mut form = complete();
        form.zip_code = "".into();
        assert_eq!(form.validate_step(2).get("zip_code"), Some("ZIP code is required"));
        form.zip_code = "787".into();
        assert_eq!(form.validate_step(2).get("zip_code"), Some("ZIP code must be 5 digits"));
        form.zip_code = "78701".into();
        assert!(form.validate_step(2).is_empty());
    }

    #[test]
    fn test_step_three_contact_rules() {
        let mut form = complete();
        form.email = "nope".into();
        form.phone = "555-0100".into();
        let errors = form.validate_step(3);
        assert!(errors.contains("email"));
        assert!(errors.contains("phone"));

        form.email = "a@b.co".into();
        form.phone = "".into();
        assert!(form.validate_step(3).is_empty());
    }

    #[test]
    fn test_last_step_has_no_required_fields() {
        assert!(LeadForm::default().validate_step(4).is_empty());
    }

    #[test]
    fn test_payload() {
        let payload = complete().payload();
        assert_eq!(payload.phone, "5125550100");
        assert_eq!(payload.source, "landing-page");
        assert_eq!(payload.preferred_contact, "email");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("number_of_units").is_none());
    }

    #[test]
    fn test_walk_all_steps() {
        let mut w = Wizard::new(complete());
        for expected in 2..=4 {
            assert!(w.next(), "blocked at {}: {:?}", w.step(), w.errors());
            assert_eq!(w.step(), expected);
        }
        assert!(w.is_last_step());
        assert_eq!(w.title(), "Additional Services");
    }
}
