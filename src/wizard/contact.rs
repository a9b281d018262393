use serde::{Deserialize, Serialize};

use super::validate::{is_valid_email, is_valid_phone, phone_digits, FieldErrors};
use super::{Endpoint, WizardForm};
use crate::api::ContactRequest;

/// Single-step message to the site or to one manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
    pub agent_id: Option<u64>,
}

impl WizardForm for ContactForm {
    const STEPS: u32 = 1;
    const KIND: &'static str = "contact";

    type Payload = ContactRequest;
    type Response = ();

    fn step_title(_step: u32) -> &'static str {
        "Contact"
    }

    fn validate_step(&self, _step: u32) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Please enter name.");
        if errors.require("email", &self.email, "Please enter email.") {
            errors.check("email", is_valid_email(&self.email), "Please enter a valid email address");
        }
        if errors.require("mobile", &self.mobile, "Please enter mobile.") {
            errors.check("mobile", is_valid_phone(&self.mobile), "Please enter 10 digit mobile no");
        }
        errors.require("message", &self.message, "Please enter message.");
        errors
    }

    fn endpoint() -> Endpoint {
        Endpoint::Legacy("contact/save")
    }

    fn payload(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: phone_digits(&self.mobile),
            message: self.message.trim().to_string(),
            agent_id: self.agent_id,
        }
    }
}
