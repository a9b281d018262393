//! Multi-step form controller.
//!
//! A [`Wizard`] owns one form, a 1-based step index and the current
//! step's validation errors. Moving forward validates only the fields the
//! current step owns; moving back never validates. Nothing leaves the
//! process until [`Wizard::submit`] on the final step.

pub mod contact;
pub mod draft;
pub mod lead;
pub mod registration;
pub mod validate;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};

pub use contact::ContactForm;
pub use draft::{Draft, DraftStore};
pub use lead::{LeadForm, PreferredContact};
pub use registration::PmRegistrationForm;
pub use validate::FieldErrors;

/// Where a finished form is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// REST `POST`, response in the `data` envelope
    Rest(&'static str),
    /// Legacy `POST`, response is a bare acknowledgement
    Legacy(&'static str),
}

pub trait WizardForm {
    const STEPS: u32;
    /// Short name used for drafts and logs
    const KIND: &'static str;

    type Payload: Serialize;
    type Response: DeserializeOwned;

    fn step_title(step: u32) -> &'static str;

    /// Validate the fields owned by `step` and nothing else.
    fn validate_step(&self, step: u32) -> FieldErrors;

    fn endpoint() -> Endpoint;

    fn payload(&self) -> Self::Payload;
}

/// What the server said about an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted<R> {
    pub message: Option<String>,
    pub data: Option<R>,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Cannot submit from step {step} of {last}")]
    NotOnFinalStep { step: u32, last: u32 },

    #[error("Step {step} has {count} invalid field(s)")]
    Invalid { step: u32, count: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct Wizard<F: WizardForm> {
    form: F,
    step: u32,
    errors: FieldErrors,
    submit_error: Option<String>,
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self::resume(form, 1)
    }

    /// Continue a saved form at `step`, clamped to the form's range.
    pub fn resume(form: F, step: u32) -> Self {
        Self {
            form,
            step: step.clamp(1, F::STEPS),
            errors: FieldErrors::new(),
            submit_error: None,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn into_form(self) -> F {
        self.form
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn title(&self) -> &'static str {
        F::step_title(self.step)
    }

    pub fn is_last_step(&self) -> bool {
        self.step == F::STEPS
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The server message from the last failed submit.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn progress_percent(&self) -> u32 {
        (self.step * 100 + F::STEPS / 2) / F::STEPS
    }

    /// Edit the form. Clears the error on `field` so stale messages do not
    /// outlive the input they complained about.
    pub fn update(&mut self, field: &str, edit: impl FnOnce(&mut F)) {
        edit(&mut self.form);
        self.errors.remove(field);
    }

    /// Validate the current step, replacing the error map.
    pub fn validate_step(&mut self) -> bool {
        self.errors = self.form.validate_step(self.step);
        self.errors.is_empty()
    }

    /// Advance when the current step is valid. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if !self.validate_step() {
            log::debug!("{}: step {} blocked by {} error(s)", F::KIND, self.step, self.errors.len());
            return false;
        }
        if self.step < F::STEPS {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
        self.errors.clear();
    }

    /// Validate the final step and send the whole form. On failure the form
    /// is left untouched and the error is recorded for display.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Submitted<F::Response>, WizardError> {
        if !self.is_last_step() {
            return Err(WizardError::NotOnFinalStep {
                step: self.step,
                last: F::STEPS,
            });
        }
        if !self.validate_step() {
            return Err(WizardError::Invalid {
                step: self.step,
                count: self.errors.len(),
            });
        }

        self.submit_error = None;
        let payload = self.form.payload();
        let result = match F::endpoint() {
            Endpoint::Rest(path) => client
                .post::<_, F::Response>(path, &payload)
                .await
                .map(|env| Submitted {
                    message: env.message,
                    data: Some(env.data),
                }),
            Endpoint::Legacy(path) => client.legacy_write(path, &payload).await.map(|ack| Submitted {
                message: ack.message,
                data: None,
            }),
        };

        match result {
            Ok(submitted) => {
                log::info!("{} submitted", F::KIND);
                Ok(submitted)
            }
            Err(e) => {
                if let ApiError::Validation { ref errors, .. } = e {
                    self.errors.merge_server(errors);
                }
                self.submit_error = Some(e.user_message());
                Err(WizardError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct TwoStep {
        name: String,
        email: String,
    }

    impl WizardForm for TwoStep {
        const STEPS: u32 = 2;
        const KIND: &'static str = "two-step";
        type Payload = Self;
        type Response = ();

        fn step_title(step: u32) -> &'static str {
            match step {
                1 => "Name",
                _ => "Email",
            }
        }

        fn validate_step(&self, step: u32) -> FieldErrors {
            let mut errors = FieldErrors::new();
            match step {
                1 => {
                    errors.require("name", &self.name, "Name is required");
                }
                2 => {
                    errors.require("email", &self.email, "Email is required");
                }
                _ => {}
            }
            errors
        }

        fn endpoint() -> Endpoint {
            Endpoint::Legacy("test/save")
        }

        fn payload(&self) -> Self {
            self.clone()
        }
    }

    #[test]
    fn test_next_blocked_until_valid() {
        let mut w = Wizard::new(TwoStep::default());
        assert!(!w.next());
        assert_eq!(w.step(), 1);
        assert_eq!(w.errors().get("name"), Some("Name is required"));

        w.update("name", |f| f.name = "Dana".to_string());
        assert!(w.errors().is_empty());
        assert!(w.next());
        assert_eq!(w.step(), 2);
    }

    #[test]
    fn test_validation_only_touches_current_step() {
        let mut w = Wizard::new(TwoStep::default());
        w.update("name", |f| f.name = "Dana".to_string());
        assert!(w.validate_step());
        // email is empty but belongs to step 2
        assert!(!w.errors().contains("email"));
    }

    #[test]
    fn test_never_past_last_step() {
        let mut w = Wizard::resume(
            TwoStep {
                name: "a".into(),
                email: "b".into(),
            },
            2,
        );
        assert!(!w.next());
        assert_eq!(w.step(), 2);
    }

    #[test]
    fn test_back_clears_errors_and_saturates() {
        let mut w = Wizard::resume(TwoStep::default(), 2);
        assert!(!w.validate_step());
        w.back();
        assert_eq!(w.step(), 1);
        assert!(w.errors().is_empty());
        w.back();
        assert_eq!(w.step(), 1);
        // form state survives
        assert_eq!(w.form().name, "");
    }

    #[test]
    fn test_resume_clamps() {
        assert_eq!(Wizard::resume(TwoStep::default(), 0).step(), 1);
        assert_eq!(Wizard::resume(TwoStep::default(), 9).step(), 2);
    }

    #[test]
    fn test_progress() {
        let mut w = Wizard::new(TwoStep::default());
        assert_eq!(w.progress_percent(), 50);
        w.update("name", |f| f.name = "x".into());
        w.next();
        assert_eq!(w.progress_percent(), 100);
    }

    #[tokio::test]
    async fn test_submit_requires_final_step() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = ApiClient::new(crate::api::ClientOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();
        let mut w = Wizard::new(TwoStep::default());
        let err = w.submit(&client).await.unwrap_err();
        assert!(matches!(err, WizardError::NotOnFinalStep { step: 1, last: 2 }));
    }

    #[tokio::test]
    async fn test_submit_invalid_final_step_sends_nothing() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = ApiClient::new(crate::api::ClientOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();
        let mut w = Wizard::resume(TwoStep::default(), 2);
        let err = w.submit(&client).await.unwrap_err();
        assert!(matches!(err, WizardError::Invalid { step: 2, count: 1 }));
        assert!(w.submit_error().is_none());
    }
}
