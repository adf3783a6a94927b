use super::{
    messages::{Language, Notice},
    transport::ContactTransport,
    validation::{validate, ContactFields, Field, FieldErrors},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// What a call to [`ContactForm::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    /// A submission is already in flight.
    Busy,
    Sent,
    Failed,
}

/// State of the contact form as the visitor sees it.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    fields: ContactFields,
    errors: FieldErrors,
    status: FormStatus,
    language: Language,
}

impl ContactForm {
    pub fn new(language: Language) -> Self {
        ContactForm {
            language,
            ..Default::default()
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Updates one field. Its displayed error is cleared straight away, and a
    /// failed submission returns the form to idle.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value.into());
        self.errors.clear(field);
        if self.status == FormStatus::Error {
            self.status = FormStatus::Idle;
        }
    }

    /// Banner text for the current status, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self.status {
            FormStatus::Success => Some(Notice::Sent.text(self.language)),
            FormStatus::Error => Some(Notice::Failed.text(self.language)),
            FormStatus::Idle | FormStatus::Pending => None,
        }
    }

    /// Validates and, if everything passes, sends the form. On success the
    /// fields are cleared; on failure they are kept for another try. There is
    /// no automatic retry.
    pub async fn submit<T>(&mut self, transport: &T) -> SubmitOutcome
    where
        T: ContactTransport + ?Sized,
    {
        if self.status == FormStatus::Pending {
            return SubmitOutcome::Busy;
        }

        let result = validate(&self.fields, self.language);
        self.errors = result.errors;
        if !result.valid {
            return SubmitOutcome::Invalid;
        }

        self.status = FormStatus::Pending;

        match transport.send(&self.fields.trimmed()).await {
            Ok(()) => {
                self.status = FormStatus::Success;
                self.fields = ContactFields::default();
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact form submission failed");
                self.status = FormStatus::Error;
                SubmitOutcome::Failed
            }
        }
    }
}
