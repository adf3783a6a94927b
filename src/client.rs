//! Browser-side contact form logic: field validation, localized messages and
//! the submit state machine that talks to the contact endpoint.

pub mod form;
pub mod messages;
pub mod transport;
pub mod validation;

pub use form::{ContactForm, FormStatus, SubmitOutcome};
pub use messages::{Language, Notice};
pub use transport::{ContactTransport, HttpContactClient};
pub use validation::{validate, ContactFields, Field, FieldError, FieldErrors, FieldIssue, ValidationResult};
