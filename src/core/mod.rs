//! Core module containing the domain types, traits and validation

pub mod auth;
pub mod error;
pub mod events;
pub mod invoice;
pub mod revalidate;
pub mod store;
pub mod validation;

pub use auth::{AuthErrorKind, Credentials, IdentityProvider, InMemoryIdentityProvider, SignInError};
pub use error::{ConfigError, DashboardError, RequestError};
pub use events::{DashboardEvent, EventBus, EventEnvelope};
pub use invoice::{
    INVOICES_PATH, InvoiceChanges, InvoiceDraft, InvoiceId, InvoiceRecord, InvoiceStatus,
    NewInvoice,
};
pub use revalidate::{Revalidator, ViewCache};
pub use store::InvoiceStore;
pub use validation::{FieldErrors, FormFields, ValidationFailure};
