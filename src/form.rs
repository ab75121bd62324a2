//! Create/edit form lifecycle shared by every resource kind.
//!
//! A form is driven by an [`EntityFormController`], parameterized by a
//! [`FormModel`] that tells it which fields exist, how they are validated and
//! how they map to and from the entity.

pub mod category_form;
pub mod collaborators;
pub mod controller;
pub mod entry_form;

use validator::Validate;

use crate::models::Resource;
use crate::validation::FieldErrors;

pub use category_form::CategoryFields;
pub use collaborators::{NavigationOptions, Navigator, Notifier, Route, TracingNotifier};
pub use controller::{
    CategoryFormController, EntityFormController, EntryFormController, FormAction, FormState,
    LoadTicket, PendingSubmit, SubmitOutcome, SubmitRejected,
};
pub use entry_form::EntryFields;

/// Route segment that opens a form in create mode
pub const NEW_ROUTE_SEGMENT: &str = "new";

/// Notification shown when loading or saving a record fails
pub const REQUEST_FAILED_MESSAGE: &str = "An error occurred while processing your request.";

/// Binds an entity to the field group edited by its form
pub trait FormModel: Resource {
    /// Raw user input, one optional value per field
    type Fields: Validate + Default + Clone + Send + Sync + std::fmt::Debug;

    /// Page title in create mode
    const NEW_CAPTION: &'static str;

    /// Page title prefix in edit mode, followed by the entity's name
    const EDIT_CAPTION: &'static str;

    /// Notification shown after a successful save
    const SAVED_MESSAGE: &'static str;

    /// Copies the entity's values into `fields`, leaving absent values untouched
    fn patch_fields(&self, fields: &mut Self::Fields);

    /// Builds an entity from a field group that passed validation
    fn from_fields(fields: &Self::Fields) -> Result<Self, FieldErrors>;
}

/// Error map for a single field
pub(crate) fn field_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}
