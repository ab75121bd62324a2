use std::sync::Arc;
use validator::Validate;

use super::{
    FormModel, NavigationOptions, Navigator, Notifier, Route, NEW_ROUTE_SEGMENT,
    REQUEST_FAILED_MESSAGE,
};
use crate::client::{ResourceApi, TransportError};
use crate::models::{Category, EntityId, Entry};
use crate::validation::{field_messages, FieldErrors};

/// Where a form is in its create/edit lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Uninitialized,
    New,
    Editing,
    Submitting,
    SubmitSucceeded,
    SubmitFailed,
}

/// What a submission does, fixed when the form is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    New,
    Edit,
}

/// Handle for an in-flight `get_by_id` started by [`EntityFormController::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    sequence: u64,
    id: EntityId,
}

impl LoadTicket {
    pub fn id(&self) -> EntityId {
        self.id
    }
}

/// Submission accepted by [`EntityFormController::begin_submit`], waiting to be sent
#[derive(Debug, Clone)]
pub struct PendingSubmit<T> {
    generation: u64,
    action: FormAction,
    entity: T,
}

impl<T: FormModel> PendingSubmit<T> {
    pub fn action(&self) -> FormAction {
        self.action
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    /// Issues `create` for new records and `update` for edited ones
    pub async fn send(&self, api: &dyn ResourceApi<T>) -> Result<T, TransportError> {
        match self.action {
            FormAction::New => api.create(&self.entity).await,
            FormAction::Edit => api.update(self.entity.clone()).await,
        }
    }
}

/// Reasons a submission never reached the network
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("form has not been activated")]
    Inactive,

    #[error("a submission is already in progress")]
    InFlight,

    #[error("form has invalid fields")]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// The backend accepted the record; the form navigated to the list view
    Saved(T),
    /// The backend call failed; carries the messages shown next to the form
    Failed(Vec<String>),
    /// Nothing was sent
    Rejected(SubmitRejected),
    /// The result arrived after the form was re-activated or deactivated
    Discarded,
}

/// Drives a single entity's create/edit form: mode detection, loading the
/// record to edit, validation, submission and the feedback that follows.
pub struct EntityFormController<T: FormModel> {
    api: Arc<dyn ResourceApi<T>>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: FormState,
    action: Option<FormAction>,
    record_id: Option<EntityId>,
    fields: T::Fields,
    entity: Option<T>,
    submitting_form: bool,
    server_error_messages: Vec<String>,
    field_errors: FieldErrors,
    // Bumped on every (de)activation; results tagged with an older value are dropped
    generation: u64,
    // Bumped by every `begin_load`; only the latest fetch may patch the fields
    load_sequence: u64,
}

pub type CategoryFormController = EntityFormController<Category>;
pub type EntryFormController = EntityFormController<Entry>;

impl<T: FormModel> EntityFormController<T> {
    pub fn new(
        api: Arc<dyn ResourceApi<T>>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            state: FormState::Uninitialized,
            action: None,
            record_id: None,
            fields: T::Fields::default(),
            entity: None,
            submitting_form: false,
            server_error_messages: Vec::new(),
            field_errors: FieldErrors::new(),
            generation: 0,
            load_sequence: 0,
        }
    }

    /// Opens the form for `route` and, in edit mode, loads the record
    pub async fn activate(&mut self, route: &Route) {
        self.start(route);
        self.load_entity().await;
    }

    /// Synchronous half of [`activate`](Self::activate): picks the mode and
    /// builds an empty field group. Any result still in flight becomes stale.
    pub fn start(&mut self, route: &Route) {
        self.generation += 1;
        self.set_current_action(route);
        self.build_form();
    }

    /// Leaves the form; late results are ignored
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.state = FormState::Uninitialized;
        self.action = None;
    }

    fn set_current_action(&mut self, route: &Route) {
        if route.first_segment() == Some(NEW_ROUTE_SEGMENT) {
            self.action = Some(FormAction::New);
            self.state = FormState::New;
            self.record_id = None;
            return;
        }

        self.action = Some(FormAction::Edit);
        self.state = FormState::Editing;
        self.record_id = route.param("id").and_then(|raw| raw.parse().ok());
        if self.record_id.is_none() {
            tracing::warn!(
                resource = T::PATH,
                id = ?route.param("id"),
                "edit route without a numeric identifier"
            );
        }
    }

    fn build_form(&mut self) {
        self.fields = T::Fields::default();
        self.entity = None;
        self.submitting_form = false;
        self.server_error_messages.clear();
        self.field_errors.clear();
    }

    pub async fn load_entity(&mut self) {
        if let Some(ticket) = self.begin_load() {
            let result = self.api.get_by_id(ticket.id).await;
            self.complete_load(ticket, result);
        }
    }

    /// Returns the fetch to perform, if the form is editing a resolvable record.
    /// An edit route without an identifier is reported like a failed fetch.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.state != FormState::Editing {
            return None;
        }

        match self.record_id {
            Some(id) => {
                self.load_sequence += 1;
                Some(LoadTicket {
                    generation: self.generation,
                    sequence: self.load_sequence,
                    id,
                })
            }
            None => {
                self.notifier.error(REQUEST_FAILED_MESSAGE);
                None
            }
        }
    }

    /// Applies a fetched record to the field group. Returns whether it was applied.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<T, TransportError>) -> bool {
        if ticket.generation != self.generation
            || ticket.sequence != self.load_sequence
            || self.state != FormState::Editing
        {
            tracing::debug!(resource = T::PATH, id = ticket.id, "discarding stale load");
            return false;
        }

        match result {
            Ok(entity) => {
                entity.patch_fields(&mut self.fields);
                self.entity = Some(entity);
                true
            }
            Err(error) => {
                tracing::warn!(resource = T::PATH, id = ticket.id, error = %error, "could not load record");
                self.notifier.error(REQUEST_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Title for the current mode, recomputed on every call so a record
    /// loaded after activation shows up immediately.
    pub fn page_title(&self) -> String {
        match self.action {
            Some(FormAction::New) => T::NEW_CAPTION.to_string(),
            Some(FormAction::Edit) => {
                let name = self.entity.as_ref().map(|e| e.display_name()).unwrap_or("");
                format!("{}{}", T::EDIT_CAPTION, name)
            }
            None => String::new(),
        }
    }

    /// Validates and snapshots the field group, then locks the form
    pub fn begin_submit(&mut self) -> Result<PendingSubmit<T>, SubmitRejected> {
        let action = self.action.ok_or(SubmitRejected::Inactive)?;
        if self.submitting_form {
            return Err(SubmitRejected::InFlight);
        }

        if let Err(errors) = self.fields.validate() {
            self.field_errors = field_messages(&errors);
            return Err(SubmitRejected::Invalid(self.field_errors.clone()));
        }
        let entity = match T::from_fields(&self.fields) {
            Ok(entity) => entity,
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(SubmitRejected::Invalid(errors));
            }
        };

        self.field_errors.clear();
        self.submitting_form = true;
        self.state = FormState::Submitting;
        Ok(PendingSubmit {
            generation: self.generation,
            action,
            entity,
        })
    }

    /// Applies the backend's answer to a submission
    pub fn complete_submit(
        &mut self,
        pending: &PendingSubmit<T>,
        result: Result<T, TransportError>,
    ) -> SubmitOutcome<T> {
        if pending.generation != self.generation {
            tracing::debug!(resource = T::PATH, "discarding stale submission result");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(saved) => {
                self.notifier.success(T::SAVED_MESSAGE);
                self.state = FormState::SubmitSucceeded;
                self.server_error_messages.clear();
                self.entity = Some(saved.clone());
                self.navigator
                    .navigate(T::PATH, NavigationOptions::force_reload());
                SubmitOutcome::Saved(saved)
            }
            Err(error) => {
                self.notifier.error(REQUEST_FAILED_MESSAGE);
                self.submitting_form = false;
                self.server_error_messages = error.server_messages();
                self.state = FormState::SubmitFailed;
                SubmitOutcome::Failed(self.server_error_messages.clone())
            }
        }
    }

    /// Submits the form: `create` in create mode, `update` in edit mode
    pub async fn submit_form(&mut self) -> SubmitOutcome<T> {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };

        let api = Arc::clone(&self.api);
        let result = pending.send(&*api).await;
        self.complete_submit(&pending, result)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn action(&self) -> Option<FormAction> {
        self.action
    }

    /// Identifier resolved from the edit route
    pub fn record_id(&self) -> Option<EntityId> {
        self.record_id
    }

    pub fn fields(&self) -> &T::Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut T::Fields {
        &mut self.fields
    }

    /// Record loaded for editing, or the last one saved
    pub fn entity(&self) -> Option<&T> {
        self.entity.as_ref()
    }

    /// While true the submit trigger must stay disabled
    pub fn is_submitting(&self) -> bool {
        self.submitting_form
    }

    pub fn can_submit(&self) -> bool {
        self.action.is_some() && !self.submitting_form && self.fields.validate().is_ok()
    }

    pub fn server_error_messages(&self) -> &[String] {
        &self.server_error_messages
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }
}
