use crate::{
    car::CarPatch,
    core::{
        edit::{EditController, EditMode, EditTransition, SubmitIntent},
        form::{FormChrome, FormController, FormFields, FormView, ValidationError},
        store::{RecordStore, StoreError},
    },
    render::Renderer,
    transport::{Ack, Call, TransportError},
    types::CarId,
};

/// Why a user action or acknowledgment was not applied.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The form input was rejected before any call.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The referenced car is not in the store.
    #[error("car {0} not found")]
    NotFound(CarId),
    /// The server handed back an id the store already holds.
    #[error("car {0} already exists")]
    Duplicate(CarId),
    /// The transport call failed.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
}

impl From<StoreError> for ClientError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::AlreadyExists(id) => Self::Duplicate(id),
        }
    }
}

/// Store mutation applied from a transport acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The store was replaced by a fetch.
    Loaded {
        /// Records now held.
        count: usize,
    },
    /// A car was appended.
    Created {
        /// Server-assigned id.
        id: CarId,
    },
    /// A car was merged in place.
    Updated {
        /// Updated car.
        id: CarId,
    },
    /// A car was removed.
    Deleted {
        /// Removed car.
        id: CarId,
    },
}

/// Synchronous client core: record store, edit mode, form, and renderer.
///
/// Each user action is split in two. `prepare_*` validates and decides which
/// [`Call`] to make without touching the store; [`CarClient::apply`] takes the
/// matching [`Ack`] and is the only path that mutates the store.
pub struct CarClient<R> {
    store: RecordStore,
    edit: EditController,
    form: FormController,
    renderer: R,
}

impl<R: Renderer> CarClient<R> {
    /// Client with an empty store.
    pub fn new(renderer: R, default_chrome: FormChrome) -> Self {
        Self::with_store(RecordStore::new(), renderer, default_chrome)
    }

    /// Client over an existing store.
    pub fn with_store(store: RecordStore, renderer: R, default_chrome: FormChrome) -> Self {
        Self {
            store,
            edit: EditController::new(),
            form: FormController::new(default_chrome),
            renderer,
        }
    }

    /// Acknowledged records.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Current edit mode.
    pub fn edit_mode(&self) -> &EditMode {
        self.edit.mode()
    }

    /// Id being edited, if any.
    pub fn edit_target(&self) -> Option<&str> {
        self.edit.target()
    }

    /// Form state.
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Owned copy of the form fields and chrome.
    pub fn form_view(&self) -> FormView {
        self.form.view()
    }

    /// The renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer collaborator.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Call that fetches the whole collection.
    pub fn load_call(&self) -> Call {
        Call::FetchAll
    }

    /// Validates `fields` and picks create or update from the edit mode.
    pub fn prepare_submit(&mut self, fields: FormFields) -> Result<Call, ClientError> {
        self.form.set_fields(fields);
        let payload = self.form.extract_submission()?;
        tracing::debug!(make = %payload.make, bhp = payload.bhp, "submitting car");

        match self.edit.intent() {
            SubmitIntent::Create => Ok(Call::Create(payload)),
            SubmitIntent::Update(id) => {
                self.edit.resolve(&self.store)?;
                Ok(Call::Update { id, payload })
            }
        }
    }

    /// Call that deletes `id`. The store changes only once it is acknowledged.
    pub fn prepare_delete(&self, id: impl Into<CarId>) -> Call {
        Call::Delete(id.into())
    }

    /// Handles a click on the edit affordance of `id`.
    pub fn toggle_edit(&mut self, id: &str) -> Result<EditTransition, ClientError> {
        let transition = self.edit.begin_edit(&self.store, id)?;
        match &transition {
            EditTransition::Entered(target) | EditTransition::Retargeted { to: target, .. } => {
                if let Some(rec) = self.store.get(target) {
                    tracing::debug!(id = %target, make = %rec.make, "entering edit mode");
                    self.form.populate(rec);
                    self.form.show_edit_chrome(&rec.make);
                }
            }
            EditTransition::Exited(_) => self.reset_form(),
            EditTransition::Unchanged => {}
        }
        Ok(transition)
    }

    /// Leaves edit mode and resets the form; a no-op when idle.
    pub fn cancel_edit(&mut self) -> EditTransition {
        let transition = self.edit.end_edit();
        if transition != EditTransition::Unchanged {
            self.reset_form();
        }
        transition
    }

    /// Applies an acknowledged call to the store and re-renders.
    ///
    /// On error the store is left exactly as it was.
    pub fn apply(&mut self, ack: Ack) -> Result<Change, ClientError> {
        let change = match ack {
            Ack::Fetched(records) => {
                self.store.replace_all(records)?;
                if self.edit.resolve(&self.store).is_err() {
                    self.cancel_edit();
                }
                Change::Loaded {
                    count: self.store.len(),
                }
            }
            Ack::Created(record) => {
                let id = record.id.clone();
                self.store.insert(record)?;
                Change::Created { id }
            }
            Ack::Updated {
                id,
                payload,
                record,
            } => {
                // The submitted payload wins over the response body, which
                // may be the pre-update document.
                let mut patch = CarPatch::from(payload);
                if let Some(rec) = record {
                    patch = patch.with_extras_of(rec);
                }
                self.store.update(&id, &patch)?;
                if self.edit.target() == Some(id.as_str()) {
                    self.cancel_edit();
                }
                Change::Updated { id }
            }
            Ack::Deleted(id) => {
                self.store.remove(&id)?;
                if self.edit.target() == Some(id.as_str()) {
                    self.cancel_edit();
                }
                Change::Deleted { id }
            }
        };

        self.render();
        Ok(change)
    }

    /// Renders the current snapshot.
    pub fn render(&mut self) {
        self.renderer.render(self.store.snapshot());
    }

    fn reset_form(&mut self) {
        tracing::debug!("exiting edit mode");
        self.form.restore_chrome();
        self.form.reset_fields();
    }
}
