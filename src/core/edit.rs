use crate::{
    car::CarRecord,
    core::store::{RecordStore, StoreError},
    types::CarId,
};

/// Which record, if any, the shared form is currently editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Submitting creates a new car.
    #[default]
    Idle,
    /// Submitting updates this car.
    Editing(CarId),
}

/// What a submission of the form should turn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitIntent {
    /// POST a new car.
    Create,
    /// PUT over the car with this id.
    Update(CarId),
}

/// Result of driving the edit state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTransition {
    /// `Idle` to `Editing(id)`.
    Entered(CarId),
    /// `Editing(from)` to `Editing(to)`.
    Retargeted {
        /// Car that was being edited.
        from: CarId,
        /// Car now being edited.
        to: CarId,
    },
    /// `Editing(id)` to `Idle`.
    Exited(CarId),
    /// Nothing changed.
    Unchanged,
}

/// Owner of the [`EditMode`].
#[derive(Debug, Default)]
pub struct EditController {
    mode: EditMode,
}

impl EditController {
    /// Controller starting in [`EditMode::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Id being edited, if any.
    pub fn target(&self) -> Option<&str> {
        match &self.mode {
            EditMode::Idle => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    /// What a submit would do right now.
    pub fn intent(&self) -> SubmitIntent {
        match &self.mode {
            EditMode::Idle => SubmitIntent::Create,
            EditMode::Editing(id) => SubmitIntent::Update(id.clone()),
        }
    }

    /// Activates the edit affordance for `id`.
    ///
    /// Activating the id already being edited toggles back to `Idle` without
    /// consulting the store. Any other id must currently exist.
    pub fn begin_edit(
        &mut self,
        store: &RecordStore,
        id: &str,
    ) -> Result<EditTransition, StoreError> {
        if self.target() == Some(id) {
            return Ok(self.end_edit());
        }
        if !store.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let prev = std::mem::replace(&mut self.mode, EditMode::Editing(id.to_string()));
        Ok(match prev {
            EditMode::Idle => EditTransition::Entered(id.to_string()),
            EditMode::Editing(from) => EditTransition::Retargeted {
                from,
                to: id.to_string(),
            },
        })
    }

    /// Returns to `Idle`.
    pub fn end_edit(&mut self) -> EditTransition {
        match std::mem::take(&mut self.mode) {
            EditMode::Idle => EditTransition::Unchanged,
            EditMode::Editing(id) => EditTransition::Exited(id),
        }
    }

    /// Re-resolves the current target against `store`.
    pub fn resolve<'a>(&self, store: &'a RecordStore) -> Result<Option<&'a CarRecord>, StoreError> {
        match self.target() {
            None => Ok(None),
            Some(id) => store
                .get(id)
                .map(Some)
                .ok_or_else(|| StoreError::NotFound(id.to_string())),
        }
    }
}
