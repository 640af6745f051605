//! Runtime event stream payloads.

use crate::{
    core::{client::Change, edit::EditTransition},
    types::CarId,
};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The full collection was fetched into the store.
    Loaded {
        /// Number of records now held.
        count: usize,
    },
    /// A created car was appended.
    Created {
        /// Server-assigned id.
        id: CarId,
    },
    /// A car was updated in place.
    Updated {
        /// Updated car id.
        id: CarId,
    },
    /// A car was removed.
    Deleted {
        /// Removed car id.
        id: CarId,
    },
    /// The form now edits this car.
    EditEntered {
        /// Edited car id.
        id: CarId,
    },
    /// The form went back to creating.
    EditExited {
        /// Car that was being edited.
        id: CarId,
    },
    /// Something failed and the user should be told.
    Notice {
        /// Human-readable failure.
        message: String,
    },
}

impl From<Change> for ClientEvent {
    fn from(change: Change) -> Self {
        match change {
            Change::Loaded { count } => Self::Loaded { count },
            Change::Created { id } => Self::Created { id },
            Change::Updated { id } => Self::Updated { id },
            Change::Deleted { id } => Self::Deleted { id },
        }
    }
}

impl ClientEvent {
    /// Events describing an edit-mode transition, in the order they happened.
    ///
    /// A retarget is reported as leaving the old car, then entering the new one.
    pub fn from_transition(transition: &EditTransition) -> Vec<Self> {
        match transition {
            EditTransition::Entered(id) => vec![Self::EditEntered { id: id.clone() }],
            EditTransition::Retargeted { from, to } => vec![
                Self::EditExited { id: from.clone() },
                Self::EditEntered { id: to.clone() },
            ],
            EditTransition::Exited(id) => vec![Self::EditExited { id: id.clone() }],
            EditTransition::Unchanged => Vec::new(),
        }
    }
}
