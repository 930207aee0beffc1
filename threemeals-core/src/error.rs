//! Error types shared across the core library.

use thiserror::Error;

/// A plan that does not satisfy the data model invariants.
///
/// Raised before a plan is accepted as the working copy, so the editor
/// never holds a partially valid plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Meal plan has no days")]
    NoDays,

    #[error("Day numbers must start at 1 (found day {0})")]
    InvalidDayNumber(u32),

    #[error("Day {0} appears more than once")]
    DuplicateDay(u32),

    #[error("Day {day} has a {slot} with an empty title")]
    EmptyTitle { day: u32, slot: String },
}

/// Input rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email address")]
    EmptyEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Select age to continue")]
    MissingAge,
}

/// Failure reported by an external collaborator (model, persistence).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Empty response from AI. Please try again.")]
    EmptyResponse,

    #[error("Failed to parse meal plan: {0}")]
    Parse(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error(transparent)]
    InvalidPlan(#[from] PlanError),
}

/// Errors from the local key-value storage backing the session store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Errors raised while producing a printable document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: no meal plan loaded")]
    NoPlan,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the planner to whoever drives the session.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("No meal plan loaded")]
    NoPlan,

    #[error("A shuffle is already in progress")]
    ShuffleInProgress,

    #[error("No swap is pending for that meal")]
    NoPendingSwap,

    #[error("Day {day} has no {slot}")]
    NoSuchMeal { day: u32, slot: String },

    #[error("No plan found for this email. Try creating a new one!")]
    PlanNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Oof, something went wrong: {0}")]
    Generation(ProviderError),

    #[error("Couldn't load alternatives: {0}")]
    Alternatives(ProviderError),

    #[error("Something went wrong. Please try again. ({0})")]
    Retrieval(ProviderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
