//! Core library for 3meals.
//!
//! Holds the meal plan model and everything that works on it without
//! touching the network: the plan editor, view projections, session
//! persistence, the email-gated unlock, document rendering and the
//! [`Planner`] that ties them to the external collaborators.

pub mod collaborators;
pub mod editor;
pub mod error;
pub mod export;
pub mod models;
pub mod planner;
pub mod session;
pub mod storage;
pub mod suggestions;
pub mod unlock;
pub mod view;

pub use collaborators::{
    AlternativesProvider, DocumentExporter, EmailList, EmailLogEntry, PlanGenerator,
    RemotePersistence, StoredPlan, ALTERNATIVES_PER_SWAP,
};
pub use editor::{PlanEditor, SwapRequest, SwapStatus, SwapTicket, SHUFFLE_TRANSITION};
pub use error::{
    ExportError, PlanError, PlannerError, ProviderError, StorageError, ValidationError,
};
pub use export::{export_file_name, render_plan, TextExporter};
pub use models::*;
pub use planner::{AlternativesResult, Collaborators, Planner};
pub use session::{SessionRecord, SessionStore, SESSION_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use suggestions::suggested_snacks;
pub use unlock::{validate_email, UnlockEvent, UnlockMachine, UnlockState};
pub use view::{CalendarView, DayCard, TodayView, ViewMode, ViewProjector};

/// Returns the library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
