//! Email-gated unlock state machine.
//!
//! ```text
//!   Idle ──start_generation──▶ Generating ──succeeded──▶ AwaitingEmail ──submit_email──▶ Unlocked
//!    ▲                            │  (failed: back to previous state)     (email already captured) ─┘
//!    │                            ▼
//!    └──────────── reset ◀─────── any state ◀── returning_user_found ── (jumps to Unlocked)
//! ```
//!
//! The machine performs no I/O. Submitting an email emits an
//! [`UnlockEvent`] for a persistence adapter to act on; whether that save
//! succeeds has no effect on the transition.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Checks `local@domain.tld` shape and returns the trimmed address.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlockState {
    /// Before any plan exists (the wizard).
    #[default]
    Idle,
    Generating,
    AwaitingEmail,
    Unlocked,
}

impl fmt::Display for UnlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlockState::Idle => write!(f, "idle"),
            UnlockState::Generating => write!(f, "generating"),
            UnlockState::AwaitingEmail => write!(f, "awaiting email"),
            UnlockState::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Side effects requested by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockEvent {
    /// Store the plan under this email. Fire-and-forget.
    SaveEmail { email: String },
}

#[derive(Debug, Clone, Default)]
pub struct UnlockMachine {
    state: UnlockState,
    before_generation: UnlockState,
    email: String,
    email_captured: bool,
}

impl UnlockMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the machine from a saved session.
    pub fn restore(email: impl Into<String>, email_captured: bool, has_plan: bool) -> Self {
        let state = match (has_plan, email_captured) {
            (true, true) => UnlockState::Unlocked,
            (true, false) => UnlockState::AwaitingEmail,
            (false, _) => UnlockState::Idle,
        };
        Self {
            state,
            before_generation: state,
            email: email.into(),
            email_captured,
        }
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn email_captured(&self) -> bool {
        self.email_captured
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == UnlockState::Unlocked
    }

    /// Returns `false` if a generation is already running.
    pub fn start_generation(&mut self) -> bool {
        if self.state == UnlockState::Generating {
            return false;
        }
        self.before_generation = self.state;
        self.state = UnlockState::Generating;
        true
    }

    pub fn generation_succeeded(&mut self) {
        self.state = if self.email_captured && !self.email.is_empty() {
            UnlockState::Unlocked
        } else {
            UnlockState::AwaitingEmail
        };
    }

    pub fn generation_failed(&mut self) {
        self.state = self.before_generation;
    }

    /// Validates and captures an email. Invalid input leaves every field
    /// of the machine untouched.
    pub fn submit_email(&mut self, email: &str) -> Result<UnlockEvent, ValidationError> {
        let email = validate_email(email)?;
        self.email = email.clone();
        self.email_captured = true;
        if self.state == UnlockState::AwaitingEmail {
            self.state = UnlockState::Unlocked;
        }
        Ok(UnlockEvent::SaveEmail { email })
    }

    /// A stored plan was found for this email.
    pub fn returning_user_found(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.email_captured = true;
        self.state = UnlockState::Unlocked;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
