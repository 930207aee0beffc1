//! Session orchestration.
//!
//! [`Planner`] wires the editor, the view projector and the unlock machine
//! to the external collaborators, and saves the session after every change
//! to the working copy. It is driven from a single task; the `&mut self`
//! receivers keep mutations strictly ordered.

use rand::Rng;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::collaborators::{AlternativesProvider, DocumentExporter, PlanGenerator, RemotePersistence};
use crate::editor::{PlanEditor, SwapRequest, SwapStatus, SwapTicket, SHUFFLE_TRANSITION};
use crate::error::{ExportError, PlannerError, ProviderError};
use crate::models::{FullMealPlan, Meal, MealSlot, PreferenceField, UserPreferences};
use crate::session::{SessionRecord, SessionStore};
use crate::unlock::{UnlockEvent, UnlockMachine, UnlockState};
use crate::view::ViewProjector;

/// The external services a planner talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn PlanGenerator>,
    pub alternatives: Arc<dyn AlternativesProvider>,
    pub persistence: Arc<dyn RemotePersistence>,
}

/// Outcome of an alternatives fetch, tagged with the swap it belongs to.
pub type AlternativesResult = (SwapTicket, Result<Vec<Meal>, ProviderError>);

pub struct Planner {
    collaborators: Collaborators,
    session: SessionStore,
    editor: PlanEditor,
    view: ViewProjector,
    unlock: UnlockMachine,
    prefs: UserPreferences,
    outbox: Vec<UnlockEvent>,
}

impl Planner {
    /// Builds a planner and restores whatever the session store holds.
    pub fn new(collaborators: Collaborators, session: SessionStore) -> Self {
        let record = session.load();
        let mut editor = PlanEditor::new();
        if let Some(plan) = record.meal_plan {
            if let Err(e) = editor.initialize(plan) {
                tracing::warn!("Discarding saved plan: {}", e);
            }
        }
        let unlock = UnlockMachine::restore(record.email, record.email_captured, editor.has_plan());

        Self {
            collaborators,
            session,
            view: ViewProjector::new(&record.prefs),
            editor,
            unlock,
            prefs: record.prefs,
            outbox: Vec::new(),
        }
    }

    pub fn plan(&self) -> Option<&FullMealPlan> {
        self.editor.plan()
    }

    pub fn editor(&self) -> &PlanEditor {
        &self.editor
    }

    pub fn view(&self) -> &ViewProjector {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewProjector {
        &mut self.view
    }

    pub fn prefs(&self) -> &UserPreferences {
        &self.prefs
    }

    pub fn email(&self) -> &str {
        self.unlock.email()
    }

    pub fn unlock_state(&self) -> UnlockState {
        self.unlock.state()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlock.is_unlocked()
    }

    pub fn is_generating(&self) -> bool {
        self.unlock.state() == UnlockState::Generating
    }

    pub fn is_loading_alternatives(&self) -> bool {
        self.editor.is_loading_alternatives()
    }

    /// Events waiting for [`Planner::deliver_events`].
    pub fn pending_events(&self) -> &[UnlockEvent] {
        &self.outbox
    }

    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            meal_plan: self.editor.plan().cloned(),
            email: self.unlock.email().to_string(),
            email_captured: self.unlock.email_captured(),
            prefs: self.prefs.clone(),
        }
    }

    fn save(&self) {
        self.session.save(&self.record());
    }

    pub fn set_preferences(&mut self, mut prefs: UserPreferences) {
        prefs.normalize();
        self.prefs = prefs;
        self.save();
    }

    pub fn toggle_preference(&mut self, field: PreferenceField, item: &str) {
        self.prefs.toggle(field, item);
        self.save();
    }

    /// Asks the generator for a new plan and makes it the working copy.
    ///
    /// On any failure the working copy is left as it was.
    pub async fn generate(&mut self) -> Result<(), PlannerError> {
        self.prefs.validate()?;
        if !self.unlock.start_generation() {
            return Err(PlannerError::Busy("Plan generation"));
        }

        let generator = Arc::clone(&self.collaborators.generator);
        let result = generator.generate(&self.prefs).await.and_then(|plan| {
            self.editor
                .initialize(plan)
                .map_err(ProviderError::InvalidPlan)
        });

        match result {
            Ok(()) => {
                self.unlock.generation_succeeded();
                self.view = ViewProjector::new(&self.prefs);
                self.save();
                tracing::info!("Generated a new meal plan");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Meal plan generation failed: {}", e);
                self.unlock.generation_failed();
                Err(PlannerError::Generation(e))
            }
        }
    }

    pub fn edit_meal(
        &mut self,
        day: u32,
        slot: MealSlot,
        title: impl Into<String>,
        prep_notes: impl Into<String>,
    ) -> bool {
        let changed = self.editor.edit_meal(day, slot, title, prep_notes);
        if changed {
            self.save();
        }
        changed
    }

    pub fn add_snack(
        &mut self,
        day: u32,
        title: impl Into<String>,
        prep_notes: impl Into<String>,
        prep_time: Option<String>,
        cook_time: Option<String>,
    ) -> bool {
        let changed = self
            .editor
            .add_snack(day, title, prep_notes, prep_time, cook_time);
        if changed {
            self.save();
        }
        changed
    }

    pub fn remove_snack(&mut self, day: u32, index: usize) -> bool {
        let changed = self.editor.remove_snack(day, index);
        if changed {
            self.save();
        }
        changed
    }

    /// Starts a swap and returns the request to send to the provider.
    /// Any earlier swap becomes stale.
    pub fn begin_swap(&mut self, day: u32, slot: MealSlot) -> Result<SwapRequest, PlannerError> {
        if !self.editor.has_plan() {
            return Err(PlannerError::NoPlan);
        }
        self.editor
            .begin_swap(day, slot)
            .ok_or_else(|| PlannerError::NoSuchMeal {
                day,
                slot: slot.to_string(),
            })
    }

    /// A detached fetch for `request`. It borrows nothing from the planner,
    /// so other operations (including a newer swap) may run while it is
    /// outstanding. Feed the output to [`Planner::complete_swap`].
    pub fn fetch_alternatives(
        &self,
        request: &SwapRequest,
    ) -> impl Future<Output = AlternativesResult> + Send + 'static {
        let provider = Arc::clone(&self.collaborators.alternatives);
        let prefs = self.prefs.clone();
        let request = request.clone();
        async move {
            let result = provider
                .alternatives(
                    &prefs,
                    request.meal_type,
                    &request.current_meal,
                    &request.avoid_titles,
                )
                .await;
            (request.ticket, result)
        }
    }

    /// Hands a fetch result to the editor. Returns `false` when the swap it
    /// belongs to has been superseded or cancelled.
    pub fn complete_swap(&mut self, (ticket, result): AlternativesResult) -> bool {
        match result {
            Ok(alternatives) => self.editor.receive_alternatives(ticket, alternatives),
            Err(e) => {
                tracing::warn!("Failed to fetch alternatives: {}", e);
                self.editor.fail_swap(ticket, e.to_string())
            }
        }
    }

    /// Begins a swap and waits for its alternatives.
    pub async fn swap(&mut self, day: u32, slot: MealSlot) -> Result<SwapTicket, PlannerError> {
        let request = self.begin_swap(day, slot)?;
        let (ticket, result) = self.fetch_alternatives(&request).await;
        match result {
            Ok(alternatives) => {
                self.editor.receive_alternatives(ticket, alternatives);
                Ok(ticket)
            }
            Err(e) => {
                self.editor.fail_swap(ticket, e.to_string());
                Err(PlannerError::Alternatives(e))
            }
        }
    }

    pub fn swap_status(&self) -> Option<&SwapStatus> {
        self.editor.swap_status()
    }

    /// Replaces the swapped meal with one of the received candidates.
    pub fn choose_alternative(&mut self, ticket: SwapTicket, index: usize) -> Result<(), PlannerError> {
        if !self.editor.choose_alternative(ticket, index) {
            return Err(PlannerError::NoPendingSwap);
        }
        self.save();
        Ok(())
    }

    pub fn cancel_swap(&mut self) {
        self.editor.cancel_swap();
    }

    /// Shuffles the day order after the transition delay.
    pub async fn shuffle(&mut self) -> Result<(), PlannerError> {
        self.begin_shuffle()?;
        tokio::time::sleep(SHUFFLE_TRANSITION).await;
        let committed = {
            let mut rng = rand::rng();
            self.editor.commit_shuffle(&mut rng)
        };
        self.finish_shuffle(committed);
        Ok(())
    }

    /// [`Planner::shuffle`] with a caller-supplied random source.
    pub async fn shuffle_with<R: Rng + Send + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(), PlannerError> {
        self.begin_shuffle()?;
        tokio::time::sleep(SHUFFLE_TRANSITION).await;
        let committed = self.editor.commit_shuffle(rng);
        self.finish_shuffle(committed);
        Ok(())
    }

    fn begin_shuffle(&mut self) -> Result<(), PlannerError> {
        if !self.editor.has_plan() {
            return Err(PlannerError::NoPlan);
        }
        if !self.editor.begin_shuffle() {
            return Err(PlannerError::ShuffleInProgress);
        }
        Ok(())
    }

    fn finish_shuffle(&mut self, committed: bool) {
        if committed {
            self.save();
        }
    }

    /// Captures the email and queues the plan to be stored under it.
    pub fn submit_email(&mut self, email: &str) -> Result<(), PlannerError> {
        if !self.editor.has_plan() {
            return Err(PlannerError::NoPlan);
        }
        let event = self.unlock.submit_email(email)?;
        self.outbox.push(event);
        self.save();
        Ok(())
    }

    /// Performs queued side effects. Failures are logged and never
    /// reported back: the unlock has already happened.
    pub async fn deliver_events(&mut self) {
        let persistence = Arc::clone(&self.collaborators.persistence);
        for event in std::mem::take(&mut self.outbox) {
            match event {
                UnlockEvent::SaveEmail { email } => {
                    let Some(plan) = self.editor.plan() else {
                        continue;
                    };
                    match persistence.save(&email, plan, &self.prefs).await {
                        Ok(true) => tracing::info!("Saved plan for {}", email),
                        Ok(false) => tracing::warn!("Backend declined to save plan for {}", email),
                        Err(e) => tracing::warn!("Failed to save email: {}", e),
                    }
                }
            }
        }
    }

    /// Loads a previously saved plan for a returning user.
    pub async fn retrieve_plan(&mut self, email: &str) -> Result<(), PlannerError> {
        let email = crate::unlock::validate_email(email)?;
        let persistence = Arc::clone(&self.collaborators.persistence);
        let stored = persistence.get(&email).await.map_err(|e| {
            tracing::error!("Failed to fetch plan: {}", e);
            PlannerError::Retrieval(e)
        })?;
        let plan = match (stored.exists, stored.meal_plan) {
            (true, Some(plan)) => plan,
            _ => return Err(PlannerError::PlanNotFound),
        };
        self.editor
            .initialize(plan)
            .map_err(|e| PlannerError::Retrieval(ProviderError::InvalidPlan(e)))?;

        if let Some(prefs) = stored.prefs {
            self.prefs = prefs;
        }
        self.unlock.returning_user_found(email);
        self.view = ViewProjector::new(&self.prefs);
        self.save();
        Ok(())
    }

    pub fn export(&self, exporter: &dyn DocumentExporter) -> Result<PathBuf, PlannerError> {
        let plan = self.editor.plan().ok_or(ExportError::NoPlan)?;
        Ok(exporter.export(plan, &self.prefs)?)
    }

    /// Forgets the plan, the email and the preferences, and clears the
    /// saved session.
    pub fn reset(&mut self) {
        self.editor.reset();
        self.unlock.reset();
        self.prefs = UserPreferences::default();
        self.view = ViewProjector::default();
        self.outbox.clear();
        self.session.clear();
    }
}
