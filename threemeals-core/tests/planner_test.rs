use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use threemeals_core::{
    AlternativesProvider, Collaborators, DailyPlan, EmailList, FileStorage, FullMealPlan, Meal,
    MealSlot, MealType, PlanGenerator, Planner, PlannerError, ProviderError, RemotePersistence,
    SessionStore, StoredPlan, SwapStatus, UnlockState, UserPreferences, ValidationError,
    WeeklyData, SHUFFLE_TRANSITION,
};

fn sample_plan(days: u32, prefix: &str) -> FullMealPlan {
    let day_list = (1..=days)
        .map(|n| {
            DailyPlan::new(
                n,
                Meal::new(format!("{} Breakfast {}", prefix, n), "Warm it up"),
                Meal::new(format!("{} Lunch {}", prefix, n), "Cut small"),
                Meal::new(format!("{} Dinner {}", prefix, n), "Serve mild").with_times("10 mins", "20 mins"),
            )
            .with_snacks(vec![Meal::new(format!("{} Snack {}", prefix, n), "")])
        })
        .collect();
    let weeks = (1..=days.div_ceil(7))
        .map(|w| {
            WeeklyData::new(w)
                .with_groceries(vec![format!("Item for week {}", w)])
                .with_tips(vec!["Freeze portions".into()])
        })
        .collect();
    FullMealPlan::new(day_list, weeks)
}

struct FakeGenerator {
    plan: Mutex<Result<FullMealPlan, String>>,
    calls: AtomicUsize,
}

impl FakeGenerator {
    fn returning(plan: FullMealPlan) -> Self {
        Self {
            plan: Mutex::new(Ok(plan)),
            calls: AtomicUsize::new(0),
        }
    }

    fn set(&self, plan: Result<FullMealPlan, String>) {
        *self.plan.lock().unwrap() = plan;
    }
}

#[async_trait]
impl PlanGenerator for FakeGenerator {
    async fn generate(&self, _prefs: &UserPreferences) -> Result<FullMealPlan, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.plan
            .lock()
            .unwrap()
            .clone()
            .map_err(ProviderError::Parse)
    }
}

struct FakeAlternatives {
    fail: bool,
}

#[async_trait]
impl AlternativesProvider for FakeAlternatives {
    async fn alternatives(
        &self,
        _prefs: &UserPreferences,
        meal_type: MealType,
        current: &Meal,
        _avoid_titles: &[String],
    ) -> Result<Vec<Meal>, ProviderError> {
        if self.fail {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        Ok((1..=3)
            .map(|i| {
                Meal::new(format!("{} alt {} for {}", meal_type, i, current.title), "")
                    .with_times("5 mins", "15 mins")
            })
            .collect())
    }
}

#[derive(Default)]
struct FakePersistence {
    plans: Mutex<HashMap<String, (FullMealPlan, UserPreferences)>>,
    fail: bool,
}

#[async_trait]
impl RemotePersistence for FakePersistence {
    async fn save(
        &self,
        email: &str,
        meal_plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<bool, ProviderError> {
        if self.fail {
            return Err(ProviderError::Storage("database offline".into()));
        }
        self.plans
            .lock()
            .unwrap()
            .insert(email.to_string(), (meal_plan.clone(), prefs.clone()));
        Ok(true)
    }

    async fn get(&self, email: &str) -> Result<StoredPlan, ProviderError> {
        if self.fail {
            return Err(ProviderError::Storage("database offline".into()));
        }
        Ok(match self.plans.lock().unwrap().get(email) {
            Some((plan, prefs)) => StoredPlan::found(plan.clone(), prefs.clone()),
            None => StoredPlan::missing(),
        })
    }

    async fn list_emails(&self) -> Result<EmailList, ProviderError> {
        Ok(EmailList::default())
    }
}

struct Harness {
    temp_dir: TempDir,
    generator: Arc<FakeGenerator>,
    persistence: Arc<FakePersistence>,
    alternatives_fail: bool,
}

impl Harness {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            generator: Arc::new(FakeGenerator::returning(sample_plan(30, "Gen"))),
            persistence: Arc::new(FakePersistence::default()),
            alternatives_fail: false,
        }
    }

    fn session(&self) -> SessionStore {
        SessionStore::new(FileStorage::new(self.temp_dir.path()))
    }

    fn planner(&self) -> Planner {
        let collaborators = Collaborators {
            generator: self.generator.clone(),
            alternatives: Arc::new(FakeAlternatives {
                fail: self.alternatives_fail,
            }),
            persistence: self.persistence.clone(),
        };
        Planner::new(collaborators, self.session())
    }
}

fn prefs() -> UserPreferences {
    UserPreferences {
        age: "1 year".into(),
        allergies: "Eggs".into(),
        ..Default::default()
    }
}

async fn generated(harness: &Harness) -> Planner {
    let mut planner = harness.planner();
    planner.set_preferences(prefs());
    planner.generate().await.unwrap();
    planner
}

#[tokio::test]
async fn test_generate_requires_age() {
    let harness = Harness::new();
    let mut planner = harness.planner();

    let err = planner.generate().await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::MissingAge)
    ));
    assert_eq!(harness.generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(planner.unlock_state(), UnlockState::Idle);
}

#[tokio::test]
async fn test_generate_then_awaiting_email() {
    let harness = Harness::new();
    let planner = generated(&harness).await;

    assert_eq!(planner.unlock_state(), UnlockState::AwaitingEmail);
    assert_eq!(planner.plan().unwrap().days.len(), 30);
    assert!(!planner.is_generating());

    let saved = harness.session().load();
    assert_eq!(saved.meal_plan.as_ref(), planner.plan());
    assert_eq!(saved.prefs.age, "1 year");
}

#[tokio::test]
async fn test_generation_failure_keeps_working_copy() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;
    let before = planner.plan().cloned();

    harness.generator.set(Err("unexpected token".into()));
    let err = planner.generate().await.unwrap_err();
    assert!(err.to_string().starts_with("Oof, something went wrong:"));
    assert_eq!(planner.plan().cloned(), before);
    assert_eq!(planner.unlock_state(), UnlockState::AwaitingEmail);
}

#[tokio::test]
async fn test_malformed_plan_is_rejected() {
    let harness = Harness::new();
    let mut broken = sample_plan(7, "Bad");
    broken.days[1].day = 1;
    harness.generator.set(Ok(broken));

    let mut planner = harness.planner();
    planner.set_preferences(prefs());
    assert!(matches!(
        planner.generate().await,
        Err(PlannerError::Generation(ProviderError::InvalidPlan(_)))
    ));
    assert!(planner.plan().is_none());
    assert_eq!(planner.unlock_state(), UnlockState::Idle);
}

#[tokio::test]
async fn test_stale_swap_response_is_dropped() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;

    let first = planner.begin_swap(1, MealSlot::Breakfast).unwrap();
    let slow = planner.fetch_alternatives(&first);

    let second = planner.begin_swap(1, MealSlot::Dinner).unwrap();
    let fast = planner.fetch_alternatives(&second);

    assert!(planner.complete_swap(fast.await));
    assert!(!planner.complete_swap(slow.await));

    let target = planner.editor().swap_target().unwrap();
    assert_eq!(target, second.ticket);
    match planner.swap_status() {
        Some(SwapStatus::Ready(alts)) => {
            assert_eq!(alts.len(), 3);
            assert!(alts[0].title.starts_with("dinner alt"));
        }
        other => panic!("unexpected swap status: {:?}", other),
    }

    // The superseded breakfast was never touched
    assert_eq!(
        planner.plan().unwrap().days[0].breakfast.title,
        "Gen Breakfast 1"
    );
}

#[tokio::test]
async fn test_swap_and_choose_replaces_meal_with_times() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;

    let ticket = planner.swap(2, MealSlot::Lunch).await.unwrap();
    planner.choose_alternative(ticket, 1).unwrap();

    let lunch = &planner.plan().unwrap().day(2).unwrap().lunch;
    assert_eq!(lunch.title, "lunch alt 2 for Gen Lunch 2");
    assert_eq!(lunch.prep_time.as_deref(), Some("5 mins"));
    assert!(planner.swap_status().is_none());

    let saved = harness.session().load();
    assert_eq!(saved.meal_plan.unwrap().day(2).unwrap().lunch, *lunch);
}

#[tokio::test]
async fn test_failed_swap_stays_pending() {
    let mut harness = Harness::new();
    harness.alternatives_fail = true;
    let mut planner = generated(&harness).await;

    let err = planner.swap(3, MealSlot::Snack(0)).await.unwrap_err();
    assert!(matches!(err, PlannerError::Alternatives(_)));
    assert!(matches!(planner.swap_status(), Some(SwapStatus::Failed(_))));

    planner.cancel_swap();
    assert!(planner.swap_status().is_none());
}

#[tokio::test]
async fn test_swap_unknown_day() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;
    assert!(matches!(
        planner.begin_swap(99, MealSlot::Dinner),
        Err(PlannerError::NoSuchMeal { day: 99, .. })
    ));
}

#[tokio::test]
async fn test_remove_snack_shifts_indices() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;

    planner.remove_snack(1, 0);
    for title in ["A", "B", "C"] {
        assert!(planner.add_snack(1, title, "", None, None));
    }

    assert!(planner.remove_snack(1, 1));
    let titles: Vec<_> = planner.plan().unwrap().days[0]
        .snacks
        .iter()
        .map(|s| s.title.clone())
        .collect();
    assert_eq!(titles, ["A", "C"]);

    assert!(planner.remove_snack(1, 1));
    assert_eq!(planner.plan().unwrap().days[0].snacks.len(), 1);
    assert!(!planner.remove_snack(1, 5));
}

#[tokio::test(start_paused = true)]
async fn test_shuffle_preserves_content() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;
    let before = planner.plan().unwrap().clone();

    let mut rng = StdRng::seed_from_u64(7);
    let started = tokio::time::Instant::now();
    planner.shuffle_with(&mut rng).await.unwrap();
    assert!(started.elapsed() >= SHUFFLE_TRANSITION);
    let after = planner.plan().unwrap();

    let content = |plan: &FullMealPlan| -> HashSet<String> {
        plan.days
            .iter()
            .map(|d| {
                let snacks: Vec<_> = d.snacks.iter().map(|s| s.title.as_str()).collect();
                format!(
                    "{}|{}|{}|{}",
                    d.breakfast.title,
                    d.lunch.title,
                    d.dinner.title,
                    snacks.join(",")
                )
            })
            .collect()
    };
    assert_eq!(after.days.len(), before.days.len());
    assert_eq!(content(after), content(&before));
    assert_eq!(after.weeks, before.weeks);
    let numbers: Vec<u32> = after.days.iter().map(|d| d.day).collect();
    assert_eq!(numbers, (1..=30).collect::<Vec<_>>());
    assert!(!planner.editor().is_shuffling());
}

#[tokio::test]
async fn test_shuffle_without_plan() {
    let harness = Harness::new();
    let mut planner = harness.planner();
    assert!(matches!(planner.shuffle().await, Err(PlannerError::NoPlan)));
}

#[tokio::test]
async fn test_calendar_weeks_for_28_day_plan() {
    let harness = Harness::new();
    harness.generator.set(Ok(sample_plan(28, "Four")));
    let mut planner = generated(&harness).await;

    for week in 1..=4 {
        planner.view_mut().select_week(week);
        let plan = planner.plan().unwrap();
        assert_eq!(planner.view().calendar(plan).days.len(), 7);
    }
}

#[tokio::test]
async fn test_email_gating_and_save() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;

    for bad in ["foo", "foo@bar", "@bar.com"] {
        assert!(planner.submit_email(bad).is_err());
        assert_eq!(planner.unlock_state(), UnlockState::AwaitingEmail);
        assert!(planner.pending_events().is_empty());
    }

    planner.submit_email("parent@example.com").unwrap();
    assert!(planner.is_unlocked());
    assert_eq!(planner.pending_events().len(), 1);

    planner.deliver_events().await;
    assert!(planner.pending_events().is_empty());
    assert!(harness
        .persistence
        .plans
        .lock()
        .unwrap()
        .contains_key("parent@example.com"));
    assert!(harness.session().load().email_captured);
}

#[tokio::test]
async fn test_failed_email_save_does_not_block_unlock() {
    let mut harness = Harness::new();
    harness.persistence = Arc::new(FakePersistence {
        fail: true,
        ..Default::default()
    });
    let mut planner = generated(&harness).await;

    planner.submit_email("parent@example.com").unwrap();
    planner.deliver_events().await;
    assert!(planner.is_unlocked());
}

#[tokio::test]
async fn test_retrieve_plan_for_returning_user() {
    let harness = Harness::new();
    let stored = sample_plan(28, "Stored");
    let stored_prefs = UserPreferences {
        age: "2 years".into(),
        ..Default::default()
    };
    harness.persistence.plans.lock().unwrap().insert(
        "back@example.com".into(),
        (stored.clone(), stored_prefs.clone()),
    );

    let mut planner = harness.planner();
    assert!(matches!(
        planner.retrieve_plan("new@example.com").await,
        Err(PlannerError::PlanNotFound)
    ));
    assert!(matches!(
        planner.retrieve_plan("nope").await,
        Err(PlannerError::Validation(ValidationError::InvalidEmail))
    ));

    planner.retrieve_plan("back@example.com").await.unwrap();
    assert!(planner.is_unlocked());
    assert_eq!(planner.plan(), Some(&stored));
    assert_eq!(planner.prefs(), &stored_prefs);
}

#[tokio::test]
async fn test_retrieve_plan_backend_failure() {
    let mut harness = Harness::new();
    harness.persistence = Arc::new(FakePersistence {
        fail: true,
        ..Default::default()
    });
    let mut planner = harness.planner();

    let err = planner.retrieve_plan("back@example.com").await.unwrap_err();
    assert!(matches!(err, PlannerError::Retrieval(_)));
    assert!(err.to_string().starts_with("Something went wrong"));
    assert!(planner.plan().is_none());
    assert!(!planner.is_unlocked());
}

#[tokio::test]
async fn test_session_restored_by_new_planner() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;
    planner.submit_email("parent@example.com").unwrap();
    planner.edit_meal(5, MealSlot::Dinner, "Lentil Stew", "Mash lightly");

    let restored = harness.planner();
    assert!(restored.is_unlocked());
    assert_eq!(restored.email(), "parent@example.com");
    assert_eq!(restored.plan(), planner.plan());
    let dinner = &restored.plan().unwrap().day(5).unwrap().dinner;
    assert_eq!(dinner.title, "Lentil Stew");
    assert_eq!(dinner.cook_time.as_deref(), Some("20 mins"));
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let harness = Harness::new();
    let mut planner = generated(&harness).await;
    planner.submit_email("parent@example.com").unwrap();

    planner.reset();
    assert!(planner.plan().is_none());
    assert_eq!(planner.unlock_state(), UnlockState::Idle);
    assert_eq!(planner.prefs(), &UserPreferences::default());

    let loaded = harness.session().load();
    assert!(loaded.meal_plan.is_none());
    assert!(!loaded.email_captured);
    assert!(harness.planner().plan().is_none());
}
