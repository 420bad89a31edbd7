// ═══════════════════════════════════════════════════════════════════
// Integration Tests — BudgetTracker facade end to end:
// entry → categorization → aggregation → alerts → live dashboard
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use budget_rule_core::errors::CoreError;
use budget_rule_core::models::alert::BudgetAlert;
use budget_rule_core::models::configuration::BudgetConfiguration;
use budget_rule_core::models::report::{ReportWindow, YearMonth};
use budget_rule_core::models::settings::Settings;
use budget_rule_core::models::suggestion::{CategorySuggestion, SuggestionOutcome};
use budget_rule_core::models::transaction::{Category, TransactionDraft, TransactionType};
use budget_rule_core::providers::registry::SuggesterRegistry;
use budget_rule_core::providers::traits::CategorySuggester;
use budget_rule_core::services::alert_sink::AlertSink;
use budget_rule_core::services::draft_categorizer::DraftCategorizer;
use budget_rule_core::services::suggestion_service::SuggestionService;
use budget_rule_core::storage::memory::MemoryStore;
use budget_rule_core::BudgetTracker;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[derive(Default)]
struct RecordingSink {
    alerts: Mutex<Vec<BudgetAlert>>,
}

impl RecordingSink {
    fn categories(&self) -> Vec<Category> {
        self.alerts.lock().unwrap().iter().map(|a| a.category).collect()
    }
}

impl AlertSink for RecordingSink {
    fn emit(&self, alert: &BudgetAlert) {
        self.alerts.lock().unwrap().push(*alert);
    }
}

struct FixedSuggester(Category);

#[async_trait]
impl CategorySuggester for FixedSuggester {
    fn name(&self) -> &str {
        "Fixed"
    }

    async fn suggest_category(
        &self,
        _description: &str,
        _amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        Ok(CategorySuggestion::new(self.0, "fixed answer"))
    }
}

fn tracker_with_sink() -> (BudgetTracker, Arc<RecordingSink>) {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let tracker = BudgetTracker::in_memory().with_alert_sink(sink.clone());
    (tracker, sink)
}

async fn seed_march(tracker: &BudgetTracker, owner: &str) {
    tracker
        .add_transaction(owner, TransactionDraft::income(d(2025, 3, 1), "Salary", 1000.0))
        .await
        .unwrap();
    tracker
        .add_transaction(
            owner,
            TransactionDraft::expense(d(2025, 3, 2), "Rent", 600.0, Category::Needs),
        )
        .await
        .unwrap();
    tracker
        .add_transaction(
            owner,
            TransactionDraft::expense(d(2025, 3, 3), "Cinema", 100.0, Category::Wants),
        )
        .await
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Entry & categorization
// ═══════════════════════════════════════════════════════════════════

mod entry {
    use super::*;

    #[tokio::test]
    async fn income_stored_as_savings() {
        let (tracker, _) = tracker_with_sink();
        let mut draft = TransactionDraft::income(d(2025, 3, 1), "Salary", 2500.0);
        draft.selected_category = Category::Needs;

        let stored = tracker.add_transaction("alice", draft).await.unwrap();
        assert_eq!(stored.transaction_type, TransactionType::Income);
        assert_eq!(stored.category, Category::Savings);
        assert_eq!(stored.owner_id, "alice");
    }

    #[tokio::test]
    async fn invalid_entry_is_not_stored() {
        let (tracker, _) = tracker_with_sink();
        let draft = TransactionDraft::expense(d(2025, 3, 1), "", 10.0, Category::Wants);
        assert!(matches!(
            tracker.add_transaction("alice", draft).await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(tracker.list_transactions("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_draft_resets_on_success() {
        let (tracker, _) = tracker_with_sink();
        let mut draft = DraftCategorizer::new(d(2025, 3, 4));
        draft.set_description("Groceries");
        draft.set_amount(82.4);
        draft.select_category(Category::Needs);

        let stored = tracker.submit_draft("alice", &mut draft).await.unwrap();
        assert_eq!(stored.category, Category::Needs);
        assert_eq!(draft.description(), "");
    }

    #[tokio::test]
    async fn submit_draft_kept_on_failure() {
        let (tracker, _) = tracker_with_sink();
        let mut draft = DraftCategorizer::new(d(2025, 3, 4));
        draft.set_description("Groceries");

        assert!(tracker.submit_draft("alice", &mut draft).await.is_err());
        assert_eq!(draft.description(), "Groceries");
    }

    #[tokio::test]
    async fn recent_transactions_capped_by_settings() {
        init_tracing();
        let settings = Settings {
            recent_limit: 2,
            ..Settings::default()
        };
        let tracker = BudgetTracker::new(Arc::new(MemoryStore::new()), settings);
        for day in 1..=4 {
            tracker
                .add_transaction(
                    "alice",
                    TransactionDraft::expense(d(2025, 3, day), format!("Coffee {day}"), 3.0, Category::Wants),
                )
                .await
                .unwrap();
        }

        let recent = tracker.recent_transactions("alice").await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, d(2025, 3, 4));
        assert_eq!(recent[1].date, d(2025, 3, 3));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Suggestions through the facade
// ═══════════════════════════════════════════════════════════════════

mod suggestions {
    use super::*;

    #[tokio::test]
    async fn keyword_fallback_by_default() {
        let tracker = BudgetTracker::in_memory();
        assert_eq!(tracker.suggestion_providers(), vec!["Keywords"]);
        let s = tracker.suggest_category("Monthly rent", 900.0).await.unwrap();
        assert_eq!(s.category, Category::Needs);
    }

    #[tokio::test]
    async fn refresh_suggestion_applies_and_is_stored() {
        let mut registry = SuggesterRegistry::new();
        registry.register(Box::new(FixedSuggester(Category::Savings)));
        let tracker = BudgetTracker::in_memory()
            .with_suggestion_service(SuggestionService::new(registry, Duration::from_secs(1)));

        let mut draft = DraftCategorizer::new(d(2025, 3, 4));
        draft.set_description("Transfer");
        draft.set_amount(200.0);

        let outcome = tracker.refresh_suggestion(&mut draft).await.unwrap();
        assert!(matches!(outcome, SuggestionOutcome::Applied(_)));
        assert_eq!(draft.explanation(), Some("fixed answer"));

        let stored = tracker.submit_draft("alice", &mut draft).await.unwrap();
        assert_eq!(stored.category, Category::Savings);
    }

    #[tokio::test]
    async fn unavailable_keeps_manual_category() {
        let settings = Settings::from_json(r#"{"suggestion": {"keyword_fallback": false}}"#).unwrap();
        let tracker = BudgetTracker::new(Arc::new(MemoryStore::new()), settings);

        let mut draft = DraftCategorizer::new(d(2025, 3, 4));
        draft.set_description("Dentist");
        draft.set_amount(120.0);
        draft.select_category(Category::Needs);

        let outcome = tracker.refresh_suggestion(&mut draft).await.unwrap();
        assert!(matches!(outcome, SuggestionOutcome::Unavailable(_)));

        let stored = tracker.submit_draft("alice", &mut draft).await.unwrap();
        assert_eq!(stored.category, Category::Needs);
    }

    #[tokio::test]
    async fn refresh_rejects_incomplete_draft() {
        let tracker = BudgetTracker::in_memory();
        let mut draft = DraftCategorizer::new(d(2025, 3, 4));
        assert!(matches!(
            tracker.refresh_suggestion(&mut draft).await,
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn api_key_changes_rebuild_providers() {
        let mut tracker = BudgetTracker::in_memory();
        tracker.set_suggestion_api_key("sk-test".into());
        assert_eq!(tracker.suggestion_providers(), vec!["LLM", "Keywords"]);
        assert!(tracker.settings().suggestion.has_api_key());

        assert!(tracker.remove_suggestion_api_key());
        assert_eq!(tracker.suggestion_providers(), vec!["Keywords"]);
        assert!(!tracker.remove_suggestion_api_key());
    }

    #[test]
    fn debug_hides_api_key() {
        let mut tracker = BudgetTracker::in_memory();
        tracker.set_suggestion_api_key("sk-secret-123".into());
        let debug = format!("{tracker:?}");
        assert!(debug.contains("BudgetTracker"));
        assert!(!debug.contains("sk-secret-123"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Dashboard & alerts
// ═══════════════════════════════════════════════════════════════════

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn summary_and_needs_alert() {
        let (tracker, sink) = tracker_with_sink();
        seed_march(&tracker, "alice").await;

        let dashboard = tracker.dashboard("alice").await.unwrap();
        assert_eq!(dashboard.summary.total_income, 1000.0);
        assert_eq!(dashboard.summary.total_expenses, 700.0);
        assert_eq!(dashboard.summary.savings_total, 300.0);
        assert_eq!(dashboard.alerts.len(), 1);
        assert_eq!(dashboard.alerts[0].category, Category::Needs);
        assert_eq!(
            dashboard.alerts[0].message(),
            "You've spent 60% of your income on needs, which is over the 50% target."
        );
        assert_eq!(sink.categories(), vec![Category::Needs]);
    }

    #[tokio::test]
    async fn custom_configuration_changes_alerts() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        tracker
            .save_configuration("alice", BudgetConfiguration::new(70.0, 10.0, 20.0))
            .await
            .unwrap();

        let categories: Vec<Category> = tracker
            .dashboard("alice")
            .await
            .unwrap()
            .alerts
            .iter()
            .map(|a| a.category)
            .collect();
        // needs 60% ≤ 70%, wants 10% is not over 10%
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn rejected_configuration_keeps_previous() {
        let (tracker, _) = tracker_with_sink();
        assert_eq!(
            tracker.get_configuration("alice").await.unwrap(),
            BudgetConfiguration::default()
        );
        assert!(tracker
            .save_configuration("alice", BudgetConfiguration::new(50.0, 30.0, 21.0))
            .await
            .is_err());
        assert_eq!(
            tracker.get_configuration("alice").await.unwrap(),
            BudgetConfiguration::default()
        );
    }

    #[tokio::test]
    async fn no_income_no_alerts() {
        let (tracker, sink) = tracker_with_sink();
        tracker
            .add_transaction(
                "alice",
                TransactionDraft::expense(d(2025, 3, 2), "Rent", 600.0, Category::Needs),
            )
            .await
            .unwrap();

        assert!(tracker.dashboard("alice").await.unwrap().alerts.is_empty());
        assert!(sink.categories().is_empty());
    }

    #[tokio::test]
    async fn owners_do_not_mix() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        let bob = tracker.dashboard("bob").await.unwrap();
        assert_eq!(bob.summary.total_income, 0.0);
        assert!(bob.summary.chart_data.is_empty());
    }

    #[tokio::test]
    async fn month_window_and_reports() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        tracker
            .add_transaction(
                "alice",
                TransactionDraft::expense(d(2025, 2, 20), "Concert", 80.0, Category::Wants),
            )
            .await
            .unwrap();

        let feb = tracker
            .dashboard_for("alice", ReportWindow::Month(YearMonth::new(2025, 2)))
            .await
            .unwrap();
        assert_eq!(feb.summary.total_expenses, 80.0);
        // no February income, so no alerts
        assert!(feb.alerts.is_empty());

        let march = tracker
            .summary("alice", ReportWindow::Month(YearMonth::new(2025, 3)))
            .await
            .unwrap();
        assert_eq!(march.total_expenses, 700.0);

        let report = tracker.monthly_report("alice").await.unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].month, YearMonth::new(2025, 2));
        assert_eq!(report[1].income, 1000.0);

        let summaries = tracker.monthly_summaries("alice").await.unwrap();
        assert_eq!(summaries[1].1.needs_total, 600.0);

        let breakdown = tracker.category_breakdown("alice").await.unwrap();
        assert_eq!(breakdown[1].total, 180.0);
        assert_eq!(breakdown[2].total, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Live dashboard feed
// ═══════════════════════════════════════════════════════════════════

mod live {
    use super::*;

    #[tokio::test]
    async fn recomputed_on_each_new_transaction() {
        let (tracker, sink) = tracker_with_sink();
        let mut feed = tracker.watch_dashboard("alice").await.unwrap();

        let first = feed.next().await.unwrap().unwrap();
        assert_eq!(first.summary.total_income, 0.0);

        tracker
            .add_transaction("alice", TransactionDraft::income(d(2025, 3, 1), "Salary", 1000.0))
            .await
            .unwrap();
        let second = feed.next().await.unwrap().unwrap();
        assert_eq!(second.summary.total_income, 1000.0);
        assert!(second.alerts.is_empty());

        tracker
            .add_transaction(
                "alice",
                TransactionDraft::expense(d(2025, 3, 2), "Rent", 600.0, Category::Needs),
            )
            .await
            .unwrap();
        let third = feed.next().await.unwrap().unwrap();
        assert_eq!(third.summary.needs_total, 600.0);
        assert_eq!(third.alerts.len(), 1);
        assert_eq!(sink.categories(), vec![Category::Needs]);
    }

    #[tokio::test]
    async fn uses_configuration_current_at_snapshot() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        let mut feed = tracker.watch_dashboard("alice").await.unwrap();
        assert_eq!(feed.next().await.unwrap().unwrap().alerts.len(), 1);

        tracker
            .save_configuration("alice", BudgetConfiguration::new(70.0, 10.0, 20.0))
            .await
            .unwrap();
        tracker
            .add_transaction(
                "alice",
                TransactionDraft::expense(d(2025, 3, 5), "Bus fare", 5.0, Category::Needs),
            )
            .await
            .unwrap();
        assert!(feed.next().await.unwrap().unwrap().alerts.is_empty());
    }

    #[tokio::test]
    async fn window_restricted_feed() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        let mut feed = tracker
            .watch_dashboard("alice")
            .await
            .unwrap()
            .with_window(ReportWindow::Month(YearMonth::new(2025, 4)));
        let snapshot = feed.next().await.unwrap().unwrap();
        assert_eq!(snapshot.summary.total_expenses, 0.0);
    }

    #[tokio::test]
    async fn ends_once_tracker_is_dropped() {
        let (tracker, _) = tracker_with_sink();
        seed_march(&tracker, "alice").await;
        let mut feed = tracker.watch_dashboard("alice").await.unwrap();
        assert!(feed.next().await.unwrap().is_some());

        drop(tracker);
        assert!(feed.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn outlives_tracker_while_store_is_shared() {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let first = BudgetTracker::new(store.clone(), Settings::default());
        let second = BudgetTracker::new(store.clone(), Settings::default());
        let mut feed = first.watch_dashboard("alice").await.unwrap();
        assert!(feed.next().await.unwrap().is_some());

        drop(first);
        second
            .add_transaction("alice", TransactionDraft::income(d(2025, 3, 1), "Salary", 1000.0))
            .await
            .unwrap();
        let snapshot = feed.next().await.unwrap().unwrap();
        assert_eq!(snapshot.summary.total_income, 1000.0);

        drop(second);
        drop(store);
        assert!(feed.next().await.unwrap().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sealed ledger
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[tokio::test]
    async fn reopened_ledger_gives_same_dashboard() {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let tracker = BudgetTracker::new(store.clone(), Settings::default());
        seed_march(&tracker, "alice").await;
        let before = tracker.dashboard("alice").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.bgtr");
        store.save_to_file(&path, "correct horse").unwrap();

        let reopened = BudgetTracker::new(
            Arc::new(MemoryStore::load_from_file(&path, "correct horse").unwrap()),
            Settings::default(),
        );
        assert_eq!(reopened.dashboard("alice").await.unwrap(), before);
    }
}
