pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::{Arc, Weak};
use tracing::debug;

use errors::CoreError;
use models::{
    aggregate::{AggregateResult, CategoryTotal},
    alert::BudgetAlert,
    configuration::BudgetConfiguration,
    report::{Dashboard, MonthlyTotals, ReportWindow, YearMonth},
    settings::Settings,
    suggestion::{CategorySuggestion, SuggestionOutcome},
    transaction::{Transaction, TransactionDraft},
};
use services::{
    aggregation_service::Aggregator,
    alert_sink::{AlertSink, TracingAlertSink},
    category_resolver::CategoryResolver,
    configuration_service::ConfigurationService,
    draft_categorizer::DraftCategorizer,
    suggestion_service::SuggestionService,
    threshold_service::ThresholdEvaluator,
};
use storage::memory::MemoryStore;
use storage::traits::{BudgetStore, TransactionFeed};

/// Main entry point for the budget-rule core library.
///
/// Wires the persistence collaborator, the suggestion providers and the
/// alert sink to the categorization, aggregation and threshold logic.
#[must_use]
pub struct BudgetTracker {
    store: Arc<dyn BudgetStore>,
    settings: Settings,
    resolver: CategoryResolver,
    aggregator: Aggregator,
    evaluator: ThresholdEvaluator,
    configuration_service: ConfigurationService,
    suggestion_service: SuggestionService,
    alert_sink: Arc<dyn AlertSink>,
}

impl std::fmt::Debug for BudgetTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetTracker")
            .field("settings", &self.settings)
            .field("suggesters", &self.suggestion_service.provider_names())
            .finish()
    }
}

impl BudgetTracker {
    /// Tracker over an arbitrary store.
    pub fn new(store: Arc<dyn BudgetStore>, settings: Settings) -> Self {
        let suggestion_service = SuggestionService::from_settings(&settings.suggestion);
        Self {
            store,
            settings,
            resolver: CategoryResolver::new(),
            aggregator: Aggregator::new(),
            evaluator: ThresholdEvaluator::new(),
            configuration_service: ConfigurationService::new(),
            suggestion_service,
            alert_sink: Arc::new(TracingAlertSink),
        }
    }

    /// Tracker over a fresh in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Settings::default())
    }

    /// Replace the alert sink (default: [`TracingAlertSink`]).
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = sink;
        self
    }

    /// Replace the suggestion providers built from settings.
    pub fn with_suggestion_service(mut self, service: SuggestionService) -> Self {
        self.suggestion_service = service;
        self
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Resolve the draft's category and store it. One write on success,
    /// none on validation failure.
    pub async fn add_transaction(
        &self,
        owner_id: &str,
        draft: TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        self.resolver
            .submit(self.store.as_ref(), owner_id, draft)
            .await
    }

    /// Submit an edited draft and clear it once stored. On failure the
    /// draft is left as it was so the user can retry.
    pub async fn submit_draft(
        &self,
        owner_id: &str,
        draft: &mut DraftCategorizer,
    ) -> Result<Transaction, CoreError> {
        let stored = self.add_transaction(owner_id, draft.to_draft()).await?;
        draft.reset();
        Ok(stored)
    }

    /// All of the owner's transactions, in store order.
    pub async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>, CoreError> {
        self.store
            .list_transactions(owner_id)
            .await
            .map_err(CoreError::into_persistence)
    }

    /// Newest transactions first, up to `settings.recent_limit`.
    pub async fn recent_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>, CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        Ok(self
            .aggregator
            .recent(&transactions, self.settings.recent_limit)
            .into_iter()
            .cloned()
            .collect())
    }

    // ── Suggestions ─────────────────────────────────────────────────

    /// Ask the configured providers for a category.
    pub async fn suggest_category(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        self.suggestion_service.suggest(description, amount).await
    }

    /// Request a suggestion for the draft's current inputs and apply it.
    ///
    /// Holding `&mut` across the request means the draft cannot change
    /// meanwhile; callers that keep editing while waiting should use
    /// [`DraftCategorizer::begin_suggestion`], [`suggest_category`](Self::suggest_category)
    /// and [`DraftCategorizer::apply_suggestion`] directly.
    pub async fn refresh_suggestion(
        &self,
        draft: &mut DraftCategorizer,
    ) -> Result<SuggestionOutcome, CoreError> {
        let ticket = draft.begin_suggestion()?;
        let result = self
            .suggestion_service
            .suggest(&ticket.description, ticket.amount)
            .await;
        Ok(draft.apply_suggestion(&ticket, result))
    }

    // ── Aggregation & Alerts ────────────────────────────────────────

    /// Totals for the owner's transactions inside `window`.
    pub async fn summary(
        &self,
        owner_id: &str,
        window: ReportWindow,
    ) -> Result<AggregateResult, CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        Ok(self.aggregator.aggregate_window(&transactions, window))
    }

    /// Summary and alerts over all transactions. Alerts also go to the sink.
    pub async fn dashboard(&self, owner_id: &str) -> Result<Dashboard, CoreError> {
        self.dashboard_for(owner_id, ReportWindow::All).await
    }

    /// Summary and alerts for one window. Alerts also go to the sink.
    pub async fn dashboard_for(
        &self,
        owner_id: &str,
        window: ReportWindow,
    ) -> Result<Dashboard, CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        let configuration = self.get_configuration(owner_id).await?;
        let dashboard = build_dashboard(
            &self.aggregator,
            &self.evaluator,
            &transactions,
            window,
            &configuration,
        );
        emit_all(self.alert_sink.as_ref(), &dashboard.alerts);
        Ok(dashboard)
    }

    /// Live dashboard: re-aggregated on every transaction snapshot.
    pub async fn watch_dashboard(&self, owner_id: &str) -> Result<DashboardFeed, CoreError> {
        let feed = self
            .store
            .subscribe_transactions(owner_id)
            .await
            .map_err(CoreError::into_persistence)?;
        Ok(DashboardFeed {
            feed,
            store: Arc::downgrade(&self.store),
            alert_sink: Arc::clone(&self.alert_sink),
            owner_id: owner_id.to_string(),
            window: ReportWindow::All,
        })
    }

    /// Income vs. expense per month, oldest first.
    pub async fn monthly_report(&self, owner_id: &str) -> Result<Vec<MonthlyTotals>, CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        Ok(self.aggregator.monthly_report(&transactions))
    }

    /// Full aggregate per month, oldest first.
    pub async fn monthly_summaries(
        &self,
        owner_id: &str,
    ) -> Result<Vec<(YearMonth, AggregateResult)>, CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        Ok(self.aggregator.aggregate_by_month(&transactions))
    }

    /// Expense totals for Needs, Wants and Savings, zeros included.
    pub async fn category_breakdown(&self, owner_id: &str) -> Result<[CategoryTotal; 3], CoreError> {
        let transactions = self.list_transactions(owner_id).await?;
        Ok(self.aggregator.category_breakdown(&transactions))
    }

    // ── Budget configuration ────────────────────────────────────────

    /// The owner's targets; 50/30/20 if never saved.
    pub async fn get_configuration(&self, owner_id: &str) -> Result<BudgetConfiguration, CoreError> {
        self.configuration_service
            .get(self.store.as_ref(), owner_id)
            .await
    }

    /// Validate and store new targets. On rejection the stored targets
    /// are untouched.
    pub async fn save_configuration(
        &self,
        owner_id: &str,
        candidate: BudgetConfiguration,
    ) -> Result<BudgetConfiguration, CoreError> {
        self.configuration_service
            .save(self.store.as_ref(), owner_id, candidate)
            .await
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Names of the registered suggestion providers, in priority order.
    #[must_use]
    pub fn suggestion_providers(&self) -> Vec<String> {
        self.suggestion_service.provider_names()
    }

    /// Set the LLM API key and rebuild the providers so it takes effect now.
    pub fn set_suggestion_api_key(&mut self, key: String) {
        self.settings.suggestion.api_key = Some(key);
        self.rebuild_suggesters();
    }

    /// Remove the LLM API key. Returns whether one was set.
    pub fn remove_suggestion_api_key(&mut self) -> bool {
        let removed = self.settings.suggestion.api_key.take().is_some();
        if removed {
            self.rebuild_suggesters();
        }
        removed
    }

    fn rebuild_suggesters(&mut self) {
        self.suggestion_service = SuggestionService::from_settings(&self.settings.suggestion);
        debug!(providers = ?self.suggestion_service.provider_names(), "suggestion providers rebuilt");
    }
}

/// Dashboard snapshots that follow the owner's transactions.
///
/// Each snapshot is aggregated from scratch and evaluated against the
/// configuration current at that moment. The feed does not keep the
/// store alive; it ends once the tracker and every other owner of the
/// store are gone.
pub struct DashboardFeed {
    feed: TransactionFeed,
    store: Weak<dyn BudgetStore>,
    alert_sink: Arc<dyn AlertSink>,
    owner_id: String,
    window: ReportWindow,
}

impl DashboardFeed {
    /// Restrict every snapshot to one window.
    pub fn with_window(mut self, window: ReportWindow) -> Self {
        self.window = window;
        self
    }

    /// Wait for the next snapshot. `Ok(None)` once the store has been dropped.
    pub async fn next(&mut self) -> Result<Option<Dashboard>, CoreError> {
        let Some(transactions) = self.feed.next().await else {
            return Ok(None);
        };
        let Some(store) = self.store.upgrade() else {
            return Ok(None);
        };

        let configuration = store
            .get_configuration(&self.owner_id)
            .await
            .map_err(CoreError::into_persistence)?
            .unwrap_or_default();

        let dashboard = build_dashboard(
            &Aggregator::new(),
            &ThresholdEvaluator::new(),
            &transactions,
            self.window,
            &configuration,
        );
        emit_all(self.alert_sink.as_ref(), &dashboard.alerts);
        Ok(Some(dashboard))
    }
}

fn build_dashboard(
    aggregator: &Aggregator,
    evaluator: &ThresholdEvaluator,
    transactions: &[Transaction],
    window: ReportWindow,
    configuration: &BudgetConfiguration,
) -> Dashboard {
    let summary = aggregator.aggregate_window(transactions, window);
    let alerts = evaluator.evaluate(&summary, configuration);
    debug!(
        transactions = transactions.len(),
        alerts = alerts.len(),
        "dashboard computed"
    );
    Dashboard { summary, alerts }
}

fn emit_all(sink: &dyn AlertSink, alerts: &[BudgetAlert]) {
    for alert in alerts {
        sink.emit(alert);
    }
}
