use std::collections::BTreeMap;

use crate::models::aggregate::{AggregateResult, CategoryTotal};
use crate::models::report::{MonthlyTotals, ReportWindow, YearMonth};
use crate::models::transaction::{Category, Transaction, TransactionType};

/// Reduces transaction sets into budget totals.
///
/// Pure business logic: no I/O, no state, same input → same output.
/// Amounts are summed exactly as stored. Negative amounts are a data
/// error upstream and are not clamped here.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Totals over every transaction given.
    ///
    /// - Income and expense totals partition by transaction type.
    /// - Needs/Wants totals only count expenses. Income is tagged Savings
    ///   but is never counted as a savings expense.
    /// - `savings_total` = Savings-tagged expenses + (income - expenses).
    /// - `chart_data` keeps Needs, Wants, Savings order and drops totals <= 0.
    pub fn aggregate(&self, transactions: &[Transaction]) -> AggregateResult {
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;
        let mut needs_total = 0.0;
        let mut wants_total = 0.0;
        let mut savings_expenses = 0.0;

        for t in transactions {
            match t.transaction_type {
                TransactionType::Income => total_income += t.amount,
                TransactionType::Expense => {
                    total_expenses += t.amount;
                    match t.category {
                        Category::Needs => needs_total += t.amount,
                        Category::Wants => wants_total += t.amount,
                        Category::Savings => savings_expenses += t.amount,
                    }
                }
            }
        }

        let net_savings = total_income - total_expenses;
        let savings_total = savings_expenses + net_savings;

        let chart_data = [
            (Category::Needs, needs_total),
            (Category::Wants, wants_total),
            (Category::Savings, savings_total),
        ]
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

        AggregateResult {
            total_income,
            total_expenses,
            net_savings,
            needs_total,
            wants_total,
            savings_total,
            chart_data,
        }
    }

    /// Aggregate only the transactions that fall inside `window`.
    pub fn aggregate_window(
        &self,
        transactions: &[Transaction],
        window: ReportWindow,
    ) -> AggregateResult {
        match window {
            ReportWindow::All => self.aggregate(transactions),
            ReportWindow::Month(_) => {
                let in_window: Vec<Transaction> = transactions
                    .iter()
                    .filter(|t| window.includes(t.date))
                    .cloned()
                    .collect();
                self.aggregate(&in_window)
            }
        }
    }

    /// One aggregate per calendar month that has transactions, oldest first.
    pub fn aggregate_by_month(&self, transactions: &[Transaction]) -> Vec<(YearMonth, AggregateResult)> {
        let mut by_month: BTreeMap<YearMonth, Vec<Transaction>> = BTreeMap::new();
        for t in transactions {
            by_month.entry(YearMonth::of(t.date)).or_default().push(t.clone());
        }
        by_month
            .into_iter()
            .map(|(month, txs)| (month, self.aggregate(&txs)))
            .collect()
    }

    /// Income vs. expense per calendar month, oldest first.
    pub fn monthly_report(&self, transactions: &[Transaction]) -> Vec<MonthlyTotals> {
        let mut by_month: BTreeMap<YearMonth, (f64, f64)> = BTreeMap::new();
        for t in transactions {
            let entry = by_month.entry(YearMonth::of(t.date)).or_insert((0.0, 0.0));
            match t.transaction_type {
                TransactionType::Income => entry.0 += t.amount,
                TransactionType::Expense => entry.1 += t.amount,
            }
        }
        by_month
            .into_iter()
            .map(|(month, (income, expense))| MonthlyTotals {
                month,
                income,
                expense,
            })
            .collect()
    }

    /// Expense totals for all three categories, zeros included.
    pub fn category_breakdown(&self, transactions: &[Transaction]) -> [CategoryTotal; 3] {
        let mut totals = Category::ALL.map(|category| CategoryTotal {
            category,
            total: 0.0,
        });
        for t in transactions.iter().filter(|t| t.is_expense()) {
            if let Some(slot) = totals.iter_mut().find(|c| c.category == t.category) {
                slot.total += t.amount;
            }
        }
        totals
    }

    /// Newest transactions first, at most `limit` of them.
    ///
    /// Same-day transactions are ordered by description so repeated calls
    /// list them identically.
    pub fn recent<'a>(&self, transactions: &'a [Transaction], limit: usize) -> Vec<&'a Transaction> {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.description.cmp(&b.description))
        });
        sorted.truncate(limit);
        sorted
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
