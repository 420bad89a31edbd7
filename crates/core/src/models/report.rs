use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::AggregateResult;
use super::alert::BudgetAlert;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Which transactions a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportWindow {
    /// Every transaction the owner has
    #[default]
    All,
    /// Only transactions dated within one calendar month
    Month(YearMonth),
}

impl ReportWindow {
    pub fn includes(&self, date: NaiveDate) -> bool {
        match self {
            ReportWindow::All => true,
            ReportWindow::Month(month) => month.contains(date),
        }
    }
}

/// Income vs. expense for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub month: YearMonth,
    pub income: f64,
    pub expense: f64,
}

/// What the dashboard shows for one snapshot of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: AggregateResult,
    pub alerts: Vec<BudgetAlert>,
}
