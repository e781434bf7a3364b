//! Headline figures computed straight from a (filtered) loan table.
//!
//! Nulls are skipped the same way the aggregations skip them: a loan that
//! is still open has no duration and does not pull the mean down.

use seperlima_data::{LoanRecord, Table, columns as col};

/// Figures on the overview page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewKpis {
    pub total_loans: usize,
    pub unique_members: usize,
    pub unique_books: usize,
    pub total_fines: f64,
}

impl OverviewKpis {
    pub fn compute(loans: &Table) -> Self {
        Self {
            total_loans: loans.len(),
            unique_members: loans.distinct(col::MEMBER_ID).len(),
            unique_books: loans.distinct(col::BOOK_ID).len(),
            total_fines: sum(loans, col::FINE_AMOUNT),
        }
    }
}

/// Figures above the loan records table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanKpis {
    pub count: usize,
    pub total_fine: f64,
    /// `None` when no loan in the table has been returned.
    pub mean_duration: Option<f64>,
}

impl LoanKpis {
    pub fn compute(loans: &Table) -> Self {
        let records: Vec<LoanRecord> = loans.iter().map(LoanRecord::from_row).collect();
        let durations: Vec<f64> = records.iter().filter_map(|r| r.duration_days).collect();
        let mean_duration = (!durations.is_empty())
            .then(|| durations.iter().sum::<f64>() / durations.len() as f64);
        Self {
            count: records.len(),
            total_fine: records.iter().map(|r| r.fine_amount).sum(),
            mean_duration,
        }
    }

    pub fn mean_duration_label(&self) -> String {
        match self.mean_duration {
            Some(days) => format!("{days:.1} days"),
            None => "-".to_string(),
        }
    }
}

fn sum(table: &Table, column: &str) -> f64 {
    table
        .column(column)
        .map(|values| values.filter_map(|v| v.as_f64()).sum())
        .unwrap_or(0.0)
}

/// Whole rupiah with thousands separators, e.g. `Rp 1,250,000`.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("Rp {sign}{grouped}")
}
