//! Typed views over the rows of the three fixed queries.

use chrono::NaiveDate;
use serde::Serialize;

use crate::query::columns as col;
use crate::table::{Row, Table, Value};

/// One loan transaction from the loan-detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRecord {
    pub loan_id: String,
    pub member_id: String,
    pub book_id: String,
    pub loan_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    /// Absent while the loan is still open.
    pub duration_days: Option<f64>,
    pub fine_amount: f64,
    pub loan_status: String,
    pub faculty_name: Option<String>,
    pub book_category: Option<String>,
    pub book_title: Option<String>,
}

/// A library member with program and faculty joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub member_id: String,
    pub national_id: Option<String>,
    pub member_status: String,
    pub member_name: String,
    pub email: Option<String>,
    pub program_name: Option<String>,
    pub program_level: Option<String>,
    /// Null when the program or faculty join misses.
    pub faculty_name: Option<String>,
}

/// A catalogued book with title and category joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    pub book_id: String,
    pub title: String,
    pub category: String,
    pub publication_year: Option<i64>,
    pub isbn: Option<String>,
}

fn text(v: &Value) -> Option<String> {
    if v.is_null() {
        None
    } else {
        Some(v.to_string())
    }
}

fn owned(v: Option<&str>) -> Value {
    v.map_or(Value::Null, Value::from)
}

impl LoanRecord {
    pub const COLUMNS: [&'static str; 11] = [
        col::LOAN_ID,
        col::MEMBER_ID,
        col::BOOK_ID,
        col::LOAN_DATE,
        col::RETURN_DATE,
        col::DURATION_DAYS,
        col::FINE_AMOUNT,
        col::LOAN_STATUS,
        col::FACULTY_NAME,
        col::BOOK_CATEGORY,
        col::BOOK_TITLE,
    ];

    /// Read a loan from a row. Missing columns read as absent.
    pub fn from_row(row: Row<'_>) -> Self {
        Self {
            loan_id: row.get(col::LOAN_ID).to_string(),
            member_id: row.get(col::MEMBER_ID).to_string(),
            book_id: row.get(col::BOOK_ID).to_string(),
            loan_date: row.get(col::LOAN_DATE).as_date(),
            return_date: row.get(col::RETURN_DATE).as_date(),
            duration_days: row.get(col::DURATION_DAYS).as_f64(),
            fine_amount: row.get(col::FINE_AMOUNT).as_f64().unwrap_or(0.0),
            loan_status: row.get(col::LOAN_STATUS).to_string(),
            faculty_name: text(row.get(col::FACULTY_NAME)),
            book_category: text(row.get(col::BOOK_CATEGORY)),
            book_title: text(row.get(col::BOOK_TITLE)),
        }
    }

    pub fn into_row(self) -> Vec<Value> {
        vec![
            self.loan_id.into(),
            self.member_id.into(),
            self.book_id.into(),
            self.loan_date.into(),
            self.return_date.into(),
            self.duration_days.into(),
            Value::Float(self.fine_amount),
            self.loan_status.into(),
            owned(self.faculty_name.as_deref()),
            owned(self.book_category.as_deref()),
            owned(self.book_title.as_deref()),
        ]
    }

    /// Loan-detail shaped table holding `records`.
    pub fn table(records: impl IntoIterator<Item = Self>) -> Table {
        Table::new(
            Self::COLUMNS.iter().map(|c| c.to_string()).collect(),
            records.into_iter().map(Self::into_row).collect(),
        )
    }
}

impl MemberRecord {
    pub const COLUMNS: [&'static str; 8] = [
        col::MEMBER_ID,
        col::NATIONAL_ID,
        col::MEMBER_STATUS,
        col::MEMBER_NAME,
        col::EMAIL,
        col::PROGRAM_NAME,
        col::PROGRAM_LEVEL,
        col::FACULTY_NAME,
    ];

    pub fn from_row(row: Row<'_>) -> Self {
        Self {
            member_id: row.get(col::MEMBER_ID).to_string(),
            national_id: text(row.get(col::NATIONAL_ID)),
            member_status: row.get(col::MEMBER_STATUS).to_string(),
            member_name: row.get(col::MEMBER_NAME).to_string(),
            email: text(row.get(col::EMAIL)),
            program_name: text(row.get(col::PROGRAM_NAME)),
            program_level: text(row.get(col::PROGRAM_LEVEL)),
            faculty_name: text(row.get(col::FACULTY_NAME)),
        }
    }

    pub fn into_row(self) -> Vec<Value> {
        vec![
            self.member_id.into(),
            owned(self.national_id.as_deref()),
            self.member_status.into(),
            self.member_name.into(),
            owned(self.email.as_deref()),
            owned(self.program_name.as_deref()),
            owned(self.program_level.as_deref()),
            owned(self.faculty_name.as_deref()),
        ]
    }

    pub fn table(records: impl IntoIterator<Item = Self>) -> Table {
        Table::new(
            Self::COLUMNS.iter().map(|c| c.to_string()).collect(),
            records.into_iter().map(Self::into_row).collect(),
        )
    }
}

impl BookRecord {
    pub const COLUMNS: [&'static str; 5] = [
        col::BOOK_ID,
        col::TITLE,
        col::CATEGORY,
        col::PUBLICATION_YEAR,
        col::ISBN,
    ];

    pub fn from_row(row: Row<'_>) -> Self {
        Self {
            book_id: row.get(col::BOOK_ID).to_string(),
            title: row.get(col::TITLE).to_string(),
            category: row.get(col::CATEGORY).to_string(),
            publication_year: row.get(col::PUBLICATION_YEAR).as_i64(),
            isbn: text(row.get(col::ISBN)),
        }
    }

    pub fn into_row(self) -> Vec<Value> {
        vec![
            self.book_id.into(),
            self.title.into(),
            self.category.into(),
            self.publication_year.into(),
            owned(self.isbn.as_deref()),
        ]
    }

    pub fn table(records: impl IntoIterator<Item = Self>) -> Table {
        Table::new(
            Self::COLUMNS.iter().map(|c| c.to_string()).collect(),
            records.into_iter().map(Self::into_row).collect(),
        )
    }
}
