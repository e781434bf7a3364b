//! Row filters driven by page query parameters.
//!
//! Every page narrows its table the same three ways: an inclusive date (or
//! year) range, equality on categorical columns, and a case-insensitive
//! substring search on one text column. Blank parameters mean "all".

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use seperlima_data::{Row, Table, columns as col};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range. An open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Inclusive range of whole years. An open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl YearRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, year: i64) -> bool {
        self.from.is_none_or(|f| year >= f) && self.to.is_none_or(|t| year <= t)
    }
}

/// A conjunction of row predicates over named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    date: Option<(&'static str, DateRange)>,
    years: Option<(&'static str, YearRange)>,
    equals: Vec<(&'static str, String)>,
    search: Option<(&'static str, String)>,
}

impl TableFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose `column` date lies in `range`. Rows without a date
    /// are dropped once a bound is set.
    pub fn date_range(mut self, column: &'static str, range: DateRange) -> Self {
        if !range.is_unbounded() {
            self.date = Some((column, range));
        }
        self
    }

    /// Keep rows whose `column` year lies in `range`. Rows without a year
    /// are dropped once a bound is set.
    pub fn year_range(mut self, column: &'static str, range: YearRange) -> Self {
        if !range.is_unbounded() {
            self.years = Some((column, range));
        }
        self
    }

    /// Keep rows whose `column` equals `value`. Blank values are ignored.
    pub fn equals(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = non_blank(value) {
            self.equals.push((column, v.trim().to_string()));
        }
        self
    }

    /// Keep rows whose `column` contains `needle`, ignoring case.
    pub fn search(mut self, column: &'static str, needle: Option<&str>) -> Self {
        if let Some(n) = non_blank(needle) {
            self.search = Some((column, n.trim().to_lowercase()));
        }
        self
    }

    pub fn is_noop(&self) -> bool {
        self.date.is_none()
            && self.years.is_none()
            && self.equals.is_empty()
            && self.search.is_none()
    }

    pub fn matches(&self, row: Row<'_>) -> bool {
        if let Some((column, range)) = &self.date {
            match row.get(column).as_date() {
                Some(d) if range.contains(d) => {}
                _ => return false,
            }
        }
        if let Some((column, range)) = &self.years {
            match row.get(column).as_i64() {
                Some(y) if range.contains(y) => {}
                _ => return false,
            }
        }
        for (column, expected) in &self.equals {
            if row.get(column).as_str() != Some(expected.as_str()) {
                return false;
            }
        }
        if let Some((column, needle)) = &self.search {
            let Some(haystack) = row.get(column).as_str() else {
                return false;
            };
            if !haystack.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, table: &Table) -> Table {
        if self.is_noop() {
            return table.clone();
        }
        table.filter(|row| self.matches(row))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a `YYYY-MM-DD` parameter. Blank or malformed input is no bound.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let raw = non_blank(value)?.trim();
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(e) => {
            debug!(value = raw, error = %e, "ignoring malformed date parameter");
            None
        }
    }
}

/// Parse a whole-year parameter. Blank or malformed input is no bound.
pub fn parse_year(value: Option<&str>) -> Option<i64> {
    let raw = non_blank(value)?.trim();
    match raw.parse::<i64>() {
        Ok(y) => Some(y),
        Err(e) => {
            debug!(value = raw, error = %e, "ignoring malformed year parameter");
            None
        }
    }
}

/// Query parameters of the loan records page and its export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub faculty: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
}

impl LoanParams {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: parse_date(self.start.as_deref()),
            end: parse_date(self.end.as_deref()),
        }
    }

    pub fn filter(&self) -> TableFilter {
        TableFilter::new()
            .date_range(col::LOAN_DATE, self.range())
            .equals(col::FACULTY_NAME, self.faculty.as_deref())
            .equals(col::LOAN_STATUS, self.status.as_deref())
            .search(col::BOOK_TITLE, self.q.as_deref())
    }

    /// One-line description of the active filters. Open date ends fall back
    /// to `bounds`, the loan-date range of the unfiltered data.
    pub fn caption(&self, bounds: Option<(NaiveDate, NaiveDate)>) -> String {
        let range = self.range();
        let start = range.start.or(bounds.map(|(lo, _)| lo));
        let end = range.end.or(bounds.map(|(_, hi)| hi));
        let dates = match (start, end) {
            (Some(s), Some(e)) => format!("{s} to {e}"),
            (Some(s), None) => format!("from {s}"),
            (None, Some(e)) => format!("until {e}"),
            (None, None) => "all dates".to_string(),
        };
        let faculty = match non_blank(self.faculty.as_deref()) {
            Some(f) => format!("faculty {f}"),
            None => "all faculties".to_string(),
        };
        let status = match non_blank(self.status.as_deref()) {
            Some(s) => format!("status {s}"),
            None => "all statuses".to_string(),
        };
        let mut caption = format!("Showing loans {dates}, {faculty}, {status}");
        if let Some(q) = non_blank(self.q.as_deref()) {
            caption.push_str(&format!(", titles containing \"{}\"", q.trim()));
        }
        caption.push('.');
        caption
    }

    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        pairs([
            ("start", &self.start),
            ("end", &self.end),
            ("faculty", &self.faculty),
            ("status", &self.status),
            ("q", &self.q),
        ])
    }
}

/// Query parameters of the member records page and its export.
///
/// The member roster carries no date column, so there is no range here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberParams {
    pub status: Option<String>,
    pub faculty: Option<String>,
    pub q: Option<String>,
}

impl MemberParams {
    pub fn filter(&self) -> TableFilter {
        TableFilter::new()
            .equals(col::MEMBER_STATUS, self.status.as_deref())
            .equals(col::FACULTY_NAME, self.faculty.as_deref())
            .search(col::MEMBER_NAME, self.q.as_deref())
    }

    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        pairs([
            ("status", &self.status),
            ("faculty", &self.faculty),
            ("q", &self.q),
        ])
    }
}

/// Query parameters of the book records page and its export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookParams {
    pub from_year: Option<String>,
    pub to_year: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl BookParams {
    pub fn years(&self) -> YearRange {
        YearRange {
            from: parse_year(self.from_year.as_deref()),
            to: parse_year(self.to_year.as_deref()),
        }
    }

    pub fn filter(&self) -> TableFilter {
        TableFilter::new()
            .year_range(col::PUBLICATION_YEAR, self.years())
            .equals(col::CATEGORY, self.category.as_deref())
            .search(col::TITLE, self.q.as_deref())
    }

    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        pairs([
            ("from_year", &self.from_year),
            ("to_year", &self.to_year),
            ("category", &self.category),
            ("q", &self.q),
        ])
    }
}

/// Non-blank parameters, for carrying the current filter into links and forms.
fn pairs<'a, const N: usize>(
    params: [(&'static str, &'a Option<String>); N],
) -> Vec<(&'static str, &'a str)> {
    params
        .into_iter()
        .filter_map(|(name, value)| non_blank(value.as_deref()).map(|v| (name, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use seperlima_data::{LoanRecord, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(
        id: &str,
        day: Option<NaiveDate>,
        faculty: &str,
        status: &str,
        title: &str,
    ) -> LoanRecord {
        LoanRecord {
            loan_id: id.into(),
            member_id: "M1".into(),
            book_id: "B1".into(),
            loan_date: day,
            return_date: None,
            duration_days: None,
            fine_amount: 0.0,
            loan_status: status.into(),
            faculty_name: Some(faculty.into()),
            book_category: None,
            book_title: Some(title.into()),
        }
    }

    fn loans() -> Table {
        LoanRecord::table([
            loan("1", Some(date(2024, 1, 10)), "FST", "returned", "Rust in Action"),
            loan("2", Some(date(2024, 2, 1)), "FST", "borrowed", "The Rust Book"),
            loan("3", Some(date(2024, 3, 5)), "FPB", "returned", "Soil Science"),
            loan("4", None, "FPB", "returned", "Rusty Gates"),
        ])
    }

    fn ids(table: &Table) -> Vec<String> {
        table.iter().map(|r| r.get(col::LOAN_ID).to_string()).collect()
    }

    #[test]
    fn test_blank_params_keep_everything() {
        let params = LoanParams {
            start: Some(String::new()),
            faculty: Some("  ".into()),
            ..Default::default()
        };
        assert!(params.filter().is_noop());
        assert_eq!(params.filter().apply(&loans()).len(), 4);
    }

    #[test]
    fn test_date_range_is_inclusive_and_drops_undated() {
        let params = LoanParams {
            start: Some("2024-01-10".into()),
            end: Some("2024-02-01".into()),
            ..Default::default()
        };
        assert_eq!(ids(&params.filter().apply(&loans())), vec!["1", "2"]);

        let open_end = LoanParams {
            start: Some("2024-02-01".into()),
            ..Default::default()
        };
        assert_eq!(ids(&open_end.filter().apply(&loans())), vec!["2", "3"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let params = LoanParams {
            q: Some(" RUST ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&params.filter().apply(&loans())), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_equality_filters_combine() {
        let params = LoanParams {
            faculty: Some("FPB".into()),
            status: Some("returned".into()),
            q: Some("soil".into()),
            ..Default::default()
        };
        assert_eq!(ids(&params.filter().apply(&loans())), vec!["3"]);
    }

    #[test]
    fn test_no_match_gives_empty_table_with_columns() {
        let params = LoanParams {
            status: Some("lost".into()),
            ..Default::default()
        };
        let filtered = params.filter().apply(&loans());
        assert!(filtered.is_empty());
        assert_eq!(filtered.columns(), loans().columns());
    }

    #[test]
    fn test_malformed_date_is_ignored() {
        assert_eq!(parse_date(Some("2024-13-01")), None);
        assert_eq!(parse_date(Some("yesterday")), None);
        assert_eq!(parse_date(Some(" 2024-02-29 ")), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_null_text_never_matches_search() {
        let table = Table::new(
            vec![col::TITLE.into()],
            vec![vec![Value::Null], vec!["Atlas".into()]],
        );
        let books = BookParams {
            q: Some("a".into()),
            ..Default::default()
        };
        assert_eq!(books.filter().apply(&table).len(), 1);
    }

    #[test]
    fn test_caption_uses_data_bounds_for_open_ends() {
        let params = LoanParams {
            end: Some("2024-02-01".into()),
            status: Some("returned".into()),
            ..Default::default()
        };
        let caption = params.caption(Some((date(2024, 1, 10), date(2024, 3, 5))));
        assert_eq!(
            caption,
            "Showing loans 2024-01-10 to 2024-02-01, all faculties, status returned."
        );
        assert_eq!(
            LoanParams::default().caption(None),
            "Showing loans all dates, all faculties, all statuses."
        );
    }

    #[test]
    fn test_year_range_keeps_books_in_bounds() {
        let table = Table::new(
            vec![col::TITLE.into(), col::PUBLICATION_YEAR.into()],
            vec![
                vec!["Atlas".into(), Value::Int(1998)],
                vec!["Botany".into(), Value::Int(2010)],
                vec!["Chemistry".into(), Value::Int(2021)],
                vec!["Undated".into(), Value::Null],
            ],
        );
        let titles = |params: &BookParams| -> Vec<String> {
            params
                .filter()
                .apply(&table)
                .iter()
                .map(|r| r.get(col::TITLE).to_string())
                .collect()
        };

        let both = BookParams {
            from_year: Some("2000".into()),
            to_year: Some("2021".into()),
            ..Default::default()
        };
        assert_eq!(titles(&both), vec!["Botany", "Chemistry"]);

        let upper = BookParams {
            to_year: Some("2010".into()),
            ..Default::default()
        };
        assert_eq!(titles(&upper), vec!["Atlas", "Botany"]);

        let malformed = BookParams {
            from_year: Some("twenty".into()),
            ..Default::default()
        };
        assert!(malformed.filter().is_noop());
        assert_eq!(titles(&malformed).len(), 4);
    }

    #[test]
    fn test_book_pairs_carry_year_bounds() {
        let params = BookParams {
            from_year: Some("2000".into()),
            to_year: Some(" ".into()),
            category: Some("Science".into()),
            q: None,
        };
        assert_eq!(
            params.pairs(),
            vec![("from_year", "2000"), ("category", "Science")]
        );
    }

    #[test]
    fn test_pairs_skip_blank_params() {
        let params = MemberParams {
            status: Some("student".into()),
            faculty: Some(String::new()),
            q: None,
        };
        assert_eq!(params.pairs(), vec![("status", "student")]);
    }
}
