//! The three fixed read queries and the column names they produce.

use std::fmt;

/// Column names produced by the fixed queries.
pub mod columns {
    pub const LOAN_ID: &str = "loan_id";
    pub const MEMBER_ID: &str = "member_id";
    pub const BOOK_ID: &str = "book_id";
    pub const LOAN_DATE: &str = "loan_date";
    pub const RETURN_DATE: &str = "return_date";
    pub const DURATION_DAYS: &str = "duration_days";
    pub const FINE_AMOUNT: &str = "fine_amount";
    pub const LOAN_STATUS: &str = "loan_status";
    pub const FACULTY_NAME: &str = "faculty_name";
    pub const BOOK_CATEGORY: &str = "book_category";
    pub const BOOK_TITLE: &str = "book_title";

    pub const NATIONAL_ID: &str = "national_id";
    pub const MEMBER_STATUS: &str = "member_status";
    pub const MEMBER_NAME: &str = "member_name";
    pub const EMAIL: &str = "email";
    pub const PROGRAM_NAME: &str = "program_name";
    pub const PROGRAM_LEVEL: &str = "program_level";

    pub const TITLE: &str = "title";
    pub const CATEGORY: &str = "category";
    pub const PUBLICATION_YEAR: &str = "publication_year";
    pub const ISBN: &str = "isbn";
}

/// Identity of a fixed query; also its cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryName {
    LoanDetail,
    Members,
    Books,
}

impl QueryName {
    pub const ALL: [QueryName; 3] = [QueryName::LoanDetail, QueryName::Members, QueryName::Books];

    /// Stable cache key.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryName::LoanDetail => "loan_detail",
            QueryName::Members => "members",
            QueryName::Books => "books",
        }
    }

    /// SQL text executed for this query. Parameterless by construction.
    pub fn sql(self) -> &'static str {
        match self {
            QueryName::LoanDetail => LOAN_DETAIL_SQL,
            QueryName::Members => MEMBERS_SQL,
            QueryName::Books => BOOKS_SQL,
        }
    }

    /// Columns parsed to dates after loading.
    pub fn date_columns(self) -> &'static [&'static str] {
        match self {
            QueryName::LoanDetail => &[columns::LOAN_DATE, columns::RETURN_DATE],
            QueryName::Members | QueryName::Books => &[],
        }
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const LOAN_DETAIL_SQL: &str = "SELECT * FROM loan_detail ORDER BY loan_id";

const MEMBERS_SQL: &str = "
    SELECT
        m.member_id,
        m.national_id,
        m.status AS member_status,
        m.member_name,
        m.email,
        p.program_name,
        p.program_level,
        f.faculty_name
    FROM members m
    LEFT JOIN programs p ON m.program_id = p.program_id
    LEFT JOIN faculties f ON p.faculty_id = f.faculty_id
    ORDER BY m.member_id
";

const BOOKS_SQL: &str = "
    SELECT
        b.book_id,
        t.title,
        c.category,
        b.publication_year,
        b.isbn
    FROM books b
    JOIN titles t ON b.title_code = t.title_code
    JOIN categories c ON b.category_code = c.category_code
    ORDER BY b.book_id
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys_are_distinct() {
        let keys: Vec<_> = QueryName::ALL.iter().map(|q| q.as_str()).collect();
        assert_eq!(keys, vec!["loan_detail", "members", "books"]);
    }

    #[test]
    fn test_only_loan_detail_has_date_columns() {
        assert_eq!(QueryName::LoanDetail.date_columns().len(), 2);
        assert!(QueryName::Members.date_columns().is_empty());
        assert!(QueryName::Books.date_columns().is_empty());
    }
}
