//! Property-based tests for the aggregation engine.

use chrono::NaiveDate;
use proptest::prelude::*;

use seperlima_charts::loans::{self, DURATION_BUCKET, MEAN_DURATION, TOP_TITLES};
use seperlima_charts::{COUNT, ChartOutput, DurationBucket, books, members};
use seperlima_data::{BookRecord, LoanRecord, MemberRecord, Table, Value, columns as col};

type Aggregation = fn(&Table) -> ChartOutput;

const ALL: [(&str, Aggregation); 15] = [
    ("monthly_trend_by_status", loans::monthly_trend_by_status),
    ("loans_per_faculty", loans::loans_per_faculty),
    ("loans_per_category", loans::loans_per_category),
    ("faculty_category_matrix", loans::faculty_category_matrix),
    ("mean_duration_per_faculty", loans::mean_duration_per_faculty),
    ("duration_histogram", loans::duration_histogram),
    ("duration_vs_fine", loans::duration_vs_fine),
    ("loans_per_status", loans::loans_per_status),
    ("top_titles", loans::top_titles),
    ("duration_buckets_per_status", loans::duration_buckets_per_status),
    ("members_per_status", members::members_per_status),
    ("members_per_faculty", members::members_per_faculty),
    ("books_per_category", books::books_per_category),
    ("books_per_year", books::books_per_year),
    ("books_per_physical_status", books::books_per_physical_status),
];

#[derive(Debug, Clone, Copy)]
enum Source {
    Loans,
    Members,
    Books,
}

/// Columns each aggregation cannot do without, and the table it reads.
const REQUIRED: [(&str, Aggregation, Source, &[&str]); 15] = [
    ("monthly_trend_by_status", loans::monthly_trend_by_status, Source::Loans, &[col::LOAN_DATE, col::LOAN_STATUS]),
    ("loans_per_faculty", loans::loans_per_faculty, Source::Loans, &[col::FACULTY_NAME]),
    ("loans_per_category", loans::loans_per_category, Source::Loans, &[col::BOOK_CATEGORY]),
    ("faculty_category_matrix", loans::faculty_category_matrix, Source::Loans, &[col::FACULTY_NAME, col::BOOK_CATEGORY]),
    ("mean_duration_per_faculty", loans::mean_duration_per_faculty, Source::Loans, &[col::FACULTY_NAME, col::DURATION_DAYS]),
    ("duration_histogram", loans::duration_histogram, Source::Loans, &[col::DURATION_DAYS]),
    ("duration_vs_fine", loans::duration_vs_fine, Source::Loans, &[col::DURATION_DAYS, col::FINE_AMOUNT, col::LOAN_STATUS]),
    ("loans_per_status", loans::loans_per_status, Source::Loans, &[col::LOAN_STATUS]),
    ("top_titles", loans::top_titles, Source::Loans, &[col::BOOK_TITLE]),
    ("duration_buckets_per_status", loans::duration_buckets_per_status, Source::Loans, &[col::LOAN_STATUS, col::DURATION_DAYS]),
    ("members_per_status", members::members_per_status, Source::Members, &[col::MEMBER_STATUS]),
    ("members_per_faculty", members::members_per_faculty, Source::Members, &[col::FACULTY_NAME]),
    ("books_per_category", books::books_per_category, Source::Books, &[col::CATEGORY]),
    ("books_per_year", books::books_per_year, Source::Books, &[col::PUBLICATION_YEAR]),
    ("books_per_physical_status", books::books_per_physical_status, Source::Books, &[books::PHYSICAL_STATUS]),
];

/// Copy of `table` with `column` removed.
fn without(table: &Table, column: &str) -> Table {
    let keep: Vec<usize> = (0..table.columns().len())
        .filter(|&i| table.columns()[i] != column)
        .collect();
    Table::new(
        keep.iter().map(|&i| table.columns()[i].clone()).collect(),
        table
            .rows()
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect(),
    )
}

/// The stock catalog has no physical status; give it one so it can be taken away.
fn with_physical_status(table: Table) -> Table {
    let mut columns = table.columns().to_vec();
    columns.push(books::PHYSICAL_STATUS.to_string());
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.push("good".into());
            row
        })
        .collect();
    Table::new(columns, rows)
}

fn status() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("borrowed".to_string()),
        Just("returned".to_string()),
        Just("overdue".to_string()),
    ]
}

fn faculty() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        Just("Fakultas Sains dan Teknologi Informasi".to_string()),
        Just("Fakultas Pembangunan Berkelanjutan".to_string()),
        Just("Faculty of Medicine".to_string()),
    ])
}

fn loan() -> impl Strategy<Value = LoanRecord> {
    (
        0u32..400,
        status(),
        proptest::option::of(0.0..60.0f64),
        0.0..50_000.0f64,
        faculty(),
        "[A-D]",
        "T[0-9]",
    )
        .prop_map(|(day, status, duration, fine, faculty, category, title)| LoanRecord {
            loan_id: String::new(),
            member_id: "M".into(),
            book_id: "B".into(),
            loan_date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .and_then(|d| d.checked_add_days(chrono::Days::new(day as u64))),
            return_date: None,
            duration_days: duration,
            fine_amount: fine,
            loan_status: status,
            faculty_name: faculty,
            book_category: Some(category),
            book_title: Some(title),
        })
}

fn loan_records() -> impl Strategy<Value = Vec<LoanRecord>> {
    prop::collection::vec(loan(), 0..60).prop_map(|mut v| {
        for (i, l) in v.iter_mut().enumerate() {
            l.loan_id = format!("L{i}");
        }
        v
    })
}

fn member() -> impl Strategy<Value = MemberRecord> {
    (
        "M[0-9]{3}",
        prop_oneof![
            Just("student".to_string()),
            Just("lecturer".to_string()),
            Just("staff".to_string()),
        ],
        "[A-Z][a-z]{2,8}",
        faculty(),
    )
        .prop_map(|(id, status, name, faculty)| MemberRecord {
            member_id: id,
            national_id: None,
            member_status: status,
            member_name: name,
            email: None,
            program_name: None,
            program_level: None,
            faculty_name: faculty,
        })
}

fn book() -> impl Strategy<Value = BookRecord> {
    ("B[0-9]{3}", "T[0-9]", "[A-D]", proptest::option::of(1950i64..2025))
        .prop_map(|(id, title, category, year)| BookRecord {
            book_id: id,
            title,
            category,
            publication_year: year,
            isbn: None,
        })
}

fn total_count(out: &ChartOutput) -> i64 {
    out.summary.iter().filter_map(|r| r.get(COUNT).as_i64()).sum()
}

proptest! {
    #[test]
    fn missing_columns_always_give_empty_state(
        extra in prop::collection::vec("[a-z]{1,6}_x", 0..4),
        rows in 0usize..5,
    ) {
        // Column names ending in `_x` never collide with a real column.
        let columns: Vec<String> = extra;
        let width = columns.len();
        let table = Table::new(
            columns,
            (0..rows).map(|i| vec![Value::Int(i as i64); width]).collect(),
        );
        for (name, aggregate) in ALL {
            let out = aggregate(&table);
            prop_assert!(out.is_empty(), "{} did not degrade", name);
            prop_assert!(out.summary.is_empty(), "{} returned rows", name);
        }
    }

    #[test]
    fn dropping_one_required_column_gives_empty_state(
        loan_rows in prop::collection::vec(loan(), 1..30),
        member_rows in prop::collection::vec(member(), 1..30),
        book_rows in prop::collection::vec(book(), 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let loan_table = LoanRecord::table(loan_rows);
        let member_table = MemberRecord::table(member_rows);
        let book_table = with_physical_status(BookRecord::table(book_rows));

        for (name, aggregate, source, required) in REQUIRED {
            let full = match source {
                Source::Loans => &loan_table,
                Source::Members => &member_table,
                Source::Books => &book_table,
            };
            let dropped = required[pick.index(required.len())];
            let out = aggregate(&without(full, dropped));
            prop_assert!(out.is_empty(), "{} without {} did not degrade", name, dropped);
            prop_assert!(out.summary.is_empty(), "{} without {} returned rows", name, dropped);
        }
    }

    #[test]
    fn buckets_partition_every_duration(days in 0.0..10_000.0f64) {
        let bucket = DurationBucket::of(days);
        let ranges = [
            (f64::NEG_INFINITY, 7.0),
            (7.0, 14.0),
            (14.0, 21.0),
            (21.0, f64::INFINITY),
        ];
        let hits: Vec<DurationBucket> = DurationBucket::ALL
            .iter()
            .zip(ranges)
            .filter(|(_, (lo, hi))| days > *lo && days <= *hi)
            .map(|(b, _)| *b)
            .collect();
        prop_assert_eq!(hits, vec![bucket]);
    }

    #[test]
    fn open_loans_never_contribute_to_duration_views(records in loan_records()) {
        let returned = records.iter().filter(|l| l.duration_days.is_some()).count() as i64;
        let table = LoanRecord::table(records.clone());

        let buckets = loans::duration_buckets_per_status(&table);
        prop_assert_eq!(total_count(&buckets), returned);

        let histogram = loans::duration_histogram(&table);
        prop_assert_eq!(total_count(&histogram), returned);

        let scatter = loans::duration_vs_fine(&table);
        prop_assert_eq!(scatter.summary.len() as i64, returned);

        let mean = loans::mean_duration_per_faculty(&table);
        for row in mean.summary.iter() {
            let faculty = row.get(col::FACULTY_NAME).to_string();
            let durations: Vec<f64> = records
                .iter()
                .filter(|l| l.faculty_name.as_deref() == Some(faculty.as_str()))
                .filter_map(|l| l.duration_days)
                .collect();
            let expected = durations.iter().sum::<f64>() / durations.len() as f64;
            let got = row.get(MEAN_DURATION).as_f64().unwrap_or(f64::NAN);
            prop_assert!((got - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn bucket_labels_are_known(records in loan_records()) {
        let out = loans::duration_buckets_per_status(&LoanRecord::table(records));
        let labels = DurationBucket::labels();
        for row in out.summary.iter() {
            let label = row.get(DURATION_BUCKET).to_string();
            prop_assert!(labels.contains(&label.as_str()));
        }
    }

    #[test]
    fn ranked_counts_ignore_row_order(
        shuffled in loan_records().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
    ) {
        let (original, shuffled) = shuffled;
        let a = LoanRecord::table(original);
        let b = LoanRecord::table(shuffled);
        for aggregate in [
            loans::loans_per_status as Aggregation,
            loans::loans_per_faculty,
            loans::loans_per_category,
            loans::top_titles,
            loans::faculty_category_matrix,
            loans::monthly_trend_by_status,
        ] {
            prop_assert_eq!(aggregate(&a), aggregate(&b));
        }
    }

    #[test]
    fn top_titles_are_bounded(records in loan_records()) {
        let distinct: std::collections::BTreeSet<_> =
            records.iter().filter_map(|l| l.book_title.clone()).collect();
        let out = loans::top_titles(&LoanRecord::table(records));
        prop_assert_eq!(out.summary.len(), distinct.len().min(TOP_TITLES));
    }

    #[test]
    fn ranked_counts_are_descending(records in loan_records()) {
        let out = loans::loans_per_status(&LoanRecord::table(records.clone()));
        let counts: Vec<i64> = out.summary.iter().filter_map(|r| r.get(COUNT).as_i64()).collect();
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(counts.iter().sum::<i64>(), records.len() as i64);
    }
}

#[test]
fn three_loans_rank_by_status() {
    let table = Table::new(
        vec![col::LOAN_STATUS.into()],
        vec![
            vec!["returned".into()],
            vec!["returned".into()],
            vec!["borrowed".into()],
        ],
    );
    let out = loans::loans_per_status(&table);
    let rows: Vec<(String, i64)> = out
        .summary
        .iter()
        .map(|r| {
            (
                r.get(col::LOAN_STATUS).to_string(),
                r.get(COUNT).as_i64().unwrap_or(-1),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![("returned".to_string(), 2), ("borrowed".to_string(), 1)]
    );
}

#[test]
fn durations_with_a_gap_average_and_bucket() {
    let table = Table::new(
        vec![
            col::FACULTY_NAME.into(),
            col::LOAN_STATUS.into(),
            col::DURATION_DAYS.into(),
        ],
        [Some(5), Some(10), Some(22), None]
            .into_iter()
            .map(|d| vec!["F".into(), "returned".into(), d.map(Value::Int).into()])
            .collect(),
    );

    let mean = loans::mean_duration_per_faculty(&table);
    let value = mean.summary.value(0, MEAN_DURATION).and_then(Value::as_f64);
    assert!(value.is_some_and(|v| (v - 12.333_333).abs() < 1e-3));

    let buckets = loans::duration_buckets_per_status(&table);
    let labels: Vec<String> = buckets
        .summary
        .iter()
        .map(|r| r.get(DURATION_BUCKET).to_string())
        .collect();
    assert_eq!(labels, vec!["≤ 7 days", "8–14 days", "> 21 days"]);
    assert!(buckets.summary.iter().all(|r| r.get(COUNT).as_i64() == Some(1)));
}

#[test]
fn empty_loan_table_trend_is_empty_state() {
    let out = loans::monthly_trend_by_status(&LoanRecord::table([]));
    assert!(out.is_empty());
    assert!(out.spec.empty_message.is_some());
    assert!(out.summary.is_empty());
}

#[test]
fn tied_categories_sort_the_same_every_time() {
    let counts = [
        ("Poetry", 3),
        ("Art", 2),
        ("History", 5),
        ("Law", 2),
        ("Math", 1),
        ("Biology", 4),
        ("Chemistry", 6),
    ];
    let catalog: Vec<BookRecord> = counts
        .iter()
        .flat_map(|(category, n)| {
            (0..*n).map(move |i| BookRecord {
                book_id: format!("{category}-{i}"),
                title: format!("{category} {i}"),
                category: category.to_string(),
                publication_year: Some(2000 + i),
                isbn: None,
            })
        })
        .collect();

    let mut reversed = catalog.clone();
    reversed.reverse();

    let first = books::books_per_category(&BookRecord::table(catalog.clone()));
    let second = books::books_per_category(&BookRecord::table(catalog));
    let third = books::books_per_category(&BookRecord::table(reversed));
    assert_eq!(first, second);
    assert_eq!(first, third);

    let order: Vec<String> = first
        .summary
        .iter()
        .map(|r| r.get(col::CATEGORY).to_string())
        .collect();
    assert_eq!(
        order,
        vec!["Chemistry", "History", "Biology", "Poetry", "Art", "Law", "Math"]
    );
}
