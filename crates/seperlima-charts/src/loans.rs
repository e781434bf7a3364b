//! Aggregations over the loan-detail table.

use seperlima_data::columns as col;
use seperlima_data::{Row, Table, Value};

use crate::buckets::DurationBucket;
use crate::group::{
    COUNT, count_by, count_by_derived, first_key, mean_by, rank_by_count, rank_by_measure,
    single_key_summary,
};
use crate::palette::{DEFAULT_PALETTE, faculty_color_map};
use crate::schema::guard;
use crate::spec::{Axis, ChartKind, ChartOutput, ChartSpec, ColorScheme};

pub const MONTH: &str = "month";
pub const MEAN_DURATION: &str = "mean_duration";
pub const DURATION_BUCKET: &str = "duration_bucket";
pub const BIN_START: &str = "bin_start";
pub const BIN_END: &str = "bin_end";

/// Equal-width bins in the duration histogram.
pub const HISTOGRAM_BINS: usize = 10;

/// Ranked titles kept by `top_titles`.
pub const TOP_TITLES: usize = 5;

fn month_of(value: &Value) -> Option<String> {
    value.as_date().map(|d| d.format("%Y-%m").to_string())
}

fn duration(row: Row<'_>) -> Option<f64> {
    row.get(col::DURATION_DAYS).as_f64()
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

/// Loans per calendar month, split by status, in chronological order.
pub fn monthly_trend_by_status(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Monthly loans by status";
    let columns = [MONTH, col::LOAN_STATUS, COUNT];
    if let Some(empty) = guard(loans, &[col::LOAN_DATE, col::LOAN_STATUS], TITLE, &columns) {
        return empty;
    }

    let groups = count_by_derived(loans.iter(), |row| {
        let month = month_of(row.get(col::LOAN_DATE))?;
        let status = non_null(row.get(col::LOAN_STATUS))?;
        Some((month, status))
    });
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let mut summary = Table::with_columns(&columns);
    for ((month, status), n) in groups {
        summary.push_row(vec![month.into(), status, n.into()]);
    }

    let spec = ChartSpec::new(ChartKind::StackedBar, TITLE)
        .x(Axis::ordinal(MONTH, "Month"))
        .y(Axis::quantitative(COUNT, "Loans"))
        .color(col::LOAN_STATUS, "Loan status", ColorScheme::Default);
    ChartOutput::new(spec, summary)
}

/// Month with the most loans; the earliest month wins ties.
pub fn peak_month(loans: &Table) -> Option<(String, u64)> {
    let mut months = count_by_derived(loans.iter(), |row| month_of(row.get(col::LOAN_DATE)));
    rank_by_count(&mut months);
    months.into_iter().next()
}

/// Loan count per faculty, busiest first.
pub fn loans_per_faculty(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loans per faculty";
    let columns = [col::FACULTY_NAME, COUNT];
    if let Some(empty) = guard(loans, &[col::FACULTY_NAME], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(loans, &[col::FACULTY_NAME]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);

    let colors = faculty_colors(groups.iter().map(|(k, _)| k));
    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::nominal(col::FACULTY_NAME, "Faculty"))
        .y(Axis::quantitative(COUNT, "Loans"))
        .color_unlabelled(col::FACULTY_NAME, colors);
    ChartOutput::new(spec, single_key_summary(col::FACULTY_NAME, groups))
}

/// Share of loans per book category.
pub fn loans_per_category(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loans per book category";
    let columns = [col::BOOK_CATEGORY, COUNT];
    if let Some(empty) = guard(loans, &[col::BOOK_CATEGORY], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(loans, &[col::BOOK_CATEGORY]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);

    let spec = ChartSpec::new(ChartKind::Donut, TITLE)
        .y(Axis::quantitative(COUNT, "Loans"))
        .color(col::BOOK_CATEGORY, "Book category", ColorScheme::Default);
    ChartOutput::new(spec, single_key_summary(col::BOOK_CATEGORY, groups))
}

/// Loan counts for every observed faculty × category pair.
pub fn faculty_category_matrix(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loans by faculty and book category";
    let columns = [col::FACULTY_NAME, col::BOOK_CATEGORY, COUNT];
    if let Some(empty) = guard(
        loans,
        &[col::FACULTY_NAME, col::BOOK_CATEGORY],
        TITLE,
        &columns,
    ) {
        return empty;
    }

    let groups = count_by(loans, &[col::FACULTY_NAME, col::BOOK_CATEGORY]);
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let mut summary = Table::with_columns(&columns);
    for (mut key, n) in groups {
        key.push(n.into());
        summary.push_row(key);
    }

    let spec = ChartSpec::new(ChartKind::Heatmap, TITLE)
        .x(Axis::nominal(col::BOOK_CATEGORY, "Book category"))
        .y(Axis::nominal(col::FACULTY_NAME, "Faculty"))
        .color(COUNT, "Loans", ColorScheme::Sequential("blues".into()));
    ChartOutput::new(spec, summary)
}

/// Mean loan duration per faculty, longest first. Open loans are ignored.
pub fn mean_duration_per_faculty(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Average loan duration per faculty";
    let columns = [col::FACULTY_NAME, MEAN_DURATION];
    if let Some(empty) = guard(
        loans,
        &[col::FACULTY_NAME, col::DURATION_DAYS],
        TITLE,
        &columns,
    ) {
        return empty;
    }

    let mut means = mean_by(loans, col::FACULTY_NAME, col::DURATION_DAYS);
    if means.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_measure(&mut means);

    let colors = faculty_colors(means.iter().map(|(k, _)| k));
    let mut summary = Table::with_columns(&columns);
    for (faculty, mean) in means {
        summary.push_row(vec![faculty, Value::Float(mean)]);
    }

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::nominal(col::FACULTY_NAME, "Faculty"))
        .y(Axis::quantitative(MEAN_DURATION, "Average duration (days)"))
        .color_unlabelled(col::FACULTY_NAME, colors);
    ChartOutput::new(spec, summary)
}

/// Distribution of loan durations over `HISTOGRAM_BINS` equal-width bins.
///
/// Bins span the observed range; the last bin is closed on the right. When
/// every duration is equal there is a single bin one day wide.
pub fn duration_histogram(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loan duration distribution";
    let columns = [BIN_START, BIN_END, COUNT];
    if let Some(empty) = guard(loans, &[col::DURATION_DAYS], TITLE, &columns) {
        return empty;
    }

    let durations: Vec<f64> = loans.iter().filter_map(duration).collect();
    let Some(min) = durations.iter().copied().reduce(f64::min) else {
        return ChartOutput::no_data(TITLE, &columns);
    };
    let max = durations.iter().copied().fold(min, f64::max);

    let (bins, width) = if max > min {
        (HISTOGRAM_BINS, (max - min) / HISTOGRAM_BINS as f64)
    } else {
        (1, 1.0)
    };
    let mut counts = vec![0u64; bins];
    for d in &durations {
        let idx = (((d - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let mut summary = Table::with_columns(&columns);
    for (i, n) in counts.into_iter().enumerate() {
        let start = min + i as f64 * width;
        let end = if bins > 1 && i == bins - 1 {
            max
        } else {
            start + width
        };
        summary.push_row(vec![Value::Float(start), Value::Float(end), n.into()]);
    }

    let spec = ChartSpec::new(ChartKind::Histogram, TITLE)
        .x(Axis::quantitative(BIN_START, "Duration (days)"))
        .y(Axis::quantitative(COUNT, "Loans"));
    ChartOutput::new(spec, summary)
}

/// One point per returned loan: duration against fine, colored by status.
pub fn duration_vs_fine(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loan duration vs fine";
    let columns = [col::DURATION_DAYS, col::FINE_AMOUNT, col::LOAN_STATUS];
    if let Some(empty) = guard(loans, &columns, TITLE, &columns) {
        return empty;
    }

    let mut summary = Table::with_columns(&columns);
    for row in loans.iter() {
        let Some(days) = duration(row) else {
            continue;
        };
        let fine = row.get(col::FINE_AMOUNT).as_f64().unwrap_or(0.0);
        summary.push_row(vec![
            Value::Float(days),
            Value::Float(fine),
            row.get(col::LOAN_STATUS).clone(),
        ]);
    }
    if summary.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let spec = ChartSpec::new(ChartKind::Scatter, TITLE)
        .x(Axis::quantitative(col::DURATION_DAYS, "Duration (days)"))
        .y(Axis::quantitative(col::FINE_AMOUNT, "Fine"))
        .color(col::LOAN_STATUS, "Loan status", ColorScheme::Default);
    ChartOutput::new(spec, summary)
}

/// Loan count per status, most frequent first.
pub fn loans_per_status(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loans per status";
    let columns = [col::LOAN_STATUS, COUNT];
    if let Some(empty) = guard(loans, &[col::LOAN_STATUS], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(loans, &[col::LOAN_STATUS]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::nominal(col::LOAN_STATUS, "Loan status"))
        .y(Axis::quantitative(COUNT, "Loans"))
        .color_unlabelled(col::LOAN_STATUS, ColorScheme::Default);
    ChartOutput::new(spec, single_key_summary(col::LOAN_STATUS, groups))
}

/// The `TOP_TITLES` most borrowed titles.
pub fn top_titles(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Top 5 most borrowed titles";
    let columns = [col::BOOK_TITLE, COUNT];
    if let Some(empty) = guard(loans, &[col::BOOK_TITLE], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(loans, &[col::BOOK_TITLE]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);
    groups.truncate(TOP_TITLES);

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::quantitative(COUNT, "Loans"))
        .y(Axis::nominal(col::BOOK_TITLE, "Title"))
        .color(COUNT, "Loans", ColorScheme::Sequential("blues".into()))
        .horizontal();
    ChartOutput::new(spec, single_key_summary(col::BOOK_TITLE, groups))
}

/// Loans per status, split into fixed duration buckets. Open loans are ignored.
pub fn duration_buckets_per_status(loans: &Table) -> ChartOutput {
    const TITLE: &str = "Loan duration per status";
    let columns = [col::LOAN_STATUS, DURATION_BUCKET, COUNT];
    if let Some(empty) = guard(
        loans,
        &[col::LOAN_STATUS, col::DURATION_DAYS],
        TITLE,
        &columns,
    ) {
        return empty;
    }

    let groups = count_by_derived(loans.iter(), |row| {
        let bucket = DurationBucket::of(duration(row)?);
        let status = non_null(row.get(col::LOAN_STATUS))?;
        Some((status, bucket))
    });
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let mut summary = Table::with_columns(&columns);
    for ((status, bucket), n) in groups {
        summary.push_row(vec![status, bucket.label().into(), n.into()]);
    }

    let legend = DurationBucket::ALL
        .iter()
        .zip(DEFAULT_PALETTE)
        .map(|(b, c)| (b.label().to_string(), c.to_string()))
        .collect();
    let spec = ChartSpec::new(ChartKind::GroupedBar, TITLE)
        .x(Axis::nominal(col::LOAN_STATUS, "Loan status"))
        .y(Axis::quantitative(COUNT, "Loans"))
        .color(
            DURATION_BUCKET,
            "Duration bucket",
            ColorScheme::Categorical(legend),
        );
    ChartOutput::new(spec, summary)
}

fn faculty_colors<'a>(names: impl Iterator<Item = &'a Value>) -> ColorScheme {
    let names: Vec<String> = names.map(|v| v.to_string()).collect();
    ColorScheme::Categorical(faculty_color_map(names.iter().map(String::as_str)))
}
