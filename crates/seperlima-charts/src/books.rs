//! Aggregations over the book catalog.

use seperlima_data::columns as col;
use seperlima_data::Table;

use crate::group::{COUNT, count_by, first_key, rank_by_count, single_key_summary};
use crate::schema::guard;
use crate::spec::{Axis, ChartKind, ChartOutput, ChartSpec, ColorScheme};

/// Summary column for `books_per_physical_status`.
pub const PHYSICAL_STATUS: &str = "physical_status";

/// Catalog columns that may carry a copy's shelf condition, in preference order.
pub const PHYSICAL_STATUS_COLUMNS: [&str; 4] =
    [PHYSICAL_STATUS, "book_status", "status", "condition"];

/// Book count per category, largest first.
pub fn books_per_category(books: &Table) -> ChartOutput {
    const TITLE: &str = "Books per category";
    let columns = [col::CATEGORY, COUNT];
    if let Some(empty) = guard(books, &[col::CATEGORY], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(books, &[col::CATEGORY]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::quantitative(COUNT, "Books"))
        .y(Axis::nominal(col::CATEGORY, "Category"))
        .color_unlabelled(col::CATEGORY, ColorScheme::Default)
        .horizontal();
    ChartOutput::new(spec, single_key_summary(col::CATEGORY, groups))
}

/// Book count per publication year, oldest first.
pub fn books_per_year(books: &Table) -> ChartOutput {
    const TITLE: &str = "Books per publication year";
    let columns = [col::PUBLICATION_YEAR, COUNT];
    if let Some(empty) = guard(books, &[col::PUBLICATION_YEAR], TITLE, &columns) {
        return empty;
    }

    let groups = first_key(count_by(books, &[col::PUBLICATION_YEAR]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let spec = ChartSpec::new(ChartKind::Line, TITLE)
        .x(Axis::ordinal(col::PUBLICATION_YEAR, "Publication year"))
        .y(Axis::quantitative(COUNT, "Books"));
    ChartOutput::new(spec, single_key_summary(col::PUBLICATION_YEAR, groups))
}

/// Book count per physical status, if the catalog has such a column.
pub fn books_per_physical_status(books: &Table) -> ChartOutput {
    const TITLE: &str = "Books per physical status";
    let columns = [PHYSICAL_STATUS, COUNT];
    let Some(source) = PHYSICAL_STATUS_COLUMNS
        .iter()
        .copied()
        .find(|c| books.has_column(c))
    else {
        return ChartOutput::empty(
            TITLE,
            "The book catalog has no physical status column.",
            &columns,
        );
    };

    let mut groups = first_key(count_by(books, &[source]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    rank_by_count(&mut groups);

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::nominal(PHYSICAL_STATUS, "Physical status"))
        .y(Axis::quantitative(COUNT, "Books"))
        .color_unlabelled(PHYSICAL_STATUS, ColorScheme::Default);
    ChartOutput::new(spec, single_key_summary(PHYSICAL_STATUS, groups))
}
