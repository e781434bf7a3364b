//! Aggregations over the member roster.

use seperlima_data::columns as col;
use seperlima_data::{Table, Value};

use crate::group::{COUNT, count_by, first_key, rank_by_count, single_key_summary};
use crate::palette::faculty_color_map;
use crate::schema::guard;
use crate::spec::{Axis, ChartKind, ChartOutput, ChartSpec, ColorScheme};
use crate::treemap::squarify;

pub const X0: &str = "x0";
pub const X1: &str = "x1";
pub const Y0: &str = "y0";
pub const Y1: &str = "y1";

/// Member count per membership status, in status order.
pub fn members_per_status(members: &Table) -> ChartOutput {
    const TITLE: &str = "Members per status";
    let columns = [col::MEMBER_STATUS, COUNT];
    if let Some(empty) = guard(members, &[col::MEMBER_STATUS], TITLE, &columns) {
        return empty;
    }

    let groups = first_key(count_by(members, &[col::MEMBER_STATUS]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }

    let spec = ChartSpec::new(ChartKind::Bar, TITLE)
        .x(Axis::nominal(col::MEMBER_STATUS, "Member status"))
        .y(Axis::quantitative(COUNT, "Members"))
        .color_unlabelled(col::MEMBER_STATUS, ColorScheme::Default);
    ChartOutput::new(spec, single_key_summary(col::MEMBER_STATUS, groups))
}

/// Member count per faculty as a treemap.
///
/// The summary carries each faculty's tile in the unit square. Members whose
/// faculty is unknown are not counted.
pub fn members_per_faculty(members: &Table) -> ChartOutput {
    const TITLE: &str = "Members per faculty";
    let columns = [col::FACULTY_NAME, COUNT, X0, X1, Y0, Y1];
    if let Some(empty) = guard(members, &[col::FACULTY_NAME], TITLE, &columns) {
        return empty;
    }

    let mut groups = first_key(count_by(members, &[col::FACULTY_NAME]));
    if groups.is_empty() {
        return ChartOutput::no_data(TITLE, &columns);
    }
    // Largest first keeps the tiles close to square.
    rank_by_count(&mut groups);

    let weights: Vec<f64> = groups.iter().map(|(_, n)| *n as f64).collect();
    let tiles = squarify(&weights);
    let names: Vec<String> = groups.iter().map(|(k, _)| k.to_string()).collect();
    let colors = faculty_color_map(names.iter().map(String::as_str));

    let mut summary = Table::with_columns(&columns);
    for ((faculty, n), tile) in groups.into_iter().zip(tiles) {
        summary.push_row(vec![
            faculty,
            n.into(),
            Value::Float(tile.x0),
            Value::Float(tile.x1),
            Value::Float(tile.y0),
            Value::Float(tile.y1),
        ]);
    }

    let spec = ChartSpec::new(ChartKind::Treemap, TITLE)
        .y(Axis::quantitative(COUNT, "Members"))
        .color(col::FACULTY_NAME, "Faculty", ColorScheme::Categorical(colors));
    ChartOutput::new(spec, summary)
}
