//! Aggregation engine for the Seperlima library dashboard.
//!
//! Every aggregation is a pure function from a `Table` to a `ChartOutput`:
//! a renderer-independent `ChartSpec` plus the summary table it was built
//! from. None of them fail. Missing columns or an empty input yield the
//! empty-state chart and a zero-row summary instead.
//!
//! The general shape is: validate columns, group by one or two keys,
//! aggregate (count, mean or top-N), sort with a stable tie-break, then map
//! the summary to a chart encoding.

pub mod books;
pub mod buckets;
pub mod group;
pub mod loans;
pub mod members;
pub mod palette;
mod schema;
mod spec;
pub mod treemap;
pub mod vega;

pub use buckets::DurationBucket;
pub use group::{COUNT, leader};
pub use schema::{SchemaMismatch, validate};
pub use spec::{
    Axis, ChartKind, ChartOutput, ChartSpec, ColorEncoding, ColorScheme, FieldKind,
    NO_DATA_MESSAGE, Orientation,
};
pub use vega::to_vega_lite;
