//! Renderer-independent chart descriptions.

use serde::Serialize;

use seperlima_data::Table;

/// Message shown when an aggregation has nothing to summarize.
pub const NO_DATA_MESSAGE: &str = "No data matches the selected filters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    StackedBar,
    GroupedBar,
    Donut,
    Heatmap,
    Histogram,
    Scatter,
    Line,
    Treemap,
    /// Placeholder carrying `ChartSpec::empty_message`.
    Empty,
}

/// How a field's values are interpreted on an axis or color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Nominal,
    Ordinal,
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub field: String,
    pub title: String,
    pub kind: FieldKind,
}

impl Axis {
    pub fn nominal(field: &str, title: &str) -> Self {
        Self::new(field, title, FieldKind::Nominal)
    }

    pub fn ordinal(field: &str, title: &str) -> Self {
        Self::new(field, title, FieldKind::Ordinal)
    }

    pub fn quantitative(field: &str, title: &str) -> Self {
        Self::new(field, title, FieldKind::Quantitative)
    }

    fn new(field: &str, title: &str, kind: FieldKind) -> Self {
        Self {
            field: field.to_string(),
            title: title.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColorScheme {
    /// Renderer's default categorical palette.
    Default,
    /// Explicit `(category, color)` pairs, in legend order.
    Categorical(Vec<(String, String)>),
    /// A named continuous scheme, for numeric fields.
    Sequential(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorEncoding {
    pub field: String,
    pub title: String,
    pub scheme: ColorScheme,
    pub legend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    /// Categories on the y axis, ranked top to bottom.
    Horizontal,
}

/// Abstract description of one visualization.
///
/// The data itself lives in the accompanying summary table; fields here refer
/// to its columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Option<Axis>,
    pub y: Option<Axis>,
    pub color: Option<ColorEncoding>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x: None,
            y: None,
            color: None,
            orientation: Orientation::Vertical,
            empty_message: None,
        }
    }

    /// The empty-state placeholder.
    pub fn empty(title: &str, message: impl Into<String>) -> Self {
        Self {
            empty_message: Some(message.into()),
            ..Self::new(ChartKind::Empty, title)
        }
    }

    pub fn x(mut self, axis: Axis) -> Self {
        self.x = Some(axis);
        self
    }

    pub fn y(mut self, axis: Axis) -> Self {
        self.y = Some(axis);
        self
    }

    pub fn color(mut self, field: &str, title: &str, scheme: ColorScheme) -> Self {
        self.color = Some(ColorEncoding {
            field: field.to_string(),
            title: title.to_string(),
            scheme,
            legend: true,
        });
        self
    }

    /// Color without a legend, for when color repeats the category axis.
    pub fn color_unlabelled(mut self, field: &str, scheme: ColorScheme) -> Self {
        self = self.color(field, field, scheme);
        if let Some(color) = self.color.as_mut() {
            color.legend = false;
        }
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ChartKind::Empty
    }
}

/// Result of every aggregation: a chart plus the summary it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub spec: ChartSpec,
    pub summary: Table,
}

impl ChartOutput {
    pub fn new(spec: ChartSpec, summary: Table) -> Self {
        Self { spec, summary }
    }

    /// Empty-state chart with a zero-row summary carrying `columns`.
    pub fn empty(title: &str, message: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            spec: ChartSpec::empty(title, message),
            summary: Table::with_columns(columns),
        }
    }

    /// Empty-state for an aggregation that found no rows to count.
    pub fn no_data(title: &str, columns: &[&str]) -> Self {
        Self::empty(title, NO_DATA_MESSAGE, columns)
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_has_message_and_no_rows() {
        let out = ChartOutput::no_data("Loans", &["loan_status", "count"]);
        assert!(out.is_empty());
        assert_eq!(out.spec.empty_message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(out.summary.is_empty());
        assert_eq!(out.summary.columns(), &["loan_status", "count"]);
    }

    #[test]
    fn test_unlabelled_color_hides_legend() {
        let spec = ChartSpec::new(ChartKind::Bar, "t").color_unlabelled("f", ColorScheme::Default);
        let color = spec.color.unwrap();
        assert!(!color.legend);
        assert_eq!(color.field, "f");
    }
}
