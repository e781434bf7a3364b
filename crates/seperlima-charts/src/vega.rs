//! Vega-Lite rendering of chart specs.
//!
//! The summary table is inlined as the chart's data, so the output is a
//! self-contained spec the browser can embed directly.

use serde_json::{Map, Value as Json, json};

use seperlima_data::Table;

use crate::loans::{BIN_END, BIN_START};
use crate::members::{X0, X1, Y0, Y1};
use crate::spec::{Axis, ChartKind, ChartOutput, ColorEncoding, ColorScheme, FieldKind};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

const HEIGHT: u32 = 320;

/// Render `output` as a Vega-Lite v5 spec.
pub fn to_vega_lite(output: &ChartOutput) -> Json {
    let spec = &output.spec;
    let mut chart = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": spec.title,
        "width": "container",
        "height": HEIGHT,
    });

    if spec.kind == ChartKind::Empty {
        let message = spec.empty_message.clone().unwrap_or_default();
        chart["data"] = json!({ "values": [{ "message": message }] });
        chart["mark"] = json!({ "type": "text", "fontSize": 14 });
        chart["encoding"] = json!({ "text": { "field": "message" } });
        return chart;
    }

    chart["data"] = json!({ "values": data_values(&output.summary) });

    let mut encoding = Map::new();
    if let Some(x) = &spec.x {
        encoding.insert("x".into(), channel(x));
    }
    if let Some(y) = &spec.y {
        encoding.insert("y".into(), channel(y));
    }
    if let Some(color) = &spec.color {
        encoding.insert("color".into(), color_channel(color));
    }
    encoding.insert("tooltip".into(), tooltip(&output.summary));

    let mark = match spec.kind {
        ChartKind::Bar | ChartKind::StackedBar => json!("bar"),
        ChartKind::GroupedBar => {
            if let Some(color) = &spec.color {
                let mut offset = json!({ "field": color.field });
                if let ColorScheme::Categorical(pairs) = &color.scheme {
                    offset["sort"] = json!(pairs.iter().map(|(k, _)| k).collect::<Vec<_>>());
                }
                encoding.insert("xOffset".into(), offset);
            }
            json!("bar")
        }
        ChartKind::Donut => {
            if let Some(y) = encoding.remove("y") {
                encoding.insert("theta".into(), y);
            }
            json!({ "type": "arc", "innerRadius": 60 })
        }
        ChartKind::Heatmap => json!("rect"),
        ChartKind::Histogram => {
            if let Some(x) = encoding.get_mut("x") {
                x["bin"] = json!({ "binned": true });
            }
            encoding.insert("x2".into(), json!({ "field": BIN_END }));
            json!("bar")
        }
        ChartKind::Scatter => json!({ "type": "point", "filled": true }),
        ChartKind::Line => json!({ "type": "line", "point": true }),
        ChartKind::Treemap => {
            encoding.remove("y");
            encoding.insert("x".into(), unit_axis(X0, false));
            encoding.insert("x2".into(), json!({ "field": X1 }));
            encoding.insert("y".into(), unit_axis(Y0, true));
            encoding.insert("y2".into(), json!({ "field": Y1 }));
            json!({ "type": "rect", "stroke": "white" })
        }
        ChartKind::Empty => json!("text"),
    };

    chart["mark"] = mark;
    chart["encoding"] = Json::Object(encoding);
    chart
}

fn data_values(table: &Table) -> Vec<Json> {
    table
        .iter()
        .map(|row| {
            let object: Map<String, Json> = table
                .columns()
                .iter()
                .zip(row.values())
                .map(|(c, v)| (c.clone(), serde_json::to_value(v).unwrap_or(Json::Null)))
                .collect();
            Json::Object(object)
        })
        .collect()
}

fn field_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Nominal => "nominal",
        FieldKind::Ordinal => "ordinal",
        FieldKind::Quantitative => "quantitative",
    }
}

fn channel(axis: &Axis) -> Json {
    let mut ch = json!({
        "field": axis.field,
        "type": field_type(axis.kind),
        "title": axis.title,
    });
    if axis.kind != FieldKind::Quantitative {
        // Keep the summary's row order.
        ch["sort"] = Json::Null;
    }
    if axis.field == BIN_START {
        ch["axis"] = json!({ "format": ".0f" });
    }
    ch
}

fn color_channel(color: &ColorEncoding) -> Json {
    let mut ch = json!({ "field": color.field, "title": color.title });
    match &color.scheme {
        ColorScheme::Default => {
            ch["type"] = json!("nominal");
        }
        ColorScheme::Categorical(pairs) => {
            ch["type"] = json!("nominal");
            ch["scale"] = json!({
                "domain": pairs.iter().map(|(k, _)| k).collect::<Vec<_>>(),
                "range": pairs.iter().map(|(_, c)| c).collect::<Vec<_>>(),
            });
        }
        ColorScheme::Sequential(scheme) => {
            ch["type"] = json!("quantitative");
            ch["scale"] = json!({ "scheme": scheme });
        }
    }
    if !color.legend {
        ch["legend"] = Json::Null;
    }
    ch
}

fn tooltip(table: &Table) -> Json {
    Json::Array(
        table
            .columns()
            .iter()
            .filter(|c| ![X0, X1, Y0, Y1].contains(&c.as_str()))
            .map(|c| json!({ "field": c }))
            .collect(),
    )
}

fn unit_axis(field: &str, reverse: bool) -> Json {
    json!({
        "field": field,
        "type": "quantitative",
        "axis": null,
        "scale": { "domain": [0, 1], "reverse": reverse },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seperlima_data::{LoanRecord, MemberRecord};

    use crate::loans::{duration_histogram, loans_per_faculty, loans_per_category};
    use crate::members::members_per_faculty;
    use crate::spec::ChartOutput;

    #[test]
    fn test_empty_state_renders_message() {
        let out = ChartOutput::no_data("Loans", &["count"]);
        let chart = to_vega_lite(&out);
        assert_eq!(chart["mark"]["type"], "text");
        assert_eq!(
            chart["data"]["values"][0]["message"],
            crate::spec::NO_DATA_MESSAGE
        );
    }

    #[test]
    fn test_bar_inlines_summary_and_faculty_scale() {
        let loans = LoanRecord::table([]);
        let empty = loans_per_faculty(&loans);
        assert_eq!(to_vega_lite(&empty)["mark"]["type"], "text");

        let table = Table::new(
            vec!["faculty_name".into()],
            vec![vec!["Fakultas Pembangunan Berkelanjutan".into()]],
        );
        let chart = to_vega_lite(&loans_per_faculty(&table));
        assert_eq!(chart["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(chart["mark"], "bar");
        assert_eq!(chart["data"]["values"][0]["count"], 1);
        assert_eq!(chart["encoding"]["color"]["scale"]["range"][0], "#22C55E");
        assert!(chart["encoding"]["color"]["legend"].is_null());
        assert!(chart["encoding"]["x"]["sort"].is_null());
    }

    #[test]
    fn test_donut_uses_theta() {
        let table = Table::new(vec!["book_category".into()], vec![vec!["Fiction".into()]]);
        let chart = to_vega_lite(&loans_per_category(&table));
        assert_eq!(chart["mark"]["type"], "arc");
        assert_eq!(chart["encoding"]["theta"]["field"], "count");
        assert!(chart["encoding"].get("y").is_none());
    }

    #[test]
    fn test_histogram_and_treemap_use_span_channels() {
        let loans = Table::new(
            vec!["duration_days".into()],
            vec![vec![1.0.into()], vec![9.0.into()]],
        );
        let chart = to_vega_lite(&duration_histogram(&loans));
        assert_eq!(chart["encoding"]["x2"]["field"], BIN_END);
        assert_eq!(chart["encoding"]["x"]["bin"]["binned"], true);

        let members = MemberRecord::table([]);
        assert_eq!(to_vega_lite(&members_per_faculty(&members))["mark"]["type"], "text");
        let members = Table::new(vec!["faculty_name".into()], vec![vec!["A".into()]]);
        let chart = to_vega_lite(&members_per_faculty(&members));
        assert_eq!(chart["encoding"]["y2"]["field"], Y1);
        assert_eq!(chart["data"]["values"][0]["x1"], 1.0);
    }
}
