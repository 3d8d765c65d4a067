//! Option documents for the dashboard charts.

use serde_json::{json, Value};

use crate::domain::dashboard::{BarChart, SankeyChart, SeriesChart};
use crate::domain::{ChartKind, DashboardData};

/// One colour per level-1 innovation category.
pub const STACK_COLORS: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#ec4899", "#10b981", "#f59e0b", "#06b6d4",
];

pub const LINE_COLORS: [&str; 3] = ["#3b82f6", "#10b981", "#f59e0b"];

const AXIS_LABEL: &str = "#94a3b8";
const AXIS_LINE: &str = "#334155";
const SPLIT_LINE: &str = "#1e293b";

/// Option document for any chart of the payload.
pub fn chart_option(data: &DashboardData, kind: ChartKind) -> Value {
    match kind {
        ChartKind::EvolutionL1 => stack_option(&data.evolution_l1),
        ChartKind::EvolutionNature => line_option(&data.evolution_nature),
        ChartKind::ModelInfluence => bar_option(&data.model_influence),
        ChartKind::SankeyFlow => sankey_option(&data.sankey_flow),
    }
}

fn title(text: &str, font_size: u32) -> Value {
    json!({
        "text": text,
        "left": "center",
        "textStyle": {"color": "#e2e8f0", "fontSize": font_size, "fontWeight": "bold"}
    })
}

fn axis_tooltip() -> Value {
    json!({
        "trigger": "axis",
        "backgroundColor": "rgba(30, 41, 59, 0.95)",
        "borderColor": "#3b82f6",
        "borderWidth": 1,
        "textStyle": {"color": "#e2e8f0"}
    })
}

fn category_axis(categories: &[Value], font_size: u32) -> Value {
    json!({
        "type": "category",
        "boundaryGap": false,
        "data": categories,
        "axisLabel": {"color": AXIS_LABEL, "fontSize": font_size},
        "axisLine": {"lineStyle": {"color": AXIS_LINE}}
    })
}

fn value_axis(font_size: u32) -> Value {
    json!({
        "type": "value",
        "axisLabel": {"color": AXIS_LABEL, "fontSize": font_size},
        "axisLine": {"lineStyle": {"color": AXIS_LINE}},
        "splitLine": {"lineStyle": {"color": SPLIT_LINE, "type": "dashed"}}
    })
}

fn legend(chart: &SeriesChart) -> Value {
    let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
    json!({"data": names, "top": 40, "textStyle": {"color": AXIS_LABEL}})
}

/// Series keys from the payload, with `overrides` taking precedence.
fn merged_series(chart: &SeriesChart, overrides: impl Fn(usize) -> Value) -> Vec<Value> {
    chart
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let mut item = series.extra.clone();
            item.insert("name".into(), Value::from(series.name.clone()));
            item.insert("data".into(), json!(series.data));
            if let Value::Object(extra) = overrides(i) {
                item.extend(extra);
            }
            Value::Object(item)
        })
        .collect()
}

/// Stacked area chart of level-1 innovation counts per year.
pub fn stack_option(chart: &SeriesChart) -> Value {
    let series = merged_series(chart, |i| {
        let color = STACK_COLORS[i % STACK_COLORS.len()];
        json!({
            "itemStyle": {"color": color},
            "areaStyle": {
                "color": {
                    "type": "linear",
                    "x": 0, "y": 0, "x2": 0, "y2": 1,
                    "colorStops": [
                        {"offset": 0, "color": color},
                        {"offset": 1, "color": format!("{color}40")}
                    ]
                }
            }
        })
    });
    let mut tooltip = axis_tooltip();
    tooltip["axisPointer"] = json!({"type": "cross", "label": {"backgroundColor": "#6a7985"}});
    let mut legend = legend(chart);
    legend["itemGap"] = json!(20);

    json!({
        "title": title(&chart.title, 20),
        "tooltip": tooltip,
        "legend": legend,
        "grid": {"left": "3%", "right": "4%", "bottom": "15%", "top": "20%", "containLabel": true},
        "xAxis": category_axis(&chart.categories, 12),
        "yAxis": value_axis(12),
        "dataZoom": [
            {
                "type": "slider",
                "show": true,
                "xAxisIndex": [0],
                "bottom": 10,
                "height": 20,
                "handleStyle": {"color": "#3b82f6"},
                "textStyle": {"color": AXIS_LABEL},
                "borderColor": AXIS_LINE
            },
            {"type": "inside", "xAxisIndex": [0], "start": 50, "end": 100}
        ],
        "series": series,
        "backgroundColor": "transparent"
    })
}

/// Smooth line chart of innovation nature per year.
pub fn line_option(chart: &SeriesChart) -> Value {
    let series = merged_series(chart, |i| {
        let color = LINE_COLORS[i % LINE_COLORS.len()];
        json!({
            "lineStyle": {"width": 3, "color": color},
            "itemStyle": {"color": color},
            "symbol": "circle",
            "symbolSize": 6
        })
    });

    json!({
        "title": title(&chart.title, 18),
        "tooltip": axis_tooltip(),
        "legend": legend(chart),
        "grid": {"left": "3%", "right": "4%", "bottom": "10%", "top": "20%", "containLabel": true},
        "xAxis": category_axis(&chart.categories, 11),
        "yAxis": value_axis(11),
        "series": series,
        "backgroundColor": "transparent"
    })
}

/// Horizontal bar chart of base model influence.
pub fn bar_option(chart: &BarChart) -> Value {
    let bars: Vec<Value> = chart
        .values
        .iter()
        .map(|value| {
            json!({
                "value": value,
                "itemStyle": {
                    "color": {
                        "type": "linear",
                        "x": 0, "y": 0, "x2": 1, "y2": 0,
                        "colorStops": [
                            {"offset": 0, "color": "#3b82f6"},
                            {"offset": 1, "color": "#8b5cf6"}
                        ]
                    }
                }
            })
        })
        .collect();
    let mut tooltip = axis_tooltip();
    tooltip["axisPointer"] = json!({"type": "shadow"});
    tooltip["formatter"] = json!("{b}<br/>引用次数: {c}");

    json!({
        "title": title(&chart.title, 18),
        "tooltip": tooltip,
        "grid": {"left": "25%", "right": "5%", "bottom": "10%", "top": "15%", "containLabel": false},
        "xAxis": value_axis(11),
        "yAxis": {
            "type": "category",
            "data": chart.categories,
            "axisLabel": {"color": AXIS_LABEL, "fontSize": 11, "interval": 0},
            "axisLine": {"lineStyle": {"color": AXIS_LINE}}
        },
        "series": [{
            "type": "bar",
            "data": bars,
            "label": {"show": true, "position": "right", "color": "#e2e8f0", "fontSize": 11}
        }],
        "backgroundColor": "transparent"
    })
}

/// Sankey flow from base models to level-1 topics.
pub fn sankey_option(chart: &SankeyChart) -> Value {
    let nodes: Vec<Value> = chart
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            json!({
                "name": node.name,
                "itemStyle": {"color": STACK_COLORS[i % STACK_COLORS.len()]}
            })
        })
        .collect();

    json!({
        "title": title(&chart.title, 18),
        "tooltip": {
            "trigger": "item",
            "triggerOn": "mousemove",
            "backgroundColor": "rgba(30, 41, 59, 0.95)",
            "borderColor": "#3b82f6",
            "borderWidth": 1,
            "textStyle": {"color": "#e2e8f0"}
        },
        "series": [{
            "type": "sankey",
            "top": "12%",
            "bottom": "5%",
            "left": "3%",
            "right": "15%",
            "nodeGap": 10,
            "emphasis": {"focus": "adjacency"},
            "data": nodes,
            "links": chart.links,
            "label": {"color": "#e2e8f0", "fontSize": 11},
            "lineStyle": {"color": "gradient", "curveness": 0.5, "opacity": 0.4}
        }],
        "backgroundColor": "transparent"
    })
}
