// 📈 Chart - Selection-to-waterfall transform
// Pure projection of the dataset through the current selection.

use crate::dataset::{Dataset, Measure};
use crate::selection::SelectionSet;
use serde::Serialize;

pub const TRACE_NAME: &str = "20";
pub const Y_AXIS_TITLE: &str = "W/m<sup>2</sup>";

pub const INCREASING_COLOR: &str = "#8F2738";
pub const DECREASING_COLOR: &str = "#5E8DB0";
pub const TOTAL_COLOR: &str = "#ffb01f";
pub const TOTAL_OUTLINE_COLOR: &str = "gold";
pub const TOTAL_OUTLINE_WIDTH: u32 = 3;
pub const CONNECTOR_COLOR: &str = "#C0C0C0";

// ============================================================================
// CHART BARS
// ============================================================================

/// One waterfall bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: String,
    pub y: f64,
    pub measure: Measure,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Filter the dataset down to the selected sources, keeping record order.
///
/// Unknown selection values simply match nothing. An empty selection gives
/// an empty chart.
pub fn build_chart(dataset: &Dataset, selection: &SelectionSet) -> ChartSpec {
    let bars = dataset
        .records()
        .iter()
        .filter(|r| selection.contains(&r.source))
        .map(|r| Bar {
            x: r.source.clone(),
            y: r.contribution,
            measure: r.measure,
            text: format_contribution(r.contribution),
        })
        .collect();

    ChartSpec { bars }
}

/// Bar label: the value with at least one fractional digit
pub fn format_contribution(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// ============================================================================
// PLOTLY FIGURE
// ============================================================================

/// Figure JSON accepted as-is by `Plotly.react`
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<WaterfallTrace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub orientation: &'static str,
    pub measure: Vec<Measure>,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub textposition: &'static str,
    pub increasing: BarStyle,
    pub decreasing: BarStyle,
    pub totals: BarStyle,
    pub connector: Connector,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarStyle {
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connector {
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct FigureLayout {
    pub yaxis: Axis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub visible: bool,
    pub title: AxisTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub text: &'static str,
}

impl BarStyle {
    fn solid(color: &'static str) -> Self {
        BarStyle {
            marker: Marker { color, line: None },
        }
    }
}

impl From<&ChartSpec> for Figure {
    fn from(spec: &ChartSpec) -> Self {
        let trace = WaterfallTrace {
            kind: "waterfall",
            name: TRACE_NAME,
            orientation: "v",
            measure: spec.bars.iter().map(|b| b.measure).collect(),
            x: spec.bars.iter().map(|b| b.x.clone()).collect(),
            y: spec.bars.iter().map(|b| b.y).collect(),
            text: spec.bars.iter().map(|b| b.text.clone()).collect(),
            textposition: "inside",
            increasing: BarStyle::solid(INCREASING_COLOR),
            decreasing: BarStyle::solid(DECREASING_COLOR),
            totals: BarStyle {
                marker: Marker {
                    color: TOTAL_COLOR,
                    line: Some(LineStyle {
                        color: TOTAL_OUTLINE_COLOR,
                        width: Some(TOTAL_OUTLINE_WIDTH),
                    }),
                },
            },
            connector: Connector {
                line: LineStyle {
                    color: CONNECTOR_COLOR,
                    width: None,
                },
            },
        };

        Figure {
            data: vec![trace],
            layout: FigureLayout {
                yaxis: Axis {
                    visible: true,
                    title: AxisTitle { text: Y_AXIS_TITLE },
                },
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
