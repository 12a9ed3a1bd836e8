// 🧱 Layout - Static display tree for the infographic page
// Built once from the dataset's sources; rendered to HTML or served as JSON.

use crate::chart::Figure;
use crate::selection::SelectionSet;
use serde::Serialize;

pub const CHECKLIST_ID: &str = "my_checklist";
pub const GRAPH_ID: &str = "the_graph";
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const BANNER: &str = "Radiative Forcing Infographic";
const TITLE: &str = "Radiative Forcing";

const INTRO: &str = "Radiative Forcing refers to the difference between the solar energy absorbed by Earth and the energy radiated back into space. A system in thermal balance has zero radiative forcing. Solar irradiance is the energy from the sun received per unit area per second (W/m²). A positive radiative forcing indicates more energy absorption than reflection, leading to warming, and vice versa. Here, we break down radiative forcing into its components, often called 'forcing agents', categorised by their sources.";

/// (css class, text) for each entry of the definitions panel
const DEFINITIONS: [(Option<&str>, &str); 7] = [
    (Some("albedo"), "Albedo: A measure of reflectivity. A perfectly black object (perfect absorber) has an albedo of 0, while a white object has an albedo of 1. For instance, replacing forests with agricultural land increases Earth's albedo as crops are more reflective than forests."),
    (Some("strozone"), "Stratospheric Ozone: Ozone in the stratosphere absorbs energy and partially re-emits it back into space."),
    (Some("blacksnow"), "Black Carbon on Snow: Carbon from fossil fuels gets trapped in ice, darkening it, reducing albedo, and causing the ice to absorb more sunlight."),
    (Some("aerosols"), "Aerosols: These particles contribute negatively to radiative forcing, but due to their short atmospheric lifetimes, they cannot offset the long-term effects of greenhouse gases."),
    (None, "Aerosol Cloud Albedo Effect: Aerosols decrease precipitation efficiency, inhibiting cloud formation, allowing more heat to radiate away at night that would otherwise be trapped by clouds."),
    (None, "Contrails: Formed by water vapour condensing around particles from aircraft engines. These ice clouds act like regular clouds, insulating the Earth and preventing heat from escaping."),
    (None, "Solar Irradiance: Natural variations in the sun\u{2019}s energy as measured on Earth. This is the only truly non-anthropogenic source of radiative forcing."),
];

// ============================================================================
// LAYOUT TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Div {
        #[serde(skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        children: Vec<Node>,
    },
    Pre {
        text: String,
    },
    Heading {
        text: String,
    },
    Paragraph {
        #[serde(skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Span {
        class: String,
        text: String,
    },
    Details {
        class: String,
        summary: String,
        children: Vec<Node>,
    },
    Checklist {
        id: String,
        options: Vec<ChecklistOption>,
        value: Vec<String>,
    },
    Graph {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistOption {
    pub label: String,
    pub value: String,
    pub disabled: bool,
}

fn div(children: Vec<Node>) -> Node {
    Node::Div {
        class: None,
        children,
    }
}

fn text(s: &str) -> Node {
    Node::Text {
        text: s.to_string(),
    }
}

fn paragraph(class: Option<&str>, children: Vec<Node>) -> Node {
    Node::Paragraph {
        class: class.map(str::to_string),
        children,
    }
}

/// Build the page layout
///
/// Checklist options follow `sources` order; `selected` decides which are
/// ticked. Ticked values are listed in that same order.
pub fn build_layout(sources: &[&str], selected: &SelectionSet) -> Node {
    let options = sources
        .iter()
        .map(|s| ChecklistOption {
            label: s.to_string(),
            value: s.to_string(),
            disabled: false,
        })
        .collect();

    let value = sources
        .iter()
        .filter(|s| selected.contains(s))
        .map(|s| s.to_string())
        .collect();

    let definitions = DEFINITIONS
        .iter()
        .map(|(class, body)| paragraph(*class, vec![text(body)]))
        .collect();

    div(vec![
        div(vec![Node::Pre {
            text: BANNER.to_string(),
        }]),
        div(vec![Node::Heading {
            text: TITLE.to_string(),
        }]),
        div(vec![
            paragraph(Some("intro"), vec![text(INTRO)]),
            paragraph(
                Some("agents"),
                vec![
                    text("Some of these agents are "),
                    Node::Span {
                        class: "natural".to_string(),
                        text: "natural ".to_string(),
                    },
                    text(" while others are due to "),
                    Node::Span {
                        class: "human".to_string(),
                        text: "human".to_string(),
                    },
                    text(" activities."),
                ],
            ),
        ]),
        div(vec![Node::Details {
            class: "definitions".to_string(),
            summary: "Useful Definitions".to_string(),
            children: definitions,
        }]),
        div(vec![Node::Checklist {
            id: CHECKLIST_ID.to_string(),
            options,
            value,
        }]),
        div(vec![Node::Graph {
            id: GRAPH_ID.to_string(),
        }]),
    ])
}

// ============================================================================
// HTML RENDERING
// ============================================================================

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn class_attr(class: Option<&str>) -> String {
    class
        .map(|c| format!(" class=\"{}\"", html_escape(c)))
        .unwrap_or_default()
}

pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_children(children: &[Node], out: &mut String) {
    for child in children {
        render_into(child, out);
    }
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Div { class, children } => {
            out.push_str(&format!("<div{}>", class_attr(class.as_deref())));
            render_children(children, out);
            out.push_str("</div>");
        }
        Node::Pre { text } => {
            out.push_str("<pre class=\"banner\">");
            out.push_str(&html_escape(text));
            out.push_str("</pre>");
        }
        Node::Heading { text } => {
            out.push_str(&format!("<h1>{}</h1>", html_escape(text)));
        }
        Node::Paragraph { class, children } => {
            out.push_str(&format!("<p{}>", class_attr(class.as_deref())));
            render_children(children, out);
            out.push_str("</p>");
        }
        Node::Text { text } => out.push_str(&html_escape(text)),
        Node::Span { class, text } => {
            out.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                html_escape(class),
                html_escape(text)
            ));
        }
        Node::Details {
            class,
            summary,
            children,
        } => {
            out.push_str(&format!("<details class=\"{}\">", html_escape(class)));
            out.push_str(&format!("<summary>{}</summary>", html_escape(summary)));
            render_children(children, out);
            out.push_str("</details>");
        }
        Node::Checklist { id, options, value } => {
            out.push_str(&format!(
                "<div id=\"{}\" class=\"my_box_container\">",
                html_escape(id)
            ));
            for option in options {
                let checked = if value.contains(&option.value) { " checked" } else { "" };
                let disabled = if option.disabled { " disabled" } else { "" };
                out.push_str(&format!(
                    "<label class=\"my_box_label\"><input type=\"checkbox\" class=\"my_box_input\" value=\"{}\"{}{}>{}</label>",
                    html_escape(&option.value),
                    checked,
                    disabled,
                    html_escape(&option.label)
                ));
            }
            out.push_str("</div>");
        }
        Node::Graph { id } => {
            out.push_str(&format!("<div id=\"{}\" class=\"graph\"></div>", html_escape(id)));
        }
    }
}

/// Full HTML document: layout, Plotly, client script, and the initial figure
/// embedded as JSON so the first paint needs no round trip.
pub fn render_page(layout: &Node, initial: &Figure) -> Result<String, serde_json::Error> {
    // "</" inside a script element would end it early
    let figure_json = serde_json::to_string(initial)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
    <script src="{plotly}"></script>
</head>
<body>
{body}
<script id="initial-figure" type="application/json">{figure}</script>
<script src="/static/app.js"></script>
</body>
</html>
"#,
        title = html_escape(BANNER),
        plotly = PLOTLY_JS_URL,
        body = render_html(layout),
        figure = figure_json,
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_chart, ChartSpec};

    fn find_checklist(node: &Node) -> Option<&Node> {
        match node {
            Node::Checklist { .. } => Some(node),
            Node::Div { children, .. }
            | Node::Paragraph { children, .. }
            | Node::Details { children, .. } => children.iter().find_map(find_checklist),
            _ => None,
        }
    }

    #[test]
    fn test_checklist_options_follow_sources() {
        let selected: SelectionSet = ["Methane", "Net total"].into_iter().collect();
        let layout = build_layout(&["Carbon Dioxide", "Methane", "Net total"], &selected);

        match find_checklist(&layout) {
            Some(Node::Checklist { id, options, value }) => {
                assert_eq!(id, CHECKLIST_ID);
                let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
                assert_eq!(labels, vec!["Carbon Dioxide", "Methane", "Net total"]);
                assert_eq!(value, &vec!["Methane".to_string(), "Net total".to_string()]);
            }
            _ => panic!("layout has no checklist"),
        }
    }

    #[test]
    fn test_layout_is_pure() {
        let selected: SelectionSet = ["Methane"].into_iter().collect();
        assert_eq!(
            build_layout(&["Methane"], &selected),
            build_layout(&["Methane"], &selected)
        );
    }

    #[test]
    fn test_render_html_contains_static_text() {
        let html = render_html(&build_layout(&[], &SelectionSet::new()));

        assert!(html.contains("<h1>Radiative Forcing</h1>"));
        assert!(html.contains("<summary>Useful Definitions</summary>"));
        assert!(html.contains("<span class=\"human\">human</span>"));
        assert!(html.contains("Earth&#39;s albedo"));
        assert!(html.contains("id=\"the_graph\""));
    }

    #[test]
    fn test_render_checklist_marks_selected() {
        let selected: SelectionSet = ["Albedo (Land use)"].into_iter().collect();
        let html = render_html(&build_layout(&["Albedo (Land use)", "Contrails"], &selected));

        assert!(html.contains("value=\"Albedo (Land use)\" checked>"));
        assert!(html.contains("value=\"Contrails\">Contrails"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_layout_json_is_tagged() {
        let json = serde_json::to_value(build_layout(&["CO2"], &SelectionSet::new())).unwrap();
        assert_eq!(json["type"], "div");
        assert_eq!(json["children"][1]["children"][0]["type"], "heading");
    }

    #[test]
    fn test_render_page_embeds_figure() {
        let spec = ChartSpec { bars: vec![] };
        let layout = build_layout(&[], &SelectionSet::new());
        let page = render_page(&layout, &Figure::from(&spec)).unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(PLOTLY_JS_URL));
        assert!(page.contains("<script id=\"initial-figure\" type=\"application/json\">"));
        // the axis title carries </sup>, which must not close the script tag
        assert!(page.contains("W/m<sup>2<\\/sup>"));
    }

    #[test]
    fn test_render_page_with_bars() {
        let dataset = crate::dataset::Dataset::from_reader(
            "Source,Measure,Contribution\nCO2,relative,2.0\n".as_bytes(),
        )
        .unwrap();
        let selection = SelectionSet::all(&dataset);
        let page = render_page(
            &build_layout(&dataset.sources(), &selection),
            &Figure::from(&build_chart(&dataset, &selection)),
        )
        .unwrap();

        assert!(page.contains("\"x\":[\"CO2\"]"));
    }
}
