//! Browsing the navigation tree and rendering node datasets.

use std::io;

use anyhow::Context;
use esd_core::chart_type::ChartType;
use esd_core::context::{DisplayContext, Province};
use esd_core::error::ParseError;
use esd_panel::{ChartProjection, PanelState};
use esd_registry::{
    DataSource, JsonFileSource, NavigationTree, Registry, ResultSource, SampleSource, Section, TreeNode,
};
use esd_utils::json::to_pretty_string;
use log::warn;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::ViewArgs;

pub fn display_context(view: &ViewArgs) -> anyhow::Result<DisplayContext> {
    let province = Province::find(&view.province)
        .ok_or_else(|| ParseError::Province(view.province.clone()))?;
    Ok(DisplayContext::new(province, view.scenario))
}

/// Sample registry, overridden by a dataset file and then by the province's
/// model results when requested.
pub fn load_registry(view: &ViewArgs, context: &DisplayContext) -> anyhow::Result<Registry> {
    let datasets = view.datasets.as_deref().map(JsonFileSource::new);
    let results = view
        .results
        .then(|| ResultSource::new(&view.data_dir, context.province));

    let mut sources: Vec<&dyn DataSource> = vec![&SampleSource];
    if let Some(source) = &datasets {
        sources.push(source);
    }
    if let Some(source) = &results {
        sources.push(source);
    }

    let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
    Registry::from_sources(&sources)
        .with_context(|| format!("Failed to load datasets from {}", names.join(", ")))
}

/// Panel snapshot for the requested node and parameter tab. A node without
/// a dataset gives the empty panel.
pub fn panel_for(view: &ViewArgs, registry: &Registry, tree: &NavigationTree) -> PanelState {
    let state = PanelState::new().select_node(registry, &view.node);
    if state.node_id().is_none() {
        warn!("{}", missing_node_message(tree, &view.node));
        return state;
    }
    match view.parameter {
        Some(parameter) if state.is_technology() => state.select_parameter(registry, parameter),
        Some(parameter) => {
            warn!("{} is not a technology dataset, ignoring {}", view.node, parameter);
            state
        }
        None => state,
    }
}

/// Why `id` has nothing to show: a navigation leaf still waiting for data,
/// or an id the tree does not know.
pub fn missing_node_message(tree: &NavigationTree, id: &str) -> String {
    match (tree.find(id), tree.section_of(id)) {
        (Some(node), Some(section)) => {
            format!("{} ({}) in {} has no dataset", id, node.label, section.label())
        }
        _ => format!("Unknown node: {}", id),
    }
}

/// Line above the table: title, technology tab and chart type.
pub fn heading(state: &PanelState) -> String {
    if state.node_id().is_none() {
        return String::new();
    }
    let mut heading = state.title().to_string();
    if state.is_technology() {
        heading.push_str(&format!(" [{}]", state.parameter()));
    }
    heading.push_str(&format!(" ({})", state.chart_type().label()));
    heading
}

fn write_rows<W: io::Write>(
    state: &PanelState,
    mut wtr: csv::Writer<W>,
    columns: [&str; 2],
) -> anyhow::Result<()> {
    let years = state.years();

    let mut header = columns.to_vec();
    header.extend(years.iter().copied());
    wtr.write_record(&header)?;

    for row in state.rows() {
        let mut record = vec![row.indicator.clone(), row.unit.clone()];
        record.extend(
            years
                .iter()
                .map(|year| row.values.get(*year).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Tab-separated table: indicator, unit, then one column per year.
pub fn render_table(state: &PanelState) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(&mut buf);
    write_rows(state, wtr, ["指标", "单位"])?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_csv<W: io::Write>(state: &PanelState, writer: W) -> anyhow::Result<()> {
    write_rows(state, csv::Writer::from_writer(writer), ["indicator", "unit"])
}

/// Chart data printed by `chart`: the projection and its value axis.
#[derive(Debug, Serialize)]
pub struct ChartView {
    #[serde(flatten)]
    pub chart: ChartProjection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<(f64, f64)>,
}

impl ChartView {
    pub fn new(chart: ChartProjection) -> Self {
        let value_range = chart.value_range();
        Self { chart, value_range }
    }
}

pub fn run_show(view: &ViewArgs, format: OutputFormat) -> anyhow::Result<()> {
    let context = display_context(view)?;
    let registry = load_registry(view, &context)?;
    let tree = NavigationTree::builtin()?;
    let state = panel_for(view, &registry, &tree);

    match format {
        OutputFormat::Table => {
            println!("{}", context.caption());
            println!("{}", heading(&state));
            print!("{}", render_table(&state)?);
        }
        OutputFormat::Json => println!("{}", to_pretty_string(&state)?),
        OutputFormat::Csv => write_csv(&state, io::stdout().lock())?,
    }
    Ok(())
}

pub fn run_chart(view: &ViewArgs, chart_type: Option<ChartType>) -> anyhow::Result<()> {
    let context = display_context(view)?;
    let registry = load_registry(view, &context)?;
    let tree = NavigationTree::builtin()?;
    let mut state = panel_for(view, &registry, &tree);
    if let Some(chart_type) = chart_type {
        state = state.set_chart_type(chart_type);
    }
    println!("{}", to_pretty_string(&ChartView::new(state.chart()))?);
    Ok(())
}

/// Indented listing of the navigation tree, marking technology nodes and
/// leaves without a dataset.
pub fn render_tree(tree: &NavigationTree, registry: &Registry, sections: &[Section]) -> String {
    fn walk(out: &mut String, node: &TreeNode, depth: usize, registry: &Registry) {
        let marker = match registry.resolve(&node.id) {
            Some(dataset) if dataset.is_technology() => " [technology]",
            Some(_) => "",
            None if node.is_leaf() => " [no data]",
            None => "",
        };
        out.push_str(&format!("{}{}  {}{}\n", "  ".repeat(depth), node.id, node.label, marker));
        for child in &node.children {
            walk(out, child, depth + 1, registry);
        }
    }

    let mut out = String::new();
    for &section in sections {
        out.push_str(&format!("{} ({})\n", section.label(), section.key()));
        for root in tree.section(section) {
            walk(&mut out, root, 1, registry);
        }
    }
    out
}

pub fn run_nodes(section: Option<Section>, unresolved: bool) -> anyhow::Result<()> {
    let tree = NavigationTree::builtin()?;
    let registry = Registry::builtin()?;
    let sections: Vec<Section> = match section {
        Some(section) => vec![section],
        None => Section::ALL.to_vec(),
    };

    if unresolved {
        for (leaf_section, id) in tree.unresolved_leaves(&registry) {
            if sections.contains(&leaf_section) {
                println!("{}\t{}", leaf_section, id);
            }
        }
    } else {
        print!("{}", render_tree(&tree, &registry, &sections));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use esd_core::context::Scenario;
    use esd_core::technology::TechParameter;
    use std::path::PathBuf;

    fn view(node: &str) -> ViewArgs {
        ViewArgs {
            node: node.to_string(),
            parameter: None,
            province: "beijing".to_string(),
            scenario: Scenario::Cn60,
            results: false,
            datasets: None,
            data_dir: PathBuf::from("data/excel/json"),
        }
    }

    #[test]
    fn context_caption() {
        let context = display_context(&view("gdp")).unwrap();
        assert_eq!(context.caption(), "展示 北京 在 CN60碳中和 情景下的数据。");

        let mut bad = view("gdp");
        bad.province = "atlantis".to_string();
        assert!(display_context(&bad).is_err());
    }

    #[test]
    fn table_of_literal_node() {
        let registry = Registry::builtin().unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let state = panel_for(&view("gdp"), &registry, &tree);
        let table = render_table(&state).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("指标\t单位\t2025\t2030"));
        assert!(lines[1].starts_with("GDP\t十亿元\t4500\t5800"));
        assert_eq!(heading(&state), format!("GDP ({})", state.chart_type().label()));
    }

    #[test]
    fn parameter_tab_is_applied() {
        let registry = Registry::builtin().unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let mut args = view("ECHPCOA");
        args.parameter = Some(TechParameter::VariableOmCost);
        let state = panel_for(&args, &registry, &tree);
        assert!(heading(&state).contains("[ACT_COST]"));

        let mut buf = Vec::new();
        write_csv(&state, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.starts_with("indicator,unit,2025,2030"));
        assert!(csv.contains("可变运维成本,元/kWh,0.05,0.049"));
    }

    #[test]
    fn unknown_node_gives_empty_panel() {
        let registry = Registry::builtin().unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let state = panel_for(&view("nonexistent-node"), &registry, &tree);

        assert_eq!(state, PanelState::new());
        assert_eq!(heading(&state), "");
        assert_eq!(render_table(&state).unwrap(), "指标\t单位\n");

        let chart = serde_json::to_value(ChartView::new(state.chart())).unwrap();
        assert_eq!(chart, serde_json::json!({ "type": "empty" }));
    }

    #[test]
    fn missing_node_messages() {
        let tree = NavigationTree::builtin().unwrap();
        assert_eq!(
            missing_node_message(&tree, "CTL"),
            "CTL (煤制油) in 技术 has no dataset"
        );
        assert_eq!(
            missing_node_message(&tree, "nonexistent-node"),
            "Unknown node: nonexistent-node"
        );
    }

    #[test]
    fn chart_view_carries_value_range() {
        let registry = Registry::builtin().unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let state = panel_for(&view("gdp"), &registry, &tree).set_chart_type(ChartType::Line);

        let chart = serde_json::to_value(ChartView::new(state.chart())).unwrap();
        assert_eq!(chart["type"], "line");
        assert_eq!(chart["series"][0]["label"], "GDP");
        assert_eq!(chart["value_range"][0], 0.0);
        assert!(chart["value_range"][1].as_f64().unwrap() >= 5800.0);
    }

    #[test]
    fn dataset_file_overrides_samples() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("datasets.json");
        std::fs::write(
            &path,
            r#"{"gdp":{"title":"GDP (修订)","rows":[{"indicator":"GDP","unit":"十亿元","values":{"2025":4600}}]}}"#,
        )
        .unwrap();
        let mut args = view("gdp");
        args.datasets = Some(path);

        let context = display_context(&args).unwrap();
        let registry = load_registry(&args, &context).unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let state = panel_for(&args, &registry, &tree);

        assert_eq!(state.title(), "GDP (修订)");
        assert_eq!(state.rows()[0].numeric("2025"), Some(4600.0));
        assert!(registry.resolve("ECHPCOA").is_some());
    }

    #[test]
    fn missing_dataset_file_is_an_error() {
        let mut args = view("gdp");
        args.datasets = Some(PathBuf::from("/nonexistent/datasets.json"));
        let context = display_context(&args).unwrap();
        assert!(load_registry(&args, &context).is_err());
    }

    #[test]
    fn results_registry_reads_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("emissions.json"),
            r#"{"BEIJ":{"TOTAL":{"2020":1,"2025":0.876}}}"#,
        )
        .unwrap();
        let mut args = view("emissions-total");
        args.results = true;
        args.data_dir = dir.path().to_path_buf();

        let context = display_context(&args).unwrap();
        let registry = load_registry(&args, &context).unwrap();
        let tree = NavigationTree::builtin().unwrap();
        let state = panel_for(&args, &registry, &tree);

        assert_eq!(state.title(), "总排放");
        assert_eq!(state.years(), vec!["2025"]);
        assert_eq!(state.rows()[0].numeric("2025"), Some(0.88));
    }

    #[test]
    fn tree_marks_missing_data() {
        let tree = NavigationTree::builtin().unwrap();
        let registry = Registry::builtin().unwrap();
        let text = render_tree(&tree, &registry, &[Section::Transformation]);

        assert!(text.starts_with("技术 (transformation)\n"));
        assert!(text.contains("    ALK  ALK (碱性电解水制氢) [technology]\n"));
        assert!(text.contains("    CTL  煤制油 [no data]\n"));
    }
}
