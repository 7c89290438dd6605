//! Model result datasets for one province.
//!
//! Reads the category files written by the model (and the aggregated
//! `nation.json` for the national view) and shapes them into the literal
//! datasets of the results panel: display units, two-decimal values,
//! projection years only where the base year is not reported, and no rows
//! that are empty or entirely zero.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use esd_core::category::{Category, NATION};
use esd_core::context::Province;
use esd_core::dataset::Dataset;
use esd_core::indicator::{CellValue, IndicatorRow};
use esd_core::year::{is_at_or_after, FIRST_PROJECTION_YEAR, RESULT_YEARS};
use esd_data::national::leaf_value;
use esd_data::OUTPUT_FILE_NAME;
use esd_utils::numeric::round_half_up;
use serde_json::{Map, Value};

use crate::error::{RegistryError, Result};
use crate::source::DataSource;

/// Decimal places shown for result values.
pub const RESULT_DECIMALS: u32 = 2;

/// Result node ids with their titles, in panel order.
pub const RESULT_NODES: [(&str, &str); 9] = [
    ("emissions-supply", "供应排放"),
    ("emissions-end-use", "终端排放"),
    ("emissions-total", "总排放"),
    ("power-generation-mix", "发电结构"),
    ("installed-power-capacity", "电力装机"),
    ("new-power-capacity", "新增电力装机"),
    ("power-investment", "电力投资"),
    ("primary-energy-supply", "一次能源供应"),
    ("hydrogen-supply", "氢能供应"),
];

/// Power technologies shared by generation, capacity and investment results.
const POWER_INDICATORS: [(&str, &str); 12] = [
    ("coal", "煤"),
    ("coal ccs", "煤CCS"),
    ("oil", "油"),
    ("gas", "气"),
    ("gas ccs", "气CCS"),
    ("nuclear", "核电"),
    ("hydro", "水电"),
    ("biomass", "生物质"),
    ("biomass ccs", "生物质CCS"),
    ("co-firing beccs", "生物质与煤混烧 (BECCS)"),
    ("wind", "风电"),
    ("pv", "太阳能"),
];

const PRIMARY_ENERGY_INDICATORS: [(&str, &str); 8] = [
    ("Coal", "煤炭"),
    ("Oil", "石油"),
    ("Gas", "天然气"),
    ("Nuclear", "核能"),
    ("Hydro", "水电"),
    ("Biomass", "生物质"),
    ("Wind", "风电"),
    ("PV", "太阳能"),
];

/// Primary energy carriers reported together with their `"<key> CCS"` twin.
const MERGED_WITH_CCS: [&str; 4] = ["Coal", "Oil", "Gas", "Biomass"];

const HYDROGEN_INDICATORS: [(&str, &str); 4] = [
    ("ELC", "电解水制氢"),
    ("solar", "太阳能制氢"),
    ("onshore", "陆上风电制氢"),
    ("offshore", "海上风电制氢"),
];

/// Display unit for a model unit label.
pub fn display_unit(unit: &str) -> &str {
    match unit {
        "亿吨 CO₂" => "亿吨",
        "亿千瓦时" => "TWh",
        "吉瓦" => "GW",
        "万吨标准煤" => "万吨标煤",
        other => other,
    }
}

/// Result datasets of one province, read from a model output directory.
#[derive(Debug, Clone)]
pub struct ResultSource {
    data_dir: PathBuf,
    province_code: String,
}

impl ResultSource {
    pub fn new(data_dir: impl Into<PathBuf>, province: &Province) -> Self {
        Self::for_code(data_dir, province.code)
    }

    /// Source for a raw model province code such as `"BEIJ"` or `"NATION"`.
    pub fn for_code(data_dir: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            province_code: code.into(),
        }
    }

    pub fn province_code(&self) -> &str {
        &self.province_code
    }

    /// Sub-category table of this province for one category. The national
    /// view prefers `nation.json` and falls back to the category file's own
    /// `NATION` entry.
    fn entry(&self, category: Category, nation: Option<&Value>) -> Result<Map<String, Value>> {
        let aggregated = nation
            .and_then(|doc| doc.get(NATION))
            .and_then(|n| n.get(category.key()))
            .and_then(Value::as_object);
        if let Some(found) = aggregated {
            return Ok(found.clone());
        }

        let document = read_json(&self.data_dir.join(category.file_name()))?;
        Ok(document
            .as_ref()
            .and_then(|doc| doc.get(&self.province_code))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }
}

impl DataSource for ResultSource {
    fn name(&self) -> &str {
        "model results"
    }

    fn load(&self) -> Result<BTreeMap<String, Dataset>> {
        let nation = if self.province_code == NATION {
            read_json(&self.data_dir.join(OUTPUT_FILE_NAME))?
        } else {
            None
        };
        let nation = nation.as_ref();

        let emissions = self.entry(Category::Emissions, nation)?;
        let elc_mix = self.entry(Category::ElcMix, nation)?;
        let cap = self.entry(Category::Cap, nation)?;
        let new_cap = self.entry(Category::NewCap, nation)?;
        let inv = self.entry(Category::Inv, nation)?;
        let pe = self.entry(Category::Pe, nation)?;
        let h2n = self.entry(Category::H2n, nation)?;

        let floor = Some(FIRST_PROJECTION_YEAR);
        let emission_row = |indicator: &str, key: &str| {
            vec![build_row(indicator, "亿吨 CO₂", emissions.get(key), floor)]
        };

        let rows: [Vec<IndicatorRow>; 9] = [
            emission_row("供应排放量", "SUPPLY"),
            emission_row("终端排放量", "FE"),
            emission_row("总排放量", "TOTAL"),
            mapped_rows(&elc_mix, &POWER_INDICATORS, "亿千瓦时", None),
            mapped_rows(&cap, &POWER_INDICATORS, "吉瓦", None),
            mapped_rows(&new_cap, &POWER_INDICATORS, "吉瓦", floor),
            mapped_rows(&inv, &POWER_INDICATORS, "亿元", None),
            primary_energy_rows(&pe),
            mapped_rows(&h2n, &HYDROGEN_INDICATORS, "万吨", floor),
        ];

        let datasets: BTreeMap<String, Dataset> = RESULT_NODES
            .iter()
            .zip(rows)
            .map(|((id, title), rows)| (id.to_string(), Dataset::literal(*title, rows)))
            .collect();
        log::info!(
            "[ESD] results: Built {} result datasets for {}",
            datasets.len(),
            Province::name_for_code(&self.province_code)
        );
        Ok(datasets)
    }
}

/// Read a JSON document, treating a missing file as absent.
fn read_json(path: &Path) -> Result<Option<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("[ESD] results: {} not found", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| RegistryError::Parse {
            origin: path.display().to_string(),
            source,
        })
}

/// One display cell. Numbers are rounded; `null` is dropped; an empty
/// object becomes an empty cell; anything else is kept as text.
fn cell(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(|v| CellValue::Number(round_half_up(v, RESULT_DECIMALS))),
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Object(map) if map.is_empty() => Some(CellValue::Text(String::new())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn build_row(indicator: &str, unit: &str, series: Option<&Value>, floor: Option<i32>) -> IndicatorRow {
    let mut row = IndicatorRow::new(indicator, display_unit(unit));
    if let Some(years) = series.and_then(Value::as_object) {
        for (year, value) in years {
            if floor.map_or(true, |f| is_at_or_after(year, f)) {
                if let Some(cell) = cell(value) {
                    row.values.insert(year.clone(), cell);
                }
            }
        }
    }
    row
}

fn is_displayable(row: &IndicatorRow) -> bool {
    !row.values.is_empty() && row.has_nonzero_value()
}

fn mapped_rows(
    entry: &Map<String, Value>,
    indicators: &[(&str, &str)],
    unit: &str,
    floor: Option<i32>,
) -> Vec<IndicatorRow> {
    indicators
        .iter()
        .map(|(key, indicator)| build_row(indicator, unit, entry.get(*key), floor))
        .filter(is_displayable)
        .collect()
}

fn primary_energy_rows(entry: &Map<String, Value>) -> Vec<IndicatorRow> {
    let number = |key: &str, year: &str| -> f64 {
        entry
            .get(key)
            .and_then(|series| series.get(year))
            .and_then(leaf_value)
            .unwrap_or(0.0)
    };

    PRIMARY_ENERGY_INDICATORS
        .iter()
        .map(|(key, indicator)| {
            if MERGED_WITH_CCS.contains(key) {
                let ccs = format!("{} CCS", key);
                let merged: Map<String, Value> = RESULT_YEARS
                    .iter()
                    .map(|year| (year.to_string(), Value::from(number(key, year) + number(&ccs, year))))
                    .collect();
                build_row(indicator, "万吨标准煤", Some(&Value::Object(merged)), None)
            } else {
                build_row(indicator, "万吨标准煤", entry.get(*key), None)
            }
        })
        .filter(is_displayable)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use crate::SampleSource;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        fs::write(dir.path().join(name), body).unwrap();
    }

    fn load(dir: &TempDir, code: &str) -> BTreeMap<String, Dataset> {
        ResultSource::for_code(dir.path(), code).load().unwrap()
    }

    fn rows(datasets: &BTreeMap<String, Dataset>, id: &str) -> Vec<IndicatorRow> {
        datasets[id].rows(Default::default())
    }

    #[test]
    fn emissions_keep_projection_years() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "emissions.json",
            r#"{"BEIJ":{"SUPPLY":{"2020":1.0,"2025":1.234,"2030":2},"TOTAL":{"2025":3.456}}}"#,
        );

        let datasets = load(&dir, "BEIJ");

        let supply = &rows(&datasets, "emissions-supply")[0];
        assert_eq!(supply.indicator, "供应排放量");
        assert_eq!(supply.unit, "亿吨");
        assert_eq!(supply.years().collect::<Vec<_>>(), vec!["2025", "2030"]);
        assert_eq!(supply.values["2025"], CellValue::Number(1.23));
        assert_eq!(rows(&datasets, "emissions-total")[0].numeric("2025"), Some(3.46));
        // single row even without data
        let end_use = rows(&datasets, "emissions-end-use");
        assert_eq!(end_use.len(), 1);
        assert!(end_use[0].values.is_empty());
        assert_eq!(datasets["emissions-end-use"].title, "终端排放");
    }

    #[test]
    fn power_rows_drop_zero_series() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "elc_mix.json",
            r#"{"BEIJ":{"coal":{"2020":10.456,"2025":8},"gas":{"2025":0,"2030":0},"pv":{"2025":"n/a"},"geothermal":{"2025":4}},
                "TIAN":{"wind":{"2025":7}}}"#,
        );

        let mix = rows(&load(&dir, "BEIJ"), "power-generation-mix");

        let indicators: Vec<&str> = mix.iter().map(|r| r.indicator.as_str()).collect();
        assert_eq!(indicators, vec!["煤", "太阳能"]);
        assert_eq!(mix[0].unit, "TWh");
        assert_eq!(mix[0].values["2020"], CellValue::Number(10.46));
        assert_eq!(mix[1].values["2025"], CellValue::Text("n/a".to_string()));
    }

    #[test]
    fn new_capacity_and_hydrogen_start_in_2025() {
        let dir = TempDir::new().unwrap();
        write(&dir, "newcap.json", r#"{"SHAN":{"wind":{"2020":5,"2025":6}}}"#);
        write(
            &dir,
            "h2n.json",
            r#"{"SHAN":{"ELC":{"2020":1,"2030":2},"offshore":{"2020":3}}}"#,
        );
        write(&dir, "cap.json", r#"{"SHAN":{"wind":{"2020":5,"2025":6}}}"#);

        let datasets = load(&dir, "SHAN");

        let new_cap = rows(&datasets, "new-power-capacity");
        assert_eq!(new_cap[0].unit, "GW");
        assert_eq!(new_cap[0].years().collect::<Vec<_>>(), vec!["2025"]);

        let cap = rows(&datasets, "installed-power-capacity");
        assert_eq!(cap[0].years().collect::<Vec<_>>(), vec!["2020", "2025"]);

        let hydrogen = rows(&datasets, "hydrogen-supply");
        assert_eq!(hydrogen.len(), 1);
        assert_eq!(hydrogen[0].indicator, "电解水制氢");
        assert_eq!(hydrogen[0].unit, "万吨");
    }

    #[test]
    fn primary_energy_merges_ccs() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pe.json",
            r#"{"HEBE":{"Coal":{"2020":100,"2025":90},"Coal CCS":{"2025":5.25},"Nuclear":{"2025":3},"Oil":{}}}"#,
        );

        let pe = rows(&load(&dir, "HEBE"), "primary-energy-supply");

        let indicators: Vec<&str> = pe.iter().map(|r| r.indicator.as_str()).collect();
        assert_eq!(indicators, vec!["煤炭", "核能"]);
        let coal = &pe[0];
        assert_eq!(coal.unit, "万吨标煤");
        assert_eq!(coal.values.len(), RESULT_YEARS.len());
        assert_eq!(coal.numeric("2020"), Some(100.0));
        assert_eq!(coal.numeric("2025"), Some(95.25));
        assert_eq!(coal.numeric("2060"), Some(0.0));
    }

    #[test]
    fn nation_prefers_aggregate_and_falls_back_to_category_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            OUTPUT_FILE_NAME,
            r#"{"NATION":{"cap":{"coal":{"2025":30.0}}}}"#,
        );
        write(
            &dir,
            "cap.json",
            r#"{"BEIJ":{"coal":{"2025":10}},"NATION":{"coal":{"2025":999}}}"#,
        );
        write(&dir, "inv.json", r#"{"NATION":{"nuclear":{"2025":12.5}}}"#);

        let datasets = ResultSource::new(dir.path(), &esd_core::context::NATION_PROVINCE)
            .load()
            .unwrap();

        assert_eq!(rows(&datasets, "installed-power-capacity")[0].numeric("2025"), Some(30.0));
        let inv = rows(&datasets, "power-investment");
        assert_eq!(inv[0].indicator, "核电");
        assert_eq!(inv[0].unit, "亿元");
    }

    #[test]
    fn missing_files_give_empty_datasets() {
        let dir = TempDir::new().unwrap();
        let datasets = load(&dir, "BEIJ");

        assert_eq!(datasets.len(), RESULT_NODES.len());
        assert!(rows(&datasets, "power-generation-mix").is_empty());
        assert!(rows(&datasets, "hydrogen-supply").is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "cap.json", "{ not json");
        let err = ResultSource::for_code(dir.path(), "BEIJ").load().unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
        assert!(err.to_string().contains("cap.json"));
    }

    #[test]
    fn combines_with_sample_registry() {
        let dir = TempDir::new().unwrap();
        let results = ResultSource::for_code(dir.path(), "BEIJ");
        let registry = Registry::from_sources(&[&SampleSource, &results]).unwrap();

        assert!(registry.resolve("emissions-total").is_some());
        assert!(registry.resolve("gdp").is_some());
        assert_eq!(registry.len(), 62 + RESULT_NODES.len());
    }

    #[test]
    fn display_units() {
        assert_eq!(display_unit("亿吨 CO₂"), "亿吨");
        assert_eq!(display_unit("亿千瓦时"), "TWh");
        assert_eq!(display_unit("吉瓦"), "GW");
        assert_eq!(display_unit("万吨标准煤"), "万吨标煤");
        assert_eq!(display_unit("亿元"), "亿元");
    }
}
