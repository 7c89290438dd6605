use serde::{Deserialize, Serialize};

use crate::chart_type::ChartType;
use crate::indicator::IndicatorRow;
use crate::technology::{BaseParams, TechParameter};

/// What a dataset holds: literal rows, or a technology whose rows are
/// projected from base parameters on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetKind {
    Literal { rows: Vec<IndicatorRow> },
    Technology { code: String, base: BaseParams },
}

/// A renderable dataset bound to one navigation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_chart_type: Option<ChartType>,
    #[serde(flatten)]
    pub kind: DatasetKind,
}

impl Dataset {
    pub fn literal(title: impl Into<String>, rows: Vec<IndicatorRow>) -> Self {
        Self {
            title: title.into(),
            default_chart_type: None,
            kind: DatasetKind::Literal { rows },
        }
    }

    pub fn technology(title: impl Into<String>, code: impl Into<String>, base: BaseParams) -> Self {
        Self {
            title: title.into(),
            default_chart_type: None,
            kind: DatasetKind::Technology {
                code: code.into(),
                base,
            },
        }
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.default_chart_type = Some(chart_type);
        self
    }

    pub fn is_technology(&self) -> bool {
        matches!(self.kind, DatasetKind::Technology { .. })
    }

    /// Chart type to show when the dataset is first selected.
    pub fn initial_chart_type(&self) -> ChartType {
        self.default_chart_type.unwrap_or_default()
    }

    /// Rows to display: the literal rows, or the projection of `parameter`
    /// for a technology.
    pub fn rows(&self, parameter: TechParameter) -> Vec<IndicatorRow> {
        match &self.kind {
            DatasetKind::Literal { rows } => rows.clone(),
            DatasetKind::Technology { base, .. } => vec![base.project(parameter)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseParams {
        BaseParams {
            efficiency: 100.0,
            availability_factor: 18.0,
            lifetime: 25.0,
            capital_cost: 5000.0,
            fixed_om_cost: 150.0,
            variable_om_cost: 0.01,
        }
    }

    #[test]
    fn technology_rows_follow_parameter() {
        let pv = Dataset::technology("EPLTSOLPV (太阳能光伏)", "EPLTSOLPV", base());
        assert!(pv.is_technology());
        let rows = pv.rows(TechParameter::AvailabilityFactor);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].indicator, "可用系数");
        assert_eq!(rows[0].numeric("2060"), Some(20.2));
    }

    #[test]
    fn literal_rows_ignore_parameter() {
        let gdp = Dataset::literal(
            "GDP",
            vec![IndicatorRow::new("GDP", "十亿元").with_value("2025", 4500.0)],
        )
        .with_chart_type(ChartType::Bar);
        assert!(!gdp.is_technology());
        assert_eq!(gdp.initial_chart_type(), ChartType::Bar);
        assert_eq!(
            gdp.rows(TechParameter::Lifetime),
            gdp.rows(TechParameter::Efficiency)
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let pv = Dataset::technology("PV", "EPLTSOLPV", base());
        let value = serde_json::to_value(&pv).unwrap();
        assert_eq!(value["kind"], "technology");
        assert_eq!(value["code"], "EPLTSOLPV");
        assert!(value.get("default_chart_type").is_none());

        let back: Dataset = serde_json::from_value(value).unwrap();
        assert_eq!(back, pv);
    }
}
