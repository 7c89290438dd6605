//! Lookups on the registry and technology parameter projection.

use esd_core::dataset::{Dataset, DatasetKind};
use esd_core::indicator::IndicatorRow;
use esd_core::technology::TechParameter;

use crate::error::ResolveError;
use crate::Registry;

impl Registry {
    /// Dataset bound to `node_id`. Unknown ids give `None`.
    pub fn resolve(&self, node_id: &str) -> Option<&Dataset> {
        self.datasets.get(node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.datasets.contains_key(node_id)
    }

    /// Technology datasets in node id order.
    pub fn technology_nodes(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.datasets
            .iter()
            .filter(|(_, d)| d.is_technology())
            .map(|(id, d)| (id.as_str(), d))
    }

    /// Rows shown for a node: literal rows, or the projection of `parameter`.
    pub fn rows_for(&self, node_id: &str, parameter: TechParameter) -> Option<Vec<IndicatorRow>> {
        self.resolve(node_id).map(|d| d.rows(parameter))
    }
}

/// Project one parameter of a technology dataset over the platform years.
///
/// `parameter_id` must be one of `EFF`, `AF`, `LIFETIME`, `NCAP_COST`,
/// `NCAP_FOM` or `ACT_COST`, spelled exactly.
pub fn project_technology_parameter(
    dataset: &Dataset,
    parameter_id: &str,
) -> Result<IndicatorRow, ResolveError> {
    let base = match &dataset.kind {
        DatasetKind::Technology { base, .. } => base,
        DatasetKind::Literal { .. } => return Err(ResolveError::NotTechnology(dataset.title.clone())),
    };
    let parameter = TechParameter::ALL
        .iter()
        .copied()
        .find(|p| p.id() == parameter_id)
        .ok_or_else(|| ResolveError::UnknownParameter(parameter_id.to_string()))?;
    Ok(base.project(parameter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esd_core::indicator::CellValue;
    use esd_core::year::PLATFORM_YEARS;

    fn registry() -> Registry {
        Registry::builtin().unwrap()
    }

    fn series(row: &IndicatorRow) -> Vec<f64> {
        PLATFORM_YEARS.iter().map(|y| row.numeric(y).unwrap()).collect()
    }

    #[test]
    fn resolves_known_nodes() {
        let registry = registry();
        let population = registry.resolve("population").unwrap();
        assert_eq!(population.title, "人口");
        assert!(!population.is_technology());
        assert!(registry.resolve("ECHPCOA").unwrap().is_technology());
        assert!(registry.contains("ALK"));
    }

    #[test]
    fn unknown_node_is_absent() {
        let registry = registry();
        assert!(registry.resolve("nonexistent-node").is_none());
        assert!(registry.resolve("").is_none());
        assert!(registry.rows_for("nonexistent-node", TechParameter::Efficiency).is_none());
    }

    #[test]
    fn efficiency_of_echpcoa() {
        let registry = registry();
        let row = project_technology_parameter(registry.resolve("ECHPCOA").unwrap(), "EFF").unwrap();
        assert_eq!(row.indicator, "效率");
        assert_eq!(row.unit, "%");
        assert_eq!(row.values["2025"], CellValue::Number(42.0));
        assert_eq!(row.values["2030"], CellValue::Number(44.1));
        assert!(row.covers_platform_years());
    }

    #[test]
    fn variable_cost_keeps_three_decimals() {
        let registry = registry();
        let row = project_technology_parameter(registry.resolve("ECHPCOA").unwrap(), "ACT_COST").unwrap();
        assert_eq!(row.unit, "元/kWh");
        assert_eq!(
            series(&row),
            vec![0.05, 0.049, 0.048, 0.047, 0.046, 0.045, 0.044, 0.043]
        );
    }

    #[test]
    fn cost_curves_decline_and_performance_improves() {
        let registry = registry();
        for (id, dataset) in registry.technology_nodes() {
            for (parameter, rising) in [("EFF", true), ("AF", true), ("NCAP_COST", false), ("NCAP_FOM", false)] {
                let values = series(&project_technology_parameter(dataset, parameter).unwrap());
                for pair in values.windows(2) {
                    if rising {
                        assert!(pair[1] >= pair[0], "{} {} {:?}", id, parameter, values);
                    } else {
                        assert!(pair[1] <= pair[0], "{} {} {:?}", id, parameter, values);
                    }
                }
            }
            let lifetime = series(&project_technology_parameter(dataset, "LIFETIME").unwrap());
            assert!(lifetime.iter().all(|v| *v == lifetime[0]));
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let registry = registry();
        let dataset = registry.resolve("PEM").unwrap();
        let first = project_technology_parameter(dataset, "NCAP_COST").unwrap();
        let second = project_technology_parameter(dataset, "NCAP_COST").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_arguments_are_errors() {
        let registry = registry();
        let gdp = registry.resolve("gdp").unwrap();
        assert_eq!(
            project_technology_parameter(gdp, "EFF"),
            Err(ResolveError::NotTechnology("GDP".to_string()))
        );

        let alk = registry.resolve("ALK").unwrap();
        assert_eq!(
            project_technology_parameter(alk, "SPEED"),
            Err(ResolveError::UnknownParameter("SPEED".to_string()))
        );
        assert!(project_technology_parameter(alk, "eff").is_err());
    }

    #[test]
    fn rows_for_literal_ignores_parameter() {
        let registry = registry();
        let by_eff = registry.rows_for("industry-structure", TechParameter::Efficiency).unwrap();
        let by_cost = registry.rows_for("industry-structure", TechParameter::CapitalCost).unwrap();
        assert_eq!(by_eff, by_cost);
        assert_eq!(by_eff.len(), 3);
    }
}
