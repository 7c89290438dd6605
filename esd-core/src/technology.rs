//! Technology parameters and their projection curves.
//!
//! A technology dataset stores six base scalars. Each parameter tab expands
//! its scalar into a full platform-year series by multiplying with a fixed
//! curve: efficiency and availability improve over time, costs follow a
//! learning-curve decline, lifetime stays flat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use esd_utils::numeric::round_half_up;

use crate::error::ParseError;
use crate::indicator::IndicatorRow;
use crate::year::PLATFORM_YEARS;

const EFFICIENCY_CURVE: [f64; 8] = [1.00, 1.05, 1.10, 1.15, 1.18, 1.20, 1.22, 1.25];
const AVAILABILITY_CURVE: [f64; 8] = [1.00, 1.02, 1.04, 1.06, 1.08, 1.10, 1.11, 1.12];
const FLAT_CURVE: [f64; 8] = [1.0; 8];
const CAPITAL_COST_CURVE: [f64; 8] = [1.00, 0.95, 0.90, 0.85, 0.80, 0.75, 0.72, 0.70];
const OM_COST_CURVE: [f64; 8] = [1.00, 0.98, 0.96, 0.94, 0.92, 0.90, 0.88, 0.85];

/// One of the six parameter tabs of a technology dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TechParameter {
    #[default]
    #[serde(rename = "EFF")]
    Efficiency,
    #[serde(rename = "AF")]
    AvailabilityFactor,
    #[serde(rename = "LIFETIME")]
    Lifetime,
    #[serde(rename = "NCAP_COST")]
    CapitalCost,
    #[serde(rename = "NCAP_FOM")]
    FixedOmCost,
    #[serde(rename = "ACT_COST")]
    VariableOmCost,
}

impl TechParameter {
    /// Tab order.
    pub const ALL: [TechParameter; 6] = [
        TechParameter::Efficiency,
        TechParameter::AvailabilityFactor,
        TechParameter::Lifetime,
        TechParameter::CapitalCost,
        TechParameter::FixedOmCost,
        TechParameter::VariableOmCost,
    ];

    /// Model identifier of the parameter (e.g. `"NCAP_COST"`).
    pub fn id(&self) -> &'static str {
        match self {
            TechParameter::Efficiency => "EFF",
            TechParameter::AvailabilityFactor => "AF",
            TechParameter::Lifetime => "LIFETIME",
            TechParameter::CapitalCost => "NCAP_COST",
            TechParameter::FixedOmCost => "NCAP_FOM",
            TechParameter::VariableOmCost => "ACT_COST",
        }
    }

    /// Indicator label of the projected row.
    pub fn label(&self) -> &'static str {
        match self {
            TechParameter::Efficiency => "效率",
            TechParameter::AvailabilityFactor => "可用系数",
            TechParameter::Lifetime => "寿期",
            TechParameter::CapitalCost => "投资成本",
            TechParameter::FixedOmCost => "固定运维成本",
            TechParameter::VariableOmCost => "可变运维成本",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            TechParameter::Efficiency => "%",
            TechParameter::AvailabilityFactor => "%",
            TechParameter::Lifetime => "年",
            TechParameter::CapitalCost => "元/kW",
            TechParameter::FixedOmCost => "元/kW/年",
            TechParameter::VariableOmCost => "元/kWh",
        }
    }

    /// Multipliers applied to the base value, one per platform year.
    pub fn curve(&self) -> &'static [f64; 8] {
        match self {
            TechParameter::Efficiency => &EFFICIENCY_CURVE,
            TechParameter::AvailabilityFactor => &AVAILABILITY_CURVE,
            TechParameter::Lifetime => &FLAT_CURVE,
            TechParameter::CapitalCost => &CAPITAL_COST_CURVE,
            TechParameter::FixedOmCost | TechParameter::VariableOmCost => &OM_COST_CURVE,
        }
    }

    /// Decimal places kept in the projected series.
    ///
    /// Variable O&M costs are fractions of a yuan per kWh and keep three
    /// places; everything else keeps one.
    pub fn decimals(&self) -> u32 {
        match self {
            TechParameter::VariableOmCost => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for TechParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TechParameter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        TechParameter::ALL
            .iter()
            .copied()
            .find(|p| p.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| ParseError::Parameter(s.to_string()))
    }
}

/// The six base scalars of a technology, valid for 2025.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseParams {
    /// Conversion efficiency (%)
    pub efficiency: f64,
    /// Availability factor (%)
    pub availability_factor: f64,
    /// Technical lifetime (years)
    pub lifetime: f64,
    /// Investment cost (元/kW)
    pub capital_cost: f64,
    /// Fixed O&M cost (元/kW/年)
    pub fixed_om_cost: f64,
    /// Variable O&M cost (元/kWh)
    pub variable_om_cost: f64,
}

impl BaseParams {
    /// Base scalar feeding the given parameter's curve.
    pub fn base(&self, parameter: TechParameter) -> f64 {
        match parameter {
            TechParameter::Efficiency => self.efficiency,
            TechParameter::AvailabilityFactor => self.availability_factor,
            TechParameter::Lifetime => self.lifetime,
            TechParameter::CapitalCost => self.capital_cost,
            TechParameter::FixedOmCost => self.fixed_om_cost,
            TechParameter::VariableOmCost => self.variable_om_cost,
        }
    }

    /// Expand one parameter into a full platform-year row.
    pub fn project(&self, parameter: TechParameter) -> IndicatorRow {
        let base = self.base(parameter);
        let places = parameter.decimals();
        PLATFORM_YEARS
            .iter()
            .zip(parameter.curve().iter())
            .fold(
                IndicatorRow::new(parameter.label(), parameter.unit()),
                |row, (year, multiplier)| {
                    row.with_value(*year, round_half_up(base * multiplier, places))
                },
            )
    }
}
