//! Chart data derived from table rows.
//!
//! The x axis is the first row's years in ascending order. Cells are read
//! numerically; text that does not parse (including an empty cell being
//! edited) counts as zero.

use esd_core::chart_type::ChartType;
use esd_core::indicator::{CellValue, IndicatorRow};
use esd_utils::numeric::round_half_up;
use serde::Serialize;

/// One row drawn as a line, a bar group or a stack layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub unit: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the total in whole percent; zero when the total is zero.
    pub percent: f64,
}

/// Stack totals of one year. Positive and negative segments stack away
/// from zero separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedColumn {
    pub year: String,
    pub positive: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartProjection {
    /// No rows to draw
    Empty,
    Line {
        years: Vec<String>,
        series: Vec<Series>,
    },
    Bar {
        years: Vec<String>,
        series: Vec<Series>,
    },
    /// Shares of the last year
    Pie {
        year: Option<String>,
        total: f64,
        slices: Vec<PieSlice>,
    },
    Stacked {
        years: Vec<String>,
        series: Vec<Series>,
        columns: Vec<StackedColumn>,
    },
}

/// Numeric reading of a cell for charting.
pub fn chart_value(cell: Option<&CellValue>) -> f64 {
    cell.and_then(CellValue::as_f64).unwrap_or(0.0)
}

impl ChartProjection {
    pub fn project(chart_type: ChartType, rows: &[IndicatorRow]) -> Self {
        let first = match rows.first() {
            Some(row) => row,
            None => return ChartProjection::Empty,
        };
        let years: Vec<String> = first.years().map(str::to_string).collect();
        let series: Vec<Series> = rows
            .iter()
            .map(|row| Series {
                label: row.indicator.clone(),
                unit: row.unit.clone(),
                values: years.iter().map(|y| chart_value(row.values.get(y))).collect(),
            })
            .collect();

        match chart_type {
            ChartType::Line => ChartProjection::Line { years, series },
            ChartType::Bar => ChartProjection::Bar { years, series },
            ChartType::Pie => {
                let year = years.last().cloned();
                let slices: Vec<(String, f64)> = series
                    .into_iter()
                    .map(|s| (s.label, s.values.last().copied().unwrap_or(0.0)))
                    .collect();
                let total: f64 = slices.iter().map(|(_, v)| v).sum();
                let slices = slices
                    .into_iter()
                    .map(|(label, value)| PieSlice {
                        label,
                        value,
                        percent: if total == 0.0 {
                            0.0
                        } else {
                            round_half_up(value / total * 100.0, 0)
                        },
                    })
                    .collect();
                ChartProjection::Pie { year, total, slices }
            }
            ChartType::Stacked => {
                let columns = years
                    .iter()
                    .enumerate()
                    .map(|(i, year)| {
                        let (positive, negative) = series.iter().map(|s| s.values[i]).fold(
                            (0.0, 0.0),
                            |(pos, neg), v| {
                                if v > 0.0 {
                                    (pos + v, neg)
                                } else {
                                    (pos, neg + v)
                                }
                            },
                        );
                        StackedColumn {
                            year: year.clone(),
                            positive,
                            negative,
                        }
                    })
                    .collect();
                ChartProjection::Stacked {
                    years,
                    series,
                    columns,
                }
            }
        }
    }

    pub fn chart_type(&self) -> Option<ChartType> {
        match self {
            ChartProjection::Empty => None,
            ChartProjection::Line { .. } => Some(ChartType::Line),
            ChartProjection::Bar { .. } => Some(ChartType::Bar),
            ChartProjection::Pie { .. } => Some(ChartType::Pie),
            ChartProjection::Stacked { .. } => Some(ChartType::Stacked),
        }
    }

    /// Value axis extent, always including zero. Stacked charts span the
    /// stack totals rather than single values. Pie charts have no axis.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        match self {
            ChartProjection::Line { series, .. } | ChartProjection::Bar { series, .. } => {
                Some(extent(series.iter().flat_map(|s| s.values.iter().copied())))
            }
            ChartProjection::Stacked { columns, .. } => {
                Some(extent(columns.iter().flat_map(|c| [c.positive, c.negative])))
            }
            ChartProjection::Pie { .. } | ChartProjection::Empty => None,
        }
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(indicator: &str, values: &[(&str, f64)]) -> IndicatorRow {
        values
            .iter()
            .fold(IndicatorRow::new(indicator, "%"), |r, (y, v)| r.with_value(*y, *v))
    }

    fn structure() -> Vec<IndicatorRow> {
        vec![
            row("第一产业", &[("2030", 2.3), ("2025", 2.5)]),
            row("第二产业", &[("2025", 25.0), ("2030", 23.0)]),
            row("第三产业", &[("2025", 72.5), ("2030", 74.7)]),
        ]
    }

    #[test]
    fn line_series_follow_first_row_years() {
        match ChartProjection::project(ChartType::Line, &structure()) {
            ChartProjection::Line { years, series } => {
                assert_eq!(years, vec!["2025", "2030"]);
                assert_eq!(series.len(), 3);
                assert_eq!(series[0].values, vec![2.5, 2.3]);
                assert_eq!(series[2].label, "第三产业");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn text_cells_are_read_numerically() {
        let rows = vec![IndicatorRow::new("GDP", "十亿元")
            .with_value("2025", "3.")
            .with_value("2030", "")
            .with_value("2035", "-")];
        match ChartProjection::project(ChartType::Bar, &rows) {
            ChartProjection::Bar { series, .. } => assert_eq!(series[0].values, vec![3.0, 0.0, 0.0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pie_uses_last_year() {
        match ChartProjection::project(ChartType::Pie, &structure()) {
            ChartProjection::Pie { year, total, slices } => {
                assert_eq!(year.as_deref(), Some("2030"));
                assert_eq!(total, 2.3 + 23.0 + 74.7);
                let percents: Vec<f64> = slices.iter().map(|s| s.percent).collect();
                assert_eq!(percents, vec![2.0, 23.0, 75.0]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pie_with_zero_total() {
        let rows = vec![row("a", &[("2025", 0.0)]), row("b", &[("2025", 0.0)])];
        match ChartProjection::project(ChartType::Pie, &rows) {
            ChartProjection::Pie { total, slices, .. } => {
                assert_eq!(total, 0.0);
                assert!(slices.iter().all(|s| s.percent == 0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stacked_splits_positive_and_negative() {
        let rows = vec![
            row("发电", &[("2025", 10.0), ("2030", 12.0)]),
            row("储能", &[("2025", -3.0), ("2030", 4.0)]),
            row("外送", &[("2025", -2.0), ("2030", -1.0)]),
        ];
        let chart = ChartProjection::project(ChartType::Stacked, &rows);
        match &chart {
            ChartProjection::Stacked { columns, .. } => {
                assert_eq!(columns[0].positive, 10.0);
                assert_eq!(columns[0].negative, -5.0);
                assert_eq!(columns[1].positive, 16.0);
                assert_eq!(columns[1].negative, -1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(chart.value_range(), Some((-5.0, 16.0)));
    }

    #[test]
    fn value_range_includes_zero() {
        let rows = vec![row("a", &[("2025", 5.0), ("2030", 8.0)])];
        let chart = ChartProjection::project(ChartType::Line, &rows);
        assert_eq!(chart.value_range(), Some((0.0, 8.0)));
        assert_eq!(chart.chart_type(), Some(ChartType::Line));
    }

    #[test]
    fn no_rows_is_empty() {
        for chart_type in ChartType::ALL {
            let chart = ChartProjection::project(chart_type, &[]);
            assert_eq!(chart, ChartProjection::Empty);
            assert_eq!(chart.value_range(), None);
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let chart = ChartProjection::project(ChartType::Bar, &[row("a", &[("2025", 1.0)])]);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["years"][0], "2025");
    }
}
