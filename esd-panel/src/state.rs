//! Panel state snapshots.
//!
//! A `PanelState` is never mutated in place. Each transition borrows the
//! current snapshot and returns the next one, so a caller can keep the
//! previous snapshot (for undo, or to compare) at no risk.

use esd_core::chart_type::ChartType;
use esd_core::indicator::{CellValue, IndicatorRow};
use esd_core::technology::TechParameter;
use esd_registry::Registry;
use esd_utils::numeric::is_numeric_input;
use serde::Serialize;

use crate::chart::ChartProjection;
use crate::error::EditError;

/// Address of one table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub row: usize,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PanelState {
    node_id: Option<String>,
    title: String,
    parameter: TechParameter,
    chart_type: ChartType,
    rows: Vec<IndicatorRow>,
    editing: Option<CellRef>,
    is_technology: bool,
}

impl PanelState {
    /// Nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parameter(&self) -> TechParameter {
        self.parameter
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn editing(&self) -> Option<&CellRef> {
        self.editing.as_ref()
    }

    pub fn is_technology(&self) -> bool {
        self.is_technology
    }

    /// Table columns: the first row's years.
    pub fn years(&self) -> Vec<&str> {
        self.rows.first().map(|r| r.years().collect()).unwrap_or_default()
    }

    /// Show `node_id`.
    ///
    /// Reselecting the current node keeps the snapshot as is. Any other node
    /// starts fresh: no edit in progress, its default chart type, and for a
    /// technology the efficiency tab. Unknown ids give an empty panel.
    pub fn select_node(&self, registry: &Registry, node_id: &str) -> Self {
        if self.node_id.as_deref() == Some(node_id) {
            return self.clone();
        }
        let dataset = match registry.resolve(node_id) {
            Some(dataset) => dataset,
            None => {
                log::debug!("[ESD] panel: No dataset for node {}", node_id);
                return Self::default();
            }
        };

        let parameter = TechParameter::default();
        Self {
            node_id: Some(node_id.to_string()),
            title: dataset.title.clone(),
            parameter,
            chart_type: dataset.initial_chart_type(),
            rows: dataset.rows(parameter),
            editing: None,
            is_technology: dataset.is_technology(),
        }
    }

    /// Switch the technology parameter tab. Reprojects from the registry, so
    /// edits made on the previous tab are dropped. No-op for literal datasets.
    pub fn select_parameter(&self, registry: &Registry, parameter: TechParameter) -> Self {
        if !self.is_technology {
            return self.clone();
        }
        let rows = self
            .node_id
            .as_deref()
            .and_then(|id| registry.rows_for(id, parameter));
        match rows {
            Some(rows) => Self {
                parameter,
                rows,
                editing: None,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Mark a cell as being edited.
    pub fn begin_edit(&self, row: usize, year: &str) -> Result<Self, EditError> {
        self.check_cell(row, year)?;
        Ok(Self {
            editing: Some(CellRef {
                row,
                year: year.to_string(),
            }),
            ..self.clone()
        })
    }

    pub fn end_edit(&self) -> Self {
        Self {
            editing: None,
            ..self.clone()
        }
    }

    /// Store typed text in a cell.
    ///
    /// Accepts partial numbers such as `""`, `"-"` or `"3."` and keeps them
    /// as text; anything else is rejected.
    pub fn edit_cell(&self, row: usize, year: &str, text: &str) -> Result<Self, EditError> {
        if !is_numeric_input(text) {
            return Err(EditError::NotNumeric(text.to_string()));
        }
        self.check_cell(row, year)?;

        let mut next = self.clone();
        next.rows[row]
            .values
            .insert(year.to_string(), CellValue::Text(text.to_string()));
        next.editing = Some(CellRef {
            row,
            year: year.to_string(),
        });
        Ok(next)
    }

    /// Change the chart type. Rows are untouched.
    pub fn set_chart_type(&self, chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..self.clone()
        }
    }

    /// Chart data for the current rows and chart type.
    pub fn chart(&self) -> ChartProjection {
        ChartProjection::project(self.chart_type, &self.rows)
    }

    fn check_cell(&self, row: usize, year: &str) -> Result<(), EditError> {
        if row >= self.rows.len() {
            return Err(EditError::RowOutOfRange {
                row,
                rows: self.rows.len(),
            });
        }
        if !self.years().contains(&year) {
            return Err(EditError::UnknownYear(year.to_string()));
        }
        Ok(())
    }
}
