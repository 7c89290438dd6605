//! Presentation layer of a dataset panel.
//!
//! [`PanelState`] is an immutable snapshot of what the panel shows: the
//! selected node, its rows, the active technology parameter, the chart type
//! and the cell being edited. Every user action returns a new snapshot, and
//! [`ChartProjection`] derives chart data from a snapshot without drawing.

pub mod chart;
pub mod error;
pub mod state;

pub use chart::ChartProjection;
pub use error::EditError;
pub use state::{CellRef, PanelState};
