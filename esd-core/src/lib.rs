pub mod category;
pub mod chart_type;
pub mod context;
pub mod dataset;
pub mod error;
pub mod indicator;
pub mod technology;
pub mod year;
