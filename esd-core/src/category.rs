//! Category files and the national aggregate document.
//!
//! A category file holds one measured quantity for every province:
//! `province -> sub-category -> year -> value`. The aggregator folds the
//! provinces of each file into one synthetic `NATION` entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Key of the synthetic all-province entry.
pub const NATION: &str = "NATION";

/// Year key to value.
pub type YearSeries = BTreeMap<String, f64>;

/// Sub-category key (e.g. `"coal"`) to its year series.
pub type SubcategoryTable = BTreeMap<String, YearSeries>;

/// The aggregator output: `{ "NATION": { <category>: { <sub>: { <year>: n } } } }`.
///
/// Maps are ordered so that serializing the same totals always produces the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedDocument {
    #[serde(rename = "NATION")]
    pub nation: BTreeMap<String, SubcategoryTable>,
}

impl CombinedDocument {
    /// National totals for one category key, if it was aggregated.
    pub fn category(&self, key: &str) -> Option<&SubcategoryTable> {
        self.nation.get(key)
    }
}

/// The fixed set of category files produced by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Resource,
    ElcMix,
    Cap,
    ElcTrans,
    Emissions,
    Pe,
    NewCap,
    H2n,
    Inv,
}

impl Category {
    /// All categories, in the order they are aggregated.
    pub const ALL: [Category; 9] = [
        Category::Resource,
        Category::ElcMix,
        Category::Cap,
        Category::ElcTrans,
        Category::Emissions,
        Category::Pe,
        Category::NewCap,
        Category::H2n,
        Category::Inv,
    ];

    /// Key used in the combined document (the file stem).
    pub fn key(&self) -> &'static str {
        match self {
            Category::Resource => "resource",
            Category::ElcMix => "elc_mix",
            Category::Cap => "cap",
            Category::ElcTrans => "elc_trans",
            Category::Emissions => "emissions",
            Category::Pe => "pe",
            Category::NewCap => "newcap",
            Category::H2n => "h2n",
            Category::Inv => "inv",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Category::Resource => "resource.json",
            Category::ElcMix => "elc_mix.json",
            Category::Cap => "cap.json",
            Category::ElcTrans => "elc_trans.json",
            Category::Emissions => "emissions.json",
            Category::Pe => "pe.json",
            Category::NewCap => "newcap.json",
            Category::H2n => "h2n.json",
            Category::Inv => "inv.json",
        }
    }

    /// Chinese title printed next to the exported file.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Resource => "资源上限",
            Category::ElcMix => "发电结构",
            Category::Cap => "电力装机",
            Category::ElcTrans => "电力传输",
            Category::Emissions => "排放",
            Category::Pe => "一次能源",
            Category::NewCap => "新增装机",
            Category::H2n => "氢能供应",
            Category::Inv => "电力投资",
        }
    }

    /// File names of every category, in aggregation order.
    pub fn default_file_names() -> Vec<String> {
        Category::ALL.iter().map(|c| c.file_name().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = category_key(s);
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .ok_or_else(|| ParseError::Category(s.to_string()))
    }
}

/// Combined-document key for a category file name: its base name without
/// the `.json` extension.
///
/// `"cap.json"` and `"data/cap.json"` both give `"cap"`.
pub fn category_key(file_name: &str) -> &str {
    let base = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);
    base.strip_suffix(".json").unwrap_or(base)
}
