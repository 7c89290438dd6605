//! Summation of province entries into national totals.

use esd_core::category::{SubcategoryTable, NATION};
use esd_utils::numeric::{parse_lenient, round_half_up};
use log::debug;
use serde_json::{Map, Value};

/// Numeric contribution of one leaf value.
///
/// Numbers count as themselves and numeric strings are parsed leniently
/// (`"12.5"` counts as 12.5). Anything else (`null`, `"---"`, objects)
/// contributes nothing.
pub fn leaf_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_lenient(s),
        _ => None,
    }
}

/// Sum every province of a category document into one sub-category table.
///
/// Every `(sub-category, year)` pair seen in any province appears in the
/// result, with a total of zero if none of its values were numeric. An
/// existing `NATION` entry is not a province and is left out of the sum.
/// Entries that are not objects are skipped.
pub fn sum_provinces(provinces: &Map<String, Value>) -> SubcategoryTable {
    let mut national = SubcategoryTable::new();

    for (province, entry) in provinces {
        if province == NATION {
            debug!("Skipping existing {} entry", NATION);
            continue;
        }
        let subcategories = match entry.as_object() {
            Some(map) => map,
            None => {
                debug!("Skipping non-object entry for province {}", province);
                continue;
            }
        };

        for (subcategory, years) in subcategories {
            let series = national.entry(subcategory.clone()).or_default();
            let years = match years.as_object() {
                Some(map) => map,
                None => continue,
            };
            for (year, value) in years {
                let total = series.entry(year.clone()).or_insert(0.0);
                if let Some(v) = leaf_value(value) {
                    *total += v;
                }
            }
        }
    }

    national
}

/// National totals for the emissions category.
///
/// Emissions are summed exactly like every other category.
pub fn sum_emissions(provinces: &Map<String, Value>) -> SubcategoryTable {
    sum_provinces(provinces)
}

/// Round every value of the table to `places` decimals, halves away from zero.
pub fn round_table(table: &mut SubcategoryTable, places: u32) {
    for series in table.values_mut() {
        for value in series.values_mut() {
            *value = round_half_up(*value, places);
        }
    }
}
