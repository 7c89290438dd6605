//! The fixed year axes of the platform.

/// Years shown for every assumption, demand and technology dataset.
pub const PLATFORM_YEARS: [&str; 8] = [
    "2025", "2030", "2035", "2040", "2045", "2050", "2055", "2060",
];

/// Years carried by model results, which also report the 2020 base year.
pub const RESULT_YEARS: [&str; 9] = [
    "2020", "2025", "2030", "2035", "2040", "2045", "2050", "2055", "2060",
];

/// First year reported for emissions, new capacity and hydrogen results.
pub const FIRST_PROJECTION_YEAR: i32 = 2025;

/// Check if a year key belongs to the platform year sequence
pub fn is_platform_year(year: &str) -> bool {
    PLATFORM_YEARS.contains(&year)
}

/// Whether `year` parses as a calendar year no earlier than `floor`.
///
/// Keys that are not integers are never kept.
pub fn is_at_or_after(year: &str, floor: i32) -> bool {
    year.trim().parse::<i32>().map(|y| y >= floor).unwrap_or(false)
}
