//! Fuel/technology carrier allow-lists.
//!
//! The source model tags every generator and storage unit with a carrier
//! string. The converter splits them into three fixed populations:
//! dispatchable plants, hydro storage (converted as generators), and
//! variable renewables (only emitted in full-dispatch mode).

/// Conventional dispatchable plants kept in the static generator table.
pub const DISPATCHABLE: &[&str] = &["CCGT", "oil", "lignite", "coal", "nuclear", "biomass"];

/// Storage carriers converted as generator-like units.
pub const HYDRO_STORAGE: &[&str] = &["hydro"];

/// Variable renewables whose available capacity is a time series.
pub const RENEWABLE: &[&str] = &[
    "ror",
    "solar-hsat",
    "solar",
    "onwind",
    "offwind-ac",
    "offwind-dc",
    "offwind-float",
];

pub fn is_dispatchable(carrier: &str) -> bool {
    DISPATCHABLE.contains(&carrier)
}

pub fn is_hydro_storage(carrier: &str) -> bool {
    HYDRO_STORAGE.contains(&carrier)
}

pub fn is_renewable(carrier: &str) -> bool {
    RENEWABLE.contains(&carrier)
}
