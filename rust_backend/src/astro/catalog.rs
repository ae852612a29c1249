//! Standard deep-drilling-field positions.

use crate::core::domain::SkyPosition;

/// Names of the standard fields, in the order they are scheduled by default.
pub const STANDARD_FIELDS: [&str; 5] = ["ELAISS1", "XMM_LSS", "ECDFS", "COSMOS", "EDFS_a"];

/// Look up the position of a standard deep-drilling field by name.
pub fn ddf_location(name: &str) -> Option<SkyPosition> {
    let (ra, dec) = match name {
        "ELAISS1" => (9.45, -44.0),
        "XMM_LSS" => (35.708333, -4.0 - 45.0 / 60.0),
        "ECDFS" => (53.125, -28.0 - 6.0 / 60.0),
        "COSMOS" => (150.1, 2.0 + 10.0 / 60.0 + 55.0 / 3600.0),
        "EDFS_a" => (58.90, -49.315),
        "EDFS_b" => (63.6, -47.60),
        _ => return None,
    };
    Some(SkyPosition::new(ra, dec))
}

/// Name of the linked partner of a pair member (`EDFS_a` -> `EDFS_b`).
pub fn linked_partner_name(name: &str) -> Option<String> {
    name.strip_suffix("_a").map(|stem| format!("{}_b", stem))
}
