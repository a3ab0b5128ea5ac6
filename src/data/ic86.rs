//! # IC86 Reference Detector
//!
//! Topology predicates for the 86-string configuration and an idealised
//! geometry builder. The geometry is what tests and benchmarks hash: it has
//! the real key layout and realistic distances, without needing a GCD file.
//!
//! Idealisation:
//! - hexagonal string grid centred on string 36, major axis along x
//! - 125 m inter-string spacing
//! - OM 30 on regular strings sits at z = 0, modules spaced 17 m
//! - DeepCore strings: OMs 1-10 spaced 10 m below z = 190 m,
//!   OMs 11-60 spaced 7 m from z = -160 m downwards
//! - IceTop tanks (OM 61-64) straight above strings 1-81 at the surface

use crate::data::geometry::{OmGeo, OmGeoMap, OmType};
use crate::data::{ModuleKey, Position};

/// Inter-string spacing (m)
const STRING_SPACING: f64 = 125.0;
/// OM spacing on regular strings (m)
const VSPACING_IC: f64 = 17.0;
/// OM spacing in the DeepCore veto cap (m)
const VSPACING_DC_TOP: f64 = 10.0;
/// OM spacing in the DeepCore fiducial region (m)
const VSPACING_DC_BOTTOM: f64 = 7.0;
/// Height of the ice surface above the detector centre (m)
const Z_SURFACE: f64 = 1948.0;
/// OM number resting in the z = 0 plane
const OM_ZERO: f64 = 30.0;
/// Depth reference of OM 1 on DeepCore strings
const DC_VETO: f64 = 190.0;
/// Depth of OM 11 on DeepCore strings
const DC_INFILL: f64 = -160.0;

/// Hexagon rows of regular strings: (row offset in y units, first x in x units, string count)
const IC_ROWS: [(f64, f64, u16); 10] = [
    (-4.0, -3.0, 6),
    (-3.0, -3.5, 7),
    (-2.0, -4.0, 8),
    (-1.0, -4.5, 9),
    (0.0, -5.0, 10),
    (1.0, -4.5, 10),
    (2.0, -4.0, 9),
    (3.0, -3.5, 8),
    (4.0, -3.0, 7),
    (5.0, -2.5, 4),
];

/// DeepCore infill strings 79-86 in units of a third of the regular grid
const DC_STRINGS: [(f64, f64); 8] = [
    (-0.5, -1.0),
    (0.5, -1.0),
    (0.0, 2.0),
    (1.5, 1.0),
    (1.5, -1.0),
    (0.0, -2.0),
    (-1.5, -1.0),
    (-1.5, 1.0),
];

pub fn is_ice_top(key: ModuleKey) -> bool {
    (1..=81).contains(&key.string()) && (61..=64).contains(&key.om())
}

pub fn is_in_ice(key: ModuleKey) -> bool {
    (1..=86).contains(&key.string()) && (1..=60).contains(&key.om())
}

/// Module of the regular (non-DeepCore) array
pub fn is_ice_cube(key: ModuleKey) -> bool {
    (1..=78).contains(&key.string()) && (1..=60).contains(&key.om())
}

pub fn is_deep_core(key: ModuleKey) -> bool {
    (79..=86).contains(&key.string()) && (1..=60).contains(&key.om())
}

pub fn is_deep_core_top(key: ModuleKey) -> bool {
    (79..=86).contains(&key.string()) && (1..=10).contains(&key.om())
}

pub fn is_deep_core_bottom(key: ModuleKey) -> bool {
    (79..=86).contains(&key.string()) && (11..=60).contains(&key.om())
}

/// Strings surrounding the DeepCore infill that also count as dense
fn is_dense_ic_string(string: u16) -> bool {
    matches!(string, 26 | 27 | 35 | 36 | 37 | 45 | 46)
}

/// Densely instrumented fiducial volume
pub fn is_deep_core_fiducial(key: ModuleKey) -> bool {
    is_deep_core_bottom(key) || (is_dense_ic_string(key.string()) && (40..=60).contains(&key.om()))
}

/// Dense veto cap above the fiducial volume
pub fn is_deep_core_cap(key: ModuleKey) -> bool {
    is_deep_core_top(key) || (is_dense_ic_string(key.string()) && (20..=25).contains(&key.om()))
}

pub fn is_deep_core_dense(key: ModuleKey) -> bool {
    is_deep_core_fiducial(key) || is_deep_core_cap(key)
}

/// Horizontal (x, y) position of every string, index 0 = string 1
fn string_positions() -> Vec<(f64, f64)> {
    let x_ic = STRING_SPACING;
    let y_ic = STRING_SPACING * (3.0f64 / 4.0).sqrt();

    let mut positions = Vec::with_capacity(86);
    for &(row, x_start, count) in IC_ROWS.iter() {
        for s in 0..count {
            positions.push(((x_start + s as f64) * x_ic, row * y_ic));
        }
    }
    for &(x, y) in DC_STRINGS.iter() {
        positions.push((x * x_ic / 3.0, y * y_ic / 3.0));
    }
    positions
}

/// Build the idealised IC86 geometry (5160 in-ice modules, 324 IceTop tanks)
pub fn build_ic86_geometry() -> OmGeoMap {
    let mut geometry = OmGeoMap::new();

    for (i, &(x, y)) in string_positions().iter().enumerate() {
        let string = i as u16 + 1;

        for om in 1..=60u16 {
            let z = if string <= 78 {
                (OM_ZERO - om as f64) * VSPACING_IC
            } else if om <= 10 {
                DC_VETO - om as f64 * VSPACING_DC_TOP
            } else {
                DC_INFILL - (om - 11) as f64 * VSPACING_DC_BOTTOM
            };
            geometry.insert(ModuleKey::new(string, om), OmGeo::new(Position::new(x, y, z)));
        }

        if string <= 81 {
            for om in 61..=64u16 {
                geometry.insert(
                    ModuleKey::new(string, om),
                    OmGeo::new(Position::new(x, y, Z_SURFACE)).with_type(OmType::IceTop),
                );
            }
        }
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_size() {
        let geo = build_ic86_geometry();
        assert_eq!(geo.len(), 86 * 60 + 81 * 4);
        assert_eq!(geo.keys().filter(|&&k| is_in_ice(k)).count(), 5160);
        assert_eq!(geo.keys().filter(|&&k| is_ice_top(k)).count(), 324);
    }

    #[test]
    fn test_centre_string() {
        let geo = build_ic86_geometry();
        let om30 = geo[&ModuleKey::new(36, 30)].position;
        assert_eq!(om30, Position::new(0.0, 0.0, 0.0));

        let om31 = geo[&ModuleKey::new(36, 31)].position;
        assert_eq!(om31, Position::new(0.0, 0.0, -17.0));
    }

    #[test]
    fn test_string_spacing() {
        let geo = build_ic86_geometry();
        let a = geo[&ModuleKey::new(36, 30)].position;
        let b = geo[&ModuleKey::new(37, 30)].position;
        assert!((a.distance(&b) - STRING_SPACING).abs() < 1e-9);

        // neighbour across hexagon rows
        let c = geo[&ModuleKey::new(46, 30)].position;
        assert!((a.distance(&c) - STRING_SPACING).abs() < 1e-9);
    }

    #[test]
    fn test_deep_core_depths() {
        let geo = build_ic86_geometry();
        assert_eq!(geo[&ModuleKey::new(80, 1)].position.z, 180.0);
        assert_eq!(geo[&ModuleKey::new(80, 11)].position.z, -160.0);
        assert_eq!(geo[&ModuleKey::new(80, 12)].position.z, -167.0);
    }

    #[test]
    fn test_ice_top_tanks() {
        let geo = build_ic86_geometry();
        let tank = geo[&ModuleKey::new(81, 61)];
        assert_eq!(tank.om_type, OmType::IceTop);
        assert_eq!(tank.position.z, Z_SURFACE);
        assert!(!geo.contains_key(&ModuleKey::new(82, 61)));
    }

    #[test]
    fn test_topology_predicates() {
        assert!(is_ice_cube(ModuleKey::new(1, 1)));
        assert!(!is_ice_cube(ModuleKey::new(79, 1)));
        assert!(is_deep_core_top(ModuleKey::new(79, 10)));
        assert!(is_deep_core_bottom(ModuleKey::new(79, 11)));
        assert!(is_deep_core_fiducial(ModuleKey::new(36, 45)));
        assert!(is_deep_core_cap(ModuleKey::new(36, 22)));
        assert!(!is_deep_core_dense(ModuleKey::new(1, 45)));
        assert!(is_ice_top(ModuleKey::new(1, 61)));
        assert!(!is_in_ice(ModuleKey::new(1, 61)));
    }
}
