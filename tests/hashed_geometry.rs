use std::collections::BTreeSet;
use std::sync::Arc;

use domhash::data::ic86;
use domhash::{
    extract_keys, AsymmetricIndexMatrix, CompactHashService, CompactIndex, HashedGeometry,
    HashedGeometryConfig, HashedGeometryReader, HashedGeometryWriter, ModuleKey, OmGeo, OmGeoMap,
    Position, PositionService, SymmetricIndexMatrix,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// --- Helpers ---

/// Random geometry inside a 1 km cube with unique keys
fn random_geometry(seed: u64, n_modules: usize) -> OmGeoMap {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut geometry = OmGeoMap::new();
    while geometry.len() < n_modules {
        let key = ModuleKey::new(rng.gen_range(1..=100), rng.gen_range(1..=64));
        let position = Position::new(
            rng.gen_range(-500.0..500.0),
            rng.gen_range(-500.0..500.0),
            rng.gen_range(-500.0..500.0),
        );
        geometry.insert(key, OmGeo::new(position));
    }
    geometry
}

fn in_ice_strings(strings: impl Fn(u16) -> bool) -> OmGeoMap {
    ic86::build_ic86_geometry()
        .into_iter()
        .filter(|(k, _)| ic86::is_in_ice(*k) && strings(k.string()))
        .collect()
}

// --- Hashing ---

#[test]
fn test_three_key_scenario() {
    let geometry: OmGeoMap = [(1, 1), (1, 2), (2, 1)]
        .into_iter()
        .map(|(s, om)| (ModuleKey::new(s, om), OmGeo::new(Position::default())))
        .collect();
    let hashed = HashedGeometry::new(&geometry).unwrap();
    let hasher = hashed.hash_service();

    assert_eq!(hasher.size(), 3);
    assert_eq!(hasher.index_of(ModuleKey::new(1, 1)).unwrap(), CompactIndex::new(0));
    assert_eq!(hasher.index_of(ModuleKey::new(1, 2)).unwrap(), CompactIndex::new(1));
    assert_eq!(hasher.index_of(ModuleKey::new(2, 1)).unwrap(), CompactIndex::new(2));
    assert_eq!(hasher.key_of(CompactIndex::new(2)).unwrap(), ModuleKey::new(2, 1));
}

#[test]
fn test_random_bijection() {
    for seed in 0..5 {
        let geometry = random_geometry(seed, 500);
        let hasher = CompactHashService::new(extract_keys(&geometry));

        let mut seen = BTreeSet::new();
        for &key in geometry.keys() {
            let index = hasher.index_of(key).unwrap();
            assert!(index.as_usize() < hasher.size());
            assert!(seen.insert(index));
            assert_eq!(hasher.key_of(index).unwrap(), key);
        }
        assert_eq!(seen.len(), hasher.size());
    }
}

// --- Services ---

#[test]
fn test_random_distances_within_bound() {
    let geometry = random_geometry(42, 300);
    let hashed = HashedGeometry::new(&geometry).unwrap();
    let distances = hashed.distance_service();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5_000 {
        let a = rng.gen_range(0..300u32);
        let b = rng.gen_range(0..300u32);
        let key_a = hashed.hash_service().key_of(CompactIndex::new(a)).unwrap();
        let key_b = hashed.hash_service().key_of(CompactIndex::new(b)).unwrap();

        let truth = geometry[&key_a].position.distance(&geometry[&key_b].position);
        let cached = distances.distance_of(key_a, key_b).unwrap();
        assert!((cached - truth).abs() <= 0.5, "{key_a}-{key_b}: {cached} vs {truth}");
        assert_eq!(cached, distances.distance_of(key_b, key_a).unwrap());
    }
}

#[test]
fn test_services_shared_across_threads() {
    let geometry = in_ice_strings(|s| (35..=37).contains(&s));
    let hashed = HashedGeometry::new(&geometry).unwrap();
    let n = hashed.hash_service().size() as u32;

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let distances = Arc::clone(hashed.distance_service());
            std::thread::spawn(move || {
                let mut total = 0.0;
                for a in (t..n).step_by(4) {
                    for b in 0..n {
                        total += distances.distance(CompactIndex::new(a), CompactIndex::new(b));
                    }
                }
                total
            })
        })
        .collect();
    let threaded: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let fresh = HashedGeometry::new(&geometry).unwrap();
    fresh.distance_service().hash_all_distances();
    let mut serial = 0.0;
    for a in 0..n {
        for b in 0..n {
            serial += fresh
                .distance_service()
                .distance(CompactIndex::new(a), CompactIndex::new(b));
        }
    }
    assert_eq!(threaded, serial);
}

#[test]
fn test_position_service_shared_hasher() {
    let geometry = ic86::build_ic86_geometry();
    let mut hasher = None;
    let positions = Arc::new(PositionService::from_geometry(&geometry, &mut hasher).unwrap());
    let hashed = HashedGeometry::from_position_service(positions);

    assert!(Arc::ptr_eq(hashed.hash_service(), &hasher.unwrap()));
    assert!(hashed.verify_against(&geometry));
}

#[test]
fn test_verify_on_build_default() {
    let geometry = ic86::build_ic86_geometry();
    let hashed = HashedGeometry::with_config(&geometry, &HashedGeometryConfig::default()).unwrap();
    assert!(hashed.verify_against(&geometry));

    let mut moved = geometry.clone();
    moved.get_mut(&ModuleKey::new(10, 10)).unwrap().position.x += 1.0;
    assert!(!hashed.verify_against(&moved));
}

// --- Matrices over hashed indices ---

#[test]
fn test_neighbour_matrix_from_predicate() {
    let geometry = in_ice_strings(|s| s == 36 || s == 37);
    let hashed = HashedGeometry::new(&geometry).unwrap();
    let distances = hashed.distance_service();
    let n = hashed.hash_service().size();

    let within = |a: usize, b: usize| {
        distances.distance(CompactIndex::from(a), CompactIndex::from(b)) <= 20.0
    };
    let neighbours = SymmetricIndexMatrix::from_fn(n, |a, b| within(a, b));

    for a in 0..n {
        for b in 0..n {
            assert_eq!(neighbours.get(a, b), within(a, b));
        }
    }
    // strings are 125 m apart: per string, 60 diagonal slots plus 59 adjacent pairs
    assert_eq!(neighbours.count_ones(), 2 * (60 + 59));
}

#[test]
fn test_non_commutative_predicate_order() {
    let n = 40;
    let sym = SymmetricIndexMatrix::from_fn(n, |a, b| a > b);
    let asym = AsymmetricIndexMatrix::from_fn(n, |a, b| a > b);

    for a in 0..n {
        for b in 0..n {
            // symmetric slots are evaluated as (larger, smaller)
            assert_eq!(sym.get(a, b), a != b);
            assert_eq!(asym.get(a, b), a > b);
        }
    }
}

// --- Persistence ---

#[test]
fn test_persisted_prewarmed_geometry() {
    let geometry = in_ice_strings(|s| s >= 79);
    let config = HashedGeometryConfig {
        prewarm_distances: true,
        verify_on_build: true,
    };
    let hashed = HashedGeometry::with_config(&geometry, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deepcore.domhash");
    HashedGeometryWriter::create(&path)
        .unwrap()
        .write(&hashed)
        .unwrap();

    let loaded = HashedGeometryReader::open(&path)
        .unwrap()
        .into_hashed_geometry()
        .unwrap();
    assert_eq!(loaded.hash_service().keys(), hashed.hash_service().keys());
    assert_eq!(
        loaded.distance_service().cached_count(),
        hashed.distance_service().cached_count()
    );
    assert!(loaded.verify_against(&geometry));

    let n = loaded.hash_service().size() as u32;
    for a in (0..n).step_by(17) {
        for b in 0..n {
            let (a, b) = (CompactIndex::new(a), CompactIndex::new(b));
            assert_eq!(
                loaded.distance_service().distance(a, b),
                hashed.distance_service().distance(a, b)
            );
        }
    }
}
