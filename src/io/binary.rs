//! # Hashed Geometry Persistence
//!
//! Saves a `HashedGeometry` with whatever distances it has cached, so a later
//! run can start without the geometry snapshot or recomputing distances.
//!
//! Format:
//! - [Magic 8 bytes] "DOMHASH1"
//! - [Version u32 LE]
//! - [N u32 LE] (number of hashed modules)
//! - [Metadata Length u64 LE]
//! - [Metadata JSON] (key table, positions in index order)
//! - [Distance Cache] (N(N+1)/2 × u16 LE, symmetric linear order, 0 = unset)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use crate::data::storage::triangular;
use crate::data::{Position, SymmetricIndexMatrix};
use crate::services::{CompactHashService, DistanceService, HashedGeometry, PositionService};

const MAGIC: &[u8; 8] = b"DOMHASH1";
const VERSION: u32 = 1;
/// Magic + version + N + metadata length
const HEADER_LEN: usize = 8 + 4 + 4 + 8;

/// Metadata stored in the JSON header
#[derive(Serialize, Deserialize)]
struct Metadata {
    keys: CompactHashService,
    positions: Vec<Position>,
}

/// Hashed geometry writer
pub struct HashedGeometryWriter {
    writer: BufWriter<File>,
}

impl HashedGeometryWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Write keys, positions and the current distance cache
    pub fn write(&mut self, hashed: &HashedGeometry) -> Result<()> {
        let n_modules = hashed.hash_service().size();
        let n_modules_u32 = u32::try_from(n_modules).context("Too many modules for format")?;

        let metadata = Metadata {
            keys: (**hashed.hash_service()).clone(),
            positions: hashed.position_service().positions().to_vec(),
        };
        let metadata_json = serde_json::to_vec(&metadata)?;

        self.writer.write_all(MAGIC)?;
        self.writer.write_all(&VERSION.to_le_bytes())?;
        self.writer.write_all(&n_modules_u32.to_le_bytes())?;
        self.writer.write_all(&(metadata_json.len() as u64).to_le_bytes())?;
        self.writer.write_all(&metadata_json)?;

        let cache = hashed.distance_service().cache_snapshot();
        for dist in cache.slots() {
            self.writer.write_all(&dist.to_le_bytes())?;
        }

        self.writer.flush()?;
        tracing::debug!(
            n_modules,
            n_cached = hashed.distance_service().cached_count(),
            "wrote hashed geometry"
        );
        Ok(())
    }
}

/// Hashed geometry reader
pub struct HashedGeometryReader {
    metadata: Metadata,
    distances: Vec<u16>,
}

impl HashedGeometryReader {
    /// Open and validate a hashed geometry file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        // SAFETY: the map is read once here and dropped before returning
        let mmap = unsafe { Mmap::map(&file).context("Failed to mmap file")? };

        if mmap.len() < HEADER_LEN || &mmap[0..8] != MAGIC {
            anyhow::bail!("Invalid file format or magic");
        }

        let version = u32::from_le_bytes(mmap[8..12].try_into()?);
        if version != VERSION {
            anyhow::bail!("Unsupported version: {}", version);
        }

        let n_modules = u32::from_le_bytes(mmap[12..16].try_into()?) as usize;
        let metadata_len = u64::from_le_bytes(mmap[16..24].try_into()?) as usize;
        let metadata_end = HEADER_LEN
            .checked_add(metadata_len)
            .context("Metadata length overflows")?;

        let metadata_bytes = mmap
            .get(HEADER_LEN..metadata_end)
            .context("File truncated inside metadata")?;
        let metadata: Metadata =
            serde_json::from_slice(metadata_bytes).context("Failed to parse metadata")?;

        if n_modules != metadata.keys.size() {
            anyhow::bail!(
                "Header module count ({}) does not match metadata ({})",
                n_modules,
                metadata.keys.size()
            );
        }

        let cache_bytes = &mmap[metadata_end..];
        let expected = triangular(n_modules) * 2;
        if cache_bytes.len() != expected {
            anyhow::bail!(
                "Distance cache holds {} bytes, {} expected for {} modules",
                cache_bytes.len(),
                expected,
                n_modules
            );
        }
        let distances = cache_bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();

        Ok(Self {
            metadata,
            distances,
        })
    }

    /// Number of hashed modules in the file
    pub fn n_modules(&self) -> usize {
        self.metadata.keys.size()
    }

    /// Rebuild the services, distance cache included
    pub fn into_hashed_geometry(self) -> Result<HashedGeometry> {
        let n_modules = self.n_modules();
        let hasher = Arc::new(self.metadata.keys);
        let positions = Arc::new(PositionService::from_parts(hasher, self.metadata.positions)?);
        let cache = SymmetricIndexMatrix::from_store(n_modules, self.distances)?;
        let distances = Arc::new(DistanceService::with_cache(Arc::clone(&positions), cache)?);

        tracing::debug!(n_modules, "loaded hashed geometry");
        Ok(HashedGeometry::from_services(positions, distances))
    }
}
