//! The geographic dataset: regions, their cities, and facts.
//!
//! Data is read once, validated, and then shared read-only between the
//! session and the controller. The JSON shape is:
//!
//! ```text
//! {
//!   "regions": {
//!     "CO": {
//!       "name": "Colorado", "group": "mountain", "capital": "Denver",
//!       "boundary": [[-109.05, 41.0], ...],
//!       "cities": { "Denver": [-104.99, 39.74], ... },
//!       "facts": { "Denver": "...", ... }
//!     }
//!   },
//!   "territories": {
//!     "DC": { "name": "Washington DC", "group": "northeast", "boundary": [...] }
//!   }
//! }
//! ```

mod region;

pub use region::{CityName, GeoCoord, Region, RegionId, Territory};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, Error as _, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{DatasetError, DatasetResult};

/// Dataset bundled into the binary.
const BUILTIN_JSON: &str = include_str!("../data/regions.json");

/// Name shown for clicks on areas the dataset does not know.
pub const UNKNOWN_TERRITORY: &str = "unknown territory";

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(deserialize_with = "unique_keys")]
    regions: BTreeMap<RegionId, RawRegion>,
    #[serde(default, deserialize_with = "unique_keys")]
    territories: BTreeMap<RegionId, RawTerritory>,
}

/// Read a JSON object into a map, failing on a repeated key instead of
/// keeping the last value.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<RegionId, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = BTreeMap<RegionId, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map keyed by region id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((id, value)) = access.next_entry::<RegionId, V>()? {
                if map.contains_key(&id) {
                    return Err(A::Error::custom(format!("duplicate region id {id:?}")));
                }
                map.insert(id, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    name: String,
    #[serde(default)]
    group: String,
    capital: CityName,
    boundary: Vec<GeoCoord>,
    cities: BTreeMap<CityName, GeoCoord>,
    #[serde(default)]
    facts: BTreeMap<CityName, String>,
}

#[derive(Debug, Deserialize)]
struct RawTerritory {
    name: String,
    #[serde(default)]
    group: String,
    boundary: Vec<GeoCoord>,
}

/// Validated, immutable game data.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    regions: Vec<Region>,
    territories: Vec<Territory>,
}

impl Dataset {
    /// The dataset embedded in the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded file itself is broken.
    pub fn builtin() -> DatasetResult<Self> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Load and validate a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            regions = dataset.regions.len(),
            territories = dataset.territories.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse and validate a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the data fails validation.
    pub fn from_json(text: &str) -> DatasetResult<Self> {
        let raw: RawDataset = serde_json::from_str(text)?;

        let regions = raw
            .regions
            .into_iter()
            .map(|(id, r)| Region {
                id,
                name: r.name,
                group: r.group,
                capital: r.capital,
                boundary: r.boundary,
                cities: r.cities,
                facts: r.facts,
            })
            .collect();
        let territories = raw
            .territories
            .into_iter()
            .map(|(id, t)| Territory {
                id,
                name: t.name,
                group: t.group,
                boundary: t.boundary,
            })
            .collect();

        Self::new(regions, territories)
    }

    /// Build a dataset from already-constructed parts.
    ///
    /// Regions keep the order given; that order is the selector's index order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data fails validation.
    pub fn new(regions: Vec<Region>, territories: Vec<Territory>) -> DatasetResult<Self> {
        let dataset = Self {
            regions,
            territories,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> DatasetResult<()> {
        if self.regions.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut seen = HashSet::new();
        let ids = self
            .regions
            .iter()
            .map(|r| &r.id)
            .chain(self.territories.iter().map(|t| &t.id));
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(DatasetError::DuplicateId(id.clone()));
            }
        }

        for region in &self.regions {
            if region.cities.is_empty() {
                return Err(DatasetError::NoCities(region.id.clone()));
            }
            if !region.cities.contains_key(&region.capital) {
                return Err(DatasetError::MissingCapital {
                    region: region.id.clone(),
                    capital: region.capital.clone(),
                });
            }
            check_ring(&region.id, &region.boundary)?;
            for coord in region.cities.values() {
                check_coord(&region.id, *coord)?;
            }
            for city in region.city_names() {
                if region.fact(city).is_none() {
                    warn!(region = %region.id, city, "city has no fact");
                }
            }
        }

        for territory in &self.territories {
            check_ring(&territory.id, &territory.boundary)?;
        }

        Ok(())
    }

    /// All playable regions, in selector order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Clickable areas that are never targets.
    #[must_use]
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Number of playable regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always false for a validated dataset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Look up a playable region.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Position of a region in selector order.
    #[must_use]
    pub fn region_index(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    /// Display name for any clickable id, regions first, then territories.
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.region(id).map(|r| r.name.as_str()).or_else(|| {
            self.territories
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.name.as_str())
        })
    }

    /// Group tag for any clickable id.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&str> {
        self.region(id).map(|r| r.group.as_str()).or_else(|| {
            self.territories
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.group.as_str())
        })
    }

    /// Every boundary vertex, used to fit the projection to the whole map.
    pub fn boundary_points(&self) -> impl Iterator<Item = GeoCoord> + '_ {
        self.regions
            .iter()
            .flat_map(|r| r.boundary.iter().copied())
            .chain(self.territories.iter().flat_map(|t| t.boundary.iter().copied()))
    }
}

fn check_coord(id: &str, coord: GeoCoord) -> DatasetResult<()> {
    if coord.is_valid() {
        Ok(())
    } else {
        Err(DatasetError::CoordinateOutOfRange {
            id: id.to_string(),
            lon: coord.lon,
            lat: coord.lat,
        })
    }
}

fn check_ring(id: &str, ring: &[GeoCoord]) -> DatasetResult<()> {
    if ring.len() < 3 {
        return Err(DatasetError::DegenerateBoundary {
            id: id.to_string(),
            vertices: ring.len(),
        });
    }
    ring.iter().try_for_each(|c| check_coord(id, *c))
}
