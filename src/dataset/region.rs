//! Region, territory, and coordinate types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Region identifier (the abbreviation, e.g. `"CO"`).
pub type RegionId = String;

/// City name as it appears in the dataset.
pub type CityName = String;

/// A geographic coordinate in degrees.
///
/// Serialized as a `[lon, lat]` pair, the order GeoJSON uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoCoord {
    /// Longitude, east positive.
    pub lon: f64,
    /// Latitude, north positive.
    pub lat: f64,
}

impl GeoCoord {
    /// Create a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that this is a real longitude/latitude pair.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for GeoCoord {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoCoord> for [f64; 2] {
    fn from(coord: GeoCoord) -> Self {
        [coord.lon, coord.lat]
    }
}

/// A playable region: the unit the player finds on the map first.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Abbreviation, unique across the dataset.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Group tag used to style the region (e.g. `"mountain"`).
    pub group: String,
    /// Name of the capital; always a key of `cities`.
    pub capital: CityName,
    /// Outer boundary ring.
    pub boundary: Vec<GeoCoord>,
    /// Known cities and their locations.
    pub cities: BTreeMap<CityName, GeoCoord>,
    /// One fact per city, shown after a guess and used as the clue in fact mode.
    pub facts: BTreeMap<CityName, String>,
}

impl Region {
    /// Location of a city in this region.
    #[must_use]
    pub fn city(&self, name: &str) -> Option<GeoCoord> {
        self.cities.get(name).copied()
    }

    /// Fact text for a city, if the dataset has one.
    #[must_use]
    pub fn fact(&self, name: &str) -> Option<&str> {
        self.facts.get(name).map(String::as_str)
    }

    /// City names in stable (sorted) order.
    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }
}

/// A clickable area that is never a target, such as a federal district.
///
/// Carrying these in the dataset lets a wrong click on them report a proper
/// name instead of a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    /// Identifier, unique across regions and territories.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Group tag used for styling.
    pub group: String,
    /// Outer boundary ring.
    pub boundary: Vec<GeoCoord>,
}
