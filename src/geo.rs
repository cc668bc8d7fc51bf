//! Geographic projection and hit testing.
//!
//! - [`GeoProjector`] turns lon/lat into map-space points for one viewport size
//! - [`ScreenBounds`] boxes projected geometry for camera fitting
//! - [`HitTester`] resolves a map-space point to the region under it

mod bounds;
mod hit;
mod projection;

pub use bounds::{ScreenBounds, ScreenPoint};
pub use hit::{point_in_polygon, HitTester, Shape};
pub use projection::{ConicParams, GeoDomain, GeoProjector};
