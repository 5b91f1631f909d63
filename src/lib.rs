//! Shop registration and nearest-shop search.
//!
//! The core is [`ranker`]: given a reference [`GeoPoint`] and a list of
//! [`Candidate`]s it returns them ordered by haversine distance, nearest
//! first, with ties kept in input order. [`ShopDirectory`] supplies the
//! candidates and [`report`] renders results.

pub mod error;
pub mod geo;
pub mod logging;
pub mod ranker;
pub mod report;
pub mod shops;

pub use error::{Axis, CoordinateError, ReportError, ShopError};
pub use geo::{distance, parse_coordinate, parse_point, validate_point, GeoPoint, EARTH_RADIUS_KM};
pub use ranker::{nearest, rank, Candidate, Ranked, RankedResult};
pub use shops::{Shop, ShopDirectory, ShopId};
