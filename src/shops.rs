use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{Axis, ShopError};
use crate::geo::{self, GeoPoint};
use crate::ranker::{self, Candidate, Ranked, RankedResult};

pub type ShopId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub location: GeoPoint,
}

/// In-memory list of registered shops.
///
/// The directory only supplies candidates: every search copies references to the
/// current shops into a new candidate list, so results always reflect the latest
/// registrations.
#[derive(Debug, Default)]
pub struct ShopDirectory {
    shops: Vec<Shop>,
}

impl ShopDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }

    /// Shops in registration order.
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    /// Registers a shop and assigns it the next id (starting at 1).
    pub fn register(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<&Shop, ShopError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShopError::EmptyName);
        }
        let location = geo::validate_point(latitude, longitude)?;
        let id = self.shops.len() as ShopId + 1;
        self.shops.push(Shop {
            id,
            name: name.to_string(),
            location,
        });
        debug!(id, name, latitude, longitude, "registered shop");
        Ok(&self.shops[self.shops.len() - 1])
    }

    /// Ranks shops by distance from `reference`. With a limit, only that many of the
    /// closest shops are returned.
    pub fn search(&self, reference: GeoPoint, limit: Option<usize>) -> RankedResult<&Shop> {
        let candidates = self.shops.iter().map(|shop| Candidate::new(shop, shop.location));
        let ranked = match limit {
            Some(limit) => ranker::nearest(reference, candidates, limit),
            None => ranker::rank(reference, candidates),
        };
        info!(
            latitude = reference.latitude(),
            longitude = reference.longitude(),
            shops = self.shops.len(),
            returned = ranked.len(),
            "searched shops"
        );
        ranked
    }

    /// Same as [`ShopDirectory::search`], starting from raw form input.
    pub fn search_raw(
        &self,
        raw_latitude: &str,
        raw_longitude: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Ranked<&Shop>>, ShopError> {
        let reference = geo::parse_point(raw_latitude, raw_longitude)?;
        Ok(self.search(reference, limit))
    }

    /// Loads a shop file with a `name,latitude,longitude` header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ShopError> {
        let file = File::open(path.as_ref()).map_err(csv::Error::from)?;
        let directory = Self::from_reader(file)?;
        info!(path = %path.as_ref().display(), shops = directory.len(), "loaded shop file");
        Ok(directory)
    }

    /// Reads shops from CSV, registering each row in order. Stops at the first bad row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ShopError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut directory = Self::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            directory
                .register_record(&record)
                .map_err(|e| e.at_line(line))?;
        }
        Ok(directory)
    }

    fn register_record(&mut self, record: &csv::StringRecord) -> Result<(), ShopError> {
        let (name, latitude, longitude) = match (record.get(0), record.get(1), record.get(2)) {
            (Some(name), Some(lat), Some(lon)) => (name, lat, lon),
            _ => return Err(ShopError::MissingColumns),
        };
        let latitude = geo::parse_coordinate(latitude, Axis::Latitude)?;
        let longitude = geo::parse_coordinate(longitude, Axis::Longitude)?;
        self.register(name, latitude, longitude)?;
        Ok(())
    }
}
