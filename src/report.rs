use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::error::ReportError;
use crate::ranker::Ranked;
use crate::shops::{Shop, ShopId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Human readable, one shop per line
    #[default]
    Text,
    /// Comma separated, with a header row
    Csv,
    /// Pretty printed array of shop objects
    Json,
}

const LIST_HEADER: [&str; 4] = ["id", "name", "latitude", "longitude"];
const SEARCH_HEADER: [&str; 5] = ["id", "name", "latitude", "longitude", "distance_km"];

/// Flat shop row used for CSV and JSON output.
#[derive(Debug, Serialize)]
struct ShopRecord<'a> {
    id: ShopId,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

impl<'a> ShopRecord<'a> {
    fn new(shop: &'a Shop, distance_km: Option<f64>) -> Self {
        Self {
            id: shop.id,
            name: &shop.name,
            latitude: shop.location.latitude(),
            longitude: shop.location.longitude(),
            distance_km,
        }
    }
}

/// Writes a search result, nearest first.
pub fn write_ranked<W: Write>(
    out: W,
    ranked: &[Ranked<&Shop>],
    format: Format,
) -> Result<(), ReportError> {
    let records: Vec<_> = ranked
        .iter()
        .map(|r| ShopRecord::new(r.item, Some(r.distance_km)))
        .collect();
    write_records(out, &records, &SEARCH_HEADER, format)
}

/// Writes shops in the order given.
pub fn write_shops<W: Write>(out: W, shops: &[Shop], format: Format) -> Result<(), ReportError> {
    let records: Vec<_> = shops.iter().map(|s| ShopRecord::new(s, None)).collect();
    write_records(out, &records, &LIST_HEADER, format)
}

fn write_records<W: Write>(
    mut out: W,
    records: &[ShopRecord<'_>],
    csv_header: &[&str],
    format: Format,
) -> Result<(), ReportError> {
    match format {
        Format::Text => {
            for (i, r) in records.iter().enumerate() {
                write!(out, "{:>3}. {} ({:.4}, {:.4})", i + 1, r.name, r.latitude, r.longitude)?;
                if let Some(d) = r.distance_km {
                    write!(out, " {:.2} km", d)?;
                }
                writeln!(out)?;
            }
            out.flush()?;
        }
        Format::Csv => {
            let mut wtr = Writer::from_writer(out);
            wtr.write_record(csv_header)?;
            for r in records {
                let mut row = vec![
                    r.id.to_string(),
                    r.name.to_string(),
                    r.latitude.to_string(),
                    r.longitude.to_string(),
                ];
                if let Some(d) = r.distance_km {
                    row.push(format!("{:.3}", d));
                }
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Runs `write` against a staging file next to `path` and renames it into place
/// only on success, so a failed report never leaves a truncated file behind.
pub fn write_to_path<F>(path: &Path, write: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ReportError>,
{
    let staging = staging_path(path);
    let result = File::create(&staging)
        .map_err(ReportError::from)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&staging, path).map_err(ReportError::from));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}
