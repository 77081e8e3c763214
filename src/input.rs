//! Common routines for handling input data.
//!
//! Reference tables can come from a directory on disk or from a dataset compiled into the binary,
//! so readers take a [`DataSource`] rather than a path.
use crate::error::SuitabilityError;
use crate::id::{HasID, IDLike};
use anyhow::{Context, Result, bail, ensure};
use include_dir::Dir;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub mod compatibility;
use compatibility::{read_climate_compatibility, read_soil_compatibility};
pub mod crop;
use crop::read_crops;
pub mod practice;
use practice::read_practices;
pub mod region;
use region::read_regions;

use crate::crop::CropMap;
use crate::practice::PracticeZone;
use crate::region::RegionMap;

/// A place from which input files can be read
pub trait DataSource {
    /// The path of the named file, for use in error messages
    fn file_path(&self, file_name: &str) -> PathBuf;

    /// Read the named file as a string
    fn read_file(&self, file_name: &str) -> Result<Cow<'_, str>>;
}

impl DataSource for Path {
    fn file_path(&self, file_name: &str) -> PathBuf {
        self.join(file_name)
    }

    fn read_file(&self, file_name: &str) -> Result<Cow<'_, str>> {
        let file_path = self.file_path(file_name);
        let contents = fs::read_to_string(&file_path)
            .with_context(|| format!("Could not read {}", file_path.display()))?;
        Ok(Cow::Owned(contents))
    }
}

impl DataSource for Dir<'_> {
    fn file_path(&self, file_name: &str) -> PathBuf {
        self.path().join(file_name)
    }

    fn read_file(&self, file_name: &str) -> Result<Cow<'_, str>> {
        let file_path = self.file_path(file_name);
        let file = self
            .get_file(&file_path)
            .with_context(|| format!("File {} not found", file_path.display()))?;
        let contents = file
            .contents_utf8()
            .with_context(|| format!("File {} is not valid UTF-8", file_path.display()))?;
        Ok(Cow::Borrowed(contents))
    }
}

/// Read a series of type `T`s from a CSV file.
///
/// Returns an error if the file is empty.
///
/// # Arguments
///
/// * `source` - Where to read the file from
/// * `file_name` - Name of the CSV file
pub fn read_csv<T: DeserializeOwned, S: DataSource + ?Sized>(
    source: &S,
    file_name: &str,
) -> Result<Vec<T>> {
    let file_path = source.file_path(file_name);
    let contents = source.read_file(file_name)?;
    let vec = read_csv_from_str(&contents).with_context(|| input_err_msg(&file_path))?;
    ensure!(
        !vec.is_empty(),
        "{}: CSV file cannot be empty",
        input_err_msg(&file_path)
    );

    Ok(vec)
}

fn read_csv_from_str<T: DeserializeOwned>(contents: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut vec = Vec::new();
    for result in reader.deserialize() {
        vec.push(result?);
    }

    Ok(vec)
}

/// Read a CSV file of items with IDs, keeping the order in which they appear in the file.
///
/// Fails if two rows share an ID.
pub fn read_csv_id_file<ID, T, S>(source: &S, file_name: &str) -> Result<IndexMap<ID, T>>
where
    ID: IDLike,
    T: HasID<ID> + DeserializeOwned,
    S: DataSource + ?Sized,
{
    let file_path = source.file_path(file_name);
    let items: Vec<T> = read_csv(source, file_name)?;
    collect_unique_ids(items).with_context(|| input_err_msg(&file_path))
}

fn collect_unique_ids<ID: IDLike, T: HasID<ID>>(items: Vec<T>) -> Result<IndexMap<ID, T>> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        match map.entry(item.get_id().clone()) {
            Entry::Vacant(entry) => {
                entry.insert(item);
            }
            Entry::Occupied(entry) => bail!("Duplicate ID found: {}", entry.key()),
        }
    }

    Ok(map)
}

/// Parse a TOML file.
///
/// # Arguments
///
/// * `source` - Where to read the file from
/// * `file_name` - Name of the TOML file
pub fn read_toml<T: DeserializeOwned, S: DataSource + ?Sized>(
    source: &S,
    file_name: &str,
) -> Result<T> {
    let file_path = source.file_path(file_name);
    let contents = source.read_file(file_name)?;
    let value = toml::from_str(&contents).with_context(|| input_err_msg(&file_path))?;
    Ok(value)
}

/// Parse a TOML file holding one of the reference tables.
///
/// Unlike [`read_toml`], contents which don't fit the table's structure (e.g. a missing or
/// mistyped field) give a [`SuitabilityError::DataIntegrity`] error for `table`.
pub fn read_toml_table<T: DeserializeOwned, S: DataSource + ?Sized>(
    source: &S,
    file_name: &str,
    table: &'static str,
) -> Result<T> {
    let file_path = source.file_path(file_name);
    let contents = source.read_file(file_name)?;
    toml::from_str(&contents)
        .map_err(|err| SuitabilityError::data_integrity(table, err.message().trim()))
        .with_context(|| input_err_msg(&file_path))
}

/// Read an f64, checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value is not between 0 and 1"))?;
    }

    Ok(value)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// The reference tables, as read from a dataset
pub struct Tables {
    /// Crops with their compatibility tables attached
    pub crops: CropMap,
    /// Regions, in file order
    pub regions: RegionMap,
    /// Traditional practice zones
    pub practices: Vec<PracticeZone>,
}

/// Read all the reference tables from a dataset.
///
/// # Arguments
///
/// * `source` - Directory (or embedded directory) containing the dataset files
pub fn read_tables<S: DataSource + ?Sized>(source: &S) -> Result<Tables> {
    let regions = read_regions(source)?;
    let mut crops = read_crops(source)?;

    let mut soil = read_soil_compatibility(source, &crops)?;
    let mut climate = read_climate_compatibility(source, &crops)?;
    for (id, crop) in &mut crops {
        if let Some(table) = soil.remove(id) {
            crop.soil_compatibility = table;
        }
        if let Some(table) = climate.remove(id) {
            crop.climate_compatibility = table;
        }
    }

    let practices = read_practices(source, &crops, &regions)?;

    Ok(Tables {
        crops,
        regions,
        practices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{GenericID, define_id_getter};
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: GenericID,
        value: u32,
    }
    define_id_getter! {Record, GenericID}

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    /// Test a normal read
    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        create_csv_file(dir.path(), "id,value\nhello,1\nworld, 2\n");
        let records: Vec<Record> = read_csv(dir.path(), "test.csv").unwrap();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".into(),
                    value: 1,
                },
                Record {
                    id: "world".into(),
                    value: 2,
                }
            ]
        );

        // File with no data (only column headers)
        create_csv_file(dir.path(), "id,value\n");
        assert!(read_csv::<Record, _>(dir.path(), "test.csv").is_err());

        // Missing file
        assert!(read_csv::<Record, _>(dir.path(), "missing.csv").is_err());
    }

    #[test]
    fn test_read_csv_id_file() {
        let dir = tempdir().unwrap();
        create_csv_file(dir.path(), "id,value\nb,1\na,2\n");
        let records: IndexMap<GenericID, Record> =
            read_csv_id_file(dir.path(), "test.csv").unwrap();
        assert_eq!(
            records.keys().map(ToString::to_string).collect::<Vec<_>>(),
            ["b", "a"]
        );

        create_csv_file(dir.path(), "id,value\na,1\na,2\n");
        let result: Result<IndexMap<GenericID, Record>> = read_csv_id_file(dir.path(), "test.csv");
        let err = result.unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "Duplicate ID found: a"
        );
    }

    #[test]
    fn test_read_toml() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Record {
            value: u32,
        }

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        fs::write(&file_path, "value = 1").unwrap();
        assert_eq!(
            read_toml::<Record, _>(dir.path(), "test.toml").unwrap(),
            Record { value: 1 }
        );

        fs::write(&file_path, "value = \"one\"").unwrap();
        let err = read_toml::<Record, _>(dir.path(), "test.toml").unwrap_err();
        assert_eq!(err.to_string(), input_err_msg(&file_path));
    }

    #[test]
    fn test_read_from_embedded_dir() {
        static DIR: Dir = include_dir::include_dir!("$CARGO_MANIFEST_DIR/data");
        let dataset = DIR.get_dir("west_java").unwrap();
        assert!(dataset.read_file("regions.csv").unwrap().starts_with("id,"));
        assert!(dataset.read_file("missing.csv").is_err());
    }

    fn deserialise_f64(value: f64) -> Result<f64, serde::de::value::Error> {
        use serde::de::IntoDeserializer;
        deserialise_proportion(value.into_deserializer())
    }

    #[test]
    fn test_deserialise_proportion() {
        // Valid inputs
        assert_eq!(deserialise_f64(0.0), Ok(0.0));
        assert_eq!(deserialise_f64(0.5), Ok(0.5));
        assert_eq!(deserialise_f64(1.0), Ok(1.0));

        // Invalid inputs
        assert!(deserialise_f64(-1.0).is_err());
        assert!(deserialise_f64(2.0).is_err());
        assert!(deserialise_f64(f64::NAN).is_err());
        assert!(deserialise_f64(f64::INFINITY).is_err());
    }
}
