use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::pets::csv::{parse_rows, write_row};
use crate::pets::record::{PetRecord, PET_CSV_FIELDS};

/// Whether an upsert added a new pet or replaced an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Flat-file pet store backed by `pets.csv`.
///
/// The distributor only reads. Writers (the scraper) go through [`upsert`],
/// which rewrites the whole file via a temp file and an atomic rename so
/// readers never observe a half-written CSV.
///
/// [`upsert`]: PetStore::upsert
#[derive(Debug, Clone)]
pub struct PetStore {
    path: PathBuf,
}

impl PetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// All records in file order. `None` when the CSV has not been created yet.
    pub fn load(&self) -> Result<Option<Vec<PetRecord>>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(parse_records(&text))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Rows keyed by the file's own header, values exactly as stored. Columns
    /// a short row lacks come back as `null`. `None` when the CSV is absent.
    pub fn load_rows(&self) -> Result<Option<Vec<Map<String, Value>>>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(parse_header_keyed(&text))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Every non-empty `link` currently stored.
    pub fn links(&self) -> Result<HashSet<String>, AppError> {
        Ok(self
            .load()?
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.link.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect())
    }

    /// Insert `pet`, or replace the row with the same `link` in place.
    pub fn upsert(&self, pet: PetRecord) -> Result<UpsertOutcome, AppError> {
        let link = pet.link.trim().to_string();
        if link.is_empty() {
            return Err(AppError::Validation("Pet link cannot be empty".into()));
        }

        let mut pets = self.load()?.unwrap_or_default();
        let outcome = match pets.iter().position(|p| p.link.trim() == link) {
            Some(i) => {
                pets[i] = pet;
                UpsertOutcome::Updated
            }
            None => {
                pets.push(pet);
                UpsertOutcome::Inserted
            }
        };

        self.write_all(&pets)?;
        tracing::info!(
            path = %self.path.display(),
            rows = pets.len(),
            ?outcome,
            "Updated pets CSV"
        );
        Ok(outcome)
    }

    /// Replace the file contents with `pets` (header first).
    pub fn write_all(&self, pets: &[PetRecord]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.tmp_path();
        if let Err(e) = write_csv(&tmp, pets) {
            tracing::error!(path = %tmp.display(), "Failed to write pets CSV: {}", e);
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn write_csv(path: &Path, pets: &[PetRecord]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_row(&mut w, &PET_CSV_FIELDS[..])?;
    for pet in pets {
        write_row(&mut w, &pet.to_row())?;
    }
    w.flush()?;
    w.get_ref().sync_all()
}

/// Parse CSV text whose first row is the header.
pub fn parse_records(text: &str) -> Vec<PetRecord> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();
    rows.map(|row| PetRecord::from_row(&header, &row)).collect()
}

fn parse_header_keyed(text: &str) -> Vec<Map<String, Value>> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    rows.map(|row| {
        let mut cells = row.into_iter();
        header
            .iter()
            .map(|name| (name.clone(), cells.next().map_or(Value::Null, Value::String)))
            .collect()
    })
    .collect()
}
