use crate::error::DrugLookupResult;
use crate::record::{normalize, DrugRecord, RawDrugRow};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Anything that can hand the matcher an ordered sequence of records.
///
/// The store is the production implementation; tests substitute counting or
/// canned sources to assert access patterns.
pub trait RecordSource {
    fn records(&self) -> &[DrugRecord];
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn records(&self) -> &[DrugRecord] {
        (**self).records()
    }
}

impl<T: RecordSource + ?Sized> RecordSource for std::sync::Arc<T> {
    fn records(&self) -> &[DrugRecord] {
        (**self).records()
    }
}

/// In-memory drug catalog, read-only after load.
///
/// Insertion order is preserved and is the documented tie-break for every
/// matching stage: when several records satisfy a weak-stage predicate, the
/// earliest loaded record wins. Reordering the catalog therefore changes
/// weak-stage results.
#[derive(Debug, Default)]
pub struct DrugStore {
    records: Vec<DrugRecord>,
}

impl DrugStore {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DrugRecord>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Load the catalog from a CSV export, skipping rows without a usable
    /// drug name.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> DrugLookupResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let store = Self::from_csv_reader(file)?;
        info!(
            records = store.len(),
            path = %path.as_ref().display(),
            "Loaded drug catalog"
        );
        Ok(store)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> DrugLookupResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in csv_reader.deserialize::<RawDrugRow>() {
            match row?.into_record() {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "Skipped catalog rows without a drug name");
        }
        Ok(Self { records })
    }

    /// Case-insensitive equality on the record name.
    pub fn lookup_exact(&self, name: &str) -> Option<&DrugRecord> {
        let needle = normalize(name);
        self.records
            .iter()
            .find(|r| r.normalized_name() == needle)
    }

    /// First record whose name contains the given fragment.
    pub fn lookup_contains(&self, fragment: &str) -> Option<&DrugRecord> {
        let needle = normalize(fragment);
        if needle.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.normalized_name().contains(&needle))
    }

    /// Contains-search in store order, capped at `limit` results. Backs the
    /// search endpoint.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&DrugRecord> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.normalized_name().contains(&needle))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for DrugStore {
    fn records(&self) -> &[DrugRecord] {
        &self.records
    }
}
