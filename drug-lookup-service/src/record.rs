use serde::{Deserialize, Serialize};

/// One validated catalog entry.
///
/// Records are only constructed through [`RawDrugRow::into_record`], which
/// guarantees a non-empty `name` and caches the normalized form used by
/// every matching stage. Clinical fields are opaque free text and are never
/// interpreted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugRecord {
    pub name: String,
    pub active_ingredient: Option<String>,
    pub category: Option<String>,
    pub is_prescription: bool,
    pub page_reference: Option<String>,
    pub composition: Option<String>,
    pub indications: Option<String>,
    pub contraindications: Option<String>,
    pub dosage: Option<String>,
    pub usage_notes: Option<String>,
    #[serde(skip)]
    normalized_name: String,
}

impl DrugRecord {
    /// Lower-cased, trimmed `name`, precomputed at ingestion.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

/// Raw CSV row, shape matching the crawled catalog files.
///
/// Every column is optional so heterogeneous catalog exports (with or
/// without the clinical columns) deserialize without error; validation
/// happens in [`RawDrugRow::into_record`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDrugRow {
    #[serde(rename = "DrugName", default)]
    pub drug_name: Option<String>,
    #[serde(rename = "ActiveIngredient", default)]
    pub active_ingredient: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Is_Prescription", default)]
    pub is_prescription: Option<String>,
    #[serde(rename = "PageNumber", default)]
    pub page_number: Option<String>,
    #[serde(rename = "Composition", default)]
    pub composition: Option<String>,
    #[serde(rename = "Indications", default)]
    pub indications: Option<String>,
    #[serde(rename = "Contraindications", default)]
    pub contraindications: Option<String>,
    #[serde(rename = "Dosage", default)]
    pub dosage: Option<String>,
    #[serde(rename = "UsageNotes", default)]
    pub usage_notes: Option<String>,
}

impl RawDrugRow {
    /// Validate and normalize a raw row into a matchable record.
    ///
    /// Returns `None` when the row has no usable `DrugName`; such rows are
    /// excluded from the cascade entirely.
    pub fn into_record(self) -> Option<DrugRecord> {
        let name = self.drug_name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return None;
        }

        Some(DrugRecord {
            normalized_name: normalize(name),
            name: name.to_string(),
            active_ingredient: clean_field(self.active_ingredient),
            category: clean_field(self.category),
            is_prescription: parse_prescription_flag(self.is_prescription.as_deref()),
            page_reference: clean_field(self.page_number),
            composition: clean_field(self.composition),
            indications: clean_field(self.indications),
            contraindications: clean_field(self.contraindications),
            dosage: clean_field(self.dosage),
            usage_notes: clean_field(self.usage_notes),
        })
    }
}

/// Case-fold and trim, the normalization applied to both catalog names and
/// scan candidates before any comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn clean_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The crawled exports encode the prescription flag inconsistently
/// (`1`/`0`, `True`/`False`, `yes`/`no`); anything unrecognized reads as
/// over-the-counter.
fn parse_prescription_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
