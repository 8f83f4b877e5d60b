use crate::core::{
    Collection, InvoiceError, Record, RecordKind, fields, validate_new_record, validate_patch,
};

use super::backend::{SharedBackend, load_json, save_json};

/// A keyed collection of customers or companies in one JSON document.
///
/// Every mutation loads the full collection, applies the change and writes
/// the full collection back.
#[derive(Clone)]
pub struct RecordStore {
    backend: SharedBackend,
    document: String,
    kind: RecordKind,
}

impl RecordStore {
    pub fn new(backend: SharedBackend, document: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            backend,
            document: document.into(),
            kind,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Load the collection; empty when the document does not exist yet.
    pub fn load(&self) -> Result<Collection, InvoiceError> {
        load_json(self.backend.as_ref(), &self.document)
    }

    /// Replace the stored collection.
    pub fn save(&self, collection: &Collection) -> Result<(), InvoiceError> {
        save_json(self.backend.as_ref(), &self.document, collection)
    }

    pub fn get(&self, id: &str) -> Result<Record, InvoiceError> {
        self.load()?
            .remove(id)
            .ok_or_else(|| InvoiceError::not_found(self.kind.label(), id))
    }

    /// Seed `default` under id `"1"` when the collection is empty.
    ///
    /// Returns the collection as stored afterwards. A non-empty collection is
    /// returned untouched and nothing is written.
    pub fn ensure_default(&self, default: &Record) -> Result<Collection, InvoiceError> {
        let collection = self.load()?;
        if !collection.is_empty() {
            return Ok(collection);
        }
        let mut seeded = Collection::new();
        seeded.insert("1".to_string(), default.clone());
        self.save(&seeded)?;
        tracing::info!(document = %self.document, "seeded default {}", self.kind.label());
        Ok(seeded)
    }

    /// Store a new record under the next free id.
    pub fn add(&self, record: Record) -> Result<(String, Record), InvoiceError> {
        let errors = validate_new_record(self.kind, &record);
        if !errors.is_empty() {
            return Err(InvoiceError::from_validation(&errors));
        }

        let mut collection = self.load()?;
        let id = next_id(&collection)?;
        let record: Record = record
            .iter()
            .map(|(field, value)| (field, value.trim()))
            .collect();
        collection.insert(id.clone(), record.clone());
        self.save(&collection)?;

        tracing::info!(kind = self.kind.label(), %id, "record added");
        Ok((id, record))
    }

    /// Overwrite the fields present in `patch`.
    ///
    /// A blank name keeps the stored one; other fields are overwritten even
    /// when blank. Fields not in the patch are left alone.
    pub fn update(&self, id: &str, patch: &Record) -> Result<Record, InvoiceError> {
        let errors = validate_patch(patch);
        if !errors.is_empty() {
            return Err(InvoiceError::from_validation(&errors));
        }

        let mut collection = self.load()?;
        let stored = collection
            .get_mut(id)
            .ok_or_else(|| InvoiceError::not_found(self.kind.label(), id))?;
        for (field, value) in patch.iter() {
            let value = value.trim();
            if field == fields::NAME && value.is_empty() {
                continue;
            }
            stored.set(field, value);
        }
        let updated = stored.clone();
        self.save(&collection)?;

        tracing::info!(kind = self.kind.label(), %id, "record updated");
        Ok(updated)
    }

    /// Remove a record entirely.
    pub fn delete(&self, id: &str) -> Result<Record, InvoiceError> {
        let mut collection = self.load()?;
        let removed = collection
            .remove(id)
            .ok_or_else(|| InvoiceError::not_found(self.kind.label(), id))?;
        self.save(&collection)?;

        tracing::info!(kind = self.kind.label(), %id, "record deleted");
        Ok(removed)
    }
}

/// Next free id: one past the largest numeric id, `"1"` for an empty collection.
///
/// Fails with `InvalidState` if any stored id is not a non-negative integer.
pub fn next_id(collection: &Collection) -> Result<String, InvoiceError> {
    let mut max = 0u64;
    for key in collection.keys() {
        let id = parse_id(key).ok_or_else(|| {
            InvoiceError::InvalidState(format!("stored id '{key}' is not a non-negative integer"))
        })?;
        max = max.max(id);
    }
    let next = max
        .checked_add(1)
        .ok_or_else(|| InvoiceError::InvalidState("record ids exhausted".into()))?;
    Ok(next.to_string())
}

fn parse_id(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
