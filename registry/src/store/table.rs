use std::collections::HashMap;

use chrono::Utc;

use crate::{
    consts::consts::RegistrationId,
    model::registration::{NewRegistration, Registration},
};

use super::{sort_newest_first, StoreError, StoreResult};

type RowPrimaryKey = String;

/// In-process registrations table with a unique email index. Shared by the memory
/// store and the file store, which rebuilds it from the blob on every mutation.
#[derive(Debug, Default)]
pub struct RegistrationTable {
    pub rows: HashMap<RowPrimaryKey, Registration>,
    pub unique_email_index: HashMap<String, RowPrimaryKey>,
}

// Emails are unique regardless of case
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self {
            rows: HashMap::<RowPrimaryKey, Registration>::new(),
            unique_email_index: HashMap::<String, RowPrimaryKey>::new(),
        }
    }

    /// Used when restoring from a persisted list, records keep their ids and flags
    pub fn from_records(records: Vec<Registration>) -> StoreResult<Self> {
        let mut table = RegistrationTable::new();

        for registration in records {
            table.apply_restore(registration)?;
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // Each insert can be broken up into 3 steps
    //  - Verifying constraints (uniqueness)
    //  - Applying the row
    //  - Updating the index
    pub fn apply_insert(&mut self, new_registration: NewRegistration) -> StoreResult<Registration> {
        let registration =
            Registration::from_new(new_registration, RegistrationId::new(), Utc::now());

        self.apply_restore(registration)
    }

    fn apply_restore(&mut self, registration: Registration) -> StoreResult<Registration> {
        let id = registration.id.to_string();

        if self.rows.contains_key(&id) {
            return Err(StoreError::Backend(format!(
                "Duplicate record [id: {}], already exists",
                id
            )));
        }

        if let Some(email) = &registration.email {
            if self.unique_email_index.contains_key(&email_key(email)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        // Persist the email so it cannot be added again
        if let Some(email) = &registration.email {
            self.unique_email_index.insert(email_key(email), id.clone());
        }

        self.rows.insert(id, registration.clone());

        Ok(registration)
    }

    pub fn get(&self, id: &RegistrationId) -> Option<Registration> {
        self.rows.get(id.as_str()).cloned()
    }

    pub fn apply_mark_uploaded(&mut self, id: &RegistrationId) -> StoreResult<Registration> {
        let row = self
            .rows
            .get_mut(id.as_str())
            .ok_or(StoreError::NotFound(id.clone()))?;

        row.form_uploaded = true;

        Ok(row.clone())
    }

    pub fn uploaded(&self) -> Vec<Registration> {
        let mut uploaded: Vec<Registration> = self
            .rows
            .values()
            .filter(|registration| registration.form_uploaded)
            .cloned()
            .collect();

        sort_newest_first(&mut uploaded);

        uploaded
    }

    /// Every record, oldest first, the order the local list is written in
    pub fn records(&self) -> Vec<Registration> {
        let mut records: Vec<Registration> = self.rows.values().cloned().collect();

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });

        records
    }
}
