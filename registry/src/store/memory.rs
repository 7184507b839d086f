use std::sync::{Mutex, MutexGuard};

use crate::{
    consts::consts::RegistrationId,
    model::registration::{NewRegistration, Registration},
};

use super::{table::RegistrationTable, RegistrationStore, StoreError, StoreResult};

pub struct MemoryStore {
    table: Mutex<RegistrationTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(RegistrationTable::new()),
        }
    }

    fn table(&self) -> StoreResult<MutexGuard<'_, RegistrationTable>> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend("registration table lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl RegistrationStore for MemoryStore {
    fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self, registration))]
    fn insert(&self, registration: NewRegistration) -> StoreResult<Registration> {
        self.table()?.apply_insert(registration)
    }

    fn get(&self, id: &RegistrationId) -> StoreResult<Option<Registration>> {
        Ok(self.table()?.get(id))
    }

    #[tracing::instrument(skip(self))]
    fn mark_uploaded(&self, id: &RegistrationId) -> StoreResult<Registration> {
        self.table()?.apply_mark_uploaded(id)
    }

    fn list_uploaded(&self) -> StoreResult<Vec<Registration>> {
        Ok(self.table()?.uploaded())
    }
}
