use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::PathBuf,
    sync::Mutex,
};

use num_format::{Locale, ToFormattedString};

use crate::{
    consts::consts::{RegistrationId, LOCAL_STORAGE_KEY},
    model::registration::{NewRegistration, Registration},
};

use super::{table::RegistrationTable, RegistrationStore, StoreError, StoreResult};

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// The local variant: one serialized list of registrants under a fixed key. Every
/// mutation is a read-modify-write of the whole list, serialized within this process
/// only. Two processes sharing the file race, last write wins.
pub struct FileStore {
    base_path: PathBuf,
    blob_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(base_path: PathBuf) -> Self {
        let blob_path = base_path.join(format!("{}.json", LOCAL_STORAGE_KEY));

        Self {
            base_path,
            blob_path,
            write_lock: Mutex::new(()),
        }
    }

    fn read_blob(&self) -> StoreResult<Vec<Registration>> {
        let mut file = match File::open(&self.blob_path) {
            Ok(file) => file,
            Err(err) => match err.kind() {
                // Nothing has been registered yet
                std::io::ErrorKind::NotFound => return Ok(vec![]),
                _ => return Err(io_error(err)),
            },
        };

        let mut buf = Vec::new();

        file.read_to_end(&mut buf).map_err(io_error)?;

        if buf.is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_slice(&buf).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn write_blob(&self, registrations: &[Registration]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(registrations)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // Write next to the blob then rename, a crash mid-write leaves the old list intact
        let temp_path = self.blob_path.with_extension("json.tmp");

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(io_error)?;

        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        fs::rename(&temp_path, &self.blob_path).map_err(io_error)
    }

    fn load_table(&self) -> StoreResult<RegistrationTable> {
        RegistrationTable::from_records(self.read_blob()?)
    }

    /// Read-modify-write under the in-process lock
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut RegistrationTable) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("local store lock poisoned".to_string()))?;

        let mut table = self.load_table()?;

        let result = apply(&mut table)?;

        self.write_blob(&table.records())?;

        Ok(result)
    }
}

impl RegistrationStore for FileStore {
    // Called on start-up, should be idempotent
    fn init(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.base_path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let table = self.load_table()?;

        log::info!(
            "📀 Local registrations [Location: {}, Rows: {}]",
            self.blob_path.display(),
            table.len().to_formatted_string(&Locale::en)
        );

        Ok(())
    }

    #[tracing::instrument(skip(self, registration))]
    fn insert(&self, registration: NewRegistration) -> StoreResult<Registration> {
        self.mutate(|table| table.apply_insert(registration))
    }

    fn get(&self, id: &RegistrationId) -> StoreResult<Option<Registration>> {
        Ok(self.load_table()?.get(id))
    }

    #[tracing::instrument(skip(self))]
    fn mark_uploaded(&self, id: &RegistrationId) -> StoreResult<Registration> {
        self.mutate(|table| table.apply_mark_uploaded(id))
    }

    fn list_uploaded(&self) -> StoreResult<Vec<Registration>> {
        Ok(self.load_table()?.uploaded())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn new_test_store() -> FileStore {
        let database_dir: PathBuf = ["/", "tmp", "hoperise", &Uuid::new_v4().to_string()]
            .iter()
            .collect();

        let store = FileStore::new(database_dir);

        store.init().expect("should create the data directory");

        store
    }

    #[test]
    fn missing_blob_reads_as_empty() {
        let store = new_test_store();

        assert_eq!(store.list_uploaded().unwrap(), vec![]);
        assert_eq!(store.get(&RegistrationId::from("nope")).unwrap(), None);
    }

    #[test]
    fn blob_is_stored_under_the_local_storage_key() {
        let store = new_test_store();

        store.insert(NewRegistration::new_test()).unwrap();

        assert!(store.blob_path.ends_with("foundation_registrants.json"));
        assert!(store.blob_path.exists());
    }

    #[test]
    fn registrations_survive_a_new_store_instance() {
        // Given a store with an uploaded registration
        let store = new_test_store();
        let registration = store.insert(NewRegistration::new_test()).unwrap();
        store.mark_uploaded(&registration.id).unwrap();

        // When a second store opens the same directory
        let reopened = FileStore::new(store.base_path.clone());

        // Then the record and its flag are read back
        let uploaded = reopened.list_uploaded().unwrap();

        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].id, registration.id);
        assert!(uploaded[0].form_uploaded);
    }

    #[test]
    fn duplicate_email_is_not_written() {
        let store = new_test_store();

        store.insert(NewRegistration::new_test()).unwrap();

        let result = store.insert(NewRegistration::new_test());

        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
        assert_eq!(store.read_blob().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_blob_is_reported() {
        let store = new_test_store();

        fs::write(&store.blob_path, b"not json").unwrap();

        assert!(matches!(store.list_uploaded(), Err(StoreError::Corrupt(_))));
    }
}
