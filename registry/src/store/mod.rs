use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    consts::consts::{ErrorString, RegistrationId},
    model::registration::{NewRegistration, Registration},
};

pub mod file;
pub mod memory;
pub mod network;
pub mod postgres;
pub mod schema;
pub mod table;

use file::FileStore;
use memory::MemoryStore;
use postgres::{PgOptions, PgStore};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("A registration already exists with this email: {0}")]
    DuplicateEmail(String),

    #[error("Registration does not exist: {0}")]
    NotFound(RegistrationId),

    #[error("Storage is unavailable: {0}")]
    Unavailable(ErrorString),

    #[error("Storage took too long to respond")]
    Timeout,

    #[error("Storage failure: {0}")]
    Backend(ErrorString),

    #[error("Stored registrations could not be read: {0}")]
    Corrupt(ErrorString),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability the registrar needs from wherever registrations live. Every data
/// source (in-process table, local blob, managed table) sits behind this trait.
pub trait RegistrationStore: Send + Sync {
    /// Called on start-up, should be idempotent
    fn init(&self) -> StoreResult<()>;

    /// Assigns the id and creation timestamp, the uploaded flag starts false
    fn insert(&self, registration: NewRegistration) -> StoreResult<Registration>;

    fn get(&self, id: &RegistrationId) -> StoreResult<Option<Registration>>;

    /// Sets the uploaded flag, setting it twice leaves the record unchanged
    fn mark_uploaded(&self, id: &RegistrationId) -> StoreResult<Registration>;

    /// Records with the uploaded flag set, newest first
    fn list_uploaded(&self) -> StoreResult<Vec<Registration>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEngine {
    /// Lives for the process only, used for tests and demos
    Memory,
    /// Single JSON list under the local storage key, inside the given directory
    File(PathBuf),
    /// Managed `registrations` table
    Postgres(PgOptions),
}

impl StoreEngine {
    pub fn get_engine(engine: StoreEngine) -> Arc<dyn RegistrationStore> {
        match engine {
            StoreEngine::Memory => Arc::new(MemoryStore::new()),
            StoreEngine::File(base_path) => Arc::new(FileStore::new(base_path)),
            StoreEngine::Postgres(options) => Arc::new(PgStore::new(options)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StoreEngine::Memory => "memory".to_string(),
            StoreEngine::File(base_path) => format!("file [{}]", base_path.display()),
            StoreEngine::Postgres(options) => format!("postgres [{}]", options.redacted_url()),
        }
    }
}

/// Newest first; the id breaks ties so the order is stable
pub fn sort_newest_first(registrations: &mut [Registration]) {
    registrations.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
}
