use std::sync::Arc;

use thiserror::Error;

use crate::{
    consts::consts::RegistrationId,
    mail::{MailRelay, RelayError},
    model::{
        registration::Registration,
        request::{RegistrationRequest, ValidationError},
        showcase::showcase_registrations,
        upload::UploadedForm,
    },
    store::{RegistrationStore, StoreEngine, StoreError},
    views::listing::Listing,
};

use super::options::RegistrarOptions;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrarError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A registration already exists with this email: {0}")]
    DuplicateEmail(String),

    #[error("Registration does not exist: {0}")]
    NotFound(RegistrationId),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistrarError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => RegistrarError::DuplicateEmail(email),
            StoreError::NotFound(id) => RegistrarError::NotFound(id),
            other => RegistrarError::Store(other),
        }
    }
}

pub type RegistrarResult<T> = Result<T, RegistrarError>;

/// Service operations behind the backend functions and the pages. Every call blocks,
/// async callers run it on a blocking pool.
pub struct Registrar {
    store: Arc<dyn RegistrationStore>,
    relay: Arc<dyn MailRelay>,
    options: RegistrarOptions,
}

impl Registrar {
    pub fn new(options: RegistrarOptions, relay: Arc<dyn MailRelay>) -> Self {
        let store = StoreEngine::get_engine(options.store_engine.clone());

        Self::with_parts(store, relay, options)
    }

    pub fn with_parts(
        store: Arc<dyn RegistrationStore>,
        relay: Arc<dyn MailRelay>,
        options: RegistrarOptions,
    ) -> Self {
        Self {
            store,
            relay,
            options,
        }
    }

    pub fn init(&self) -> RegistrarResult<()> {
        log::info!(
            "📀 Registration store [Engine: {}, Showcase: {}]",
            self.options.store_engine.describe(),
            self.options.showcase
        );

        Ok(self.store.init()?)
    }

    #[tracing::instrument(skip(self, request))]
    pub fn register(&self, request: &RegistrationRequest) -> RegistrarResult<Registration> {
        let new_registration = request.validate()?;

        let registration = self.store.insert(new_registration)?;

        log::info!(
            "📧 Registration notification: {} from {} has registered.",
            registration.display_name(),
            registration.country
        );

        Ok(registration)
    }

    pub fn find(&self, id: &RegistrationId) -> RegistrarResult<Option<Registration>> {
        Ok(self.store.get(id)?)
    }

    /// Forwards a form without touching any record
    pub fn send_form(&self, registrant_name: &str, form: &UploadedForm) -> RegistrarResult<()> {
        Ok(self.relay.relay(registrant_name, form)?)
    }

    /// Relays the form, then sets the uploaded flag. A failed relay leaves the flag as it was.
    #[tracing::instrument(skip(self, form))]
    pub fn complete_upload(
        &self,
        id: &RegistrationId,
        form: &UploadedForm,
    ) -> RegistrarResult<Registration> {
        let registrant = self
            .store
            .get(id)?
            .ok_or_else(|| RegistrarError::NotFound(id.clone()))?;

        self.relay.relay(&registrant.display_name(), form)?;

        Ok(self.store.mark_uploaded(id)?)
    }

    pub fn list_uploaded(&self) -> RegistrarResult<Vec<Registration>> {
        Ok(self.store.list_uploaded()?)
    }

    pub fn listing(&self) -> RegistrarResult<Listing> {
        let uploaded = self.list_uploaded()?;

        if !self.options.showcase {
            return Ok(Listing::new(&uploaded, false));
        }

        let mut registrations = showcase_registrations();
        registrations.extend(uploaded);

        Ok(Listing::new(&registrations, true))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        model::{registration::NewRegistration, request::AgeInput},
        store::memory::MemoryStore,
    };

    /// Remembers who each form was relayed for
    #[derive(Default)]
    struct RecordingRelay {
        relayed: Mutex<Vec<String>>,
    }

    impl MailRelay for RecordingRelay {
        fn relay(&self, registrant_name: &str, _form: &UploadedForm) -> Result<(), RelayError> {
            self.relayed.lock().unwrap().push(registrant_name.to_string());
            Ok(())
        }
    }

    struct FailingRelay;

    impl MailRelay for FailingRelay {
        fn relay(&self, _: &str, _: &UploadedForm) -> Result<(), RelayError> {
            Err(RelayError::Rejected(502))
        }
    }

    fn registrar_with(relay: Arc<dyn MailRelay>) -> (Registrar, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());

        let registrar =
            Registrar::with_parts(store.clone(), relay, RegistrarOptions::new_test());

        (registrar, store)
    }

    fn request_for(email: &str) -> RegistrationRequest {
        let mut request = RegistrationRequest::new_test();
        request.email = Some(email.to_string());
        request
    }

    mod register {
        use super::*;

        #[test_log::test]
        fn returns_a_new_record_with_the_flag_clear() {
            let (registrar, _) = registrar_with(Arc::new(RecordingRelay::default()));

            let registration = registrar
                .register(&RegistrationRequest::new_test())
                .expect("should register");

            assert!(!registration.id.as_str().is_empty());
            assert!(!registration.form_uploaded);
            assert_eq!(registration.first_name, "Jane");
            assert_eq!(
                registrar.find(&registration.id).unwrap(),
                Some(registration)
            );
        }

        #[test]
        fn invalid_request_never_reaches_the_store() {
            let (registrar, store) = registrar_with(Arc::new(RecordingRelay::default()));

            let mut request = RegistrationRequest::new_test();
            request.age = Some(AgeInput::Number(0.0));

            let result = registrar.register(&request);

            assert!(matches!(result, Err(RegistrarError::Validation(_))));
            assert!(store
                .insert(NewRegistration::new_test())
                .is_ok());
        }

        #[test]
        fn duplicate_email_is_reported() {
            // Given a registered email
            let (registrar, _) = registrar_with(Arc::new(RecordingRelay::default()));
            registrar.register(&request_for("jane@example.com")).unwrap();

            // When the same address registers again in another case
            let result = registrar.register(&request_for("JANE@example.com"));

            // Then it is refused
            assert!(matches!(result, Err(RegistrarError::DuplicateEmail(_))));
        }
    }

    mod complete_upload {
        use super::*;

        #[test]
        fn relays_then_sets_the_flag() {
            // Given a registrant
            let relay = Arc::new(RecordingRelay::default());
            let (registrar, _) = registrar_with(relay.clone());
            let registration = registrar.register(&RegistrationRequest::new_test()).unwrap();

            // When their form is uploaded
            let uploaded = registrar
                .complete_upload(&registration.id, &UploadedForm::new_test())
                .expect("should upload");

            // Then the form was relayed under their name and they are listed
            assert!(uploaded.form_uploaded);
            assert_eq!(*relay.relayed.lock().unwrap(), vec!["Jane Doe".to_string()]);
            assert_eq!(registrar.list_uploaded().unwrap(), vec![uploaded]);
        }

        #[test]
        fn repeating_the_upload_is_idempotent() {
            let (registrar, _) = registrar_with(Arc::new(RecordingRelay::default()));
            let registration = registrar.register(&RegistrationRequest::new_test()).unwrap();

            let first = registrar
                .complete_upload(&registration.id, &UploadedForm::new_test())
                .unwrap();
            let second = registrar
                .complete_upload(&registration.id, &UploadedForm::new_test())
                .unwrap();

            assert_eq!(first, second);
            assert_eq!(registrar.list_uploaded().unwrap().len(), 1);
        }

        #[test]
        fn failed_relay_leaves_the_flag_clear() {
            let (registrar, _) = registrar_with(Arc::new(FailingRelay));
            let registration = registrar.register(&RegistrationRequest::new_test()).unwrap();

            let result = registrar.complete_upload(&registration.id, &UploadedForm::new_test());

            assert_eq!(
                result,
                Err(RegistrarError::Relay(RelayError::Rejected(502)))
            );
            assert_eq!(registrar.list_uploaded().unwrap(), vec![]);
            assert!(!registrar.find(&registration.id).unwrap().unwrap().form_uploaded);
        }

        #[test]
        fn unknown_registrant_is_not_found() {
            let relay = Arc::new(RecordingRelay::default());
            let (registrar, _) = registrar_with(relay.clone());

            let result =
                registrar.complete_upload(&RegistrationId::from("missing"), &UploadedForm::new_test());

            assert_eq!(
                result,
                Err(RegistrarError::NotFound(RegistrationId::from("missing")))
            );
            assert!(relay.relayed.lock().unwrap().is_empty());
        }
    }

    mod listing {
        use super::*;

        #[test]
        fn lists_only_uploaded_newest_first() {
            // Given three registrants, two of whom uploaded
            let (registrar, _) = registrar_with(Arc::new(RecordingRelay::default()));

            let first = registrar.register(&request_for("a@example.com")).unwrap();
            let _pending = registrar.register(&request_for("b@example.com")).unwrap();
            let third = registrar.register(&request_for("c@example.com")).unwrap();

            registrar
                .complete_upload(&first.id, &UploadedForm::new_test())
                .unwrap();
            registrar
                .complete_upload(&third.id, &UploadedForm::new_test())
                .unwrap();

            // When the uploaded records are listed
            let uploaded = registrar.list_uploaded().unwrap();

            // Then only those two appear, newest first
            let ids: Vec<_> = uploaded.iter().map(|r| r.id.clone()).collect();
            assert_eq!(ids.len(), 2);
            assert!(ids.contains(&first.id) && ids.contains(&third.id));
            assert!(uploaded[0].created_at >= uploaded[1].created_at);
            assert_eq!(registrar.listing().unwrap().summary(), "2 registered people with completed forms.");
        }

        #[test]
        fn showcase_rows_come_first() {
            let store = Arc::new(MemoryStore::new());
            let registrar = Registrar::with_parts(
                store,
                Arc::new(RecordingRelay::default()),
                RegistrarOptions::new_test().set_showcase(true),
            );

            let registration = registrar.register(&RegistrationRequest::new_test()).unwrap();
            registrar
                .complete_upload(&registration.id, &UploadedForm::new_test())
                .unwrap();

            let listing = registrar.listing().unwrap();

            assert_eq!(listing.len(), 9);
            assert!(listing.showcase_columns);
            assert_eq!(listing.rows[8].full_name, "Jane Doe");
            assert_eq!(listing.rows[8].index, 9);
        }

        #[test]
        fn empty_without_showcase() {
            let (registrar, _) = registrar_with(Arc::new(RecordingRelay::default()));

            assert!(registrar.listing().unwrap().is_empty());
        }
    }
}
