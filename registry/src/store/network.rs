use std::{future::Future, pin::Pin, sync::Arc, thread, time::Duration};

use tokio::{
    runtime::Builder,
    sync::mpsc::{self, Receiver, Sender},
};

use crate::{
    consts::consts::RegistrationId,
    model::registration::{NewRegistration, Registration},
};

use super::{RegistrationStore, StoreError, StoreResult};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

pub type Responder<T> = oneshot::Sender<StoreResult<T>>;

pub enum NetworkStoreAction {
    Init(Responder<()>),
    Insert(NewRegistration, Responder<Registration>),
    Get(RegistrationId, Responder<Option<Registration>>),
    MarkUploaded(RegistrationId, Responder<Registration>),
    ListUploaded(Responder<Vec<Registration>>),
}

impl NetworkStoreAction {
    /// Answers the caller with an error without running the action
    pub fn reject(self, err: StoreError) {
        // The caller may have timed out and gone away, nothing to do then
        match self {
            NetworkStoreAction::Init(r) => {
                let _ = r.send(Err(err));
            }
            NetworkStoreAction::Insert(_, r) => {
                let _ = r.send(Err(err));
            }
            NetworkStoreAction::Get(_, r) => {
                let _ = r.send(Err(err));
            }
            NetworkStoreAction::MarkUploaded(_, r) => {
                let _ = r.send(Err(err));
            }
            NetworkStoreAction::ListUploaded(r) => {
                let _ = r.send(Err(err));
            }
        }
    }
}

/// Synchronous face of a store whose client lives on its own async runtime
pub struct NetworkStore {
    pub action_sender: Sender<NetworkStoreAction>,
}

impl NetworkStore {
    fn request<T>(
        &self,
        build_action: impl FnOnce(Responder<T>) -> NetworkStoreAction,
    ) -> StoreResult<T> {
        let (sender, receiver) = oneshot::channel::<StoreResult<T>>();

        // Must not be called from within an async context, callers go through a blocking pool
        self.action_sender
            .blocking_send(build_action(sender))
            .map_err(|_| StoreError::Unavailable("storage runtime has stopped".to_string()))?;

        match receiver.recv_timeout(RESPONSE_TIMEOUT) {
            Ok(result) => result,
            Err(oneshot::RecvTimeoutError::Timeout) => Err(StoreError::Timeout),
            Err(oneshot::RecvTimeoutError::Disconnected) => Err(StoreError::Unavailable(
                "storage runtime dropped the request".to_string(),
            )),
        }
    }
}

impl RegistrationStore for NetworkStore {
    fn init(&self) -> StoreResult<()> {
        self.request(NetworkStoreAction::Init)
    }

    fn insert(&self, registration: NewRegistration) -> StoreResult<Registration> {
        self.request(|r| NetworkStoreAction::Insert(registration, r))
    }

    fn get(&self, id: &RegistrationId) -> StoreResult<Option<Registration>> {
        self.request(|r| NetworkStoreAction::Get(id.clone(), r))
    }

    fn mark_uploaded(&self, id: &RegistrationId) -> StoreResult<Registration> {
        self.request(|r| NetworkStoreAction::MarkUploaded(id.clone(), r))
    }

    fn list_uploaded(&self) -> StoreResult<Vec<Registration>> {
        self.request(NetworkStoreAction::ListUploaded)
    }
}

pub fn new_channel() -> (Sender<NetworkStoreAction>, Receiver<NetworkStoreAction>) {
    mpsc::channel::<NetworkStoreAction>(16)
}

/// Runs the client on a dedicated current-thread runtime. If the client cannot be
/// created every request is answered with `Unavailable` instead.
pub fn start_runtime<T: Clone + Send + 'static, C: Send + Sync + 'static>(
    mut action_receiver: Receiver<NetworkStoreAction>,
    context: T,
    task: fn(T, Arc<C>, NetworkStoreAction) -> Pin<Box<dyn Future<Output = ()> + Send>>,
    client: fn(T) -> Pin<Box<dyn Future<Output = StoreResult<C>> + Send>>,
) {
    let spawned = thread::Builder::new()
        .name("Registration Store Tokio".to_string())
        .spawn(move || {
            let rt = match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Unable to start storage runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let client = match client(context.clone()).await {
                    Ok(client) => Ok(Arc::new(client)),
                    Err(e) => {
                        log::error!("Unable to connect to storage: {}", e);
                        Err(e)
                    }
                };

                while let Some(request) = action_receiver.recv().await {
                    match &client {
                        Ok(client) => {
                            tokio::spawn(task(context.clone(), client.clone(), request));
                        }
                        Err(e) => request.reject(e.clone()),
                    }
                }
            });
        });

    if let Err(e) = spawned {
        log::error!("Unable to spawn storage thread: {}", e);
    }
}
