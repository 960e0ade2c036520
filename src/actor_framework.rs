use std::fmt::{Debug, Display};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument};

use crate::persistence::{self, PersistenceError, SnapshotStore};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Errors produced by entity hooks and by the actor plumbing itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Id: PartialEq + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Snapshot collection name.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    /// Picks the identifier for a new entity. Called inside the actor, so
    /// `existing` reflects every earlier create.
    fn assign_id(payload: &Self::CreatePayload, existing: &[Self]) -> Result<Self::Id, FrameworkError>;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, FrameworkError>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), FrameworkError> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), FrameworkError>;
    fn on_delete(&self) -> Result<(), FrameworkError> { Ok(()) }

    /// Whether a sweep with this cutoff should drop the entity. Nothing
    /// expires unless the entity says so.
    fn expired_before(&self, _cutoff: DateTime<Utc>) -> bool { false }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, FrameworkError>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Sweep {
        cutoff: DateTime<Utc>,
        respond_to: Response<usize>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns one collection. Requests are handled strictly one at a time, which
/// makes this the single writer for its snapshot.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    records: Vec<T>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl<T: Entity> ResourceActor<T> {
    /// An actor whose records live only in memory.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_records(buffer_size, Vec::new(), None)
    }

    /// An actor seeded from the stored snapshot of `T::COLLECTION`, writing
    /// the whole collection back after every successful mutation.
    pub async fn load(
        buffer_size: usize,
        store: Arc<dyn SnapshotStore>,
        default: Vec<T>,
    ) -> Result<(Self, ResourceClient<T>), PersistenceError> {
        let records = persistence::load_snapshot(store.as_ref(), T::COLLECTION, default).await?;
        info!(collection = T::COLLECTION, record_count = records.len(), "Collection loaded");
        Ok(Self::with_records(buffer_size, records, Some(store)))
    }

    fn with_records(
        buffer_size: usize,
        records: Vec<T>,
        store: Option<Arc<dyn SnapshotStore>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, records, store };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", fields(collection = T::COLLECTION), skip(self))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.position(&id).map(|index| self.records[index].clone());
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.records.clone()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch).await);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id).await);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action).await);
                }
                ResourceRequest::Sweep { cutoff, respond_to } => {
                    let _ = respond_to.send(self.handle_sweep(cutoff).await);
                }
                ResourceRequest::Shutdown => {
                    info!("Actor shutting down");
                    break;
                }
            }
        }
        info!("Actor stopped");
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.records.iter().position(|item| item.id() == id)
    }

    async fn persist(&self) -> Result<(), PersistenceError> {
        match &self.store {
            Some(store) => persistence::save_snapshot(store.as_ref(), T::COLLECTION, &self.records).await,
            None => Ok(()),
        }
    }

    #[instrument(skip(self, params))]
    async fn handle_create(&mut self, params: T::CreatePayload) -> Result<T, FrameworkError> {
        debug!("Processing create request");
        let id = T::assign_id(&params, &self.records)?;
        let mut item = T::from_create(id.clone(), params)?;
        item.on_create()?;

        self.records.push(item.clone());
        if let Err(e) = self.persist().await {
            self.records.pop();
            error!(error = %e, "Snapshot write failed, create rolled back");
            return Err(e.into());
        }
        info!(item_id = %id, "Item created");
        Ok(item)
    }

    #[instrument(fields(item_id = %id), skip(self, id, patch))]
    async fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        debug!("Processing update request");
        let index = self.position(&id).ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut updated = self.records[index].clone();
        updated.on_update(patch)?;
        self.replace(index, updated.clone()).await?;
        Ok(updated)
    }

    #[instrument(fields(item_id = %id), skip(self, id))]
    async fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        debug!("Processing delete request");
        let index = self.position(&id).ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        self.records[index].on_delete()?;

        let removed = self.records.remove(index);
        if let Err(e) = self.persist().await {
            self.records.insert(index, removed);
            error!(error = %e, "Snapshot write failed, delete rolled back");
            return Err(e.into());
        }
        info!("Item deleted");
        Ok(())
    }

    #[instrument(fields(item_id = %id), skip(self, id, action))]
    async fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        debug!(action = ?action, "Processing action request");
        let index = self.position(&id).ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut updated = self.records[index].clone();
        let result = updated.handle_action(action)?;
        self.replace(index, updated).await?;
        Ok(result)
    }

    /// Drops every record that reports itself expired before `cutoff`, in
    /// one step. Returns how many were removed.
    #[instrument(skip(self))]
    async fn handle_sweep(&mut self, cutoff: DateTime<Utc>) -> Result<usize, FrameworkError> {
        let kept: Vec<T> = self.records.iter().filter(|item| !item.expired_before(cutoff)).cloned().collect();
        let removed = self.records.len() - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let previous = std::mem::replace(&mut self.records, kept);
        if let Err(e) = self.persist().await {
            self.records = previous;
            error!(error = %e, "Snapshot write failed, sweep rolled back");
            return Err(e.into());
        }
        info!(removed, "Expired items swept");
        Ok(removed)
    }

    /// Swaps in a mutated record, restoring the old one if the snapshot
    /// cannot be written.
    async fn replace(&mut self, index: usize, updated: T) -> Result<(), FrameworkError> {
        let previous = std::mem::replace(&mut self.records[index], updated);
        if let Err(e) = self.persist().await {
            self.records[index] = previous;
            error!(error = %e, "Snapshot write failed, change rolled back");
            return Err(e.into());
        }
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(build(respond_to)).await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    pub async fn sweep(&self, cutoff: DateTime<Utc>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Sweep { cutoff, respond_to }).await
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender.send(ResourceRequest::Shutdown).await.map_err(|_| FrameworkError::ActorClosed)
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use serde::Deserialize;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        id: u32,
        label: String,
        value: i64,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    struct CounterPatch {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        Add(i64),
    }

    impl Entity for Counter {
        type Id = u32;
        type CreatePayload = CounterCreate;
        type Patch = CounterPatch;
        type Action = CounterAction;
        type ActionResult = i64;

        const COLLECTION: &'static str = "counters";

        fn id(&self) -> &u32 { &self.id }

        fn assign_id(_payload: &CounterCreate, existing: &[Self]) -> Result<u32, FrameworkError> {
            Ok(existing.len() as u32 + 1)
        }

        fn from_create(id: u32, payload: CounterCreate) -> Result<Self, FrameworkError> {
            if payload.label.is_empty() {
                return Err(FrameworkError::Validation("label required".into()));
            }
            Ok(Self { id, label: payload.label, value: 0 })
        }

        fn on_update(&mut self, patch: CounterPatch) -> Result<(), FrameworkError> {
            if let Some(label) = patch.label {
                self.label = label;
            }
            Ok(())
        }

        fn expired_before(&self, _cutoff: DateTime<Utc>) -> bool {
            self.label.starts_with("stale")
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<i64, FrameworkError> {
            match action {
                CounterAction::Add(amount) => {
                    // Mutate first so a rejection proves the actor discards the copy.
                    self.value += amount;
                    if self.value < 0 {
                        return Err(FrameworkError::Validation("counter went negative".into()));
                    }
                    Ok(self.value)
                }
            }
        }
    }

    // --- Test ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run());

        let created = client.create(CounterCreate { label: "hits".into() }).await.unwrap();
        assert_eq!(created.id, 1);

        let value = client.perform_action(1, CounterAction::Add(5)).await.unwrap();
        assert_eq!(value, 5);

        let renamed = client.update(1, CounterPatch { label: Some("visits".into()) }).await.unwrap();
        assert_eq!(renamed.label, "visits");
        assert_eq!(renamed.value, 5);
    }

    #[tokio::test]
    async fn failed_action_leaves_record_untouched() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run());
        client.create(CounterCreate { label: "hits".into() }).await.unwrap();

        let result = client.perform_action(1, CounterAction::Add(-3)).await;

        assert!(matches!(result, Err(FrameworkError::Validation(_))));
        assert_eq!(client.get(1).await.unwrap().unwrap().value, 0);
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run());

        assert_eq!(client.get(9).await.unwrap(), None);
        assert_eq!(client.delete(9).await, Err(FrameworkError::NotFound("9".into())));
        assert!(matches!(
            client.perform_action(9, CounterAction::Add(1)).await,
            Err(FrameworkError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn mutations_are_written_to_the_store() {
        let store = Arc::new(MemoryStore::new());
        let (actor, client) = ResourceActor::<Counter>::load(10, store.clone(), Vec::new()).await.unwrap();
        tokio::spawn(actor.run());

        client.create(CounterCreate { label: "a".into() }).await.unwrap();
        client.create(CounterCreate { label: "b".into() }).await.unwrap();
        client.delete(1).await.unwrap();

        let saved: Vec<Counter> = serde_json::from_slice(&store.contents("counters").unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].label, "b");
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run());
        for label in ["x", "y", "z"] {
            client.create(CounterCreate { label: label.into() }).await.unwrap();
        }

        let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_records() {
        let store = Arc::new(MemoryStore::new());
        let (actor, client) = ResourceActor::<Counter>::load(10, store.clone(), Vec::new()).await.unwrap();
        tokio::spawn(actor.run());
        for label in ["stale-a", "fresh", "stale-b"] {
            client.create(CounterCreate { label: label.into() }).await.unwrap();
        }

        assert_eq!(client.sweep(Utc::now()).await, Ok(2));
        assert_eq!(client.sweep(Utc::now()).await, Ok(0));

        let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["fresh"]);
        let saved: Vec<Counter> = serde_json::from_slice(&store.contents("counters").unwrap()).unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_closes_the_mailbox() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        let handle = tokio::spawn(actor.run());

        client.shutdown().await.unwrap();
        handle.await.unwrap();

        assert_eq!(client.list().await, Err(FrameworkError::ActorClosed));
    }
}
