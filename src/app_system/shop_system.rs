use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{Entity, ResourceActor};
use crate::app_system::{AdminSeed, ShopConfig, SystemError};
use crate::clients::{OrderClient, ProductClient, SessionClient, UserClient};
use crate::domain::{Order, Product, Session, User};
use crate::persistence::{JsonFileStore, MemoryStore, SnapshotStore};
use crate::storefront::Storefront;

/// The main application system that orchestrates all actors.
///
/// Responsible for loading snapshots, starting the actors, wiring the
/// clients together, and handling shutdown.
pub struct ShopSystem {
    pub product_client: ProductClient,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    pub session_client: SessionClient,
    handles: Vec<JoinHandle<()>>,
    sweeper: Option<JoinHandle<()>>,
}

async fn load_actor<T: Entity>(
    capacity: usize,
    store: &Arc<dyn SnapshotStore>,
) -> Result<(ResourceActor<T>, crate::actor_framework::ResourceClient<T>), SystemError> {
    ResourceActor::<T>::load(capacity, Arc::clone(store), Vec::new())
        .await
        .map_err(|source| SystemError::Load { collection: T::COLLECTION, source })
}

/// Expires sessions idle for longer than `idle`, checking once per `idle`.
fn spawn_session_sweeper(sessions: SessionClient, idle: Duration) -> Option<JoinHandle<()>> {
    let Ok(max_age) = chrono::Duration::from_std(idle) else {
        warn!(?idle, "Session idle timeout out of range, sessions never expire");
        return None;
    };
    let Some(start) = Instant::now().checked_add(idle).filter(|_| !idle.is_zero()) else {
        warn!(?idle, "Session idle timeout unusable, sessions never expire");
        return None;
    };

    Some(tokio::spawn(async move {
        let mut ticks = interval_at(start, idle);
        loop {
            ticks.tick().await;
            let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
                continue;
            };
            match sessions.expire_idle(cutoff).await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "Idle sessions expired"),
                Err(e) => {
                    warn!(error = %e, "Session sweep stopped");
                    return;
                }
            }
        }
    }))
}

impl ShopSystem {
    /// Starts the system described by `config`: snapshots on disk when a data
    /// directory is configured, in memory otherwise.
    pub async fn start(config: &ShopConfig) -> Result<Self, SystemError> {
        let store: Arc<dyn SnapshotStore> = match &config.data_dir {
            Some(dir) => {
                info!(data_dir = %dir.display(), "Using JSON snapshot directory");
                Arc::new(JsonFileStore::new(dir.clone()))
            }
            None => {
                info!("No data directory configured, snapshots stay in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(store, config).await
    }

    /// A throwaway system with no admin and nothing on disk.
    pub async fn in_memory() -> Result<Self, SystemError> {
        Self::start(&ShopConfig::default()).await
    }

    #[instrument(name = "shop_system_start", skip(store, config), fields(capacity = config.channel_capacity))]
    pub async fn with_store(store: Arc<dyn SnapshotStore>, config: &ShopConfig) -> Result<Self, SystemError> {
        let capacity = config.channel_capacity;

        // 1. Load every collection before anything is spawned.
        let (product_actor, product_inner) = load_actor::<Product>(capacity, &store).await?;
        let (user_actor, user_inner) = load_actor::<User>(capacity, &store).await?;
        let (order_actor, order_inner) = load_actor::<Order>(capacity, &store).await?;
        let (session_actor, session_inner) = ResourceActor::<Session>::new(capacity);

        // 2. Start the actors
        let handles = vec![
            tokio::spawn(product_actor.run()),
            tokio::spawn(user_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(session_actor.run()),
        ];

        // 3. Wire the clients
        let product_client = ProductClient::new(product_inner);
        let user_client = UserClient::new(user_inner);
        let order_client = OrderClient::new(order_inner, user_client.clone(), product_client.clone());
        let session_client = SessionClient::new(session_inner);
        let sweeper = spawn_session_sweeper(session_client.clone(), config.session_idle_timeout);

        let system = Self {
            product_client,
            user_client,
            order_client,
            session_client,
            handles,
            sweeper,
        };

        if let Some(admin) = &config.admin {
            system.seed_admin(admin).await?;
        }

        info!("Shop system started");
        Ok(system)
    }

    /// Creates the configured admin unless a user of that name exists.
    #[instrument(skip(self, admin), fields(username = %admin.username))]
    async fn seed_admin(&self, admin: &AdminSeed) -> Result<(), SystemError> {
        if self.user_client.get_user(admin.username.clone()).await?.is_some() {
            info!("Admin account already present");
            return Ok(());
        }
        self.user_client
            .register(&admin.username, admin.password.expose_secret(), true)
            .await?;
        info!("Admin account seeded");
        Ok(())
    }

    pub fn storefront(&self) -> Storefront {
        Storefront::new(
            self.product_client.clone(),
            self.user_client.clone(),
            self.order_client.clone(),
            self.session_client.clone(),
        )
    }

    /// Stops every actor after it drains its mailbox and waits for the tasks.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
        }
        self.order_client.shutdown().await?;
        self.session_client.shutdown().await?;
        self.user_client.shutdown().await?;
        self.product_client.shutdown().await?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
