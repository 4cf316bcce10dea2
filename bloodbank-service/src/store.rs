use async_trait::async_trait;
use shared::*;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },
}

/// CRUD over one collection of records.
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// All records, oldest first.
    async fn list(&self) -> StoreResult<Vec<R>>;

    async fn get(&self, id: &str) -> StoreResult<Option<R>>;

    async fn insert(&self, record: &R) -> StoreResult<()>;

    /// Replaces the record with the same id. Returns false when it is absent.
    async fn update(&self, record: &R) -> StoreResult<bool>;

    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    fn blood_types(&self) -> &dyn Collection<BloodType>;
    fn hospitals(&self) -> &dyn Collection<Hospital>;
    fn donors(&self) -> &dyn Collection<Donor>;
    fn recipients(&self) -> &dyn Collection<Recipient>;
    fn donor_transactions(&self) -> &dyn Collection<DonorTransaction>;
    fn recipient_transactions(&self) -> &dyn Collection<RecipientTransaction>;

    async fn exists(&self, kind: RecordKind, id: &str) -> StoreResult<bool> {
        match kind {
            RecordKind::BloodType => self.blood_types().exists(id).await,
            RecordKind::Hospital => self.hospitals().exists(id).await,
            RecordKind::Donor => self.donors().exists(id).await,
            RecordKind::Recipient => self.recipients().exists(id).await,
            RecordKind::DonorTransaction => self.donor_transactions().exists(id).await,
            RecordKind::RecipientTransaction => self.recipient_transactions().exists(id).await,
        }
    }

    /// Reads the four collections inventory is derived from.
    ///
    /// The default reads them independently, so a write landing between two
    /// reads is visible in one and not the other. Backends that can read
    /// under a single transaction should override this.
    async fn inventory_snapshot(&self) -> StoreResult<InventorySnapshot> {
        let (blood_types, donors, donor_transactions, recipient_transactions) = futures::try_join!(
            self.blood_types().list(),
            self.donors().list(),
            self.donor_transactions().list(),
            self.recipient_transactions().list()
        )?;

        Ok(InventorySnapshot {
            blood_types,
            donors,
            donor_transactions,
            recipient_transactions,
        })
    }
}

/// Links a record type to its collection in a [`Store`].
pub trait Stored: Record {
    fn collection(store: &dyn Store) -> &dyn Collection<Self>;
}

impl Stored for BloodType {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.blood_types()
    }
}

impl Stored for Hospital {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.hospitals()
    }
}

impl Stored for Donor {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.donors()
    }
}

impl Stored for Recipient {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.recipients()
    }
}

impl Stored for DonorTransaction {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.donor_transactions()
    }
}

impl Stored for RecipientTransaction {
    fn collection(store: &dyn Store) -> &dyn Collection<Self> {
        store.recipient_transactions()
    }
}
