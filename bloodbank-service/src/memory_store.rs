use async_trait::async_trait;
use shared::*;
use tokio::sync::RwLock;

use crate::store::{Collection, Store, StoreError, StoreResult};

/// Insertion-ordered collection held in process memory.
#[derive(Debug)]
pub struct MemoryCollection<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn list(&self) -> StoreResult<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<R>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: &R) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate {
                kind: R::KIND.label(),
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &R) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() < before)
    }
}

/// Store kept entirely in memory, for development runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blood_types: MemoryCollection<BloodType>,
    hospitals: MemoryCollection<Hospital>,
    donors: MemoryCollection<Donor>,
    recipients: MemoryCollection<Recipient>,
    donor_transactions: MemoryCollection<DonorTransaction>,
    recipient_transactions: MemoryCollection<RecipientTransaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn blood_types(&self) -> &dyn Collection<BloodType> {
        &self.blood_types
    }

    fn hospitals(&self) -> &dyn Collection<Hospital> {
        &self.hospitals
    }

    fn donors(&self) -> &dyn Collection<Donor> {
        &self.donors
    }

    fn recipients(&self) -> &dyn Collection<Recipient> {
        &self.recipients
    }

    fn donor_transactions(&self) -> &dyn Collection<DonorTransaction> {
        &self.donor_transactions
    }

    fn recipient_transactions(&self) -> &dyn Collection<RecipientTransaction> {
        &self.recipient_transactions
    }
}
