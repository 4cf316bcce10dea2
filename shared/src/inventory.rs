//! Blood inventory derived from transaction history.
//!
//! Stock is never stored. Every read rebuilds it from the donor and recipient
//! transactions in an [`InventorySnapshot`]: each donation adds one unit of the
//! donor's blood type, each transfusion removes one unit of the stated type.
//! Transactions whose donor or blood type is missing from the snapshot are
//! skipped without error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{BloodType, Donor, DonorTransaction, RecipientTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
    High,
}

impl StockStatus {
    pub fn classify(units: i64) -> Self {
        match units {
            i64::MIN..=0 => StockStatus::Critical,
            1..=10 => StockStatus::Low,
            11..=49 => StockStatus::Adequate,
            _ => StockStatus::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub blood_type_id: String,
    pub name: String,
    pub units_in_stock: i64,
    pub status: StockStatus,
}

/// Read-only view of the four collections inventory depends on.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    pub blood_types: Vec<BloodType>,
    pub donors: Vec<Donor>,
    pub donor_transactions: Vec<DonorTransaction>,
    pub recipient_transactions: Vec<RecipientTransaction>,
}

/// One record per blood type, in `snapshot.blood_types` order.
pub fn derive_inventory(snapshot: &InventorySnapshot) -> Vec<InventoryRecord> {
    let mut units: HashMap<&str, i64> = snapshot
        .blood_types
        .iter()
        .map(|blood_type| (blood_type.id.as_str(), 0))
        .collect();

    let donor_blood_types: HashMap<&str, &str> = snapshot
        .donors
        .iter()
        .map(|donor| (donor.id.as_str(), donor.blood_type_id.as_str()))
        .collect();

    for tx in &snapshot.donor_transactions {
        let Some(blood_type_id) = donor_blood_types.get(tx.donor_id.as_str()) else {
            continue;
        };
        if let Some(count) = units.get_mut(blood_type_id) {
            *count += 1;
        }
    }

    for tx in &snapshot.recipient_transactions {
        if let Some(count) = units.get_mut(tx.blood_type_id.as_str()) {
            *count -= 1;
        }
    }

    snapshot
        .blood_types
        .iter()
        .map(|blood_type| {
            let units_in_stock = units.get(blood_type.id.as_str()).copied().unwrap_or(0);
            InventoryRecord {
                blood_type_id: blood_type.id.clone(),
                name: blood_type.name.clone(),
                units_in_stock,
                status: StockStatus::classify(units_in_stock),
            }
        })
        .collect()
}
