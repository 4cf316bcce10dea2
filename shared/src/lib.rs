use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod inventory;

pub use inventory::{derive_inventory, InventoryRecord, InventorySnapshot, StockStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    BloodType,
    Hospital,
    Donor,
    Recipient,
    DonorTransaction,
    RecipientTransaction,
}

impl RecordKind {
    /// Collection path segment used by the REST API.
    pub fn path(&self) -> &'static str {
        match self {
            RecordKind::BloodType => "blood-types",
            RecordKind::Hospital => "hospitals",
            RecordKind::Donor => "donors",
            RecordKind::Recipient => "recipients",
            RecordKind::DonorTransaction => "donor-transactions",
            RecordKind::RecipientTransaction => "recipient-transactions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::BloodType => "blood type",
            RecordKind::Hospital => "hospital",
            RecordKind::Donor => "donor",
            RecordKind::Recipient => "recipient",
            RecordKind::DonorTransaction => "donor transaction",
            RecordKind::RecipientTransaction => "recipient transaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{kind} field `{field}` must not be blank")]
    Blank { kind: &'static str, field: &'static str },

    #[error("{kind} id in body ({body}) does not match id in path ({path})")]
    IdMismatch {
        kind: &'static str,
        body: String,
        path: String,
    },
}

/// A record held in one of the six collections, keyed by a human-assigned id.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    /// Ids this record points at in other collections.
    fn references(&self) -> Vec<(RecordKind, &str)> {
        Vec::new()
    }

    /// Required string fields, checked for blankness by `validate`.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.required_fields() {
            if value.trim().is_empty() {
                return Err(ValidationError::Blank {
                    kind: Self::KIND.label(),
                    field,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub blood_type_id: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub blood_type_id: String,
    pub phone: Option<String>,
}

/// One donation. Contributes a unit of the donor's blood type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorTransaction {
    pub id: String,
    pub donor_id: String,
    pub hospital_id: String,
    pub date: NaiveDate,
}

/// One transfusion. Consumes a unit of `blood_type_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientTransaction {
    pub id: String,
    pub recipient_id: String,
    pub hospital_id: String,
    pub blood_type_id: String,
    pub date: NaiveDate,
}

impl Record for BloodType {
    const KIND: RecordKind = RecordKind::BloodType;

    fn id(&self) -> &str {
        &self.id
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str()), ("name", self.name.as_str())]
    }
}

impl Record for Hospital {
    const KIND: RecordKind = RecordKind::Hospital;

    fn id(&self) -> &str {
        &self.id
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str()), ("name", self.name.as_str())]
    }
}

impl Record for Donor {
    const KIND: RecordKind = RecordKind::Donor;

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<(RecordKind, &str)> {
        vec![(RecordKind::BloodType, self.blood_type_id.as_str())]
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", self.id.as_str()),
            ("name", self.name.as_str()),
            ("blood_type_id", self.blood_type_id.as_str()),
        ]
    }
}

impl Record for Recipient {
    const KIND: RecordKind = RecordKind::Recipient;

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<(RecordKind, &str)> {
        vec![(RecordKind::BloodType, self.blood_type_id.as_str())]
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", self.id.as_str()),
            ("name", self.name.as_str()),
            ("blood_type_id", self.blood_type_id.as_str()),
        ]
    }
}

impl Record for DonorTransaction {
    const KIND: RecordKind = RecordKind::DonorTransaction;

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<(RecordKind, &str)> {
        vec![
            (RecordKind::Donor, self.donor_id.as_str()),
            (RecordKind::Hospital, self.hospital_id.as_str()),
        ]
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", self.id.as_str()),
            ("donor_id", self.donor_id.as_str()),
            ("hospital_id", self.hospital_id.as_str()),
        ]
    }
}

impl Record for RecipientTransaction {
    const KIND: RecordKind = RecordKind::RecipientTransaction;

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<(RecordKind, &str)> {
        vec![
            (RecordKind::Recipient, self.recipient_id.as_str()),
            (RecordKind::Hospital, self.hospital_id.as_str()),
            (RecordKind::BloodType, self.blood_type_id.as_str()),
        ]
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", self.id.as_str()),
            ("recipient_id", self.recipient_id.as_str()),
            ("hospital_id", self.hospital_id.as_str()),
            ("blood_type_id", self.blood_type_id.as_str()),
        ]
    }
}

/// Rejects a replacement whose body id disagrees with the addressed id.
pub fn check_path_id<R: Record>(record: &R, path_id: &str) -> Result<(), ValidationError> {
    if record.id() != path_id {
        return Err(ValidationError::IdMismatch {
            kind: R::KIND.label(),
            body: record.id().to_string(),
            path: path_id.to_string(),
        });
    }
    Ok(())
}
