use chrono::NaiveDate;
use diesel::prelude::*;
use shared::*;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::blood_types)]
pub struct DbBloodType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::hospitals)]
#[diesel(treat_none_as_null = true)]
pub struct DbHospital {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::donors)]
#[diesel(treat_none_as_null = true)]
pub struct DbDonor {
    pub id: String,
    pub name: String,
    pub blood_type_id: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::recipients)]
#[diesel(treat_none_as_null = true)]
pub struct DbRecipient {
    pub id: String,
    pub name: String,
    pub blood_type_id: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::donor_transactions)]
pub struct DbDonorTransaction {
    pub id: String,
    pub donor_id: String,
    pub hospital_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::recipient_transactions)]
pub struct DbRecipientTransaction {
    pub id: String,
    pub recipient_id: String,
    pub hospital_id: String,
    pub blood_type_id: String,
    pub date: NaiveDate,
}

impl From<BloodType> for DbBloodType {
    fn from(blood_type: BloodType) -> Self {
        Self {
            id: blood_type.id,
            name: blood_type.name,
        }
    }
}

impl From<DbBloodType> for BloodType {
    fn from(row: DbBloodType) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<Hospital> for DbHospital {
    fn from(hospital: Hospital) -> Self {
        Self {
            id: hospital.id,
            name: hospital.name,
            address: hospital.address,
            phone: hospital.phone,
        }
    }
}

impl From<DbHospital> for Hospital {
    fn from(row: DbHospital) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
        }
    }
}

impl From<Donor> for DbDonor {
    fn from(donor: Donor) -> Self {
        Self {
            id: donor.id,
            name: donor.name,
            blood_type_id: donor.blood_type_id,
            phone: donor.phone,
        }
    }
}

impl From<DbDonor> for Donor {
    fn from(row: DbDonor) -> Self {
        Self {
            id: row.id,
            name: row.name,
            blood_type_id: row.blood_type_id,
            phone: row.phone,
        }
    }
}

impl From<Recipient> for DbRecipient {
    fn from(recipient: Recipient) -> Self {
        Self {
            id: recipient.id,
            name: recipient.name,
            blood_type_id: recipient.blood_type_id,
            phone: recipient.phone,
        }
    }
}

impl From<DbRecipient> for Recipient {
    fn from(row: DbRecipient) -> Self {
        Self {
            id: row.id,
            name: row.name,
            blood_type_id: row.blood_type_id,
            phone: row.phone,
        }
    }
}

impl From<DonorTransaction> for DbDonorTransaction {
    fn from(tx: DonorTransaction) -> Self {
        Self {
            id: tx.id,
            donor_id: tx.donor_id,
            hospital_id: tx.hospital_id,
            date: tx.date,
        }
    }
}

impl From<DbDonorTransaction> for DonorTransaction {
    fn from(row: DbDonorTransaction) -> Self {
        Self {
            id: row.id,
            donor_id: row.donor_id,
            hospital_id: row.hospital_id,
            date: row.date,
        }
    }
}

impl From<RecipientTransaction> for DbRecipientTransaction {
    fn from(tx: RecipientTransaction) -> Self {
        Self {
            id: tx.id,
            recipient_id: tx.recipient_id,
            hospital_id: tx.hospital_id,
            blood_type_id: tx.blood_type_id,
            date: tx.date,
        }
    }
}

impl From<DbRecipientTransaction> for RecipientTransaction {
    fn from(row: DbRecipientTransaction) -> Self {
        Self {
            id: row.id,
            recipient_id: row.recipient_id,
            hospital_id: row.hospital_id,
            blood_type_id: row.blood_type_id,
            date: row.date,
        }
    }
}
