use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{pooled_connection::bb8::Pool, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use shared::*;

use crate::models::*;
use crate::schema::*;
use crate::store::{Collection, Store, StoreError, StoreResult};

pub type DbPool = Pool<AsyncPgConnection>;

fn pool_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::Connection(err.to_string())
}

fn write_error(err: DieselError, kind: RecordKind, id: &str) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => StoreError::Duplicate {
            kind: kind.label(),
            id: id.to_string(),
        },
        other => StoreError::Query(other),
    }
}

macro_rules! pg_collection {
    ($name:ident, $record:ty, $row:ty, $table:ident) => {
        pub struct $name {
            pool: DbPool,
        }

        #[async_trait]
        impl Collection<$record> for $name {
            async fn list(&self) -> StoreResult<Vec<$record>> {
                let mut conn = self.pool.get().await.map_err(pool_error)?;
                let rows = $table::table
                    .select(<$row>::as_select())
                    .order(($table::created_at.asc(), $table::id.asc()))
                    .load::<$row>(&mut conn)
                    .await?;
                Ok(rows.into_iter().map(Into::into).collect())
            }

            async fn get(&self, id: &str) -> StoreResult<Option<$record>> {
                let mut conn = self.pool.get().await.map_err(pool_error)?;
                let row = $table::table
                    .filter($table::id.eq(id))
                    .select(<$row>::as_select())
                    .first::<$row>(&mut conn)
                    .await
                    .optional()?;
                Ok(row.map(Into::into))
            }

            async fn insert(&self, record: &$record) -> StoreResult<()> {
                let mut conn = self.pool.get().await.map_err(pool_error)?;
                let row = <$row>::from(record.clone());
                diesel::insert_into($table::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map_err(|e| write_error(e, <$record as Record>::KIND, &row.id))?;
                Ok(())
            }

            async fn update(&self, record: &$record) -> StoreResult<bool> {
                let mut conn = self.pool.get().await.map_err(pool_error)?;
                let row = <$row>::from(record.clone());
                let updated = diesel::update($table::table.filter($table::id.eq(&row.id)))
                    .set(&row)
                    .execute(&mut conn)
                    .await?;
                Ok(updated > 0)
            }

            async fn delete(&self, id: &str) -> StoreResult<bool> {
                let mut conn = self.pool.get().await.map_err(pool_error)?;
                let deleted = diesel::delete($table::table.filter($table::id.eq(id)))
                    .execute(&mut conn)
                    .await?;
                Ok(deleted > 0)
            }
        }
    };
}

pg_collection!(PgBloodTypes, BloodType, DbBloodType, blood_types);
pg_collection!(PgHospitals, Hospital, DbHospital, hospitals);
pg_collection!(PgDonors, Donor, DbDonor, donors);
pg_collection!(PgRecipients, Recipient, DbRecipient, recipients);
pg_collection!(PgDonorTransactions, DonorTransaction, DbDonorTransaction, donor_transactions);
pg_collection!(
    PgRecipientTransactions,
    RecipientTransaction,
    DbRecipientTransaction,
    recipient_transactions
);

pub struct PgStore {
    pool: DbPool,
    blood_types: PgBloodTypes,
    hospitals: PgHospitals,
    donors: PgDonors,
    recipients: PgRecipients,
    donor_transactions: PgDonorTransactions,
    recipient_transactions: PgRecipientTransactions,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            blood_types: PgBloodTypes { pool: pool.clone() },
            hospitals: PgHospitals { pool: pool.clone() },
            donors: PgDonors { pool: pool.clone() },
            recipients: PgRecipients { pool: pool.clone() },
            donor_transactions: PgDonorTransactions { pool: pool.clone() },
            recipient_transactions: PgRecipientTransactions { pool: pool.clone() },
            pool,
        }
    }
}

#[async_trait]
impl Store for PgStore {
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

    /// All four reads share one repeatable-read transaction, so the snapshot
    /// is consistent even while transactions are being recorded.
    async fn inventory_snapshot(&self) -> StoreResult<InventorySnapshot> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction::<_, StoreError, _>(|conn| {
            Box::pin(async move {
                // Must precede every other statement in the transaction.
                diesel::sql_query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                    .execute(conn)
                    .await?;

                let blood_types = blood_types::table
                    .select(DbBloodType::as_select())
                    .order((blood_types::created_at.asc(), blood_types::id.asc()))
                    .load::<DbBloodType>(conn)
                    .await?;

                let donors = donors::table
                    .select(DbDonor::as_select())
                    .order((donors::created_at.asc(), donors::id.asc()))
                    .load::<DbDonor>(conn)
                    .await?;

                let donor_transactions = donor_transactions::table
                    .select(DbDonorTransaction::as_select())
                    .order((donor_transactions::created_at.asc(), donor_transactions::id.asc()))
                    .load::<DbDonorTransaction>(conn)
                    .await?;

                let recipient_transactions = recipient_transactions::table
                    .select(DbRecipientTransaction::as_select())
                    .order((
                        recipient_transactions::created_at.asc(),
                        recipient_transactions::id.asc(),
                    ))
                    .load::<DbRecipientTransaction>(conn)
                    .await?;

                Ok(InventorySnapshot {
                    blood_types: blood_types.into_iter().map(Into::into).collect(),
                    donors: donors.into_iter().map(Into::into).collect(),
                    donor_transactions: donor_transactions.into_iter().map(Into::into).collect(),
                    recipient_transactions: recipient_transactions
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                })
            })
        })
        .await
    }
}
