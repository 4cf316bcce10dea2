diesel::table! {
    blood_types (id) {
        id -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    hospitals (id) {
        id -> Varchar,
        name -> Varchar,
        address -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    donors (id) {
        id -> Varchar,
        name -> Varchar,
        blood_type_id -> Varchar,
        phone -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipients (id) {
        id -> Varchar,
        name -> Varchar,
        blood_type_id -> Varchar,
        phone -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    donor_transactions (id) {
        id -> Varchar,
        donor_id -> Varchar,
        hospital_id -> Varchar,
        date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipient_transactions (id) {
        id -> Varchar,
        recipient_id -> Varchar,
        hospital_id -> Varchar,
        blood_type_id -> Varchar,
        date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    blood_types,
    hospitals,
    donors,
    recipients,
    donor_transactions,
    recipient_transactions,
);
