use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use shared::*;
use tracing::info;

use crate::api::{ApiError, AppState};
use crate::store::Stored;

pub async fn list_records<R: Stored>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R>>, ApiError> {
    let records = R::collection(state.store.as_ref()).list().await?;
    Ok(Json(records))
}

pub async fn get_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let record = R::collection(state.store.as_ref()).get(&id).await?;
    record.map(Json).ok_or_else(|| ApiError::not_found::<R>(id))
}

pub async fn create_record<R: Stored>(
    State(state): State<AppState>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let Json(record) = body?;
    record.validate()?;
    check_references(&state, &record).await?;

    R::collection(state.store.as_ref()).insert(&record).await?;

    info!("Created {} {}", R::KIND.label(), record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(record) = body?;
    check_path_id(&record, &id)?;
    record.validate()?;
    check_references(&state, &record).await?;

    if !R::collection(state.store.as_ref()).update(&record).await? {
        return Err(ApiError::not_found::<R>(id));
    }

    info!("Updated {} {}", R::KIND.label(), id);
    Ok(Json(record))
}

pub async fn delete_record<R: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !R::collection(state.store.as_ref()).delete(&id).await? {
        return Err(ApiError::not_found::<R>(id));
    }

    info!("Deleted {} {}", R::KIND.label(), id);
    Ok(StatusCode::NO_CONTENT)
}

/// In strict mode, every id the record points at must already exist.
async fn check_references<R: Stored>(state: &AppState, record: &R) -> Result<(), ApiError> {
    if !state.strict_references {
        return Ok(());
    }

    for (target, target_id) in record.references() {
        if !state.store.exists(target, target_id).await? {
            return Err(ApiError::DanglingReference {
                kind: R::KIND.label(),
                id: record.id().to_string(),
                target: target.label(),
                target_id: target_id.to_string(),
            });
        }
    }

    Ok(())
}

pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryRecord>>, ApiError> {
    let snapshot = state.store.inventory_snapshot().await?;
    Ok(Json(derive_inventory(&snapshot)))
}

pub async fn get_inventory(
    State(state): State<AppState>,
    Path(blood_type_id): Path<String>,
) -> Result<Json<InventoryRecord>, ApiError> {
    let snapshot = state.store.inventory_snapshot().await?;
    let record = derive_inventory(&snapshot)
        .into_iter()
        .find(|record| record.blood_type_id == blood_type_id);
    record.map(Json).ok_or_else(|| ApiError::not_found::<BloodType>(blood_type_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::memory_store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(strict_references: bool) -> axum::Router {
        create_router(AppState {
            store: Arc::new(MemoryStore::new()),
            strict_references,
        })
    }

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn post_created(app: &axum::Router, uri: &str, body: Value) {
        let (status, response) = send(app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, response);
    }

    async fn seed_blood_type(app: &axum::Router, id: &str) {
        post_created(app, "/blood-types", json!({"id": id, "name": format!("{} blood", id)})).await;
    }

    #[tokio::test]
    async fn crud_lifecycle_for_hospitals() {
        let app = app(false);

        let (status, body) = send(
            &app,
            "POST",
            "/hospitals",
            Some(json!({"id": "H1", "name": "General", "address": "1 Main St"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phone"], Value::Null);

        let (status, body) = send(&app, "GET", "/hospitals/H1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "General");

        let (status, body) = send(
            &app,
            "PUT",
            "/hospitals/H1",
            Some(json!({"id": "H1", "name": "General Hospital", "address": null, "phone": "555-0100"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], Value::Null);

        let (status, body) = send(&app, "GET", "/hospitals", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "General Hospital");

        let (status, _) = send(&app, "DELETE", "/hospitals/H1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/hospitals/H1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "hospital H1 not found");
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let app = app(false);
        seed_blood_type(&app, "O+").await;

        let (status, body) = send(
            &app,
            "POST",
            "/blood-types",
            Some(json!({"id": "O+", "name": "again"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "blood type O+ already exists");
    }

    #[tokio::test]
    async fn blank_fields_and_mismatched_ids_are_bad_requests() {
        let app = app(false);
        seed_blood_type(&app, "A+").await;

        let (status, _) = send(
            &app,
            "POST",
            "/donors",
            Some(json!({"id": "D1", "name": "", "blood_type_id": "A+"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "PUT",
            "/blood-types/A+",
            Some(json!({"id": "B+", "name": "B"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updating_or_deleting_missing_records_is_not_found() {
        let app = app(false);

        let (status, _) = send(
            &app,
            "PUT",
            "/blood-types/AB-",
            Some(json!({"id": "AB-", "name": "AB negative"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/donor-transactions/T9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lenient_mode_accepts_dangling_references() {
        let app = app(false);

        let (status, _) = send(
            &app,
            "POST",
            "/donor-transactions",
            Some(json!({"id": "T1", "donor_id": "nobody", "hospital_id": "H1", "date": "2024-02-10"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn strict_mode_rejects_dangling_references() {
        let app = app(true);
        seed_blood_type(&app, "O+").await;

        let (status, body) = send(
            &app,
            "POST",
            "/recipient-transactions",
            Some(json!({
                "id": "R1",
                "recipient_id": "P1",
                "hospital_id": "H1",
                "blood_type_id": "O+",
                "date": "2024-02-10"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"],
            "recipient transaction R1 references missing recipient P1"
        );

        let (status, _) = send(
            &app,
            "POST",
            "/donors",
            Some(json!({"id": "D1", "name": "Ana", "blood_type_id": "O+"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn inventory_nets_donations_against_transfusions() {
        let app = app(false);
        seed_blood_type(&app, "O+").await;
        seed_blood_type(&app, "A+").await;

        post_created(
            &app,
            "/donors",
            json!({"id": "D1", "name": "Ana", "blood_type_id": "O+"}),
        )
        .await;
        post_created(
            &app,
            "/donor-transactions",
            json!({"id": "T1", "donor_id": "D1", "hospital_id": "H1", "date": "2024-02-10"}),
        )
        .await;
        post_created(
            &app,
            "/recipient-transactions",
            json!({
                "id": "R1",
                "recipient_id": "P1",
                "hospital_id": "H1",
                "blood_type_id": "O+",
                "date": "2024-02-11"
            }),
        )
        .await;

        let (status, body) = send(&app, "GET", "/inventory", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"blood_type_id": "O+", "name": "O+ blood", "units_in_stock": 0, "status": "Critical"},
                {"blood_type_id": "A+", "name": "A+ blood", "units_in_stock": 0, "status": "Critical"}
            ])
        );
    }

    #[tokio::test]
    async fn inventory_for_a_single_blood_type() {
        let app = app(false);
        seed_blood_type(&app, "B+").await;
        post_created(
            &app,
            "/donors",
            json!({"id": "D1", "name": "Bo", "blood_type_id": "B+"}),
        )
        .await;
        for i in 0..11 {
            post_created(
                &app,
                "/donor-transactions",
                json!({"id": format!("T{}", i), "donor_id": "D1", "hospital_id": "H1", "date": "2024-02-10"}),
            )
            .await;
        }

        let (status, body) = send(&app, "GET", "/inventory/B+", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units_in_stock"], 11);
        assert_eq!(body["status"], "Adequate");

        let (status, _) = send(&app, "GET", "/inventory/Z", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_a_donor_drops_its_units_without_cascading() {
        let app = app(false);
        seed_blood_type(&app, "A-").await;
        post_created(
            &app,
            "/donors",
            json!({"id": "D1", "name": "Cy", "blood_type_id": "A-"}),
        )
        .await;
        post_created(
            &app,
            "/donor-transactions",
            json!({"id": "T1", "donor_id": "D1", "hospital_id": "H1", "date": "2024-04-02"}),
        )
        .await;

        let (_, body) = send(&app, "GET", "/inventory/A-", None).await;
        assert_eq!(body["units_in_stock"], 1);

        let (status, _) = send(&app, "DELETE", "/donors/D1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/inventory/A-", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units_in_stock"], 0);
        assert_eq!(body["status"], "Critical");

        let (status, body) = send(&app, "GET", "/donor-transactions/T1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["donor_id"], "D1");
    }

    #[tokio::test]
    async fn malformed_bodies_are_json_bad_requests() {
        let app = app(true);
        seed_blood_type(&app, "O+").await;

        let (status, body) = send(&app, "POST", "/blood-types", Some(json!({"id": "O-"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request body"));

        let (status, body) = send(
            &app,
            "POST",
            "/donor-transactions",
            Some(json!({"id": "T1", "donor_id": "D1", "hospital_id": "H1", "date": "2024-13-45"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "PUT", "/blood-types/O+", Some(json!({"name": 7}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app = app(false);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
