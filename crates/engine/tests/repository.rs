use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{MaintenanceKind, RepositoryError, VehicleRepository};
use migration::MigratorTrait;

async fn repository_with_db() -> (VehicleRepository, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let repository = VehicleRepository::builder().database(db.clone()).build();
    (repository, db)
}

fn dt(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS cnt FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "cnt").unwrap()
}

#[tokio::test]
async fn save_vehicle_creates_the_initial_reading() {
    let (repository, _db) = repository_with_db().await;

    let saved = repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert_eq!(vehicle.id, saved.id);
    assert_eq!(vehicle.name, "Panda");
    assert!(vehicle.is_active);
    assert!(vehicle.is_purchased);
    assert_eq!(vehicle.mileage.len(), 1);
    assert_eq!(vehicle.mileage[0].value, 10000);
    assert!(vehicle.fuel_usages.is_empty());
    assert!(vehicle.maintenance.is_empty());
}

#[tokio::test]
async fn saving_a_second_vehicle_deactivates_the_first() {
    let (repository, db) = repository_with_db().await;

    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    let second = repository
        .save_vehicle("Clio", dt(2025, 2, 1), 500)
        .await
        .unwrap();

    let active = repository.load_active_vehicle().await.unwrap().unwrap();
    assert_eq!(active.id, second.id);

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS cnt FROM vehicles WHERE is_active = 1".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    let active_rows: i64 = row.try_get("", "cnt").unwrap();
    assert_eq!(active_rows, 1);
}

#[tokio::test]
async fn save_vehicle_rejects_negative_mileage() {
    let (repository, _db) = repository_with_db().await;

    let err = repository
        .save_vehicle("Panda", dt(2024, 6, 1), -1)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidValue(_)));

    assert!(repository.load_active_vehicle().await.unwrap().is_none());
}

#[tokio::test]
async fn update_vehicle_requires_an_existing_id() {
    let (repository, _db) = repository_with_db().await;

    let ghost = engine::Vehicle::new("Ghost".to_string(), dt(2024, 6, 1), dt(2024, 6, 1));
    let err = repository.update_vehicle(&ghost).await.unwrap_err();
    assert_eq!(err, RepositoryError::NotFound("vehicle".to_string()));
}

#[tokio::test]
async fn update_vehicle_persists_field_changes() {
    let (repository, _db) = repository_with_db().await;

    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    let mut vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    vehicle.name = "Panda 4x4".to_string();
    vehicle.is_purchased = false;
    repository.update_vehicle(&vehicle).await.unwrap();

    let reloaded = repository.refresh_active_vehicle().await.unwrap().unwrap();
    assert_eq!(reloaded.name, "Panda 4x4");
    assert!(!reloaded.is_purchased);
}

#[tokio::test]
async fn purchase_status_flips_on_the_active_vehicle() {
    let (repository, _db) = repository_with_db().await;

    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    repository
        .update_vehicle_purchase_status(false)
        .await
        .unwrap();

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert!(!vehicle.is_purchased);
}

#[tokio::test]
async fn save_fuel_usage_needs_an_active_vehicle() {
    let (repository, _db) = repository_with_db().await;

    let err = repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap_err();
    assert_eq!(err, RepositoryError::NoActiveVehicle);
}

#[tokio::test]
async fn save_fuel_usage_validates_amounts() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let err = repository
        .save_fuel_usage(0.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidValue(_)));

    let err = repository
        .save_fuel_usage(40.0, -1.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidValue(_)));
}

#[tokio::test]
async fn fuel_usage_round_trip() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let fill = repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();

    let fetched = repository.get_fuel_usage(&fill.id).await.unwrap();
    assert_eq!(fetched, fill);

    // The fill-up brought its own odometer reading.
    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert_eq!(vehicle.mileage.len(), 2);
    assert_eq!(vehicle.fuel_usages.len(), 1);
}

#[tokio::test]
async fn fuel_usage_updates_reach_the_anchor_reading() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let fill = repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();
    repository
        .update_fuel_usage(&fill.id, 42.0, 63.0, 10450)
        .await
        .unwrap();
    repository
        .update_fuel_usage_partial_fill_status(&fill.id, true)
        .await
        .unwrap();

    let fetched = repository.get_fuel_usage(&fill.id).await.unwrap();
    assert_eq!(fetched.liters, 42.0);
    assert_eq!(fetched.cost, 63.0);
    assert!(fetched.is_partial_fill);

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    let anchor = vehicle
        .mileage
        .iter()
        .find(|m| Some(m.id.as_str()) == fetched.mileage_id.as_deref())
        .unwrap();
    assert_eq!(anchor.value, 10450);
}

#[tokio::test]
async fn fuel_usage_of_another_vehicle_is_not_found() {
    let (repository, _db) = repository_with_db().await;

    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    let fill = repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();

    // A new vehicle becomes the active one.
    repository
        .save_vehicle("Clio", dt(2025, 2, 1), 500)
        .await
        .unwrap();

    let err = repository.get_fuel_usage(&fill.id).await.unwrap_err();
    assert_eq!(err, RepositoryError::NotFound("fuel usage".to_string()));
}

#[tokio::test]
async fn deleting_a_fuel_usage_removes_its_anchor() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    let fill = repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();

    repository.delete_fuel_usage(&fill).await.unwrap();

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert!(vehicle.fuel_usages.is_empty());
    assert_eq!(vehicle.mileage.len(), 1);
    assert_eq!(vehicle.mileage[0].value, 10000);
}

#[tokio::test]
async fn reset_fuel_usage_spares_the_rest_of_the_history() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();
    repository
        .save_fuel_usage(35.0, 55.0, 10750, dt(2025, 1, 28))
        .await
        .unwrap();

    repository.reset_fuel_usage().await.unwrap();

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert!(vehicle.fuel_usages.is_empty());
    // Only the fill-up anchors went away.
    assert_eq!(vehicle.mileage.len(), 1);
    assert_eq!(vehicle.mileage[0].value, 10000);
}

#[tokio::test]
async fn maintenance_crud_and_reset() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let oil = repository
        .save_maintenance(
            MaintenanceKind::OilChange,
            89.5,
            false,
            dt(2025, 3, 10),
            Some("5W-30".to_string()),
            None,
        )
        .await
        .unwrap();
    repository
        .save_maintenance(
            MaintenanceKind::TireChange,
            0.0,
            true,
            dt(2025, 4, 2),
            None,
            None,
        )
        .await
        .unwrap();

    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert_eq!(vehicle.maintenance.len(), 2);

    repository.delete_maintenance(&oil).await.unwrap();
    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert_eq!(vehicle.maintenance.len(), 1);
    assert_eq!(vehicle.maintenance[0].kind, MaintenanceKind::TireChange);

    repository.reset_maintenance().await.unwrap();
    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    assert!(vehicle.maintenance.is_empty());
    // The odometer history is untouched by a maintenance reset.
    assert_eq!(vehicle.mileage.len(), 1);
}

#[tokio::test]
async fn maintenance_rejects_negative_cost_and_foreign_readings() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();

    let err = repository
        .save_maintenance(
            MaintenanceKind::Other,
            -5.0,
            false,
            dt(2025, 3, 10),
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidValue(_)));

    let err = repository
        .save_maintenance(
            MaintenanceKind::Other,
            5.0,
            false,
            dt(2025, 3, 10),
            None,
            Some("missing-reading".to_string()),
        )
        .await
        .unwrap_err();
    assert_eq!(err, RepositoryError::NotFound("mileage".to_string()));
}

#[tokio::test]
async fn maintenance_links_to_an_owned_reading() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    let vehicle = repository.load_active_vehicle().await.unwrap().unwrap();
    let reading_id = vehicle.mileage[0].id.clone();

    let event = repository
        .save_maintenance(
            MaintenanceKind::BrakeCheck,
            120.0,
            false,
            dt(2025, 5, 20),
            None,
            Some(reading_id.clone()),
        )
        .await
        .unwrap();
    assert_eq!(event.mileage_id.as_deref(), Some(reading_id.as_str()));
}

#[tokio::test]
async fn delete_vehicle_leaves_no_orphan_rows() {
    let (repository, db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2024, 6, 1), 10000)
        .await
        .unwrap();
    repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();
    repository
        .save_maintenance(
            MaintenanceKind::OilChange,
            89.5,
            false,
            dt(2025, 3, 10),
            None,
            None,
        )
        .await
        .unwrap();

    repository.delete_vehicle().await.unwrap();

    assert!(repository.load_active_vehicle().await.unwrap().is_none());
    assert_eq!(count(&db, "vehicles").await, 0);
    assert_eq!(count(&db, "mileage").await, 0);
    assert_eq!(count(&db, "fuel_usages").await, 0);
    assert_eq!(count(&db, "maintenance").await, 0);
}

#[tokio::test]
async fn monthly_statistics_over_recorded_fills() {
    let (repository, _db) = repository_with_db().await;
    repository
        .save_vehicle("Panda", dt(2025, 1, 1), 10000)
        .await
        .unwrap();

    // save_vehicle dates the initial reading "now", outside the January 2025
    // window, so the window is bounded by the two fill anchors.
    repository
        .save_fuel_usage(40.0, 60.0, 10400, dt(2025, 1, 15))
        .await
        .unwrap();
    repository
        .save_fuel_usage(35.0, 55.0, 10750, dt(2025, 1, 28))
        .await
        .unwrap();

    assert_eq!(
        repository.get_fuel_used(1, Some(2025)).await.unwrap(),
        75.0
    );
    assert_eq!(
        repository.get_fuel_cost(1, Some(2025)).await.unwrap(),
        115.0
    );
    assert_eq!(
        repository.get_km_driven(1, Some(2025)).await.unwrap(),
        350
    );
    assert_eq!(
        repository
            .get_average_fuel_usage(1, Some(2025))
            .await
            .unwrap(),
        0.1
    );
    // Nothing recorded in February.
    assert_eq!(repository.get_fuel_used(2, Some(2025)).await.unwrap(), 0.0);
    assert_eq!(repository.get_km_driven(2, Some(2025)).await.unwrap(), 0);

    let recap = repository.monthly_recap(1, Some(2025)).await.unwrap();
    assert_eq!(recap.fuel_used, 75.0);
    assert_eq!(recap.fuel_cost, 115.0);
    assert_eq!(recap.average_fuel_usage, 0.1);
}

#[tokio::test]
async fn statistics_without_a_vehicle_are_zero() {
    let (repository, _db) = repository_with_db().await;

    assert_eq!(repository.get_fuel_used(1, Some(2025)).await.unwrap(), 0.0);
    assert_eq!(repository.get_fuel_cost(1, Some(2025)).await.unwrap(), 0.0);
    assert_eq!(repository.get_km_driven(1, Some(2025)).await.unwrap(), 0);
    assert_eq!(
        repository
            .get_average_fuel_usage(1, Some(2025))
            .await
            .unwrap(),
        0.0
    );
}
