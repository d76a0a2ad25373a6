use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use video_case_api::db;
use video_case_api::import::{reconcile, IMPORT_COMPLETE};
use video_case_api::model::Case;

async fn setup_pool() -> sqlx::SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

fn named(id: &str, name: &str) -> Case {
    Case {
        id: id.into(),
        case_name: name.into(),
        modern_house_youtube_link: None,
        searchome_link: None,
        gorgeous_space_link: None,
        uploaded_to_modern_house: false,
        remarks: None,
    }
}

#[tokio::test]
async fn mixed_batch_creates_updates_and_reports_missing_id() {
    let pool = setup_pool().await;
    let records = vec![
        json!({ "id": "1", "case_name": "A" }),
        json!({ "case_name": "B" }),
        json!({ "id": "1", "case_name": "A2" }),
    ];

    let result = reconcile(&pool, &records).await;

    assert_eq!(result.message, IMPORT_COMPLETE);
    assert_eq!(result.imported_count, 1);
    assert_eq!(result.updated_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].record, json!({ "case_name": "B" }));
    assert_eq!(result.errors[0].error, "Case ID is missing");

    let stored = db::get_case(&pool, "1").await.unwrap().unwrap();
    assert_eq!(stored.case_name, "A2");
    assert_eq!(db::list_cases(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_replaces_every_mutable_field() {
    let pool = setup_pool().await;
    let mut original = named("9", "Old");
    original.remarks = Some("keep?".into());
    original.searchome_link = Some("https://searchome.net/1".into());
    original.uploaded_to_modern_house = true;
    db::create_case(&pool, &original).await.unwrap();

    let result = reconcile(&pool, &[json!({ "id": "9", "case_name": "New" })]).await;
    assert_eq!(result.updated_count, 1);

    let stored = db::get_case(&pool, "9").await.unwrap().unwrap();
    assert_eq!(stored, named("9", "New"));
}

#[tokio::test]
async fn bad_records_do_not_abort_the_batch() {
    let pool = setup_pool().await;
    let records = vec![
        json!({ "id": "a", "case_name": "Good" }),
        json!({ "id": "b" }),
        json!({ "id": "c", "case_name": "Typed", "uploaded_to_modern_house": "yes" }),
        json!("just a string"),
        json!({ "id": "", "case_name": "Blank id" }),
        json!({ "id": 42, "case_name": "Numeric id", "uploaded_to_modern_house": true }),
    ];

    let result = reconcile(&pool, &records).await;

    assert_eq!(result.imported_count, 2);
    assert_eq!(result.updated_count, 0);
    let messages: Vec<&str> = result.errors.iter().map(|e| e.error.as_str()).collect();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0], "Case name is required");
    assert!(messages[1].starts_with("Invalid case record:"), "{}", messages[1]);
    assert_eq!(messages[2], "Case ID is missing");
    assert_eq!(messages[3], "Case ID is missing");

    let numeric = db::get_case(&pool, "42").await.unwrap().unwrap();
    assert!(numeric.uploaded_to_modern_house);
    assert!(db::get_case(&pool, "b").await.unwrap().is_none());
}

#[tokio::test]
async fn store_failure_is_reported_and_batch_continues() {
    let pool = setup_pool().await;
    sqlx::query(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON cases WHEN NEW.id = 'boom' \
         BEGIN SELECT RAISE(ABORT, 'disk on fire'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let records = vec![
        json!({ "id": "a", "case_name": "A" }),
        json!({ "id": "boom", "case_name": "Boom" }),
        json!({ "id": "c", "case_name": "C" }),
        json!({ "id": "a", "case_name": "A2" }),
    ];
    let result = reconcile(&pool, &records).await;

    assert_eq!(result.imported_count, 2);
    assert_eq!(result.updated_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].record, records[1]);
    let error = &result.errors[0].error;
    assert!(error.starts_with("database error:"), "{}", error);
    assert!(error.contains("disk on fire"), "{}", error);

    let stored: Vec<(String, String)> = db::list_cases(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.case_name))
        .collect();
    assert_eq!(
        stored,
        vec![("a".to_string(), "A2".to_string()), ("c".to_string(), "C".to_string())]
    );
}

#[tokio::test]
async fn earlier_records_stay_committed() {
    let pool = setup_pool().await;
    let records = vec![
        json!({ "id": "x", "case_name": "First" }),
        json!({ "id": "y", "case_name": null }),
    ];
    let result = reconcile(&pool, &records).await;
    assert_eq!(result.imported_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(db::case_exists(&pool, "x").await.unwrap());
}

#[tokio::test]
async fn empty_batch() {
    let pool = setup_pool().await;
    let result = reconcile(&pool, &[]).await;
    assert_eq!(result.imported_count, 0);
    assert_eq!(result.updated_count, 0);
    assert!(result.errors.is_empty());
}
