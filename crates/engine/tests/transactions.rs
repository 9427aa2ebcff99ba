use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CategoryNewCmd, Engine, EngineError, PaymentMethodKind, PaymentMethodNewCmd, TransactionKind,
    TransactionListFilter, TransactionNewCmd, TransactionUpdateCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn cash_and_category(engine: &Engine) -> (Uuid, Uuid) {
    let cash = engine
        .create_payment_method(PaymentMethodNewCmd::new(
            "alice",
            "Efectivo",
            PaymentMethodKind::Cash,
        ))
        .await
        .unwrap();
    let category = engine
        .create_category(CategoryNewCmd::new("alice", "Otros"))
        .await
        .unwrap();
    (cash.id, category.id)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn create_update_delete_roundtrip() {
    let (engine, _db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    let tx = engine
        .create_transaction(
            TransactionNewCmd::new(
                "alice",
                TransactionKind::Expense,
                12_000,
                "Supermercado",
                category_id,
                cash_id,
                date(2024, 2, 3),
            )
            .note("semana 1"),
        )
        .await
        .unwrap();
    assert_eq!(tx.note.as_deref(), Some("semana 1"));

    let updated = engine
        .update_transaction(
            "alice",
            tx.id,
            TransactionUpdateCmd {
                amount_minor: Some(13_500),
                description: Some("Supermercado y farmacia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 13_500);
    assert_eq!(updated.description, "Supermercado y farmacia");
    assert_eq!(updated.occurred_on, date(2024, 2, 3));

    engine.delete_transaction("alice", tx.id).await.unwrap();
    let err = engine.transaction("alice", tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn zero_or_negative_amounts_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    let err = engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Income,
            0,
            "Nada",
            category_id,
            cash_id,
            date(2024, 2, 3),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Expense,
            -500,
            "Negativo",
            category_id,
            cash_id,
            date(2024, 2, 3),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn unknown_category_or_method_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    let err = engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Expense,
            1_000,
            "Cafe",
            Uuid::new_v4(),
            cash_id,
            date(2024, 2, 3),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Expense,
            1_000,
            "Cafe",
            category_id,
            Uuid::new_v4(),
            date(2024, 2, 3),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn paged_listing_is_newest_first_with_exact_total() {
    let (engine, _db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    for day in 1..=5u8 {
        engine
            .create_transaction(TransactionNewCmd::new(
                "alice",
                TransactionKind::Expense,
                1_000 * i64::from(day),
                format!("compra {day}"),
                category_id,
                cash_id,
                date(2024, 3, u32::from(day)),
            ))
            .await
            .unwrap();
    }

    let page = engine
        .list_transactions_page("alice", 1, 2, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].occurred_on, date(2024, 3, 5));
    assert_eq!(page.items[1].occurred_on, date(2024, 3, 4));

    let last = engine
        .list_transactions_page("alice", 3, 2, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].occurred_on, date(2024, 3, 1));

    let recent = engine.list_transactions("alice", Some(3)).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].occurred_on, date(2024, 3, 5));
    assert_eq!(recent[2].occurred_on, date(2024, 3, 3));
}

#[tokio::test]
async fn search_filter_matches_description_and_note() {
    let (engine, _db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Expense,
            2_000,
            "Farmacia",
            category_id,
            cash_id,
            date(2024, 3, 1),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(
            TransactionNewCmd::new(
                "alice",
                TransactionKind::Expense,
                3_000,
                "Supermercado",
                category_id,
                cash_id,
                date(2024, 3, 2),
            )
            .note("incluye farmacia"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Income,
            9_000,
            "Sueldo",
            category_id,
            cash_id,
            date(2024, 3, 3),
        ))
        .await
        .unwrap();

    let filter = TransactionListFilter {
        search: Some("farmacia".to_string()),
        ..Default::default()
    };
    let page = engine
        .list_transactions_page("alice", 1, 10, &filter)
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn users_cannot_see_each_other() {
    let (engine, db) = engine_with_db().await;
    let (cash_id, category_id) = cash_and_category(&engine).await;

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    let tx = engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            TransactionKind::Expense,
            5_000,
            "Privado",
            category_id,
            cash_id,
            date(2024, 3, 1),
        ))
        .await
        .unwrap();

    let err = engine.transaction("bob", tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let page = engine
        .list_transactions_page("bob", 1, 10, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}
