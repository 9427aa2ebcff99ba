use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};
use uuid::Uuid;

use engine::{
    CardPurchaseCmd, CategoryNewCmd, CreditCardNewCmd, Engine, EngineError, installments,
    transactions,
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

async fn card_and_category(engine: &Engine, limit_minor: i64) -> (Uuid, Uuid) {
    let card = engine
        .create_credit_card(CreditCardNewCmd {
            user_id: "alice".to_string(),
            name: "Visa".to_string(),
            credit_limit_minor: limit_minor,
            last_four: Some("4242".to_string()),
            due_day: Some(10),
            closing_day: Some(28),
        })
        .await
        .unwrap();
    let category = engine
        .create_category(CategoryNewCmd::new("alice", "Hogar"))
        .await
        .unwrap();
    (card.id, category.id)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn twelve_installments_split_and_due_dates() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 500_000).await;

    let created = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            120_000,
            "Notebook",
            category_id,
            date(2024, 1, 15),
            12,
        ))
        .await
        .unwrap();

    assert_eq!(created.installment_ids.len(), 12);

    let rows = installments::Entity::find()
        .filter(installments::Column::CardId.eq(card_id))
        .order_by_asc(installments::Column::InstallmentNo)
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 12);

    let total: i64 = rows.iter().map(|r| r.amount_minor).sum();
    assert_eq!(total, 120_000);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.amount_minor, 10_000);
        assert_eq!(row.installment_no, i as i32 + 1);
        assert_eq!(row.installment_count, 12);
        assert!(!row.is_paid);
    }
    assert_eq!(rows[0].due_on, date(2024, 2, 15));
    assert_eq!(rows[11].due_on, date(2025, 1, 15));
    assert_eq!(rows[0].description, "Notebook (1/12)");

    let tx = engine
        .transaction("alice", created.transaction_id)
        .await
        .unwrap();
    assert_eq!(tx.description, "Notebook (12 cuotas)");
    assert_eq!(tx.amount_minor, 120_000);

    // One decrement for the full principal.
    let available = engine.available_credit("alice", card_id).await.unwrap();
    assert_eq!(available, 380_000);
}

#[tokio::test]
async fn remainder_goes_to_last_installment() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 100_000).await;

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            10_000,
            "Zapatos",
            category_id,
            date(2024, 5, 3),
            3,
        ))
        .await
        .unwrap();

    let rows = installments::Entity::find()
        .filter(installments::Column::CardId.eq(card_id))
        .order_by_asc(installments::Column::InstallmentNo)
        .all(&db)
        .await
        .unwrap();

    let amounts: Vec<i64> = rows.iter().map(|r| r.amount_minor).collect();
    assert_eq!(amounts, vec![3333, 3333, 3334]);
    assert_eq!(amounts.iter().sum::<i64>(), 10_000);
}

#[tokio::test]
async fn first_row_links_transaction_others_link_first_row() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 100_000).await;

    let created = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            30_000,
            "Silla",
            category_id,
            date(2024, 6, 1),
            6,
        ))
        .await
        .unwrap();

    let rows = installments::Entity::find()
        .filter(installments::Column::CardId.eq(card_id))
        .order_by_asc(installments::Column::InstallmentNo)
        .all(&db)
        .await
        .unwrap();

    let linked: Vec<_> = rows.iter().filter(|r| r.transaction_id.is_some()).collect();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].installment_no, 1);
    assert_eq!(linked[0].transaction_id, Some(created.transaction_id));
    assert_eq!(linked[0].parent_installment_id, None);

    let first_id = linked[0].id;
    for row in rows.iter().filter(|r| r.installment_no > 1) {
        assert_eq!(row.parent_installment_id, Some(first_id));
        assert_eq!(row.transaction_id, None);
    }
}

#[tokio::test]
async fn insufficient_credit_rejects_without_writing() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 50_000).await;

    let err = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            60_000,
            "Televisor",
            category_id,
            date(2024, 3, 1),
            6,
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InsufficientCredit {
            available: 50_000,
            required: 60_000,
        }
    );

    let installment_rows = installments::Entity::find().all(&db).await.unwrap();
    assert!(installment_rows.is_empty());
    let tx_rows = transactions::Entity::find().all(&db).await.unwrap();
    assert!(tx_rows.is_empty());

    let available = engine.available_credit("alice", card_id).await.unwrap();
    assert_eq!(available, 50_000);
}

#[tokio::test]
async fn single_installment_is_a_plain_expense() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 100_000).await;

    let created = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            20_000,
            "Cena",
            category_id,
            date(2024, 4, 20),
            1,
        ))
        .await
        .unwrap();

    assert!(created.installment_ids.is_empty());

    let tx = engine
        .transaction("alice", created.transaction_id)
        .await
        .unwrap();
    assert_eq!(tx.description, "Cena");

    let rows = installments::Entity::find().all(&db).await.unwrap();
    assert!(rows.is_empty());

    // Ledger untouched.
    let available = engine.available_credit("alice", card_id).await.unwrap();
    assert_eq!(available, 100_000);
}

#[tokio::test]
async fn too_many_installments_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 10_000_000).await;

    let err = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            1_000_000,
            "Auto",
            category_id,
            date(2024, 1, 1),
            61,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidInstallments(_)));
}

#[tokio::test]
async fn zero_installments_rejected_without_writing() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 100_000).await;

    let err = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            10_000,
            "Cafetera",
            category_id,
            date(2024, 2, 10),
            0,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidInstallments(_)));

    // Never recorded as a plain expense either.
    let tx_rows = transactions::Entity::find().all(&db).await.unwrap();
    assert!(tx_rows.is_empty());
    let installment_rows = installments::Entity::find().all(&db).await.unwrap();
    assert!(installment_rows.is_empty());
}

#[tokio::test]
async fn purchase_on_unknown_card_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (_card_id, category_id) = card_and_category(&engine, 100_000).await;

    let err = engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            Uuid::new_v4(),
            10_000,
            "Libro",
            category_id,
            date(2024, 2, 2),
            3,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn end_of_month_due_dates_clamp() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 100_000).await;

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            9_000,
            "Heladera",
            category_id,
            date(2024, 1, 31),
            3,
        ))
        .await
        .unwrap();

    let rows = installments::Entity::find()
        .filter(installments::Column::CardId.eq(card_id))
        .order_by_asc(installments::Column::InstallmentNo)
        .all(&db)
        .await
        .unwrap();

    let due: Vec<NaiveDate> = rows.iter().map(|r| r.due_on).collect();
    assert_eq!(
        due,
        vec![date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
    );
}

#[tokio::test]
async fn refresh_available_credit_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 200_000).await;

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            90_000,
            "Bicicleta",
            category_id,
            date(2024, 7, 10),
            9,
        ))
        .await
        .unwrap();

    let first = engine
        .refresh_available_credit("alice", card_id)
        .await
        .unwrap();
    let second = engine
        .refresh_available_credit("alice", card_id)
        .await
        .unwrap();

    assert_eq!(first, 110_000);
    assert_eq!(second, first);
    assert_eq!(
        engine.available_credit("alice", card_id).await.unwrap(),
        first
    );
}

#[tokio::test]
async fn initialize_only_touches_uninitialized_cards() {
    let (engine, db) = engine_with_db().await;
    let (card_id, category_id) = card_and_category(&engine, 300_000).await;

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card_id,
            60_000,
            "Monitor",
            category_id,
            date(2024, 8, 1),
            6,
        ))
        .await
        .unwrap();

    // Simulate a card that predates the ledger: NULL available credit.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE payment_methods SET available_credit_minor = NULL WHERE id = ?",
        vec![card_id.into()],
    ))
    .await
    .unwrap();

    engine.initialize_available_credit("alice").await.unwrap();

    // Recomputed from the unpaid installments, not reset to the limit.
    assert_eq!(
        engine.available_credit("alice", card_id).await.unwrap(),
        240_000
    );
}
