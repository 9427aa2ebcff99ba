use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CardPurchaseCmd, CategoryNewCmd, CreditCardNewCmd, Engine, PaymentMethodKind,
    PaymentMethodNewCmd, TransactionKind, TransactionListFilter, TransactionNewCmd,
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

struct Fixture {
    cash_id: Uuid,
    card_id: Uuid,
    food_id: Uuid,
    home_id: Uuid,
}

async fn fixture(engine: &Engine) -> Fixture {
    let cash = engine
        .create_payment_method(PaymentMethodNewCmd::new(
            "alice",
            "Efectivo",
            PaymentMethodKind::Cash,
        ))
        .await
        .unwrap();
    let card = engine
        .create_credit_card(CreditCardNewCmd {
            user_id: "alice".to_string(),
            name: "Visa".to_string(),
            credit_limit_minor: 1_000_000,
            last_four: None,
            due_day: None,
            closing_day: None,
        })
        .await
        .unwrap();
    let food = engine
        .create_category(CategoryNewCmd::new("alice", "Alimentación"))
        .await
        .unwrap();
    let home = engine
        .create_category(CategoryNewCmd::new("alice", "Hogar"))
        .await
        .unwrap();
    Fixture {
        cash_id: cash.id,
        card_id: card.id,
        food_id: food.id,
        home_id: home.id,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn cash_tx(
    engine: &Engine,
    kind: TransactionKind,
    amount: i64,
    category_id: Uuid,
    method_id: Uuid,
    on: NaiveDate,
) {
    engine
        .create_transaction(TransactionNewCmd::new(
            "alice",
            kind,
            amount,
            "x",
            category_id,
            method_id,
            on,
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn dashboard_excludes_credit_funded_but_counts_them() {
    let (engine, _db) = engine_with_db().await;
    let f = fixture(&engine).await;

    cash_tx(
        &engine,
        TransactionKind::Income,
        100_000,
        f.food_id,
        f.cash_id,
        date(2024, 3, 5),
    )
    .await;
    cash_tx(
        &engine,
        TransactionKind::Expense,
        30_000,
        f.food_id,
        f.cash_id,
        date(2024, 3, 10),
    )
    .await;
    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            f.card_id,
            60_000,
            "Notebook",
            f.home_id,
            date(2024, 3, 12),
            6,
        ))
        .await
        .unwrap();

    let stats = engine
        .dashboard_stats("alice", date(2024, 3, 1), date(2024, 3, 31))
        .await
        .unwrap();

    assert_eq!(stats.income_minor, 100_000);
    assert_eq!(stats.expenses_minor, 30_000);
    assert_eq!(stats.balance_minor, 70_000);
    // The credit-funded purchase is still a transaction.
    assert_eq!(stats.transaction_count, 3);

    // And it stays visible in the raw list.
    let page = engine
        .list_transactions_page("alice", 1, 10, &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert!(
        page.items
            .iter()
            .any(|tx| tx.description == "Notebook (6 cuotas)")
    );
}

#[tokio::test]
async fn category_totals_sorted_and_credit_excluded() {
    let (engine, _db) = engine_with_db().await;
    let f = fixture(&engine).await;

    cash_tx(
        &engine,
        TransactionKind::Expense,
        20_000,
        f.food_id,
        f.cash_id,
        date(2024, 4, 2),
    )
    .await;
    cash_tx(
        &engine,
        TransactionKind::Expense,
        15_000,
        f.food_id,
        f.cash_id,
        date(2024, 4, 9),
    )
    .await;
    cash_tx(
        &engine,
        TransactionKind::Expense,
        50_000,
        f.home_id,
        f.cash_id,
        date(2024, 4, 20),
    )
    .await;
    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            f.card_id,
            500_000,
            "Sofá",
            f.home_id,
            date(2024, 4, 21),
            10,
        ))
        .await
        .unwrap();

    let totals = engine
        .expenses_by_category("alice", date(2024, 4, 1), date(2024, 4, 30))
        .await
        .unwrap();

    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].category_id, f.home_id);
    assert_eq!(totals[0].total_minor, 50_000);
    assert_eq!(totals[1].category_id, f.food_id);
    assert_eq!(totals[1].total_minor, 35_000);
}

#[tokio::test]
async fn three_month_trend_with_income_in_the_middle() {
    let (engine, _db) = engine_with_db().await;
    let f = fixture(&engine).await;

    cash_tx(
        &engine,
        TransactionKind::Income,
        50_000,
        f.food_id,
        f.cash_id,
        date(2024, 2, 15),
    )
    .await;

    let points = engine
        .monthly_trend("alice", 3, date(2024, 3, 10))
        .await
        .unwrap();

    assert_eq!(points.len(), 3);
    assert_eq!(points[0].month, "2024-01");
    assert_eq!(points[1].month, "2024-02");
    assert_eq!(points[2].month, "2024-03");

    assert_eq!(points[0].income_minor, 0);
    assert_eq!(points[0].balance_minor, 0);
    assert_eq!(points[1].income_minor, 50_000);
    assert_eq!(points[1].expenses_minor, 0);
    assert_eq!(points[1].balance_minor, 50_000);
    assert_eq!(points[2].balance_minor, 0);

    for point in &points {
        assert_eq!(point.balance_minor, point.income_minor - point.expenses_minor);
    }
}

#[tokio::test]
async fn trend_window_is_clamped() {
    let (engine, _db) = engine_with_db().await;
    fixture(&engine).await;

    let today = date(2024, 6, 1);
    let low = engine.monthly_trend("alice", 0, today).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].month, "2024-06");

    let high = engine.monthly_trend("alice", 100, today).await.unwrap();
    assert_eq!(high.len(), 24);
    assert_eq!(high[0].month, "2022-07");
    assert_eq!(high[23].month, "2024-06");
}

#[tokio::test]
async fn trend_excludes_credit_funded_purchases() {
    let (engine, _db) = engine_with_db().await;
    let f = fixture(&engine).await;

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            f.card_id,
            90_000,
            "Cocina",
            f.home_id,
            date(2024, 5, 10),
            3,
        ))
        .await
        .unwrap();
    cash_tx(
        &engine,
        TransactionKind::Expense,
        10_000,
        f.home_id,
        f.cash_id,
        date(2024, 5, 12),
    )
    .await;

    let points = engine
        .monthly_trend("alice", 1, date(2024, 5, 20))
        .await
        .unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].expenses_minor, 10_000);
    assert_eq!(points[0].balance_minor, -10_000);
}

#[tokio::test]
async fn upcoming_payments_sorted_with_card_details() {
    let (engine, _db) = engine_with_db().await;
    let f = fixture(&engine).await;

    let card = engine
        .create_credit_card(CreditCardNewCmd {
            user_id: "alice".to_string(),
            name: "Mastercard".to_string(),
            credit_limit_minor: 400_000,
            last_four: Some("9876".to_string()),
            due_day: None,
            closing_day: None,
        })
        .await
        .unwrap();

    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            card.id,
            30_000,
            "Mesa",
            f.home_id,
            date(2024, 1, 10),
            3,
        ))
        .await
        .unwrap();
    engine
        .card_purchase(CardPurchaseCmd::new(
            "alice",
            f.card_id,
            20_000,
            "Silla",
            f.food_id,
            date(2024, 1, 20),
            2,
        ))
        .await
        .unwrap();

    // Mesa due: Feb 10, Mar 10, Apr 10. Silla due: Feb 20, Mar 20.
    let payments = engine
        .upcoming_payments("alice", date(2024, 3, 1), None)
        .await
        .unwrap();

    assert_eq!(payments.len(), 3);
    assert_eq!(payments[0].due_on, date(2024, 3, 10));
    assert_eq!(payments[0].card_name, "Mastercard");
    assert_eq!(payments[0].card_last_four, Some("9876".to_string()));
    assert_eq!(payments[1].due_on, date(2024, 3, 20));
    assert_eq!(payments[1].description, "Silla (2/2)");
    assert_eq!(payments[2].due_on, date(2024, 4, 10));

    let limited = engine
        .upcoming_payments("alice", date(2024, 3, 1), Some(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].due_on, date(2024, 3, 10));
}

#[tokio::test]
async fn seed_defaults_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    engine.seed_defaults("alice").await.unwrap();
    engine.seed_defaults("alice").await.unwrap();

    let categories = engine.categories("alice").await.unwrap();
    assert_eq!(categories.len(), 8);
    assert!(categories.iter().any(|c| c.name == "Otros"));

    let methods = engine.payment_methods("alice").await.unwrap();
    assert_eq!(methods.len(), 4);
    assert!(
        methods
            .iter()
            .any(|m| m.name == "Efectivo" && m.kind == PaymentMethodKind::Cash)
    );
}
