mod common;

use exchange_register::{
    entities::prelude::*,
    services::exchange_rate::{ExchangeRateService, ExchangeService},
    store::StoreError,
};
use sea_orm::EntityTrait;

use crate::common::{all_exchanges, history_for, setup_test_db, FaultyStore};

async fn setup_service() -> ExchangeRateService<sea_orm::DatabaseConnection> {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    ExchangeRateService::new(db)
}

#[tokio::test]
async fn test_first_rate_creates_exchange_and_history() {
    let service = setup_service().await;

    service.receive_exchange_rate("USD", "BRL", 5.25).await.unwrap();

    let exchanges = all_exchanges(service.store()).await;
    assert_eq!(exchanges.len(), 1);
    let usd_brl = &exchanges[0];
    assert_eq!(usd_brl.base_currency, "USD");
    assert_eq!(usd_brl.target_currency, "BRL");
    assert_eq!(usd_brl.rate, 5.25);
    assert!(usd_brl.updated_at.is_none());

    let history = history_for(service.store(), usd_brl.id).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].rate, 5.25);
}

/// USD->BRL at 5.25, then 5.50: one exchange row holding the latest rate and
/// two history entries in arrival order.
#[tokio::test]
async fn test_second_rate_updates_in_place_and_appends_history() {
    let service = setup_service().await;

    service.receive_exchange_rate("USD", "BRL", 5.25).await.unwrap();
    let created = all_exchanges(service.store()).await.remove(0);

    service.receive_exchange_rate("USD", "BRL", 5.50).await.unwrap();
    let exchanges = all_exchanges(service.store()).await;

    assert_eq!(exchanges.len(), 1);
    let updated = &exchanges[0];
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.rate, 5.50);
    assert_eq!(updated.created_at, created.created_at);

    let updated_at = updated.updated_at.expect("update should stamp updated_at");
    assert!(updated_at >= updated.created_at);
    assert_eq!(updated.last_acquisition(), updated_at);

    let rates: Vec<f64> = history_for(service.store(), updated.id)
        .await
        .into_iter()
        .map(|h| h.rate)
        .collect();
    assert_eq!(rates, vec![5.25, 5.50]);
}

#[tokio::test]
async fn test_every_receive_appends_exactly_one_history_row() {
    let service = setup_service().await;

    for rate in [5.10, 5.20, 5.30, 5.40] {
        service.receive_exchange_rate("EUR", "BRL", rate).await.unwrap();
    }

    let exchanges = all_exchanges(service.store()).await;
    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].rate, 5.40);
    assert_eq!(history_for(service.store(), exchanges[0].id).await.len(), 4);
}

#[tokio::test]
async fn test_pairs_are_directional() {
    let service = setup_service().await;

    service.receive_exchange_rate("USD", "BRL", 5.25).await.unwrap();
    service.receive_exchange_rate("BRL", "USD", 0.19).await.unwrap();

    let exchanges = all_exchanges(service.store()).await;
    assert_eq!(exchanges.len(), 2);
    assert_eq!(exchanges[0].rate, 5.25);
    assert_eq!(exchanges[1].rate, 0.19);
}

#[tokio::test]
async fn test_list_filter_combinations() {
    let service = setup_service().await;
    service.receive_exchange_rate("USD", "BRL", 5.25).await.unwrap();
    service.receive_exchange_rate("EUR", "BRL", 5.75).await.unwrap();
    service.receive_exchange_rate("GBP", "USD", 1.27).await.unwrap();

    let pairs = |rows: Vec<exchange_register::entities::exchanges::Model>| {
        rows.into_iter()
            .map(|r| format!("{}/{}", r.base_currency, r.target_currency))
            .collect::<Vec<_>>()
    };

    let all = service.list_exchanges(None, None).await.unwrap();
    assert_eq!(pairs(all), vec!["USD/BRL", "EUR/BRL", "GBP/USD"]);

    let from_usd = service.list_exchanges(Some("USD"), None).await.unwrap();
    assert_eq!(pairs(from_usd), vec!["USD/BRL"]);

    let to_brl = service.list_exchanges(None, Some("BRL")).await.unwrap();
    assert_eq!(pairs(to_brl), vec!["USD/BRL", "EUR/BRL"]);

    let exact = service.list_exchanges(Some("GBP"), Some("USD")).await.unwrap();
    assert_eq!(pairs(exact), vec!["GBP/USD"]);

    let none = service.list_exchanges(Some("JPY"), Some("BRL")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_on_empty_store_is_empty() {
    let service = setup_service().await;

    let rows = service.list_exchanges(None, None).await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_lookup_failure_writes_nothing() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let mut store = FaultyStore::new(db);
    store.fail_selects = true;
    let service = ExchangeRateService::new(store);

    let result = service.receive_exchange_rate("USD", "BRL", 5.25).await;

    assert!(matches!(result, Err(StoreError::Database(_))));
    assert_eq!(service.store().exec_calls(), 0);
    assert!(all_exchanges(service.store().inner()).await.is_empty());
}

/// A failed history append is reported, but the exchange write before it is
/// not rolled back.
#[tokio::test]
async fn test_history_failure_keeps_exchange_write() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let mut store = FaultyStore::new(db);
    store.fail_exec_on = Some("exchange_rate_history");
    let service = ExchangeRateService::new(store);

    let result = service.receive_exchange_rate("USD", "BRL", 5.25).await;

    assert!(result.is_err());
    let exchanges = all_exchanges(service.store().inner()).await;
    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].rate, 5.25);
    assert!(history_for(service.store().inner(), exchanges[0].id).await.is_empty());
}

#[tokio::test]
async fn test_deleting_exchange_cascades_to_history() {
    let service = setup_service().await;
    service.receive_exchange_rate("USD", "BRL", 5.25).await.unwrap();
    service.receive_exchange_rate("USD", "BRL", 5.50).await.unwrap();
    let exchange = all_exchanges(service.store()).await.remove(0);

    Exchanges::delete_by_id(exchange.id)
        .exec(service.store())
        .await
        .unwrap();

    assert!(history_for(service.store(), exchange.id).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_receives_for_different_pairs() {
    let service = setup_service().await;

    let (usd, eur) = tokio::join!(
        service.receive_exchange_rate("USD", "BRL", 5.25),
        service.receive_exchange_rate("EUR", "BRL", 5.75),
    );
    usd.unwrap();
    eur.unwrap();

    let rows = service.list_exchanges(None, Some("BRL")).await.unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(history_for(service.store(), row.id).await.len(), 1);
    }
}
