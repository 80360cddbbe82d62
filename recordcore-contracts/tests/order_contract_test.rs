mod common;

use common::{key, new_order, new_payment, new_product, Ledger};
use proptest::prelude::*;
use recordcore::{RecordError, WorldState};
use recordcore_contracts::{Order, OrderContract, PaymentContract, ProductContract};
use recordcore_memory::{FaultKind, InMemoryEventSink, InMemoryWorldState, LedgerOperation};
use tracing_test::traced_test;

fn orders(ledger: &Ledger) -> OrderContract<InMemoryWorldState, InMemoryEventSink> {
    OrderContract::new(ledger.world_state.clone(), ledger.events.clone()).unwrap()
}

#[test]
fn init_ledger_reports_the_contract() {
    let ledger = Ledger::new();
    assert_eq!(orders(&ledger).init_ledger(), "Order Chaincode Invoked!");
    assert_eq!(ledger.world_state.key_count(), 0);
}

/// Place O1, ship it, read it back and walk its history.
#[tokio::test]
async fn shipped_order_keeps_two_revisions() {
    // Given: an order placed with status Placed at t1
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders
        .place_order(new_order("O1", "C1", "Placed"))
        .await
        .unwrap();

    // When: its status is set to Shipped at t2
    orders
        .update_order_status(&key("O1"), "Shipped", "t2")
        .await
        .unwrap();

    // Then: the current value carries the new status
    let order = orders.get_order_by_id(&key("O1")).await.unwrap();
    assert_eq!(order.status_title, "Shipped");
    assert_eq!(order.status_timestamp, "t2");

    // And: history has both revisions, newest first
    let history = orders.get_order_history(&key("O1")).await.unwrap();
    assert_eq!(history.len(), 2);
    let first: Order = history[0].decode().unwrap();
    let second: Order = history[1].decode().unwrap();
    assert_eq!(first.status_title, "Shipped");
    assert_eq!(second.status_title, "Placed");
    assert_eq!(second.status_timestamp, "t1");

    // And: one event per mutation
    let names: Vec<String> = ledger
        .events
        .events()
        .iter()
        .map(|event| event.name.to_string())
        .collect();
    assert_eq!(names, vec!["OrderPlaced", "OrderUpdated"]);
}

#[tokio::test]
async fn placed_order_reads_back_with_discriminator() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);

    let placed = orders
        .place_order(new_order("O1", "C1", "Placed"))
        .await
        .unwrap();

    let loaded = orders.get_order_by_id(&key("O1")).await.unwrap();
    assert_eq!(loaded, placed);
    assert_eq!(loaded.doc_type, "Order");
    assert_eq!(loaded.feedback, "");
    assert_eq!(loaded.item_count, 2);
}

#[tokio::test]
async fn status_update_changes_nothing_else() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    let placed = orders
        .place_order(new_order("O1", "C1", "Placed"))
        .await
        .unwrap();

    let updated = orders
        .update_order_status(&key("O1"), "Shipped", "t2")
        .await
        .unwrap();

    let expected = Order {
        status_title: "Shipped".to_string(),
        status_timestamp: "t2".to_string(),
        ..placed
    };
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn feedback_is_stored_verbatim() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders
        .place_order(new_order("O1", "C1", "Delivered"))
        .await
        .unwrap();
    let feedback = r#"{"rating":4,"comment":"box was dented"}"#;

    orders.post_order_feedback(&key("O1"), feedback).await.unwrap();

    let order = orders.get_order_by_id(&key("O1")).await.unwrap();
    assert_eq!(order.feedback, feedback);
    assert_eq!(order.status_title, "Delivered");
    assert_eq!(
        ledger.events.last().unwrap().name.as_str(),
        "FeedBackUpdated"
    );
}

#[tokio::test]
async fn update_of_unknown_order_is_not_found() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);

    let error = orders
        .update_order_status(&key("O404"), "Shipped", "t2")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        RecordError::NotFound {
            doc_type: "Order".to_string(),
            id: "O404".to_string()
        }
    );
    assert_eq!(error.to_string(), "Order 'O404' does not exist");
    assert!(ledger.events.is_empty());
}

#[tokio::test]
async fn feedback_on_unknown_order_is_not_found() {
    let ledger = Ledger::new();

    let error = orders(&ledger)
        .post_order_feedback(&key("O404"), "great")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn orders_are_found_by_customer_and_status() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();
    orders.place_order(new_order("O2", "C2", "Placed")).await.unwrap();
    orders.place_order(new_order("O3", "C1", "Shipped")).await.unwrap();

    let by_customer = orders.get_orders_by_customer_id("C1").await.unwrap();
    let mut ids: Vec<&str> = by_customer.iter().map(|o| o.order_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["O1", "O3"]);

    let placed = orders.get_order_by_status("Placed").await.unwrap();
    assert_eq!(placed.len(), 2);
    assert!(placed.iter().all(|o| o.status_title == "Placed"));

    assert!(orders.get_orders_by_customer_id("C9").await.unwrap().is_empty());
    assert!(orders.get_order_by_status("Lost").await.unwrap().is_empty());
}

#[tokio::test]
async fn queries_do_not_cross_families() {
    // Given: an order and a payment for the same customer in one keyspace
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    let payments =
        PaymentContract::new(ledger.world_state.clone(), ledger.events.clone()).unwrap();
    orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();
    payments.make_payment(new_payment("P1", "O1")).await.unwrap();

    // Then: order reads only see orders
    let all = orders.get_all_orders().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key, "O1");
    assert_eq!(orders.get_orders_by_customer_id("C1").await.unwrap().len(), 1);
    assert!(orders.get_order_by_id(&key("P1")).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn placing_an_existing_id_overwrites() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();

    orders.place_order(new_order("O1", "C2", "Placed")).await.unwrap();

    assert_eq!(
        orders.get_order_by_id(&key("O1")).await.unwrap().customer_id,
        "C2"
    );
    assert_eq!(orders.get_all_orders().await.unwrap().len(), 1);
    assert_eq!(
        orders.get_order_history(&key("O1")).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn event_payload_is_the_stored_value() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();
    orders
        .update_order_status(&key("O1"), "Shipped", "t2")
        .await
        .unwrap();

    let stored = ledger.world_state.get_state(&key("O1")).await.unwrap();
    assert_eq!(stored, Some(ledger.events.last().unwrap().payload));
}

#[tokio::test]
async fn history_of_unknown_order_is_unavailable() {
    let ledger = Ledger::new();

    let error = orders(&ledger)
        .get_order_history(&key("O404"))
        .await
        .unwrap_err();

    assert!(matches!(error, RecordError::HistoryUnavailable { .. }));
}

#[tokio::test]
async fn history_ignores_other_families_under_the_same_key() {
    // Given: a product written under X1, then an order placed under X1
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    let products =
        ProductContract::new(ledger.world_state.clone(), ledger.events.clone()).unwrap();
    products.add_product(new_product("X1", "Insulin")).await.unwrap();
    assert!(matches!(
        orders.get_order_history(&key("X1")).await.unwrap_err(),
        RecordError::HistoryUnavailable { .. }
    ));
    orders.place_order(new_order("X1", "C1", "Placed")).await.unwrap();

    // When: the order history is read
    let history = orders.get_order_history(&key("X1")).await.unwrap();

    // Then: only the order revision is listed
    assert_eq!(history.len(), 1);
    let order: Order = history[0].decode().unwrap();
    assert_eq!(order.customer_id, "C1");
}

#[tokio::test]
async fn non_finite_coordinates_are_rejected_before_writing() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);

    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut order = new_order("O1", "C1", "Placed");
        order.lat = bad;

        let error = orders.place_order(order).await.unwrap_err();

        assert!(matches!(error, RecordError::Serialization(_)), "{error:?}");
    }

    // Nothing was written or announced
    assert!(ledger.events.is_empty());
    assert_eq!(ledger.world_state.key_count(), 0);
    assert!(orders.get_all_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn write_conflict_reaches_the_caller() {
    let ledger = Ledger::new();
    let orders = orders(&ledger);
    orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();
    ledger
        .world_state
        .faults()
        .fail_next(LedgerOperation::PutState, FaultKind::Conflict);

    let error = orders
        .update_order_status(&key("O1"), "Shipped", "t2")
        .await
        .unwrap_err();

    assert!(error.is_conflict());
    assert_eq!(
        orders.get_order_by_id(&key("O1")).await.unwrap().status_title,
        "Placed"
    );
    assert_eq!(ledger.events.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn placing_an_order_logs_the_event() {
    let ledger = Ledger::new();

    orders(&ledger)
        .place_order(new_order("O1", "C1", "Placed"))
        .await
        .unwrap();

    assert!(logs_contain("event emitted"));
    assert!(logs_contain("OrderPlaced"));
}

proptest! {
    #[test]
    fn every_status_change_adds_one_revision(
        statuses in prop::collection::vec("[A-Z][a-z]{2,10}", 1..8)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ledger = Ledger::new();
            let orders = orders(&ledger);
            orders.place_order(new_order("O1", "C1", "Placed")).await.unwrap();

            for (i, status) in statuses.iter().enumerate() {
                orders
                    .update_order_status(&key("O1"), status.as_str(), format!("t{}", i + 2))
                    .await
                    .unwrap();
            }

            let history = orders.get_order_history(&key("O1")).await.unwrap();
            prop_assert_eq!(history.len(), statuses.len() + 1);

            let newest: Order = history[0].decode().unwrap();
            let current = orders.get_order_by_id(&key("O1")).await.unwrap();
            prop_assert_eq!(&newest, &current);
            prop_assert_eq!(Some(&current.status_title), statuses.last());
            Ok(())
        })?;
    }
}
