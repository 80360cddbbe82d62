//! Order fulfilment walkthrough
//!
//! Runs all four contracts against one in-memory world state:
//! - A product and a route are registered
//! - An order is placed, shipped and given feedback
//! - A payment is made against the order
//! - History and emitted events are printed at the end
//!
//! Pass `--json` for structured log output.

use anyhow::Result;
use recordcore::{init_logging, LoggingConfig, RecordKey};
use recordcore_contracts::{
    NewOrder, NewPayment, NewProduct, NewRoute, OrderContract, PaymentContract, ProductContract,
    RouteContract, RouteUpdate,
};
use recordcore_memory::{InMemoryEventSink, InMemoryWorldState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let mut logging = LoggingConfig::new();
    if std::env::args().any(|arg| arg == "--json") {
        logging = logging.with_json_format();
    }
    init_logging(&logging)?;

    info!("Starting order fulfilment walkthrough");

    // One keyspace shared by every family, as on the ledger
    let world_state = InMemoryWorldState::new();
    let events = InMemoryEventSink::new();

    let orders = OrderContract::new(world_state.clone(), events.clone())?;
    let payments = PaymentContract::new(world_state.clone(), events.clone())?;
    let products = ProductContract::new(world_state.clone(), events.clone())?;
    let routes = RouteContract::new(world_state.clone(), events.clone())?;

    for probe in [
        orders.init_ledger(),
        payments.init_ledger(),
        products.init_ledger(),
        routes.init_ledger(),
    ] {
        info!("{probe}");
    }

    let product_id = RecordKey::try_new("PR-1001")?;
    products
        .add_product(NewProduct {
            product_id: product_id.clone(),
            product_title: "Insulin".to_string(),
            unit: "box".to_string(),
            price: 12.5,
            supplier: "Acme Pharma".to_string(),
            stock: 40,
            temperature_constraints: "2-8C".to_string(),
            humidity: "<60%".to_string(),
            other_logistical_parameters: "keep upright".to_string(),
            timestamp: "2024-01-01T08:00".to_string(),
        })
        .await?;

    let order_id = RecordKey::try_new("O1")?;
    info!("Placing order {order_id}");
    orders
        .place_order(NewOrder {
            order_id: order_id.clone(),
            item_count: 2,
            customer_id: "C1".to_string(),
            lat: 24.86,
            long: 67.01,
            delivery_schedule_id: "DS-7".to_string(),
            delivery_charges: 1.5,
            delivery_date_time: "2024-01-02T10:00".to_string(),
            order_place_date_time: "2024-01-01T09:00".to_string(),
            gross_total: 25.0,
            discount: 2.5,
            vat: 3.6,
            net_total: 27.6,
            status_title: "Placed".to_string(),
            status_timestamp: "t1".to_string(),
        })
        .await?;

    let route_id = RecordKey::try_new("R1")?;
    routes
        .add_route(NewRoute {
            route_id: route_id.clone(),
            customer_id: "C1".to_string(),
            departure: "Warehouse 3".to_string(),
            destination: "Clifton".to_string(),
            data_points: "[[24.80,67.00],[24.86,67.01]]".to_string(),
            eta: "2024-01-02T09:45".to_string(),
            timestamp: "2024-01-01T09:05".to_string(),
        })
        .await?;

    info!("Shipping order {order_id}");
    orders
        .update_order_status(&order_id, "Shipped", "t2")
        .await?;
    routes
        .update_route(
            &route_id,
            RouteUpdate {
                departure: "Warehouse 3".to_string(),
                destination: "Clifton".to_string(),
                data_points: "[[24.80,67.00],[24.83,67.02],[24.86,67.01]]".to_string(),
                eta: "2024-01-02T10:10".to_string(),
                update_timestamp: "2024-01-02T09:30".to_string(),
            },
        )
        .await?;

    payments
        .make_payment(NewPayment {
            payment_id: RecordKey::try_new("PAY-1")?,
            order_id: order_id.to_string(),
            customer_id: "C1".to_string(),
            net_total: 27.6,
            paid_amt: 27.6,
            timestamp: "t3".to_string(),
        })
        .await?;

    orders
        .post_order_feedback(&order_id, r#"{"rating":5,"comment":"on time"}"#)
        .await?;

    let shipped = orders.get_order_by_status("Shipped").await?;
    info!("{} order(s) shipped", shipped.len());

    let all_orders = orders.get_all_orders().await?;
    info!(
        "{} order(s) in a keyspace of {} record(s)",
        all_orders.len(),
        world_state.key_count()
    );

    for entry in orders.get_order_history(&order_id).await? {
        info!("  {}", entry.record);
    }

    let paid = payments.get_payments_by_order_id(order_id.as_str()).await?;
    info!("{} payment(s) against {order_id}", paid.len());

    let product = products.get_product_by_id(&product_id).await?;
    info!(
        "{} ({} in stock, last updated: {})",
        product.product_title, product.stock, product.update_timestamp
    );

    match orders
        .update_order_status(&RecordKey::try_new("O404")?, "Shipped", "t4")
        .await
    {
        Ok(_) => anyhow::bail!("updating a missing order should fail"),
        Err(e) => info!("Update correctly rejected: {e}"),
    }

    info!("Events emitted:");
    for event in events.events() {
        info!("  {}", event.name);
    }

    info!("Walkthrough completed successfully");
    Ok(())
}
