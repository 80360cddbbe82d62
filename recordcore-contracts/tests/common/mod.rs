//! Fixtures shared by the contract integration tests.

use recordcore::RecordKey;
use recordcore_contracts::{NewOrder, NewPayment, NewProduct, NewRoute};
use recordcore_memory::{InMemoryEventSink, InMemoryWorldState};

/// One world state and one event sink, shared by every contract under test.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub world_state: InMemoryWorldState,
    pub events: InMemoryEventSink,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn key(raw: &str) -> RecordKey {
    RecordKey::try_new(raw).unwrap()
}

pub fn new_order(id: &str, customer_id: &str, status: &str) -> NewOrder {
    NewOrder {
        order_id: key(id),
        item_count: 2,
        customer_id: customer_id.to_string(),
        lat: 24.86,
        long: 67.01,
        delivery_schedule_id: "DS1".to_string(),
        delivery_charges: 1.5,
        delivery_date_time: "2024-01-02T10:00".to_string(),
        order_place_date_time: "2024-01-01T09:00".to_string(),
        gross_total: 20.5,
        discount: 0.5,
        vat: 2.5,
        net_total: 22.5,
        status_title: status.to_string(),
        status_timestamp: "t1".to_string(),
    }
}

pub fn new_payment(id: &str, order_id: &str) -> NewPayment {
    NewPayment {
        payment_id: key(id),
        order_id: order_id.to_string(),
        customer_id: "C1".to_string(),
        net_total: 22.5,
        paid_amt: 22.5,
        timestamp: "t1".to_string(),
    }
}

pub fn new_product(id: &str, title: &str) -> NewProduct {
    NewProduct {
        product_id: key(id),
        product_title: title.to_string(),
        unit: "box".to_string(),
        price: 12.5,
        supplier: "Acme".to_string(),
        stock: 40,
        temperature_constraints: "2-8C".to_string(),
        humidity: "<60%".to_string(),
        other_logistical_parameters: "fragile".to_string(),
        timestamp: "t1".to_string(),
    }
}

pub fn new_route(id: &str, destination: &str) -> NewRoute {
    NewRoute {
        route_id: key(id),
        customer_id: "C1".to_string(),
        departure: "Warehouse 3".to_string(),
        destination: destination.to_string(),
        data_points: "[]".to_string(),
        eta: "2024-01-02T11:30".to_string(),
        timestamp: "t1".to_string(),
    }
}
