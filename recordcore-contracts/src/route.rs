//! Delivery routes.

use crate::NEVER_UPDATED;
use recordcore::{
    DomainEvent, EventSink, HistoryEntry, QueryResult, Record, RecordContract, RecordKey,
    RecordResult, RecordStore, StoreConfig, WorldState,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A route as stored in the world state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Always `"Route"`
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// Route identifier and world-state key
    #[serde(rename = "RouteID")]
    pub route_id: RecordKey,
    /// Customer the route delivers to
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    /// Starting point
    #[serde(rename = "Departure")]
    pub departure: String,
    /// End point
    #[serde(rename = "Destination")]
    pub destination: String,
    /// Opaque waypoint list
    #[serde(rename = "DataPoints")]
    pub data_points: String,
    /// Estimated time of arrival
    #[serde(rename = "ETA")]
    pub eta: String,
    /// Time the route was added
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    /// Time of the last update
    #[serde(rename = "UpdateTimeStamp")]
    pub update_timestamp: String,
}

impl Route {
    /// Attribute holding the destination.
    pub const DESTINATION: &'static str = "Destination";
}

impl Record for Route {
    const DOC_TYPE: &'static str = "Route";
    const ID_FIELD: &'static str = "RouteID";

    fn key(&self) -> &RecordKey {
        &self.route_id
    }

    fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Everything the caller supplies when adding a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoute {
    /// Route identifier
    pub route_id: RecordKey,
    /// Customer the route delivers to
    pub customer_id: String,
    /// Starting point
    pub departure: String,
    /// End point
    pub destination: String,
    /// Opaque waypoint list
    pub data_points: String,
    /// Estimated time of arrival
    pub eta: String,
    /// Time the route was added
    pub timestamp: String,
}

impl From<NewRoute> for Route {
    fn from(new: NewRoute) -> Self {
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            route_id: new.route_id,
            customer_id: new.customer_id,
            departure: new.departure,
            destination: new.destination,
            data_points: new.data_points,
            eta: new.eta,
            timestamp: new.timestamp,
            update_timestamp: NEVER_UPDATED.to_string(),
        }
    }
}

/// Replacement values for a route. The customer stays fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUpdate {
    /// New starting point
    pub departure: String,
    /// New end point
    pub destination: String,
    /// New waypoint list
    pub data_points: String,
    /// New estimated time of arrival
    pub eta: String,
    /// Time of this update
    pub update_timestamp: String,
}

/// Events emitted by the route contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    /// A new route was written
    Added,
    /// A route was replaced
    Updated,
}

impl DomainEvent for RouteEvent {
    fn event_name(self) -> &'static str {
        match self {
            Self::Added => "RouteAdded",
            Self::Updated => "RouteUpdated",
        }
    }
}

/// The route contract.
#[derive(Debug, Clone)]
pub struct RouteContract<W, S> {
    inner: RecordContract<Route, W, S>,
}

impl<W, S> RouteContract<W, S>
where
    W: WorldState,
    S: EventSink,
{
    /// Creates the contract with the default store configuration.
    pub fn new(world_state: W, events: S) -> RecordResult<Self> {
        Self::with_config(world_state, events, StoreConfig::default())
    }

    /// Creates the contract with an explicit store configuration.
    pub fn with_config(world_state: W, events: S, config: StoreConfig) -> RecordResult<Self> {
        let store = RecordStore::with_config(world_state, config)?;
        Ok(Self {
            inner: RecordContract::new(store, events),
        })
    }

    /// Deployment probe. Touches nothing.
    pub const fn init_ledger(&self) -> &'static str {
        "Route Chaincode Invoked!"
    }

    /// Writes a new route and emits `RouteAdded`.
    #[instrument(skip(self, route), fields(route_id = %route.route_id))]
    pub async fn add_route(&self, route: NewRoute) -> RecordResult<Route> {
        self.inner.create(Route::from(route), RouteEvent::Added).await
    }

    /// Every route in the world state, paired with its key.
    pub async fn get_all_routes(&self) -> RecordResult<Vec<QueryResult<Route>>> {
        self.inner.read_all().await
    }

    /// The route stored under `route_id`.
    pub async fn get_route_by_id(&self, route_id: &RecordKey) -> RecordResult<Route> {
        self.inner.read_by_id(route_id).await
    }

    /// Routes ending at `destination`.
    pub async fn get_routes_by_destination(&self, destination: &str) -> RecordResult<Vec<Route>> {
        self.inner
            .read_by_attribute(Route::DESTINATION, destination)
            .await
    }

    /// Every revision of the route, newest first.
    pub async fn get_route_history(&self, route_id: &RecordKey) -> RecordResult<Vec<HistoryEntry>> {
        self.inner.history(route_id).await
    }

    /// Replaces the itinerary, then emits `RouteUpdated`.
    #[instrument(skip(self, route_id, update), fields(route_id = %route_id))]
    pub async fn update_route(
        &self,
        route_id: &RecordKey,
        update: RouteUpdate,
    ) -> RecordResult<Route> {
        self.inner
            .update(route_id, RouteEvent::Updated, move |route| {
                route.departure = update.departure;
                route.destination = update.destination;
                route.data_points = update.data_points;
                route.eta = update.eta;
                route.update_timestamp = update.update_timestamp;
            })
            .await
    }

    /// The shared contract skeleton underneath.
    pub const fn contract(&self) -> &RecordContract<Route, W, S> {
        &self.inner
    }
}
