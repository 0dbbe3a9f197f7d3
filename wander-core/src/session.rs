use std::collections::HashSet;
use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;
use wander_catalog::{ingest, BoundsCalculator, DecisionStatus, Offer, PriceBounds, TransportMode};
use wander_offer::{
    apply, group_by_status, Comparison, ComparisonReport, ComparisonView, Debouncer,
    FilterCriteria, Highlighter, PriceRange, RequestTicket, RequestTracker, Side, SortKey,
    SortSpec, StatusGesture, StatusGroups, Transition, TriageConfig,
};
use wander_order::{Order, OrderError, OrderRequest};
use wander_shared::models::events::{
    CatalogRefreshedEvent, NoteSavedEvent, OrderRequestedEvent, OrderStatusChangedEvent,
    StatusChangedEvent,
};
use wander_shared::{Masked, TriageEvent};
use crate::repository::{OfferSource, OrderSink};
use crate::search::CatalogQuery;
use crate::{CoreError, CoreResult};

const EVENT_CAPACITY: usize = 64;

/// Bounds fetch issued alongside a catalog fetch
#[derive(Debug, Clone)]
pub struct BoundsRequest {
    pub ticket: RequestTicket,
    pub query: CatalogQuery,
}

/// Fetches to run for one refresh, with the tickets their results must present
#[derive(Debug, Clone)]
pub struct RefreshPlan {
    pub ticket: RequestTicket,
    pub query: CatalogQuery,
    pub bounds: Option<BoundsRequest>,
}

/// Single-threaded triage state: criteria, the derived view, decisions and
/// the comparison working set.
///
/// Collaborator results land through `land_*` methods that drop anything
/// answered for a superseded request.
pub struct TriageSession {
    config: TriageConfig,
    criteria: FilterCriteria,
    sort: SortSpec,
    debouncer: Debouncer,
    catalog_requests: RequestTracker,
    bounds_requests: RequestTracker,
    detail_requests: RequestTracker,
    bounds_calculator: BoundsCalculator,
    highlighter: Highlighter,
    catalog: Vec<Offer>,
    bounds: PriceBounds,
    bounds_population: Option<FilterCriteria>,
    view: Vec<Offer>,
    picks: HashSet<Uuid>,
    comparison: Option<Comparison>,
    detail: Option<Offer>,
    events: broadcast::Sender<TriageEvent>,
}

impl TriageSession {
    pub fn new(config: TriageConfig) -> Self {
        let bounds_calculator = BoundsCalculator::new(config.bounds_config());
        let bounds = bounds_calculator.fallback();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            criteria: FilterCriteria::with_price(PriceRange::from(bounds)),
            sort: SortSpec::default(),
            debouncer: Debouncer::new(config.debounce_window()),
            catalog_requests: RequestTracker::new(),
            bounds_requests: RequestTracker::new(),
            detail_requests: RequestTracker::new(),
            highlighter: Highlighter::from_config(&config),
            bounds_calculator,
            catalog: Vec::new(),
            bounds,
            bounds_population: None,
            view: Vec::new(),
            picks: HashSet::new(),
            comparison: None,
            detail: None,
            events,
            config,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TriageEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }

    pub fn catalog(&self) -> &[Offer] {
        &self.catalog
    }

    pub fn view(&self) -> &[Offer] {
        &self.view
    }

    pub fn groups(&self) -> StatusGroups {
        group_by_status(&self.view)
    }

    pub fn detail(&self) -> Option<&Offer> {
        self.detail.as_ref()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn offer(&self, id: Uuid) -> Option<&Offer> {
        self.catalog.iter().find(|o| o.id == id)
    }

    // ---- criteria ----

    /// Replace the criteria and restart the settling window; returns the criteria version
    pub fn edit_criteria(&mut self, criteria: FilterCriteria, now: Instant) -> u64 {
        self.criteria = criteria.normalized(&self.bounds);
        let version = self.debouncer.touch(now);
        debug!(version, "Criteria edited");
        version
    }

    /// Version whose refresh is due at `now`, if the window has settled
    pub fn poll_debounce(&mut self, now: Instant) -> Option<u64> {
        self.debouncer.fire(now)
    }

    /// Sorting needs no fetch; the view is re-derived immediately
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.recompute_view();
    }

    pub fn toggle_sort(&mut self, key: SortKey) -> SortSpec {
        self.set_sort(self.sort.toggled(key));
        self.sort
    }

    // ---- fetch tickets ----

    /// Issue tickets for a catalog fetch and, when the population changed, a bounds fetch
    pub fn begin_refresh(&mut self) -> RefreshPlan {
        let query = CatalogQuery::new(self.criteria.clone(), self.sort);

        let needs_bounds = match &self.bounds_population {
            Some(population) => !population.same_population(&self.criteria),
            None => true,
        };
        let bounds = needs_bounds.then(|| BoundsRequest {
            ticket: self.bounds_requests.begin(),
            query: query.without_price(),
        });

        RefreshPlan {
            ticket: self.catalog_requests.begin(),
            query,
            bounds,
        }
    }

    /// Apply a catalog response; false when it answered a superseded request
    pub fn land_catalog(&mut self, ticket: RequestTicket, offers: Vec<Offer>) -> bool {
        if !self.catalog_requests.is_latest(ticket) {
            debug!(ticket = ticket.0, latest = self.catalog_requests.latest().0, "Dropping stale catalog response");
            return false;
        }

        self.catalog = ingest(offers);
        self.recompute_view();

        if let Some(comparison) = self.comparison.as_mut() {
            for offer in &self.catalog {
                comparison.refresh_offer(offer);
            }
        }

        info!(ticket = ticket.0, offers = self.catalog.len(), visible = self.view.len(), "Catalog refreshed");
        self.publish(TriageEvent::CatalogRefreshed(CatalogRefreshedEvent {
            request_id: ticket.0,
            offer_count: self.catalog.len(),
            timestamp: Utc::now().timestamp(),
        }));
        true
    }

    /// Apply an unfiltered response measured for `request`
    pub fn land_bounds(&mut self, request: &BoundsRequest, offers: &[Offer]) -> bool {
        if !self.bounds_requests.is_latest(request.ticket) {
            debug!(ticket = request.ticket.0, "Dropping stale bounds response");
            return false;
        }

        let bounds = self.bounds_calculator.bounds(offers);
        self.bounds = bounds;
        self.bounds_population = Some(request.query.criteria.clone());

        // A window the user set stays as it is, even outside the new bounds
        let untouched = self.criteria.price == PriceRange::from(self.bounds_calculator.fallback());
        if untouched {
            self.criteria.price = PriceRange::from(bounds);
            self.recompute_view();
        }

        info!(min = bounds.min, max = bounds.max, "Price bounds updated");
        true
    }

    pub fn begin_detail(&mut self) -> RequestTicket {
        self.detail_requests.begin()
    }

    /// Apply an offer-detail response, folding it into the catalog copy
    pub fn land_detail(&mut self, ticket: RequestTicket, offer: Option<Offer>) -> bool {
        if !self.detail_requests.is_latest(ticket) {
            debug!(ticket = ticket.0, "Dropping stale offer detail");
            return false;
        }

        if let Some(detail) = &offer {
            self.replace_offer(detail.clone());
        }
        self.detail = offer;
        true
    }

    // ---- collaborator round trips ----

    /// Fetch and land a catalog for the current criteria
    pub async fn refresh(&mut self, source: &dyn OfferSource) -> CoreResult<()> {
        let plan = self.begin_refresh();

        let offers = source
            .fetch_catalog(&plan.query)
            .await
            .map_err(|e| collaborator_failure("fetch_catalog", e))?;

        let unfiltered = match &plan.bounds {
            Some(request) => Some(
                source
                    .fetch_unfiltered_catalog_for_bounds(&request.query)
                    .await
                    .map_err(|e| collaborator_failure("fetch_unfiltered_catalog_for_bounds", e))?,
            ),
            None => None,
        };

        if let (Some(request), Some(offers)) = (&plan.bounds, &unfiltered) {
            self.land_bounds(request, offers);
        }
        self.land_catalog(plan.ticket, offers);
        Ok(())
    }

    /// Refresh only if `version` is still the newest criteria edit
    pub async fn refresh_for(&mut self, source: &dyn OfferSource, version: u64) -> CoreResult<bool> {
        if !self.debouncer.is_current(version) {
            debug!(version, current = self.debouncer.version(), "Skipping refresh for superseded criteria");
            return Ok(false);
        }
        self.refresh(source).await?;
        Ok(true)
    }

    pub async fn load_detail(&mut self, source: &dyn OfferSource, id: Uuid) -> CoreResult<Option<Offer>> {
        let ticket = self.begin_detail();
        let offer = source
            .fetch_offer_detail(id)
            .await
            .map_err(|e| collaborator_failure("fetch_offer_detail", e))?;

        self.land_detail(ticket, offer);
        Ok(self.detail.clone())
    }

    /// Persist a status change, then apply it locally.
    ///
    /// A failed write leaves every piece of session state as it was.
    pub async fn set_status(
        &mut self,
        source: &dyn OfferSource,
        id: Uuid,
        gesture: StatusGesture,
    ) -> CoreResult<Transition> {
        let current = self
            .offer(id)
            .ok_or_else(|| CoreError::NotFound(format!("offer {}", id)))?
            .status;
        let transition = gesture.plan(current);
        if transition.is_noop() {
            return Ok(transition);
        }

        source
            .set_status(id, transition.to)
            .await
            .map_err(|e| collaborator_failure("set_status", e))?;

        self.apply_status(id, transition);
        info!(offer_id = %id, from = %transition.from, to = %transition.to, "Offer status changed");
        self.publish(TriageEvent::StatusChanged(StatusChangedEvent {
            offer_id: id,
            from: transition.from.as_str().to_string(),
            to: transition.to.as_str().to_string(),
            timestamp: Utc::now().timestamp(),
        }));
        Ok(transition)
    }

    pub async fn set_note(&mut self, source: &dyn OfferSource, id: Uuid, text: &str) -> CoreResult<()> {
        if self.offer(id).is_none() {
            return Err(CoreError::NotFound(format!("offer {}", id)));
        }

        source
            .set_note(id, text)
            .await
            .map_err(|e| collaborator_failure("set_note", e))?;

        let note = (!text.trim().is_empty()).then(|| text.to_string());
        self.update_offer(id, |offer| offer.note = note.clone());
        info!(offer_id = %id, note = %Masked(text), "Note saved");
        self.publish(TriageEvent::NoteSaved(NoteSavedEvent {
            offer_id: id,
            note: Masked(text.to_string()),
            timestamp: Utc::now().timestamp(),
        }));
        Ok(())
    }

    /// Validate and hand a travel request for an accepted offer to the order sink
    pub async fn confirm_travel(
        &mut self,
        sink: &dyn OrderSink,
        offer_id: Uuid,
        party_size: u32,
        transport_mode: TransportMode,
    ) -> CoreResult<Order> {
        let offer = self
            .offer(offer_id)
            .ok_or_else(|| CoreError::NotFound(format!("offer {}", offer_id)))?;
        let request = OrderRequest::new(offer, party_size, transport_mode)?;

        let order = sink
            .create_order(&request)
            .await
            .map_err(|e| collaborator_failure("create_order", e))?;

        info!(order_id = %order.id, offer_id = %offer_id, party_size, "Travel confirmed");
        self.publish(TriageEvent::OrderRequested(OrderRequestedEvent {
            order_id: order.id,
            offer_id,
            party_size,
            transport_mode: transport_mode.as_str().to_string(),
            timestamp: Utc::now().timestamp(),
        }));
        Ok(order)
    }

    /// Move a pending order to CONFIRMED through the sink
    pub async fn confirm_order(&mut self, sink: &dyn OrderSink, order_id: Uuid) -> CoreResult<Order> {
        let order = sink
            .confirm_order(order_id)
            .await
            .map_err(|e| order_failure("confirm_order", e))?;
        self.publish_order_status(&order);
        Ok(order)
    }

    pub async fn cancel_order(&mut self, sink: &dyn OrderSink, order_id: Uuid) -> CoreResult<Order> {
        let order = sink
            .cancel_order(order_id)
            .await
            .map_err(|e| order_failure("cancel_order", e))?;
        self.publish_order_status(&order);
        Ok(order)
    }

    pub async fn orders_for(&self, sink: &dyn OrderSink, offer_id: Uuid) -> CoreResult<Vec<Order>> {
        if self.offer(offer_id).is_none() {
            return Err(CoreError::NotFound(format!("offer {}", offer_id)));
        }
        sink.orders_for_offer(offer_id)
            .await
            .map_err(|e| collaborator_failure("orders_for_offer", e))
    }

    fn publish_order_status(&self, order: &Order) {
        info!(order_id = %order.id, status = order.status.as_str(), "Order status changed");
        self.publish(TriageEvent::OrderStatusChanged(OrderStatusChangedEvent {
            order_id: order.id,
            offer_id: order.offer_id,
            status: order.status.as_str().to_string(),
            timestamp: Utc::now().timestamp(),
        }));
    }

    // ---- comparison ----

    /// Mark or unmark an undecided offer for comparison; returns whether it is now picked
    pub fn toggle_pick(&mut self, id: Uuid) -> CoreResult<bool> {
        let offer = self
            .view
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("offer {} in current view", id)))?;
        if offer.status != DecisionStatus::Undecided {
            return Err(CoreError::ValidationError(format!(
                "only undecided offers can be compared, {} is {}",
                id, offer.status
            )));
        }

        if self.picks.remove(&id) {
            Ok(false)
        } else {
            self.picks.insert(id);
            Ok(true)
        }
    }

    pub fn picks(&self) -> &HashSet<Uuid> {
        &self.picks
    }

    pub fn open_comparison(&mut self) -> ComparisonView {
        let comparison = Comparison::build(&self.view, &self.picks);
        info!(working_set = comparison.len(), picks = self.picks.len(), "Comparison opened");
        let view = comparison.view();
        self.comparison = Some(comparison);
        view
    }

    pub fn close_comparison(&mut self) {
        self.comparison = None;
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn comparison_view(&self) -> Option<ComparisonView> {
        self.comparison.as_ref().map(Comparison::view)
    }

    pub fn skip(&mut self, side: Side) -> CoreResult<ComparisonView> {
        let comparison = self.comparison_mut()?;
        comparison.skip(side);
        Ok(comparison.view())
    }

    pub fn skip_to(&mut self, side: Side, index: usize) -> CoreResult<ComparisonView> {
        let comparison = self.comparison_mut()?;
        comparison.skip_to(side, index);
        Ok(comparison.view())
    }

    /// Metric rows for the pair currently on screen
    pub fn comparison_report(&self) -> Option<ComparisonReport> {
        self.comparison.as_ref()?.report(&self.highlighter)
    }

    fn comparison_mut(&mut self) -> CoreResult<&mut Comparison> {
        self.comparison
            .as_mut()
            .ok_or_else(|| CoreError::ValidationError("no comparison is open".to_string()))
    }

    // ---- local state ----

    fn recompute_view(&mut self) {
        self.view = apply(&self.catalog, &self.criteria, &self.sort);
    }

    fn apply_status(&mut self, id: Uuid, transition: Transition) {
        self.update_offer(id, |offer| offer.status = transition.to);

        if transition.leaves_working_set() {
            self.picks.remove(&id);
            if let Some(comparison) = self.comparison.as_mut() {
                comparison.remove(id);
            }
        }
    }

    fn update_offer(&mut self, id: Uuid, mut change: impl FnMut(&mut Offer)) {
        for offer in self.catalog.iter_mut().filter(|o| o.id == id) {
            change(offer);
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) {
            change(detail);
        }
        if let Some(updated) = self.offer(id).cloned() {
            if let Some(comparison) = self.comparison.as_mut() {
                comparison.refresh_offer(&updated);
            }
        }
        self.recompute_view();
    }

    fn replace_offer(&mut self, replacement: Offer) {
        let id = replacement.id;
        if let Some(slot) = self.catalog.iter_mut().find(|o| o.id == id) {
            *slot = replacement.clone();
        }
        if let Some(comparison) = self.comparison.as_mut() {
            comparison.refresh_offer(&replacement);
        }
        self.recompute_view();
    }

    fn publish(&self, event: TriageEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new(TriageConfig::default())
    }
}

fn collaborator_failure(operation: &str, err: Box<dyn std::error::Error + Send + Sync>) -> CoreError {
    error!(operation, error = %err, "Collaborator call failed");
    CoreError::CollaboratorError(format!("{}: {}", operation, err))
}

/// Order refusals (unknown order, illegal transition) reach the user as they are
fn order_failure(operation: &str, err: Box<dyn std::error::Error + Send + Sync>) -> CoreError {
    match err.downcast::<OrderError>() {
        Ok(refusal) => CoreError::Order(*refusal),
        Err(other) => collaborator_failure(operation, other),
    }
}
