use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;
use wander_core::TriageSession;
use wander_offer::{FilterCriteria, PriceRange, TriageConfig};
use wander_store::MemoryOfferStore;
use crate::commands::{Command, FilterEdit, HELP};
use crate::error::AppError;
use crate::render;

/// Everything one console user works with
pub struct AppState {
    pub session: TriageSession,
    pub store: Arc<MemoryOfferStore>,
}

impl AppState {
    pub fn new(config: TriageConfig, store: Arc<MemoryOfferStore>) -> Self {
        Self {
            session: TriageSession::new(config),
            store,
        }
    }

    /// Run the refresh for a settled criteria edit, if one is due at `now`
    pub async fn settle(&mut self, now: Instant) -> Result<Option<String>, AppError> {
        let Some(version) = self.session.poll_debounce(now) else {
            return Ok(None);
        };
        if !self.session.refresh_for(self.store.as_ref(), version).await? {
            return Ok(None);
        }
        Ok(Some(render::listing(self.session.view())))
    }

    pub async fn dispatch(&mut self, command: Command, now: Instant) -> Result<String, AppError> {
        match command {
            Command::List => Ok(render::listing(self.session.view())),
            Command::Refresh => {
                self.session.refresh(self.store.as_ref()).await?;
                Ok(render::listing(self.session.view()))
            }
            Command::Bounds => Ok(render::bounds(self.session.bounds(), self.session.criteria())),
            Command::Filter(edit) => {
                let criteria = edited(self.session.criteria(), edit);
                let version = self.session.edit_criteria(criteria, now);
                info!(version, "Filter change scheduled");
                Ok(render::criteria(self.session.criteria()))
            }
            Command::Sort(key) => {
                let sort = self.session.toggle_sort(key);
                Ok(format!(
                    "sorted by {:?} {:?}\n{}",
                    sort.key,
                    sort.direction,
                    render::listing(self.session.view())
                ))
            }
            Command::Status { position, gesture } => {
                let id = self.offer_at(position)?;
                let transition = self.session.set_status(self.store.as_ref(), id, gesture).await?;
                let mut out = format!("{} -> {}", transition.from, transition.to);
                if let Some(view) = self.session.comparison_view() {
                    out.push('\n');
                    out.push_str(&render::comparison(&view, self.session.comparison_report().as_ref(), self.base()));
                }
                Ok(out)
            }
            Command::Note { position, text } => {
                let id = self.offer_at(position)?;
                self.session.set_note(self.store.as_ref(), id, &text).await?;
                Ok("note saved".to_string())
            }
            Command::Detail(position) => {
                let id = self.offer_at(position)?;
                match self.session.load_detail(self.store.as_ref(), id).await? {
                    Some(offer) => Ok(render::detail(&offer)),
                    None => Err(AppError::NotFoundError(format!("offer #{}", position))),
                }
            }
            Command::Pick(position) => {
                let id = self.offer_at(position)?;
                let picked = self.session.toggle_pick(id)?;
                Ok(format!(
                    "#{} {} ({} picked)",
                    position,
                    if picked { "picked" } else { "unpicked" },
                    self.session.picks().len()
                ))
            }
            Command::Compare => {
                let view = self.session.open_comparison();
                Ok(render::comparison(&view, self.session.comparison_report().as_ref(), self.base()))
            }
            Command::CloseComparison => {
                self.session.close_comparison();
                Ok("comparison closed".to_string())
            }
            Command::Skip(side) => {
                let view = self.session.skip(side)?;
                Ok(render::comparison(&view, self.session.comparison_report().as_ref(), self.base()))
            }
            Command::Goto { side, position } => {
                let view = self.session.skip_to(side, position - 1)?;
                Ok(render::comparison(&view, self.session.comparison_report().as_ref(), self.base()))
            }
            Command::Book { position, party_size, transport } => {
                let id = self.offer_at(position)?;
                let order = self
                    .session
                    .confirm_travel(self.store.as_ref(), id, party_size, transport)
                    .await?;
                Ok(format!(
                    "order {} {} for {} traveller(s) by {}",
                    order.id,
                    order.status.as_str(),
                    order.party_size,
                    order.transport_mode
                ))
            }
            Command::Orders(position) => {
                let id = self.offer_at(position)?;
                let orders = self.session.orders_for(self.store.as_ref(), id).await?;
                Ok(render::orders(&orders))
            }
            Command::ConfirmOrder(order_id) => {
                let order = self.session.confirm_order(self.store.as_ref(), order_id).await?;
                Ok(format!("order {} {}", order.id, order.status.as_str()))
            }
            Command::CancelOrder(order_id) => {
                let order = self.session.cancel_order(self.store.as_ref(), order_id).await?;
                Ok(format!("order {} {}", order.id, order.status.as_str()))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok("bye".to_string()),
        }
    }

    /// Offer id at a 1-based position of the current view
    pub fn offer_at(&self, position: usize) -> Result<Uuid, AppError> {
        position
            .checked_sub(1)
            .and_then(|i| self.session.view().get(i))
            .map(|o| o.id)
            .ok_or_else(|| AppError::NotFoundError(format!("offer #{}", position)))
    }

    fn base(&self) -> u8 {
        self.session.config().neutral_channel
    }
}

fn edited(current: &FilterCriteria, edit: FilterEdit) -> FilterCriteria {
    let mut criteria = current.clone();
    match edit {
        FilterEdit::Origin(text) => criteria.origin = text,
        FilterEdit::Destination(text) => criteria.destination = text,
        FilterEdit::Price(min, max) => criteria.price = PriceRange::new(min, max),
        FilterEdit::Status(status) => criteria.status = status,
        FilterEdit::Season(season) => criteria.season = season,
        FilterEdit::StayType(stay) => criteria.stay_type = stay,
        FilterEdit::Clear => {
            criteria = FilterCriteria::with_price(current.price);
        }
    }
    criteria
}
