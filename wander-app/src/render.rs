use std::fmt::Write;
use wander_catalog::{DecisionStatus, Offer, PriceBounds};
use wander_offer::{group_by_status, ComparisonReport, ComparisonView, FilterCriteria, MetricKind};
use wander_order::Order;

/// Offers grouped by decision, numbered by their position in the view
pub fn listing(view: &[Offer]) -> String {
    if view.is_empty() {
        return "no offers match the current filters".to_string();
    }

    let groups = group_by_status(view);
    let mut out = String::new();
    for status in [DecisionStatus::Accepted, DecisionStatus::Undecided, DecisionStatus::Rejected] {
        let offers = groups.get(status);
        if offers.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} ({})", status, offers.len());
        for offer in offers {
            let position = view.iter().position(|o| o.id == offer.id).map_or(0, |i| i + 1);
            let _ = writeln!(out, "  {:>3}. {}", position, summary(offer));
        }
    }
    out.trim_end().to_string()
}

fn summary(offer: &Offer) -> String {
    let dates = match (offer.date_from, offer.date_to) {
        (Some(from), Some(to)) => format!("{} to {}", from, to),
        _ => "undated".to_string(),
    };
    format!(
        "{} from {} | {} | {}{}",
        offer.destination_name,
        offer.origin,
        offer.composite_price(),
        dates,
        if offer.note.is_some() { " | *note" } else { "" }
    )
}

pub fn bounds(bounds: PriceBounds, criteria: &FilterCriteria) -> String {
    format!(
        "price bounds {}..{}, current window {}..{}",
        bounds.min, bounds.max, criteria.price.min, criteria.price.max
    )
}

pub fn criteria(criteria: &FilterCriteria) -> String {
    let mut parts = vec![format!("price {}..{}", criteria.price.min, criteria.price.max)];
    if let Some(status) = criteria.status {
        parts.push(format!("status {}", status));
    }
    if let Some(season) = criteria.season {
        parts.push(format!("season {:?}", season));
    }
    if let Some(stay) = criteria.stay_type {
        parts.push(format!("stay {:?}", stay));
    }
    if let Some(origin) = &criteria.origin {
        parts.push(format!("origin '{}'", origin));
    }
    if let Some(destination) = &criteria.destination {
        parts.push(format!("destination '{}'", destination));
    }
    format!("filters: {}", parts.join(", "))
}

pub fn detail(offer: &Offer) -> String {
    let mut out = summary(offer);
    if !offer.short_description.is_empty() {
        let _ = write!(out, "\n{}", offer.short_description);
    }
    if let Some(extended) = &offer.extended_description {
        let _ = write!(out, "\n\n{}", extended);
    }
    let _ = write!(
        out,
        "\nhousing {} | food {} | transport {} ({})",
        offer.price_housing,
        offer.price_food,
        offer.transport_price(),
        offer.transport_mode
    );
    if offer.capacity_total > 0 {
        let _ = write!(out, " | capacity {}", offer.capacity_total);
    }
    if let Some(note) = &offer.note {
        let _ = write!(out, "\nnote: {}", note);
    }
    out
}

pub fn orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "no orders for this offer".to_string();
    }
    orders
        .iter()
        .map(|o| {
            format!(
                "{} {} | {} traveller(s) by {} | placed {}",
                o.id,
                o.status.as_str(),
                o.party_size,
                o.transport_mode,
                o.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Side-by-side table; each value carries the CSS colour of its cell
pub fn comparison(view: &ComparisonView, report: Option<&ComparisonReport>, base: u8) -> String {
    let (left, right) = match view {
        ComparisonView::Insufficient { available } => {
            return format!("not enough undecided offers to compare ({} available)", available);
        }
        ComparisonView::Ready { left, right } => (left, right),
    };

    let mut out = format!("{:<20} {:>28} {:>28}\n", "", left.destination_name, right.destination_name);
    let Some(report) = report else {
        return out;
    };

    for metric in &report.metrics {
        let _ = writeln!(
            out,
            "{:<20} {:>28} {:>28}",
            metric.kind.label(),
            cell(metric.kind, metric.left_value, &metric.highlight.left.css(base)),
            cell(metric.kind, metric.right_value, &metric.highlight.right.css(base)),
        );
    }
    out.trim_end().to_string()
}

fn cell(kind: MetricKind, value: f64, css: &str) -> String {
    match kind {
        MetricKind::PricePerDay => format!("{:.1} [{}]", value, css),
        _ => format!("{} [{}]", value as u64, css),
    }
}
