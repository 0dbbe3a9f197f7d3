use tracing::warn;
use crate::offer::Offer;
use crate::CatalogError;

/// Drop records that break the offer invariants.
///
/// Status normalization already happened during deserialization, so everything
/// returned here carries an explicit decision status.
pub fn ingest(records: Vec<Offer>) -> Vec<Offer> {
    let total = records.len();
    let offers: Vec<Offer> = records
        .into_iter()
        .filter(|offer| match offer.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping offer during ingestion: {}", e);
                false
            }
        })
        .collect();

    if offers.len() != total {
        warn!("Ingested {} of {} offers", offers.len(), total);
    }
    offers
}

/// Parse a JSON array of offers and ingest it
pub fn parse_catalog(json: &str) -> Result<Vec<Offer>, CatalogError> {
    let records: Vec<Offer> = serde_json::from_str(json)?;
    Ok(ingest(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecisionStatus;

    #[test]
    fn test_parse_catalog_skips_invalid_ranges() {
        let json = r#"
            [
                {
                    "id": "8a4b2f39-0f6e-4d8e-bb5c-3f7c6f2d9a01",
                    "destination_name": "Crete",
                    "origin": "Vienna",
                    "date_from": "2025-06-01",
                    "date_to": "2025-06-10",
                    "price_housing": 600,
                    "status": "ACCEPTED"
                },
                {
                    "id": "8a4b2f39-0f6e-4d8e-bb5c-3f7c6f2d9a02",
                    "destination_name": "Tatras",
                    "origin": "Brno",
                    "date_from": "2025-06-10",
                    "date_to": "2025-06-01",
                    "price_housing": 200
                }
            ]
        "#;
        let offers = parse_catalog(json).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].destination_name, "Crete");
        assert_eq!(offers[0].status, DecisionStatus::Accepted);
    }

    #[test]
    fn test_parse_catalog_reports_malformed_json() {
        assert!(matches!(parse_catalog("{not json"), Err(CatalogError::Parse(_))));
    }
}
