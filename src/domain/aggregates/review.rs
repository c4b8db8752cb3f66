//! Review Aggregate
//!
//! The ledger maps each product to its reviews, newest first. Reviews are only
//! ever prepended; nothing re-sorts, edits or deletes them.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use crate::domain::events::{DomainEvent, ReviewEvent};
use crate::domain::value_objects::{ProductId, Rating};

const DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub product_id: ProductId,
    pub customer_name: String,
    pub rating: Rating,
    pub comment: String,
    pub date: String,
}

/// Review form state. Survives a rejected submission untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub author: String,
    pub rating: Rating,
    pub comment: String,
}

impl ReviewDraft {
    pub fn new(author: impl Into<String>, rating: Rating, comment: impl Into<String>) -> Self {
        Self { author: author.into(), rating, comment: comment.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewLedger {
    reviews: HashMap<ProductId, Vec<Review>>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl ReviewLedger {
    pub fn new() -> Self { Self::default() }

    pub fn reviews_for(&self, product_id: &ProductId) -> &[Review] {
        self.reviews.get(product_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn review_count(&self, product_id: &ProductId) -> usize { self.reviews_for(product_id).len() }
    pub fn total_reviews(&self) -> usize { self.reviews.values().map(Vec::len).sum() }

    /// Mean rating, `None` when the product has no reviews.
    pub fn average_rating(&self, product_id: &ProductId) -> Option<f64> {
        let reviews = self.reviews_for(product_id);
        if reviews.is_empty() { return None; }
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.value())).sum();
        Some(f64::from(sum) / reviews.len() as f64)
    }

    /// Review count times average rating, i.e. the rating sum. Zero without reviews.
    pub fn popularity(&self, product_id: &ProductId) -> u32 {
        self.reviews_for(product_id).iter().map(|r| u32::from(r.rating.value())).sum()
    }

    pub fn submit(&mut self, product_id: &ProductId, draft: &ReviewDraft) -> Result<&Review, ReviewError> {
        self.submit_dated(product_id, draft, Local::now().date_naive())
    }

    pub fn submit_dated(&mut self, product_id: &ProductId, draft: &ReviewDraft, date: NaiveDate) -> Result<&Review, ReviewError> {
        if draft.author.is_empty() { return Err(ReviewError::MissingAuthor); }
        if draft.comment.is_empty() { return Err(ReviewError::MissingComment); }
        let review = Review {
            id: Uuid::now_v7().to_string(),
            product_id: product_id.clone(),
            customer_name: draft.author.clone(),
            rating: draft.rating,
            comment: draft.comment.clone(),
            date: date.format(DATE_FORMAT).to_string(),
        };
        self.raise_event(DomainEvent::Review(ReviewEvent::Submitted {
            product_id: product_id.clone(), review_id: review.id.clone(), rating: review.rating,
        }));
        let list = self.reviews.entry(product_id.clone()).or_default();
        list.insert(0, review);
        Ok(&list[0])
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ReviewError { MissingAuthor, MissingComment }
impl std::error::Error for ReviewError {}
impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::MissingAuthor => write!(f, "Review needs an author"), Self::MissingComment => write!(f, "Review needs a comment") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: u8) -> ReviewDraft { ReviewDraft::new("Ines", Rating::new(rating).unwrap(), "Lovely throw") }

    #[test]
    fn test_average_and_popularity() {
        let mut ledger = ReviewLedger::new();
        let id = ProductId::new("1");
        assert_eq!(ledger.average_rating(&id), None);
        assert_eq!(ledger.popularity(&id), 0);
        ledger.submit(&id, &draft(3)).unwrap();
        ledger.submit(&id, &draft(5)).unwrap();
        assert_eq!(ledger.average_rating(&id), Some(4.0));
        assert_eq!(ledger.popularity(&id), 8);
        assert_eq!(ledger.review_count(&id), 2);
    }

    #[test]
    fn test_newest_first() {
        let mut ledger = ReviewLedger::new();
        let id = ProductId::new("2");
        let first = ledger.submit(&id, &draft(4)).unwrap().id.clone();
        let second = ledger.submit(&id, &draft(2)).unwrap().id.clone();
        let ids: Vec<&str> = ledger.reviews_for(&id).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[test]
    fn test_rejects_missing_fields() {
        let mut ledger = ReviewLedger::new();
        let id = ProductId::new("1");
        let mut d = draft(5);
        d.author.clear();
        assert_eq!(ledger.submit(&id, &d), Err(ReviewError::MissingAuthor));
        let d = ReviewDraft { comment: String::new(), ..draft(5) };
        assert_eq!(ledger.submit(&id, &d), Err(ReviewError::MissingComment));
        assert_eq!(ledger.total_reviews(), 0);
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_date_format_and_wire_shape() {
        let mut ledger = ReviewLedger::new();
        let id = ProductId::new("3");
        let date = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        let review = ledger.submit_dated(&id, &draft(5), date).unwrap().clone();
        assert_eq!(review.date, "Oct 8, 2026");

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["3"][0]["customerName"], "Ines");
        assert_eq!(json["3"][0]["productId"], "3");
        assert_eq!(json["3"][0]["rating"], 5);

        let restored: ReviewLedger = serde_json::from_value(json).unwrap();
        assert_eq!(restored.reviews_for(&id), &[review]);
    }
}
