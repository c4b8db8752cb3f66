//! Checkout Aggregate
//!
//! `Shipping -> Review -> Success`, with `Review -> Shipping` as an edit.
//! Placing an order hands out a [`SettlementTicket`]; settlement only applies
//! while the checkout that issued the ticket is still open and processing.

use crate::domain::aggregates::OrderDetails;
use crate::domain::events::{CheckoutEvent, DomainEvent};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutStep { #[default] Shipping, Review, Success }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderStatus { #[default] Idle, Processing }

/// Identifies the checkout session an order was placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementTicket { session: u64 }

impl SettlementTicket {
    pub fn session(&self) -> u64 { self.session }
}

#[derive(Clone, Debug, Default)]
pub struct Checkout {
    step: CheckoutStep,
    status: OrderStatus,
    details: OrderDetails,
    open: bool,
    session: u64,
    events: Vec<DomainEvent>,
}

impl Checkout {
    pub fn new() -> Self { Self::default() }

    pub fn step(&self) -> CheckoutStep { self.step }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn details(&self) -> &OrderDetails { &self.details }
    pub fn is_open(&self) -> bool { self.open }
    pub fn is_processing(&self) -> bool { self.status == OrderStatus::Processing }

    /// Whether the shipping form can move on to review.
    pub fn can_advance(&self) -> bool { self.details.missing_fields().is_empty() }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.session += 1;
        }
    }

    /// Details are only editable on the shipping step.
    pub fn details_mut(&mut self) -> Result<&mut OrderDetails, CheckoutError> {
        if self.step != CheckoutStep::Shipping { return Err(CheckoutError::InvalidTransition { from: self.step, to: CheckoutStep::Shipping }); }
        Ok(&mut self.details)
    }

    pub fn advance_to_review(&mut self) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if self.step != CheckoutStep::Shipping { return Err(CheckoutError::InvalidTransition { from: self.step, to: CheckoutStep::Review }); }
        let missing = self.details.missing_fields();
        if !missing.is_empty() { return Err(CheckoutError::MissingFields(missing)); }
        self.step = CheckoutStep::Review;
        self.raise_event(DomainEvent::Checkout(CheckoutEvent::AdvancedToReview));
        Ok(())
    }

    pub fn edit_details(&mut self) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if self.step != CheckoutStep::Review || self.is_processing() {
            return Err(CheckoutError::InvalidTransition { from: self.step, to: CheckoutStep::Shipping });
        }
        self.step = CheckoutStep::Shipping;
        self.raise_event(DomainEvent::Checkout(CheckoutEvent::ReturnedToShipping));
        Ok(())
    }

    pub fn place_order(&mut self) -> Result<SettlementTicket, CheckoutError> {
        self.ensure_open()?;
        if self.step != CheckoutStep::Review { return Err(CheckoutError::InvalidTransition { from: self.step, to: CheckoutStep::Success }); }
        if self.is_processing() { return Err(CheckoutError::AlreadyProcessing); }
        self.status = OrderStatus::Processing;
        self.raise_event(DomainEvent::Checkout(CheckoutEvent::OrderPlaced { session: self.session }));
        Ok(SettlementTicket { session: self.session })
    }

    pub fn settle(&mut self, ticket: SettlementTicket) -> Result<(), CheckoutError> {
        if !self.open || ticket.session != self.session || !self.is_processing() {
            return Err(CheckoutError::StaleSettlement);
        }
        self.step = CheckoutStep::Success;
        self.status = OrderStatus::Idle;
        self.raise_event(DomainEvent::Checkout(CheckoutEvent::Settled { session: ticket.session }));
        Ok(())
    }

    /// Closes the view. Any outstanding settlement ticket becomes stale.
    pub fn close(&mut self) {
        if !self.open { return; }
        if self.is_processing() {
            self.status = OrderStatus::Idle;
            self.raise_event(DomainEvent::Checkout(CheckoutEvent::Abandoned { session: self.session }));
        }
        self.open = false;
    }

    /// Back to an empty shipping form, ready for the next order.
    pub fn reset(&mut self) {
        self.close();
        self.step = CheckoutStep::Shipping;
        self.status = OrderStatus::Idle;
        self.details = OrderDetails::default();
        self.raise_event(DomainEvent::Checkout(CheckoutEvent::Reset));
    }

    fn ensure_open(&self) -> Result<(), CheckoutError> {
        if self.open { Ok(()) } else { Err(CheckoutError::NotOpen) }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    NotOpen,
    MissingFields(Vec<String>),
    InvalidTransition { from: CheckoutStep, to: CheckoutStep },
    AlreadyProcessing,
    StaleSettlement,
}
impl std::error::Error for CheckoutError {}
impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "Checkout is not open"),
            Self::MissingFields(fields) => write!(f, "Missing required fields: {}", fields.join(", ")),
            Self::InvalidTransition { from, to } => write!(f, "Cannot move from {from:?} to {to:?}"),
            Self::AlreadyProcessing => write!(f, "Order is already processing"),
            Self::StaleSettlement => write!(f, "Settlement no longer applies"),
        }
    }
}
