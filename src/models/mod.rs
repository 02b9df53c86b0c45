//! Data models for inbound events and outbound destinations.

pub mod destination;
pub mod event;

pub use destination::{Destination, DestinationKind};
pub use event::{Board, CardRef, Column, Eventable, FizzyEvent, FizzyUser, RichText};
