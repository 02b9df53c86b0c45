//! Event translation engine and relay flow.
//!
//! An inbound event passes the [`Deduplicator`], is classified and its link
//! resolved once into a [`Translation`], rendered for the destination's
//! format and handed to a [`RelayTransport`].

pub mod classifier;
pub mod deduplicator;
pub mod relay_service;
pub mod renderer;
pub mod transport;
pub mod url_resolver;

pub use classifier::{Classification, EventAction, classify};
pub use deduplicator::{Admission, Clock, Deduplicator, SystemClock};
pub use relay_service::{RelayOutcome, RelayService};
pub use renderer::{RenderedMessage, Translation, render};
pub use transport::{HttpRelayTransport, RelayResponse, RelayTransport};
pub use url_resolver::{LinkOverrides, resolve_url};
