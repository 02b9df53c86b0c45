//! Inbound Fizzy webhook payload.
//!
//! Every field is optional on the wire. Missing objects and strings decode to
//! their empty values so that a sparse payload never fails to parse; only
//! malformed JSON or a type mismatch is rejected.

use serde::{Deserialize, Deserializer, Serialize};

/// Webhook event delivered by Fizzy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FizzyEvent {
    /// Event id (e.g. `evt_123`)
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Raw action tag such as `card_assigned`
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    /// The card, comment or board the event is about
    #[serde(deserialize_with = "null_as_default")]
    pub eventable: Eventable,
    /// User who triggered the event
    #[serde(deserialize_with = "null_as_default")]
    pub creator: FizzyUser,
    #[serde(deserialize_with = "null_as_default")]
    pub board: Board,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub assignee: Option<FizzyUser>,
    pub column: Option<Column>,
    /// Free-text reason code, e.g. `inactivity`
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
    /// Card attached directly to the event (comment events)
    pub card: Option<CardRef>,
}

/// Target object of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eventable {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Card number, 0 when the eventable is not a card
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub card: Option<CardRef>,
    pub parent: Option<CardRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub body: RichText,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reactions_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creator: FizzyUser,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRef {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichText {
    #[serde(deserialize_with = "null_as_default")]
    pub plain_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FizzyUser {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

impl FizzyEvent {
    /// Decodes a webhook body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Name of the actor, empty when the payload carries none.
    pub fn creator_name(&self) -> &str {
        &self.creator.name
    }

    /// Column name, empty when absent.
    pub fn column_name(&self) -> &str {
        self.column.as_ref().map(|c| c.name.as_str()).unwrap_or_default()
    }

    /// Assignee name, empty when absent.
    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or_default()
    }

    /// Primary URL of the event: the eventable URL, else the event URL.
    pub fn primary_url(&self) -> &str {
        first_non_empty([self.eventable.url.as_str(), self.url.as_str()])
    }

    /// Candidate URLs in lookup order, ending with the reactions URL.
    pub fn url_candidates(&self) -> [&str; 3] {
        [
            self.eventable.url.as_str(),
            self.url.as_str(),
            self.eventable.reactions_url.as_str(),
        ]
    }

    /// Raw URL used to infer card numbers: eventable, event, then reactions URL.
    pub fn raw_url(&self) -> &str {
        first_non_empty(self.url_candidates())
    }
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn first_non_empty<const N: usize>(candidates: [&str; N]) -> &str {
    candidates
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}
