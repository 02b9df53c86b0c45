//! Maps Fizzy event actions to a human verb phrase and an icon.

use crate::models::FizzyEvent;

const ICON_COMMENT: &str = "💬";
const ICON_CARD: &str = "🃏";
const ICON_MEGAPHONE: &str = "📢";
const ICON_CYCLE: &str = "🔄";
const ICON_CLIPBOARD: &str = "📋";
const ICON_TRUCK: &str = "🚚";
const ICON_SLEEPING: &str = "💤";
const ICON_PERSON: &str = "👤";
const ICON_CHECK: &str = "✅";
const ICON_BACK: &str = "↩️";
const ICON_BOX: &str = "📦";

/// Verb used when an unknown action has no readable text at all.
const FALLBACK_VERB: &str = "sent an update";

/// Known Fizzy actions. Anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    CommentCreated,
    CardCreated,
    CardPublished,
    CardReopened,
    CardBoardChanged,
    CardMoved,
    CardAssigned,
    CardUnassigned,
    CardPostponed,
    CardClosed,
    CardSentBackToTriage,
    CardArchived,
    Other(String),
}

impl EventAction {
    /// Parses a raw action tag, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let action = raw.trim().to_lowercase();
        match action.as_str() {
            "comment_created" => EventAction::CommentCreated,
            "card_created" => EventAction::CardCreated,
            "card_published" => EventAction::CardPublished,
            "card_reopened" => EventAction::CardReopened,
            "card_board_changed" => EventAction::CardBoardChanged,
            "card_moved" => EventAction::CardMoved,
            "card_assigned" => EventAction::CardAssigned,
            "card_unassigned" => EventAction::CardUnassigned,
            "card_postponed" => EventAction::CardPostponed,
            "card_closed" => EventAction::CardClosed,
            "card_sent_back_to_triage" => EventAction::CardSentBackToTriage,
            "card_archived" => EventAction::CardArchived,
            _ => EventAction::Other(action),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, EventAction::CommentCreated)
    }
}

/// Verb phrase and icon describing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verb: String,
    pub icon: &'static str,
}

impl Classification {
    fn new(verb: impl Into<String>, icon: &'static str) -> Self {
        Self {
            verb: verb.into(),
            icon,
        }
    }
}

/// Classifies an event. Total over every possible action string.
pub fn classify(event: &FizzyEvent) -> Classification {
    let column = event.column_name();

    match EventAction::parse(&event.action) {
        EventAction::CommentCreated => Classification::new("commented", ICON_COMMENT),
        EventAction::CardCreated => Classification::new("created the card", ICON_CARD),
        EventAction::CardPublished => Classification::new("published the card", ICON_MEGAPHONE),
        EventAction::CardReopened => Classification::new("reopened the card", ICON_CYCLE),
        EventAction::CardBoardChanged => {
            Classification::new("changed the card's board", ICON_CLIPBOARD)
        }
        EventAction::CardMoved if column.is_empty() => {
            Classification::new("moved the card", ICON_TRUCK)
        }
        EventAction::CardMoved if event.reason.eq_ignore_ascii_case("inactivity") => {
            Classification::new(
                format!("moved the card to list **{}** due to inactivity", column),
                ICON_SLEEPING,
            )
        }
        EventAction::CardMoved => {
            Classification::new(format!("moved the card to list **{}**", column), ICON_TRUCK)
        }
        EventAction::CardAssigned => match event.assignee_name() {
            "" => Classification::new("assigned the card to someone", ICON_PERSON),
            name => Classification::new(format!("assigned the card to **{}**", name), ICON_PERSON),
        },
        EventAction::CardUnassigned => {
            Classification::new("removed the card assignment", ICON_PERSON)
        }
        EventAction::CardPostponed => Classification::new("postponed the card", ICON_SLEEPING),
        EventAction::CardClosed if column.eq_ignore_ascii_case("done") => {
            Classification::new("completed the card", ICON_CHECK)
        }
        EventAction::CardClosed => Classification::new("closed the card", ICON_CHECK),
        EventAction::CardSentBackToTriage => {
            Classification::new("sent the card back to triage", ICON_BACK)
        }
        EventAction::CardArchived if column.eq_ignore_ascii_case("done") => {
            Classification::new("completed the card", ICON_CHECK)
        }
        EventAction::CardArchived
            if column.eq_ignore_ascii_case("postponed") || column.eq_ignore_ascii_case("not now") =>
        {
            Classification::new("postponed the card", ICON_SLEEPING)
        }
        EventAction::CardArchived => Classification::new("archived the card", ICON_BOX),
        EventAction::Other(action) => {
            let verb = action.replace('_', " ");
            let verb = verb.trim();
            if verb.is_empty() {
                Classification::new(FALLBACK_VERB, ICON_MEGAPHONE)
            } else {
                Classification::new(verb, ICON_MEGAPHONE)
            }
        }
    }
}
