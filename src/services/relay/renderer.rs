//! Turns one classified event into a destination-specific payload.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use super::classifier::{EventAction, classify};
use super::url_resolver::{LinkOverrides, resolve_url};
use crate::models::{CardRef, DestinationKind, FizzyEvent};

/// Actor shown when the payload names nobody.
pub const ACTOR_PLACEHOLDER: &str = "Someone";
/// Subject shown when nothing better is available.
pub const SUBJECT_PLACEHOLDER: &str = "Fizzy notification";
const LINK_LABEL: &str = "View in Fizzy";
const BOARD_LABEL: &str = "Board";
const GOTIFY_PRIORITY: u8 = 5;

struct Patterns {
    card_number: Regex,
    card_subject: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        card_number: Regex::new(r"^\d+").unwrap(),
        card_subject: Regex::new(r"^Card #\d+$").unwrap(),
    })
}

/// Everything the renderers need, computed once per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub actor: String,
    pub verb: String,
    pub icon: &'static str,
    pub subject: String,
    /// Drop the subject from the markdown heading
    pub hide_subject: bool,
    /// Comment text, when the event carries one
    pub comment: Option<String>,
    /// Board name, only when it adds information beyond the subject
    pub board: Option<String>,
    pub url: String,
}

impl Translation {
    pub fn new(event: &FizzyEvent, overrides: &LinkOverrides) -> Self {
        let classification = classify(event);

        let actor = match event.creator_name() {
            "" => ACTOR_PLACEHOLDER.to_string(),
            name => name.to_string(),
        };

        let board_name = event.board.name.as_str();
        let titled = titled_subject(event);

        let board = (!board_name.is_empty() && titled != board_name)
            .then(|| board_name.to_string());

        let subject = if titled == board_name || titled == SUBJECT_PLACEHOLDER {
            card_number_subject(event.raw_url()).unwrap_or_else(|| titled.to_string())
        } else {
            titled.to_string()
        };

        let hide_subject = EventAction::parse(&event.action).is_comment()
            && patterns().card_subject.is_match(&subject);

        let comment = Some(event.eventable.body.plain_text.as_str())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Self {
            actor,
            verb: classification.verb,
            icon: classification.icon,
            subject,
            hide_subject,
            comment,
            board,
            url: resolve_url(event, overrides),
        }
    }

    /// First line of every markdown message.
    pub fn heading(&self) -> String {
        if self.hide_subject {
            format!("### {} **{}** {}", self.icon, self.actor, self.verb)
        } else {
            format!(
                "### {} **{}** {}: {}",
                self.icon, self.actor, self.verb, self.subject
            )
        }
    }

    /// Full markdown body shared by the text-based formats.
    pub fn markdown(&self) -> String {
        let mut blocks = vec![self.heading()];

        if let Some(comment) = &self.comment {
            blocks.push(blockquote(comment));
        }
        if let Some(board) = &self.board {
            blocks.push(format!("🎫 **{}:** {}", BOARD_LABEL, board));
        }
        blocks.push(format!("[{} ↗️]({})", LINK_LABEL, self.url));

        blocks.join("\n\n")
    }
}

/// Title lookup chain, ending in the board name and then the placeholder.
fn titled_subject(event: &FizzyEvent) -> &str {
    [
        event.eventable.title.as_str(),
        card_title(&event.card),
        card_title(&event.eventable.card),
        card_title(&event.eventable.parent),
        event.board.name.as_str(),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or(SUBJECT_PLACEHOLDER)
}

fn card_title(card: &Option<CardRef>) -> &str {
    card.as_ref().map(|c| c.title.as_str()).unwrap_or_default()
}

/// `Card #N` from the digits right after the first `/cards/` of `raw_url`.
fn card_number_subject(raw_url: &str) -> Option<String> {
    let (_, rest) = raw_url.split_once("/cards/")?;
    patterns()
        .card_number
        .find(rest)
        .map(|digits| format!("Card #{}", digits.as_str()))
}

fn blockquote(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZulipPayload {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleChatPayload {
    pub text: String,
    #[serde(rename = "cardsV2")]
    pub cards_v2: Vec<CardV2>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardV2 {
    pub card_id: String,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub header: CardHeader,
    pub sections: Vec<CardSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardHeader {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSection {
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    DecoratedText(DecoratedText),
    ButtonList(ButtonList),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextParagraph {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedText {
    pub top_label: String,
    pub text: String,
    pub start_icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonList {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub text: String,
    pub icon: Icon,
    pub on_click: OnClick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub known_icon: String,
}

impl Icon {
    fn known(name: &str) -> Self {
        Self {
            known_icon: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnClick {
    pub open_link: OpenLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenLink {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GotifyPayload {
    pub title: String,
    pub message: String,
    pub priority: u8,
    pub extras: GotifyExtras,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GotifyExtras {
    #[serde(rename = "client::display")]
    pub client_display: ClientDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDisplay {
    pub content_type: String,
}

/// A payload ready for delivery, in the shape its destination expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedMessage {
    Zulip(ZulipPayload),
    GoogleChat(GoogleChatPayload),
    Gotify(GotifyPayload),
}

impl RenderedMessage {
    pub fn kind(&self) -> DestinationKind {
        match self {
            RenderedMessage::Zulip(_) => DestinationKind::Zulip,
            RenderedMessage::GoogleChat(_) => DestinationKind::GoogleChat,
            RenderedMessage::Gotify(_) => DestinationKind::Gotify,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Renders a translation for one destination format.
pub fn render(kind: DestinationKind, translation: &Translation) -> RenderedMessage {
    match kind {
        DestinationKind::Zulip => RenderedMessage::Zulip(ZulipPayload {
            text: translation.markdown(),
        }),
        DestinationKind::GoogleChat => RenderedMessage::GoogleChat(google_chat(translation)),
        DestinationKind::Gotify => RenderedMessage::Gotify(GotifyPayload {
            title: format!("Fizzy: {} {}", translation.actor, translation.verb),
            message: translation.markdown(),
            priority: GOTIFY_PRIORITY,
            extras: GotifyExtras {
                client_display: ClientDisplay {
                    content_type: "text/markdown".to_string(),
                },
            },
        }),
    }
}

fn google_chat(t: &Translation) -> GoogleChatPayload {
    let mut widgets = Vec::with_capacity(3);

    if let Some(comment) = &t.comment {
        widgets.push(Widget::TextParagraph(TextParagraph {
            text: comment.clone(),
        }));
    }
    if let Some(board) = &t.board {
        widgets.push(Widget::DecoratedText(DecoratedText {
            top_label: BOARD_LABEL.to_string(),
            text: board.clone(),
            start_icon: Icon::known("TICKET"),
        }));
    }
    widgets.push(Widget::ButtonList(ButtonList {
        buttons: vec![Button {
            text: LINK_LABEL.to_string(),
            icon: Icon::known("OPEN_IN_NEW"),
            on_click: OnClick {
                open_link: OpenLink { url: t.url.clone() },
            },
        }],
    }));

    GoogleChatPayload {
        text: format!("{} {} {}: {}", t.icon, t.actor, t.verb, t.subject),
        cards_v2: vec![CardV2 {
            card_id: format!("fizzy-{}", Uuid::now_v7()),
            card: Card {
                header: CardHeader {
                    title: t.subject.clone(),
                    subtitle: format!("{} {}", t.actor, t.verb),
                },
                sections: vec![CardSection { widgets }],
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Board, CardRef, FizzyUser};
    use serde_json::json;

    fn overrides() -> LinkOverrides {
        LinkOverrides::new(Some("https://fizzy.example.com/acme"), None).unwrap()
    }

    fn assigned_event() -> FizzyEvent {
        let mut event = FizzyEvent {
            action: "card_assigned".to_string(),
            creator: FizzyUser {
                name: "Ayşe".to_string(),
            },
            assignee: Some(FizzyUser {
                name: "Mehmet".to_string(),
            }),
            ..Default::default()
        };
        event.eventable.number = 29;
        event
    }

    fn comment_event() -> FizzyEvent {
        let mut event = FizzyEvent {
            id: "evt_1".to_string(),
            action: "comment_created".to_string(),
            creator: FizzyUser {
                name: "Ayşe".to_string(),
            },
            board: Board {
                name: "Roadmap".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        event.eventable.id = "cmt_7".to_string();
        event.eventable.body.plain_text = "Looks good\nShip it".to_string();
        event.eventable.url = "https://x/acme/cards/29/comments/7".to_string();
        event
    }

    #[test]
    fn test_assignment_heading_and_link() {
        let t = Translation::new(&assigned_event(), &overrides());

        assert_eq!(t.url, "https://fizzy.example.com/acme/cards/29");
        let heading = t.heading();
        assert!(heading.contains("Ayşe"));
        assert!(heading.contains("Mehmet"));
        assert!(heading.contains("assigned the card to"));
        assert_eq!(t.subject, SUBJECT_PLACEHOLDER);
    }

    #[test]
    fn test_missing_actor_uses_placeholder() {
        let t = Translation::new(&FizzyEvent::default(), &LinkOverrides::default());
        assert_eq!(t.actor, ACTOR_PLACEHOLDER);
        assert_eq!(t.subject, SUBJECT_PLACEHOLDER);
        assert_eq!(t.url, "");
    }

    #[test]
    fn test_subject_lookup_order() {
        let mut event = FizzyEvent {
            board: Board {
                name: "Roadmap".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(titled_subject(&event), "Roadmap");

        event.eventable.parent = Some(CardRef {
            title: "Parent".to_string(),
        });
        assert_eq!(titled_subject(&event), "Parent");

        event.eventable.card = Some(CardRef {
            title: "Nested".to_string(),
        });
        assert_eq!(titled_subject(&event), "Nested");

        event.card = Some(CardRef {
            title: "Top".to_string(),
        });
        assert_eq!(titled_subject(&event), "Top");

        event.eventable.title = "Own".to_string();
        assert_eq!(titled_subject(&event), "Own");
    }

    #[test]
    fn test_card_number_replaces_board_subject() {
        let t = Translation::new(&comment_event(), &LinkOverrides::default());
        assert_eq!(t.subject, "Card #29");
        assert!(t.board.is_none());
    }

    #[test]
    fn test_comment_on_numbered_card_hides_subject() {
        let t = Translation::new(&comment_event(), &LinkOverrides::default());
        assert!(t.hide_subject);
        assert_eq!(t.heading(), "### 💬 **Ayşe** commented");
    }

    #[test]
    fn test_non_comment_keeps_card_subject() {
        let event = FizzyEvent {
            action: "card_closed".to_string(),
            ..comment_event()
        };
        let t = Translation::new(&event, &LinkOverrides::default());
        assert!(!t.hide_subject);
        assert!(t.heading().ends_with(": Card #29"));
    }

    #[test]
    fn test_comment_with_real_title_keeps_subject() {
        let mut event = comment_event();
        event.eventable.parent = Some(CardRef {
            title: "Fix login".to_string(),
        });
        let t = Translation::new(&event, &LinkOverrides::default());
        assert!(!t.hide_subject);
        assert_eq!(t.board.as_deref(), Some("Roadmap"));
        assert_eq!(t.heading(), "### 💬 **Ayşe** commented: Fix login");
    }

    #[test]
    fn test_card_number_requires_digits() {
        assert_eq!(card_number_subject("https://x/a/cards/42/comments/1"), Some("Card #42".to_string()));
        assert_eq!(card_number_subject("https://x/a/cards/abc"), None);
        assert_eq!(card_number_subject("https://x/a/boards/1"), None);
    }

    #[test]
    fn test_markdown_layout() {
        let mut event = comment_event();
        event.eventable.parent = Some(CardRef {
            title: "Fix login".to_string(),
        });
        let t = Translation::new(&event, &LinkOverrides::default());

        assert_eq!(
            t.markdown(),
            "### 💬 **Ayşe** commented: Fix login\n\n\
             > Looks good\n> Ship it\n\n\
             🎫 **Board:** Roadmap\n\n\
             [View in Fizzy ↗️](https://x/0000001/search?q=29#comment_7)"
        );
    }

    #[test]
    fn test_render_zulip() {
        let t = Translation::new(&assigned_event(), &overrides());
        let value = serde_json::to_value(render(DestinationKind::Zulip, &t)).unwrap();
        assert_eq!(value, json!({ "text": t.markdown() }));
    }

    #[test]
    fn test_render_gotify() {
        let t = Translation::new(&assigned_event(), &overrides());
        let value = serde_json::to_value(render(DestinationKind::Gotify, &t)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Fizzy: Ayşe assigned the card to **Mehmet**",
                "message": t.markdown(),
                "priority": 5,
                "extras": { "client::display": { "contentType": "text/markdown" } }
            })
        );
    }

    #[test]
    fn test_render_google_chat() {
        let mut event = comment_event();
        event.eventable.parent = Some(CardRef {
            title: "Fix login".to_string(),
        });
        let t = Translation::new(&event, &LinkOverrides::default());
        let rendered = render(DestinationKind::GoogleChat, &t);
        assert_eq!(rendered.kind(), DestinationKind::GoogleChat);

        let value = serde_json::to_value(&rendered).unwrap();
        assert_eq!(value["text"], "💬 Ayşe commented: Fix login");

        let card = &value["cardsV2"][0];
        assert!(card["cardId"].as_str().unwrap().starts_with("fizzy-"));
        assert_eq!(card["card"]["header"]["title"], "Fix login");
        assert_eq!(card["card"]["header"]["subtitle"], "Ayşe commented");

        let widgets = card["card"]["sections"][0]["widgets"].as_array().unwrap();
        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0]["textParagraph"]["text"], "Looks good\nShip it");
        assert_eq!(widgets[1]["decoratedText"]["topLabel"], "Board");
        assert_eq!(widgets[1]["decoratedText"]["startIcon"]["knownIcon"], "TICKET");
        let button = &widgets[2]["buttonList"]["buttons"][0];
        assert_eq!(button["text"], "View in Fizzy");
        assert_eq!(button["icon"]["knownIcon"], "OPEN_IN_NEW");
        assert_eq!(button["onClick"]["openLink"]["url"], t.url.as_str());
    }

    #[test]
    fn test_google_chat_minimal_card_has_only_button() {
        let t = Translation::new(&FizzyEvent::default(), &LinkOverrides::default());
        let RenderedMessage::GoogleChat(payload) = render(DestinationKind::GoogleChat, &t) else {
            panic!("expected google chat payload");
        };
        assert_eq!(payload.cards_v2[0].card.sections[0].widgets.len(), 1);
        assert_eq!(payload.text, "📢 Someone sent an update: Fizzy notification");
    }

    #[test]
    fn test_card_ids_are_unique() {
        let t = Translation::new(&FizzyEvent::default(), &LinkOverrides::default());
        let a = google_chat(&t).cards_v2[0].card_id.clone();
        let b = google_chat(&t).cards_v2[0].card_id.clone();
        assert_ne!(a, b);
    }
}
