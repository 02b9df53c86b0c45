//! Rebuilds a user-facing deep link from the URL fragments in an event.
//!
//! Fizzy only exposes internally routable URLs by default, so the host and
//! account slug can be remapped through [`LinkOverrides`]. Resolution tiers,
//! first match wins:
//!
//! 1. numbered card: `{base}/{slug}/cards/{number}`
//! 2. card UUID in a URL: `{base}/{slug}/search?q={uuid}[#comment_{uuid}]`
//! 3. board URL, rehosted when an override is set
//! 4. the raw event URL

use reqwest::Url;

use crate::error::{AppError, AppResult};
use crate::models::FizzyEvent;

/// Host used when neither the overrides nor the event carry one.
pub const PLACEHOLDER_BASE: &str = "https://fizzy.example.com";

/// Account slug used when no override provides one.
pub const DEFAULT_ACCOUNT_SLUG: &str = "0000001";

const CARDS_SEGMENT: &str = "/cards/";
const COMMENTS_SEGMENT: &str = "/comments/";

/// Deployment-time link rewriting, built once from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOverrides {
    /// Public root URL, e.g. `https://fizzy.example.com/acme`
    pub root_url: Option<Url>,
    /// Account slug, takes precedence over the root URL path
    pub account_slug: Option<String>,
}

impl LinkOverrides {
    /// Builds overrides from raw configuration values. Blank values are ignored.
    pub fn new(root_url: Option<&str>, account_slug: Option<&str>) -> AppResult<Self> {
        let root_url = match root_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(Url::parse(raw).map_err(|e| AppError::Validation {
                field: "fizzy.root_url".to_string(),
                reason: format!("Invalid root URL '{}': {}", raw, e),
            })?),
            None => None,
        };
        let account_slug = account_slug
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            root_url,
            account_slug,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.root_url.is_none() && self.account_slug.is_none()
    }

    /// Slug from the explicit override, else the root URL's first path segment.
    pub fn slug(&self) -> &str {
        if let Some(slug) = &self.account_slug {
            return slug;
        }
        self.root_url
            .as_ref()
            .and_then(first_path_segment)
            .unwrap_or(DEFAULT_ACCOUNT_SLUG)
    }

    /// Scheme and host for rebuilt links, preferring the root URL override.
    fn base_for(&self, source: &str) -> String {
        self.root_url
            .as_ref()
            .and_then(origin)
            .or_else(|| Url::parse(source).ok().as_ref().and_then(origin))
            .unwrap_or_else(|| PLACEHOLDER_BASE.to_string())
    }
}

/// Resolves the link for an event. Always returns a string, possibly empty.
pub fn resolve_url(event: &FizzyEvent, overrides: &LinkOverrides) -> String {
    let primary = event.primary_url();

    if event.eventable.number != 0 {
        return format!(
            "{}/{}/cards/{}",
            overrides.base_for(primary),
            overrides.slug(),
            event.eventable.number
        );
    }

    if let Some((source, card_id)) = event
        .url_candidates()
        .into_iter()
        .find_map(|url| segment_after(url, CARDS_SEGMENT).map(|id| (url, id)))
    {
        let mut link = format!(
            "{}/{}/search?q={}",
            overrides.base_for(source),
            overrides.slug(),
            card_id
        );
        if let Some(comment_id) = segment_after(source, COMMENTS_SEGMENT) {
            link.push_str("#comment_");
            link.push_str(comment_id);
        }
        return link;
    }

    if !event.board.url.is_empty() {
        return rehost_board_url(&event.board.url, overrides);
    }

    primary.to_string()
}

/// Rewrites host and account slug of a board URL when overrides are set.
fn rehost_board_url(board_url: &str, overrides: &LinkOverrides) -> String {
    if overrides.is_empty() {
        return board_url.to_string();
    }
    let Ok(url) = Url::parse(board_url) else {
        return board_url.to_string();
    };

    let base = overrides
        .root_url
        .as_ref()
        .and_then(origin)
        .or_else(|| origin(&url))
        .unwrap_or_else(|| PLACEHOLDER_BASE.to_string());

    let mut segments: Vec<&str> = url.path().split('/').collect();
    if segments.len() > 1 && !segments[1].is_empty() {
        segments[1] = overrides.slug();
    }

    let mut rebuilt = format!("{}{}", base, segments.join("/"));
    if let Some(query) = url.query() {
        rebuilt.push('?');
        rebuilt.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        rebuilt.push('#');
        rebuilt.push_str(fragment);
    }
    rebuilt
}

/// `scheme://host[:port]` of a URL, `None` for host-less URLs.
fn origin(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

fn first_path_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.next().filter(|s| !s.is_empty())
}

/// Path segment following the first occurrence of `marker`, if non-empty.
fn segment_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = url.split_once(marker)?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end]).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Board;
    use proptest::prelude::*;

    fn overrides(root: Option<&str>, slug: Option<&str>) -> LinkOverrides {
        LinkOverrides::new(root, slug).unwrap()
    }

    fn numbered(number: i64, url: &str) -> FizzyEvent {
        let mut event = FizzyEvent::default();
        event.eventable.number = number;
        event.eventable.url = url.to_string();
        event
    }

    #[test]
    fn test_numbered_card_with_root_override() {
        let event = numbered(29, "http://fizzy.internal:3000/0000001/cards/29");
        let link = resolve_url(&event, &overrides(Some("https://fizzy.example.com/acme"), None));
        assert_eq!(link, "https://fizzy.example.com/acme/cards/29");
    }

    #[test]
    fn test_numbered_card_slug_override_wins() {
        let event = numbered(3, "");
        let link = resolve_url(
            &event,
            &overrides(Some("https://boards.example.org/acme"), Some("beta")),
        );
        assert_eq!(link, "https://boards.example.org/beta/cards/3");
    }

    #[test]
    fn test_numbered_card_uses_event_host() {
        let event = numbered(12, "http://fizzy.internal:3000/999/cards/12?x=1");
        let link = resolve_url(&event, &LinkOverrides::default());
        assert_eq!(link, "http://fizzy.internal:3000/0000001/cards/12");
    }

    #[test]
    fn test_numbered_card_placeholder_host() {
        let event = numbered(5, "");
        assert_eq!(
            resolve_url(&event, &LinkOverrides::default()),
            "https://fizzy.example.com/0000001/cards/5"
        );
    }

    #[test]
    fn test_root_without_path_uses_default_slug() {
        let event = numbered(8, "");
        let link = resolve_url(&event, &overrides(Some("https://fizzy.example.com/"), None));
        assert_eq!(link, "https://fizzy.example.com/0000001/cards/8");
    }

    #[test]
    fn test_comment_search_link() {
        let mut event = FizzyEvent::default();
        event.eventable.url = "https://x/acme/cards/29/comments/7".to_string();
        let link = resolve_url(&event, &LinkOverrides::default());
        assert_eq!(link, "https://x/0000001/search?q=29#comment_7");
    }

    #[test]
    fn test_card_uuid_without_comment() {
        let mut event = FizzyEvent::default();
        event.url = "https://fizzy.internal/acme/cards/UUID123/".to_string();
        let link = resolve_url(&event, &overrides(Some("https://fizzy.example.com/acme"), None));
        assert_eq!(link, "https://fizzy.example.com/acme/search?q=UUID123");
        assert!(!link.contains("#comment_"));
    }

    #[test]
    fn test_reactions_url_is_last_resort() {
        let mut event = FizzyEvent::default();
        event.url = "https://fizzy.internal/acme/boards/1".to_string();
        event.eventable.reactions_url =
            "https://fizzy.internal/acme/cards/abc/comments/def/reactions".to_string();
        let link = resolve_url(&event, &LinkOverrides::default());
        assert_eq!(link, "https://fizzy.internal/0000001/search?q=abc#comment_def");
    }

    #[test]
    fn test_board_fallback_rehosted() {
        let mut event = FizzyEvent::default();
        event.board = Board {
            id: "b1".to_string(),
            name: "Roadmap".to_string(),
            url: "http://fizzy.internal:3000/0000001/boards/b1?view=list".to_string(),
        };
        let link = resolve_url(&event, &overrides(Some("https://fizzy.example.com/acme"), None));
        assert_eq!(link, "https://fizzy.example.com/acme/boards/b1?view=list");
    }

    #[test]
    fn test_board_fallback_slug_only() {
        let mut event = FizzyEvent::default();
        event.board.url = "http://fizzy.internal/0000001/boards/b1".to_string();
        let link = resolve_url(&event, &overrides(None, Some("acme")));
        assert_eq!(link, "http://fizzy.internal/acme/boards/b1");
    }

    #[test]
    fn test_board_fallback_without_overrides_is_unchanged() {
        let mut event = FizzyEvent::default();
        event.board.url = "http://fizzy.internal/0000001/boards/b1".to_string();
        assert_eq!(
            resolve_url(&event, &LinkOverrides::default()),
            "http://fizzy.internal/0000001/boards/b1"
        );
    }

    #[test]
    fn test_raw_fallback() {
        let mut event = FizzyEvent::default();
        event.url = "https://fizzy.internal/acme/boards".to_string();
        assert_eq!(
            resolve_url(&event, &overrides(Some("https://fizzy.example.com/acme"), None)),
            "https://fizzy.internal/acme/boards"
        );
        assert_eq!(resolve_url(&FizzyEvent::default(), &LinkOverrides::default()), "");
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let o = overrides(Some("  "), Some("/"));
        assert!(o.is_empty());
        assert_eq!(o.slug(), DEFAULT_ACCOUNT_SLUG);
        assert!(LinkOverrides::new(Some("not a url"), None).is_err());
    }

    #[test]
    fn test_segment_after() {
        assert_eq!(segment_after("/a/cards/x/y", CARDS_SEGMENT), Some("x"));
        assert_eq!(segment_after("/a/cards/x?y=1", CARDS_SEGMENT), Some("x"));
        assert_eq!(segment_after("/a/cards/", CARDS_SEGMENT), None);
        assert_eq!(segment_after("/a/boards/x", CARDS_SEGMENT), None);
    }

    proptest! {
        #[test]
        fn prop_resolve_never_panics(
            number in any::<i64>(),
            url in ".*",
            event_url in ".*",
            reactions in ".*",
            board_url in ".*",
        ) {
            let mut event = FizzyEvent::default();
            event.eventable.number = number;
            event.eventable.url = url;
            event.url = event_url;
            event.eventable.reactions_url = reactions;
            event.board.url = board_url;
            let o = overrides(Some("https://fizzy.example.com/acme"), None);
            let _ = resolve_url(&event, &o);
            let _ = resolve_url(&event, &LinkOverrides::default());
        }

        #[test]
        fn prop_numbered_resolution_is_idempotent(
            number in 1i64..1_000_000,
            host in "[a-z]{1,12}",
            slug in "[a-z0-9]{1,8}",
        ) {
            let event = numbered(number, &format!("https://{}.internal/x/cards/{}", host, number));
            let o = overrides(Some(&format!("https://{}.example.com/{}", host, slug)), None);
            let first = resolve_url(&event, &o);
            let second = resolve_url(&event, &o);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first, format!("https://{}.example.com/{}/cards/{}", host, slug, number));
        }
    }
}
