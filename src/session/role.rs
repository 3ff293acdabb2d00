use crate::network::protocol::OutboundEvent;
use url::form_urlencoded;

pub const JOIN_PARAM: &str = "join";
pub const WATCH_PARAM: &str = "watch";

/// 起動時のクエリパラメータ。一度だけ読まれる
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    params: Vec<(String, String)>,
}

impl PageContext {
    /// Accepts a full URL, a `?query` or a bare `key=value&...` string.
    pub fn from_location(location: &str) -> Self {
        let query = match location.split_once('?') {
            Some((_, query)) => query,
            None if location.contains('=') => location,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        PageContext {
            params: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.params.push((name.to_string(), value.to_string()));
    }

    pub fn has(&self, name: &str) -> bool {
        self.params.iter().any(|(k, _)| k == name)
    }

    /// 最初に出現した値を返す
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleContext {
    NewGame,
    Joiner { join: String },
    Spectator { watch: String },
}

impl RoleContext {
    /// 接続確立直後に送る唯一のイベント
    pub fn establish_event(&self) -> OutboundEvent {
        match self {
            RoleContext::NewGame => OutboundEvent::Init,
            RoleContext::Joiner { join } => OutboundEvent::Join { join: join.clone() },
            RoleContext::Spectator { watch } => OutboundEvent::Watch {
                watch: watch.clone(),
            },
        }
    }

    pub fn is_spectator(&self) -> bool {
        matches!(self, RoleContext::Spectator { .. })
    }

    pub fn label(&self) -> String {
        match self {
            RoleContext::NewGame => "new game".to_string(),
            RoleContext::Joiner { join } => format!("joining {}", join),
            RoleContext::Spectator { watch } => format!("watching {}", watch),
        }
    }
}

/// `join` は `watch` より優先される。どちらも無ければ新規ゲーム
pub fn derive_role(page: &PageContext) -> RoleContext {
    if let Some(join) = page.get(JOIN_PARAM) {
        return RoleContext::Joiner {
            join: join.to_string(),
        };
    }
    if let Some(watch) = page.get(WATCH_PARAM) {
        return RoleContext::Spectator {
            watch: watch.to_string(),
        };
    }
    RoleContext::NewGame
}

/// `<base>?<param>=<code>` 形式の共有リンク
pub fn share_link(base: &str, param: &str, code: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(param, code)
        .finish();
    format!("{}?{}", base, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_takes_precedence_over_watch() {
        for location in ["?join=abc", "?join=abc&watch=xyz", "?watch=xyz&join=abc"] {
            assert_eq!(
                derive_role(&PageContext::from_location(location)),
                RoleContext::Joiner { join: "abc".into() },
                "{}",
                location
            );
        }
    }

    #[test]
    fn watch_only_is_spectator() {
        let page = PageContext::from_location("http://localhost:8000/?watch=xyz");
        assert_eq!(
            derive_role(&page),
            RoleContext::Spectator { watch: "xyz".into() }
        );
    }

    #[test]
    fn no_parameters_is_new_game() {
        for location in ["", "?", "http://localhost:8000/", "?foo=bar"] {
            assert_eq!(
                derive_role(&PageContext::from_location(location)),
                RoleContext::NewGame
            );
        }
    }

    #[test]
    fn empty_value_still_counts_as_present() {
        let page = PageContext::from_location("?join=");
        assert!(page.has("join"));
        assert_eq!(derive_role(&page), RoleContext::Joiner { join: "".into() });
    }

    #[test]
    fn bare_query_and_fragment() {
        let page = PageContext::from_location("watch=a%20b#top");
        assert_eq!(page.get("watch"), Some("a b"));
    }

    #[test]
    fn pushed_params_follow_location_params() {
        let mut page = PageContext::from_location("?watch=xyz");
        page.push("join", "abc");
        assert_eq!(derive_role(&page), RoleContext::Joiner { join: "abc".into() });
    }

    #[test]
    fn role_events() {
        assert_eq!(RoleContext::NewGame.establish_event(), OutboundEvent::Init);
        assert_eq!(
            RoleContext::Joiner { join: "j".into() }.establish_event(),
            OutboundEvent::Join { join: "j".into() }
        );
        assert_eq!(
            RoleContext::Spectator { watch: "w".into() }.establish_event(),
            OutboundEvent::Watch { watch: "w".into() }
        );
    }

    #[test]
    fn share_link_encodes_code() {
        assert_eq!(share_link("", "join", "abc"), "?join=abc");
        assert_eq!(
            share_link("http://localhost:8000/", "watch", "a+b"),
            "http://localhost:8000/?watch=a%2Bb"
        );
    }
}
