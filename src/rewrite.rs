use serde_json::Value;

/// Substitution engine for one site context. `served` and `stored` are
/// scheme-relative host strings (`//host[:port]`); substitution is a no-op
/// unless they differ.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DomainRewriter {
    served: String,
    stored: String,
    active: bool,
}

impl DomainRewriter {
    pub fn new(current_url: &str, configured_url: &str) -> Self {
        let mut rewriter = DomainRewriter {
            served: String::new(),
            stored: String::new(),
            active: false,
        };
        rewriter.refresh(current_url, configured_url);
        rewriter
    }

    /// Recomputes both hosts and the activity flag from the two URLs. All
    /// three values change together; callers never observe a half-refreshed
    /// rewriter.
    pub fn refresh(&mut self, current_url: &str, configured_url: &str) {
        self.served = host_of(current_url);
        self.stored = host_of(configured_url);
        self.active = self.served != self.stored;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn served(&self) -> &str {
        &self.served
    }

    pub fn stored(&self) -> &str {
        &self.stored
    }

    /// Read path: stored domain becomes the served domain.
    pub fn rewrite_outbound(&self, text: &str) -> String {
        if self.active {
            text.replace(&self.stored, &self.served)
        } else {
            text.to_owned()
        }
    }

    /// Write path: served domain becomes the stored domain, so persisted
    /// content always canonicalizes to the configured URL.
    pub fn rewrite_inbound(&self, text: &str) -> String {
        if self.active {
            text.replace(&self.served, &self.stored)
        } else {
            text.to_owned()
        }
    }

    /// Applies [`rewrite_inbound`](Self::rewrite_inbound) to every string
    /// leaf of a structured save payload, preserving shape, keys and order.
    pub fn rewrite_inbound_deep(&self, value: Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.rewrite_inbound(&text)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.rewrite_inbound_deep(item))
                    .collect(),
            ),
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, self.rewrite_inbound_deep(field)))
                    .collect(),
            ),
            value => value,
        }
    }
}

/// Extracts `//host[:port]` from a URL, discarding scheme, userinfo, path,
/// query and fragment. A URL with no parseable host yields the bare `"//"`,
/// which never matches real content, so substitution degrades to a no-op
/// rather than corrupting text.
pub fn host_of(url: &str) -> String {
    let uri = match url.parse::<http::Uri>() {
        Ok(uri) => uri,
        Err(_) => return "//".to_owned(),
    };

    match uri.host() {
        Some(host) => match uri.port_u16() {
            Some(port) => format!("//{}:{}", host, port),
            None => format!("//{}", host),
        },
        None => "//".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{host_of, DomainRewriter};

    fn rewriter() -> DomainRewriter {
        DomainRewriter::new("https://new.example.com", "https://old.example.com")
    }

    #[test]
    fn host_of_strips_everything_but_authority() {
        assert_eq!(
            host_of("https://old.example.com:8080/path?q=1"),
            "//old.example.com:8080"
        );
        assert_eq!(host_of("http://old.example.com/"), "//old.example.com");
        assert_eq!(
            host_of("https://admin@old.example.com/wp-admin/#top"),
            "//old.example.com"
        );
    }

    #[test]
    fn host_of_distinguishes_ports() {
        assert_ne!(host_of("http://example.com"), host_of("http://example.com:8080"));
    }

    #[test]
    fn host_of_tolerates_malformed_urls() {
        assert_eq!(host_of(""), "//");
        assert_eq!(host_of("not a url"), "//");
        assert_eq!(host_of("/just/a/path"), "//");
    }

    #[test]
    fn equal_hosts_deactivate_substitution() {
        let rewriter = DomainRewriter::new("https://example.com/a", "http://example.com/b");
        assert!(!rewriter.is_active());

        let text = "visit //example.com/page";
        assert_eq!(rewriter.rewrite_outbound(text), text);
        assert_eq!(rewriter.rewrite_inbound(text), text);
    }

    #[test]
    fn malformed_urls_on_both_sides_deactivate_substitution() {
        let rewriter = DomainRewriter::new("nonsense", "also nonsense");
        assert_eq!(rewriter.served(), "//");
        assert_eq!(rewriter.stored(), "//");
        assert!(!rewriter.is_active());
    }

    #[test]
    fn outbound_replaces_stored_with_served() {
        assert_eq!(
            rewriter().rewrite_outbound("visit //old.example.com/page"),
            "visit //new.example.com/page"
        );
    }

    #[test]
    fn inbound_replaces_served_with_stored() {
        assert_eq!(
            rewriter().rewrite_inbound("<a href=\"//new.example.com/x\">//new.example.com</a>"),
            "<a href=\"//old.example.com/x\">//old.example.com</a>"
        );
    }

    #[test]
    fn outbound_is_idempotent() {
        let rewriter = rewriter();
        let once = rewriter.rewrite_outbound("see //old.example.com and //old.example.com/feed");
        assert_eq!(rewriter.rewrite_outbound(&once), once);
    }

    #[test]
    fn round_trip_restores_original_text() {
        let rewriter = rewriter();
        let text = "canonical: //old.example.com/about";
        assert_eq!(
            rewriter.rewrite_inbound(&rewriter.rewrite_outbound(text)),
            text
        );
    }

    #[test]
    fn refresh_replaces_all_state_at_once() {
        let mut rewriter = rewriter();
        rewriter.refresh("https://example.com", "https://example.com");
        assert!(!rewriter.is_active());
        assert_eq!(rewriter.served(), rewriter.stored());
    }

    #[test]
    fn deep_rewrite_preserves_structure() {
        let payload = json!({
            "title": "//new.example.com",
            "meta": { "guid": "//new.example.com/x" },
            "count": 5,
            "tags": ["//new.example.com/a", true, null],
        });

        let rewritten = rewriter().rewrite_inbound_deep(payload);

        assert_eq!(
            rewritten,
            json!({
                "title": "//old.example.com",
                "meta": { "guid": "//old.example.com/x" },
                "count": 5,
                "tags": ["//old.example.com/a", true, null],
            })
        );
        let keys: Vec<_> = rewritten.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["title", "meta", "count", "tags"]);
    }
}
