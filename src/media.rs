use url::Url;

/// How a record's video link is presented in the detail panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLink {
    /// YouTube link rewritten to its embeddable form
    Embed(String),
    /// Plain media file
    Direct(String),
}

impl VideoLink {
    pub fn from_url(url: &str) -> Self {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            VideoLink::Embed(to_embed(url))
        } else {
            VideoLink::Direct(url.to_string())
        }
    }
}

/// `youtu.be/<id>` and `youtube.com/watch?v=<id>` become `youtube.com/embed/<id>`;
/// anything else, including unparseable input, comes back unchanged.
pub fn to_embed(url: &str) -> String {
    let Ok(u) = Url::parse(url) else {
        return url.to_string();
    };
    let host = u.host_str().unwrap_or_default();

    if host.contains("youtu.be") {
        let id = u.path().trim_start_matches('/');
        return format!("https://www.youtube.com/embed/{id}");
    }
    if host.contains("youtube.com") {
        if let Some((_, id)) = u.query_pairs().find(|(k, _)| k == "v") {
            if !id.is_empty() {
                return format!("https://www.youtube.com/embed/{id}");
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_links_become_embeds() {
        assert_eq!(
            to_embed("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn watch_links_use_v_param() {
        assert_eq!(
            to_embed("https://www.youtube.com/watch?v=abc123&t=10"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            to_embed("https://www.youtube.com/channel/xyz"),
            "https://www.youtube.com/channel/xyz"
        );
    }

    #[test]
    fn other_and_invalid_urls_pass_through() {
        assert_eq!(to_embed("https://cdn.example.com/a.mp4"), "https://cdn.example.com/a.mp4");
        assert_eq!(to_embed("not a url"), "not a url");
    }

    #[test]
    fn video_link_kind() {
        assert_eq!(
            VideoLink::from_url("https://cdn.example.com/a.mp4"),
            VideoLink::Direct("https://cdn.example.com/a.mp4".into())
        );
        assert_eq!(
            VideoLink::from_url("https://youtu.be/x"),
            VideoLink::Embed("https://www.youtube.com/embed/x".into())
        );
    }
}
