use super::node::{Embed, Node};
use super::parser::replace_matches;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Trailing query strings (`?si=...`, `&t=42s`) are swallowed so they do not
// linger as text after the player.
static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([\w-]+)(?:[?&][\w=&%-]*)?",
    )
    .expect("youtube regex is valid")
});

static VIMEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:https?://)?(?:www\.)?vimeo\.com/(\d+)\b").expect("vimeo regex is valid")
});

static TWEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:https?://)?(?:www\.|mobile\.)?(twitter\.com|x\.com)/(\w+)/status/(\d+)(?:\?[\w=&%-]*)?",
    )
    .expect("tweet regex is valid")
});

/// Turns bare YouTube, Vimeo and Twitter/X links in text nodes into embeds.
pub fn apply(nodes: Vec<Node>) -> Vec<Node> {
    let nodes = replace_matches(nodes, &YOUTUBE, &youtube);
    let nodes = replace_matches(nodes, &VIMEO, &vimeo);
    replace_matches(nodes, &TWEET, &tweet)
}

fn youtube(caps: &Captures) -> Option<Node> {
    let id = caps.get(1)?.as_str();
    Some(Node::Embed(Embed::YouTube { id: id.to_string() }))
}

fn vimeo(caps: &Captures) -> Option<Node> {
    let id = caps.get(1)?.as_str();
    Some(Node::Embed(Embed::Vimeo { id: id.to_string() }))
}

fn tweet(caps: &Captures) -> Option<Node> {
    let host = caps.get(1)?.as_str();
    let user = caps.get(2)?.as_str();
    let status_id = caps.get(3)?.as_str();
    Some(Node::Embed(Embed::Tweet {
        url: format!("https://{}/{}/status/{}", host, user, status_id),
        status_id: status_id.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embeds(input: &str) -> Vec<Node> {
        apply(vec![Node::Text(input.to_string())])
    }

    #[test]
    fn test_youtube_variants_strip_query() {
        for url in [
            "https://youtu.be/abc123?si=xyz",
            "https://www.youtube.com/watch?v=abc123&t=42s",
            "youtube.com/embed/abc123",
            "http://m.youtube.com/watch?v=abc123",
        ] {
            assert_eq!(
                embeds(url),
                vec![Node::Embed(Embed::YouTube {
                    id: "abc123".to_string()
                })],
                "url: {}",
                url
            );
        }
    }

    #[test]
    fn test_youtube_id_keeps_hyphen_and_underscore() {
        assert_eq!(
            embeds("youtu.be/dQw4w9W-gX_cQ"),
            vec![Node::Embed(Embed::YouTube {
                id: "dQw4w9W-gX_cQ".to_string()
            })]
        );
    }

    #[test]
    fn test_lookalike_domain_is_left_alone() {
        let input = "notyoutube.com/embed/abc and netflix.com/jack/status/1";
        assert_eq!(embeds(input), vec![Node::Text(input.to_string())]);
    }

    #[test]
    fn test_vimeo_needs_numeric_id() {
        assert_eq!(
            embeds("https://vimeo.com/76979871"),
            vec![Node::Embed(Embed::Vimeo {
                id: "76979871".to_string()
            })]
        );
        assert_eq!(
            embeds("https://vimeo.com/channels"),
            vec![Node::Text("https://vimeo.com/channels".to_string())]
        );
    }

    #[test]
    fn test_tweet_url_is_normalized() {
        assert_eq!(
            embeds("look: x.com/jack/status/20?s=21 wow"),
            vec![
                Node::Text("look: ".to_string()),
                Node::Embed(Embed::Tweet {
                    url: "https://x.com/jack/status/20".to_string(),
                    status_id: "20".to_string(),
                }),
                Node::Text(" wow".to_string()),
            ]
        );
    }
}
