use gist_render::ads::{distribute, placeholder};
use gist_render::markup::LINE_BREAK;
use gist_render::{transform, AdDistributor, AdPolicy, MarkupTransformer};

/// Small deterministic generator so the sweep is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn text(&mut self, alphabet: &[char], max_len: u64) -> String {
        let len = self.next() % (max_len + 1);
        (0..len)
            .map(|_| alphabet[(self.next() % alphabet.len() as u64) as usize])
            .collect()
    }
}

const TAGS: [&str; 7] = [
    "<blockquote class=\"custom-quote\">",
    "</blockquote>",
    "<strong>",
    "</strong>",
    "<em>",
    "</em>",
    LINE_BREAK,
];

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#039;"];

/// Everything left after removing the tags the transformer may emit must
/// be escaped text.
fn assert_only_escaped_text(input: &str, html: &str) {
    let mut rest = html.to_string();
    for tag in TAGS {
        rest = rest.replace(tag, "");
    }
    for entity in ENTITIES {
        rest = rest.replace(entity, "");
    }
    for c in ['<', '>', '"', '\'', '&'] {
        assert!(
            !rest.contains(c),
            "raw {:?} leaked for input {:?}: {:?}",
            c,
            input,
            html
        );
    }
}

#[test]
fn test_author_text_never_becomes_markup() {
    let alphabet = ['a', ' ', '*', '#', '%', '<', '>', '&', '"', '\'', '\n', '/'];
    let mut rng = Lcg(7);
    for _ in 0..500 {
        let input = rng.text(&alphabet, 24);
        let html = transform(&input);
        assert_only_escaped_text(&input, &html);
    }
}

#[test]
fn test_plain_single_line_is_a_fixed_point_after_escaping() {
    let alphabet = ['x', 'y', ' ', '.', ',', '!', '?', '-'];
    let mut rng = Lcg(42);
    for _ in 0..200 {
        let input = rng.text(&alphabet, 30);
        assert_eq!(transform(&input), input);
    }
    assert_eq!(transform("5 > 3 & 2 < 4"), "5 &gt; 3 &amp; 2 &lt; 4");
}

#[test]
fn test_bold_leaves_no_delimiters() {
    let html = transform("*bold*");
    assert_eq!(html.matches("<strong>bold</strong>").count(), 1);
    assert!(!html.contains('*'));
}

#[test]
fn test_multiline_quote_is_never_split() {
    let html = transform("%line one\nline two%");
    assert_eq!(html.matches("<blockquote").count(), 1);
    assert_eq!(html.matches("</blockquote>").count(), 1);
    assert!(!html.contains(LINE_BREAK));
}

#[test]
fn test_empty_image_token_dropped() {
    assert!(!transform("{img:}").contains("<img"));
}

#[test]
fn test_youtube_short_link_embeds_base_id() {
    let html = transform("https://youtu.be/abc123?si=xyz");
    assert_eq!(html.matches("<iframe").count(), 1);
    assert_eq!(html.matches("abc123").count(), 1);
    assert!(!html.contains("xyz"));
}

#[test]
fn test_short_body_gets_no_ads() {
    let html = transform("one\ntwo\nthree\nfour\nfive");
    let result = distribute(&html);
    assert_eq!(result.placeholders, 0);
    assert_eq!(result.html, html);
}

#[test]
fn test_twenty_lines_get_three_ordered_slots_after_segment_three() {
    let body = (1..=20)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n");
    let html = MarkupTransformer::default().transform(&body);
    let result = AdDistributor::new(AdPolicy::default()).distribute(&html);

    assert_eq!(result.placeholders, 3);
    assert_eq!(result.slot_ids(), vec!["ad-spot-0", "ad-spot-1", "ad-spot-2"]);

    let positions: Vec<usize> = (0..3)
        .map(|n| result.html.find(&placeholder(n)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let after_third = result.html.find("line 3").unwrap();
    assert!(positions[0] > after_third);
}

#[test]
fn test_distribution_keeps_every_segment() {
    let body = (1..=40)
        .map(|i| format!("p{}", i))
        .collect::<Vec<_>>()
        .join("\n");
    let result = distribute(&transform(&body));
    assert_eq!(result.placeholders, 4);

    let mut stripped = result.html.clone();
    for n in 0..result.placeholders {
        stripped = stripped.replace(&placeholder(n), "");
    }
    let segments: Vec<&str> = stripped
        .split(LINE_BREAK)
        .filter(|s| !s.is_empty())
        .collect();
    assert_eq!(segments.len(), 40);
    assert_eq!(segments[0], "p1");
    assert_eq!(segments[39], "p40");
}
