use crate::markup::LINE_BREAK;
use serde::{Deserialize, Serialize};

/// Placement rules for ad placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdPolicy {
    pub enabled: bool,
    /// Content with fewer segments than this gets no ads at all.
    pub min_segments: usize,
    /// Number of leading segments that never get an ad after them.
    pub leading_guard: usize,
}

impl Default for AdPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_segments: 6,
            leading_guard: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub html: String,
    pub placeholders: usize,
}

impl Distribution {
    fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_string(),
            placeholders: 0,
        }
    }

    /// Element ids the page script fills, in order.
    pub fn slot_ids(&self) -> Vec<String> {
        (0..self.placeholders).map(slot_id).collect()
    }
}

pub fn slot_id(ordinal: usize) -> String {
    format!("ad-spot-{}", ordinal)
}

pub fn placeholder(ordinal: usize) -> String {
    format!("<div class=\"ad-spot\" id=\"{}\"></div>", slot_id(ordinal))
}

/// Slots wanted for a body of `segments` lines.
pub fn target_slots(segments: usize) -> usize {
    match segments {
        0..=15 => 2,
        16..=30 => 3,
        _ => 4,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdDistributor {
    policy: AdPolicy,
}

impl AdDistributor {
    pub fn new(policy: AdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AdPolicy {
        &self.policy
    }

    /// Spreads placeholders through `<br>`-separated HTML at a fixed interval.
    ///
    /// Segments are counted from 1. A placeholder follows segment `i` when
    /// `i` is past the leading guard and a multiple of the interval, until
    /// the target count is reached. Fewer than the target may fit; that is
    /// not an error.
    pub fn distribute(&self, html: &str) -> Distribution {
        if !self.policy.enabled {
            return Distribution::unchanged(html);
        }

        let segments: Vec<&str> = html.split(LINE_BREAK).collect();
        let count = segments.len();
        if count < self.policy.min_segments.max(1) {
            return Distribution::unchanged(html);
        }

        let target = target_slots(count);
        let interval = (count / (target + 1)).max(1);

        let mut out = String::with_capacity(html.len() + target * 48);
        let mut placed = 0;
        for (index, segment) in segments.iter().enumerate() {
            let position = index + 1;
            out.push_str(segment);
            if position < count {
                out.push_str(LINE_BREAK);
            }
            if placed < target && position > self.policy.leading_guard && position % interval == 0 {
                out.push_str(&placeholder(placed));
                placed += 1;
            }
        }

        tracing::debug!(
            "Placed {}/{} ad slots over {} segments (interval {})",
            placed,
            target,
            count,
            interval
        );

        Distribution {
            html: out,
            placeholders: placed,
        }
    }
}

/// Distributes with the default policy.
pub fn distribute(html: &str) -> Distribution {
    AdDistributor::default().distribute(html)
}
