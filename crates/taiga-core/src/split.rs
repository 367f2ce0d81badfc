use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Placeholder substituted with the per-link episode number.
pub const EPISODE_PLACEHOLDER: &str = "{episode}";

/// Outbound replies are batched to stay under message length limits.
pub const LINES_PER_MESSAGE: usize = 30;

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://t\.me/([A-Za-z0-9_]+)/(\d+)$").expect("link pattern is valid")
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("invalid message link: {0}")]
    InvalidLink(String),

    #[error("start id {start} is greater than end id {end}")]
    InvertedRange { start: u64, end: u64 },
}

/// A `https://t.me/<channel>/<message_id>` link, fully validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLink {
    pub channel: String,
    pub message_id: u64,
}

impl FromStr for MessageLink {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = link_regex()
            .captures(s)
            .ok_or_else(|| SplitError::InvalidLink(s.to_string()))?;
        let message_id = captures[2]
            .parse()
            .map_err(|_| SplitError::InvalidLink(s.to_string()))?;
        Ok(Self {
            channel: captures[1].to_string(),
            message_id,
        })
    }
}

impl fmt::Display for MessageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://t.me/{}/{}", self.channel, self.message_id)
    }
}

/// Expand an inclusive link range into numbered download lines.
///
/// The Nth link in the range is labeled episode N, zero-padded to two
/// digits and substituted into `template`. The channel always comes from
/// the start link.
pub fn split_range(
    start: &MessageLink,
    end: &MessageLink,
    template: &str,
) -> Result<Vec<String>, SplitError> {
    if start.message_id > end.message_id {
        return Err(SplitError::InvertedRange {
            start: start.message_id,
            end: end.message_id,
        });
    }

    Ok((start.message_id..=end.message_id)
        .enumerate()
        .map(|(i, msg_id)| {
            let episode = format!("{:02}", i + 1);
            let name = template.replace(EPISODE_PLACEHOLDER, &episode);
            format!("https://t.me/{}/{} -n {}", start.channel, msg_id, name)
        })
        .collect())
}

/// Group lines into newline-joined batches of at most `per_message` lines.
pub fn chunk_lines(lines: &[String], per_message: usize) -> Vec<String> {
    lines
        .chunks(per_message)
        .map(|chunk| chunk.join("\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(channel: &str, message_id: u64) -> MessageLink {
        MessageLink {
            channel: channel.to_string(),
            message_id,
        }
    }

    #[test]
    fn test_parse_valid_link() {
        let parsed: MessageLink = "https://t.me/anime_channel/1432".parse().unwrap();
        assert_eq!(parsed.channel, "anime_channel");
        assert_eq!(parsed.message_id, 1432);
    }

    #[test]
    fn test_parse_rejects_malformed_links() {
        for text in [
            "https://t.me/anime_channel",
            "http://t.me/anime_channel/12",
            "https://t.me/bad-channel/12",
            "https://t.me/channel/12abc",
            "https://t.me/channel/12 trailing",
            "not a link at all",
        ] {
            assert!(text.parse::<MessageLink>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_split_counts_and_episode_numbers() {
        let lines = split_range(&link("ch", 100), &link("ch", 109), "Ep {episode}").unwrap();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "https://t.me/ch/100 -n Ep 01");
        assert_eq!(lines[9], "https://t.me/ch/109 -n Ep 10");
    }

    #[test]
    fn test_split_single_link_range() {
        let lines = split_range(&link("ch", 7), &link("ch", 7), "{episode}").unwrap();
        assert_eq!(lines, vec!["https://t.me/ch/7 -n 01"]);
    }

    #[test]
    fn test_split_padding_grows_past_two_digits() {
        let lines = split_range(&link("ch", 1), &link("ch", 100), "E{episode}").unwrap();
        assert_eq!(lines.len(), 100);
        assert!(lines[8].ends_with("-n E09"));
        assert!(lines[99].ends_with("-n E100"));
    }

    #[test]
    fn test_split_rejects_inverted_range() {
        let err = split_range(&link("ch", 50), &link("ch", 49), "{episode}").unwrap_err();
        assert_eq!(err, SplitError::InvertedRange { start: 50, end: 49 });
    }

    #[test]
    fn test_split_uses_start_channel() {
        let lines = split_range(&link("alpha", 1), &link("beta", 3), "{episode}").unwrap();
        assert!(lines.iter().all(|l| l.starts_with("https://t.me/alpha/")));
    }

    #[test]
    fn test_chunk_lines() {
        let lines: Vec<String> = (1..=65).map(|i| format!("line {i}")).collect();
        let chunks = chunk_lines(&lines, LINES_PER_MESSAGE);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].lines().count(), 30);
        assert_eq!(chunks[1].lines().count(), 30);
        assert_eq!(chunks[2].lines().count(), 5);
        assert!(chunks[0].ends_with("line 30"));
        assert!(chunks[2].starts_with("line 61"));
    }
}
