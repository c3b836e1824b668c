//! Syndication feed fetcher.
//!
//! Fetches RSS/Atom feeds over HTTP with timeouts and size limits, and
//! parses them into entries with stable identifiers.

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::config::FeedConfig;
use crate::{RelayError, Result};

use super::types::{FeedEntry, MISSING_SUMMARY, MISSING_TITLE};

/// User agent string for feed fetching.
const USER_AGENT: &str = "feedrelay/0.1 (feed relay)";

/// Feed fetcher with resource limits.
pub struct FeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a fetcher with timeouts and limits from the configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RelayError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    /// Fetch the feed at the given URL and parse it into entries, in
    /// document order.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::Feed(format!("failed to fetch feed: {}", e)))?;

        // Check response status
        if !response.status().is_success() {
            return Err(RelayError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        // Check content length if available
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(RelayError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        // Read body
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Feed(format!("failed to read response: {}", e)))?;

        // Check actual size
        if bytes.len() as u64 > self.max_feed_size {
            return Err(RelayError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        debug!("Fetched {} bytes from {}", bytes.len(), url);

        parse_feed(&bytes)
    }
}

/// Parse feed bytes into entries.
fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    // Entries without their own identifier keep their link as id (or
    // stay empty for the positional fallback below). Identifiers must
    // be reproducible across fetches for deduplication to hold, so the
    // default generated ones are no use here.
    let parser = parser::Builder::new()
        .id_generator(|links, _title, _uri| {
            links.first().map(|l| l.href.clone()).unwrap_or_default()
        })
        .build();

    let feed = parser
        .parse(bytes)
        .map_err(|e| RelayError::Feed(format!("failed to parse feed: {}", e)))?;

    let entries: Vec<FeedEntry> = feed
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = if entry.id.is_empty() {
                format!("entry_{}", index)
            } else {
                entry.id
            };

            let title = entry
                .title
                .map(|t| t.content)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| MISSING_TITLE.to_string());

            let link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();

            let summary = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|s| strip_html(&s))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| MISSING_SUMMARY.to_string());

            let published = entry.published.or(entry.updated);

            FeedEntry {
                id,
                title,
                link,
                summary,
                published,
            }
        })
        .collect();

    Ok(entries)
}

/// Strip HTML tags from text and decode common entities.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    let mut in_tag = false;

    while let Some(ch) = chars.next() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            '&' if !in_tag => {
                let mut entity = String::new();
                let mut terminated = false;
                while let Some(&next) = chars.peek() {
                    if next == ';' {
                        chars.next();
                        terminated = true;
                        break;
                    }
                    if next == '&' || next == '<' || entity.len() >= 8 {
                        break;
                    }
                    entity.push(next);
                    chars.next();
                }
                if terminated {
                    match decode_entity(&entity) {
                        Some(decoded) => result.push(decoded),
                        None => {
                            // Unknown entity, keep as-is
                            result.push('&');
                            result.push_str(&entity);
                            result.push(';');
                        }
                    }
                } else {
                    result.push('&');
                    result.push_str(&entity);
                }
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    // Clean up whitespace
    result.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Decode a single HTML entity body (e.g. "amp", "#123" or "#x7B").
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
