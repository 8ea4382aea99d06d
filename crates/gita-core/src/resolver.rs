//! Outbound URLs for a verse: explanation pages and web searches.

use crate::corrections::CorrectionTable;
use crate::probe::{Probe, Reachability};
use crate::verse::VerseRef;

pub const DEFAULT_PRIMARY_BASE: &str = "https://vedabase.io/en/library/bg";
pub const DEFAULT_SECONDARY_BASE: &str = "https://www.holy-bhagavad-gita.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    YouTube,
}

impl SearchEngine {
    pub fn display_name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::YouTube => "YouTube",
        }
    }
}

/// Result of resolving with reachability checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    primary_base: String,
    secondary_base: String,
    corrections: CorrectionTable,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_BASE, DEFAULT_SECONDARY_BASE, CorrectionTable::vedabase())
    }
}

impl Resolver {
    pub fn new(primary_base: &str, secondary_base: &str, corrections: CorrectionTable) -> Self {
        Self {
            primary_base: primary_base.trim_end_matches('/').to_string(),
            secondary_base: secondary_base.trim_end_matches('/').to_string(),
            corrections,
        }
    }

    /// Primary site page for a verse.
    ///
    /// Verses the site groups together resolve to the group's `{low}-{high}`
    /// page; everything else gets `{base}/{chapter}/{verse}/`.
    pub fn resolve_primary_url(&self, chapter: u8, verse: u16) -> String {
        let segment = match self.corrections.lookup(chapter, verse) {
            Some(range) => range.segment(),
            None => verse.to_string(),
        };
        format!("{}/{}/{}/", self.primary_base, chapter, segment)
    }

    pub fn resolve_secondary_url(&self, chapter: u8, verse: u16) -> String {
        format!("{}/chapter/{}/verse/{}", self.secondary_base, chapter, verse)
    }

    pub fn resolve_search_url(&self, engine: SearchEngine, chapter: u8, verse: u16) -> String {
        let query = format!("bhagavad gita chapter {} verse {}", chapter, verse);
        let encoded = urlencoding::encode(&query);
        match engine {
            SearchEngine::Google => format!("https://www.google.com/search?q={}", encoded),
            SearchEngine::YouTube => {
                format!("https://www.youtube.com/results?search_query={}", encoded)
            }
        }
    }

    /// Probe the primary page, then the secondary one, strictly in that
    /// order. The secondary is only tried once the primary probe has
    /// reported unreachable. When the probe cannot tell, the candidate is
    /// opened unchecked.
    pub async fn resolve_with_fallback(&self, probe: &dyn Probe, reference: VerseRef) -> Resolution {
        let primary = self.resolve_primary_url(reference.chapter, reference.verse);
        match probe.check(&primary).await {
            Reachability::Reachable => {
                tracing::debug!("verse {} resolved to primary {}", reference, primary);
                return Resolution::Found(primary);
            }
            Reachability::Unknown => {
                tracing::info!("reachability unknown, using primary {} unchecked", primary);
                return Resolution::Found(primary);
            }
            Reachability::Unreachable => {}
        }

        let secondary = self.resolve_secondary_url(reference.chapter, reference.verse);
        tracing::info!("primary {} unreachable, trying {}", primary, secondary);
        match probe.check(&secondary).await {
            Reachability::Reachable | Reachability::Unknown => Resolution::Found(secondary),
            Reachability::Unreachable => {
                tracing::warn!("no reachable explanation page for verse {}", reference);
                Resolution::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Probe double that records call order and answers from a fixed set
    struct ScriptedProbe {
        reachable: HashSet<String>,
        unknown: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProbe {
        fn new(reachable: &[&str]) -> Self {
            Self {
                reachable: reachable.iter().map(|s| s.to_string()).collect(),
                unknown: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unknown() -> Self {
            Self { unknown: true, ..Self::new(&[]) }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn check(&self, url: &str) -> Reachability {
            self.calls.lock().unwrap().push(url.to_string());
            if self.unknown {
                Reachability::Unknown
            } else if self.reachable.contains(url) {
                Reachability::Reachable
            } else {
                Reachability::Unreachable
            }
        }
    }

    #[test]
    fn test_primary_url_inside_group() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve_primary_url(1, 17),
            "https://vedabase.io/en/library/bg/1/16-18/"
        );
        assert_eq!(
            resolver.resolve_primary_url(6, 12),
            "https://vedabase.io/en/library/bg/6/11-12/"
        );
    }

    #[test]
    fn test_primary_url_outside_group() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve_primary_url(1, 20),
            "https://vedabase.io/en/library/bg/1/20/"
        );
        assert_eq!(
            resolver.resolve_primary_url(2, 47),
            "https://vedabase.io/en/library/bg/2/47/"
        );
    }

    #[test]
    fn test_every_grouped_verse_uses_its_group_segment() {
        let resolver = Resolver::default();
        let table = CorrectionTable::vedabase();
        for range in table.ranges() {
            for verse in range.low..=range.high {
                let url = resolver.resolve_primary_url(range.chapter, verse);
                assert!(
                    url.ends_with(&format!("/{}/{}-{}/", range.chapter, range.low, range.high)),
                    "{} {} -> {}",
                    range.chapter,
                    verse,
                    url
                );
            }
        }
    }

    #[test]
    fn test_ungrouped_verses_are_canonical() {
        let resolver = Resolver::default();
        let table = CorrectionTable::vedabase();
        for chapter in 1..=crate::verse::CHAPTER_COUNT {
            let limit = crate::verse::verse_count(chapter).unwrap();
            for verse in 1..=limit {
                if table.lookup(chapter, verse).is_none() {
                    assert_eq!(
                        resolver.resolve_primary_url(chapter, verse),
                        format!("{}/{}/{}/", DEFAULT_PRIMARY_BASE, chapter, verse)
                    );
                }
            }
        }
    }

    #[test]
    fn test_primary_url_is_stable() {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve_primary_url(13, 9), resolver.resolve_primary_url(13, 9));
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let resolver = Resolver::new(
            "https://example.org/bg/",
            "https://other.example/",
            CorrectionTable::default(),
        );
        assert_eq!(resolver.resolve_primary_url(1, 17), "https://example.org/bg/1/17/");
        assert_eq!(
            resolver.resolve_secondary_url(1, 17),
            "https://other.example/chapter/1/verse/17"
        );
    }

    #[test]
    fn test_search_urls_are_encoded() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve_search_url(SearchEngine::Google, 2, 47),
            "https://www.google.com/search?q=bhagavad%20gita%20chapter%202%20verse%2047"
        );
        assert_eq!(
            resolver.resolve_search_url(SearchEngine::YouTube, 18, 66),
            "https://www.youtube.com/results?search_query=bhagavad%20gita%20chapter%2018%20verse%2066"
        );
    }

    #[tokio::test]
    async fn test_fallback_stops_at_reachable_primary() {
        let resolver = Resolver::default();
        let primary = resolver.resolve_primary_url(1, 17);
        let probe = ScriptedProbe::new(&[primary.as_str()]);

        let resolution = resolver.resolve_with_fallback(&probe, VerseRef::new(1, 17)).await;

        assert_eq!(resolution, Resolution::Found(primary.clone()));
        assert_eq!(probe.calls(), vec![primary]);
    }

    #[tokio::test]
    async fn test_fallback_tries_secondary_after_primary_fails() {
        let resolver = Resolver::default();
        let primary = resolver.resolve_primary_url(3, 5);
        let secondary = resolver.resolve_secondary_url(3, 5);
        let probe = ScriptedProbe::new(&[secondary.as_str()]);

        let resolution = resolver.resolve_with_fallback(&probe, VerseRef::new(3, 5)).await;

        assert_eq!(resolution, Resolution::Found(secondary.clone()));
        assert_eq!(probe.calls(), vec![primary, secondary]);
    }

    #[tokio::test]
    async fn test_fallback_reports_not_found() {
        let resolver = Resolver::default();
        let probe = ScriptedProbe::new(&[]);

        let resolution = resolver.resolve_with_fallback(&probe, VerseRef::new(3, 5)).await;

        assert_eq!(resolution, Resolution::NotFound);
        assert_eq!(probe.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_reachability_opens_primary_unchecked() {
        let resolver = Resolver::default();
        let primary = resolver.resolve_primary_url(1, 17);
        let probe = ScriptedProbe::unknown();

        let resolution = resolver.resolve_with_fallback(&probe, VerseRef::new(1, 17)).await;

        assert_eq!(resolution, Resolution::Found(primary.clone()));
        assert_eq!(probe.calls(), vec![primary]);
    }
}
