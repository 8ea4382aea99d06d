//! Verse grouping overrides for the primary explanation site.
//!
//! The site publishes some consecutive verses on a single page addressed as
//! `{low}-{high}`. A [`CorrectionTable`] lists those groups per chapter.

use crate::error::TableError;
use crate::verse::CHAPTER_COUNT;
use std::collections::BTreeMap;

/// Inclusive verse interval that the site serves as one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionRange {
    pub chapter: u8,
    pub low: u16,
    pub high: u16,
}

impl CorrectionRange {
    pub const fn new(chapter: u8, low: u16, high: u16) -> Self {
        Self { chapter, low, high }
    }

    pub fn contains(&self, verse: u16) -> bool {
        self.low <= verse && verse <= self.high
    }

    /// Path segment used in place of a single verse number
    pub fn segment(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

/// Groups on vedabase.io, in declaration order
const VEDABASE_GROUPS: &[CorrectionRange] = &[
    CorrectionRange::new(1, 16, 18),
    CorrectionRange::new(1, 21, 22),
    CorrectionRange::new(1, 32, 35),
    CorrectionRange::new(1, 37, 38),
    CorrectionRange::new(2, 42, 43),
    CorrectionRange::new(5, 8, 9),
    CorrectionRange::new(5, 27, 28),
    CorrectionRange::new(6, 11, 12),
    CorrectionRange::new(6, 13, 14),
    CorrectionRange::new(6, 20, 23),
    CorrectionRange::new(10, 4, 5),
    CorrectionRange::new(10, 12, 13),
    CorrectionRange::new(11, 10, 11),
    CorrectionRange::new(11, 26, 27),
    CorrectionRange::new(11, 41, 42),
    CorrectionRange::new(12, 3, 4),
    CorrectionRange::new(12, 6, 7),
    CorrectionRange::new(12, 13, 14),
    CorrectionRange::new(12, 18, 19),
    CorrectionRange::new(13, 1, 2),
    CorrectionRange::new(13, 6, 7),
    CorrectionRange::new(13, 8, 12),
    CorrectionRange::new(14, 22, 25),
    CorrectionRange::new(15, 3, 4),
    CorrectionRange::new(16, 1, 3),
    CorrectionRange::new(16, 11, 12),
    CorrectionRange::new(16, 13, 15),
    CorrectionRange::new(17, 5, 6),
    CorrectionRange::new(17, 26, 27),
    CorrectionRange::new(18, 51, 53),
];

/// Chapter-keyed ranges, validated at construction.
///
/// Within a chapter ranges are sorted and disjoint, so the first match in
/// declaration order is also the only match.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    by_chapter: BTreeMap<u8, Vec<CorrectionRange>>,
}

impl CorrectionTable {
    pub fn new(ranges: impl IntoIterator<Item = CorrectionRange>) -> Result<Self, TableError> {
        let mut by_chapter: BTreeMap<u8, Vec<CorrectionRange>> = BTreeMap::new();

        for range in ranges {
            if range.chapter == 0 || range.chapter > CHAPTER_COUNT {
                return Err(TableError::InvalidChapter(range.chapter));
            }
            if range.low > range.high {
                return Err(TableError::InvertedRange {
                    chapter: range.chapter,
                    low: range.low,
                    high: range.high,
                });
            }

            let chapter_ranges = by_chapter.entry(range.chapter).or_default();
            if let Some(prev) = chapter_ranges.last() {
                if range.low <= prev.high {
                    return Err(TableError::Unordered {
                        chapter: range.chapter,
                        low: range.low,
                        high: range.high,
                    });
                }
            }
            chapter_ranges.push(range);
        }

        Ok(Self { by_chapter })
    }

    /// The built-in vedabase.io table
    pub fn vedabase() -> Self {
        let mut by_chapter: BTreeMap<u8, Vec<CorrectionRange>> = BTreeMap::new();
        for range in VEDABASE_GROUPS {
            by_chapter.entry(range.chapter).or_default().push(*range);
        }
        Self { by_chapter }
    }

    /// First range in `chapter` that contains `verse`
    pub fn lookup(&self, chapter: u8, verse: u16) -> Option<&CorrectionRange> {
        self.by_chapter
            .get(&chapter)?
            .iter()
            .find(|range| range.contains(verse))
    }

    pub fn ranges(&self) -> impl Iterator<Item = &CorrectionRange> {
        self.by_chapter.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_passes_validation() {
        let validated = CorrectionTable::new(VEDABASE_GROUPS.iter().copied()).unwrap();
        assert_eq!(validated.ranges().count(), VEDABASE_GROUPS.len());
        assert_eq!(
            validated.ranges().collect::<Vec<_>>(),
            CorrectionTable::vedabase().ranges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lookup_inside_and_on_bounds() {
        let table = CorrectionTable::vedabase();
        assert_eq!(table.lookup(1, 16).map(|r| r.segment()), Some("16-18".to_string()));
        assert_eq!(table.lookup(1, 17).map(|r| r.segment()), Some("16-18".to_string()));
        assert_eq!(table.lookup(1, 18).map(|r| r.segment()), Some("16-18".to_string()));
        assert_eq!(table.lookup(13, 10).map(|r| r.segment()), Some("8-12".to_string()));
    }

    #[test]
    fn test_lookup_misses() {
        let table = CorrectionTable::vedabase();
        assert!(table.lookup(1, 15).is_none());
        assert!(table.lookup(1, 19).is_none());
        // chapter with no groups at all
        assert!(table.lookup(3, 5).is_none());
    }

    #[test]
    fn test_rejects_overlap() {
        let err = CorrectionTable::new([
            CorrectionRange::new(4, 1, 5),
            CorrectionRange::new(4, 5, 7),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::Unordered { chapter: 4, low: 5, high: 7 });
    }

    #[test]
    fn test_rejects_unsorted() {
        let err = CorrectionTable::new([
            CorrectionRange::new(4, 10, 12),
            CorrectionRange::new(4, 1, 2),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::Unordered { .. }));
    }

    #[test]
    fn test_rejects_bad_chapter_and_inverted() {
        assert_eq!(
            CorrectionTable::new([CorrectionRange::new(19, 1, 2)]).unwrap_err(),
            TableError::InvalidChapter(19)
        );
        assert!(matches!(
            CorrectionTable::new([CorrectionRange::new(3, 9, 2)]).unwrap_err(),
            TableError::InvertedRange { .. }
        ));
    }

    #[test]
    fn test_separate_chapters_do_not_interact() {
        let table = CorrectionTable::new([
            CorrectionRange::new(2, 10, 12),
            CorrectionRange::new(3, 1, 2),
        ])
        .unwrap();
        assert!(table.lookup(2, 1).is_none());
        assert!(table.lookup(3, 11).is_none());
    }
}
