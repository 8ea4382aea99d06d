use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of chapters in the Bhagavad Gita
pub const CHAPTER_COUNT: u8 = 18;

/// Verse count per chapter, indexed by `chapter - 1`
const VERSE_LIMITS: [u16; CHAPTER_COUNT as usize] = [
    46, 72, 43, 42, 29, 47, 30, 28, 34, 42, 55, 20, 35, 27, 20, 24, 28, 78,
];

/// Number of verses in `chapter`, or `None` if the chapter does not exist.
pub fn verse_count(chapter: u8) -> Option<u16> {
    if chapter == 0 {
        return None;
    }
    VERSE_LIMITS.get(chapter as usize - 1).copied()
}

/// A (chapter, verse) address into the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub chapter: u8,
    pub verse: u16,
}

impl VerseRef {
    pub fn new(chapter: u8, verse: u16) -> Self {
        Self { chapter, verse }
    }

    /// True if the reference falls inside the chapter verse limits
    pub fn is_valid(&self) -> bool {
        verse_count(self.chapter).is_some_and(|limit| self.verse >= 1 && self.verse <= limit)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}

/// A verse as served by `GET /api/verse`.
///
/// Verses are replaced wholesale; nothing mutates a verse once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter: u8,
    #[serde(rename = "verse")]
    pub verse_number: u16,
    #[serde(alias = "shloka")]
    pub text: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub meaning: String,
}

impl Verse {
    pub fn reference(&self) -> VerseRef {
        VerseRef::new(self.chapter, self.verse_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_count_bounds() {
        assert_eq!(verse_count(0), None);
        assert_eq!(verse_count(1), Some(46));
        assert_eq!(verse_count(18), Some(78));
        assert_eq!(verse_count(19), None);
    }

    #[test]
    fn test_verse_ref_validity() {
        assert!(VerseRef::new(2, 72).is_valid());
        assert!(!VerseRef::new(2, 73).is_valid());
        assert!(!VerseRef::new(12, 0).is_valid());
        assert!(!VerseRef::new(0, 1).is_valid());
    }

    #[test]
    fn test_deserialize_server_payload() {
        let json = r#"{
            "chapter": 2,
            "verse": 47,
            "shloka": "karmaṇy evādhikāras te",
            "transliteration": "karmany evadhikaras te",
            "meaning": ""
        }"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.reference(), VerseRef::new(2, 47));
        assert_eq!(verse.text, "karmaṇy evādhikāras te");
        assert!(verse.meaning.is_empty());
    }

    #[test]
    fn test_deserialize_text_alias_and_missing_fields() {
        let json = r#"{"chapter": 1, "verse": 1, "text": "dhṛtarāṣṭra uvāca"}"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.text, "dhṛtarāṣṭra uvāca");
        assert!(verse.transliteration.is_empty());
    }

    #[test]
    fn test_display_ref() {
        assert_eq!(VerseRef::new(6, 12).to_string(), "6.12");
    }
}
