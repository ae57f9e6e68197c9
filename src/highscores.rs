//! High score leaderboard
//!
//! Three entries, persisted across power loss in a 15-byte non-volatile
//! block: 3 x (3 ASCII initials + big-endian u16 score). The core owns the
//! codec and ordering; the storage collaborator only moves raw bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 3;
/// Initials per entry
pub const INITIALS_LEN: usize = 3;
/// Bytes per persisted entry (initials + big-endian score)
pub const ENTRY_LEN: usize = INITIALS_LEN + 2;
/// Size of the persisted block
pub const BLOCK_LEN: usize = MAX_HIGH_SCORES * ENTRY_LEN;
/// Largest score the block can represent
pub const MAX_STORED_SCORE: u32 = 9999;

/// Storage collaborator failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("high score block read failed")]
    Read,
    #[error("high score block write failed")]
    Write,
}

/// Raw byte durability for the high-score block
///
/// Implementations guarantee nothing beyond moving the bytes; ordering,
/// verification and fallback all live in [`HighScores`].
pub trait StorageBlock {
    fn read_block(&mut self) -> Result<[u8; BLOCK_LEN], StorageError>;
    fn write_block(&mut self, block: &[u8; BLOCK_LEN]) -> Result<(), StorageError>;
}

/// In-memory block for hosts without non-volatile storage, and for tests
#[derive(Debug, Clone, Copy, Default)]
pub struct MemStore {
    pub block: [u8; BLOCK_LEN],
}

impl StorageBlock for MemStore {
    fn read_block(&mut self) -> Result<[u8; BLOCK_LEN], StorageError> {
        Ok(self.block)
    }

    fn write_block(&mut self, block: &[u8; BLOCK_LEN]) -> Result<(), StorageError> {
        self.block = *block;
        Ok(())
    }
}

/// A single high score entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player initials, strictly A-Z
    pub initials: [u8; INITIALS_LEN],
    /// Final session score
    pub score: u16,
}

impl HighScoreEntry {
    /// Initials as text (the store only ever holds A-Z bytes)
    pub fn initials_str(&self) -> &str {
        std::str::from_utf8(&self.initials).unwrap_or("???")
    }
}

/// High score leaderboard
///
/// Always sorted descending by score; ties keep the earlier entry ranked
/// higher. Never more than [`MAX_HIGH_SCORES`] entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would enter the table
    ///
    /// Zero never qualifies; with a full table the score must strictly
    /// beat the lowest entry, so ties are rejected.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .last()
            .map(|e| score > u32::from(e.score))
            .unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, initials: [u8; INITIALS_LEN], score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        // Clamp to what the block can hold so a legitimate large total
        // never reads back as corruption
        let entry = HighScoreEntry {
            initials,
            score: score.min(MAX_STORED_SCORE) as u16,
        };

        // Find insertion point (sorted descending, stable on ties)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u16> {
        self.entries.first().map(|e| e.score)
    }

    /// Encode the table into its storage block; unused slots stay zeroed
    pub fn encode(&self) -> [u8; BLOCK_LEN] {
        let mut block = [0u8; BLOCK_LEN];
        for (slot, entry) in self.entries.iter().take(MAX_HIGH_SCORES).enumerate() {
            let at = slot * ENTRY_LEN;
            block[at..at + INITIALS_LEN].copy_from_slice(&entry.initials);
            block[at + INITIALS_LEN..at + ENTRY_LEN].copy_from_slice(&entry.score.to_be_bytes());
        }
        block
    }

    /// Decode a storage block, verifying every populated slot
    ///
    /// Initials must be A-Z, scores 1..=9999, entries descending, and no
    /// populated slot may follow an empty one. Any violation means the
    /// block is corrupt and the whole table is discarded (None).
    pub fn decode(block: &[u8; BLOCK_LEN]) -> Option<Self> {
        let mut entries = Vec::new();
        let mut seen_empty = false;
        for chunk in block.chunks_exact(ENTRY_LEN) {
            if chunk.iter().all(|&b| b == 0) {
                seen_empty = true;
                continue;
            }
            if seen_empty {
                return None;
            }
            let initials = [chunk[0], chunk[1], chunk[2]];
            if !initials.iter().all(|b| b.is_ascii_uppercase()) {
                return None;
            }
            let score = u16::from_be_bytes([chunk[3], chunk[4]]);
            if score == 0 || u32::from(score) > MAX_STORED_SCORE {
                return None;
            }
            entries.push(HighScoreEntry { initials, score });
        }
        if !entries.windows(2).all(|pair| pair[0].score >= pair[1].score) {
            return None;
        }
        Some(Self { entries })
    }

    /// Load the table from storage
    ///
    /// Never fails the caller: unreadable or corrupt blocks degrade to an
    /// empty table, and the next qualifying insert rewrites the block.
    pub fn load_from(store: &mut dyn StorageBlock) -> Self {
        match store.read_block() {
            Ok(block) => match Self::decode(&block) {
                Some(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                None => {
                    log::warn!("high score block malformed, starting fresh");
                    Self::new()
                }
            },
            Err(err) => {
                log::warn!("high score block unreadable ({err}), starting fresh");
                Self::new()
            }
        }
    }

    /// Persist the whole table in one write
    pub fn save_to(&self, store: &mut dyn StorageBlock) -> Result<(), StorageError> {
        store.write_block(&self.encode())?;
        log::info!("high scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(initials: &[u8; 3], score: u16) -> HighScoreEntry {
        HighScoreEntry {
            initials: *initials,
            score,
        }
    }

    #[test]
    fn test_insert_orders_descending() {
        let mut table = HighScores::new();
        assert_eq!(table.add_score(*b"AAA", 450), Some(1));
        assert_eq!(table.add_score(*b"BBB", 1250), Some(1));
        assert_eq!(table.add_score(*b"CCC", 890), Some(2));

        let scores: Vec<u16> = table.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![1250, 890, 450]);

        // A tie with the current lowest is not strictly greater: rejected
        assert!(!table.qualifies(450));
        assert_eq!(table.add_score(*b"DDD", 450), None);
        assert_eq!(table.entries.len(), 3);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let table = HighScores::new();
        assert!(!table.qualifies(0));
        assert!(table.qualifies(1));
    }

    #[test]
    fn test_truncates_to_three() {
        let mut table = HighScores::new();
        for score in [100, 200, 300, 400] {
            table.add_score(*b"AAA", score);
        }
        assert_eq!(table.entries.len(), 3);
        assert_eq!(table.top_score(), Some(400));
        // 100 fell off the bottom
        assert_eq!(table.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_partial_table_keeps_earlier_tie_first() {
        let mut table = HighScores::new();
        table.add_score(*b"OLD", 450);
        table.add_score(*b"NEW", 450);
        assert_eq!(table.entries[0].initials_str(), "OLD");
        assert_eq!(table.entries[1].initials_str(), "NEW");
    }

    #[test]
    fn test_score_clamped_to_block_range() {
        let mut table = HighScores::new();
        table.add_score(*b"BIG", 12000);
        assert_eq!(table.top_score(), Some(9999));
        // And the clamped entry round-trips cleanly
        let decoded = HighScores::decode(&table.encode());
        assert!(decoded.is_some_and(|t| t.top_score() == Some(9999)));
    }

    #[test]
    fn test_encode_layout() {
        let table = HighScores {
            entries: vec![entry(b"ACE", 450)],
        };
        let block = table.encode();
        // "ACE" then 450 big-endian, rest zeroed
        assert_eq!(&block[..5], &[b'A', b'C', b'E', 0x01, 0xC2]);
        assert!(block[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_roundtrip() {
        let table = HighScores {
            entries: vec![entry(b"AAA", 1250), entry(b"BBB", 890), entry(b"CCC", 450)],
        };
        let decoded = HighScores::decode(&table.encode()).unwrap();
        assert_eq!(decoded.entries, table.entries);
    }

    #[test]
    fn test_decode_fresh_block_is_empty() {
        let decoded = HighScores::decode(&[0u8; BLOCK_LEN]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        // Erased-flash pattern
        assert!(HighScores::decode(&[0xFF; BLOCK_LEN]).is_none());

        // Lowercase initials
        let table = HighScores {
            entries: vec![entry(b"abc", 100)],
        };
        assert!(HighScores::decode(&table.encode()).is_none());

        // Out-of-order scores
        let table = HighScores {
            entries: vec![entry(b"LOW", 10), entry(b"TOP", 500)],
        };
        assert!(HighScores::decode(&table.encode()).is_none());

        // A populated slot after an empty one
        let mut block = [0u8; BLOCK_LEN];
        block[ENTRY_LEN..2 * ENTRY_LEN].copy_from_slice(&[b'X', b'Y', b'Z', 0x00, 0x64]);
        assert!(HighScores::decode(&block).is_none());
    }

    #[test]
    fn test_load_degrades_to_empty() {
        struct BrokenStore;
        impl StorageBlock for BrokenStore {
            fn read_block(&mut self) -> Result<[u8; BLOCK_LEN], StorageError> {
                Err(StorageError::Read)
            }
            fn write_block(&mut self, _: &[u8; BLOCK_LEN]) -> Result<(), StorageError> {
                Err(StorageError::Write)
            }
        }

        let table = HighScores::load_from(&mut BrokenStore);
        assert!(table.is_empty());

        // A corrupt block degrades the same way
        let mut store = MemStore { block: [0xFF; BLOCK_LEN] };
        assert!(HighScores::load_from(&mut store).is_empty());
    }

    #[test]
    fn test_save_and_reload_through_store() {
        let mut store = MemStore::default();
        let mut table = HighScores::new();
        table.add_score(*b"ZOE", 777);
        table.save_to(&mut store).unwrap();

        let reloaded = HighScores::load_from(&mut store);
        assert_eq!(reloaded.entries, table.entries);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_bounded(scores in prop::collection::vec(0u32..5000, 0..32)) {
            let mut table = HighScores::new();
            for (i, score) in scores.iter().enumerate() {
                let letter = b'A' + (i % 26) as u8;
                table.add_score([letter; 3], *score);
                prop_assert!(table.entries.len() <= MAX_HIGH_SCORES);
                prop_assert!(
                    table.entries.windows(2).all(|pair| pair[0].score >= pair[1].score)
                );
            }
        }

        #[test]
        fn prop_decode_never_panics(block in prop::array::uniform32(any::<u8>())) {
            let mut trimmed = [0u8; BLOCK_LEN];
            trimmed.copy_from_slice(&block[..BLOCK_LEN]);
            // Corrupt input may decode to None but must never panic
            let _ = HighScores::decode(&trimmed);
        }
    }
}
