//! Identifier arenas used to remap seed references to store-assigned keys.
//!
//! Seed files never carry real identifiers. A child row points at its parent
//! either by 1-based position in the parent's load order ([`KeyArena`],
//! [`KeyedArena`]) or by the running index of successful inserts
//! ([`LoadOrderIndex`]). All structures are append-only.

use std::collections::HashMap;

use crate::error::SkipReason;

/// Ids of a table in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyArena {
    ids: Vec<i64>,
}

impl KeyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: i64) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Resolves a 1-based position to the id loaded at that position.
    pub fn resolve(&self, field: &'static str, position: i64) -> Result<i64, SkipReason> {
        usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|index| self.ids.get(index).copied())
            .ok_or(SkipReason::OutOfRange {
                field,
                position,
                available: self.ids.len(),
            })
    }
}

impl From<Vec<i64>> for KeyArena {
    fn from(ids: Vec<i64>) -> Self {
        Self { ids }
    }
}

/// Natural key to id map, plus the arena of distinct ids it produced.
///
/// A natural key seen twice keeps its first id and adds no second position.
#[derive(Debug, Clone, Default)]
pub struct KeyedArena {
    by_key: HashMap<String, i64>,
    arena: KeyArena,
}

impl KeyedArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the id of `key`. Returns `false` if the key was already known.
    pub fn insert(&mut self, key: &str, id: i64) -> bool {
        if self.by_key.contains_key(key) {
            return false;
        }
        self.by_key.insert(key.to_string(), id);
        self.arena.push(id);
        true
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.by_key.get(key).copied()
    }

    pub fn arena(&self) -> &KeyArena {
        &self.arena
    }

    pub fn resolve(&self, field: &'static str, position: i64) -> Result<i64, SkipReason> {
        self.arena.resolve(field, position)
    }
}

/// Maps the 1-based index of each successful insert to its id.
#[derive(Debug, Clone)]
pub struct LoadOrderIndex {
    ids: HashMap<i64, i64>,
    next: i64,
}

impl LoadOrderIndex {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            next: 1,
        }
    }

    /// Assigns the next load-order index to `id` and returns the index.
    pub fn record(&mut self, id: i64) -> i64 {
        let index = self.next;
        self.ids.insert(index, id);
        self.next += 1;
        index
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn resolve(&self, field: &'static str, index: i64) -> Result<i64, SkipReason> {
        self.ids
            .get(&index)
            .copied()
            .ok_or(SkipReason::UnknownIndex { field, index })
    }
}

impl Default for LoadOrderIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a numeric reference column.
pub fn parse_reference(field: &'static str, raw: &str) -> Result<i64, SkipReason> {
    raw.trim().parse().map_err(|_| SkipReason::Malformed {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_grows_in_insertion_order() {
        let mut plans = KeyArena::new();
        assert!(plans.is_empty());
        plans.push(41);
        plans.push(42);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans.ids(), &[41, 42]);
        assert_eq!(plans.resolve("PlanID", 2), Ok(42));
    }

    #[test]
    fn test_arena_resolves_positions() {
        let arena = KeyArena::from(vec![11, 12, 15]);
        assert_eq!(arena.resolve("MemberID", 1), Ok(11));
        assert_eq!(arena.resolve("MemberID", 3), Ok(15));

        for position in [0, -1, 4, i64::MAX] {
            assert_eq!(
                arena.resolve("MemberID", position),
                Err(SkipReason::OutOfRange {
                    field: "MemberID",
                    position,
                    available: 3
                })
            );
        }
    }

    #[test]
    fn test_keyed_arena_ignores_repeated_keys() {
        let mut exercises = KeyedArena::new();
        assert!(exercises.insert("Plank", 4));
        assert!(exercises.insert("Deadlift", 5));
        assert!(!exercises.insert("Plank", 6));

        assert_eq!(exercises.get("Plank"), Some(4));
        assert_eq!(exercises.arena().ids(), &[4, 5]);
        assert_eq!(exercises.resolve("ExerciseID", 2), Ok(5));
    }

    #[test]
    fn test_load_order_index() {
        let mut sessions = LoadOrderIndex::new();
        assert!(sessions.is_empty());
        assert_eq!(sessions.record(101), 1);
        assert_eq!(sessions.record(102), 2);
        assert_eq!(sessions.len(), 2);

        assert_eq!(sessions.resolve("SessionID", 1), Ok(101));
        assert_eq!(sessions.resolve("SessionID", 2), Ok(102));
        assert_eq!(
            sessions.resolve("SessionID", 3),
            Err(SkipReason::UnknownIndex {
                field: "SessionID",
                index: 3
            })
        );
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("PlanID", " 2 "), Ok(2));
        assert_eq!(
            parse_reference("PlanID", "2.0"),
            Err(SkipReason::Malformed {
                field: "PlanID",
                value: "2.0".to_string()
            })
        );
    }
}
