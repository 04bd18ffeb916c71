//! Pure aggregation and ranking over already-materialized listen events.
//!
//! Everything in this module is side-effect free: the HTTP layer fetches
//! rows from the store, hands them in as slices and lookup maps, and
//! serializes whatever comes back. Missing joins never fail; they degrade
//! to omission (genre tallying) or to the "Unknown" sentinel (OLAP).

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use crate::music_store::ListenEvent;

/// Sentinel substituted when a listen references a song or user that is
/// not present in the lookup maps.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Which users' listen events participate in a count.
pub enum EligibleUsers<'a> {
    All,
    Only(&'a HashSet<i64>),
}

impl EligibleUsers<'_> {
    fn allows(&self, user_id: i64) -> bool {
        match self {
            EligibleUsers::All => true,
            EligibleUsers::Only(ids) => ids.contains(&user_id),
        }
    }
}

/// A counter that remembers the order in which keys were first seen.
///
/// Plain maps don't guarantee iteration order, so ranking ties would come
/// out differently run to run. Keeping an explicit first-seen index makes
/// the tie-break (higher count first, earlier-seen wins among equals)
/// deterministic.
pub struct CountTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K: Eq + Hash + Clone> CountTable<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: &K) -> u64 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total across all keys.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// The `n` highest-counted keys, descending. The sort is stable over
    /// first-seen order, so ties keep the order keys were first added.
    pub fn top_n(&self, n: usize) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(K, u64)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone> Default for CountTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tallies listens per song, restricted to the eligible users.
///
/// Songs with zero listens get no entry. Input order only affects the
/// first-seen tie-break order of the resulting table, never the counts.
pub fn count_listens(events: &[ListenEvent], eligible: &EligibleUsers) -> CountTable<i64> {
    let mut counts = CountTable::new();
    for event in events {
        if eligible.allows(event.user_id) {
            counts.add(event.song_id);
        }
    }
    counts
}

/// Resolves the single most-listened genre for one user's events.
///
/// Events whose song is missing from the lookup are skipped, not counted
/// as "Unknown". Returns `None` when nothing resolves to a known genre;
/// the caller surfaces that as a domain error instead of inventing a
/// default.
pub fn favorite_genre(events: &[ListenEvent], song_genre: &HashMap<i64, String>) -> Option<String> {
    let mut tally = CountTable::new();
    for event in events {
        if let Some(genre) = song_genre.get(&event.song_id) {
            tally.add(genre.clone());
        }
    }
    tally.top_n(1).into_iter().next().map(|(genre, _)| genre)
}

/// One aggregated count of listens for a unique (genre, month[, city])
/// combination. `month` is "YYYY-MM".
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OlapBucket {
    pub genre: String,
    pub month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub listen_count: u64,
}

// Grouping key for the OLAP aggregation. A struct key rather than a
// delimiter-joined string: genres or cities containing the would-be
// delimiter must not merge or split buckets.
#[derive(PartialEq, Eq, Hash, Clone)]
struct BucketKey {
    genre: String,
    month: String,
    city: Option<String>,
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Groups listen events into per-(genre, month[, city]) counts.
///
/// The city dimension is active iff `user_city` is provided. Failed
/// lookups substitute [`UNKNOWN_LABEL`]. Bucket order is first-seen and
/// not part of the contract; callers sort for presentation.
pub fn aggregate(
    events: &[ListenEvent],
    song_genre: &HashMap<i64, String>,
    user_city: Option<&HashMap<i64, String>>,
) -> Vec<OlapBucket> {
    let mut groups: CountTable<BucketKey> = CountTable::new();
    for event in events {
        let genre = song_genre
            .get(&event.song_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let city = user_city.map(|cities| {
            cities
                .get(&event.user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
        });
        groups.add(BucketKey {
            genre,
            month: month_key(event.date),
            city,
        });
    }

    groups
        .into_entries()
        .into_iter()
        .map(|(key, listen_count)| OlapBucket {
            genre: key.genre,
            month: key.month,
            city: key.city,
            listen_count,
        })
        .collect()
}
