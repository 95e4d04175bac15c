//! Forecast identity scheme.
//!
//! An entry is recognized as engine-owned by the marker at the start of its
//! memo. Which master and date it stands for is never parsed out of the text;
//! it is recovered by re-deriving the expected label for every master and
//! matching forward, so two masters sharing a memo stay unambiguous.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use forecast_domain::{ForecastEntry, MasterTransaction, ScheduledTransaction};

use crate::diff::ForecastKey;

pub const FORECAST_MARKER: &str = "TEMPFORCST";

const MARKER_SEPARATORS: &[char] = &[' ', ':', '-', '|'];

/// Builds the label persisted on a forecast entry for `memo`.
pub fn encode_label(memo: &str) -> String {
    format!("{FORECAST_MARKER} {}", strip_marker(memo))
}

/// Removes any number of leading markers (and their separators) from `memo`.
pub fn strip_marker(memo: &str) -> &str {
    let mut rest = memo.trim();
    while starts_with_marker(rest) {
        rest = rest[FORECAST_MARKER.len()..]
            .trim_start_matches(MARKER_SEPARATORS)
            .trim_start();
    }
    rest.trim()
}

/// True when `text` begins with the marker, ignoring case and leading whitespace.
pub fn starts_with_marker(text: &str) -> bool {
    let text = text.trim_start();
    text.get(..FORECAST_MARKER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(FORECAST_MARKER))
}

/// True when `text` carries the marker anywhere, ignoring case.
pub fn contains_marker(text: &str) -> bool {
    text.to_ascii_uppercase().contains(FORECAST_MARKER)
}

/// Engine-owned entries are live one-time scheduled transactions with a marked memo.
pub fn is_engine_owned(transaction: &ScheduledTransaction) -> bool {
    !transaction.deleted
        && transaction.is_one_time()
        && starts_with_marker(transaction.memo_text())
}

/// Fields an entry must share with a master's projection to belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint {
    label: String,
    amount: i64,
    account_id: Uuid,
    category_id: Option<Uuid>,
}

impl Fingerprint {
    fn of_master(master: &MasterTransaction) -> Self {
        Self {
            label: encode_label(&master.memo),
            amount: master.amount,
            account_id: master.account_id,
            category_id: master.category_id,
        }
    }

    fn of_entry(entry: &ForecastEntry) -> Self {
        Self {
            label: entry.label.trim().to_string(),
            amount: entry.amount,
            account_id: entry.account_id,
            category_id: entry.category_id,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    master_id: Uuid,
    dates: BTreeSet<NaiveDate>,
}

/// Decodes existing entries back to `(master, date)` keys by forward computation.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    candidates: HashMap<Fingerprint, Vec<Candidate>>,
    claimed: HashSet<ForecastKey>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a master together with the dates it is projected onto this run.
    pub fn register(
        &mut self,
        master: &MasterTransaction,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) {
        self.candidates
            .entry(Fingerprint::of_master(master))
            .or_default()
            .push(Candidate {
                master_id: master.id,
                dates: dates.into_iter().collect(),
            });
    }

    /// Returns the key `entry` represents, or `None` when no master projects to it.
    ///
    /// Entries are expected in listing order. The first entry matching a
    /// target key claims it; later look-alikes resolve to a second candidate
    /// master when one shares the fingerprint, or to the already-claimed key
    /// so the diff can discard them as duplicates.
    pub fn resolve(&mut self, entry: &ForecastEntry) -> Option<ForecastKey> {
        let candidates = self.candidates.get(&Fingerprint::of_entry(entry))?;
        let mut fallback = None;
        for candidate in candidates {
            let key = ForecastKey::new(entry.date, candidate.master_id);
            if !candidate.dates.contains(&entry.date) {
                fallback.get_or_insert(key);
                continue;
            }
            if self.claimed.insert(key.clone()) {
                return Some(key);
            }
            fallback = Some(key);
        }
        fallback
    }
}
