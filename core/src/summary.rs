//! Summary statistics over a snapshot of RSVP records.

use crate::record::RsvpRecord;
use serde::Serialize;

/// Totals for the admin summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records.
    pub total: usize,
    /// Records with `attending = true`.
    pub attending: usize,
    /// Records with `attending = false`.
    pub not_attending: usize,
    /// Sum of adult counts.
    pub total_adults: u64,
    /// Sum of kid counts.
    pub total_kids: u64,
    /// `total_adults + total_kids`.
    pub total_guests: u64,
}

/// Aggregate `records` into a [`Summary`].
///
/// Guest counts are summed across every record, attending or not.
///
/// # Examples
///
/// ```
/// use rsvp_core::summarize;
///
/// assert_eq!(summarize(&[]), rsvp_core::Summary::default());
/// ```
#[must_use]
pub fn summarize(records: &[RsvpRecord]) -> Summary {
    let mut summary = records.iter().fold(Summary::default(), |mut acc, record| {
        acc.total += 1;
        if record.attending {
            acc.attending += 1;
        } else {
            acc.not_attending += 1;
        }
        acc.total_adults += u64::from(record.adults);
        acc.total_kids += u64::from(record.kids);
        acc
    });
    summary.total_guests = summary.total_adults + summary.total_kids;
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::record::EmailKey;
    use chrono::Utc;
    use proptest::prelude::*;

    fn record(email: &str, attending: bool, adults: u32, kids: u32) -> RsvpRecord {
        RsvpRecord {
            name: "Guest".to_string(),
            email: EmailKey::parse(email).unwrap(),
            attending,
            adults,
            kids,
            dietary: String::new(),
            comments: String::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_summary_is_all_zeros() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.attending, 0);
        assert_eq!(summary.not_attending, 0);
        assert_eq!(summary.total_guests, 0);
    }

    #[test]
    fn test_counts_and_totals() {
        let records = vec![
            record("jo@x.com", true, 2, 1),
            record("sam@x.com", false, 0, 0),
            record("ana@x.com", true, 1, 3),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.attending, 2);
        assert_eq!(summary.not_attending, 1);
        assert_eq!(summary.total_adults, 3);
        assert_eq!(summary.total_kids, 4);
        assert_eq!(summary.total_guests, 7);
    }

    #[test]
    fn test_declined_guest_counts_still_summed() {
        let summary = summarize(&[record("jo@x.com", false, 2, 2)]);
        assert_eq!(summary.not_attending, 1);
        assert_eq!(summary.total_guests, 4);
    }

    proptest! {
        #[test]
        fn prop_summary_matches_naive_totals(
            parties in prop::collection::vec((any::<bool>(), 0u32..50, 0u32..50), 0..100)
        ) {
            let records: Vec<RsvpRecord> = parties
                .iter()
                .enumerate()
                .map(|(i, (attending, adults, kids))| {
                    record(&format!("guest{i}@x.com"), *attending, *adults, *kids)
                })
                .collect();

            let summary = summarize(&records);
            let attending = parties.iter().filter(|(a, _, _)| *a).count();
            let adults: u64 = parties.iter().map(|(_, a, _)| u64::from(*a)).sum();
            let kids: u64 = parties.iter().map(|(_, _, k)| u64::from(*k)).sum();

            prop_assert_eq!(summary.total, parties.len());
            prop_assert_eq!(summary.attending, attending);
            prop_assert_eq!(summary.not_attending, parties.len() - attending);
            prop_assert_eq!(summary.total_guests, adults + kids);
            prop_assert_eq!(summarize(&records), summary);
        }
    }
}
