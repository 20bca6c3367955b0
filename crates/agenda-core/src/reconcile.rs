// Occurrence diff engine
//
// Given the persisted occurrence set and a client-submitted one, compute the
// minimal create/update groups instead of a wholesale replace. Matching key
// is the minute-precision timestamp; persisted slots absent from the
// submission are intentionally left untouched.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::occurrence::{dedup_speakers, PersistedOccurrence, SubmittedOccurrence};

/// An in-place mutation of one existing occurrence.
/// The speaker set is replaced wholesale with the submitted set for the slot,
/// not merged per speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub occurrence_id: Uuid,
    pub slot: String,
    pub speaker_ids: Vec<Uuid>,
}

/// Output of `reconcile`: disjoint groups covering every submitted slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrencePlan {
    /// Submitted slots with no persisted counterpart, in submission order
    pub to_create: Vec<SubmittedOccurrence>,
    /// Matched slots, sorted ascending by slot key for deterministic
    /// update order
    pub to_update: Vec<SlotUpdate>,
}

impl OccurrencePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Diff a submitted occurrence set against the persisted one.
///
/// Every submitted slot lands in exactly one of `to_create`/`to_update`;
/// duplicate submitted slots keep the first submission. Deterministic: the
/// same inputs always produce the same groups in the same order.
pub fn reconcile(
    persisted: &[PersistedOccurrence],
    submitted: &[SubmittedOccurrence],
) -> OccurrencePlan {
    let by_slot: BTreeMap<String, &PersistedOccurrence> =
        persisted.iter().map(|occ| (occ.slot(), occ)).collect();

    let mut seen = HashSet::new();
    let mut plan = OccurrencePlan::default();

    for occ in submitted {
        let slot = occ.slot();
        if !seen.insert(slot.clone()) {
            continue;
        }

        match by_slot.get(&slot) {
            Some(existing) => plan.to_update.push(SlotUpdate {
                occurrence_id: existing.id,
                slot,
                speaker_ids: dedup_speakers(occ.speaker_ids.clone()),
            }),
            None => plan.to_create.push(occ.clone()),
        }
    }

    plan.to_update.sort_by(|a, b| a.slot.cmp(&b.slot));

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::parse_event_datetime;
    use chrono::NaiveDateTime;

    fn dt(value: &str) -> NaiveDateTime {
        parse_event_datetime(value).unwrap()
    }

    fn submitted(value: &str, speakers: &[Uuid]) -> SubmittedOccurrence {
        SubmittedOccurrence::new(dt(value), None, speakers.to_vec())
    }

    fn persisted(value: &str, speakers: &[Uuid]) -> PersistedOccurrence {
        PersistedOccurrence {
            id: Uuid::now_v7(),
            event_datetime: dt(value),
            end_time: None,
            speaker_ids: speakers.to_vec(),
        }
    }

    #[test]
    fn test_all_new_occurrences_are_created_in_order() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let plan = reconcile(
            &[],
            &[
                submitted("2019-03-01 19:00", &[a]),
                submitted("2019-03-02 19:00", &[a, b]),
            ],
        );

        assert_eq!(plan.to_create.len(), 2);
        assert!(plan.to_update.is_empty());
        assert_eq!(plan.to_create[0].slot(), "2019-03-01 19:00");
        assert_eq!(plan.to_create[1].slot(), "2019-03-02 19:00");
    }

    #[test]
    fn test_matched_slot_replaces_speaker_set_wholesale() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let existing = persisted("2019-02-01 19:00", &[a, b]);
        let existing_id = existing.id;

        let plan = reconcile(&[existing], &[submitted("2019-02-01 19:00", &[b])]);

        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].occurrence_id, existing_id);
        // Speaker a is fully removed from the slot, not merged
        assert_eq!(plan.to_update[0].speaker_ids, vec![b]);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let a = Uuid::now_v7();
        let old = vec![
            persisted("2019-02-01 19:00", &[a]),
            persisted("2019-02-03 19:00", &[]),
        ];
        let new = vec![
            submitted("2019-02-03 19:00", &[a]),
            submitted("2019-02-01 19:00", &[]),
            submitted("2019-02-05 19:00", &[a]),
        ];

        let first = reconcile(&old, &new);
        let second = reconcile(&old, &new);
        assert_eq!(first, second);
        // Updates come out sorted by slot key regardless of submission order
        assert_eq!(first.to_update[0].slot, "2019-02-01 19:00");
        assert_eq!(first.to_update[1].slot, "2019-02-03 19:00");
    }

    #[test]
    fn test_noop_reconcile_updates_with_unchanged_speakers() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let old = vec![
            persisted("2019-02-01 19:00", &[a, b]),
            persisted("2019-02-02 19:00", &[b]),
        ];
        let new: Vec<SubmittedOccurrence> = old
            .iter()
            .map(|occ| SubmittedOccurrence::new(occ.event_datetime, None, occ.speaker_ids.clone()))
            .collect();

        let plan = reconcile(&old, &new);

        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 2);
        for (update, occ) in plan.to_update.iter().zip(old.iter()) {
            assert_eq!(update.occurrence_id, occ.id);
            assert_eq!(update.speaker_ids, occ.speaker_ids);
        }
    }

    #[test]
    fn test_every_submitted_slot_lands_in_exactly_one_group() {
        let old = vec![persisted("2019-02-01 19:00", &[])];
        let new = vec![
            submitted("2019-02-01 19:00", &[]),
            submitted("2019-02-02 19:00", &[]),
            submitted("2019-02-03 19:00", &[]),
        ];

        let plan = reconcile(&old, &new);

        let mut slots: Vec<String> = plan
            .to_create
            .iter()
            .map(|occ| occ.slot())
            .chain(plan.to_update.iter().map(|u| u.slot.clone()))
            .collect();
        slots.sort();
        assert_eq!(
            slots,
            vec!["2019-02-01 19:00", "2019-02-02 19:00", "2019-02-03 19:00"]
        );
    }

    #[test]
    fn test_omitted_persisted_slot_is_left_untouched() {
        let a = Uuid::now_v7();
        let old = vec![
            persisted("2019-02-01 19:00", &[a]),
            persisted("2019-02-02 19:00", &[a]),
        ];

        let plan = reconcile(&old, &[submitted("2019-02-01 19:00", &[a])]);

        // The omitted 2019-02-02 slot appears nowhere in the plan
        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].slot, "2019-02-01 19:00");
    }

    #[test]
    fn test_duplicate_submitted_slot_keeps_first() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let plan = reconcile(
            &[],
            &[
                submitted("2019-03-01 19:00", &[a]),
                submitted("2019-03-01 19:00", &[b]),
            ],
        );

        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_create[0].speaker_ids, vec![a]);
    }

    #[test]
    fn test_second_precision_submission_matches_minute_slot() {
        let existing = persisted("2019-02-01 19:00", &[]);
        let plan = reconcile(
            &[existing],
            &[SubmittedOccurrence::new(
                dt("2019-02-01 19:00:30"),
                None,
                vec![],
            )],
        );

        assert!(plan.to_create.is_empty());
        assert_eq!(plan.to_update.len(), 1);
    }
}
