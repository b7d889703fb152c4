use std::collections::HashMap;

use tracing::{info, warn};

use crate::models::ParticipantRecord;

/// Collapses records sharing a trimmed nickname into one record per participant,
/// in first-seen order. Records with a blank nickname are dropped.
///
/// Conflicts are resolved by filling gaps only: a later row supplies a value
/// only where the earlier merged record has none (absent or blank). Non-blank
/// earlier values are never overwritten.
pub fn merge_duplicates(records: Vec<ParticipantRecord>) -> Vec<ParticipantRecord> {
    let mut merged: Vec<ParticipantRecord> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for (row, mut record) in records.into_iter().enumerate() {
        let name = record.identity().to_string();
        if name.is_empty() {
            warn!("Dropping row {} without a nickname", row + 1);
            continue;
        }

        match index_by_name.get(&name) {
            Some(&existing) => {
                fill_gaps(&mut merged[existing], record);
                info!("Merged duplicate submission: {name}");
            }
            None => {
                record.nickname = name.clone();
                index_by_name.insert(name, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

fn fill_gaps(existing: &mut ParticipantRecord, later: ParticipantRecord) {
    for (slot, value) in [
        (&mut existing.timestamp, later.timestamp),
        (&mut existing.email, later.email),
        (&mut existing.profile_url, later.profile_url),
    ] {
        if slot.trim().is_empty() && !value.trim().is_empty() {
            *slot = value;
        }
    }

    existing.form_data.fill_gaps_from(&later.form_data);

    if let Some(incoming) = later.profile_info {
        match &mut existing.profile_info {
            Some(current) => current.fill_gaps_from(&incoming),
            slot => *slot = Some(incoming),
        }
    }

    existing.submitted |= later.submitted;
}
