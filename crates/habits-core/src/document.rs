//! Mapping between local habits and remote mirror documents.

use habits_local_db::{NewHabit, RemoteId};
use habits_rest_api_contract::{DocumentId, HabitDocument};

/// The document mirrored for a new habit. Local-only counters are left out.
pub fn to_document(habit: &NewHabit) -> HabitDocument {
    HabitDocument {
        title: habit.title.clone(),
        description: habit.description.clone(),
        frequency: habit.frequency.as_str().to_string(),
        streak_count: habit.streak_count,
        last_completed: habit.last_completed,
        created_at: habit.created_at,
        user_id: habit.user_id.as_str().to_string(),
    }
}

pub fn remote_id_from(id: DocumentId) -> RemoteId {
    RemoteId(id.0)
}

pub fn document_id_of(id: &RemoteId) -> DocumentId {
    DocumentId(id.as_str().to_string())
}
