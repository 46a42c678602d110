use crate::models::ScheduledActivity;

/// Live counts for the day-to-day tab, derived from the fetched agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayToDaySummary {
    pub todo: usize,
    pub done: usize,
}

impl DayToDaySummary {
    pub fn total(&self) -> usize {
        self.todo + self.done
    }
}

pub fn summarize(activities: &[ScheduledActivity]) -> DayToDaySummary {
    let done = activities.iter().filter(|activity| activity.completed).count();
    DayToDaySummary {
        todo: activities.len() - done,
        done,
    }
}

/// Applies a successful "mark complete" to the local copy. Returns whether
/// anything changed; completing twice is a no-op.
pub fn complete_locally(activities: &mut [ScheduledActivity], id: u64) -> bool {
    match activities.iter_mut().find(|activity| activity.id == id) {
        Some(activity) if !activity.completed => {
            activity.mark_complete();
            true
        }
        _ => false,
    }
}
