use crate::entity::{required, Entity};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "blue".to_string()
}

impl Habit {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            streak: 0,
            best_streak: 0,
            completed_dates: BTreeSet::new(),
            color: default_color(),
        }
    }

    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Flip completion for `day` and adjust the streak by one.
    ///
    /// The streak is a running counter, not recomputed from
    /// `completed_dates`: toggling a day on adds one, toggling it off
    /// subtracts one (never below zero). The best streak only grows.
    pub fn toggle(&mut self, day: NaiveDate) {
        if self.completed_dates.remove(&day) {
            self.streak = self.streak.saturating_sub(1);
        } else {
            self.completed_dates.insert(day);
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        }
    }
}

impl Entity for Habit {
    const KIND: &'static str = "habit";
    const SLOT: &'static str = paths::HABITS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let seed = |id: &str, title: &str, color: &str| {
            let mut h = Habit::new(id, title);
            h.color = color.to_string();
            h
        };
        vec![
            seed("habit-1", "Morning review", "blue"),
            seed("habit-2", "Deep work block", "violet"),
            seed("habit-3", "Reach out to one customer", "emerald"),
        ]
    }
}

impl Listing for Habit {
    type Facet = ();

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn facet(&self) {}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl HabitDraft {
    pub fn into_habit(self) -> Result<Habit> {
        let mut habit = Habit::new(list::generate_id(), required("title", &self.title)?);
        if let Some(color) = crate::entity::non_blank(self.color.as_deref()) {
            habit.color = color;
        }
        Ok(habit)
    }
}

pub fn add_habit(habits: &[Habit], draft: HabitDraft) -> Result<Vec<Habit>> {
    Ok(list::add(habits, draft.into_habit()?))
}

pub fn toggle_habit(habits: &[Habit], id: &str, day: NaiveDate) -> Result<Vec<Habit>> {
    list::try_update(habits, id, |h| {
        h.toggle(day);
        Ok(())
    })
}

/// `(done, total)` for `day`.
pub fn completion_on(habits: &[Habit], day: NaiveDate) -> (usize, usize) {
    let done = habits.iter().filter(|h| h.is_done_on(day)).count();
    (done, habits.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn toggle_twice_restores_streak() {
        let mut h = Habit::new("h1", "Run");
        h.streak = 5;
        h.best_streak = 5;
        let today = day(10);

        h.toggle(today);
        assert_eq!(h.streak, 6);
        assert!(h.completed_dates.contains(&today));
        assert_eq!(h.best_streak, 6);

        h.toggle(today);
        assert_eq!(h.streak, 5);
        assert!(!h.completed_dates.contains(&today));
        assert_eq!(h.best_streak, 6);
    }

    #[test]
    fn toggle_off_never_goes_negative() {
        let mut h = Habit::new("h1", "Run");
        h.completed_dates.insert(day(1));
        h.toggle(day(1));
        assert_eq!(h.streak, 0);
    }

    #[test]
    fn toggle_through_list_keeps_input() {
        let habits = Habit::defaults();
        let next = toggle_habit(&habits, "habit-2", day(3)).unwrap();
        assert_eq!(next[1].streak, 1);
        assert_eq!(habits[1].streak, 0);
        assert_eq!(completion_on(&next, day(3)), (1, 3));
        assert!(toggle_habit(&habits, "nope", day(3)).is_err());
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let mut h = Habit::new("h1", "Read");
        h.toggle(day(2));
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["completedDates"], serde_json::json!(["2024-06-02"]));
        assert_eq!(v["bestStreak"], 1);
    }

    #[test]
    fn draft_requires_title() {
        assert!(HabitDraft::default().into_habit().is_err());
        let h = HabitDraft {
            title: "Stretch".into(),
            color: Some("rose".into()),
        }
        .into_habit()
        .unwrap();
        assert_eq!(h.color, "rose");
    }
}
