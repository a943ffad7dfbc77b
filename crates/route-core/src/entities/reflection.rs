use crate::entity::{required, Entity};
use crate::error::{Result, RouteError};
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MOOD_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A journal entry, feature-wide or scoped to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: String,
    pub date: NaiveDate,
    pub content: String,
    pub mood: u8,
}

impl Entity for Reflection {
    const KIND: &'static str = "reflection";
    const SLOT: &'static str = paths::REFLECTIONS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Listing for Reflection {
    type Facet = ();

    fn search_fields(&self) -> Vec<&str> {
        vec![self.content.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.content
    }

    fn touched_at(&self) -> i64 {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc().timestamp_millis())
            .unwrap_or(0)
    }

    fn facet(&self) {}
}

fn check_mood(mood: u8) -> Result<u8> {
    if MOOD_RANGE.contains(&mood) {
        Ok(mood)
    } else {
        Err(RouteError::validation(format!("mood must be between 1 and 5, got {mood}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionDraft {
    pub content: String,
    #[serde(default = "default_mood")]
    pub mood: u8,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

fn default_mood() -> u8 {
    3
}

impl ReflectionDraft {
    pub fn into_reflection(self) -> Result<Reflection> {
        Ok(Reflection {
            id: list::generate_id(),
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            content: required("content", &self.content)?,
            mood: check_mood(self.mood)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionPatch {
    pub content: Option<String>,
    pub mood: Option<u8>,
    pub date: Option<NaiveDate>,
}

impl ReflectionPatch {
    pub fn apply(self, r: &mut Reflection) -> Result<()> {
        if let Some(content) = self.content {
            r.content = required("content", &content)?;
        }
        if let Some(mood) = self.mood {
            r.mood = check_mood(mood)?;
        }
        if let Some(date) = self.date {
            r.date = date;
        }
        Ok(())
    }
}

pub fn add_reflection(items: &[Reflection], draft: ReflectionDraft) -> Result<Vec<Reflection>> {
    Ok(list::add(items, draft.into_reflection()?))
}

pub fn edit_reflection(items: &[Reflection], id: &str, patch: ReflectionPatch) -> Result<Vec<Reflection>> {
    list::try_update(items, id, |r| patch.apply(r))
}

/// Mean mood, `None` for an empty journal.
pub fn average_mood(items: &[Reflection]) -> Option<f64> {
    if items.is_empty() {
        return None;
    }
    let total: u32 = items.iter().map(|r| u32::from(r.mood)).sum();
    Some(f64::from(total) / items.len() as f64)
}
