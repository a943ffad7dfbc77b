use crate::entity::{required, string_enum, Entity};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneStatus {
    Planned,
    InProgress,
    Done,
}

string_enum!(MilestoneStatus, "milestone status", [
    Planned => "Planned",
    InProgress => "InProgress",
    Done => "Done",
]);

/// A roadmap entry. List order is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quarter: String,
    pub status: MilestoneStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Milestone {
    pub fn new(id: impl Into<String>, title: impl Into<String>, quarter: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            quarter: quarter.into(),
            status: MilestoneStatus::Planned,
            due_date: None,
        }
    }
}

impl Entity for Milestone {
    const KIND: &'static str = "milestone";
    const SLOT: &'static str = paths::ROADMAP_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut beta = Milestone::new("milestone-1", "Private beta", "Q1");
        beta.status = MilestoneStatus::InProgress;
        vec![
            beta,
            Milestone::new("milestone-2", "First 100 customers", "Q2"),
            Milestone::new("milestone-3", "Break even", "Q4"),
        ]
    }
}

impl Listing for Milestone {
    type Facet = MilestoneStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.quarter.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn facet(&self) -> MilestoneStatus {
        self.status
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quarter: String,
    #[serde(default)]
    pub status: Option<MilestoneStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl MilestoneDraft {
    pub fn into_milestone(self) -> Result<Milestone> {
        let mut m = Milestone::new(
            list::generate_id(),
            required("title", &self.title)?,
            self.quarter.trim(),
        );
        m.description = self.description.trim().to_string();
        m.status = self.status.unwrap_or(MilestoneStatus::Planned);
        m.due_date = self.due_date;
        Ok(m)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quarter: Option<String>,
    pub status: Option<MilestoneStatus>,
    pub due_date: Option<NaiveDate>,
}

impl MilestonePatch {
    pub fn apply(self, m: &mut Milestone) -> Result<()> {
        if let Some(title) = self.title {
            m.title = required("title", &title)?;
        }
        if let Some(description) = self.description {
            m.description = description.trim().to_string();
        }
        if let Some(quarter) = self.quarter {
            m.quarter = quarter.trim().to_string();
        }
        if let Some(status) = self.status {
            m.status = status;
        }
        if self.due_date.is_some() {
            m.due_date = self.due_date;
        }
        Ok(())
    }
}

pub fn add_milestone(items: &[Milestone], draft: MilestoneDraft) -> Result<Vec<Milestone>> {
    Ok(list::add(items, draft.into_milestone()?))
}

pub fn edit_milestone(items: &[Milestone], id: &str, patch: MilestonePatch) -> Result<Vec<Milestone>> {
    list::try_update(items, id, |m| patch.apply(m))
}

pub fn set_status(items: &[Milestone], id: &str, status: MilestoneStatus) -> Result<Vec<Milestone>> {
    list::try_update(items, id, |m| {
        m.status = status;
        Ok(())
    })
}

/// Milestones grouped by quarter, quarters in first-seen order.
pub fn by_quarter(items: &[Milestone]) -> Vec<(String, Vec<&Milestone>)> {
    let mut groups: Vec<(String, Vec<&Milestone>)> = Vec::new();
    for m in items {
        match groups.iter_mut().find(|(q, _)| *q == m.quarter) {
            Some((_, group)) => group.push(m),
            None => groups.push((m.quarter.clone(), vec![m])),
        }
    }
    groups
}
