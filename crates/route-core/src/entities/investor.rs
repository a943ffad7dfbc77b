use crate::entity::{non_blank, required, string_enum, Entity, NumberInput};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Researching,
    Contacted,
    Meeting,
    DueDiligence,
    TermSheet,
    Committed,
    Passed,
}

string_enum!(Stage, "investor stage", [
    Researching => "Researching",
    Contacted => "Contacted",
    Meeting => "Meeting",
    DueDiligence => "DueDiligence",
    TermSheet => "TermSheet",
    Committed => "Committed",
    Passed => "Passed",
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub firm: String,
    pub stage: Stage,
    #[serde(default)]
    pub check_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Investor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, firm: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            firm: firm.into(),
            stage: Stage::Researching,
            check_size: 0.0,
            notes: None,
        }
    }
}

impl Entity for Investor {
    const KIND: &'static str = "investor";
    const SLOT: &'static str = paths::VENTURE_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut angel = Investor::new("investor-1", "Ruth Adler", "Angel");
        angel.stage = Stage::Contacted;
        angel.check_size = 25_000.0;
        let mut fund = Investor::new("investor-2", "Dev Mehta", "Seedcamp");
        fund.stage = Stage::Meeting;
        fund.check_size = 250_000.0;
        vec![angel, fund]
    }
}

impl Listing for Investor {
    type Facet = Stage;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.firm.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.name
    }

    fn facet(&self) -> Stage {
        self.stage
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorDraft {
    pub name: String,
    #[serde(default)]
    pub firm: String,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub check_size: NumberInput,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvestorDraft {
    pub fn into_investor(self) -> Result<Investor> {
        let mut inv = Investor::new(list::generate_id(), required("name", &self.name)?, self.firm.trim());
        inv.stage = self.stage.unwrap_or(Stage::Researching);
        inv.check_size = self.check_size.value();
        inv.notes = non_blank(self.notes.as_deref());
        Ok(inv)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorPatch {
    pub name: Option<String>,
    pub firm: Option<String>,
    pub stage: Option<Stage>,
    pub check_size: Option<NumberInput>,
    pub notes: Option<String>,
}

impl InvestorPatch {
    pub fn apply(self, inv: &mut Investor) -> Result<()> {
        if let Some(name) = self.name {
            inv.name = required("name", &name)?;
        }
        if let Some(firm) = self.firm {
            inv.firm = firm.trim().to_string();
        }
        if let Some(stage) = self.stage {
            inv.stage = stage;
        }
        if let Some(size) = self.check_size {
            inv.check_size = size.value();
        }
        if let Some(notes) = self.notes {
            inv.notes = non_blank(Some(&notes));
        }
        Ok(())
    }
}

pub fn add_investor(items: &[Investor], draft: InvestorDraft) -> Result<Vec<Investor>> {
    Ok(list::add(items, draft.into_investor()?))
}

pub fn edit_investor(items: &[Investor], id: &str, patch: InvestorPatch) -> Result<Vec<Investor>> {
    list::try_update(items, id, |i| patch.apply(i))
}

/// Count per stage, every stage listed in pipeline order.
pub fn pipeline(items: &[Investor]) -> Vec<(Stage, usize)> {
    Stage::all()
        .iter()
        .map(|&stage| (stage, items.iter().filter(|i| i.stage == stage).count()))
        .collect()
}

/// Sum of check sizes at `Committed`.
pub fn committed_total(items: &[Investor]) -> f64 {
    items
        .iter()
        .filter(|i| i.stage == Stage::Committed)
        .map(|i| i.check_size)
        .sum()
}
