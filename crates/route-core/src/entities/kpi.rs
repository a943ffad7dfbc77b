use crate::entity::{required, Entity, NumberInput};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub unit: String,
    /// Period-over-period change, in percent.
    #[serde(default)]
    pub change: f64,
}

impl Kpi {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: f64, target: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            target,
            unit: String::new(),
            change: 0.0,
        }
    }

    /// value / target as a percentage clamped to 0..=100; 0 when target is 0.
    pub fn progress(&self) -> f64 {
        if self.target == 0.0 {
            return 0.0;
        }
        (self.value / self.target * 100.0).clamp(0.0, 100.0)
    }
}

impl Entity for Kpi {
    const KIND: &'static str = "kpi";
    const SLOT: &'static str = paths::PERFORMANCE_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut mrr = Kpi::new("kpi-1", "MRR", 4_200.0, 10_000.0);
        mrr.unit = "$".into();
        mrr.change = 12.0;
        let mut users = Kpi::new("kpi-2", "Active users", 320.0, 1_000.0);
        users.change = 8.5;
        let mut churn = Kpi::new("kpi-3", "Churn", 3.1, 2.0);
        churn.unit = "%".into();
        churn.change = -0.4;
        vec![mrr, users, churn]
    }
}

impl Listing for Kpi {
    type Facet = ();

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.unit.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.name
    }

    fn facet(&self) {}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiDraft {
    pub name: String,
    #[serde(default)]
    pub value: NumberInput,
    #[serde(default)]
    pub target: NumberInput,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub change: NumberInput,
}

impl KpiDraft {
    pub fn into_kpi(self) -> Result<Kpi> {
        let mut kpi = Kpi::new(
            list::generate_id(),
            required("name", &self.name)?,
            self.value.value(),
            self.target.value(),
        );
        kpi.unit = self.unit.trim().to_string();
        kpi.change = self.change.value();
        Ok(kpi)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiPatch {
    pub name: Option<String>,
    pub value: Option<NumberInput>,
    pub target: Option<NumberInput>,
    pub unit: Option<String>,
    pub change: Option<NumberInput>,
}

impl KpiPatch {
    pub fn apply(self, kpi: &mut Kpi) -> Result<()> {
        if let Some(name) = self.name {
            kpi.name = required("name", &name)?;
        }
        if let Some(v) = self.value {
            kpi.value = v.value();
        }
        if let Some(t) = self.target {
            kpi.target = t.value();
        }
        if let Some(unit) = self.unit {
            kpi.unit = unit.trim().to_string();
        }
        if let Some(c) = self.change {
            kpi.change = c.value();
        }
        Ok(())
    }
}

pub fn add_kpi(items: &[Kpi], draft: KpiDraft) -> Result<Vec<Kpi>> {
    Ok(list::add(items, draft.into_kpi()?))
}

pub fn edit_kpi(items: &[Kpi], id: &str, patch: KpiPatch) -> Result<Vec<Kpi>> {
    list::try_update(items, id, |k| patch.apply(k))
}
