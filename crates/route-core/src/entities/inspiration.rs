use crate::entity::{required, Entity};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspiration {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
}

impl Inspiration {
    pub fn new(id: &str, title: &str, source: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            source: source.to_string(),
            category: category.to_string(),
        }
    }
}

impl Entity for Inspiration {
    const KIND: &'static str = "inspiration";
    const SLOT: &'static str = paths::INSPIRATIONS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        vec![
            Inspiration::new("inspiration-1", "Make something people want", "Paul Graham", "Product"),
            Inspiration::new("inspiration-2", "The Mom Test", "Rob Fitzpatrick", "Research"),
        ]
    }
}

impl Listing for Inspiration {
    type Facet = ();

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.source.as_str(), self.category.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn facet(&self) {}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationDraft {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
}

impl InspirationDraft {
    pub fn into_inspiration(self) -> Result<Inspiration> {
        Ok(Inspiration {
            id: list::generate_id(),
            title: required("title", &self.title)?,
            source: self.source.trim().to_string(),
            category: self.category.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspirationPatch {
    pub title: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
}

impl InspirationPatch {
    pub fn apply(self, i: &mut Inspiration) -> Result<()> {
        if let Some(title) = self.title {
            i.title = required("title", &title)?;
        }
        if let Some(source) = self.source {
            i.source = source.trim().to_string();
        }
        if let Some(category) = self.category {
            i.category = category.trim().to_string();
        }
        Ok(())
    }
}

pub fn add_inspiration(items: &[Inspiration], draft: InspirationDraft) -> Result<Vec<Inspiration>> {
    Ok(list::add(items, draft.into_inspiration()?))
}

pub fn edit_inspiration(items: &[Inspiration], id: &str, patch: InspirationPatch) -> Result<Vec<Inspiration>> {
    list::try_update(items, id, |i| patch.apply(i))
}
