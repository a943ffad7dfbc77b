use crate::entity::{non_blank, required, string_enum, Entity};
use crate::error::{Result, RouteError};
use crate::list;
use crate::paths;
use crate::query::Listing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Note,
    Link,
    Document,
}

string_enum!(ResourceType, "resource type", [
    Note => "Note",
    Link => "Link",
    Document => "Document",
]);

/// Body of a resource; the `type` tag picks which field is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResourceBody {
    Note { content: String },
    Link { url: String },
    Document { content: String },
}

impl ResourceBody {
    pub fn kind(&self) -> ResourceType {
        match self {
            ResourceBody::Note { .. } => ResourceType::Note,
            ResourceBody::Link { .. } => ResourceType::Link,
            ResourceBody::Document { .. } => ResourceType::Document,
        }
    }

    /// Note/Document text or Link url.
    pub fn text(&self) -> &str {
        match self {
            ResourceBody::Note { content } | ResourceBody::Document { content } => content,
            ResourceBody::Link { url } => url,
        }
    }

    fn build(kind: ResourceType, content: Option<&str>, url: Option<&str>) -> Result<Self> {
        Ok(match kind {
            ResourceType::Note => ResourceBody::Note {
                content: content.unwrap_or_default().trim().to_string(),
            },
            ResourceType::Document => ResourceBody::Document {
                content: content.unwrap_or_default().trim().to_string(),
            },
            ResourceType::Link => ResourceBody::Link {
                url: non_blank(url).ok_or_else(|| RouteError::validation("a link needs a url"))?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub body: ResourceBody,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Epoch millis.
    #[serde(default)]
    pub created_at: i64,
}

impl Resource {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: ResourceBody) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body,
            tags: Vec::new(),
            project: None,
            is_pinned: false,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn kind(&self) -> ResourceType {
        self.body.kind()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }

    pub fn in_project(&self, project: &str) -> bool {
        self.project
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(project.trim()))
    }
}

impl Entity for Resource {
    const KIND: &'static str = "resource";
    const SLOT: &'static str = paths::RESOURCES_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut deck = Resource::new(
            "resource-1",
            "Pitch deck outline",
            ResourceBody::Document {
                content: "Problem, solution, market, traction, team, ask.".into(),
            },
        );
        deck.tags = vec!["fundraising".into()];
        deck.is_pinned = true;

        let mut essay = Resource::new(
            "resource-2",
            "Do things that don't scale",
            ResourceBody::Link {
                url: "https://paulgraham.com/ds.html".into(),
            },
        );
        essay.tags = vec!["reading".into(), "growth".into()];

        let mut note = Resource::new(
            "resource-3",
            "Customer interview notes",
            ResourceBody::Note {
                content: "Onboarding takes too long. Pricing page is confusing.".into(),
            },
        );
        note.tags = vec!["research".into()];
        vec![deck, essay, note]
    }
}

impl Listing for Resource {
    type Facet = ResourceType;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.body.text()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn touched_at(&self) -> i64 {
        self.created_at
    }

    fn facet(&self) -> ResourceType {
        self.kind()
    }
}

// ---------------------------------------------------------------------------
// Form payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub project: Option<String>,
}

impl ResourceDraft {
    pub fn into_resource(self) -> Result<Resource> {
        let title = required("title", &self.title)?;
        let body = ResourceBody::build(self.kind, self.content.as_deref(), self.url.as_deref())?;
        let mut resource = Resource::new(list::generate_id(), title, body);
        resource.tags = clean_tags(&self.tags);
        resource.project = non_blank(self.project.as_deref());
        Ok(resource)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceType>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub project: Option<String>,
}

impl ResourcePatch {
    pub fn apply(self, resource: &mut Resource) -> Result<()> {
        if let Some(title) = self.title {
            resource.title = required("title", &title)?;
        }
        if self.kind.is_some() || self.content.is_some() || self.url.is_some() {
            let kind = self.kind.unwrap_or(resource.kind());
            let current = resource.body.text().to_string();
            let content = self.content.or_else(|| match resource.body {
                ResourceBody::Link { .. } => None,
                _ => Some(current.clone()),
            });
            let url = self.url.or_else(|| match resource.body {
                ResourceBody::Link { .. } => Some(current),
                _ => None,
            });
            resource.body = ResourceBody::build(kind, content.as_deref(), url.as_deref())?;
        }
        if let Some(tags) = self.tags {
            resource.tags = clean_tags(&tags);
        }
        if let Some(project) = self.project {
            resource.project = non_blank(Some(&project));
        }
        Ok(())
    }
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags.iter().filter_map(|t| non_blank(Some(t))) {
        if !out.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            out.push(tag);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

pub fn add_resource(resources: &[Resource], draft: ResourceDraft) -> Result<Vec<Resource>> {
    Ok(list::add(resources, draft.into_resource()?))
}

pub fn edit_resource(resources: &[Resource], id: &str, patch: ResourcePatch) -> Result<Vec<Resource>> {
    list::try_update(resources, id, |r| patch.apply(r))
}

pub fn toggle_pin(resources: &[Resource], id: &str) -> Result<Vec<Resource>> {
    list::try_update(resources, id, |r| {
        r.is_pinned = !r.is_pinned;
        Ok(())
    })
}

/// Narrow a derived view by tag and project name. `None` skips that check.
pub fn narrow(resources: Vec<Resource>, tag: Option<&str>, project: Option<&str>) -> Vec<Resource> {
    resources
        .into_iter()
        .filter(|r| tag.map_or(true, |t| r.has_tag(t)))
        .filter(|r| project.map_or(true, |p| r.in_project(p)))
        .collect()
}

/// Stable partition: pinned resources first, each group in its input order.
pub fn pinned_first(resources: Vec<Resource>) -> Vec<Resource> {
    let (mut pinned, rest): (Vec<_>, Vec<_>) = resources.into_iter().partition(|r| r.is_pinned);
    pinned.extend(rest);
    pinned
}

/// Every distinct tag in first-seen order.
pub fn all_tags(resources: &[Resource]) -> Vec<String> {
    let all: Vec<String> = resources.iter().flat_map(|r| r.tags.iter().cloned()).collect();
    clean_tags(&all)
}
