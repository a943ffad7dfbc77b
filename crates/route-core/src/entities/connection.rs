use crate::entity::{optional_email, required, string_enum, Entity};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionCategory {
    Mentor,
    Peer,
    Investor,
    Advisor,
    Other,
}

string_enum!(ConnectionCategory, "connection category", [
    Mentor => "Mentor",
    Peer => "Peer",
    Investor => "Investor",
    Advisor => "Advisor",
    Other => "Other",
]);

/// A person in the founder's network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    pub category: ConnectionCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
}

impl Connection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: ConnectionCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
            company: String::new(),
            category,
            email: None,
            last_contact: None,
        }
    }
}

impl Entity for Connection {
    const KIND: &'static str = "connection";
    const SLOT: &'static str = paths::NETWORK_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut mentor = Connection::new("connection-1", "Elena Park", ConnectionCategory::Mentor);
        mentor.role = "Former CTO".into();
        mentor.company = "Stripe".into();
        let mut peer = Connection::new("connection-2", "Tom Okafor", ConnectionCategory::Peer);
        peer.role = "Founder".into();
        peer.company = "Ledgerly".into();
        vec![mentor, peer]
    }
}

impl Listing for Connection {
    type Facet = ConnectionCategory;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.role.as_str(), self.company.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.name
    }

    fn touched_at(&self) -> i64 {
        self.last_contact.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    fn facet(&self) -> ConnectionCategory {
        self.category
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDraft {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub category: Option<ConnectionCategory>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ConnectionDraft {
    pub fn into_connection(self) -> Result<Connection> {
        let mut c = Connection::new(
            list::generate_id(),
            required("name", &self.name)?,
            self.category.unwrap_or(ConnectionCategory::Other),
        );
        c.role = self.role.trim().to_string();
        c.company = self.company.trim().to_string();
        c.email = optional_email(self.email.as_deref())?;
        c.last_contact = Some(Utc::now());
        Ok(c)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub category: Option<ConnectionCategory>,
    pub email: Option<String>,
}

impl ConnectionPatch {
    pub fn apply(self, c: &mut Connection) -> Result<()> {
        if let Some(name) = self.name {
            c.name = required("name", &name)?;
        }
        if let Some(role) = self.role {
            c.role = role.trim().to_string();
        }
        if let Some(company) = self.company {
            c.company = company.trim().to_string();
        }
        if let Some(category) = self.category {
            c.category = category;
        }
        if let Some(email) = self.email {
            c.email = optional_email(Some(&email))?;
        }
        Ok(())
    }
}

pub fn add_connection(items: &[Connection], draft: ConnectionDraft) -> Result<Vec<Connection>> {
    Ok(list::add(items, draft.into_connection()?))
}

pub fn edit_connection(items: &[Connection], id: &str, patch: ConnectionPatch) -> Result<Vec<Connection>> {
    list::try_update(items, id, |c| patch.apply(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_optional_but_checked() {
        let ok = ConnectionDraft {
            name: "Kai".into(),
            ..Default::default()
        }
        .into_connection()
        .unwrap();
        assert_eq!(ok.email, None);
        assert_eq!(ok.category, ConnectionCategory::Other);

        let bad = ConnectionDraft {
            name: "Kai".into(),
            email: Some("kai-at-home".into()),
            ..Default::default()
        };
        assert!(bad.into_connection().is_err());
    }

    #[test]
    fn patch_clears_role() {
        let items = Connection::defaults();
        let patch = ConnectionPatch {
            role: Some("  ".into()),
            category: Some(ConnectionCategory::Advisor),
            ..Default::default()
        };
        let next = edit_connection(&items, "connection-1", patch).unwrap();
        assert_eq!(next[0].role, "");
        assert_eq!(next[0].category, ConnectionCategory::Advisor);
    }
}
