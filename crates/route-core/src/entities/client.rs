use crate::entity::{non_blank, optional_email, required, string_enum, Entity};
use crate::error::{Result, RouteError};
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ClientStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Lead,
    Active,
    Churned,
    Partner,
}

string_enum!(ClientStatus, "client status", [
    Lead => "Lead",
    Active => "Active",
    Churned => "Churned",
    Partner => "Partner",
]);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    pub status: ClientStatus,
    #[serde(default)]
    pub last_contact: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        company: impl Into<String>,
        email: impl Into<String>,
        status: ClientStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: company.into(),
            email: email.into(),
            status,
            last_contact: None,
            notes: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_contact = Some(Utc::now());
    }
}

impl Entity for Client {
    const KIND: &'static str = "client";
    const SLOT: &'static str = paths::CLIENTS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        vec![
            Client::new("client-1", "Sarah Chen", "Northwind Labs", "sarah@northwind.io", ClientStatus::Active),
            Client::new("client-2", "Marcus Webb", "Brightline", "marcus@brightline.co", ClientStatus::Lead),
            Client::new("client-3", "Priya Natarajan", "Fold Studio", "priya@fold.studio", ClientStatus::Partner),
        ]
    }
}

impl Listing for Client {
    type Facet = ClientStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.company.as_str(), self.email.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.name
    }

    fn touched_at(&self) -> i64 {
        self.last_contact.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    fn facet(&self) -> ClientStatus {
        self.status
    }
}

// ---------------------------------------------------------------------------
// Form payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClientDraft {
    pub fn into_client(self) -> Result<Client> {
        let name = required("name", &self.name)?;
        let email = optional_email(Some(&self.email))?
            .ok_or_else(|| RouteError::validation("email is required"))?;
        let mut client = Client::new(
            list::generate_id(),
            name,
            self.company.trim(),
            email,
            self.status.unwrap_or(ClientStatus::Lead),
        );
        client.notes = non_blank(self.notes.as_deref());
        client.touch();
        Ok(client)
    }
}

/// Partial edit; `None` fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub status: Option<ClientStatus>,
    pub notes: Option<String>,
}

impl ClientPatch {
    pub fn apply(self, client: &mut Client) -> Result<()> {
        if let Some(name) = self.name {
            client.name = required("name", &name)?;
        }
        if let Some(company) = self.company {
            client.company = company.trim().to_string();
        }
        if let Some(email) = self.email {
            client.email = optional_email(Some(&email))?
                .ok_or_else(|| RouteError::validation("email is required"))?;
        }
        if let Some(status) = self.status {
            client.status = status;
        }
        if let Some(notes) = self.notes {
            client.notes = non_blank(Some(&notes));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

pub fn add_client(clients: &[Client], draft: ClientDraft) -> Result<Vec<Client>> {
    Ok(list::add(clients, draft.into_client()?))
}

pub fn edit_client(clients: &[Client], id: &str, patch: ClientPatch) -> Result<Vec<Client>> {
    list::try_update(clients, id, |c| patch.apply(c))
}

pub fn set_status(clients: &[Client], id: &str, status: ClientStatus) -> Result<Vec<Client>> {
    list::try_update(clients, id, |c| {
        c.status = status;
        Ok(())
    })
}

pub fn touch_client(clients: &[Client], id: &str) -> Result<Vec<Client>> {
    list::try_update(clients, id, |c| {
        c.touch();
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
