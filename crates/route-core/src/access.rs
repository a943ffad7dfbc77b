//! Invite and founder codes.
//!
//! This is a static allow-list, not a security boundary: codes ship in
//! config and are compared after trimming, ignoring case.

use crate::config::AccessConfig;
use crate::error::{Result, RouteError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessGrant {
    Registration,
    Founder,
    Denied,
}

impl AccessGrant {
    pub fn is_granted(self) -> bool {
        !matches!(self, AccessGrant::Denied)
    }
}

fn listed(codes: &[String], code: &str) -> bool {
    codes.iter().any(|c| c.trim().eq_ignore_ascii_case(code))
}

/// Founder codes win over invite codes when a code is in both lists.
pub fn check(cfg: &AccessConfig, code: &str) -> Result<AccessGrant> {
    let code = code.trim();
    if code.is_empty() {
        return Err(RouteError::validation("enter an access code"));
    }
    let grant = if listed(&cfg.founder_codes, code) {
        AccessGrant::Founder
    } else if listed(&cfg.invite_codes, code) {
        AccessGrant::Registration
    } else {
        AccessGrant::Denied
    };
    tracing::debug!(grant = ?grant, "checked access code");
    Ok(grant)
}
