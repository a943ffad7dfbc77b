//! The founder's display name, stored as a bare string slot.

use crate::entity::required;
use crate::error::Result;
use crate::paths;
use crate::store::Store;

pub const DEFAULT_USER_NAME: &str = "Founder";

/// Stored name, or [`DEFAULT_USER_NAME`] when unset.
pub fn user_name(store: &Store) -> Result<String> {
    Ok(store
        .load_value::<String>(paths::USER_NAME_SLOT)?
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()))
}

pub fn set_user_name(store: &Store, name: &str) -> Result<String> {
    let name = required("name", name)?;
    store.save_value(paths::USER_NAME_SLOT, &name)?;
    Ok(name)
}
