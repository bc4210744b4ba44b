use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three fixed user categories of the storefront.
///
/// The backend identifies roles by a numeric code; the client persists that
/// code as its decimal string and maps it back through [`Role::from_stored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    Customer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Seller, Role::Customer];

    /// Numeric code used by the backend (`0`, `1`, `2`).
    pub fn code(self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Seller => 1,
            Role::Customer => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Role::Admin),
            1 => Some(Role::Seller),
            2 => Some(Role::Customer),
            _ => None,
        }
    }

    /// Decode a persisted role indicator.
    ///
    /// Only the exact strings `"0"`, `"1"` and `"2"` are recognised; anything
    /// else (including `" 1"` or `"01"`) means "no role".
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Role::Admin),
            "1" => Some(Role::Seller),
            "2" => Some(Role::Customer),
            _ => None,
        }
    }

    pub fn to_stored(self) -> String {
        self.code().to_string()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Customer => "customer",
        }
    }

    /// Landing route of the role's own dashboard.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Admin => crate::routes::ADMIN_DASHBOARD_PATH,
            Role::Seller => crate::routes::SELLER_DASHBOARD_PATH,
            Role::Customer => crate::routes::CUSTOMER_DASHBOARD_PATH,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
