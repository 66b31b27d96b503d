//! Who a share grants access to, and the permission body sent for it.

use serde::Serialize;

use crate::config::Config;

/// Audience of a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Writer access for a single named user.
    Restricted { email: String },
    /// Reader access for anyone holding the link.
    Open,
}

impl Audience {
    /// Map the `--anyone` flag to an audience; the restricted recipient comes from config.
    pub fn from_flag(anyone: bool, config: &Config) -> Self {
        if anyone {
            Audience::Open
        } else {
            Audience::Restricted {
                email: config.email.clone(),
            }
        }
    }

    /// The permissions.create request body for this audience.
    pub fn permission(&self) -> Permission {
        match self {
            Audience::Restricted { email } => Permission {
                kind: PermissionType::User,
                role: Role::Writer,
                email_address: Some(email.clone()),
            },
            Audience::Open => Permission {
                kind: PermissionType::Anyone,
                role: Role::Reader,
                email_address: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    User,
    Anyone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Writer,
    Reader,
}

/// Request body for the permissions.create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}
