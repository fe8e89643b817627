use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from the guest lookup endpoint (GET /event/admin/get-guest).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuestLookupResponse {
    /// `null` and a missing key are treated alike
    #[serde(default)]
    pub guest: Option<GuestRecord>,
}

impl GuestLookupResponse {
    pub fn into_guest(self) -> GuestRecord {
        self.guest.unwrap_or_default()
    }
}

/// Guest fields surfaced for display. Everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuestRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Present (non-null) once the guest has been checked in. Kept untyped;
    /// only its presence matters.
    #[serde(default)]
    pub last_checked_in_at: Option<Value>,
}

impl GuestRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unknown")
    }

    pub fn is_checked_in(&self) -> bool {
        matches!(&self.last_checked_in_at, Some(v) if !v.is_null())
    }

    /// Check-in time for display: strings as-is, anything else as JSON.
    pub fn checked_in_at(&self) -> Option<String> {
        match &self.last_checked_in_at {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}
