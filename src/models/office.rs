//! Office model: the two top-level units the dispatcher serves.

use serde::{Deserialize, Serialize};
use sqlx::Type;

/// One of the two front offices this service dispatches for.
///
/// Each office has independent enablement, services, windows, and a
/// daily numbering sequence (see `office_sequences`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "office", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Office {
    Registrar,
    Admissions,
}

impl Office {
    pub fn as_str(&self) -> &'static str {
        match self {
            Office::Registrar => "registrar",
            Office::Admissions => "admissions",
        }
    }

    /// Static physical-location data for `GET /location/{office}` (spec
    /// §6.1). Out of scope as a configurable entity (no campus-map module
    /// accompanies this spec); fixed per office like the well-known
    /// service name constants.
    pub fn location(&self) -> OfficeLocation {
        match self {
            Office::Registrar => OfficeLocation {
                office: *self,
                building: "Main Building".to_string(),
                floor: "Ground Floor".to_string(),
                description: "Registrar's Office, beside the main lobby".to_string(),
            },
            Office::Admissions => OfficeLocation {
                office: *self,
                building: "Main Building".to_string(),
                floor: "2nd Floor".to_string(),
                description: "Admissions Office, above the main lobby".to_string(),
            },
        }
    }
}

/// Physical-location projection for an office (§6.1 `GET /location/{office}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeLocation {
    pub office: Office,
    pub building: String,
    pub floor: String,
    pub description: String,
}

impl std::fmt::Display for Office {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Office {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registrar" => Ok(Office::Registrar),
            "admissions" => Ok(Office::Admissions),
            _ => Err(()),
        }
    }
}
