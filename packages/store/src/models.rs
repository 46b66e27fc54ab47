//! # Domain models for users and their role profiles
//!
//! Defines the user record the backend returns from its auth endpoints and that
//! the client keeps in its local profile cache. The types are
//! `Serialize + Deserialize` so the same value can be decoded from an HTTP
//! response and written back to storage unchanged.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | Identity record: numeric `id`, display `name`, `mobile` (the login identifier), optional `email`, and the role-tagged [`RoleProfile`]. |
//! | [`RoleProfile`] | Tagged union keyed by the wire field `role`. Each variant carries only the optional attributes meaningful for that role. |
//! | [`Role`] | The bare role tag, used by route guards and forms. |
//!
//! ## Wire format
//!
//! The backend sends a flat object:
//!
//! ```json
//! { "id": 1, "name": "A", "mobile": "9999999999", "role": "doctor", "specialty": "cardiology" }
//! ```
//!
//! `role` selects the [`RoleProfile`] variant and the remaining fields fill it.
//! Fields that do not belong to the selected role are ignored, and an
//! unrecognised role tag decodes to [`RoleProfile::Other`], which keeps the tag
//! so a new server-side role never breaks session restore and survives a
//! round trip through the cache.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A user as known to the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Mobile number, the primary credential identifier.
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Get display name, falling back to the mobile number if name is blank.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            &self.mobile
        } else {
            name
        }
    }

    /// "City, State" from whichever of the two the profile carries.
    pub fn location(&self) -> Option<String> {
        let (city, state) = self.profile.place();
        match (city, state) {
            (Some(c), Some(s)) => Some(format!("{c}, {s}")),
            (Some(c), None) => Some(c.to_string()),
            (None, Some(s)) => Some(s.to_string()),
            (None, None) => None,
        }
    }
}

/// Role-specific profile attributes, tagged by `role` on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum RoleProfile {
    Patient(PatientProfile),
    Doctor(DoctorProfile),
    Pharma(PharmaProfile),
    HospitalAdmin(HospitalAdminProfile),
    /// A role this client does not know, with its wire tag.
    Other(String),
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
enum KnownRef<'a> {
    Patient(&'a PatientProfile),
    Doctor(&'a DoctorProfile),
    Pharma(&'a PharmaProfile),
    HospitalAdmin(&'a HospitalAdminProfile),
}

#[derive(Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
enum Known {
    Patient(PatientProfile),
    Doctor(DoctorProfile),
    Pharma(PharmaProfile),
    HospitalAdmin(HospitalAdminProfile),
}

#[derive(Serialize, Deserialize)]
struct Tag {
    role: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Known(Known),
    Unknown(Tag),
}

impl Serialize for RoleProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RoleProfile::Patient(p) => KnownRef::Patient(p).serialize(serializer),
            RoleProfile::Doctor(p) => KnownRef::Doctor(p).serialize(serializer),
            RoleProfile::Pharma(p) => KnownRef::Pharma(p).serialize(serializer),
            RoleProfile::HospitalAdmin(p) => KnownRef::HospitalAdmin(p).serialize(serializer),
            RoleProfile::Other(tag) => Tag { role: tag.clone() }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RoleProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Known(Known::Patient(p)) => Ok(RoleProfile::Patient(p)),
            Wire::Known(Known::Doctor(p)) => Ok(RoleProfile::Doctor(p)),
            Wire::Known(Known::Pharma(p)) => Ok(RoleProfile::Pharma(p)),
            Wire::Known(Known::HospitalAdmin(p)) => Ok(RoleProfile::HospitalAdmin(p)),
            // A known tag only lands here when its fields failed to decode.
            Wire::Unknown(Tag { role }) if Role::from_tag(&role) != Role::Other => Err(
                serde::de::Error::custom(format!("invalid {role} profile")),
            ),
            Wire::Unknown(Tag { role }) => Ok(RoleProfile::Other(role)),
        }
    }
}

impl RoleProfile {
    /// An empty profile for `role`.
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Patient => RoleProfile::Patient(PatientProfile::default()),
            Role::Doctor => RoleProfile::Doctor(DoctorProfile::default()),
            Role::Pharma => RoleProfile::Pharma(PharmaProfile::default()),
            Role::HospitalAdmin => RoleProfile::HospitalAdmin(HospitalAdminProfile::default()),
            Role::Other => RoleProfile::Other(Role::Other.as_str().to_string()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Patient(_) => Role::Patient,
            RoleProfile::Doctor(_) => Role::Doctor,
            RoleProfile::Pharma(_) => Role::Pharma,
            RoleProfile::HospitalAdmin(_) => Role::HospitalAdmin,
            RoleProfile::Other(_) => Role::Other,
        }
    }

    fn place(&self) -> (Option<&str>, Option<&str>) {
        match self {
            RoleProfile::Patient(p) => (p.city.as_deref(), p.state.as_deref()),
            RoleProfile::Doctor(p) => (p.city.as_deref(), p.state.as_deref()),
            RoleProfile::Pharma(p) => (p.city.as_deref(), p.state.as_deref()),
            RoleProfile::HospitalAdmin(p) => (p.city.as_deref(), p.state.as_deref()),
            RoleProfile::Other(_) => (None, None),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    /// Hospital the doctor practises at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PharmaProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalAdminProfile {
    /// Hospital this account administers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// The bare role tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Patient,
    Doctor,
    Pharma,
    HospitalAdmin,
    Other,
}

impl Role {
    /// Roles a user can pick when registering.
    pub const SELECTABLE: [Role; 4] = [Role::Patient, Role::Doctor, Role::Pharma, Role::HospitalAdmin];

    /// Wire tag: "patient", "doctor", "pharma", "hospital_admin".
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Pharma => "pharma",
            Role::HospitalAdmin => "hospital_admin",
            Role::Other => "other",
        }
    }

    /// Map a wire tag back to a role. Unknown tags become [`Role::Other`].
    pub fn from_tag(tag: &str) -> Role {
        match tag {
            "patient" => Role::Patient,
            "doctor" => Role::Doctor,
            "pharma" => Role::Pharma,
            "hospital_admin" => Role::HospitalAdmin,
            _ => Role::Other,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Pharma => "Pharma Professional",
            Role::HospitalAdmin => "Hospital Admin",
            Role::Other => "Member",
        }
    }
}
