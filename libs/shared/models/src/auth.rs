use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub org_id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Staff and patient roles as stored in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "admin")]
    GlobalAdmin,
    OrgAdmin,
    Doctor,
    #[serde(alias = "registrar")]
    Registration,
    #[serde(alias = "cashier")]
    Finance,
    Storekeeper,
    GeneralUser,
}

/// What a request is trying to do. Handlers ask for a capability, never a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewBookings,
    CreateBooking,
    Diagnose,
    ViewRecords,
    ViewOrders,
    SettlePayment,
    ViewInventory,
    ManageInventory,
    ViewStats,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GlobalAdmin => "global_admin",
            Role::OrgAdmin => "org_admin",
            Role::Doctor => "doctor",
            Role::Registration => "registration",
            Role::Finance => "finance",
            Role::Storekeeper => "storekeeper",
            Role::GeneralUser => "general_user",
        }
    }

    /// The single access policy for the dashboard.
    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::Doctor => matches!(capability, Diagnose | ViewRecords | ViewInventory),
            Role::Registration => matches!(capability, ViewBookings | CreateBooking | ViewRecords),
            Role::Finance => matches!(capability, ViewRecords | ViewOrders | SettlePayment | ViewStats),
            Role::Storekeeper => matches!(capability, ViewInventory | ManageInventory),
            Role::GeneralUser => matches!(capability, ViewBookings | CreateBooking | ViewOrders),
            Role::GlobalAdmin | Role::OrgAdmin => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global_admin" | "admin" => Ok(Role::GlobalAdmin),
            "org_admin" => Ok(Role::OrgAdmin),
            "doctor" => Ok(Role::Doctor),
            "registration" | "registrar" => Ok(Role::Registration),
            "finance" | "cashier" => Ok(Role::Finance),
            "storekeeper" => Ok(Role::Storekeeper),
            "general_user" => Ok(Role::GeneralUser),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Identity attached to a request once its bearer token checks out.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
    pub org_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_role_names_parse() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::GlobalAdmin));
        assert_eq!("registrar".parse::<Role>(), Ok(Role::Registration));
        assert_eq!("cashier".parse::<Role>(), Ok(Role::Finance));
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_round_trips_through_as_str() {
        for role in [
            Role::GlobalAdmin,
            Role::OrgAdmin,
            Role::Doctor,
            Role::Registration,
            Role::Finance,
            Role::Storekeeper,
            Role::GeneralUser,
        ] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_policy() {
        assert!(Role::Doctor.can(Capability::Diagnose));
        assert!(!Role::Doctor.can(Capability::SettlePayment));
        assert!(!Role::Doctor.can(Capability::ManageInventory));
        assert!(Role::Finance.can(Capability::SettlePayment));
        assert!(!Role::Finance.can(Capability::Diagnose));
        assert!(Role::Storekeeper.can(Capability::ManageInventory));
        assert!(!Role::GeneralUser.can(Capability::SettlePayment));
        assert!(Role::GeneralUser.can(Capability::ViewOrders));
        assert!(Role::OrgAdmin.can(Capability::ViewStats));
    }
}
