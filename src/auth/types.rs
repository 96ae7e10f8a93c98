use serde::{Deserialize, Serialize};

/// Admin tiers, ordered so that `role >= required` admits higher tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "viewer" => Ok(Role::Viewer),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct ViewerRole;

impl RequiredRole for ViewerRole {
    fn required() -> Role {
        Role::Viewer
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

pub struct SuperAdminRole;

impl RequiredRole for SuperAdminRole {
    fn required() -> Role {
        Role::SuperAdmin
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // admin id
    pub sid: String, // session id
    pub role: Role,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

#[cfg(test)]
mod tests {
    use super::{AdminRole, RequiredRole, Role, SuperAdminRole, ViewerRole};

    #[test]
    fn role_string_roundtrip() {
        for role in [Role::Viewer, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::try_from(role.as_str()), Ok(role));
        }
        assert!(Role::try_from("owner").is_err());
    }

    #[test]
    fn higher_tiers_satisfy_lower_requirements() {
        assert!(Role::SuperAdmin.satisfies(AdminRole::required()));
        assert!(Role::Admin.satisfies(ViewerRole::required()));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Viewer.satisfies(AdminRole::required()));
        assert!(!Role::Admin.satisfies(SuperAdminRole::required()));
    }

    #[test]
    fn roles_serialize_as_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).expect("role should serialize");
        assert_eq!(json, "\"super_admin\"");
    }
}
