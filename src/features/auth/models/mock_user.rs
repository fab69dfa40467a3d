use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Contributor,
}

/// Built-in demo account
#[derive(Debug, Clone, Copy)]
pub struct MockUser {
    pub username: &'static str,
    pub password: &'static str,
    pub role: UserRole,
}

pub const MOCK_USERS: &[MockUser] = &[
    MockUser {
        username: "netrunnerX",
        password: "password123",
        role: UserRole::Admin,
    },
    MockUser {
        username: "reliefAdmin",
        password: "relief123",
        role: UserRole::Admin,
    },
    MockUser {
        username: "citizen1",
        password: "citizen123",
        role: UserRole::Contributor,
    },
];

pub fn find_mock_user(username: &str) -> Option<&'static MockUser> {
    MOCK_USERS.iter().find(|u| u.username == username)
}
