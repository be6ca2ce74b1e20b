use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::session::AuthError;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    HospitalAdmin,
    Doctor,
    Staff,
    Patient,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::HospitalAdmin,
        Role::Doctor,
        Role::Staff,
        Role::Patient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HospitalAdmin => "hospital_admin",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
            Role::Patient => "patient",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "System Administrator",
            Role::HospitalAdmin => "Hospital Authority",
            Role::Doctor => "Doctor",
            Role::Staff => "Staff",
            Role::Patient => "Patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AuthError::UnknownRole(value.to_string()))
    }
}

/// Roles permitted on one protected path. An empty list admits any
/// authenticated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessRule {
    pub path: String,
    pub allowed: Vec<Role>,
}

/// Static role → home path mapping plus per-path allow-lists, assembled once
/// by the router and shared through context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    homes: Vec<(Role, String)>,
    rules: Vec<RouteAccessRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_home(mut self, role: Role, path: impl Into<String>) -> Self {
        let path = path.into();
        match self.homes.iter_mut().find(|(r, _)| *r == role) {
            Some(entry) => entry.1 = path,
            None => self.homes.push((role, path)),
        }
        self
    }

    pub fn with_rule(
        mut self,
        path: impl Into<String>,
        allowed: impl IntoIterator<Item = Role>,
    ) -> Self {
        let rule = RouteAccessRule {
            path: path.into(),
            allowed: allowed.into_iter().collect(),
        };
        self.rules.retain(|existing| existing.path != rule.path);
        self.rules.push(rule);
        self
    }

    /// One dashboard per role, each reachable only by that role.
    pub fn standard() -> Self {
        [
            (Role::Admin, "/admin"),
            (Role::HospitalAdmin, "/hospital"),
            (Role::Doctor, "/doctor"),
            (Role::Staff, "/staff"),
            (Role::Patient, "/patient"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (role, path)| {
            table.with_home(role, path).with_rule(path, [role])
        })
    }

    pub fn home_for(&self, role: Role) -> Option<&str> {
        self.homes
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, path)| path.as_str())
    }

    /// Home path for a raw role string; unknown roles have none.
    pub fn home_for_role_name(&self, role: &str) -> Option<&str> {
        role.parse::<Role>().ok().and_then(|role| self.home_for(role))
    }

    fn rule_for(&self, path: &str) -> Option<&RouteAccessRule> {
        self.rules.iter().find(|rule| rule.path == path)
    }

    pub fn allowed_roles(&self, path: &str) -> &[Role] {
        self.rule_for(path)
            .map(|rule| rule.allowed.as_slice())
            .unwrap_or(&[])
    }

    pub fn protected_paths(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.path.as_str())
    }
}

pub fn provide_route_table(table: RouteTable) {
    leptos::provide_context(table);
}

pub fn use_route_table() -> RouteTable {
    leptos::use_context::<RouteTable>().unwrap_or_else(RouteTable::standard)
}
