//! Role catalog: the fixed set of competition roles and their cardinality rules.

use serde::{Deserialize, Serialize};

/// A competition role tag.
///
/// Driver, electronics, and programmer are unique (one holder per team); the
/// mechanics/designer role may be held by up to two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Driver,
    Electronics,
    Programmer,
    MechanicsDesigner,
}

/// All catalog roles in display order.
pub const CATALOG: [Role; 4] = [
    Role::Driver,
    Role::Electronics,
    Role::Programmer,
    Role::MechanicsDesigner,
];

/// Roles capped at one holder per team, in catalog order.
pub const UNIQUE_ROLES: [Role; 3] = [Role::Driver, Role::Electronics, Role::Programmer];

/// The one role that may be held by more than one member.
pub const REPEATABLE_ROLE: Role = Role::MechanicsDesigner;

/// Maximum holders of the repeatable role per team.
pub const MAX_REPEATABLE: usize = 2;

/// Member count at which a team can cover all four roles.
pub const MIN_TEAM_SIZE: usize = 4;

/// Hard cap on team size.
pub const MAX_TEAM_SIZE: usize = 5;

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Electronics => "electronics",
            Role::Programmer => "programmer",
            Role::MechanicsDesigner => "mechanics_designer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "driver" => Some(Role::Driver),
            "electronics" => Some(Role::Electronics),
            "programmer" => Some(Role::Programmer),
            "mechanics_designer" => Some(Role::MechanicsDesigner),
            _ => None,
        }
    }

    /// True for roles capped at one holder per team.
    pub fn is_unique(&self) -> bool {
        !matches!(self, Role::MechanicsDesigner)
    }

    /// How many members may hold this role on one team.
    pub fn max_per_team(&self) -> usize {
        if self.is_unique() {
            1
        } else {
            MAX_REPEATABLE
        }
    }

    /// Display label and description for the given language.
    ///
    /// Presentation data only; the admission rules never look at it.
    pub fn info(&self, lang: Lang) -> RoleInfo {
        match (self, lang) {
            (Role::Driver, Lang::En) => RoleInfo {
                label: "Driver",
                description: "Operates the machine during runs and time trials.",
            },
            (Role::Driver, Lang::Ar) => RoleInfo {
                label: "السائق",
                description: "يقود الآلة أثناء الجولات والتجارب.",
            },
            (Role::Electronics, Lang::En) => RoleInfo {
                label: "Electronics Engineer",
                description: "Owns the wiring, sensors, and power systems.",
            },
            (Role::Electronics, Lang::Ar) => RoleInfo {
                label: "مهندس الإلكترونيات",
                description: "مسؤول عن الأسلاك والحساسات وأنظمة الطاقة.",
            },
            (Role::Programmer, Lang::En) => RoleInfo {
                label: "Programmer",
                description: "Writes and tunes the control software.",
            },
            (Role::Programmer, Lang::Ar) => RoleInfo {
                label: "المبرمج",
                description: "يكتب برمجيات التحكم ويضبطها.",
            },
            (Role::MechanicsDesigner, Lang::En) => RoleInfo {
                label: "Mechanic / Designer",
                description: "Builds the chassis and the look of the machine.",
            },
            (Role::MechanicsDesigner, Lang::Ar) => RoleInfo {
                label: "الميكانيكي والمصمم",
                description: "يبني الهيكل ويصمم مظهر الآلة.",
            },
        }
    }
}

/// Display language for catalog metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Lang::En),
            "ar" => Some(Lang::Ar),
            _ => None,
        }
    }
}

/// Presentation metadata for one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleInfo {
    pub label: &'static str,
    pub description: &'static str,
}

/// Catalog entry served to the frontend role picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCatalogEntry {
    pub id: Role,
    pub label: &'static str,
    pub description: &'static str,
    pub unique: bool,
    pub max_per_team: usize,
}

/// The full catalog in display order, localized.
pub fn catalog_entries(lang: Lang) -> Vec<RoleCatalogEntry> {
    CATALOG
        .iter()
        .map(|role| {
            let info = role.info(lang);
            RoleCatalogEntry {
                id: *role,
                label: info.label,
                description: info.description,
                unique: role.is_unique(),
                max_per_team: role.max_per_team(),
            }
        })
        .collect()
}
