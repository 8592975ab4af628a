use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Account role. Lower rank means more privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Precedence rank: superadmin 0, admin 1, teacher 2, student 3.
    pub fn rank(self) -> u8 {
        match self {
            Role::Superadmin => 0,
            Role::Admin => 1,
            Role::Teacher => 2,
            Role::Student => 3,
        }
    }

    /// True when this role is at least as privileged as `required`.
    pub fn outranks_or_is(self, required: Role) -> bool {
        self.rank() <= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            _ => Err(()),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Role;
    use std::str::FromStr;

    #[test]
    fn test_rank_ordering() {
        assert!(Role::Superadmin.rank() < Role::Admin.rank());
        assert!(Role::Admin.rank() < Role::Teacher.rank());
        assert!(Role::Teacher.rank() < Role::Student.rank());
    }

    #[test]
    fn test_outranks_or_is() {
        assert!(Role::Superadmin.outranks_or_is(Role::Admin));
        assert!(Role::Admin.outranks_or_is(Role::Admin));
        assert!(Role::Admin.outranks_or_is(Role::Teacher));
        assert!(!Role::Teacher.outranks_or_is(Role::Admin));
        assert!(!Role::Student.outranks_or_is(Role::Teacher));
    }

    #[test]
    fn test_round_trip_str() {
        for role in [Role::Superadmin, Role::Admin, Role::Teacher, Role::Student] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
        assert_eq!(Role::from_str("principal"), Err(()));
    }
}
