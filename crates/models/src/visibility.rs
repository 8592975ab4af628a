//! Notification audience resolution.
//!
//! Temporal gating (publish/expiry windows) is applied by the query layer;
//! this module only answers whether the audience rule matches a viewer.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    All,
    Students,
    Teachers,
    SpecificClass,
}

impl TargetAudience {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetAudience::All => "all",
            TargetAudience::Students => "students",
            TargetAudience::Teachers => "teachers",
            TargetAudience::SpecificClass => "specific_class",
        }
    }
}

/// The viewing user, reduced to what audience matching needs.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub role: Role,
    pub student_class_id: Option<Uuid>,
    /// Classes the viewer teaches (empty for non-teachers).
    pub teaching_class_ids: Vec<Uuid>,
}

/// Whether the notification's audience rule includes this viewer.
/// Admin and superadmin see everything regardless of audience.
pub fn is_visible(
    viewer: &Viewer,
    audience: TargetAudience,
    target_class: Option<Uuid>,
) -> bool {
    if matches!(viewer.role, Role::Admin | Role::Superadmin) {
        return true;
    }
    match audience {
        TargetAudience::All => true,
        TargetAudience::Students => viewer.role == Role::Student,
        TargetAudience::Teachers => viewer.role == Role::Teacher,
        TargetAudience::SpecificClass => {
            let Some(class_id) = target_class else {
                return false;
            };
            match viewer.role {
                Role::Student => viewer.student_class_id == Some(class_id),
                Role::Teacher => viewer.teaching_class_ids.contains(&class_id),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn student(class: Option<Uuid>) -> Viewer {
        Viewer {
            role: Role::Student,
            student_class_id: class,
            teaching_class_ids: vec![],
        }
    }

    fn teacher(classes: Vec<Uuid>) -> Viewer {
        Viewer {
            role: Role::Teacher,
            student_class_id: None,
            teaching_class_ids: classes,
        }
    }

    #[test]
    fn test_audience_all() {
        assert!(is_visible(&student(None), TargetAudience::All, None));
        assert!(is_visible(&teacher(vec![]), TargetAudience::All, None));
    }

    #[test]
    fn test_role_audiences() {
        assert!(is_visible(&student(None), TargetAudience::Students, None));
        assert!(!is_visible(&student(None), TargetAudience::Teachers, None));
        assert!(is_visible(&teacher(vec![]), TargetAudience::Teachers, None));
        assert!(!is_visible(&teacher(vec![]), TargetAudience::Students, None));
    }

    #[test]
    fn test_specific_class() {
        let class_c = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(is_visible(
            &student(Some(class_c)),
            TargetAudience::SpecificClass,
            Some(class_c)
        ));
        assert!(!is_visible(
            &student(Some(other)),
            TargetAudience::SpecificClass,
            Some(class_c)
        ));

        // A teacher who does not teach class C never sees its notifications.
        assert!(!is_visible(
            &teacher(vec![other]),
            TargetAudience::SpecificClass,
            Some(class_c)
        ));
        assert!(is_visible(
            &teacher(vec![other, class_c]),
            TargetAudience::SpecificClass,
            Some(class_c)
        ));
    }

    #[test]
    fn test_admin_sees_everything() {
        let admin = Viewer {
            role: Role::Admin,
            student_class_id: None,
            teaching_class_ids: vec![],
        };
        let class_c = Uuid::new_v4();
        assert!(is_visible(&admin, TargetAudience::SpecificClass, Some(class_c)));
        assert!(is_visible(&admin, TargetAudience::Students, None));

        let superadmin = Viewer {
            role: Role::Superadmin,
            student_class_id: None,
            teaching_class_ids: vec![],
        };
        assert!(is_visible(&superadmin, TargetAudience::Teachers, None));
    }
}
