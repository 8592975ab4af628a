//! Pure access-rule checks shared by every route handler.
//!
//! Each check is a side-effect-free predicate over already-loaded data; the
//! HTTP layer decides how a denial maps onto a status code.

use crate::role::Role;
use thiserror::Error;
use uuid::Uuid;

/// Why an action was denied. Messages are user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Access denied. Insufficient permissions.")]
    InsufficientRole,
    #[error("Access denied. You can only access resources from your school.")]
    SchoolMismatch,
    #[error("Access denied. Your school access has been blocked.")]
    SchoolBlocked,
    #[error("Access denied. You do not teach this class.")]
    NotClassTeacher,
    #[error("Access denied. You do not teach this subject in this class.")]
    NotSubjectTeacher,
    #[error("Access denied. You do not own this resource.")]
    NotOwner,
    #[error("Access denied. You can only access your own data.")]
    NotSelf,
    #[error("Access denied. You do not belong to this class.")]
    NotClassMember,
}

/// The authenticated principal, as resolved by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    /// Absent only for superadmin accounts.
    pub school_id: Option<Uuid>,
}

/// One row of the teacher-subject junction, flattened for the acting teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeachingLink {
    pub class_id: Uuid,
    pub subject_id: Uuid,
}

/// Rule 1: role floor.
pub fn require_role(actor: &Actor, floor: Role) -> Result<(), AccessDenied> {
    if actor.role.outranks_or_is(floor) {
        Ok(())
    } else {
        Err(AccessDenied::InsufficientRole)
    }
}

/// Rule 2: tenant scoping. Superadmin bypasses entirely.
pub fn require_same_school(
    actor: &Actor,
    resource_school: Option<Uuid>,
) -> Result<(), AccessDenied> {
    if actor.role == Role::Superadmin {
        return Ok(());
    }
    match (actor.school_id, resource_school) {
        (Some(a), Some(r)) if a == r => Ok(()),
        _ => Err(AccessDenied::SchoolMismatch),
    }
}

/// Rule 3a: the teacher must have at least one subject in the class.
pub fn require_teaches_class(links: &[TeachingLink], class_id: Uuid) -> Result<(), AccessDenied> {
    if links.iter().any(|l| l.class_id == class_id) {
        Ok(())
    } else {
        Err(AccessDenied::NotClassTeacher)
    }
}

/// Rule 3b: the teacher must teach this exact subject in this class.
pub fn require_teaches_subject(
    links: &[TeachingLink],
    class_id: Uuid,
    subject_id: Uuid,
) -> Result<(), AccessDenied> {
    if links
        .iter()
        .any(|l| l.class_id == class_id && l.subject_id == subject_id)
    {
        Ok(())
    } else if links.iter().any(|l| l.class_id == class_id) {
        Err(AccessDenied::NotSubjectTeacher)
    } else {
        Err(AccessDenied::NotClassTeacher)
    }
}

/// Rule 4: ownership. Only the creating user may touch the resource.
pub fn require_owner(actor_id: Uuid, owner_id: Uuid) -> Result<(), AccessDenied> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner)
    }
}

/// Rule 5 (students): a student may only touch records keyed by their own id.
pub fn require_self(actor_id: Uuid, subject_user_id: Uuid) -> Result<(), AccessDenied> {
    if actor_id == subject_user_id {
        Ok(())
    } else {
        Err(AccessDenied::NotSelf)
    }
}

/// A student may only act inside the class they are enrolled in.
pub fn require_enrolled(
    student_class: Option<Uuid>,
    class_id: Uuid,
) -> Result<(), AccessDenied> {
    if student_class == Some(class_id) {
        Ok(())
    } else {
        Err(AccessDenied::NotClassMember)
    }
}

/// Rule 5 (teachers): a teacher may read a student's data only when the
/// student's class is among the classes the teacher teaches. Admin and
/// superadmin pass, students fall back to the self rule.
pub fn can_view_student_data(
    actor: &Actor,
    student_id: Uuid,
    student_class: Option<Uuid>,
    links: &[TeachingLink],
) -> Result<(), AccessDenied> {
    match actor.role {
        Role::Superadmin | Role::Admin => Ok(()),
        Role::Teacher => {
            let class_id = student_class.ok_or(AccessDenied::NotClassTeacher)?;
            require_teaches_class(links, class_id)
        }
        Role::Student => require_self(actor.id, student_id),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn actor(role: Role, school: Option<Uuid>) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
            school_id: school,
        }
    }

    #[test]
    fn test_role_floor() {
        let admin = actor(Role::Admin, Some(Uuid::new_v4()));
        assert!(require_role(&admin, Role::Teacher).is_ok());
        assert!(require_role(&admin, Role::Admin).is_ok());
        assert_eq!(
            require_role(&admin, Role::Superadmin),
            Err(AccessDenied::InsufficientRole)
        );
    }

    #[test]
    fn test_tenant_scoping() {
        let school = Uuid::new_v4();
        let other = Uuid::new_v4();
        let teacher = actor(Role::Teacher, Some(school));
        assert!(require_same_school(&teacher, Some(school)).is_ok());
        assert_eq!(
            require_same_school(&teacher, Some(other)),
            Err(AccessDenied::SchoolMismatch)
        );
        // A resource with no school never matches a scoped actor.
        assert_eq!(
            require_same_school(&teacher, None),
            Err(AccessDenied::SchoolMismatch)
        );
    }

    #[test]
    fn test_superadmin_bypasses_tenant_scoping() {
        let sa = actor(Role::Superadmin, None);
        assert!(require_same_school(&sa, Some(Uuid::new_v4())).is_ok());
        assert!(require_same_school(&sa, None).is_ok());
    }

    #[test]
    fn test_teach_relationship() {
        let class_id = Uuid::new_v4();
        let maths = Uuid::new_v4();
        let physics = Uuid::new_v4();
        let links = vec![TeachingLink {
            class_id,
            subject_id: maths,
        }];

        assert!(require_teaches_class(&links, class_id).is_ok());
        assert!(require_teaches_subject(&links, class_id, maths).is_ok());
        assert_eq!(
            require_teaches_subject(&links, class_id, physics),
            Err(AccessDenied::NotSubjectTeacher)
        );
        assert_eq!(
            require_teaches_subject(&links, Uuid::new_v4(), maths),
            Err(AccessDenied::NotClassTeacher)
        );
    }

    #[test]
    fn test_ownership_and_self() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(require_owner(me, me).is_ok());
        assert_eq!(require_owner(me, other), Err(AccessDenied::NotOwner));
        assert!(require_self(me, me).is_ok());
        assert_eq!(require_self(me, other), Err(AccessDenied::NotSelf));
    }

    #[test]
    fn test_view_student_data() {
        let class_id = Uuid::new_v4();
        let student_id = Uuid::new_v4();
        let links = vec![TeachingLink {
            class_id,
            subject_id: Uuid::new_v4(),
        }];

        let teacher = actor(Role::Teacher, Some(Uuid::new_v4()));
        assert!(can_view_student_data(&teacher, student_id, Some(class_id), &links).is_ok());
        assert_eq!(
            can_view_student_data(&teacher, student_id, Some(Uuid::new_v4()), &links),
            Err(AccessDenied::NotClassTeacher)
        );
        // A student without a class is not visible to any teacher.
        assert_eq!(
            can_view_student_data(&teacher, student_id, None, &links),
            Err(AccessDenied::NotClassTeacher)
        );

        let admin = actor(Role::Admin, Some(Uuid::new_v4()));
        assert!(can_view_student_data(&admin, student_id, None, &[]).is_ok());

        let mut student = actor(Role::Student, Some(Uuid::new_v4()));
        student.id = student_id;
        assert!(can_view_student_data(&student, student_id, Some(class_id), &[]).is_ok());
        assert_eq!(
            can_view_student_data(&student, Uuid::new_v4(), None, &[]),
            Err(AccessDenied::NotSelf)
        );
    }
}
