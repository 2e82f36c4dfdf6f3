use sqlx::{QueryBuilder, Sqlite};

use crate::domain::User;

/// The rows an actor may read.
///
/// Rider and administrator grants are independent: an account that both owns
/// ledger rows and administers a cooperative sees the union of the two sets.
/// Superusers see everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Unrestricted,
    Actor(i64),
}

impl Visibility {
    pub fn for_user(user: &User) -> Self {
        if user.is_superuser {
            Visibility::Unrestricted
        } else {
            Visibility::Actor(user.id)
        }
    }

    /// Pushes the predicate for an income or contribution table aliased as
    /// `alias` (which must carry `rider_id` and `cooperative_id`).
    pub fn push_ledger_predicate(&self, qb: &mut QueryBuilder<'_, Sqlite>, alias: &'static str) {
        match *self {
            Visibility::Unrestricted => {
                qb.push("1 = 1");
            }
            Visibility::Actor(user_id) => {
                qb.push(format!("({alias}.rider_id = "))
                    .push_bind(user_id)
                    .push(format!(
                        " OR EXISTS (SELECT 1 FROM cooperative_admins va \
                         WHERE va.cooperative_id = {alias}.cooperative_id AND va.user_id = "
                    ))
                    .push_bind(user_id)
                    .push("))");
            }
        }
    }

    /// Pushes the predicate for the `cooperatives` table aliased as `alias`.
    pub fn push_cooperative_predicate(&self, qb: &mut QueryBuilder<'_, Sqlite>, alias: &'static str) {
        match *self {
            Visibility::Unrestricted => {
                qb.push("1 = 1");
            }
            Visibility::Actor(user_id) => {
                qb.push(format!(
                    "(EXISTS (SELECT 1 FROM cooperative_admins va \
                     WHERE va.cooperative_id = {alias}.id AND va.user_id = "
                ))
                .push_bind(user_id)
                .push(format!(
                    ") OR EXISTS (SELECT 1 FROM cooperative_memberships vm \
                     WHERE vm.cooperative_id = {alias}.id AND vm.user_id = "
                ))
                .push_bind(user_id)
                .push("))");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use chrono::Utc;

    fn user(id: i64, role: Role, is_superuser: bool) -> User {
        User {
            id,
            email: None,
            phone_number: None,
            full_name: String::new(),
            role,
            is_superuser,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn superuser_is_unrestricted_whatever_the_role() {
        assert_eq!(Visibility::for_user(&user(1, Role::Rider, true)), Visibility::Unrestricted);
        assert_eq!(
            Visibility::for_user(&user(1, Role::CooperativeAdmin, true)),
            Visibility::Unrestricted
        );
    }

    #[test]
    fn everyone_else_is_scoped_to_themselves() {
        assert_eq!(Visibility::for_user(&user(7, Role::Rider, false)), Visibility::Actor(7));
        assert_eq!(
            Visibility::for_user(&user(3, Role::CooperativeAdmin, false)),
            Visibility::Actor(3)
        );
    }

    #[test]
    fn cooperative_predicate_covers_admins_and_members() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1 FROM cooperatives c WHERE ");
        Visibility::Actor(5).push_cooperative_predicate(&mut qb, "c");
        let sql = qb.sql();
        assert!(sql.contains("va.cooperative_id = c.id AND va.user_id = ?"));
        assert!(sql.contains(") OR EXISTS (SELECT 1 FROM cooperative_memberships vm"));
        assert!(sql.ends_with("vm.user_id = ?))"));
    }

    #[test]
    fn renders_bound_predicate() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1 FROM income_records i WHERE ");
        Visibility::Actor(5).push_ledger_predicate(&mut qb, "i");
        let sql = qb.sql();
        assert!(sql.contains("i.rider_id = ?"));
        assert!(sql.contains("va.cooperative_id = i.cooperative_id AND va.user_id = ?"));

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT 1 FROM cooperatives c WHERE ");
        Visibility::Unrestricted.push_cooperative_predicate(&mut qb, "c");
        assert!(qb.sql().ends_with("1 = 1"));
    }
}
