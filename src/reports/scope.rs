use serde::{Deserialize, Serialize};

use crate::models::{CurrentUser, ProspectRecord};

/// How a non-admin caller is matched against record ownership.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMatch {
    /// The caller is the record's assignee or its creator, compared by id.
    #[default]
    UserId,
    /// Legacy behaviour: compare the caller's full name with the assignee's name.
    FullName,
}

impl std::str::FromStr for ScopeMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_id" => Ok(ScopeMatch::UserId),
            "full_name" => Ok(ScopeMatch::FullName),
            other => Err(format!("unknown scope match: {other}")),
        }
    }
}

/// Whether `user` may see `record`.
pub fn is_visible(record: &ProspectRecord, user: &CurrentUser, mode: ScopeMatch) -> bool {
    if user.is_admin() {
        return true;
    }
    match mode {
        ScopeMatch::UserId => [&record.assigned_to, &record.created_by]
            .into_iter()
            .flatten()
            .any(|owner| owner.id == user.id),
        ScopeMatch::FullName => record
            .assigned_to
            .as_ref()
            .is_some_and(|a| a.full_name == user.full_name),
    }
}

/// Restrict `records` to those visible to `user`. Admins get everything back.
pub fn scope<'a, I>(records: I, user: &CurrentUser, mode: ScopeMatch) -> Vec<&'a ProspectRecord>
where
    I: IntoIterator<Item = &'a ProspectRecord>,
{
    records
        .into_iter()
        .filter(|r| is_visible(r, user, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ProspectStatus, UserRole};
    use crate::reports::fixtures::*;

    #[test]
    fn test_admin_sees_everything() {
        let siti = user("Siti");
        let mut a = record("Referral", ProspectStatus::Lead);
        a.assigned_to = Some(user("Budi"));
        let b = record("Meta Ads", ProspectStatus::Prospect);
        let records = vec![a, b];

        let admin = current(&siti, UserRole::Admin);
        let scoped = scope(&records, &admin, ScopeMatch::UserId);
        assert_eq!(scoped.len(), records.len());
    }

    #[test]
    fn test_cs_sees_assigned_or_created_by_id() {
        let siti = user("Siti");
        let budi = user("Budi");

        let mut mine = record("Referral", ProspectStatus::Lead);
        mine.assigned_to = Some(siti.clone());
        let mut created_unassigned = record("Website", ProspectStatus::Prospect);
        created_unassigned.created_by = Some(siti.clone());
        let mut handed_over = record("Meta Ads", ProspectStatus::Prospect);
        handed_over.assigned_to = Some(budi.clone());
        handed_over.created_by = Some(siti.clone());
        let mut theirs = record("Meta Ads", ProspectStatus::Lead);
        theirs.assigned_to = Some(budi.clone());
        theirs.created_by = Some(budi.clone());
        let records = vec![mine, created_unassigned, handed_over, theirs];

        let cs = current(&siti, UserRole::CsSupport);
        let scoped = scope(&records, &cs, ScopeMatch::UserId);
        assert_eq!(scoped.len(), 3);
        for r in &scoped {
            let assigned = r.assigned_to.as_ref().is_some_and(|a| a.id == siti.id);
            let created = r.created_by.as_ref().is_some_and(|c| c.id == siti.id);
            assert!(assigned || created, "{}", r.lead_source);
        }
        assert!(!scoped.iter().any(|r| r.id == records[3].id));
    }

    #[test]
    fn test_same_name_collision_only_in_legacy_mode() {
        let siti = user("Siti");
        let other_siti = user("Siti");

        let mut r = record("Referral", ProspectStatus::Lead);
        r.assigned_to = Some(other_siti);
        let records = vec![r];

        let cs = current(&siti, UserRole::CsSupport);
        assert!(scope(&records, &cs, ScopeMatch::UserId).is_empty());
        assert_eq!(scope(&records, &cs, ScopeMatch::FullName).len(), 1);
    }

    #[test]
    fn test_legacy_mode_ignores_creator() {
        let siti = user("Siti");
        let mut r = record("Referral", ProspectStatus::Lead);
        r.created_by = Some(siti.clone());
        let records = vec![r];

        let cs = current(&siti, UserRole::CsSupport);
        assert!(scope(&records, &cs, ScopeMatch::FullName).is_empty());
    }
}
