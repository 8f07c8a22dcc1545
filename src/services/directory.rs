//! Membership directory.
//!
//! Resolves members by display name, checks group membership and loads the
//! reviewer roster of a group. Rosters are read fresh on every call.

use crate::db::pool::DbPool;
use crate::db::{groups, members};
use crate::error::AppError;
use crate::models::{Member, Roster};

/// Resolve a display name to exactly one member.
///
/// Fails with `NotFound` when nobody has the name and `Ambiguous` when
/// several members share it.
pub async fn resolve_member(pool: &DbPool, name: &str) -> Result<Member, AppError> {
    let mut matches = members::find_by_name(pool, name).await?;

    match matches.len() {
        0 => Err(AppError::nominee_not_found(name)),
        1 => Ok(matches.remove(0)),
        n => {
            log::warn!("[directory] Display name {:?} matches {} members", name, n);
            Err(AppError::Ambiguous {
                name: name.to_string(),
                matches: n,
            })
        }
    }
}

/// Check whether `member` belongs to `group_id`.
pub fn is_member_of_group(member: &Member, group_id: &str) -> bool {
    member.is_member_of(group_id)
}

/// Load the reviewer roster of a group.
///
/// A missing group, an unparseable people map and an empty roster all count
/// as unavailable.
pub async fn get_roster(pool: &DbPool, group_id: &str) -> Result<Roster, AppError> {
    let group = groups::get_group(pool, group_id)
        .await?
        .ok_or_else(|| AppError::roster_unavailable(group_id))?;

    match group.roster() {
        Some(roster) if !roster.is_empty() => Ok(roster),
        Some(_) => Err(AppError::roster_unavailable(group_id)),
        None => {
            log::warn!("[directory] Group {} has a malformed people map", group_id);
            Err(AppError::roster_unavailable(group_id))
        }
    }
}

/// The group a member lands in by default, if any.
pub async fn default_group(pool: &DbPool, member_id: &str) -> Result<Option<String>, AppError> {
    let member = members::get_member(pool, member_id).await?;
    Ok(member.and_then(|m| m.default_group()))
}
