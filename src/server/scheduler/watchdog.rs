use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{data::generation::GenerationStateRepository, error::Error};

/// Reclaims every generation lease whose expiry has lapsed.
///
/// A lapsed lease means the owning run died without releasing it; the row is cleared
/// and the abandoned run marked aborted so the group can be generated again. Returns
/// the number of leases reclaimed.
pub async fn reclaim_expired_leases(db: DatabaseConnection) -> Result<usize, Error> {
    let now = Utc::now().naive_utc();
    let state_repo = GenerationStateRepository::new(&db);

    let mut reclaimed = 0;
    for state in state_repo.find_expired(now).await? {
        if state_repo.reclaim(state.group_id, now).await? {
            tracing::warn!(
                "Reclaimed an expired generation lease for group {}",
                state.group_id
            );
            reclaimed += 1;
        }
    }

    Ok(reclaimed)
}
