//! Read access to the history log

use crate::common::{Actor, Capability, Identity};
use crate::domains::blogs::BlogResult;
use crate::domains::history::models::{HistoryEvent, HISTORY_APPLICATION};
use crate::kernel::ServerDeps;

/// Every blog's latest status snapshot (admin only)
pub async fn list_history(identity: &Identity, deps: &ServerDeps) -> BlogResult<Vec<HistoryEvent>> {
    Actor::new(identity).can(Capability::ViewHistory).check()?;

    Ok(deps
        .history
        .log()
        .query_partition(HISTORY_APPLICATION)
        .await?)
}
