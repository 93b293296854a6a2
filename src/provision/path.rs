// ABOUTME: Primary and link-disjoint backup path computation.
// ABOUTME: The graph search itself runs on the NRM; this module only asks and checks.

use super::error::ProvisionError;
use crate::nrm::{Session, Transport};
use crate::types::LinkId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Which of the two paths a computation was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Primary,
    Backup,
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRole::Primary => write!(f, "primary"),
            PathRole::Backup => write!(f, "backup"),
        }
    }
}

/// What to do when no backup path avoiding the primary links exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupPolicy {
    /// Refuse to provision without a disjoint backup.
    #[default]
    Required,
    /// Provision on the primary path alone.
    Optional,
}

/// Primary and backup link sequences for one circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPlan {
    pub primary: Vec<LinkId>,
    pub backup: Vec<LinkId>,
}

impl PathPlan {
    pub fn has_backup(&self) -> bool {
        !self.backup.is_empty()
    }
}

/// Ask the NRM for the shortest path between two switches, skipping every
/// link in `excluded`.
///
/// An empty answer is a failure unless both switches are the same, in
/// which case it is a zero-hop path. A non-empty `excluded` set marks the
/// search as a backup search for error reporting.
pub async fn find_path<T: Transport>(
    session: &Session<T>,
    from: &str,
    to: &str,
    excluded: &[LinkId],
) -> Result<Vec<LinkId>, ProvisionError> {
    let role = if excluded.is_empty() {
        PathRole::Primary
    } else {
        PathRole::Backup
    };

    let links = session
        .client()
        .get_shortest_path(from, to, excluded)
        .await?;

    if links.is_empty() && from != to {
        return Err(ProvisionError::NoPath {
            from: from.to_string(),
            to: to.to_string(),
            role,
        });
    }

    debug!(from, to, %role, hops = links.len(), "path found");
    Ok(links)
}

/// Compute the primary path, then a backup with every primary link
/// excluded.
pub async fn plan_paths<T: Transport>(
    session: &Session<T>,
    from: &str,
    to: &str,
    policy: BackupPolicy,
) -> Result<PathPlan, ProvisionError> {
    let primary = find_path(session, from, to, &[]).await?;
    if primary.is_empty() {
        return Ok(PathPlan::default());
    }

    let backup = match find_path(session, from, to, &primary).await {
        Ok(backup) => disjoint_or_fail(from, to, &primary, backup)?,
        Err(ProvisionError::NoPath { .. }) if policy == BackupPolicy::Optional => {
            warn!(from, to, "no disjoint backup path, provisioning on primary only");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    Ok(PathPlan { primary, backup })
}

// The NRM is trusted to honour exclusions, but a backup that reuses a
// primary link would give no protection at all.
fn disjoint_or_fail(
    from: &str,
    to: &str,
    primary: &[LinkId],
    backup: Vec<LinkId>,
) -> Result<Vec<LinkId>, ProvisionError> {
    let used: HashSet<&LinkId> = primary.iter().collect();
    if let Some(shared) = backup.iter().find(|l| used.contains(l)) {
        warn!(from, to, link = %shared, "NRM returned a backup path sharing a primary link");
        return Err(ProvisionError::NoPath {
            from: from.to_string(),
            to: to.to_string(),
            role: PathRole::Backup,
        });
    }
    Ok(backup)
}
