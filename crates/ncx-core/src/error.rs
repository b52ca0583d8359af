// ── Core error types ──
//
// Two strata. `LoadError` is a configuration failure: it aborts the run
// before any remote call. `ItemFailure` is scoped to one work item or one
// router inside it: it is reported and the batch carries on.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::TargetSelector;
use crate::reconcile::Rejection;
use crate::resolve::SiteRejection;

/// Header list as found in the file, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns(pub Vec<String>);

impl fmt::Display for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, column) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{column}'")?;
        }
        f.write_str("]")
    }
}

/// Input file could not be turned into work items.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error("CSV file has no header row")]
    NoHeaderRow,

    #[error("CSV must contain '{column}' ({accepted}) (found: {found})")]
    MissingColumn {
        column: &'static str,
        accepted: String,
        found: Columns,
    },

    #[error(
        "CSV must not contain both 'group_id' and 'group_name'; use one or the other (found: {found})"
    )]
    ConflictingGroupColumns { found: Columns },

    #[error(
        "CSV must contain a router/device column ('id' or 'router_id') or a group column \
         ('group_id' or 'group_name') (found: {found})"
    )]
    NoTargetColumn { found: Columns },

    #[error("no data row with {fields} found (found columns: {found})")]
    NoUsableRows { fields: String, found: Columns },
}

/// Why a work item, or one router within it, was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemFailure {
    #[error("no routers found for {target}")]
    NoTargets { target: TargetSelector },

    #[error("{operation} failed: {kind}: {message}")]
    Remote {
        operation: &'static str,
        kind: &'static str,
        message: String,
    },

    #[error(transparent)]
    Site(#[from] SiteRejection),

    #[error("name '{name}' must be at least {min} characters", min = crate::build::MIN_NAME_LEN)]
    NameTooShort { name: String },

    #[error("no LANs found")]
    NoLocalNetworks,

    #[error("exchange API rejected the request: {0}")]
    Rejected(Rejection),

    #[error("site '{name}' was not found after creation")]
    SiteMissingAfterCreate { name: String },
}

impl ItemFailure {
    /// Wrap a collaborator error raised while performing `operation`.
    pub fn remote(operation: &'static str, err: &ncx_api::Error) -> Self {
        Self::Remote {
            operation,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetMode;

    #[test]
    fn columns_render_quoted() {
        let cols = Columns(vec!["router_id".into(), "Site Name".into()]);
        assert_eq!(cols.to_string(), "['router_id', 'Site Name']");
    }

    #[test]
    fn remote_failure_carries_kind() {
        let err = ncx_api::Error::Timeout { timeout_secs: 5 };
        let failure = ItemFailure::remote("create resource", &err);
        assert_eq!(
            failure.to_string(),
            "create resource failed: TimeoutError: Request timed out after 5s"
        );
    }

    #[test]
    fn no_targets_names_selector() {
        let failure = ItemFailure::NoTargets {
            target: TargetSelector::new(TargetMode::DeviceId, "111"),
        };
        assert_eq!(failure.to_string(), "no routers found for router_id='111'");
    }
}
