// ── Config loader ──
//
// CSV → mode-tagged work items. Headers are matched case-insensitively
// against synonym lists; the first header matching a synonym wins. Rows
// lacking a required value are skipped without complaint, but a file with
// no usable row at all is an error.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{Columns, LoadError};
use crate::model::{ItemPayload, Pipeline, TargetMode, TargetSelector, WorkItem};

/// Accepted header spellings per logical column, in priority order.
pub mod columns {
    pub const NETWORK_ID: &[&str] = &["ncx_network_id", "ncx network id"];
    pub const SITE_NAME: &[&str] = &["site_name", "site name"];
    pub const RESOURCE: &[&str] = &["resource", "target"];
    pub const RESOURCE_NAME: &[&str] = &["resource_name", "resource name"];
    pub const DEVICE_ID: &[&str] = &["id", "router_id", "router id"];
    pub const GROUP_ID: &[&str] = &["group_id", "group id"];
    pub const GROUP_NAME: &[&str] = &["group_name", "group name"];
}

/// Parsed input: the governing mode and its work items, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub pipeline: Pipeline,
    pub mode: TargetMode,
    pub items: Vec<WorkItem>,
}

/// Read and parse a CSV file. A missing file is reported as such,
/// distinct from unreadable or malformed content.
pub fn load_work_items(path: &Path, pipeline: Pipeline) -> Result<LoadedConfig, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_work_items(&text, pipeline)
}

/// Header positions resolved for one file.
struct Layout {
    network: usize,
    site_name: Option<usize>,
    resource: Option<usize>,
    resource_name: Option<usize>,
    target: usize,
    mode: TargetMode,
}

/// Parse CSV text into work items for `pipeline`.
pub fn parse_work_items(text: &str, pipeline: Pipeline) -> Result<LoadedConfig, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let normalized: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
    if normalized.iter().all(String::is_empty) {
        return Err(LoadError::NoHeaderRow);
    }
    let found = || Columns(raw_headers.clone());

    let layout = resolve_layout(&normalized, pipeline, found)?;
    debug!(%pipeline, mode = %layout.mode, "resolved CSV layout");

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(item) = row_to_item(&record, &layout, pipeline) else {
            continue;
        };
        items.push(item);
        // Group modes describe a single target: first qualifying row wins.
        if layout.mode.is_group() {
            break;
        }
    }

    if items.is_empty() {
        return Err(LoadError::NoUsableRows {
            fields: required_fields(pipeline, layout.mode),
            found: found(),
        });
    }

    debug!(count = items.len(), "loaded work items");
    Ok(LoadedConfig {
        pipeline,
        mode: layout.mode,
        items,
    })
}

fn resolve_layout(
    headers: &[String],
    pipeline: Pipeline,
    found: impl Fn() -> Columns,
) -> Result<Layout, LoadError> {
    let require = |column: &'static str, synonyms: &[&str]| {
        find_column(headers, synonyms).ok_or_else(|| LoadError::MissingColumn {
            column,
            accepted: synonyms.join(" or "),
            found: found(),
        })
    };

    let network = require("ncx_network_id", columns::NETWORK_ID)?;
    let site_name = match pipeline {
        Pipeline::LanResources => Some(require("site_name", columns::SITE_NAME)?),
        Pipeline::Sites | Pipeline::Resources => find_column(headers, columns::SITE_NAME),
    };
    let (resource, resource_name) = match pipeline {
        Pipeline::Resources => (
            Some(require("resource", columns::RESOURCE)?),
            find_column(headers, columns::RESOURCE_NAME),
        ),
        Pipeline::Sites | Pipeline::LanResources => (None, None),
    };

    let device = find_column(headers, columns::DEVICE_ID);
    let group_id = find_column(headers, columns::GROUP_ID);
    let group_name = find_column(headers, columns::GROUP_NAME);

    let (target, mode) = match (device, group_id, group_name) {
        (Some(idx), _, _) => (idx, TargetMode::DeviceId),
        (None, Some(_), Some(_)) => {
            return Err(LoadError::ConflictingGroupColumns { found: found() });
        }
        (None, Some(idx), None) => (idx, TargetMode::GroupId),
        (None, None, Some(idx)) => (idx, TargetMode::GroupName),
        (None, None, None) => return Err(LoadError::NoTargetColumn { found: found() }),
    };

    Ok(Layout {
        network,
        site_name,
        resource,
        resource_name,
        target,
        mode,
    })
}

fn row_to_item(record: &csv::StringRecord, layout: &Layout, pipeline: Pipeline) -> Option<WorkItem> {
    let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or_default();
    let optional = |idx: Option<usize>| {
        idx.map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };

    let network_id = cell(layout.network);
    if network_id.is_empty() {
        return None;
    }
    let site_name = optional(layout.site_name);

    let payload = match pipeline {
        Pipeline::Sites => ItemPayload::Site,
        Pipeline::LanResources => {
            site_name.as_ref()?;
            ItemPayload::LocalNetworks
        }
        Pipeline::Resources => ItemPayload::Resource {
            value: optional(layout.resource)?,
            name_override: optional(layout.resource_name),
        },
    };

    let identifier = cell(layout.target);
    if identifier.is_empty() {
        return None;
    }

    // Site creation in group mode names every site after its router.
    let site_name = if pipeline == Pipeline::Sites && layout.mode.is_group() {
        None
    } else {
        site_name
    };

    Some(WorkItem {
        target: TargetSelector::new(layout.mode, identifier),
        network_id: network_id.to_owned(),
        site_name,
        payload,
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(headers: &[String], synonyms: &[&str]) -> Option<usize> {
    synonyms
        .iter()
        .find_map(|syn| headers.iter().position(|h| h == syn))
}

fn required_fields(pipeline: Pipeline, mode: TargetMode) -> String {
    match pipeline {
        Pipeline::Sites => format!("{mode} and ncx_network_id"),
        Pipeline::LanResources => format!("{mode}, ncx_network_id, and site_name"),
        Pipeline::Resources => format!("{mode}, ncx_network_id, and resource"),
    }
}
