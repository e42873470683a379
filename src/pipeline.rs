use std::path::Path;

use log::info;

use crate::config::CleanupConfig;
use crate::data::clean::CleanReport;
use crate::data::loader;
use crate::data::model::WorkingSet;
use crate::error::Result;

/// Result of one cleanup run: the table ready to export plus stage counts.
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub working_set: WorkingSet,
    pub report: CleanReport,
}

/// Clean an already-loaded working set according to `config`.
pub fn clean(mut ws: WorkingSet, config: &CleanupConfig) -> Result<Cleaned> {
    if config.sort_first {
        info!("sorting {} rows by depth", ws.len());
        ws.sort_by_depth();
    }
    let report = ws.clean(config.min_depth, config.max_depth)?;
    Ok(Cleaned {
        working_set: ws,
        report,
    })
}

/// Load `input` and clean it. Nothing is written here.
pub fn run(input: &Path, config: &CleanupConfig) -> Result<Cleaned> {
    let ws = loader::load_file(input)?;
    clean(ws, config)
}
