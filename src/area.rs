use crate::config::AreaConfig;
use crate::slot::{date_folder, RunKind};
use crate::source::LogSource;
use std::path::PathBuf;
use time::Date;

/// Values substituted into an area's path templates.
#[derive(Debug, Clone)]
pub struct PathVars<'a> {
    pub root: &'a str,
    pub date: Date,
    pub region: &'a str,
}

fn expand(template: &str, area: &str, vars: &PathVars<'_>) -> String {
    template
        .replace("{root}", vars.root)
        .replace("{date}", &date_folder(vars.date))
        .replace("{area}", area)
        .replace("{region}", vars.region)
}

/// Candidate files for one area and run kind, in priority order.
pub fn candidate_paths(area: &AreaConfig, run_kind: RunKind, vars: &PathVars<'_>) -> Vec<PathBuf> {
    let dir = PathBuf::from(expand(&area.dir, &area.name, vars));
    let names = match run_kind {
        RunKind::EarlyRun => &area.early_run,
        RunKind::FinalRun => &area.final_run,
    };
    names
        .iter()
        .map(|n| dir.join(expand(n, &area.name, vars)))
        .collect()
}

/// First candidate that exists.
pub fn resolve(source: &dyn LogSource, candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| source.exists(p)).cloned()
}
