use crate::{
    area::{self, PathVars},
    block,
    config::{AreaConfig, Config},
    error::UsageError,
    markers::MarkerSet,
    report::{Reason, StatusResult},
    slot::{RunKind, Slot},
    source::LogSource,
};
use anyhow::Result;
use std::path::PathBuf;
use time::Date;
use tracing::{debug, info, warn};

pub struct Scanner<S: LogSource> {
    cfg: Config,
    markers: MarkerSet,
    source: S,
}

impl<S: LogSource> Scanner<S> {
    pub fn new(cfg: &Config, source: S) -> Result<Self> {
        let markers = MarkerSet::new(&cfg.markers)?;
        Ok(Self {
            cfg: cfg.clone(),
            markers,
            source,
        })
    }

    /// Configured areas matching `names`, in the order given. Empty means all.
    pub fn select_areas(&self, names: &[String]) -> Result<Vec<&AreaConfig>, UsageError> {
        if names.is_empty() {
            return Ok(self.cfg.areas.iter().collect());
        }
        names
            .iter()
            .map(|n| {
                self.cfg.area(n).ok_or_else(|| UsageError::UnknownArea {
                    name: n.clone(),
                    known: self.cfg.area_names().join(", "),
                })
            })
            .collect()
    }

    fn vars(&self, date: Date) -> PathVars<'_> {
        PathVars {
            root: &self.cfg.paths.log_root,
            date,
            region: &self.cfg.scan.region,
        }
    }

    /// Candidate paths per area without touching the filesystem.
    pub fn plan(
        &self,
        date: Date,
        slot: Slot,
        areas: &[&AreaConfig],
    ) -> Vec<(String, Vec<PathBuf>)> {
        let vars = self.vars(date);
        areas
            .iter()
            .map(|a| (a.name.clone(), area::candidate_paths(a, slot.run_kind(), &vars)))
            .collect()
    }

    /// One result per requested area, in order.
    pub fn scan(&self, date: Date, slot: Slot, areas: &[&AreaConfig]) -> Vec<StatusResult> {
        info!(
            "scan date={} slot={} run_kind={} areas={}",
            date,
            slot,
            slot.run_kind(),
            areas.len()
        );
        areas.iter().map(|a| self.scan_area(date, slot, a)).collect()
    }

    pub fn scan_area(&self, date: Date, slot: Slot, area: &AreaConfig) -> StatusResult {
        let candidates = area::candidate_paths(area, slot.run_kind(), &self.vars(date));
        debug!(area = %area.name, ?candidates, "candidate paths");

        let Some(path) = area::resolve(&self.source, &candidates) else {
            warn!("{}: no log file found", area.name);
            return StatusResult::tbc(&area.name, Reason::FileNotFound, None);
        };

        let lines = match self.source.read_lines(&path) {
            Ok(lines) => lines,
            Err(err) => {
                warn!("{}: {:#}", area.name, err);
                return StatusResult::tbc(&area.name, Reason::Unreadable, Some(path));
            }
        };

        let blocks = block::partition(&lines, &self.markers);
        debug!(area = %area.name, blocks = blocks.len(), "partitioned");

        let Some(selected) = block::select(&blocks, slot, self.cfg.scan.window_minutes) else {
            let reason = match slot.run_kind() {
                RunKind::EarlyRun => Reason::NoBlockInWindow,
                RunKind::FinalRun => Reason::NoBlocks,
            };
            return StatusResult::tbc(&area.name, reason, Some(path));
        };

        let (status, reason) = self.markers.classify(&selected.lines, selected.closed);
        info!(
            "{}: {} start={} lines={} ({})",
            area.name,
            status,
            selected.start_text,
            selected.lines.len(),
            reason
        );

        StatusResult {
            area: area.name.clone(),
            status,
            reason,
            path: Some(path),
            start: Some(selected.start_text.clone()),
            block: selected.lines.clone(),
        }
    }
}
