use crate::config::Markers;
use crate::report::{Reason, Status};
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use time::Time;

/// Compiled form of `[markers]`.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    timestamp: Regex,
    start: Option<Regex>,
    end: Regex,
    ended_successfully: Regex,
    ended_with_error: Regex,
    good_files: Regex,
    bad_files: Regex,
    total_submitted: Regex,
    total_validated: Regex,
    full_completion: Regex,
    error: Regex,
    skip: Regex,
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("invalid markers.{name} pattern: {pattern}"))
}

impl MarkerSet {
    pub fn new(m: &Markers) -> Result<Self> {
        let timestamp = Regex::new(&m.timestamp)
            .with_context(|| format!("invalid markers.timestamp pattern: {}", m.timestamp))?;
        for group in ["hour", "minute", "second"] {
            if !timestamp.capture_names().flatten().any(|n| n == group) {
                anyhow::bail!("markers.timestamp must capture a named group '{group}'");
            }
        }

        Ok(Self {
            timestamp,
            start: (!m.start.is_empty())
                .then(|| compile("start", &m.start))
                .transpose()?,
            end: compile("end", &m.end)?,
            ended_successfully: compile("ended_successfully", &m.ended_successfully)?,
            ended_with_error: compile("ended_with_error", &m.ended_with_error)?,
            good_files: compile("good_files", &m.good_files)?,
            bad_files: compile("bad_files", &m.bad_files)?,
            total_submitted: compile("total_submitted", &m.total_submitted)?,
            total_validated: compile("total_validated", &m.total_validated)?,
            full_completion: compile("full_completion", &m.full_completion)?,
            error: compile("error", &m.error)?,
            skip: compile("skip", &m.skip)?,
        })
    }

    /// Leading timestamp of a line, if any: the raw matched text and its time of day.
    pub fn timestamp<'l>(&self, line: &'l str) -> Option<(&'l str, Time)> {
        let caps = self.timestamp.captures(line)?;
        let field = |name: &str| caps.name(name)?.as_str().parse::<u8>().ok();
        let t = Time::from_hms(field("hour")?, field("minute")?, field("second")?).ok()?;
        Some((caps.get(0)?.as_str(), t))
    }

    pub fn is_start(&self, line: &str) -> bool {
        self.start.as_ref().is_some_and(|re| re.is_match(line))
    }

    pub fn is_end(&self, line: &str) -> bool {
        self.end.is_match(line)
    }

    pub fn has_good_files(&self, lines: &[String]) -> bool {
        any_line(&self.good_files, lines)
    }

    /// Both totals are reported and agree.
    pub fn totals_match(&self, lines: &[String]) -> bool {
        match (
            first_count(&self.total_submitted, lines),
            first_count(&self.total_validated, lines),
        ) {
            (Some(submitted), Some(validated)) => submitted == validated,
            _ => false,
        }
    }

    pub fn has_full_completion(&self, lines: &[String]) -> bool {
        any_line(&self.full_completion, lines)
    }

    pub fn ended_successfully(&self, lines: &[String]) -> bool {
        any_line(&self.ended_successfully, lines)
    }

    pub fn has_error_marker(&self, lines: &[String]) -> bool {
        any_line(&self.error, lines) || any_line(&self.ended_with_error, lines)
    }

    pub fn has_bad_files(&self, lines: &[String]) -> bool {
        any_line(&self.bad_files, lines)
    }

    pub fn has_skip_marker(&self, lines: &[String]) -> bool {
        any_line(&self.skip, lines)
    }

    /// Applies the status precedence to one block's lines. `closed` tells whether
    /// the block reached an end marker before end-of-file.
    ///
    /// Negative markers always win; OK needs every positive marker.
    pub fn classify(&self, lines: &[String], closed: bool) -> (Status, Reason) {
        let negatives: Vec<String> = [
            ("error", self.has_error_marker(lines)),
            ("bad_files", self.has_bad_files(lines)),
            ("skip", self.has_skip_marker(lines)),
        ]
        .into_iter()
        .filter(|(_, hit)| *hit)
        .map(|(name, _)| name.to_string())
        .collect();
        if !negatives.is_empty() {
            return (Status::Nok, Reason::NegativeMarker(negatives));
        }

        let success = self.ended_successfully(lines);
        if closed && !success {
            return (Status::Nok, Reason::EndedWithoutSuccess);
        }

        let missing: Vec<String> = [
            ("good_files", self.has_good_files(lines)),
            ("totals_match", self.totals_match(lines)),
            ("full_completion", self.has_full_completion(lines)),
            ("ended_successfully", success),
        ]
        .into_iter()
        .filter(|(_, hit)| !*hit)
        .map(|(name, _)| name.to_string())
        .collect();

        if missing.is_empty() {
            (Status::Ok, Reason::AllMarkersPresent)
        } else if !closed {
            (Status::Tbc, Reason::Incomplete)
        } else {
            (Status::Tbc, Reason::MissingMarkers(missing))
        }
    }
}

fn any_line(re: &Regex, lines: &[String]) -> bool {
    lines.iter().any(|l| re.is_match(l))
}

fn first_count(re: &Regex, lines: &[String]) -> Option<u64> {
    lines
        .iter()
        .find_map(|l| re.captures(l)?.get(1)?.as_str().parse().ok())
}
