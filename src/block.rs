use crate::markers::MarkerSet;
use crate::slot::{RunKind, Slot};
use time::Time;

/// One execution attempt: from a timestamped line up to and including the
/// end-marker line, or up to end-of-file when the attempt never finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    pub start: Time,
    pub start_text: String,
    pub lines: Vec<String>,
    pub closed: bool,
}

/// Splits a log into blocks. A timestamped run-start line cuts any open block,
/// which stays unclosed. Untimestamped lines between a closed block and the
/// next timestamped line belong to no block.
pub fn partition<I, S>(lines: I, markers: &MarkerSet) -> Vec<LogBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut blocks = Vec::new();
    let mut open: Option<LogBlock> = None;

    for line in lines {
        let line = line.as_ref();
        if open.is_some() && markers.is_start(line) && markers.timestamp(line).is_some() {
            blocks.extend(open.take());
        }
        if open.is_none() {
            let Some((text, start)) = markers.timestamp(line) else {
                continue;
            };
            open = Some(LogBlock {
                start,
                start_text: text.to_string(),
                lines: Vec::new(),
                closed: false,
            });
        }
        let Some(current) = open.as_mut() else {
            continue;
        };

        current.lines.push(line.to_string());
        if markers.is_end(line) {
            current.closed = true;
            blocks.extend(open.take());
        }
    }

    blocks.extend(open);
    blocks
}

/// Picks the block a slot is judged on. EarlyRun takes the first block that
/// starts inside the window; FinalRun takes the last block whatever its time.
pub fn select(blocks: &[LogBlock], slot: Slot, window_minutes: u32) -> Option<&LogBlock> {
    match slot.run_kind() {
        RunKind::EarlyRun => blocks.iter().find(|b| slot.in_window(b.start, window_minutes)),
        RunKind::FinalRun => blocks.last(),
    }
}
