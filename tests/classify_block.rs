use slot_status::{
    block::{partition, select},
    config::{Config, Markers},
    markers::MarkerSet,
    report::{Reason, Status},
    slot::Slot,
};

fn markers() -> MarkerSet {
    MarkerSet::new(&Markers::default()).expect("default markers compile")
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

const GOOD_RUN: &str = "\
2025/08/20 10:00:17 INFO PriceGeneration starting for AUDforUS
2025/08/20 10:00:42 INFO Written D:/Data/out/GoodFiles/AUD_Index_20250820.xml
2025/08/20 10:01:02 INFO Total Prices to be submitted: 120
2025/08/20 10:01:03 INFO Total validated Prices submitted: 120 (100%)
2025/08/20 10:01:05 INFO Program is ending successfully";

#[test]
fn all_positive_markers_is_ok() {
    let m = markers();
    let (status, reason) = m.classify(&lines(GOOD_RUN), true);
    assert_eq!(status, Status::Ok);
    assert_eq!(reason, Reason::AllMarkersPresent);
}

#[test]
fn error_marker_overrides_ok() {
    let m = markers();
    let text = format!("{GOOD_RUN}\n2025/08/20 10:01:06 ERROR connection reset");
    let (status, reason) = m.classify(&lines(&text), true);
    assert_eq!(status, Status::Nok);
    assert_eq!(reason, Reason::NegativeMarker(vec!["error".into()]));
}

#[test]
fn bad_files_and_skip_are_negative() {
    let m = markers();
    let text = "\
2025/08/20 16:00:01 INFO start
2025/08/20 16:00:09 WARN Moved to BadFiles\\AUD_SN_20250820.xml
2025/08/20 16:00:10 INFO Skipping auto submission
2025/08/20 16:00:11 INFO Program is ending successfully";
    let (status, reason) = m.classify(&lines(text), true);
    assert_eq!(status, Status::Nok);
    assert_eq!(
        reason,
        Reason::NegativeMarker(vec!["bad_files".into(), "skip".into()])
    );
}

#[test]
fn ending_with_error_is_nok() {
    let m = markers();
    let text = "\
2025/08/20 16:15:00 INFO start
2025/08/20 16:15:30 INFO Program is ending with error";
    let (status, _) = m.classify(&lines(text), true);
    assert_eq!(status, Status::Nok);
}

#[test]
fn ending_without_success_phrase_is_nok() {
    let m = markers();
    let text = "\
2025/08/20 16:15:00 INFO start
2025/08/20 16:15:30 INFO Program is ending";
    let (status, reason) = m.classify(&lines(text), true);
    assert_eq!(status, Status::Nok);
    assert_eq!(reason, Reason::EndedWithoutSuccess);
}

#[test]
fn unfinished_block_is_tbc() {
    let m = markers();
    let text = "\
2025/08/20 10:00:17 INFO start
2025/08/20 10:00:42 INFO Written GoodFiles/AUD_Index.xml";
    let (status, reason) = m.classify(&lines(text), false);
    assert_eq!(status, Status::Tbc);
    assert_eq!(reason, Reason::Incomplete);
}

#[test]
fn totals_mismatch_is_not_ok() {
    let m = markers();
    let text = GOOD_RUN.replace("submitted: 120 (100%)", "submitted: 119 (100%)");
    let block = lines(&text);
    assert!(!m.totals_match(&block));
    let (status, reason) = m.classify(&block, true);
    assert_eq!(status, Status::Tbc);
    assert_eq!(reason, Reason::MissingMarkers(vec!["totals_match".into()]));
}

#[test]
fn markers_ignore_case() {
    let m = markers();
    let block = lines("2025/08/20 10:00:17 program IS ENDING SUCCESSFULLY");
    assert!(m.ended_successfully(&block));
    assert!(!m.has_error_marker(&block));
}

#[test]
fn partition_splits_on_end_markers() {
    let m = markers();
    let text = "\
banner line without timestamp
2025/08/20 10:00:17 INFO first run
continuation without timestamp
2025/08/20 10:01:05 INFO Program is ending successfully
trailing noise
2025/08/20 16:00:02 INFO second run
2025/08/20 16:00:40 INFO still going";
    let blocks = partition(lines(text), &m);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].start_text, "2025/08/20 10:00:17");
    assert_eq!(blocks[0].lines.len(), 3);
    assert!(blocks[0].closed);
    assert_eq!(blocks[1].lines.len(), 2);
    assert!(!blocks[1].closed);
}

#[test]
fn early_slot_takes_first_block_in_window() {
    let m = markers();
    let text = "\
2025/08/20 09:50:00 INFO early retry
2025/08/20 09:50:30 INFO Program is ending with error
2025/08/20 09:58:00 INFO in window
2025/08/20 09:58:30 INFO Program is ending successfully
2025/08/20 10:02:00 INFO also in window
2025/08/20 10:02:30 INFO Program is ending successfully";
    let blocks = partition(lines(text), &m);
    let window = Config::default().scan.window_minutes;
    let chosen = select(&blocks, Slot::Morning, window).expect("block in window");
    assert_eq!(chosen.start_text, "2025/08/20 09:58:00");
    assert!(select(&blocks, Slot::Latest1, window).is_none());
}

#[test]
fn final_slot_takes_last_block() {
    let m = markers();
    let text = "\
2025/08/20 16:30:05 INFO final run
2025/08/20 16:31:00 INFO Program is ending successfully
2025/08/20 19:12:00 INFO rerun
2025/08/20 19:12:30 INFO Program is ending with error";
    let blocks = partition(lines(text), &m);
    let chosen = select(&blocks, Slot::Final, 3).expect("last block");
    assert_eq!(chosen.start_text, "2025/08/20 19:12:00");
}

#[test]
fn timestamp_must_capture_named_groups() {
    let mut markers = Markers::default();
    markers.timestamp = r"^\d{4}/\d{2}/\d{2}".into();
    assert!(MarkerSet::new(&markers).is_err());

    let mut markers = Markers::default();
    markers.error = "(unclosed".into();
    assert!(MarkerSet::new(&markers).is_err());
}

#[test]
fn run_start_cuts_a_crashed_run() {
    let m = markers();
    let text = "\
2025/08/20 10:00:17 INFO PriceGeneration starting for AUDforUS
2025/08/20 10:00:42 INFO Loading curves
2025/08/20 16:00:02 INFO PriceGeneration starting for AUDforUS
2025/08/20 16:00:30 INFO Written GoodFiles/AUD_Index_20250820.xml
2025/08/20 16:01:02 INFO Total Prices to be submitted: 120
2025/08/20 16:01:03 INFO Total validated Prices submitted: 120 (100%)
2025/08/20 16:01:05 INFO Program is ending successfully";
    let blocks = partition(lines(text), &m);
    assert_eq!(blocks.len(), 2);
    assert!(!blocks[0].closed);
    assert_eq!(blocks[0].lines.len(), 2);

    let crashed = select(&blocks, Slot::Morning, 3).expect("10:00 block");
    assert_eq!(m.classify(&crashed.lines, crashed.closed).0, Status::Tbc);

    let rerun = select(&blocks, Slot::Latest1, 3).expect("16:00 block");
    assert_eq!(rerun.start_text, "2025/08/20 16:00:02");
    assert_eq!(m.classify(&rerun.lines, rerun.closed).0, Status::Ok);
}

#[test]
fn empty_start_pattern_keeps_runs_merged() {
    let mut markers = Markers::default();
    markers.start = String::new();
    let m = MarkerSet::new(&markers).unwrap();
    let text = "\
2025/08/20 10:00:17 INFO PriceGeneration starting
2025/08/20 16:00:02 INFO PriceGeneration starting
2025/08/20 16:01:05 INFO Program is ending successfully";
    let blocks = partition(lines(text), &m);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].lines.len(), 3);
}
