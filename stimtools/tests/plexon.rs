use std::fs;
use stimtools::plexon::{self, STIMTIMES_PLEXON};
use stimtools::{StimError, StimRecord};

mod common;

#[test]
fn read_export() {
    let dir = common::scratch();
    common::install(dir.path(), "stimtimes_plexon.txt", STIMTIMES_PLEXON);
    let cols = plexon::events_file(&dir.path().join(STIMTIMES_PLEXON)).unwrap();
    assert_eq!(vec![0.5, 1.5, 2.5], cols["StimulusTrigger"]);
    assert_eq!(7, cols["FrameTrigger"].len());
    assert_eq!(vec![11.0, 12.0, 13.0], cols["Strobed"]);
}

#[test]
fn stimtimes_from_export() {
    let dir = common::scratch();
    common::install(dir.path(), "stimtimes_plexon.txt", STIMTIMES_PLEXON);
    let st = plexon::stimtimes(dir.path()).unwrap();
    assert_eq!(vec![0.5, 1.5, 2.5], st.onsets);
    assert_eq!(Some(vec![11, 12, 13]), st.stim_ids);
    assert_eq!(vec![0.6, 0.7], st.frames[0]);
    assert_eq!(vec![1.6, 1.7], st.frames[1]);
    // The last stimulus takes every unclaimed frame, including the early one
    assert_eq!(vec![0.45, 2.6, 2.7], st.frames[2]);

    let recs = st.records().unwrap();
    assert_eq!(StimRecord::new(12, 1.5, vec![1.6, 1.7]), recs[1]);
}

#[test]
fn export_without_strobes() {
    let dir = common::scratch();
    fs::write(
        dir.path().join(STIMTIMES_PLEXON),
        "StimulusTrigger\tFrameTrigger\n1.0\t1.1\n2.0\t2.1\n",
    )
    .unwrap();
    let st = plexon::stimtimes(dir.path()).unwrap();
    assert_eq!(None, st.stim_ids);
    assert_eq!(None, st.records());
    assert_eq!(vec![vec![1.1], vec![2.1]], st.frames);
}

#[test]
fn bad_cell() {
    let dir = common::scratch();
    fs::write(
        dir.path().join(STIMTIMES_PLEXON),
        "StimulusTrigger\tFrameTrigger\n1.0\t1.1\n2.0\tx\n",
    )
    .unwrap();
    let r = plexon::stimtimes(dir.path());
    assert!(matches!(r, Err(StimError::Format { line: 3, .. })));
}

#[test]
fn missing_export() {
    let dir = common::scratch();
    assert!(matches!(plexon::stimtimes(dir.path()), Err(StimError::NotFound { .. })));
}
