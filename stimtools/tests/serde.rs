use std::fs;
use std::path::Path;
use stimtools::{de, ser, StimError, StimRecord};

mod common;
use common::assert_close;

/// Serialize and deserialize records through a buffer
#[test]
fn serde_buffer() {
    let records = vec![
        StimRecord::new(1, 0.0, vec![0.1, 0.2]),
        StimRecord::new(2, 1.0, vec![1.1]),
    ];
    let mut b: Vec<u8> = Vec::new();
    ser::stimtimes(&mut b, &records).unwrap();
    assert_eq!(
        "1 0.00000 0.10000 0.20000\n2 1.00000 1.10000\n\n",
        String::from_utf8(b.clone()).unwrap()
    );
    let records2 = de::stimtimes(&*b, Path::new("buffer")).unwrap();
    assert_eq!(records, records2);
}

/// Write to a fresh file and read it back
#[test]
fn serde_file() {
    let dir = common::scratch();
    let path = dir.path().join("stimtimes.txt");
    let records = vec![
        StimRecord::new(1, 0.0, vec![0.1, 0.2]),
        StimRecord::new(2, 1.0, vec![1.1]),
    ];
    ser::stimtimes_file(&path, &records).unwrap();
    let back = de::stimtimes_file(&path).unwrap();
    let ids: Vec<i64> = back.iter().map(|r| r.stim_id).collect();
    assert_eq!(vec![1, 2], ids);
    let onsets: Vec<f64> = back.iter().map(|r| r.onset).collect();
    assert_close(&[0.0, 1.0], &onsets);
    assert_close(&[0.1, 0.2], back[0].frames.as_ref().unwrap());
    assert_close(&[1.1], back[1].frames.as_ref().unwrap());
}

/// Times survive to 5 decimal places in their original order
#[test]
fn serde_precision() {
    let records: Vec<StimRecord> = (0..50)
        .map(|i| {
            let onset = i as f64 * 1.234567 + 0.000004;
            let frames = (0..(i % 7)).map(|k| onset + 0.0166667 * k as f64).collect();
            StimRecord::new(i * 3, onset, frames)
        })
        .collect();
    let mut b: Vec<u8> = Vec::new();
    ser::stimtimes(&mut b, &records).unwrap();
    let back = de::stimtimes(&*b, Path::new("buffer")).unwrap();
    assert_eq!(records.len(), back.len());
    for (a, r) in records.iter().zip(back.iter()) {
        assert_eq!(a.stim_id, r.stim_id);
        assert!((a.onset - r.onset).abs() <= 5e-6 + 1e-12);
        assert_close(a.frames.as_ref().unwrap(), r.frames.as_ref().unwrap());
    }
}

/// No frame field and zero frames both read back as an empty frame list
#[test]
fn serde_without_frames() {
    let records = vec![StimRecord::onset_only(1, 0.5), StimRecord::new(2, 1.5, vec![])];
    let mut b: Vec<u8> = Vec::new();
    ser::stimtimes(&mut b, &records).unwrap();
    assert_eq!("1 0.50000\n2 1.50000\n\n", String::from_utf8(b.clone()).unwrap());
    let back = de::stimtimes(&*b, Path::new("buffer")).unwrap();
    assert_eq!(Some(vec![]), back[0].frames);
    assert_eq!(Some(vec![]), back[1].frames);
}

#[test]
fn write_refuses_existing_file() {
    let dir = common::scratch();
    let path = dir.path().join("existing.txt");
    fs::write(&path, "test").unwrap();
    let r = ser::stimtimes_file(&path, &[StimRecord::new(1, 0.0, vec![])]);
    assert!(matches!(r, Err(StimError::AlreadyExists { .. })));
    assert_eq!(b"test".to_vec(), fs::read(&path).unwrap());
    let r = ser::times_file(&path, &[0.5]);
    assert!(matches!(r, Err(StimError::AlreadyExists { .. })));
    assert_eq!(b"test".to_vec(), fs::read(&path).unwrap());
}

#[test]
fn read_missing_file() {
    let dir = common::scratch();
    let r = de::stimtimes_file(&dir.path().join("nonexistent.txt"));
    assert!(matches!(r, Err(StimError::NotFound { .. })));
}

#[test]
fn read_skips_blank_lines_and_truncates_ids() {
    let text = "\n5 10.50000 10.60000 10.70000\r\n\n   \n7.9 11.00000\n";
    let back = de::stimtimes(text.as_bytes(), Path::new("buffer")).unwrap();
    assert_eq!(2, back.len());
    assert_eq!(5, back[0].stim_id);
    assert_close(&[10.6, 10.7], back[0].frames.as_ref().unwrap());
    assert_eq!(7, back[1].stim_id);
}

#[test]
fn read_reports_bad_line() {
    let text = "1 0.00000 0.10000\n2 1.00000 abc\n";
    match de::stimtimes(text.as_bytes(), Path::new("dir/stimtimes.txt")) {
        Err(StimError::Format { path, line, .. }) => {
            assert_eq!(Path::new("dir/stimtimes.txt"), path);
            assert_eq!(2, line);
        }
        r => panic!("unexpected {:?}", r),
    }
    // An id without an onset is not a record
    let r = de::stimtimes("1\n".as_bytes(), Path::new("x"));
    assert!(matches!(r, Err(StimError::Format { line: 1, .. })));
}

#[test]
fn times_roundtrip() {
    let dir = common::scratch();
    let path = dir.path().join("verticalblanking.txt");
    ser::times_file(&path, &[0.51, 0.52, 1.51]).unwrap();
    assert_eq!("0.51000\n0.52000\n1.51000\n", fs::read_to_string(&path).unwrap());
    assert_close(&[0.51, 0.52, 1.51], &de::times_file(&path).unwrap());
}

#[test]
fn samples_from_tsv() {
    let text = "0.000\t0\n0.001\t1\n0.002\t1281\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_reader(text.as_bytes());
    let (time, words) = de::samples_tsv(&mut rdr, Path::new("samples.tsv")).unwrap();
    assert_eq!(vec![0, 1, 1281], words);
    assert_close(&[0.0, 0.001, 0.002], &time);

    let text = "0.000\t0\n0.001\t70000\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_reader(text.as_bytes());
    let r = de::samples_tsv(&mut rdr, Path::new("samples.tsv"));
    assert!(matches!(r, Err(StimError::Format { line: 2, .. })));
}
