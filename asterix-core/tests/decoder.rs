//! End-to-end tests of the decoder façade: blocks in, callbacks out.

use std::sync::{Arc, Mutex};

use asterix_core::{AsterixError, AsterixMessage, Category, Decoder, Property, TrackFlags, TrackReport, Version};

/// CAT048: I048/010, 140, 040 and, after FX, 161.
fn cat048_track(sac: u8, sic: u8, track: u16) -> Vec<u8> {
    vec![
        0xD1, 0x10, // FSPEC
        sac, sic, // I048/010
        0x00, 0x40, 0x00, // I048/140: 128 s
        0x01, 0x00, 0x40, 0x00, // I048/040: 1 NM, 90 deg
        (track >> 8) as u8, track as u8, // I048/161
    ]
}

fn block(cat: u8, records: &[Vec<u8>]) -> Vec<u8> {
    let body = records.concat();
    let len = body.len() + 3;
    let mut out = vec![cat, (len >> 8) as u8, len as u8];
    out.extend(body);
    out
}

/// Collect (category, SAC) of every dispatched record.
fn collect_all(decoder: &mut Decoder) -> Arc<Mutex<Vec<(u8, u8)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    decoder.install_default_handler(move |cat: Category, msg: &AsterixMessage| {
        let sac = msg.get::<u8>(Property::Sac).unwrap_or(0);
        sink.lock().unwrap().push((cat.code(), sac));
    });
    seen
}

#[test]
fn test_sac_filter_passes_m_of_n() {
    let records: Vec<Vec<u8>> = [1, 7, 1, 7, 1].iter().map(|&sac| cat048_track(sac, 2, 10)).collect();
    let data = block(48, &records);

    let mut decoder = Decoder::new();
    let seen = collect_all(&mut decoder);
    decoder.set_expected_sac(1);
    let summary = decoder.decode(&data).unwrap();

    assert_eq!(summary.records, 3);
    assert_eq!(summary.filtered, 2);
    assert_eq!(*seen.lock().unwrap(), vec![(48, 1); 3]);

    // SAC 0 accepts everything
    decoder.set_expected_sac(0);
    assert_eq!(decoder.decode(&data).unwrap().records, 5);
}

#[test]
fn test_truncated_block_strict_and_permissive() {
    let mut data = block(48, &[cat048_track(1, 2, 1), cat048_track(1, 2, 2)]);
    // Declares 500 bytes; carries one whole record and half of another
    data.extend([48, 0x01, 0xF4]);
    data.extend(cat048_track(1, 2, 3));
    data.extend(&cat048_track(1, 2, 4)[..6]);

    let mut strict = Decoder::new();
    let seen = collect_all(&mut strict);
    match strict.decode(&data) {
        Err(AsterixError::Truncated { needed, .. }) => assert_eq!(needed, 500),
        other => panic!("expected truncation, got {other:?}"),
    }
    // Only the complete block was dispatched
    assert_eq!(seen.lock().unwrap().len(), 2);

    let mut permissive = Decoder::new();
    permissive.set_permissive(true);
    let tracks = Arc::new(Mutex::new(Vec::new()));
    let sink = tracks.clone();
    permissive.install_default_handler(move |_, msg| {
        sink.lock().unwrap().push(msg.get::<u16>(Property::TrackNumber).unwrap_or(0));
    });
    let summary = permissive.decode(&data).unwrap();
    assert!(summary.truncated);
    assert_eq!(summary.blocks, 2);
    assert_eq!(summary.records, 3);
    assert_eq!(summary.failed_records, 1);
    assert_eq!(*tracks.lock().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_every_prefix_is_ok_or_truncated() {
    let mut data = block(48, &[cat048_track(1, 2, 42)]);
    data.extend(block(34, &[vec![0xF8, 0x01, 0x02, 0x01, 0x00, 0x00, 0x80, 0x00, 0x02, 0x00]]));
    data.extend(block(62, &[vec![0x80, 0x01, 0x02]]));

    for cut in 0..=data.len() {
        let mut decoder = Decoder::new();
        match decoder.decode(&data[..cut]) {
            Ok(_) | Err(AsterixError::Truncated { .. }) => {}
            Err(e) => panic!("prefix of {cut} bytes: {e}"),
        }
        let mut permissive = Decoder::new();
        permissive.set_permissive(true);
        assert!(permissive.decode(&data[..cut]).is_ok());
    }
}

#[test]
fn test_decoding_is_deterministic() {
    let mut data = block(48, &[cat048_track(1, 2, 42), cat048_track(3, 4, 43)]);
    data.extend(block(34, &[vec![0xF8, 0x01, 0x02, 0x01, 0x00, 0x00, 0x80, 0x00, 0x02, 0x00]]));

    let run = || {
        let mut decoder = Decoder::new();
        let out = Arc::new(Mutex::new(Vec::new()));
        let sink = out.clone();
        decoder.install_default_handler(move |_, msg| {
            sink.lock().unwrap().push(serde_json::to_string(msg).unwrap());
        });
        let tracks = Arc::new(Mutex::new(Vec::new()));
        let track_sink = tracks.clone();
        decoder.install_track_handler(move |t| track_sink.lock().unwrap().push(serde_json::to_string(t).unwrap()));
        decoder.decode(&data).unwrap();
        let messages = out.lock().unwrap().clone();
        let reports = tracks.lock().unwrap().clone();
        (messages, reports)
    };

    let first = run();
    assert_eq!(first.0.len(), 3);
    assert_eq!(first.1.len(), 2);
    assert_eq!(first, run());
}

#[test]
fn test_cat048_track_report() {
    let mut decoder = Decoder::new();
    let reports: Arc<Mutex<Vec<TrackReport>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    decoder.install_track_handler(move |t| sink.lock().unwrap().push(t.clone()));

    decoder.decode(&block(48, &[cat048_track(1, 2, 42)])).unwrap();

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    let t = &reports[0];
    assert_eq!(t.category, 48);
    assert_eq!(t.sac, Some(1));
    assert_eq!(t.sic, Some(2));
    assert_eq!(t.track_number, Some(42));
    assert!((t.range_m.unwrap() - 1852.0).abs() < 1e-6);
    assert!((t.bearing_deg.unwrap() - 90.0).abs() < 1e-6);
    assert_eq!(t.time_of_day, Some(128.0));
    assert!(!t.flags.contains(TrackFlags::PLOT));
}

#[test]
fn test_north_marker_status_callback() {
    let mut decoder = Decoder::new();
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let sink = statuses.clone();
    decoder.install_status_handler(move |s| sink.lock().unwrap().push(s.clone()));
    let tracks = Arc::new(Mutex::new(0));
    let track_sink = tracks.clone();
    decoder.install_track_handler(move |_| *track_sink.lock().unwrap() += 1);

    // I034/010, 000 (north marker), 030, 020, 041
    let record = vec![0xF8, 0x01, 0x02, 0x01, 0x00, 0x00, 0x80, 0x00, 0x02, 0x00];
    decoder.decode(&block(34, &[record])).unwrap();

    let statuses = statuses.lock().unwrap();
    assert_eq!(statuses.len(), 1);
    assert!(statuses[0].north_marker);
    assert_eq!(statuses[0].time_of_day, Some(1.0));
    assert_eq!(statuses[0].rotation_period_s, Some(4.0));
    assert_eq!(*tracks.lock().unwrap(), 0);
}

#[test]
fn test_permissive_record_is_nogo() {
    // I062/010 then FRN 2, which is spare
    let data = block(62, &[vec![0xC0, 0x01, 0x02]]);

    let mut strict = Decoder::new();
    let summary = strict.decode(&data).unwrap();
    assert_eq!(summary.failed_records, 1);
    assert_eq!(summary.records, 0);

    let mut permissive = Decoder::new();
    permissive.set_permissive(true);
    let nogo = Arc::new(Mutex::new(Vec::new()));
    let sink = nogo.clone();
    permissive.install_handler(62, move |_, msg| sink.lock().unwrap().push(msg.is_nogo()));
    let summary = permissive.decode(&data).unwrap();
    assert_eq!(summary.partial, 1);
    assert_eq!(*nogo.lock().unwrap(), vec![true]);
}

#[test]
fn test_cat247_announces_versions() {
    let mut decoder = Decoder::new();
    let versions = Arc::new(Mutex::new(Vec::new()));
    let sink = versions.clone();
    decoder.install_handler(48, move |_, msg| sink.lock().unwrap().push(msg.version()));

    // I247/010, then I247/550 reporting CAT048 1.21
    let announce = block(247, &[vec![0x90, 0x01, 0x02, 0x01, 48, 1, 21]]);
    let mut data = block(48, &[cat048_track(1, 2, 1)]);
    data.extend(announce);
    data.extend(block(48, &[cat048_track(1, 2, 2)]));
    decoder.decode(&data).unwrap();

    assert_eq!(
        *versions.lock().unwrap(),
        vec![Category::Cat048.default_version(), Version::new(1, 21)]
    );
    assert_eq!(decoder.version(48).unwrap(), Version::new(1, 21));

    // An explicit override wins over the announcement
    decoder.set_version(48, Version::new(1, 15)).unwrap();
    assert_eq!(decoder.version(48).unwrap(), Version::new(1, 15));
}
