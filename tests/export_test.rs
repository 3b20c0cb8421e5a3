// tests/export_test.rs
//
// CSV surfaces: signal loading and the feature-table round trip.

use spectracheckr::export::{read_features, read_signal, write_features};
use spectracheckr::{analyze_spectrum, DetectionConfig};

const SPECTRUM_CSV: &str = "\
Wavelength (nm),Intensity (a.u.)
350.0,10.0
360.0,20.0
370.0,12.0
375.0,13.0
380.0,9.0
420.0,50.0
430.0,15.0
";

#[test]
fn loaded_signal_analyzes_like_inline_rows() {
    let rows = read_signal(SPECTRUM_CSV.as_bytes()).unwrap();
    assert_eq!(rows.len(), 7);

    let report = analyze_spectrum(&rows, &DetectionConfig::default()).unwrap();
    assert!(report
        .features
        .iter()
        .any(|f| (f.wavelength - 420.0).abs() < 1e-9));
}

#[test]
fn feature_table_round_trips_at_one_decimal() {
    let rows = read_signal(SPECTRUM_CSV.as_bytes()).unwrap();
    let report = analyze_spectrum(&rows, &DetectionConfig::default()).unwrap();
    assert!(!report.features.is_empty());

    let mut buffer = Vec::new();
    write_features(&mut buffer, &report.features).unwrap();
    let parsed = read_features(buffer.as_slice()).unwrap();

    assert_eq!(parsed.len(), report.features.len());
    for (peak, feature) in parsed.iter().zip(report.features.iter()) {
        assert_eq!(peak.number, feature.label);
        assert!((peak.wavelength - feature.wavelength).abs() < 0.05 + 1e-9);
        assert!((peak.intensity - feature.intensity).abs() < 0.05 + 1e-9);
    }
}

#[test]
fn exported_header_matches_the_documented_format() {
    let rows = read_signal(SPECTRUM_CSV.as_bytes()).unwrap();
    let report = analyze_spectrum(&rows, &DetectionConfig::default()).unwrap();

    let mut buffer = Vec::new();
    write_features(&mut buffer, &report.features).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("Peak #,Wavelength (nm),Intensity (a.u.)\n"));
}

#[test]
fn malformed_feature_rows_are_rejected() {
    let bad = "Peak #,Wavelength (nm),Intensity (a.u.)\n1,not-a-number,10.0\n";
    assert!(read_features(bad.as_bytes()).is_err());
}
