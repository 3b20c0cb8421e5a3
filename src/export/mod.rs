// src/export/mod.rs
//
// CSV surfaces: the two-column signal loader the CLI feeds the engine
// with, and the feature-table exporter external tools consume.

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};

use crate::detection::FeatureSet;

/// One row of an exported feature table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPeak {
    pub number: usize,
    pub wavelength: f64,
    pub intensity: f64,
}

/// Read a two-column `wavelength,intensity` CSV into raw rows.
///
/// A leading header row is tolerated; rows whose first two fields do
/// not parse as numbers are skipped. Signal preparation applies its own
/// finite-value policy afterwards, so no numeric cleanup happens here.
pub fn read_signal<R: Read>(reader: R) -> Result<Vec<(f64, f64)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("reading signal CSV")?;
        if record.len() < 2 {
            continue;
        }
        let wavelength = record[0].parse::<f64>();
        let intensity = record[1].parse::<f64>();
        if let (Ok(w), Ok(i)) = (wavelength, intensity) {
            rows.push((w, i));
        }
    }

    if rows.is_empty() {
        bail!("no numeric wavelength/intensity rows found");
    }
    Ok(rows)
}

/// Write the unified feature list in the export format:
/// `Peak #, Wavelength (nm), Intensity (a.u.)`, one decimal place.
pub fn write_features<W: Write>(writer: W, features: &FeatureSet) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["Peak #", "Wavelength (nm)", "Intensity (a.u.)"])
        .context("writing feature CSV header")?;

    for feature in features.iter() {
        csv_writer
            .write_record([
                feature.label.to_string(),
                format!("{:.1}", feature.wavelength),
                format!("{:.1}", feature.intensity),
            ])
            .context("writing feature CSV row")?;
    }

    csv_writer.flush().context("flushing feature CSV")?;
    Ok(())
}

/// Parse a feature table previously written by [`write_features`].
pub fn read_features<R: Read>(reader: R) -> Result<Vec<ExportedPeak>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut peaks = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("reading feature CSV")?;
        if record.len() < 3 {
            bail!("feature row has {} column(s), expected 3", record.len());
        }
        peaks.push(ExportedPeak {
            number: record[0]
                .parse()
                .with_context(|| format!("bad peak number `{}`", &record[0]))?,
            wavelength: record[1]
                .parse()
                .with_context(|| format!("bad wavelength `{}`", &record[1]))?,
            intensity: record[2]
                .parse()
                .with_context(|| format!("bad intensity `{}`", &record[2]))?,
        });
    }
    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Feature, FeatureSet};

    #[test]
    fn test_read_signal_skips_header() {
        let data = "Wavelength,Intensity\n350.0,10.0\n360.0,20.0\n";
        let rows = read_signal(data.as_bytes()).unwrap();
        assert_eq!(rows, vec![(350.0, 10.0), (360.0, 20.0)]);
    }

    #[test]
    fn test_read_signal_without_header() {
        let data = "350.0,10.0\n360.0,20.0\n";
        let rows = read_signal(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_read_signal_rejects_empty_input() {
        assert!(read_signal("only,text\nrows,here\n".as_bytes()).is_err());
    }

    #[test]
    fn test_export_format_has_header_and_one_decimal() {
        let set = FeatureSet::unify(
            vec![Feature::classical(360.25, 20.04, 10.0)],
            Vec::new(),
            None,
            0.0,
        );
        let mut buffer = Vec::new();
        write_features(&mut buffer, &set).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Peak #,Wavelength (nm),Intensity (a.u.)"));
        assert_eq!(lines.next(), Some("1,360.2,20.0"));
    }
}
