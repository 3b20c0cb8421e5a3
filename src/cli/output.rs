//! Output formatting for CLI results

use crate::core::SpectrumReport;
use crate::detection::FeatureKind;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Format an analysis report for terminal output.
pub fn format_report(report: &SpectrumReport, source: &str, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("{BOLD}{source}{RESET}\n"));
    output.push_str(&format!(
        "  {} samples, {:.1}-{:.1} nm, intensity {:.1}-{:.1}\n",
        report.sample_count,
        report.wavelength_range.0,
        report.wavelength_range.1,
        report.intensity_range.0,
        report.intensity_range.1,
    ));

    if report.features.is_empty() {
        output.push_str(&format!("  {YELLOW}No features detected{RESET}\n"));
        return output;
    }

    let tier = report
        .tier_used
        .map(|t| t.name())
        .unwrap_or("custom");
    output.push_str(&format!(
        "  {GREEN}{} feature(s){RESET} {DIM}[{} peaks, {} shoulders, tier: {}]{RESET}\n\n",
        report.stats.total, report.stats.classical, report.stats.shoulders, tier,
    ));

    output.push_str(&format!(
        "  {DIM}{:<6} {:>15} {:>17} {:>10}{RESET}\n",
        "Peak", "Wavelength (nm)", "Intensity (a.u.)", "Kind"
    ));
    for feature in report.features.iter() {
        let kind_color = match feature.kind {
            FeatureKind::Classical => GREEN,
            FeatureKind::Shoulder => CYAN,
        };
        output.push_str(&format!(
            "  {:<6} {:>15.1} {:>17.1} {kind_color}{:>10}{RESET}\n",
            feature.display_label(),
            feature.wavelength,
            feature.intensity,
            feature.kind.name(),
        ));
        if verbose {
            if let Some(prominence) = feature.prominence {
                output.push_str(&format!("  {DIM}       prominence: {prominence:.3}{RESET}\n"));
            }
        }
    }

    output
}
