//! Rendering of TTS series.
//!
//! The two plotted relations of the study (TTS over annealing time, success
//! rate over annealing time) are emitted as table columns.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::metric::TtsPoint;
use crate::error::Result;

const CSV_HEADER: &str = "num_sweeps,num_reads,tau_sec,success_count,success_rate_pct,tts_sec";

/// Exporter for a TTS series.
///
/// # Example
///
/// ```
/// use u_qubo::tts::{TtsPoint, TtsReport};
///
/// let points = vec![TtsPoint { num_sweeps: 10, num_reads: 100, tau: 1e-4, success_count: 40, tts: 9e-4 }];
/// let csv = TtsReport::to_csv(&points);
/// assert!(csv.starts_with("num_sweeps,num_reads"));
/// assert!(csv.contains("10,100,"));
/// ```
pub struct TtsReport;

impl TtsReport {
    /// Aligned plain-text table.
    pub fn to_table(points: &[TtsPoint]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>10} {:>14} {:>12} {:>14}",
            "sweeps", "tau [sec]", "success [%]", "TTS [sec]"
        );
        for p in points {
            let _ = writeln!(
                out,
                "{:>10} {:>14.6e} {:>12.1} {:>14.6e}",
                p.num_sweeps,
                p.tau,
                p.success_rate(),
                p.tts
            );
        }
        out
    }

    /// Three lines per point: time per read, success rate, TTS.
    pub fn to_summary(points: &[TtsPoint]) -> String {
        let mut out = String::new();
        for p in points {
            let _ = writeln!(out, "num_sweeps: {}", p.num_sweeps);
            let _ = writeln!(out, "annealing_time: {:.6e} [sec]", p.tau);
            let _ = writeln!(out, "success_rate: {:.1} [%]", p.success_rate());
            let _ = writeln!(out, "TTS: {:.6e} [sec]", p.tts);
        }
        out
    }

    pub fn to_csv(points: &[TtsPoint]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{CSV_HEADER}");
        for p in points {
            let _ = writeln!(
                out,
                "{},{},{:e},{},{:.2},{:e}",
                p.num_sweeps,
                p.num_reads,
                p.tau,
                p.success_count,
                p.success_rate(),
                p.tts
            );
        }
        out
    }

    /// Markdown report with a summary line and one row per sweep count.
    pub fn to_markdown(title: &str, points: &[TtsPoint]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# TTS: {title}\n");
        if let Some(best) = points
            .iter()
            .filter(|p| p.success_count > 0)
            .min_by(|a, b| a.tts.total_cmp(&b.tts))
        {
            let _ = writeln!(
                out,
                "Best TTS: {:.6e} sec at {} sweeps ({:.1}% success)\n",
                best.tts,
                best.num_sweeps,
                best.success_rate()
            );
        }
        let _ = writeln!(out, "| Sweeps | Reads | tau [sec] | Success [%] | TTS [sec] |");
        let _ = writeln!(out, "|-------:|------:|----------:|------------:|----------:|");
        for p in points {
            let _ = writeln!(
                out,
                "| {} | {} | {:.6e} | {:.1} | {:.6e} |",
                p.num_sweeps,
                p.num_reads,
                p.tau,
                p.success_rate(),
                p.tts
            );
        }
        out
    }

    pub fn csv_to_file(points: &[TtsPoint], path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, Self::to_csv(points))?;
        Ok(())
    }

    pub fn markdown_to_file(title: &str, points: &[TtsPoint], path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, Self::to_markdown(title, points))?;
        Ok(())
    }
}
