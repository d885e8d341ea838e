use crate::core::models::{RunDir, Target};
use crate::core::stages::StageOutput;
use crate::utils::fs::read_result_lines;

/// Per-stage results read back after the pipeline has finished.
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub target: String,
    /// Result lines of every list stage, in summary order.
    pub stages: Vec<(StageOutput, Vec<String>)>,
    /// Only the headline count is kept for scan findings.
    pub findings: usize,
}

impl SummaryRecord {
    pub fn collect(target: &Target, run_dir: &RunDir) -> Self {
        let stages = StageOutput::ALL
            .into_iter()
            .filter(|output| *output != StageOutput::Findings)
            .map(|output| (output, read_result_lines(run_dir.path_of(output))))
            .collect();
        let findings = read_result_lines(run_dir.path_of(StageOutput::Findings)).len();

        Self {
            target: target.to_string(),
            stages,
            findings,
        }
    }

    pub fn count(&self, output: StageOutput) -> usize {
        if output == StageOutput::Findings {
            return self.findings;
        }
        self.stages
            .iter()
            .find(|(o, _)| *o == output)
            .map_or(0, |(_, lines)| lines.len())
    }

    /// `(console label, file label, count)` for every stage, in report order.
    pub fn rows(&self) -> Vec<(&'static str, &'static str, usize)> {
        StageOutput::ALL
            .into_iter()
            .map(|output| {
                let (console, file) = labels(output);
                (console, file, self.count(output))
            })
            .collect()
    }
}

fn labels(output: StageOutput) -> (&'static str, &'static str) {
    match output {
        StageOutput::Subdomains => ("Total Subdomains Found", "Total Subdomains"),
        StageOutput::LiveHosts => ("Live Subdomains (httpx)", "Live Subdomains"),
        StageOutput::JsFiles => ("JS Files Extracted (Katana)", "JS Files"),
        StageOutput::Wayback => ("Wayback URLs Extracted", "Wayback URLs"),
        StageOutput::Params => ("Gau URLs with Params", "Gau URLs"),
        StageOutput::Xss => ("URLs with XSS", "XSS URLs"),
        StageOutput::Sqli => ("URLs with SQLI", "SQLI URLs"),
        StageOutput::Lfi => ("URLs with LFI", "LFI URLs"),
        StageOutput::Redirect => ("URLs with REDIRECT", "REDIRECT URLs"),
        StageOutput::Findings => ("Nuclei Findings (All)", "Nuclei Findings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn run_dir(base: &Path) -> (Target, RunDir) {
        let target = Target::parse("example.com").unwrap();
        let dir = RunDir::new(base, &target);
        fs::create_dir_all(&dir.root).unwrap();
        (target, dir)
    }

    #[test]
    fn duplicates_are_counted_not_merged() {
        let base = tempfile::tempdir().unwrap();
        let (target, dir) = run_dir(base.path());
        fs::write(
            dir.path_of(StageOutput::Subdomains),
            "a.example.com\nb.example.com\nb.example.com\n",
        )
        .unwrap();

        let summary = SummaryRecord::collect(&target, &dir);
        assert_eq!(summary.count(StageOutput::Subdomains), 3);
        assert_eq!(summary.rows()[0], ("Total Subdomains Found", "Total Subdomains", 3));
    }

    #[test]
    fn blank_lines_do_not_count() {
        let base = tempfile::tempdir().unwrap();
        let (target, dir) = run_dir(base.path());
        fs::write(
            dir.path_of(StageOutput::Findings),
            "f1\n\nf2\nf3\n   \nf4\nf5\n",
        )
        .unwrap();

        let summary = SummaryRecord::collect(&target, &dir);
        assert_eq!(summary.findings, 5);
        assert_eq!(summary.count(StageOutput::Findings), 5);
    }

    #[test]
    fn missing_files_count_as_zero() {
        let base = tempfile::tempdir().unwrap();
        let (target, dir) = run_dir(base.path());

        let summary = SummaryRecord::collect(&target, &dir);
        assert_eq!(summary.stages.len(), 9);
        assert!(summary.rows().iter().all(|(_, _, count)| *count == 0));
    }
}
