use crate::core::models::Target;
use crate::executors::command::StageOutcome;
use crate::reporters::summary::SummaryRecord;
use colored::*;
use std::time::Duration;

pub fn print_banner(target: &Target) {
    println!(
        "\n{}",
        format!(
            "[ {} v{} ] - Automated Bug Bounty Recon Tool",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
        .cyan()
    );
    println!("\n[+] Recon started for: {}\n", target);
}

pub fn print_stage_header(description: &str) {
    println!();
    println!("{}", format!("[+] {}", description).yellow());
}

pub fn print_stage_warning(outcome: &StageOutcome) {
    eprintln!(
        "{}",
        format!("[!] {} {}", outcome.name, outcome.status).red()
    );
}

pub fn print_missing_tools(missing: &[String]) {
    eprintln!(
        "{}",
        format!("[-] Missing required tools: {}", missing.join(", ")).red()
    );
    eprintln!(
        "{}",
        "Please install the missing tools before running the script.".cyan()
    );
}

/// Green once a stage found something, red when it came back empty.
pub fn count_color(count: usize) -> Color {
    if count > 0 { Color::Green } else { Color::Red }
}

pub fn format_count(label: &str, count: usize) -> String {
    format!(
        " - {}: {}",
        label,
        count.to_string().color(count_color(count))
    )
}

pub fn print_summary(summary: &SummaryRecord, outcomes: &[StageOutcome], elapsed: Duration) {
    println!(
        "\n{}\n",
        format!("[✔] Recon completed for: {}", summary.target).green()
    );
    println!("[Summary]");
    for (label, _, count) in summary.rows() {
        println!("{}", format_count(label, count));
    }
    println!("{}", "-".repeat(50));

    let failed: Vec<&StageOutcome> = outcomes.iter().filter(|o| !o.status.success()).collect();
    if !failed.is_empty() {
        println!("{}", "Stages that did not finish cleanly:".yellow());
        for outcome in failed {
            println!("{}", describe_failure(outcome));
        }
    }

    println!(
        "{}",
        format!("Finished in {:.1}s", elapsed.as_secs_f64()).dimmed()
    );
}

fn describe_failure(outcome: &StageOutcome) -> String {
    format!(
        "  • {} ({}): {}",
        outcome.name,
        outcome.output.file_name(),
        outcome.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stages::StageOutput;
    use crate::executors::command::StageStatus;

    #[test]
    fn failed_stage_names_its_file() {
        let outcome = StageOutcome {
            name: "katana",
            output: StageOutput::JsFiles,
            status: StageStatus::Exited(2),
            lines_written: 0,
            duration: Duration::from_millis(5),
        };
        assert_eq!(
            describe_failure(&outcome),
            "  • katana (js.txt): exited with status 2"
        );
    }

    #[test]
    fn zero_counts_use_the_empty_colour() {
        assert_eq!(count_color(0), Color::Red);
        assert_eq!(count_color(1), Color::Green);
        assert_eq!(count_color(12_000), Color::Green);
    }

    #[test]
    fn count_line_keeps_label_and_number() {
        let line = format_count("URLs with XSS", 4);
        assert!(line.starts_with(" - URLs with XSS: "));
        assert!(line.contains('4'));
    }
}
