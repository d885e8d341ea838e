use crate::core::errors::ReconError;
use crate::core::models::RunDir;
use crate::reporters::summary::SummaryRecord;
use crate::utils::fs::replace_file;
use anyhow::Result;
use minijinja::{Environment, context};
use serde::Serialize;

const SUMMARY_TEMPLATE: &str = "\
Recon Summary for: {{ target }}
{{ rule }}
{% for row in rows %}
{{ row.label }}: {{ row.count }}
{% endfor %}
";

const LABEL_WIDTH: usize = 21;

#[derive(Serialize)]
struct Row {
    label: String,
    count: usize,
}

pub fn render_summary(summary: &SummaryRecord) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    let template = env.template_from_str(SUMMARY_TEMPLATE)?;

    let rows: Vec<Row> = summary
        .rows()
        .into_iter()
        .map(|(_, label, count)| Row {
            label: format!("{:<width$}", label, width = LABEL_WIDTH),
            count,
        })
        .collect();

    Ok(template.render(context! {
        target => &summary.target,
        rule => "-".repeat(40),
        rows => rows,
    })?)
}

/// Replaces `summary.txt` in the run directory.
pub fn write_summary(summary: &SummaryRecord, dirs: &RunDir) -> Result<(), ReconError> {
    let path = dirs.summary_path();
    render_summary(summary)
        .and_then(|rendered| replace_file(&path, rendered.as_bytes()))
        .map_err(|source| ReconError::Summary {
            path: path.clone(),
            source,
        })?;

    tracing::info!("Summary written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Target;
    use crate::core::stages::StageOutput;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn record(subs: usize, findings: usize) -> SummaryRecord {
        SummaryRecord {
            target: "example.com".into(),
            stages: StageOutput::ALL
                .into_iter()
                .filter(|o| *o != StageOutput::Findings)
                .map(|o| {
                    let n = if o == StageOutput::Subdomains { subs } else { 0 };
                    (o, vec![String::from("x"); n])
                })
                .collect(),
            findings,
        }
    }

    #[test]
    fn renders_fixed_width_plain_text() {
        let rendered = render_summary(&record(3, 2)).unwrap();

        let expected = "\
Recon Summary for: example.com
----------------------------------------
Total Subdomains     : 3
Live Subdomains      : 0
JS Files             : 0
Wayback URLs         : 0
Gau URLs             : 0
XSS URLs             : 0
SQLI URLs            : 0
LFI URLs             : 0
REDIRECT URLs        : 0
Nuclei Findings      : 2
";
        assert_eq!(rendered, expected);
        assert!(!rendered.contains('\u{1b}'));
    }

    #[test]
    fn second_run_overwrites_summary() {
        let base = tempfile::tempdir().unwrap();
        let target = Target::parse("example.com").unwrap();
        let dir = RunDir::new(base.path(), &target);
        fs::create_dir_all(&dir.root).unwrap();

        write_summary(&record(7, 1), &dir).unwrap();
        write_summary(&record(1, 0), &dir).unwrap();

        let content = fs::read_to_string(dir.summary_path()).unwrap();
        assert!(content.contains("Total Subdomains     : 1\n"));
        assert!(!content.contains(": 7"));
        assert_eq!(content.matches("Recon Summary for").count(), 1);
    }
}
