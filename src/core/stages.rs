//! The fixed recon pipeline, expressed as data.
//!
//! Every stage is a structured record rather than a shell string: the program
//! and its arguments are rendered straight into an argv, and the `grep`/`sed`/
//! `sort -u` glue between tools is applied in-process as [`LineFilter`]s.

use regex::{Regex, RegexBuilder};
use std::ffi::OsString;
use std::path::Path;

use super::models::RunDir;

/// One file per stage, in pipeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutput {
    Subdomains,
    LiveHosts,
    Wayback,
    JsFiles,
    Params,
    Xss,
    Sqli,
    Lfi,
    Redirect,
    Findings,
}

impl StageOutput {
    /// Report order.
    pub const ALL: [StageOutput; 10] = [
        StageOutput::Subdomains,
        StageOutput::LiveHosts,
        StageOutput::JsFiles,
        StageOutput::Wayback,
        StageOutput::Params,
        StageOutput::Xss,
        StageOutput::Sqli,
        StageOutput::Lfi,
        StageOutput::Redirect,
        StageOutput::Findings,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            StageOutput::Subdomains => "subs.txt",
            StageOutput::LiveHosts => "livehosts.txt",
            StageOutput::Wayback => "wayback.txt",
            StageOutput::JsFiles => "js.txt",
            StageOutput::Params => "params.txt",
            StageOutput::Xss => "xss.txt",
            StageOutput::Sqli => "sqli.txt",
            StageOutput::Lfi => "lfi.txt",
            StageOutput::Redirect => "redirect.txt",
            StageOutput::Findings => "nuclei.txt",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Arg {
    Literal(&'static str),
    Domain,
    Templates,
    File(StageOutput),
}

#[derive(Clone, Debug)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<Arg>,
}

impl Invocation {
    pub fn new(program: &'static str, args: Vec<Arg>) -> Self {
        Self { program, args }
    }

    pub fn render_args(&self, ctx: &StageContext<'_>) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Literal(s) => OsString::from(s),
                Arg::Domain => OsString::from(ctx.domain),
                Arg::Templates => ctx.templates.as_os_str().to_owned(),
                Arg::File(output) => ctx.run_dir.path_of(*output).into_os_string(),
            })
            .collect()
    }
}

/// Values substituted into invocations for a single run.
pub struct StageContext<'a> {
    pub domain: &'a str,
    pub templates: &'a Path,
    pub run_dir: &'a RunDir,
}

#[derive(Clone, Debug)]
pub enum LineFilter {
    /// Keep lines matching the pattern.
    Retain(Regex),
    /// Replace the first match in every line.
    Rewrite(Regex, &'static str),
}

impl LineFilter {
    pub fn apply(&self, line: String) -> Option<String> {
        match self {
            LineFilter::Retain(re) => re.is_match(&line).then_some(line),
            LineFilter::Rewrite(re, replacement) => {
                Some(re.replace(&line, *replacement).into_owned())
            }
        }
    }
}

pub fn apply_filters(filters: &[LineFilter], line: String) -> Option<String> {
    filters
        .iter()
        .try_fold(line, |line, filter| filter.apply(line))
}

#[derive(Clone, Debug)]
pub struct StageDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// `None` means the stage only filters its input file.
    pub invocation: Option<Invocation>,
    /// Fed to the program's stdin, or filtered directly without a program.
    pub input: Option<StageOutput>,
    pub filters: Vec<LineFilter>,
    /// Sort and de-duplicate before writing.
    pub dedup: bool,
    pub output: StageOutput,
}

impl StageDescriptor {
    fn program(
        name: &'static str,
        description: &'static str,
        invocation: Invocation,
        output: StageOutput,
    ) -> Self {
        Self {
            name,
            description,
            invocation: Some(invocation),
            input: None,
            filters: Vec::new(),
            dedup: false,
            output,
        }
    }

    fn reading(mut self, input: StageOutput) -> Self {
        self.input = Some(input);
        self
    }

    fn filtered(mut self, filter: LineFilter) -> Self {
        self.filters.push(filter);
        self
    }

    fn deduplicated(mut self) -> Self {
        self.dedup = true;
        self
    }
}

/// Builds the case-insensitive alternation used to pick open-redirect
/// candidates out of the parameterised URLs.
pub fn redirect_matcher(params: &[String]) -> Result<Regex, regex::Error> {
    let alternation = params
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation).case_insensitive(true).build()
}

/// The pipeline, in execution order.
pub fn default_pipeline(redirect_params: &[String]) -> Result<Vec<StageDescriptor>, regex::Error> {
    use Arg::{Domain, File, Literal, Templates};

    let gf = |name: &'static str, description: &'static str, class: &'static str, output| {
        StageDescriptor::program(
            name,
            description,
            Invocation::new("gf", vec![Literal(class)]),
            output,
        )
        .reading(StageOutput::Params)
        .deduplicated()
    };

    Ok(vec![
        StageDescriptor::program(
            "subfinder",
            "Running Subfinder...",
            Invocation::new("subfinder", vec![Literal("-d"), Domain, Literal("-silent")]),
            StageOutput::Subdomains,
        ),
        StageDescriptor::program(
            "httpx",
            "Running Httpx...",
            Invocation::new("httpx", vec![Literal("-silent")]),
            StageOutput::LiveHosts,
        )
        .reading(StageOutput::Subdomains),
        StageDescriptor::program(
            "waybackurls",
            "Extracting URLs from Wayback...",
            Invocation::new("waybackurls", vec![]),
            StageOutput::Wayback,
        )
        .reading(StageOutput::Subdomains),
        StageDescriptor::program(
            "katana",
            "Extracting JS files using Katana...",
            Invocation::new("katana", vec![Literal("-jc"), Literal("-d"), Literal("5")]),
            StageOutput::JsFiles,
        )
        .reading(StageOutput::LiveHosts)
        .filtered(LineFilter::Retain(Regex::new(r"\.js$")?)),
        StageDescriptor::program(
            "gau",
            "Running gau...",
            Invocation::new("gau", vec![Literal("--subs"), Domain]),
            StageOutput::Params,
        )
        .filtered(LineFilter::Rewrite(Regex::new("=.*")?, "=")),
        gf(
            "gf-xss",
            "Filtering URLs for potential XSS endpoints...",
            "xss",
            StageOutput::Xss,
        ),
        gf(
            "gf-sqli",
            "Filtering URLs for potential SQLi endpoints...",
            "sqli",
            StageOutput::Sqli,
        ),
        gf(
            "gf-lfi",
            "Filtering URLs for potential LFI endpoints...",
            "lfi",
            StageOutput::Lfi,
        ),
        StageDescriptor {
            name: "redirect",
            description: "Filtering URLs for potential REDIRECT endpoints...",
            invocation: None,
            input: Some(StageOutput::Params),
            filters: vec![LineFilter::Retain(redirect_matcher(redirect_params)?)],
            dedup: true,
            output: StageOutput::Redirect,
        },
        StageDescriptor::program(
            "nuclei",
            "Running Nuclei (All Severities)...",
            Invocation::new(
                "nuclei",
                vec![
                    Literal("-l"),
                    File(StageOutput::LiveHosts),
                    Literal("-t"),
                    Templates,
                ],
            ),
            StageOutput::Findings,
        ),
    ])
}
