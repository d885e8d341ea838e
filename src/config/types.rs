use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const REQUIRED_TOOLS: &[&str] = &[
    "subfinder",
    "httpx",
    "waybackurls",
    "gau",
    "gf",
    "nuclei",
    "katana",
];

const REDIRECT_PARAMS: &[&str] = &[
    "redirect_url=", "next=", "url=", "target=", "rurl=", "dest=", "destination=",
    "redir=", "redirect_uri=", "redirect=", "out=", "view=", "loginto=", "image_url=",
    "go=", "return=", "returnTo=", "return_to=", "checkout_url=", "continue=",
    "return_path=", "success=", "data=", "qurl=", "login=", "logout=", "ext=",
    "clickurl=", "goto=", "rit_url=", "forward_url=", "forward=", "pic=",
    "callback_url=", "jump=", "jump_url=", "clicku=", "originUrl=", "origin=", "Url=",
    "desturl=", "u=", "page=", "u1=", "action=", "action_url=", "sp_url=", "service=",
    "recurl=", "uri=", "q=", "link=", "src=", "tcsrc=", "linkAddress=", "location=",
    "burl=", "request=", "backurl=", "return_uri=", "RedirectUrl=", "Redirect=",
    "ReturnUrl=",
];

pub fn default_required_tools() -> Vec<String> {
    REQUIRED_TOOLS.iter().map(|s| s.to_string()).collect()
}

pub fn default_redirect_params() -> Vec<String> {
    REDIRECT_PARAMS.iter().map(|s| s.to_string()).collect()
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Parent of every per-domain run directory.
    pub output_root: PathBuf,
    /// Executables that must resolve before the pipeline starts.
    pub required_tools: Vec<String>,
    /// `name=` fragments marking open-redirect candidates.
    pub redirect_params: Vec<String>,
    /// Overrides `PATH` for tool lookup.
    pub search_path: Option<String>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            required_tools: default_required_tools(),
            redirect_params: default_redirect_params(),
            search_path: None,
        }
    }
}
