use anyhow::{Result, bail};
use chrono::Local;
use std::time::Duration;

/// API调用之间的固定等待时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub page: Duration,
    pub sort: Duration,
    pub repo: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            page: Duration::from_secs(1),
            sort: Duration::from_secs(5),
            repo: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Pacing {
            page: Duration::ZERO,
            sort: Duration::ZERO,
            repo: Duration::ZERO,
        }
    }
}

pub fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

pub fn require_token(token: Option<&str>) -> Result<String> {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => bail!("环境变量GITHUB_TOKEN未设置\n请设置: export GITHUB_TOKEN=你的个人访问令牌"),
    }
}

pub fn resolve_output_prefix(output: &str) -> String {
    if output.trim().is_empty() {
        format!("appimage-results-{}", Local::now().format("%Y%m%d-%H%M%S"))
    } else {
        output.to_string()
    }
}
