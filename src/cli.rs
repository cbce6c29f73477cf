use clap::{Parser, ValueEnum};
use std::fmt;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug)]
#[command(
    name = "AppImage Topic Finder",
    version,
    about = "查找GitHub指定topic下包含AppImage的最新release，使用多种排序方式搜索并去重，支持持续发布模式，输出JSON、CSV和摘要JSON。"
)]
pub struct Args {
    #[arg(required = true, value_name = "TOPIC", help = "GitHub topic标签 (可提供多个)")]
    pub topics: Vec<String>,
    #[arg(
        long,
        default_value = "appimages",
        help = "输出文件名前缀 (不含扩展名)，默认appimages；传入空字符串时使用带时间戳的文件名"
    )]
    pub output: String,
    #[arg(long, help = "包含校验和文件 (.sha256sum, .md5, 等)")]
    pub include_checksums: bool,
    #[arg(
        long,
        overrides_with = "keep_all",
        help = "对于多版本AppImage的持续发布，只保留最新版本"
    )]
    pub latest_only: bool,
    #[arg(
        long,
        overrides_with = "latest_only",
        help = "保留所有版本的AppImage (默认)"
    )]
    pub keep_all: bool,
    #[arg(
        long,
        value_name = "N",
        help = "每个topic每种排序方式最多获取的仓库数，默认不限 (GitHub最多返回1000个)"
    )]
    pub repos: Option<usize>,
    #[arg(
        long = "sort",
        value_enum,
        value_name = "KEY",
        default_values_t = [
            SortKey::Stars,
            SortKey::Forks,
            SortKey::HelpWantedIssues,
            SortKey::Updated,
        ],
        help = "搜索时使用的排序方式，可重复指定"
    )]
    pub sorts: Vec<SortKey>,
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub访问令牌，默认读取环境变量GITHUB_TOKEN"
    )]
    pub token: Option<String>,
    #[arg(
        long,
        env = "GITHUB_API_URL",
        default_value = DEFAULT_API_URL,
        help = "GitHub API地址"
    )]
    pub api_url: String,
    #[arg(long, help = "不在API请求之间等待 (可能触发速率限制)")]
    pub no_delay: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::HelpWantedIssues => "help-wanted-issues",
            SortKey::Updated => "updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}
