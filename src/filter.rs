use crate::model::{AppImageAsset, Asset, ChecksumAsset};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const CHECKSUM_SUFFIXES: [&str; 7] = [
    ".sha256",
    ".sha256sum",
    ".md5",
    ".sha1",
    ".asc",
    ".sig",
    ".sum",
];
const CHECKSUM_MARKERS: [&str; 3] = [".sha256", ".md5", ".asc"];
const CONTINUOUS_KEYWORDS: [&str; 6] = [
    "continuous",
    "continous",
    "latest",
    "nightly",
    "daily",
    "current",
];

// 顺序即优先级：两侧分隔 -> 左侧分隔(可带v) -> 任意位置
static VERSION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"[-_](\d+(?:\.\d+)+)[-_]").expect("valid regex"),
        Regex::new(r"[-_]v?(\d+(?:\.\d+)+)").expect("valid regex"),
        Regex::new(r"(\d+(?:\.\d+)+)").expect("valid regex"),
    ]
});

static UNICODE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("valid regex"));

/// major.minor.patch，按分量比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct VersionTuple(pub u64, pub u64, pub u64);

pub fn is_appimage_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    if CHECKSUM_SUFFIXES.iter().any(|suf| lower.ends_with(suf)) {
        return false;
    }
    lower.ends_with(".appimage")
}

pub fn is_checksum_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    CHECKSUM_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn extract_version_from_filename(filename: &str) -> Option<String> {
    VERSION_PATTERNS.iter().find_map(|re| {
        re.captures(filename)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

pub fn parse_version(version: Option<&str>) -> VersionTuple {
    let Some(version) = version.filter(|v| !v.is_empty()) else {
        return VersionTuple::default();
    };
    let mut parts = version
        .split('.')
        .map(parse_component)
        .chain(std::iter::repeat(0));
    VersionTuple(
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// 非数字分量记为0，超出u64时取u64::MAX
fn parse_component(component: &str) -> u64 {
    if component.is_empty() {
        return 0;
    }
    let mut value: u64 = 0;
    for ch in component.chars() {
        let Some(digit) = digit_value(ch) else {
            return 0;
        };
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
    }
    value
}

// Unicode的Nd字符总是以0..9连续成段排列
fn digit_value(ch: char) -> Option<u32> {
    if let Some(d) = ch.to_digit(10) {
        return Some(d);
    }
    let is_digit = |c: char| UNICODE_DIGIT.is_match(c.encode_utf8(&mut [0; 4]));
    if !is_digit(ch) {
        return None;
    }
    let mut start = u32::from(ch);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((u32::from(ch) - start) % 10)
}

pub fn is_continuous_release(release_name: &str, appimages: &[AppImageAsset]) -> bool {
    let name = release_name.to_lowercase();
    if CONTINUOUS_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return true;
    }
    let versions: HashSet<String> = appimages
        .iter()
        .filter_map(|a| extract_version_from_filename(&a.name))
        .collect();
    versions.len() >= 3
}

/// 版本号最高者优先；都无法解析版本时取创建时间最新者。并列时保留列表中靠前的一个。
pub fn find_latest_version(appimages: &[AppImageAsset]) -> Option<&AppImageAsset> {
    let mut best: Option<(&AppImageAsset, VersionTuple)> = None;
    for app in appimages {
        let Some(version) = extract_version_from_filename(&app.name) else {
            continue;
        };
        let parsed = parse_version(Some(&version));
        if best.is_none_or(|(_, top)| parsed > top) {
            best = Some((app, parsed));
        }
    }
    if let Some((app, _)) = best {
        return Some(app);
    }

    let mut newest: Option<&AppImageAsset> = None;
    for app in appimages {
        if newest.is_none_or(|top| app.created_at > top.created_at) {
            newest = Some(app);
        }
    }
    newest
}

pub fn filter_appimages(
    assets: &[Asset],
    include_checksums: bool,
) -> (Vec<AppImageAsset>, Vec<ChecksumAsset>) {
    let mut appimages = vec![];
    let mut checksums = vec![];
    for asset in assets {
        if is_appimage_file(&asset.name) {
            appimages.push(AppImageAsset::from(asset));
        } else if include_checksums && is_checksum_file(&asset.name) {
            checksums.push(ChecksumAsset::from(asset));
        }
    }
    (appimages, checksums)
}
