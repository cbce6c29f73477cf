use serde::{Deserialize, Serialize};

/// 搜索接口返回的一页仓库
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Repository>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub published_at: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// release名称为空时退回到tag
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_count: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AppImageAsset {
    pub name: String,
    pub download_url: String,
    pub size: u64,
    pub download_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Asset> for AppImageAsset {
    fn from(asset: &Asset) -> Self {
        AppImageAsset {
            name: asset.name.clone(),
            download_url: asset.browser_download_url.clone(),
            size: asset.size,
            download_count: asset.download_count,
            created_at: asset.created_at.clone().unwrap_or_default(),
            updated_at: asset.updated_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChecksumAsset {
    pub name: String,
    pub download_url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Asset> for ChecksumAsset {
    fn from(asset: &Asset) -> Self {
        ChecksumAsset {
            name: asset.name.clone(),
            download_url: asset.browser_download_url.clone(),
            size: asset.size,
            kind: "checksum".to_string(),
        }
    }
}

/// 每个含AppImage的仓库一条记录，`appimages_count` 始终等于 `appimages.len()`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppImageRelease {
    pub repository_name: String,
    pub repository_url: String,
    pub repository_stars: u64,
    pub repository_description: Option<String>,
    pub release_tag: String,
    pub release_name: String,
    pub release_url: String,
    pub release_date: Option<String>,
    pub release_body: Option<String>,
    pub is_continuous_release: bool,
    pub appimages_count: usize,
    pub total_versions: usize,
    pub appimages: Vec<AppImageAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksums: Option<Vec<ChecksumAsset>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub repos_with_appimages: usize,
    pub continuous_repos: usize,
    pub total_appimages: usize,
    pub total_checksums: usize,
}

impl RunStats {
    pub fn from_results(results: &[AppImageRelease]) -> Self {
        let mut stats = RunStats::default();
        for item in results {
            stats.repos_with_appimages += 1;
            stats.total_appimages += item.appimages_count;
            if item.is_continuous_release {
                stats.continuous_repos += 1;
            }
            if let Some(checksums) = &item.checksums {
                stats.total_checksums += checksums.len();
            }
        }
        stats
    }
}
