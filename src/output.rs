use crate::filter::{extract_version_from_filename, find_latest_version};
use crate::model::AppImageRelease;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const EMPTY_CSV_MESSAGE: &str = "未找到AppImage发布包";

#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub summary: PathBuf,
}

impl OutputFiles {
    pub fn for_prefix(prefix: &str) -> Self {
        OutputFiles {
            json: PathBuf::from(format!("{prefix}.json")),
            csv: PathBuf::from(format!("{prefix}.csv")),
            summary: PathBuf::from(format!("{prefix}-summary.json")),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    repository_name: &'a str,
    repository_url: &'a str,
    repository_stars: u64,
    repository_description: Option<&'a str>,
    release_tag: &'a str,
    release_name: &'a str,
    release_url: &'a str,
    release_date: Option<&'a str>,
    release_body: Option<&'a str>,
    is_continuous_release: bool,
    appimages_count: usize,
    total_versions: usize,
    appimage_name: Option<&'a str>,
    appimage_version: Option<String>,
    appimage_url: Option<&'a str>,
    appimage_size: Option<u64>,
    download_count: Option<u64>,
}

impl<'a> CsvRow<'a> {
    fn base(item: &'a AppImageRelease) -> Self {
        CsvRow {
            repository_name: &item.repository_name,
            repository_url: &item.repository_url,
            repository_stars: item.repository_stars,
            repository_description: item.repository_description.as_deref(),
            release_tag: &item.release_tag,
            release_name: &item.release_name,
            release_url: &item.release_url,
            release_date: item.release_date.as_deref(),
            release_body: item.release_body.as_deref(),
            is_continuous_release: item.is_continuous_release,
            appimages_count: item.appimages_count,
            total_versions: item.total_versions,
            appimage_name: None,
            appimage_version: None,
            appimage_url: None,
            appimage_size: None,
            download_count: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryItem<'a> {
    repository: &'a str,
    stars: u64,
    release: &'a str,
    release_date: Option<&'a str>,
    is_continuous_release: bool,
    #[serde(flatten)]
    latest: Option<LatestSummary<'a>>,
    appimages: Vec<SummaryAppImage<'a>>,
}

#[derive(Debug, Serialize)]
struct LatestSummary<'a> {
    latest_version: Option<String>,
    latest_appimage: &'a str,
    download_url: &'a str,
    total_versions: usize,
}

#[derive(Debug, Serialize)]
struct SummaryAppImage<'a> {
    name: &'a str,
    version: Option<String>,
    url: &'a str,
    downloads: u64,
}

pub fn write_results(results: &[AppImageRelease], prefix: &str) -> Result<OutputFiles> {
    let files = OutputFiles::for_prefix(prefix);
    write_json(results, &files.json)?;
    write_csv(results, &files.csv)?;
    write_summary(results, &files.summary)?;
    Ok(files)
}

fn write_json(results: &[AppImageRelease], path: &Path) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("无法创建文件 {}", path.display()))?;
    writeln!(f, "{}", serde_json::to_string_pretty(results)?)?;
    Ok(())
}

fn write_csv(results: &[AppImageRelease], path: &Path) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("无法创建文件 {}", path.display()))?;
    if results.is_empty() {
        wtr.write_record([EMPTY_CSV_MESSAGE])?;
    }
    for item in results {
        // 没有AppImage的仓库也保留一行
        if item.appimages.is_empty() {
            wtr.serialize(CsvRow::base(item))?;
        }
        for app in &item.appimages {
            wtr.serialize(CsvRow {
                appimage_name: Some(&app.name),
                appimage_version: extract_version_from_filename(&app.name),
                appimage_url: Some(&app.download_url),
                appimage_size: Some(app.size),
                download_count: Some(app.download_count),
                ..CsvRow::base(item)
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn summarize(item: &AppImageRelease) -> SummaryItem<'_> {
    let latest = if item.is_continuous_release {
        find_latest_version(&item.appimages).map(|app| LatestSummary {
            latest_version: extract_version_from_filename(&app.name),
            latest_appimage: &app.name,
            download_url: &app.download_url,
            total_versions: item.total_versions,
        })
    } else {
        None
    };
    SummaryItem {
        repository: &item.repository_name,
        stars: item.repository_stars,
        release: &item.release_tag,
        release_date: item.release_date.as_deref(),
        is_continuous_release: item.is_continuous_release,
        latest,
        appimages: item
            .appimages
            .iter()
            .map(|app| SummaryAppImage {
                name: &app.name,
                version: extract_version_from_filename(&app.name),
                url: &app.download_url,
                downloads: app.download_count,
            })
            .collect(),
    }
}

fn write_summary(results: &[AppImageRelease], path: &Path) -> Result<()> {
    let summary: Vec<SummaryItem> = results.iter().map(summarize).collect();
    let mut f = File::create(path).with_context(|| format!("无法创建文件 {}", path.display()))?;
    writeln!(f, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppImageAsset;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    fn app(name: &str, downloads: u64) -> AppImageAsset {
        AppImageAsset {
            name: name.to_string(),
            download_url: format!("https://dl.example.com/{name}"),
            size: 2048,
            download_count: downloads,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn record(name: &str, continuous: bool, appimages: Vec<AppImageAsset>) -> AppImageRelease {
        AppImageRelease {
            repository_name: name.to_string(),
            repository_url: format!("https://github.com/{name}"),
            repository_stars: 10,
            repository_description: None,
            release_tag: "continuous".to_string(),
            release_name: "Continuous build".to_string(),
            release_url: format!("https://github.com/{name}/releases/tag/continuous"),
            release_date: Some("2024-01-02T00:00:00Z".to_string()),
            release_body: Some("line one\nline two, with comma".to_string()),
            is_continuous_release: continuous,
            appimages_count: appimages.len(),
            total_versions: 4,
            appimages,
            checksums: None,
        }
    }

    fn sample() -> Vec<AppImageRelease> {
        vec![
            record(
                "o/rolling",
                true,
                vec![
                    app("Tool-1.2.0-x86_64.AppImage", 5),
                    app("Tool-1.10.0-x86_64.AppImage", 7),
                ],
            ),
            record("o/plain", false, vec![app("Plain-x86_64.AppImage", 1)]),
            record("o/empty", false, vec![]),
        ]
    }

    #[test]
    fn writes_three_files() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("out");
        let files = write_results(&sample(), prefix.to_str().unwrap()).unwrap();

        assert_eq!(files.json, dir.path().join("out.json"));
        assert_eq!(files.csv, dir.path().join("out.csv"));
        assert_eq!(files.summary, dir.path().join("out-summary.json"));

        let full: Vec<AppImageRelease> =
            serde_json::from_str(&std::fs::read_to_string(&files.json).unwrap()).unwrap();
        assert_eq!(full, sample());
    }

    #[test]
    fn csv_has_one_row_per_asset() {
        let dir = tempdir().unwrap();
        let files = write_results(&sample(), dir.path().join("r").to_str().unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(&files.csv).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.get(0), Some("repository_name"));
        assert_eq!(headers.get(13), Some("appimage_version"));

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[0][0], "o/rolling");
        assert_eq!(&rows[0][8], "line one\nline two, with comma");
        assert_eq!(&rows[1][12], "Tool-1.10.0-x86_64.AppImage");
        assert_eq!(&rows[1][13], "1.10.0");
        assert_eq!(&rows[2][13], "");
        assert_eq!(&rows[3][0], "o/empty");
        assert_eq!(&rows[3][12], "");
    }

    #[test]
    fn summary_includes_latest_for_continuous() {
        let dir = tempdir().unwrap();
        let files = write_results(&sample(), dir.path().join("s").to_str().unwrap()).unwrap();
        let summary: Value =
            serde_json::from_str(&std::fs::read_to_string(&files.summary).unwrap()).unwrap();

        assert_eq!(
            summary[0],
            json!({
                "repository": "o/rolling",
                "stars": 10,
                "release": "continuous",
                "release_date": "2024-01-02T00:00:00Z",
                "is_continuous_release": true,
                "latest_version": "1.10.0",
                "latest_appimage": "Tool-1.10.0-x86_64.AppImage",
                "download_url": "https://dl.example.com/Tool-1.10.0-x86_64.AppImage",
                "total_versions": 4,
                "appimages": [
                    {"name": "Tool-1.2.0-x86_64.AppImage", "version": "1.2.0",
                     "url": "https://dl.example.com/Tool-1.2.0-x86_64.AppImage", "downloads": 5},
                    {"name": "Tool-1.10.0-x86_64.AppImage", "version": "1.10.0",
                     "url": "https://dl.example.com/Tool-1.10.0-x86_64.AppImage", "downloads": 7}
                ]
            })
        );
        assert!(summary[1].get("latest_version").is_none());
        assert_eq!(summary[1]["appimages"][0]["version"], Value::Null);
        assert_eq!(summary[2]["appimages"], json!([]));
    }

    #[test]
    fn export_is_deterministic() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("again");
        let prefix = prefix.to_str().unwrap();

        let first = write_results(&sample(), prefix).unwrap();
        let read_all = |f: &OutputFiles| {
            [&f.json, &f.csv, &f.summary].map(|p| std::fs::read_to_string(p).unwrap())
        };
        let before = read_all(&first);
        let second = write_results(&sample(), prefix).unwrap();
        assert_eq!(before, read_all(&second));
    }

    #[test]
    fn empty_results_write_placeholder_csv() {
        let dir = tempdir().unwrap();
        let files = write_results(&[], dir.path().join("none").to_str().unwrap()).unwrap();
        let csv = std::fs::read_to_string(&files.csv).unwrap();
        assert_eq!(csv.trim_end(), EMPTY_CSV_MESSAGE);
        let json = std::fs::read_to_string(&files.json).unwrap();
        assert_eq!(json.trim_end(), "[]");
    }
}
