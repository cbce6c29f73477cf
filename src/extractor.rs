use crate::client::{ApiError, GitHubApi};
use crate::filter::{filter_appimages, find_latest_version, is_continuous_release};
use crate::model::{AppImageRelease, Release, Repository};
use log::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    pub include_checksums: bool,
    pub latest_only: bool,
}

#[derive(Debug)]
pub enum Inspection {
    Found(AppImageRelease),
    NoRelease(ApiError),
    NoAppImage { release_name: String },
}

pub fn inspect_repository(
    api: &dyn GitHubApi,
    repo: &Repository,
    opts: &InspectOptions,
) -> Inspection {
    match api.latest_release(&repo.full_name) {
        Ok(release) => match build_record(repo, &release, opts) {
            Some(record) => Inspection::Found(record),
            None => Inspection::NoAppImage {
                release_name: release.display_name().to_string(),
            },
        },
        Err(e) => Inspection::NoRelease(e),
    }
}

pub fn build_record(
    repo: &Repository,
    release: &Release,
    opts: &InspectOptions,
) -> Option<AppImageRelease> {
    let (mut appimages, checksums) = filter_appimages(&release.assets, opts.include_checksums);
    if appimages.is_empty() {
        return None;
    }
    let release_name = release.display_name().to_string();
    let continuous = is_continuous_release(&release_name, &appimages);
    let total_versions = appimages.len();

    if continuous && opts.latest_only {
        if let Some(latest) = find_latest_version(&appimages).cloned() {
            debug!(
                "{}: 持续发布，在{total_versions}个版本中保留 {}",
                repo.full_name, latest.name
            );
            appimages = vec![latest];
        }
    }

    Some(AppImageRelease {
        repository_name: repo.full_name.clone(),
        repository_url: repo.html_url.clone(),
        repository_stars: repo.stargazers_count,
        repository_description: repo.description.clone(),
        release_tag: release.tag_name.clone(),
        release_name,
        release_url: release.html_url.clone(),
        release_date: release.published_at.clone(),
        release_body: release.body.clone(),
        is_continuous_release: continuous,
        appimages_count: appimages.len(),
        total_versions,
        appimages,
        checksums: (opts.include_checksums && !checksums.is_empty()).then_some(checksums),
    })
}
