use crate::cli::SortKey;
use crate::client::{ApiError, GitHubApi};
use crate::model::Repository;
use crate::utils::{Pacing, pause};
use log::{info, warn};
use std::collections::HashSet;

pub const PAGE_SIZE: usize = 100;
pub const MAX_SEARCH_RESULTS: usize = 1000;

/// 按仓库ID去重，保留首次出现的记录和插入顺序
#[derive(Debug, Default)]
pub struct RepoSet {
    seen: HashSet<u64>,
    repos: Vec<Repository>,
}

impl RepoSet {
    pub fn insert(&mut self, repo: Repository) -> bool {
        if !self.seen.insert(repo.id) {
            return false;
        }
        self.repos.push(repo);
        true
    }

    pub fn extend(&mut self, repos: impl IntoIterator<Item = Repository>) {
        for repo in repos {
            self.insert(repo);
        }
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn into_vec(self) -> Vec<Repository> {
        self.repos
    }
}

pub fn get_repos_for_topic_with_sort(
    api: &dyn GitHubApi,
    topic: &str,
    sort: SortKey,
    limit: Option<usize>,
    pacing: &Pacing,
) -> Vec<Repository> {
    info!("🔍 正在搜索topic为\"{topic}\"的仓库 (排序方式: {sort})...");

    let total_count = match api.search_repositories(topic, sort, 1, 1) {
        Ok(page) => page.total_count,
        Err(e) => {
            warn!("错误: 无法获取仓库列表: {e}");
            return vec![];
        }
    };
    if total_count == 0 {
        info!("未找到topic为\"{topic}\"的仓库");
        return vec![];
    }
    info!("找到topic为\"{topic}\"的仓库总数: {total_count}");

    let total = usize::try_from(total_count).unwrap_or(usize::MAX);
    if total > MAX_SEARCH_RESULTS {
        info!("⚠️ 注意: GitHub API限制只能返回前{MAX_SEARCH_RESULTS}个搜索结果（按{sort}排序）");
    }
    let to_fetch = total
        .min(MAX_SEARCH_RESULTS)
        .min(limit.unwrap_or(MAX_SEARCH_RESULTS));
    let total_pages = to_fetch.div_ceil(PAGE_SIZE);
    info!("将获取{to_fetch}个仓库");

    let mut repos = Vec::with_capacity(to_fetch);
    for page in 1..=total_pages {
        info!("  获取第{page}/{total_pages}页...");
        match api.search_repositories(topic, sort, PAGE_SIZE, page) {
            Ok(result) => repos.extend(result.items),
            Err(ApiError::SearchLimit) => {
                info!("  已达到GitHub搜索API限制（最多返回{MAX_SEARCH_RESULTS}条结果）");
                break;
            }
            Err(e) => {
                warn!("错误: 获取第{page}页失败: {e}");
                break;
            }
        }
        if repos.len() >= to_fetch {
            break;
        }
        if page < total_pages {
            pause(pacing.page);
        }
    }
    repos.truncate(to_fetch);

    info!("成功获取了{}个仓库（排序方式: {sort}）", repos.len());
    repos
}

pub fn get_repos_for_topic(
    api: &dyn GitHubApi,
    topic: &str,
    sorts: &[SortKey],
    limit: Option<usize>,
    pacing: &Pacing,
) -> Vec<Repository> {
    info!("开始使用多种排序方式搜索topic为\"{topic}\"的仓库...");
    let mut unique = RepoSet::default();
    let mut total_fetched = 0;

    for (i, sort) in sorts.iter().enumerate() {
        let repos = get_repos_for_topic_with_sort(api, topic, *sort, limit, pacing);
        total_fetched += repos.len();
        unique.extend(repos);
        info!(
            "当前已获取{}个不重复仓库（处理了{total_fetched}个结果）",
            unique.len()
        );
        if i + 1 < sorts.len() {
            info!("等待{}秒后继续下一种排序方式...", pacing.sort.as_secs_f32());
            pause(pacing.sort);
        }
    }

    if unique.is_empty() {
        info!("未找到topic为\"{topic}\"的任何仓库");
    } else {
        info!(
            "最终获取了{}个不重复仓库（总共处理了{total_fetched}个结果）",
            unique.len()
        );
    }
    unique.into_vec()
}

pub fn discover_repositories(
    api: &dyn GitHubApi,
    topics: &[String],
    sorts: &[SortKey],
    limit: Option<usize>,
    pacing: &Pacing,
) -> Vec<Repository> {
    let mut all = RepoSet::default();
    for topic in topics {
        all.extend(get_repos_for_topic(api, topic, sorts, limit, pacing));
    }
    all.into_vec()
}
