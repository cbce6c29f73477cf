mod cli;
mod client;
mod discover;
mod extractor;
mod filter;
mod model;
mod output;
mod utils;

use anyhow::Result;
use extractor::{InspectOptions, Inspection};
use indicatif::{ProgressBar, ProgressStyle};
use model::RunStats;
use utils::Pacing;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = cli::parse_args();

    let token = utils::require_token(args.token.as_deref())?;
    let github = client::GitHub::new(&token, &args.api_url)?;
    let pacing = if args.no_delay {
        Pacing::none()
    } else {
        Pacing::default()
    };
    let opts = InspectOptions {
        include_checksums: args.include_checksums,
        latest_only: args.latest_only,
    };

    println!(
        "🚀 开始查找topics '{}' 下包含AppImage的最新发布版本",
        args.topics.join(", ")
    );
    println!(
        "📝 注意: 只搜索真正的AppImage文件，{}校验和文件",
        if opts.include_checksums { "包括" } else { "不包括" }
    );
    println!(
        "📦 持续发布模式: {}",
        if opts.latest_only { "只保留最新版本" } else { "保留所有版本" }
    );
    println!(
        "🔄 搜索策略: 使用多种排序方式 ({}) 并合并去重",
        args.sorts
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let repos =
        discover::discover_repositories(&github, &args.topics, &args.sorts, args.repos, &pacing);
    if repos.is_empty() {
        println!("未找到任何仓库");
        return Ok(());
    }
    println!("\n找到{}个不重复的仓库，正在检查最新release...", repos.len());

    let pb = ProgressBar::new(repos.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);
    let mut results = Vec::new();
    for repo in &repos {
        pb.set_message(repo.full_name.clone());
        let line = match extractor::inspect_repository(&github, repo, &opts) {
            Inspection::Found(record) => {
                let note = if record.is_continuous_release
                    && record.total_versions > record.appimages_count
                {
                    format!("，持续发布: 在{}个版本中保留最新版本", record.total_versions)
                } else if record.is_continuous_release {
                    " (持续发布)".to_string()
                } else {
                    String::new()
                };
                let line = format!(
                    "  ✓ {} 在release {} 中找到 {} 个AppImage{note}",
                    record.repository_name, record.release_name, record.appimages_count
                );
                results.push(record);
                line
            }
            Inspection::NoRelease(e) => {
                format!("  ✗ {} 未找到release或API错误: {e}", repo.full_name)
            }
            Inspection::NoAppImage { release_name } => {
                format!("  ✗ {} 在release {release_name} 中未找到AppImage", repo.full_name)
            }
        };
        pb.suspend(|| println!("{line}"));
        pb.inc(1);
        utils::pause(pacing.repo);
    }
    pb.finish_and_clear();

    if results.is_empty() {
        println!("❌ 未找到任何包含AppImage的release");
        return Ok(());
    }

    let prefix = utils::resolve_output_prefix(&args.output);
    let files = output::write_results(&results, &prefix)?;
    let stats = RunStats::from_results(&results);

    println!("\n✅ 查找完成！");
    println!("📊 统计:");
    println!(
        "  • 查找的topics: {} (共{}个)",
        args.topics.join(", "),
        args.topics.len()
    );
    println!("  • 有AppImage的仓库数: {}", stats.repos_with_appimages);
    println!("  • 持续发布模式的仓库数: {}", stats.continuous_repos);
    println!("  • 找到的AppImage总数: {}", stats.total_appimages);
    if opts.include_checksums {
        println!("  • 找到的校验和文件数: {}", stats.total_checksums);
    }
    println!("  • 结果保存为:");
    println!("    - 完整JSON: {}", files.json.display());
    println!("    - 简洁摘要: {}", files.summary.display());
    println!("    - CSV表格: {}", files.csv.display());

    Ok(())
}
