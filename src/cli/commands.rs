use std::path::Path;

use crate::app::{AppContext, MurmurError, Result};
use crate::cli::CollectArgs;
use crate::collector::{CollectorConfig, SortOrder};
use crate::domain::ProfileRecord;
use crate::export;
use crate::harvest::Harvester;
use crate::scraper::{ChromeScraper, ScraperConfig};
use crate::store::Store;

/// Applies command-line overrides on top of the loaded configuration.
pub fn resolve_configs(ctx: &AppContext, args: &CollectArgs) -> (ScraperConfig, CollectorConfig) {
    let mut scraper = ctx.config.scraper.clone();
    if let Some(port) = args.port {
        scraper.debug_port = port;
    }
    if args.launch {
        scraper.launch = true;
    }

    let mut collector = ctx.config.collector.clone();
    if let Some(max_posts) = args.max_posts {
        collector.target_count = max_posts;
    }
    if args.descending {
        collector.order = SortOrder::Descending;
    }
    if args.keep_fresh {
        collector.freshness = None;
    }

    (scraper, collector)
}

pub async fn collect(ctx: &AppContext, args: &CollectArgs) -> Result<()> {
    let (scraper_config, collector_config) = resolve_configs(ctx, args);
    let delay = scraper_config.subject_delay();

    println!(
        "Collecting {} profile(s), up to {} posts each...",
        args.usernames.len(),
        collector_config.target_count
    );

    let scraper = match ChromeScraper::new(scraper_config).await {
        Ok(scraper) => scraper,
        Err(e) => {
            eprintln!("  ! browser unavailable: {}{}", e, retry_hint(&e));
            return Err(e);
        }
    };
    let harvester = Harvester::new(&scraper, collector_config, delay);
    harvester.install_signal_handlers();

    let report = harvester
        .run(&args.usernames, |profile| {
            ctx.store.save_profile(profile)?;
            print_profile_summary(profile);
            Ok(())
        })
        .await;

    if args.json && !report.profiles.is_empty() {
        let path = export::write_batch(&ctx.results_dir, &report.profiles)?;
        println!("Saved JSON to {}", path.display());
    }

    for (username, e) in &report.failed {
        eprintln!("  ! @{}: {}{}", username, e, retry_hint(e));
    }
    if report.interrupted {
        println!("Interrupted; partial results were saved");
    }
    println!(
        "Done: {} succeeded, {} failed, {} posts",
        report.profiles.len(),
        report.failed.len(),
        report.post_count()
    );

    Ok(())
}

fn retry_hint(e: &MurmurError) -> &'static str {
    if e.is_retriable() {
        " (retry later)"
    } else {
        ""
    }
}

fn print_profile_summary(profile: &ProfileRecord) {
    println!(
        "  + @{} ({}): {} posts ({} original, {} reposts), {} followers",
        profile.username,
        profile.display_name,
        profile.recent_tweets.len(),
        profile.original_count(),
        profile.repost_count(),
        profile.followers
    );
}

pub fn list_profiles(ctx: &AppContext) -> Result<()> {
    let profiles = ctx.store.get_profiles()?;

    if profiles.is_empty() {
        println!("No profiles");
        return Ok(());
    }

    for profile in profiles {
        println!(
            "@{} ({})  {} posts  {} followers\n  {}",
            profile.username,
            profile.display_name,
            profile.post_count,
            profile.followers,
            profile.scraped_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

pub fn show_profile(ctx: &AppContext, username: &str, limit: usize) -> Result<()> {
    let profile = ctx
        .store
        .latest_profile(username)?
        .ok_or_else(|| MurmurError::ProfileNotFound(username.to_string()))?;

    println!("{} (@{})", profile.display_name, profile.username);
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    println!(
        "Location: {}  Followers: {}  Following: {}  Posts: {}  Verified: {}",
        profile.location,
        profile.followers,
        profile.following,
        profile.post_count,
        if profile.verified { "yes" } else { "no" }
    );
    println!("Collected {}", profile.scraped_at.format("%Y-%m-%d %H:%M"));
    println!();

    for post in profile.recent_tweets.iter().take(limit) {
        let marker = if post.is_repost { "RT" } else { "  " };
        let index = post.sequence_index.map(|i| i.to_string()).unwrap_or_default();
        println!(
            "{:>3} {} [{}] {}",
            index, marker, post.published_label, post.primary_text
        );
        let e = &post.engagement;
        println!(
            "       {} likes  {} reposts  {} replies  {} views",
            e.likes, e.reposts, e.replies, e.views
        );
    }

    Ok(())
}

pub fn export_profiles(ctx: &AppContext, path: &Path) -> Result<()> {
    let profiles = ctx.store.latest_profiles()?;

    if profiles.is_empty() {
        println!("No profiles to export");
        return Ok(());
    }

    export::write_profiles(path, &profiles)?;
    println!("Exported {} profiles to {}", profiles.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{Engagement, PostRecord};

    fn context(dir: &Path) -> AppContext {
        AppContext::in_memory(Config::default(), dir.join("results")).unwrap()
    }

    fn args() -> CollectArgs {
        CollectArgs {
            usernames: vec!["jane".into()],
            max_posts: None,
            port: None,
            launch: false,
            descending: false,
            keep_fresh: false,
            json: false,
        }
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.config.collector.freshness = Some(Default::default());

        let (scraper, collector) = resolve_configs(&ctx, &args());
        assert_eq!(scraper.debug_port, 9222);
        assert_eq!(collector.target_count, 50);
        assert!(collector.freshness.is_some());

        let overridden = CollectArgs {
            max_posts: Some(5),
            port: Some(9333),
            launch: true,
            descending: true,
            keep_fresh: true,
            ..args()
        };
        let (scraper, collector) = resolve_configs(&ctx, &overridden);
        assert_eq!(scraper.debug_port, 9333);
        assert!(scraper.launch);
        assert_eq!(collector.target_count, 5);
        assert_eq!(collector.order, SortOrder::Descending);
        assert!(collector.freshness.is_none());
    }

    #[test]
    fn test_retry_hint_only_for_retriable_errors() {
        assert_eq!(retry_hint(&MurmurError::Browser("gone".into())), " (retry later)");
        assert_eq!(retry_hint(&MurmurError::ProfileNotFound("jane".into())), "");
    }

    #[tokio::test]
    async fn test_collect_without_browser_is_retriable() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = collect(&ctx, &CollectArgs { port: Some(port), ..args() })
            .await
            .unwrap_err();
        assert!(matches!(err, MurmurError::Browser(_)));
        assert!(err.is_retriable());
        assert!(ctx.store.get_profiles().unwrap().is_empty());
    }

    #[test]
    fn test_show_unknown_profile() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert!(matches!(
            show_profile(&ctx, "nobody", 10),
            Err(MurmurError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_export_latest_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut profile = ProfileRecord::new("jane", "https://x.com/jane");
        profile
            .recent_tweets
            .push(PostRecord::new("hello world", "hello world", "Aug 9", Engagement::default()));
        ctx.store.save_profile(&profile).unwrap();

        let path = dir.path().join("export.json");
        export_profiles(&ctx, &path).unwrap();

        let exported = export::read_profiles(&path).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].recent_tweets.len(), 1);
        assert!(show_profile(&ctx, "@jane", 5).is_ok());
        assert!(list_profiles(&ctx).is_ok());
    }
}
