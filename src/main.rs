use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};

use anysonarr::api::models::{AddSeriesOptions, Paged, QueueItem};
use anysonarr::api::SonarrClient;
use anysonarr::config::Config;
use anysonarr::format::{format_size, parse_clock};
use anysonarr::instance::{InstanceRegistry, SelectionState};
use anysonarr::notify::LogNotifier;
use anysonarr::query::{self, Snapshot, POLL_INTERVAL};

#[derive(Parser)]
#[command(name = "anysonarr", about = "Browse and manage Sonarr instances from the terminal")]
struct Cli {
    /// Switch to this configured instance for the invocation.
    #[arg(long, global = true)]
    instance: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured instances and which one is selected.
    Instances,
    /// List the series library.
    Series,
    /// Show the download queue.
    Queue {
        /// Keep refreshing while downloads are active.
        #[arg(long)]
        watch: bool,
    },
    /// Show upcoming episodes.
    Calendar {
        /// Days ahead to include.
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Show wanted episodes with no file.
    Missing,
    /// Show server health checks.
    Health,
    /// Show server version and platform.
    Status,
    /// Show grab/import history for a series.
    History { series_id: i64 },
    /// Search for new series by name.
    Search { term: String },
    /// Add the best search match for a term.
    Add {
        term: String,
        #[arg(long)]
        root_folder: String,
        #[arg(long, default_value_t = 1)]
        quality_profile: i64,
        #[arg(long, default_value_t = 1)]
        language_profile: i64,
        #[arg(long, default_value = "standard")]
        series_type: String,
        #[arg(long)]
        no_season_folder: bool,
        #[arg(long)]
        unmonitored: bool,
        /// Skip the automatic search for missing episodes.
        #[arg(long)]
        no_search: bool,
    },
    /// Remove an item from the download queue.
    Remove {
        id: i64,
        /// Leave the download in the download client.
        #[arg(long)]
        keep_in_client: bool,
        /// Do not blocklist the release.
        #[arg(long)]
        no_blocklist: bool,
    },
    /// Check that the selected instance is reachable.
    Test,
    /// Trigger a server-side search for episodes by id.
    SearchEpisodes { ids: Vec<i64> },
    /// List root folders and profiles used when adding series.
    AddDefaults,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    anysonarr::logging::init_tracing();
    let cli = Cli::parse();

    let config = Config::load().context("loading configuration")?;
    let registry = InstanceRegistry::from_config(&config).context(
        "resolving instances; set [primary] url and api_key in the config file",
    )?;
    let selection = SelectionState::new(registry);
    if let Some(name) = &cli.instance {
        selection.switch(name)?;
    }

    let client = SonarrClient::new(Arc::new(LogNotifier));
    let current = selection.current();

    match cli.command {
        Command::Instances => {
            let selected = selection.selected_name();
            for instance in selection.instances() {
                let marker = if instance.name == selected { "*" } else { " " };
                println!("{} {}  {}", marker, instance.name, instance.base_url);
            }
            for entry in selection.switch_log() {
                let at: chrono::DateTime<Utc> = entry.timestamp.into();
                println!(
                    "switched {} -> {} at {}",
                    entry.old_instance,
                    entry.new_instance,
                    at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        Command::Series => {
            let query = query::series_query(&client, &selection);
            query.refresh().await;
            let snap = query.snapshot();
            for series in snap.data.as_deref().into_iter().flatten() {
                let size = series
                    .statistics
                    .as_ref()
                    .map(|s| format_size(s.size_on_disk))
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>6}  {:40}  {:10}  {}", series.id, series.title, series.status, size);
            }
            exit_on_error(&snap)?;
        }
        Command::Queue { watch } => {
            let query = query::queue_query(&client, &selection);
            query.refresh().await;
            render_queue(&query.snapshot());
            exit_on_error(&query.snapshot())?;

            if watch {
                let poller = query::queue_poller(query.clone());
                poller.evaluate();
                while poller.is_polling() {
                    tokio::time::sleep(POLL_INTERVAL).await;
                    render_queue(&query.snapshot());
                }
            }
        }
        Command::Calendar { days } => {
            let start = Utc::now().date_naive();
            let end = start + ChronoDuration::days(days);
            let query = query::calendar_query(&client, &selection, start, end);
            query.refresh().await;
            let snap = query.snapshot();
            for episode in snap.data.as_deref().into_iter().flatten() {
                let series = episode
                    .series
                    .as_ref()
                    .map(|s| s.title.as_str())
                    .unwrap_or("?");
                println!(
                    "{}  {} S{:02}E{:02}  {}",
                    episode.air_date_utc.as_deref().unwrap_or("-"),
                    series,
                    episode.season_number,
                    episode.episode_number,
                    episode.title.as_deref().unwrap_or(""),
                );
            }
            exit_on_error(&snap)?;
        }
        Command::Missing => {
            let query = query::missing_query(&client, &selection);
            query.refresh().await;
            let snap = query.snapshot();
            for episode in snap.data.as_ref().map(|p| p.records.as_slice()).unwrap_or(&[]) {
                let series = episode
                    .series
                    .as_ref()
                    .map(|s| s.title.as_str())
                    .unwrap_or("?");
                println!(
                    "{:>7}  {} S{:02}E{:02}  {}",
                    episode.id,
                    series,
                    episode.season_number,
                    episode.episode_number,
                    episode.title.as_deref().unwrap_or(""),
                );
            }
            exit_on_error(&snap)?;
        }
        Command::Health => {
            let query = query::health_query(&client, &selection);
            query.refresh().await;
            let snap = query.snapshot();
            match snap.data.as_deref() {
                Some(items) if items.is_empty() => println!("No health issues"),
                Some(items) => {
                    for item in items {
                        println!("[{}] {}: {}", item.kind, item.source, item.message);
                    }
                }
                None => {}
            }
            exit_on_error(&snap)?;
        }
        Command::Status => {
            let status = client.system_status(&current).await?;
            println!(
                "{} {} on {}",
                status.app_name.as_deref().unwrap_or("Sonarr"),
                status.version,
                status.os_name.as_deref().unwrap_or("unknown"),
            );
        }
        Command::History { series_id } => {
            let page = client.history(&current, series_id).await?;
            for record in &page.records {
                println!(
                    "{}  {:12}  {}",
                    record.date, record.event_type, record.source_title
                );
            }
        }
        Command::Search { term } => {
            for lookup in client.search_series(Some(&current), &term).await {
                println!(
                    "{:>8}  {} ({})",
                    lookup.tvdb_id,
                    lookup.title,
                    lookup.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
                );
            }
        }
        Command::Add {
            term,
            root_folder,
            quality_profile,
            language_profile,
            series_type,
            no_season_folder,
            unmonitored,
            no_search,
        } => {
            let results = client.search_series(Some(&current), &term).await;
            let lookup = results
                .first()
                .with_context(|| format!("no series found for '{}'", term))?;
            let options = AddSeriesOptions {
                root_folder,
                quality_profile_id: quality_profile,
                language_profile_id: language_profile,
                series_type,
                season_folder: !no_season_folder,
                monitored: !unmonitored,
                search_on_add: !no_search,
            };
            let series = client.add_series(Some(&current), lookup, &options).await?;
            println!("Added '{}' (id {})", series.title, series.id);
        }
        Command::Remove {
            id,
            keep_in_client,
            no_blocklist,
        } => {
            client
                .remove_queue_item(Some(&current), id, !keep_in_client, !no_blocklist)
                .await?;
        }
        Command::Test => {
            let ok = client.test_connection(Some(&current)).await;
            if !ok {
                std::process::exit(1);
            }
        }
        Command::SearchEpisodes { ids } => {
            let command = client.search_episodes(Some(&current), ids).await?;
            println!("Command {} queued ({})", command.id, command.name);
        }
        Command::AddDefaults => {
            for folder in client.root_folders(&current).await? {
                let free = folder
                    .free_space
                    .map(|b| format_size(b as f64))
                    .unwrap_or_else(|| "-".to_string());
                println!("root folder {:>4}  {}  free {}", folder.id, folder.path, free);
            }
            for profile in client.quality_profiles(&current).await? {
                println!("quality profile {:>4}  {}", profile.id, profile.name);
            }
            match client.language_profiles(&current).await {
                Ok(profiles) => {
                    for profile in profiles {
                        println!("language profile {:>4}  {}", profile.id, profile.name);
                    }
                }
                // v4 servers dropped language profiles; not fatal here.
                Err(err) => tracing::debug!(error = %err, "No language profiles"),
            }
        }
    }

    Ok(())
}

fn render_queue(snapshot: &Snapshot<Paged<QueueItem>>) {
    let Some(page) = snapshot.data.as_deref() else {
        return;
    };
    if page.records.is_empty() {
        println!("Queue is empty");
        return;
    }
    for item in &page.records {
        let eta = item
            .timeleft
            .as_deref()
            .and_then(parse_clock)
            .map(|d| format!("{}m left", d.as_secs() / 60))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>7}  {:50}  {:12}  {:6.2}%  {:>10}  {}",
            item.id,
            item.title.as_deref().unwrap_or("?"),
            item.status,
            item.progress(),
            format_size(item.size),
            eta,
        );
    }
}

fn exit_on_error<T>(snapshot: &Snapshot<T>) -> anyhow::Result<()> {
    if snapshot.data.is_none() {
        if let Some(err) = &snapshot.error {
            anyhow::bail!("request failed: {}", err);
        }
    }
    Ok(())
}
