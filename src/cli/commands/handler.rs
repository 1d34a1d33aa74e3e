//! Command handlers: build a client from config, run one list, print it

use anyhow::{Context, Result};
use colored::*;
use log::info;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{OutputArgs, OutputFormat, PagingArgs};
use crate::api::{FetchSummary, ListResource, MockDispatcher, MwsClient, Record};
use crate::cli::app::{Cli, Commands};
use crate::config::Config;

/// Run the command selected on the command line
pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let client = build_client(&config, cli.mock_dir.as_deref(), &cli.mock_files)?;

    match cli.command {
        Commands::Reports(args) => {
            let mut reports = client.reports();
            if !args.report_types.is_empty() {
                reports.set_report_types(&args.report_types)?;
            }
            if !args.request_ids.is_empty() {
                reports.set_request_ids(&args.request_ids)?;
            }
            if let Some(max) = args.max_count {
                reports.set_max_count(max)?;
            }
            reports.set_acknowledged_filter(args.acknowledged);
            reports.set_time_limits(args.from, args.to);

            run_list(&mut reports, &args.paging, &args.output, "reports").await
        }
        Commands::ReportCount(args) => {
            let mut reports = client.reports();
            if !args.report_types.is_empty() {
                reports.set_report_types(&args.report_types)?;
            }
            reports.set_acknowledged_filter(args.acknowledged);
            reports.set_time_limits(args.from, args.to);

            let count = reports.fetch_count().await.context("Failed to count reports")?;
            match count {
                Some(count) => println!("{} {}", count.to_string().bright_green().bold(), "reports".dimmed()),
                None => println!("{}", "No count returned".yellow()),
            }
            Ok(())
        }
        Commands::Feeds(args) => {
            let mut feeds = client.feeds();
            if !args.feed_ids.is_empty() {
                feeds.set_feed_ids(&args.feed_ids)?;
            }
            if !args.feed_types.is_empty() {
                feeds.set_feed_types(&args.feed_types)?;
            }
            if !args.statuses.is_empty() {
                feeds.set_feed_statuses(&args.statuses)?;
            }
            if let Some(max) = args.max_count {
                feeds.set_max_count(max)?;
            }
            feeds.set_time_limits(args.from, args.to);

            run_list(&mut feeds, &args.paging, &args.output, "feed submissions").await
        }
        Commands::CancelFeeds(args) => {
            let mut feeds = client.feeds();
            if !args.feed_ids.is_empty() {
                feeds.set_feed_ids(&args.feed_ids)?;
            }
            if !args.feed_types.is_empty() {
                feeds.set_feed_types(&args.feed_types)?;
            }
            feeds.set_time_limits(args.from, args.to);

            feeds.cancel_feeds().await.context("Failed to cancel feed submissions")?;
            let records = feeds.records().unwrap_or_default();
            let summary = FetchSummary {
                pages: 1,
                records: records.len(),
                has_more: false,
                no_data: records.is_empty(),
            };
            println!("{}", render_records(records, &summary, &args.output, "cancelled submissions")?);
            Ok(())
        }
        Commands::OrderItems(args) => {
            let mut items = client.order_items(&args.order_id)?;
            run_list(&mut items, &args.paging, &args.output, "order items").await
        }
        Commands::Participations(args) => {
            let mut participations = client.participations();
            run_list(&mut participations, &args.paging, &args.output, "participations").await
        }
        Commands::Destinations(args) => {
            let marketplace_id = args
                .marketplace_id
                .or_else(|| config.marketplace_id.clone())
                .context("No marketplace id given; pass --marketplace-id or set MWS_MARKETPLACE_ID")?;
            let mut destinations = client.destinations(&marketplace_id)?;
            let paging = PagingArgs {
                no_continue: true,
                max_pages: None,
            };
            run_list(&mut destinations, &paging, &args.output, "destinations").await
        }
        Commands::Products(args) => {
            let marketplace_id = args
                .marketplace_id
                .or_else(|| config.marketplace_id.clone())
                .context("No marketplace id given; pass --marketplace-id or set MWS_MARKETPLACE_ID")?;
            let mut search = client.product_search(&marketplace_id)?;
            search.set_query(&args.query)?;
            if let Some(context) = &args.context {
                search.set_context_id(context)?;
            }
            let paging = PagingArgs {
                no_continue: true,
                max_pages: None,
            };
            run_list(&mut search, &paging, &args.output, "products").await
        }
    }
}

/// Live client, or one replaying mock files when any are given
pub fn build_client(config: &Config, mock_dir: Option<&Path>, mock_files: &[String]) -> Result<MwsClient> {
    let resilience = config.resilience();

    let client = if mock_files.is_empty() {
        MwsClient::live(&config.endpoint, config.timeout(), &config.user_agent, &resilience)
            .context("Failed to create HTTP client")?
    } else {
        let dir = mock_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let files: Vec<&str> = mock_files.iter().map(String::as_str).collect();
        let mock = MockDispatcher::from_files(&dir, &files).context("Failed to load mock files")?;
        info!("Mock mode: {} response file(s) from {}", files.len(), dir.display());
        MwsClient::new(&config.endpoint, Arc::new(mock), &resilience)
    };

    Ok(match &config.seller_id {
        Some(seller_id) => client.with_seller_id(seller_id),
        None => client,
    })
}

async fn run_list<L: ListResource>(list: &mut L, paging: &PagingArgs, output: &OutputArgs, label: &str) -> Result<()> {
    list.set_use_token(!paging.no_continue);
    if paging.max_pages.is_some() {
        list.controller_mut().set_max_pages(paging.max_pages);
    }

    let summary = list.fetch().await.with_context(|| format!("Failed to fetch {}", label))?;
    let records = list.records().unwrap_or_default();
    println!("{}", render_records(records, &summary, output, label)?);
    Ok(())
}

/// Render fetched records in the requested format
pub fn render_records(records: &[Record], summary: &FetchSummary, output: &OutputArgs, label: &str) -> Result<String> {
    match output.format {
        OutputFormat::Json => {
            let document = json!({
                "records": records,
                "pages": summary.pages,
                "has_more": summary.has_more,
            });
            let rendered = if output.pretty {
                serde_json::to_string_pretty(&document)
            } else {
                serde_json::to_string(&document)
            };
            rendered.context("Failed to serialize records")
        }
        OutputFormat::Summary => {
            let mut line = format!(
                "{} {} in {} page(s)",
                records.len().to_string().bright_green().bold(),
                label,
                summary.pages
            );
            if summary.no_data {
                line.push_str(&format!(" {}", "(no data)".yellow()));
            }
            if summary.has_more {
                line.push_str(&format!(" {}", "(more available)".cyan()));
            }
            Ok(line)
        }
    }
}
