use super::commands::{
    CancelFeedsArgs, DestinationsArgs, FeedsArgs, OrderItemsArgs, ParticipationsArgs, ProductsArgs, ReportCountArgs,
    ReportsArgs,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mws-client")]
#[command(about = "Fetch paginated lists from Amazon Marketplace Web Service")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding mock response files
    #[arg(long, global = true)]
    pub mock_dir: Option<PathBuf>,

    /// Serve this response file instead of calling the service (repeatable, in order)
    #[arg(long = "mock", global = true, value_name = "FILE")]
    pub mock_files: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List reports available for download
    Reports(ReportsArgs),
    /// Count reports matching the filters
    ReportCount(ReportCountArgs),
    /// List feed submissions
    Feeds(FeedsArgs),
    /// Cancel feed submissions matching the filters
    CancelFeeds(CancelFeedsArgs),
    /// List the items of one order
    OrderItems(OrderItemsArgs),
    /// List the seller's marketplace participations
    Participations(ParticipationsArgs),
    /// List registered notification destinations
    Destinations(DestinationsArgs),
    /// Search the catalog by keyword
    Products(ProductsArgs),
}
