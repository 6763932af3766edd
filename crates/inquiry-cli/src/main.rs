use anyhow::Result;
use clap::{Parser, Subcommand};
use inquiry_core::report::{Language, ReportFormat, ReportStyle, SectionKind};
use inquiry_infrastructure::InquiryPaths;
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "inquiry")]
#[command(about = "Inquiry - guided research sessions with report composition", long_about = None)]
struct Cli {
    /// Keep configuration, sessions and logs under this directory
    #[arg(long, global = true, env = "INQUIRY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase stderr verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current research session
    Status,
    /// Compose the report of the current session locally
    Compose {
        #[arg(long)]
        format: Option<ReportFormat>,
        #[arg(long)]
        style: Option<ReportStyle>,
        #[arg(long)]
        language: Option<Language>,
        /// Section to leave out (e.g. notes, key-terms); repeatable
        #[arg(long = "exclude", value_name = "SECTION")]
        exclude: Vec<SectionKind>,
    },
    /// Remove sections from an existing markdown report
    Filter {
        file: PathBuf,
        #[arg(long = "exclude", value_name = "SECTION")]
        exclude: Vec<SectionKind>,
    },
    /// List recently submitted topics
    Recent,
    /// Refine a topic and start researching it
    Start {
        topic: String,
        /// Commit the refined wording instead of the original
        #[arg(long)]
        suggested: bool,
    },
    /// Discard the current research session
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = InquiryPaths::new(cli.data_dir.as_deref())?;
    let _guard = logging::init(&paths, cli.verbose);

    match cli.command {
        Commands::Status => commands::status::run(&paths).await?,
        Commands::Compose {
            format,
            style,
            language,
            exclude,
        } => {
            let overrides = commands::compose::Overrides {
                format,
                style,
                language,
                exclude,
            };
            commands::compose::run(&paths, overrides).await?
        }
        Commands::Filter { file, exclude } => commands::filter::run(&file, &exclude)?,
        Commands::Recent => commands::recent::run(&paths).await?,
        Commands::Start { topic, suggested } => commands::start::run(&paths, &topic, suggested).await?,
        Commands::Reset => commands::reset::run(&paths).await?,
    }

    Ok(())
}
