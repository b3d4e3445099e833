use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use panther_mcp::domain::EnrichmentRequest;
use panther_mcp::error::PantherError;
use panther_mcp::mcp::McpServer;
use panther_mcp::output::JsonOutput;
use panther_mcp::panther::{PantherClient, PantherHttpClient};

#[derive(Parser)]
#[command(name = "panther-mcp")]
#[command(about = "MCP tool server for PantherDB gene-list overrepresentation analysis")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Serve the Panther tools over stdio (MCP, the default)")]
    Serve,
    #[command(about = "List supported genomes and taxon ids")]
    Organisms,
    #[command(about = "List supported annotation datasets")]
    Datasets,
    #[command(about = "Run an overrepresentation test for a gene list")]
    Enrich(EnrichArgs),
}

#[derive(Args)]
struct EnrichArgs {
    #[arg(long, value_delimiter = ',', required = true)]
    genes: Vec<String>,

    #[arg(long)]
    organism: String,

    #[arg(long)]
    dataset: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(panther) = report.downcast_ref::<PantherError>() {
            return ExitCode::from(map_exit_code(panther));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PantherError) -> u8 {
    match error {
        PantherError::PantherHttp(_)
        | PantherError::PantherStatus { .. }
        | PantherError::MissingField(_) => 3,
        PantherError::MalformedField { .. } => 1,
    }
}

fn run() -> miette::Result<()> {
    // Logs go to stderr; stdout carries MCP framing and JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let panther = PantherHttpClient::new().into_diagnostic()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::new(panther);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            server.serve(stdin.lock(), stdout.lock()).into_diagnostic()?;
            Ok(())
        }
        Commands::Organisms => {
            let records = panther.supported_genomes().into_diagnostic()?;
            JsonOutput::print_organisms(&records).into_diagnostic()?;
            Ok(())
        }
        Commands::Datasets => {
            let records = panther.supported_annot_datasets().into_diagnostic()?;
            JsonOutput::print_datasets(&records).into_diagnostic()?;
            Ok(())
        }
        Commands::Enrich(args) => {
            let request = EnrichmentRequest {
                gene_input_list: args.genes.into(),
                organism: args.organism.into(),
                annot_data_set: args.dataset.into(),
            };
            let records = panther.enrich_overrep(&request).into_diagnostic()?;
            JsonOutput::print_enrichment(&records).into_diagnostic()?;
            Ok(())
        }
    }
}
