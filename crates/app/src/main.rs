use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use policy_qa_core::{
    format_sources, read_uploads, Config, Embedder, GroqGenerator, HashEmbedder, HttpEmbedder,
    LopdfExtractor, PdfExtractor, Session, Speaker, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_TOP_K,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "policysphere", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index policy PDFs and answer questions about them interactively.
    Chat {
        /// PDF file or folder to index. Repeatable.
        #[arg(long = "pdf", required = true)]
        pdfs: Vec<PathBuf>,

        /// Directory where uploads are staged before parsing.
        #[arg(long)]
        staging_dir: Option<PathBuf>,

        /// Number of context segments retrieved per question.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Remote embedding endpoint. Defaults to the local embedder.
        #[arg(long)]
        embedding_endpoint: Option<String>,
    },
    /// Print the extracted page text of one PDF.
    Pages {
        #[arg(long)]
        pdf: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "policysphere boot"
    );

    let cli = Cli::parse();

    match cli.command {
        Command::Chat {
            pdfs,
            staging_dir,
            top_k,
            embedding_endpoint,
        } => {
            // Missing credential must fail before any network call.
            let config = Config::from_env().context("configuration error")?;
            let staging_dir = staging_dir.unwrap_or(config.staging_dir);
            let embedding_endpoint = embedding_endpoint.or(config.embedding_endpoint);

            let embedder: Box<dyn Embedder + Send + Sync> = match &embedding_endpoint {
                Some(endpoint) => Box::new(
                    HttpEmbedder::new(endpoint, DEFAULT_EMBEDDING_DIMENSIONS)
                        .context("invalid embedding endpoint")?,
                ),
                None => Box::new(HashEmbedder::default()),
            };

            let generator = GroqGenerator::new(config.groq_api_key);
            let mut session =
                Session::new(embedder, generator, staging_dir).with_top_k(top_k);

            let uploads = read_uploads(&pdfs).context("reading policy documents")?;
            if uploads.is_empty() {
                bail!("no pdf files found under the given paths");
            }

            let report = session
                .index_documents(&uploads)
                .await
                .context("indexing policy documents")?;

            println!(
                "Indexed {} segment(s) from {} document(s).",
                report.segment_count,
                report.documents.len()
            );
            if report.segment_count == 0 {
                warn!("no extractable text found; every question will fail");
            }

            run_chat_loop(&mut session).await?;
        }
        Command::Pages { pdf } => {
            let pages = LopdfExtractor.extract_pages(&pdf)?;
            if pages.is_empty() {
                println!("no extractable text in {}", pdf.display());
            }
            for page in pages {
                println!("[page {}]\n{}", page.page, page.text);
            }
        }
    }

    Ok(())
}

async fn run_chat_loop(
    session: &mut Session<Box<dyn Embedder + Send + Sync>, GroqGenerator>,
) -> anyhow::Result<()> {
    println!("Ask a question about company policies (empty line to skip, ctrl-d to quit).");

    let stdin = io::stdin();
    loop {
        print!("question> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        match session.ask(question).await {
            Ok(result) => {
                println!("\nAnswer:\n{}\n", result.answer);

                println!("Sources:");
                for label in format_sources(&result.sources) {
                    println!("  {label}");
                }

                println!("\nChat history:");
                for turn in session.history() {
                    let speaker = match turn.speaker {
                        Speaker::User => "You",
                        Speaker::Assistant => "AI",
                    };
                    println!("  {speaker}: {}", turn.message);
                }
                println!();
            }
            Err(error) => {
                warn!(%error, "question failed");
                eprintln!("error: {error}");
            }
        }
    }

    Ok(())
}
