mod app;
mod graph;
mod util;

use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::{Canvas, KnowledgeGraphApp};
use crate::graph::{EmbeddingStore, build_knowledge_graph, write_document};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the knowledge graph document from an embedded corpus.
    Build {
        /// Corpus JSON file with article metadata and embeddings.
        #[arg(long)]
        corpus: PathBuf,

        /// Destination for the graph document.
        #[arg(long, default_value = "knowledge_graph.json")]
        out: PathBuf,

        /// Nearest neighbors linked per article.
        #[arg(long, default_value_t = 5)]
        neighbors: usize,
    },
    /// Open the interactive graph viewer.
    View {
        /// Graph document produced by `build`.
        #[arg(long, default_value = "knowledge_graph.json")]
        graph: PathBuf,

        /// World canvas width pinned nodes are clamped to.
        #[arg(long, default_value_t = 2048.0)]
        canvas_width: f32,

        /// World canvas height pinned nodes are clamped to.
        #[arg(long, default_value_t = 1024.0)]
        canvas_height: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Args::parse().command {
        Command::Build {
            corpus,
            out,
            neighbors,
        } => run_build(&corpus, &out, neighbors),
        Command::View {
            graph,
            canvas_width,
            canvas_height,
        } => run_view(
            graph,
            Canvas {
                width: canvas_width,
                height: canvas_height,
            },
        ),
    }
}

fn run_build(corpus: &std::path::Path, out: &std::path::Path, neighbors: usize) -> Result<()> {
    if neighbors == 0 {
        return Err(anyhow!("--neighbors must be at least 1"));
    }

    // The store lives exactly as long as the build; dropping it at the end
    // of this scope releases the corpus data before the process exits.
    let store = EmbeddingStore::from_corpus_file(corpus)?;
    let document = build_knowledge_graph(&store, neighbors)
        .context("knowledge graph build failed, no document written")?;
    write_document(out, &document)?;

    tracing::info!(
        nodes = document.node_count(),
        links = document.link_count(),
        out = %out.display(),
        "knowledge graph document written"
    );
    Ok(())
}

fn run_view(graph: PathBuf, canvas: Canvas) -> Result<()> {
    if !(canvas.width > 0.0 && canvas.height > 0.0) {
        return Err(anyhow!("canvas dimensions must be positive"));
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "knograph",
        options,
        Box::new(move |cc| Ok(Box::new(KnowledgeGraphApp::new(cc, graph.clone(), canvas)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
