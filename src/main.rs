//! CLI interface for the resume matcher

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use resume_matcher::{rank, DenseEmbedder, Document, MatchConfig, MatchResult, TfidfEmbedder};

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Rank resumes against job descriptions by vector similarity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum StrategyArg {
    /// TF-IDF fitted on this run's documents
    Sparse,
    /// Pretrained sentence-embedding model (downloaded on first use)
    Dense,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank resumes against one or more job descriptions
    Rank {
        /// Job descriptions: a .txt file, an id,text .csv file, or a directory of .txt files
        #[arg(long)]
        jobs: PathBuf,

        /// Resumes: a .txt file, an id,text .csv file, or a directory of .txt files
        #[arg(long)]
        resumes: PathBuf,

        /// Vectorization strategy
        #[arg(long, value_enum, default_value = "sparse")]
        strategy: StrategyArg,

        /// Number of results to return per job
        #[arg(short, long, default_value = "5")]
        k: usize,

        /// Maximum matched keywords shown per result
        #[arg(long, default_value = "10")]
        overlap_limit: usize,

        /// Drop stop words from the matched-keyword explanation
        #[arg(long)]
        exclude_stopwords: bool,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write results to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load documents from a directory of .txt files (file stem = document id,
/// sorted by name so corpus order is stable), a single .txt file, or an
/// `id,text` CSV file.
fn load_documents(path: &Path) -> Result<Vec<Document>> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("Cannot read directory {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Cannot read {}", file.display()))?;
            documents.push(Document::new(stem_of(&file), text));
        }
        Ok(documents)
    } else if path.extension().is_some_and(|ext| ext == "csv") {
        load_csv(path)
    } else {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        Ok(vec![Document::new(stem_of(path), text)])
    }
}

fn load_csv(path: &Path) -> Result<Vec<Document>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;

    let mut documents = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((id, text)) = line.split_once(',') else {
            bail!(
                "{}:{}: expected 'id,text' format",
                path.display(),
                line_no + 1
            );
        };
        documents.push(Document::new(id.trim(), text.trim()));
    }
    Ok(documents)
}

fn print_results(results: &BTreeMap<String, Vec<MatchResult>>) {
    for (query_id, matches) in results {
        println!("Top matches for {}:", query_id);
        if matches.is_empty() {
            println!("  No results (resume corpus is empty)");
            continue;
        }
        for m in matches {
            println!("  {}. {} (score: {:.4})", m.rank, m.candidate_id, m.score);
            if !m.overlap_terms.is_empty() {
                println!("     matched keywords: {}", m.overlap_terms.join(", "));
            }
        }
    }
}

fn export_csv(path: &Path, results: &BTreeMap<String, Vec<MatchResult>>) -> Result<()> {
    let mut out = String::from("query_id,candidate_id,rank,score,overlap_terms\n");
    for matches in results.values() {
        for m in matches {
            out.push_str(&format!(
                "{},{},{},{:.4},{}\n",
                m.query_id,
                m.candidate_id,
                m.rank,
                m.score,
                m.overlap_terms.join("|")
            ));
        }
    }
    fs::write(path, out).with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("resume_matcher=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            jobs,
            resumes,
            strategy,
            k,
            overlap_limit,
            exclude_stopwords,
            json,
            export,
        } => {
            let queries = load_documents(&jobs)?;
            let candidates = load_documents(&resumes)?;
            if queries.is_empty() {
                bail!("No job descriptions found in {}", jobs.display());
            }

            let config = MatchConfig {
                top_k: k,
                overlap_limit,
                exclude_stopwords_in_overlap: exclude_stopwords,
                ..MatchConfig::default()
            };

            let results = match strategy {
                StrategyArg::Sparse => {
                    let mut embedder = TfidfEmbedder::new(config.stopwords.clone());
                    rank(&mut embedder, &queries, &candidates, &config)?
                }
                StrategyArg::Dense => {
                    let mut embedder = DenseEmbedder::new();
                    rank(&mut embedder, &queries, &candidates, &config)?
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&results);
            }

            if let Some(path) = export {
                export_csv(&path, &results)?;
                println!("Exported results to {}", path.display());
            }
        }
    }

    Ok(())
}
