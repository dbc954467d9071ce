use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use folio_grobid::{GrobidClient, DEFAULT_GROBID_URL};
use folio_llm::{build_prompt, GeminiClient};
use folio_tei::{extract_sections, parse_tei, Section, Sections};

mod config_file;
mod output;

use config_file::ConfigFile;
use output::ColorMode;

/// Scholarly-PDF section extraction via GROBID, with optional summarization
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a PDF through GROBID and print the extracted sections
    Process {
        /// Path to the PDF file
        file_path: PathBuf,

        /// GROBID base URL
        #[arg(long)]
        grobid_url: Option<String>,

        /// Print the sections as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract sections from an already-fetched TEI XML file
    Extract {
        /// Path to the TEI XML file
        file_path: PathBuf,

        /// Print the sections as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Run extracted sections through the generative model with a prompt
    Ask {
        /// Path to the PDF file
        file_path: PathBuf,

        /// The user prompt to answer over the selected sections
        #[arg(short, long)]
        prompt: String,

        /// Comma-separated section names to include (default: all found)
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// GROBID base URL
        #[arg(long)]
        grobid_url: Option<String>,

        /// Google API key
        #[arg(long)]
        api_key: Option<String>,

        /// Model name
        #[arg(long)]
        model: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_file::load_config();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Process {
            file_path,
            grobid_url,
            json,
            no_color,
        } => {
            let grobid_url = resolve_grobid_url(grobid_url, &config);
            let sections = process_pdf(&file_path, &grobid_url).await?;
            print_result(&mut stdout, &sections, json, no_color)?;
        }

        Command::Extract {
            file_path,
            json,
            no_color,
        } => {
            let xml = std::fs::read_to_string(&file_path)
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            let doc = parse_tei(&xml)?;
            let sections = extract_sections(&doc)?;
            print_result(&mut stdout, &sections, json, no_color)?;
        }

        Command::Ask {
            file_path,
            prompt,
            sections,
            grobid_url,
            api_key,
            model,
            no_color,
        } => {
            let grobid_url = resolve_grobid_url(grobid_url, &config);
            let api_key = resolve_api_key(api_key, &config)?;
            let model = resolve_model(model, &config);

            let extracted = process_pdf(&file_path, &grobid_url).await?;
            let selected = select_sections(extracted, &sections)?;
            if selected.is_empty() {
                anyhow::bail!("none of the requested sections were found in the document");
            }

            let input = build_prompt(&prompt, &selected);
            let client = GeminiClient::new(api_key).with_model(model);

            let spinner = output::spinner("Waiting for the model...");
            let answer = client.generate(&input).await;
            spinner.finish_and_clear();

            output::print_answer(&mut stdout, &answer?, ColorMode(!no_color))?;
        }
    }

    Ok(())
}

/// Upload a PDF to GROBID and extract its sections from the returned TEI.
async fn process_pdf(file_path: &Path, grobid_url: &str) -> anyhow::Result<Sections> {
    let pdf = std::fs::read(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.pdf");

    let client = GrobidClient::new(grobid_url);

    let spinner = output::spinner("Processing document with GROBID...");
    let result = client.process_fulltext_document(pdf, filename).await;
    spinner.finish_and_clear();
    let xml = result.with_context(|| format!("GROBID request to {grobid_url} failed"))?;

    let doc = parse_tei(&xml)?;
    let sections = extract_sections(&doc)?;
    Ok(sections)
}

/// Keep only the requested sections; an empty request keeps everything.
fn select_sections(extracted: Sections, requested: &[String]) -> anyhow::Result<Sections> {
    if requested.is_empty() {
        return Ok(extracted);
    }

    let mut wanted = Vec::with_capacity(requested.len());
    for name in requested {
        let section = Section::from_name(name)
            .with_context(|| format!("unknown section name: {name}"))?;
        wanted.push(section);
    }

    Ok(extracted
        .into_iter()
        .filter(|(section, _)| wanted.contains(section))
        .collect())
}

fn print_result(
    w: &mut dyn Write,
    sections: &Sections,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *w, sections)?;
        writeln!(w)?;
    } else {
        output::print_sections(w, sections, ColorMode(!no_color))?;
    }
    Ok(())
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
fn resolve_grobid_url(flag: Option<String>, config: &ConfigFile) -> String {
    flag.or_else(|| std::env::var("GROBID_URL").ok())
        .or_else(|| {
            config
                .services
                .as_ref()
                .and_then(|s| s.grobid_url.clone())
        })
        .unwrap_or_else(|| DEFAULT_GROBID_URL.to_string())
}

fn resolve_api_key(flag: Option<String>, config: &ConfigFile) -> anyhow::Result<String> {
    flag.or_else(|| std::env::var("GOOGLE_API_KEY").ok())
        .or_else(|| {
            config
                .api_keys
                .as_ref()
                .and_then(|a| a.google_api_key.clone())
        })
        .context("GOOGLE_API_KEY is not configured (flag, environment, or config file)")
}

fn resolve_model(flag: Option<String>, config: &ConfigFile) -> String {
    flag.or_else(|| std::env::var("GEMINI_MODEL").ok())
        .or_else(|| config.llm.as_ref().and_then(|l| l.model.clone()))
        .unwrap_or_else(|| folio_llm::DEFAULT_MODEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_sections_keeps_everything_by_default() {
        let mut extracted = Sections::new();
        extracted.insert(Section::Title, "T".to_string());
        extracted.insert(Section::Body, "B".to_string());

        let selected = select_sections(extracted.clone(), &[]).unwrap();
        assert_eq!(selected, extracted);
    }

    #[test]
    fn select_sections_filters_to_requested_names() {
        let mut extracted = Sections::new();
        extracted.insert(Section::Title, "T".to_string());
        extracted.insert(Section::Body, "B".to_string());

        let selected = select_sections(extracted, &["title".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected.contains_key(&Section::Title));
    }

    #[test]
    fn select_sections_rejects_unknown_names() {
        let extracted = Sections::new();
        assert!(select_sections(extracted, &["footnotes".to_string()]).is_err());
    }
}
