use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use shared::{export, list_draft_files, load_draft, SavedDraft};
use std::io::{self, Write as _};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "export-draft")]
#[command(about = "Render a saved newsletter draft as plain text or a mailto link")]
struct Args {
    /// Path to the draft file (if not provided, will list available drafts)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format: text or email
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let saved = if let Some(path) = args.file {
        load_draft(&path)?
    } else {
        select_draft()?
    };

    match args.format.as_str() {
        "text" => {
            println!("{}", export::to_plain_text(&saved.draft));
            print_citations(&saved);
        }
        "email" => {
            let mailto = export::to_mailto(&saved.draft)
                .context("Could not build a mail-compose link for this draft")?;
            println!("{}", mailto);
        }
        other => {
            anyhow::bail!("Invalid format: {}. Use 'text' or 'email'", other);
        }
    }

    Ok(())
}

fn print_citations(saved: &SavedDraft) {
    if saved.citations.is_empty() {
        return;
    }
    println!("\nSOURCES\n");
    for chunk in &saved.citations {
        if chunk.web.title.is_empty() {
            println!("  - {}", chunk.web.uri);
        } else {
            println!("  - {} ({})", chunk.web.title, chunk.web.uri);
        }
    }
}

fn select_draft() -> Result<SavedDraft> {
    let mut drafts = list_draft_files()?;

    if drafts.is_empty() {
        anyhow::bail!("No saved drafts found. Generate one with draft-newsletter first.");
    }

    eprintln!("Available drafts:\n");
    for (i, (path, saved)) in drafts.iter().enumerate() {
        let created = DateTime::parse_from_rfc3339(&saved.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        eprintln!(
            "  {}) {} \"{}\" (created: {})",
            i + 1,
            filename,
            saved.draft.subject,
            created
        );
    }

    eprint!("\nSelect draft (1-{}): ", drafts.len());
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let selection: usize = input
        .trim()
        .parse()
        .context("Invalid selection. Please enter a number.")?;

    if selection < 1 || selection > drafts.len() {
        anyhow::bail!("Selection out of range. Please choose 1-{}", drafts.len());
    }

    Ok(drafts.remove(selection - 1).1)
}
