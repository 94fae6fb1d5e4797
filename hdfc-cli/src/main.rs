//! hdfc-analytics: categorize bank/credit-card statement spend and chart it.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use hdfc_core::{
    merge_statements, summarize, Categories, Classifier, ColumnConfig,
    StatementType, Transaction,
};
use hdfc_ingest::{
    collect_pdf_files, load_cc_statements, parse_account_csv, PdfExtractor,
};

mod llm;
mod report;

use llm::{LlmClassifier, LlmConfig};

#[derive(Parser, Debug)]
#[command(name = "hdfc-analytics", version, about = "Analyze HDFC statement spend by category")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a bank account statement CSV
    Account {
        #[command(flatten)]
        common: CommonArgs,

        /// Path to the account statement CSV
        #[arg(long)]
        statement_csv: PathBuf,
    },

    /// Analyze one or more credit-card statement PDFs
    Cc {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        cc: CcArgs,
    },

    /// Merge account and credit-card statements into one de-duplicated view
    Total {
        #[command(flatten)]
        common: CommonArgs,

        /// Path to the account statement CSV
        #[arg(long)]
        statement_csv: PathBuf,

        #[command(flatten)]
        cc: CcArgs,
    },

    /// Manage the category keyword config
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the category keyword config (TOML)
    #[arg(long)]
    categories_config: PathBuf,

    /// Path to the column mapping config (TOML)
    #[arg(long)]
    column_config: PathBuf,

    /// LLM model for fallback classification of unmatched rows
    /// (keyword-only when absent)
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the LLM host
    #[arg(long, default_value = "http://localhost:11434")]
    llm_host: String,
}

#[derive(Args, Debug)]
struct CcArgs {
    /// Single statement PDF
    #[arg(long, conflicts_with = "dir")]
    file: Option<PathBuf>,

    /// Directory of statement PDFs
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Cardholder name as printed on the statement
    #[arg(long)]
    name: String,

    /// Statement passwords, comma-separated, tried in order per file
    #[arg(long, value_delimiter = ',')]
    passwords: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// Add a category (or overwrite its keywords) and persist the config
    Add {
        /// Path to the category keyword config (TOML)
        #[arg(long)]
        categories_config: PathBuf,

        /// Category name
        #[arg(long)]
        name: String,

        /// Keywords, comma-separated
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Account {
            common,
            statement_csv,
        } => {
            let rows = load_account_rows(&common, &statement_csv)?;
            let rows = merge_statements(Some(rows), Vec::new(), StatementType::Account)?;
            finish(rows, StatementType::Account, &common)?;
        }

        Command::Cc { common, cc } => {
            let sets = load_cc_sets(&cc)?;
            let rows = merge_statements(None, sets, StatementType::CreditCard)?;
            finish(rows, StatementType::CreditCard, &common)?;
        }

        Command::Total {
            common,
            statement_csv,
            cc,
        } => {
            let account = load_account_rows(&common, &statement_csv)?;
            let sets = load_cc_sets(&cc)?;
            let rows = merge_statements(Some(account), sets, StatementType::Total)?;
            finish(rows, StatementType::Total, &common)?;
        }

        Command::Categories { command } => match command {
            CategoriesCommand::Add {
                categories_config,
                name,
                keywords,
            } => {
                let mut categories = Categories::load(&categories_config)?;
                categories.add(&name, keywords)?;
                categories.save(&categories_config)?;
                println!("Added {name} to {}", categories_config.display());
            }
        },
    }

    Ok(())
}

fn load_account_rows(common: &CommonArgs, statement_csv: &Path) -> Result<Vec<Transaction>> {
    let columns = ColumnConfig::load(&common.column_config)?;
    let rows = parse_account_csv(statement_csv, columns.for_type(StatementType::Account)?)
        .with_context(|| format!("parsing {}", statement_csv.display()))?;
    println!(
        "Parsed {} transactions from {}",
        rows.len(),
        statement_csv.display()
    );
    Ok(rows)
}

fn load_cc_sets(cc: &CcArgs) -> Result<Vec<Vec<Transaction>>> {
    let files = match (&cc.file, &cc.dir) {
        (Some(file), _) => vec![file.clone()],
        (None, Some(dir)) => {
            let files = collect_pdf_files(dir)?;
            if files.is_empty() {
                bail!("no statement PDFs found in {}", dir.display());
            }
            files
        }
        (None, None) => bail!("pass --file or --dir for credit-card statements"),
    };

    let sets = load_cc_statements(&files, &cc.name, &cc.passwords, &PdfExtractor)?;
    println!(
        "Parsed {} transactions from {} of {} statement file(s)",
        sets.iter().map(Vec::len).sum::<usize>(),
        sets.len(),
        files.len()
    );
    Ok(sets)
}

/// Classify merged rows, print the chart, and write the export files.
fn finish(mut rows: Vec<Transaction>, stype: StatementType, common: &CommonArgs) -> Result<()> {
    let categories = Categories::load(&common.categories_config)?;

    let mut classifier = Classifier::new(categories.clone());
    if let Some(model) = &common.model {
        classifier = classifier.with_fallback(Box::new(LlmClassifier::new(
            LlmConfig {
                model: model.clone(),
                host: common.llm_host.clone(),
            },
            &categories,
        )));
    }
    classifier.classify_rows(&mut rows);

    let summary = summarize(&rows, stype);
    report::render_summary(&summary);

    if matches!(stype, StatementType::CreditCard | StatementType::Total) {
        report::export_expenses(&rows, stype, Path::new(report::EXPENSES_FILE))?;
        report::export_other(&rows, Path::new(report::OTHER_FILE))?;
        println!(
            "\nWrote {} and {}",
            report::EXPENSES_FILE,
            report::OTHER_FILE
        );
    }

    Ok(())
}
