// invoicegen: compose, store and export invoices from the command line

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use invoice_render::{InvoiceRenderer, LayoutConfig};
use invoice_text::{format_amount, format_iso_date};
use ledger::{
    duplicate_invoice, save_draft, Company, FileStore, Invoice, InvoiceDraft, Repository,
    Settings, Totals, UuidGenerator,
};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate PDF invoices and keep a local history")]
struct Cli {
    /// Directory holding companies, history and settings
    #[arg(long, env = "INVOICEGEN_DATA_DIR", default_value = "invoicegen-data")]
    data_dir: PathBuf,

    /// Layout configuration JSON (defaults to A4)
    #[arg(long)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an invoice JSON file to Invoice_<number>.pdf
    Render {
        invoice: PathBuf,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print subtotal, sales tax and total of an invoice JSON file
    Totals { invoice: PathBuf },
    /// Print a fresh draft as JSON
    New,
    /// Save a draft JSON file to the history and export its PDF
    Save {
        draft: PathBuf,
        /// Attach this stored company as the recipient
        #[arg(long)]
        recipient: Option<String>,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List stored invoices, most recent first
    History,
    /// Export a stored invoice
    Export {
        id: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete a stored invoice
    Delete { id: String },
    /// Print a new draft copied from a stored invoice
    Duplicate { id: String },
    /// List stored companies
    Companies,
    /// Add a company to the roster
    AddCompany {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a company from the roster
    DeleteCompany { id: String },
    /// Print the settings as JSON
    Settings,
    /// Replace the settings from a JSON file
    SetSettings { settings: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let today = Local::now().date_naive();
    let stdout = std::io::stdout();
    run(cli, today, &mut stdout.lock())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    LayoutConfig::from_json(&text).with_context(|| format!("parsing layout {}", path.display()))
}

fn print_totals(out: &mut impl Write, totals: &Totals) -> Result<()> {
    writeln!(out, "SUBTOTAL   {:>12}", format_amount(totals.subtotal))?;
    writeln!(out, "SALES TAX  {:>12}", format_amount(totals.tax))?;
    writeln!(out, "TOTAL      {:>12}", format_amount(totals.total))?;
    Ok(())
}

fn recipient_name(invoice: &Invoice) -> &str {
    invoice
        .recipient
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("-")
}

fn now_millis() -> i64 {
    Local::now().timestamp_millis()
}

fn run(cli: Cli, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    let layout = load_layout(cli.layout.as_deref())?;
    let renderer = InvoiceRenderer::new().with_config(layout);
    let mut repo = Repository::new(FileStore::new(&cli.data_dir));
    tracing::debug!(data_dir = %cli.data_dir.display(), "Opened data directory");

    match cli.command {
        Command::Render { invoice, out: dir } => {
            let invoice: Invoice = read_json(&invoice)?;
            let path = renderer.export(&invoice, &dir)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Totals { invoice } => {
            let invoice: Invoice = read_json(&invoice)?;
            print_totals(out, &invoice.totals())?;
        }
        Command::New => {
            let settings = repo.settings()?;
            let draft = InvoiceDraft::new(&settings, today, &mut UuidGenerator);
            writeln!(out, "{}", serde_json::to_string_pretty(&draft)?)?;
        }
        Command::Save {
            draft,
            recipient,
            out: dir,
        } => {
            let mut draft: InvoiceDraft = read_json(&draft)?;
            if let Some(id) = recipient {
                let Some(company) = repo.find_company(&id)? else {
                    bail!("no company with id {id}");
                };
                draft.select_recipient(&company);
            }

            let settings = repo.settings()?;
            let saved = save_draft(&draft, &settings, now_millis())?;
            repo.commit_save(&saved)?;
            let path = renderer.export(&saved.invoice, &dir)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::History => {
            for invoice in repo.invoices()? {
                writeln!(
                    out,
                    "{}  {:<12} {}  {:<24} {:>12}",
                    invoice.id,
                    invoice.invoice_number,
                    format_iso_date(invoice.date),
                    recipient_name(&invoice),
                    format_amount(invoice.totals().total)
                )?;
            }
        }
        Command::Export { id, out: dir } => {
            let Some(invoice) = repo.find_invoice(&id)? else {
                bail!("no invoice with id {id}");
            };
            let path = renderer.export(&invoice, &dir)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Delete { id } => {
            if !repo.delete_invoice(&id)? {
                bail!("no invoice with id {id}");
            }
            writeln!(out, "deleted {id}")?;
        }
        Command::Duplicate { id } => {
            let Some(invoice) = repo.find_invoice(&id)? else {
                bail!("no invoice with id {id}");
            };
            let settings = repo.settings()?;
            let draft = duplicate_invoice(&invoice, &settings, today, &mut UuidGenerator);
            writeln!(out, "{}", serde_json::to_string_pretty(&draft)?)?;
        }
        Command::Companies => {
            for company in repo.companies()? {
                let address = company.address.replace('\n', ", ");
                writeln!(out, "{}  {}  {}", company.id, company.name, address)?;
            }
        }
        Command::AddCompany {
            name,
            address,
            phone,
            email,
        } => {
            let company = Company {
                id: String::new(),
                name,
                address,
                phone,
                email,
            };
            let stored = repo.upsert_company(company)?;
            writeln!(out, "{}", stored.id)?;
        }
        Command::DeleteCompany { id } => {
            if !repo.delete_company(&id)? {
                bail!("no company with id {id}");
            }
            writeln!(out, "deleted {id}")?;
        }
        Command::Settings => {
            let settings = repo.settings()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
        }
        Command::SetSettings { settings } => {
            let settings: Settings = read_json(&settings)?;
            repo.save_settings(&settings)?;
            writeln!(out, "settings saved")?;
        }
    }

    Ok(())
}
