//! Process command - extract line items from a single invoice text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stockin_core::invoice::{ExtractionResult, InvoiceParser, SupplierInvoiceParser};
use stockin_core::models::config::ReviewConfig;
use stockin_core::models::invoice::Invoice;

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file containing OCR text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,

    /// List items that should be checked by hand
    #[arg(long)]
    review: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let review = config.review.clone();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading text...");

    let text = fs::read_to_string(&args.input)?;
    if text.trim().is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("Input file is empty: {}", args.input.display());
    }

    pb.set_message("Extracting line items...");
    let parser = SupplierInvoiceParser::new().with_config(config);
    let result = parser.parse(&text);

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.review {
        print_review(&result.invoice, &review);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Document confidence: {:.1}% ({})",
            style("ℹ").blue(),
            result.invoice.confidence * 100.0,
            result.assessment.label()
        );
        println!(
            "{} Vendor confidence: {:.1}%",
            style("ℹ").blue(),
            result.invoice.vendor.confidence * 100.0
        );
        for item in &result.invoice.line_items {
            println!(
                "   {:>5.1}%  {} [{}]",
                item.confidence * 100.0,
                item.name,
                item.parsed_by.label()
            );
        }
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_review(invoice: &Invoice, review: &ReviewConfig) {
    if !invoice.needs_review(review) {
        eprintln!("{} No review needed", style("✓").green());
        return;
    }

    eprintln!("{}", style("Review needed:").yellow());
    if invoice.confidence < review.min_document_confidence {
        eprintln!(
            "  - document confidence {:.2} is below {:.2}",
            invoice.confidence, review.min_document_confidence
        );
    }
    if invoice.vendor.is_unknown() {
        eprintln!("  - vendor could not be identified");
    }
    for item in invoice.items_needing_review(review) {
        eprintln!("  - {} ({:.2}): {}", item.name, item.confidence, item.raw_text);
    }
}

/// Render an extraction result in the requested format.
pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(&result.invoice),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "vendor",
        "invoice_number",
        "invoice_date",
        "name",
        "quantity",
        "unit_cost_ex_tax",
        "pack_size",
        "effective_unit_cost_ex_tax",
        "category",
        "tax_rate",
        "tax_amount",
        "has_tax",
        "confidence",
        "parsed_by",
    ])?;

    let invoice_number = invoice.invoice_number.clone().unwrap_or_default();
    let invoice_date = invoice.invoice_date.to_string();

    for item in &invoice.line_items {
        let record: [String; 14] = [
            invoice.vendor.name.clone(),
            invoice_number.clone(),
            invoice_date.clone(),
            item.name.clone(),
            item.quantity.to_string(),
            item.unit_cost_ex_tax.to_string(),
            item.pack_size().to_string(),
            item.effective_unit_cost_ex_tax.to_string(),
            item.category.clone(),
            item.tax_rate.map(|r| r.to_string()).unwrap_or_default(),
            item.tax_amount.map(|a| a.to_string()).unwrap_or_default(),
            item.has_tax.map(|t| t.to_string()).unwrap_or_default(),
            format!("{:.2}", item.confidence),
            item.parsed_by.label().to_string(),
        ];
        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let invoice = &result.invoice;
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", invoice.vendor.name));
    output.push_str(&format!(
        "Invoice: {}\n",
        invoice.invoice_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Date: {}\n", invoice.invoice_date));
    output.push('\n');

    if invoice.line_items.is_empty() {
        output.push_str(&format!("No line items ({})\n", result.assessment.label()));
    } else {
        output.push_str("Items:\n");
        for item in &invoice.line_items {
            output.push_str(&format!(
                "  {} x {} @ {}",
                item.quantity, item.name, item.unit_cost_ex_tax
            ));
            if let Some(pack) = item.detected_pack_size {
                output.push_str(&format!(
                    " (pack of {}, {} each)",
                    pack, item.effective_unit_cost_ex_tax
                ));
            }
            output.push_str(&format!(" [{}]", item.category));
            if let Some(tax) = item.tax_amount.filter(|_| item.has_tax == Some(true)) {
                output.push_str(&format!(" tax {}", tax));
            }
            output.push('\n');
        }
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal (ex tax): {}\n", invoice.subtotal_ex_tax()));
    output.push_str(&format!("  Tax:               {}\n", invoice.total_tax()));

    if !result.skipped_lines.is_empty() {
        output.push_str("\nUnread lines:\n");
        for line in &result.skipped_lines {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output
}
