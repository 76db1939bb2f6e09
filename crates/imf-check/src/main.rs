use anyhow::Context;
use clap::{Parser, ValueEnum};
use internet_message::{normalize_crlf, InternetMessage, ParserConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Internet Message Format validator.
///
/// Parses each file strictly, reports the first violation found,
/// and verifies that regenerating the parsed message reproduces
/// the file byte for byte.
#[derive(Debug, Parser)]
#[command(about)]
struct Opt {
    /// Load parser limits from this TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum octets per header line, including CRLF.
    /// 0 disables the check. Overrides the config file.
    #[arg(long)]
    line_length_limit: Option<usize>,

    /// Convert lone CR and LF to CRLF before parsing
    #[arg(long)]
    normalize: bool,

    /// Print the decomposed headers and body size as JSON
    #[arg(long)]
    dump: bool,

    /// Format for diagnostic output on stderr.
    /// The filter is taken from IMF_CHECK_LOG.
    #[arg(long, value_enum, default_value = "full")]
    diag_format: DiagnosticFormat,

    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[clap(rename_all = "kebab_case")]
enum DiagnosticFormat {
    Full,
    Compact,
    Json,
}

#[derive(Serialize)]
struct HeaderSummary {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct MessageSummary {
    file: String,
    headers: Vec<HeaderSummary>,
    body_len: usize,
}

impl MessageSummary {
    fn new(file: &Path, msg: &InternetMessage) -> Self {
        Self {
            file: file.display().to_string(),
            headers: msg
                .get_headers()
                .iter()
                .map(|header| HeaderSummary {
                    name: header.get_name().to_string(),
                    value: header.get_value().to_string(),
                })
                .collect(),
            body_len: msg.get_body().len(),
        }
    }
}

impl Opt {
    fn parser_config(&self) -> anyhow::Result<ParserConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => ParserConfig::default(),
        };
        if let Some(limit) = self.line_length_limit {
            config.line_length_limit = limit;
        }
        Ok(config)
    }
}

fn init_logging(format: DiagnosticFormat) {
    let layer = fmt::layer().with_writer(std::io::stderr);
    let layer = match format {
        DiagnosticFormat::Full => layer.boxed(),
        DiagnosticFormat::Compact => layer.compact().boxed(),
        DiagnosticFormat::Json => layer.json().boxed(),
    };
    let filter = EnvFilter::try_from_env("IMF_CHECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("imf_check=info"));

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}

/// Parse `data` and confirm that it regenerates to the same octets
fn check_message(data: &[u8], config: &ParserConfig) -> anyhow::Result<InternetMessage> {
    let msg = InternetMessage::parse_with_config(data, config)?;
    let regenerated = msg.generate_raw_message();
    anyhow::ensure!(
        regenerated == data,
        "regenerated message differs from input ({} vs {} octets)",
        regenerated.len(),
        data.len()
    );
    Ok(msg)
}

fn check_file(path: &Path, opts: &Opt, config: &ParserConfig) -> anyhow::Result<()> {
    let mut data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if opts.normalize {
        data = normalize_crlf(&data);
    }

    let msg = check_message(&data, config).with_context(|| format!("{}", path.display()))?;
    tracing::debug!(
        "{}: {} headers, {} body octets",
        path.display(),
        msg.get_headers().len(),
        msg.get_body().len()
    );

    if opts.dump {
        println!(
            "{}",
            serde_json::to_string_pretty(&MessageSummary::new(path, &msg))?
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opt::parse();
    init_logging(opts.diag_format);

    let config = opts.parser_config()?;
    tracing::debug!("using {config:?}");

    let mut failures = 0;
    for path in &opts.files {
        if let Err(err) = check_file(path, &opts, &config) {
            tracing::error!("{err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} files failed validation", opts.files.len());
    }

    println!("OK");
    Ok(())
}
