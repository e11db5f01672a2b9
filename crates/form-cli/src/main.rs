mod sink;
mod values;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use hubspot_form_source::{DEFAULT_NODE_TYPE, FormSource, HttpTransport, SourceOptions};
use hubspot_form_spec::{
    FieldRegistry, FormDefinition, FormSession, Presentation, RenderOptions, SessionEffect,
    SubmissionContext, SubmissionStatus, TracingReporter, render_json_ui,
};
use serde::Serialize;
use serde_json::Value;
use sink::DirectorySink;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use values::load_values;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "HubSpot forms helper",
    long_about = "Renders HubSpot form definitions, submits them to HubSpot and ingests a portal's forms"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderFormat {
    Html,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Render a form definition.
    Render {
        /// Path to the form definition JSON (a listing entry or an ingested node).
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Optional JSON object of field values.
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// Optional JSON file with presentation options.
        #[arg(long, value_name = "OPTIONS")]
        options: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
        format: RenderFormat,
    },
    /// Submit field values to HubSpot's submission endpoint.
    Submit {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
        /// URI of the page hosting the form.
        #[arg(long, default_value = "")]
        page_uri: String,
        #[arg(long)]
        page_name: Option<String>,
        /// Raw Cookie header; the hubspotutk cookie is forwarded as the tracking token.
        #[arg(long)]
        cookie: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        /// Override the submission host (defaults to https://api.hsforms.com).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
    /// Fetch every form of a portal and write one node file per form.
    Ingest {
        #[arg(long, env = "HUBSPOT_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Node type stamped on every node.
        #[arg(long = "type", default_value = DEFAULT_NODE_TYPE)]
        node_type: String,
        /// Directory receiving `<id>.json` files.
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
        /// Override the listing host (defaults to https://api.hubapi.com).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            form,
            values,
            options,
            format,
        } => run_render(&form, values.as_deref(), options.as_deref(), format),
        Command::Submit {
            form,
            values,
            page_uri,
            page_name,
            cookie,
            ip,
            endpoint,
        } => {
            let mut context = SubmissionContext::new(page_uri);
            if let Some(page_name) = page_name {
                context = context.with_page_name(page_name);
            }
            if let Some(cookie) = cookie.as_deref() {
                context = context.with_cookie_header(cookie);
            }
            if let Some(ip) = ip {
                context = context.with_ip_address(ip);
            }
            run_submit(&form, values.as_deref(), context, endpoint).await
        }
        Command::Ingest {
            api_key,
            node_type,
            out,
            endpoint,
        } => run_ingest(api_key, node_type, out, endpoint).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_form(path: &Path) -> CliResult<FormDefinition> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn load_options(path: Option<&Path>) -> CliResult<RenderOptions> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(RenderOptions::default()),
    }
}

fn build_session(
    form: &Path,
    values: Option<&Path>,
    options: Option<&Path>,
) -> CliResult<FormSession> {
    let form = load_form(form)?;
    debug!(form_id = %form.id, "loaded form definition");
    let values = match values {
        Some(path) => load_values(path)?,
        None => BTreeMap::new(),
    };
    let presentation = Presentation::new(load_options(options)?);
    Ok(FormSession::new(
        form,
        Arc::new(FieldRegistry::with_defaults()),
        Arc::new(presentation),
    )
    .with_reporter(Arc::new(TracingReporter))
    .with_values(&values))
}

fn run_render(
    form: &Path,
    values: Option<&Path>,
    options: Option<&Path>,
    format: RenderFormat,
) -> CliResult<()> {
    let session = build_session(form, values, options)?;
    let rendered = session.render()?;
    match format {
        RenderFormat::Html => println!("{}", rendered.to_html()),
        RenderFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json_ui(&rendered))?)
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct SubmitReport<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    effects: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a hubspot_form_spec::SubmissionResponse>,
}

fn effect_json(effect: &SessionEffect) -> Value {
    match effect {
        SessionEffect::ScrollTo(id) => serde_json::json!({ "scrollTo": id }),
        SessionEffect::Redirect(url) => serde_json::json!({ "redirect": url }),
    }
}

async fn run_submit(
    form: &Path,
    values: Option<&Path>,
    context: SubmissionContext,
    endpoint: Option<String>,
) -> CliResult<()> {
    let mut session = build_session(form, values, None)?.with_context(context);
    if let Some(endpoint) = endpoint {
        session = session.with_submit_base_url(endpoint);
    }

    let effects = session.submit(&HttpTransport::new()).await?;
    let report = SubmitReport {
        status: session.status().as_str(),
        effects: effects.iter().map(effect_json).collect(),
        response: session.response(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if session.status() == SubmissionStatus::Failed {
        return Err("submission failed".into());
    }
    Ok(())
}

async fn run_ingest(
    api_key: String,
    node_type: String,
    out: PathBuf,
    endpoint: Option<String>,
) -> CliResult<()> {
    let mut source = FormSource::new(SourceOptions::new(api_key).with_node_type(node_type))?;
    if let Some(endpoint) = endpoint {
        source = source.with_base_url(endpoint);
    }
    fs::create_dir_all(&out)?;

    let mut sink = DirectorySink::new(out);
    let created = source.source_nodes(&mut sink).await?;
    println!(
        "Wrote {} form node(s) to {}",
        created,
        sink.dir().display()
    );
    for path in sink.written() {
        println!("  {}", path.display());
    }
    Ok(())
}
