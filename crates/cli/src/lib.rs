use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use report::FocusReport;
use serve::ServeConfig;
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use symgraph_go::LoadConfig;
use symgraph_graph::{ExtractConfig, Graph, GraphBuilder};

mod report;
mod serve;

const PORT_ENV: &str = "SYMGRAPH_PORT";
const D3_ENV: &str = "SYMGRAPH_D3";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "symgraph")]
#[command(about = "Symbol dependency graphs for Go packages", long_about = None)]
#[command(version)]
struct Cli {
    /// Package directories, `dir/...` for recursive discovery, or import
    /// paths inside the current module. Omit to read graph JSON from stdin
    /// and serve it
    patterns: Vec<String>,

    /// Print the graph as JSON to stdout
    #[arg(long, conflicts_with = "text")]
    json: bool,

    /// Print a text dependency listing to stdout
    #[arg(long)]
    text: bool,

    /// Print the focus report for these ids instead of the graph (with --json/--text)
    #[arg(long, value_name = "ID")]
    focus: Vec<String>,

    /// Serve port (overrides SYMGRAPH_PORT, default 8080)
    #[arg(long)]
    port: Option<u16>,

    /// Serve host
    #[arg(long, default_value = serve::DEFAULT_BIND)]
    bind: String,

    /// Local force-layout bundle served at /d3.js (overrides SYMGRAPH_D3)
    #[arg(long, value_name = "FILE")]
    d3: Option<PathBuf>,

    /// Skip _test.go files
    #[arg(long)]
    no_tests: bool,

    /// Emit member-access links for interface-typed receivers
    #[arg(long)]
    interface_members: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Json,
    Text,
}

impl Cli {
    fn output(&self) -> Option<Output> {
        if self.json {
            Some(Output::Json)
        } else if self.text {
            Some(Output::Text)
        } else {
            None
        }
    }

    fn serve_config(&self) -> Result<ServeConfig> {
        let port = match self.port {
            Some(port) => port,
            None => match env::var(PORT_ENV) {
                Ok(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {PORT_ENV}: {raw}"))?,
                Err(_) => serve::DEFAULT_PORT,
            },
        };
        Ok(ServeConfig {
            bind: self.bind.clone(),
            port,
            d3: self
                .d3
                .clone()
                .or_else(|| env::var_os(D3_ENV).map(PathBuf::from)),
        })
    }

    fn load_config(&self) -> Result<LoadConfig> {
        let cwd = env::current_dir().context("Failed to resolve working directory")?;
        Ok(LoadConfig::new(cwd).with_tests(!self.no_tests))
    }

    fn extract_config(&self) -> ExtractConfig {
        let config = ExtractConfig::default().with_interface_member_links(self.interface_members);
        if self.no_tests {
            config.without_tests()
        } else {
            config
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout is reserved for the JSON/text output
    if cli.output().is_some() {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let output = cli.output();
    if !cli.focus.is_empty() && output.is_none() {
        anyhow::bail!("--focus requires --json or --text");
    }

    if cli.patterns.is_empty() {
        if output.is_some() {
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(1);
        }
        let graph = read_stdin_graph()?;
        return serve::serve(&graph, &cli.serve_config()?).await;
    }

    let graph = analyze(&cli)?;
    match output {
        Some(output) if !cli.focus.is_empty() => {
            let report = FocusReport::compute(graph, &cli.focus);
            match output {
                Output::Json => print_stdout(&serde_json::to_string_pretty(&report)?),
                Output::Text => print_stdout(&report.render_text()),
            }
        }
        Some(Output::Json) => print_stdout(&graph.to_json_pretty()?),
        Some(Output::Text) => print_stdout(&report::render_listing(&graph)),
        None => serve::serve(&graph, &cli.serve_config()?).await,
    }
}

fn analyze(cli: &Cli) -> Result<Graph> {
    let program = symgraph_go::load(&cli.patterns, &cli.load_config()?)
        .context("Failed to load Go packages")?;
    log::debug!("Loaded module {}", program.module().path);
    Ok(GraphBuilder::new(cli.extract_config()).build(&program))
}

fn read_stdin_graph() -> Result<Graph> {
    log::info!("Reading graph data from stdin...");
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read JSON from stdin")?;
    Graph::from_json(&input).context("Invalid graph JSON on stdin")
}
