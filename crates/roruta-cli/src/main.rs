//! ROR-UTA session CLI
//!
//! The `roruta` command prepares the XMCDA inputs of a decision workbench
//! workflow and inspects what the workbench produced.
//!
//! ## Commands
//!
//! - `table`: create (by prompting) or show the performance table
//! - `xml`: validate the session and write the six XMCDA documents
//! - `pref`: generate `.pref` files from a linear order
//! - `runs`: list workbench run directories
//! - `relations`, `utility`, `evaluate`: read a run back

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

use roruta_core::presenter::{
    render_evaluation_csv, render_matrix_text, write_evaluation_csv, write_matrix_svg,
    write_utility_grid_svg, DEFAULT_GRID,
};
use roruta_core::{
    create_csv_performance_table, create_linear_relations,
    create_random_subsample_of_all_relations, define_strong_relations, evaluate_alternatives,
    get_representative_function, list_runs, read_declared_relations, read_discovered_relations,
    read_performance_csv, utility_curves, validate_session, AlternativePair, AlternativeScore,
    CellClass, ConsolePrompt, EvalOrder, PerformanceTable, RelationKind, RelationMatrix,
    RelationSet, RunPaths, SessionConfig, SessionDocuments, SessionSpan, TableCreation,
    UtilityCurve, UtilityFunction, XmcdaWriter, DEFAULT_SEED,
};

#[derive(Parser)]
#[command(name = "roruta")]
#[command(author = "Stevedores Org")]
#[command(version = roruta_core::VERSION)]
#[command(about = "Prepare and inspect ROR-UTA decision workbench sessions", long_about = None)]
struct Cli {
    /// Session configuration file
    #[arg(short, long, global = true, env = "RORUTA_CONFIG", default_value = "roruta.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines; result commands also print JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Performance table operations
    Table {
        #[command(subcommand)]
        action: TableAction,
    },

    /// Validate the session and write the XMCDA input documents
    Xml,

    /// Validate the session without writing anything
    Validate,

    /// Generate user preference files
    Pref {
        #[command(subcommand)]
        action: PrefAction,
    },

    /// List workbench run directories, marking the latest
    Runs,

    /// Show declared vs discovered relations of a run
    Relations {
        /// Use possible relations instead of necessary ones
        #[arg(long)]
        possible: bool,

        /// Run directory name (default: latest)
        #[arg(long)]
        run: Option<String>,

        /// Write the matrix as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Show the representative utility function of a run
    Utility {
        /// Run directory name (default: latest)
        #[arg(long)]
        run: Option<String>,

        /// Write the curve grid as SVG
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Grid rows
        #[arg(long, default_value_t = DEFAULT_GRID.0)]
        rows: usize,

        /// Grid columns
        #[arg(long, default_value_t = DEFAULT_GRID.1)]
        cols: usize,
    },

    /// Score alternatives with the representative utility function
    Evaluate {
        /// Run directory name (default: latest)
        #[arg(long)]
        run: Option<String>,

        /// Write the CSV report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Report order
        #[arg(long, value_enum, default_value_t = OrderArg::Utility)]
        order: OrderArg,

        /// Alternative indices to score (default: all)
        #[arg(long, value_delimiter = ',')]
        alternatives: Option<Vec<usize>>,
    },
}

#[derive(Subcommand)]
enum TableAction {
    /// Prompt for every value unless the CSV already exists
    Create,
    /// Print the performance table
    Show,
}

#[derive(Subcommand)]
enum PrefAction {
    /// Chain consecutive elements of an order: a2 > a0, a0 > a1, ...
    Linear {
        /// Alternative indices from best to worst
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<usize>,

        /// File name under <input_folder>/preferences (".pref" is added)
        #[arg(long)]
        name: String,
    },
    /// Random subsample of all pairs implied by an order
    Sample {
        /// Alternative indices from best to worst
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<usize>,

        /// Number of distinct pairs
        #[arg(long)]
        size: usize,

        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// File name under <input_folder>/preferences (".pref" is added)
        #[arg(long)]
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Highest utility first
    Utility,
    /// Lowest utility first
    Ascending,
    /// Alphabetical
    Name,
}

impl From<OrderArg> for EvalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Utility => EvalOrder::UtilityDescending,
            OrderArg::Ascending => EvalOrder::UtilityAscending,
            OrderArg::Name => EvalOrder::Name,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    roruta_core::init_tracing(cli.json, level);

    let config = SessionConfig::load(&cli.config)
        .with_context(|| format!("Failed to load session config {:?}", cli.config))?;
    let _span = SessionSpan::enter(&config.project_name);
    let json = cli.json;

    match cli.command {
        Commands::Table { action } => match action {
            TableAction::Create => cmd_table_create(&config),
            TableAction::Show => cmd_table_show(&config, json),
        },
        Commands::Xml => cmd_xml(&config).map(|_| ()),
        Commands::Validate => cmd_validate(&config),
        Commands::Pref { action } => match action {
            PrefAction::Linear { order, name } => cmd_pref_linear(&config, &order, &name),
            PrefAction::Sample {
                order,
                size,
                seed,
                name,
            } => cmd_pref_sample(&config, &order, size, seed, &name),
        },
        Commands::Runs => cmd_runs(&config, json),
        Commands::Relations { possible, run, svg } => {
            cmd_relations(&config, possible, run.as_deref(), svg.as_deref(), json)
        }
        Commands::Utility {
            run,
            svg,
            rows,
            cols,
        } => cmd_utility(&config, run.as_deref(), svg.as_deref(), rows, cols, json),
        Commands::Evaluate {
            run,
            out,
            order,
            alternatives,
        } => cmd_evaluate(
            &config,
            run.as_deref(),
            out.as_deref(),
            order.into(),
            alternatives.as_deref(),
            json,
        )
        .map(|_| ()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn load_table(config: &SessionConfig) -> Result<PerformanceTable> {
    let path = config.performance_table_path();
    let table = read_performance_csv(&path)
        .with_context(|| format!("Failed to read performance table {:?}", path))?;
    if table.alternatives != config.session_alternatives() {
        warn!(
            path = %path.display(),
            "performance table alternatives differ from the configured session"
        );
    }
    Ok(table)
}

/// Inline preferences plus the strong relations of the configured `.pref` file.
fn load_preferences(config: &SessionConfig) -> Result<RelationSet> {
    let mut preferences = config.preferences.inline.clone();
    if let Some(file) = &config.preferences.strong_file {
        let path = config.pref_file(file);
        let strong = define_strong_relations(&path)
            .with_context(|| format!("Failed to read preference file {:?}", path))?;
        preferences.bucket_mut(RelationKind::Strong).extend(strong);
    }
    Ok(preferences)
}

fn resolve_run(config: &SessionConfig, run: Option<&str>) -> Result<RunPaths> {
    RunPaths::resolve(&config.workflow_dir(), run, &config.workbench).with_context(|| {
        format!(
            "Failed to resolve a run in workflow folder {:?}",
            config.workflow_folder
        )
    })
}

fn cmd_table_create(config: &SessionConfig) -> Result<()> {
    let path = config.performance_table_path();
    let stdin = std::io::stdin();
    let mut prompt = ConsolePrompt::new(stdin.lock(), std::io::stdout());
    let outcome = create_csv_performance_table(
        &path,
        &config.alternative_label,
        &config.session_alternatives(),
        &config.session_criteria(),
        &mut prompt,
    )
    .with_context(|| format!("Failed to create performance table {:?}", path))?;

    match outcome {
        TableCreation::Created => println!("Performance table written to {:?}", path),
        TableCreation::AlreadyPresent => {
            println!("Performance table {:?} already exists, nothing to do", path)
        }
    }
    Ok(())
}

fn cmd_table_show(config: &SessionConfig, json: bool) -> Result<()> {
    let table = load_table(config)?;
    if json {
        return print_json(&table);
    }
    print!("{}", table.to_csv());
    Ok(())
}

fn cmd_xml(config: &SessionConfig) -> Result<Vec<PathBuf>> {
    let table = load_table(config)?;
    let preferences = load_preferences(config)?;
    let writer = XmcdaWriter::new(config.project_dir());
    let written = writer
        .write_session_documents(SessionDocuments {
            table: &table,
            directions: &config.directions,
            preferences: &preferences,
            intensities: &config.intensities,
        })
        .with_context(|| format!("Failed to write XMCDA documents to {:?}", writer.dir()))?;

    for path in &written {
        println!("  {}", path.display());
    }
    info!(documents = written.len(), "session exported");
    Ok(written)
}

fn cmd_validate(config: &SessionConfig) -> Result<()> {
    let table = load_table(config)?;
    let preferences = load_preferences(config)?;
    validate_session(&table, &config.directions, &preferences, &config.intensities)
        .context("Session is invalid")?;
    println!(
        "Session is valid: {} alternatives, {} criteria, {} preferences",
        table.alternatives.len(),
        table.criteria.len(),
        preferences.len()
    );
    Ok(())
}

fn cmd_pref_linear(config: &SessionConfig, order: &[usize], name: &str) -> Result<()> {
    let path = config.pref_file(name);
    let pairs = create_linear_relations(order, &path)
        .with_context(|| format!("Failed to write linear relations to {:?}", path))?;
    println!("Wrote {} relations to {:?}", pairs.len(), path);
    Ok(())
}

fn cmd_pref_sample(
    config: &SessionConfig,
    order: &[usize],
    size: usize,
    seed: u64,
    name: &str,
) -> Result<()> {
    let path = config.pref_file(name);
    let pairs = create_random_subsample_of_all_relations(order, size, &path, seed)
        .with_context(|| format!("Failed to write random relations to {:?}", path))?;
    println!("Wrote {} relations to {:?} (seed {})", pairs.len(), path, seed);
    Ok(())
}

fn cmd_runs(config: &SessionConfig, json: bool) -> Result<()> {
    let folder = config.workflow_dir();
    let runs = list_runs(&folder).with_context(|| format!("Failed to list runs in {:?}", folder))?;
    if json {
        return print_json(&runs);
    }
    if runs.is_empty() {
        println!("No runs found in {:?}.", folder);
        return Ok(());
    }

    let last = runs.len() - 1;
    for (i, run) in runs.iter().enumerate() {
        let prefix = if i == last { "* " } else { "  " };
        match run.started_at {
            Some(ts) => println!(
                "{}{}  ({})",
                prefix,
                run.name,
                ts.format("%Y-%m-%d %H:%M:%S")
            ),
            None => println!("{}{}", prefix, run.name),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct RelationsReport<'a> {
    run: &'a Path,
    kind: &'static str,
    declared: &'a RelationSet,
    discovered: &'a [AlternativePair],
    matrix: &'a RelationMatrix,
}

fn cmd_relations(
    config: &SessionConfig,
    possible: bool,
    run: Option<&str>,
    svg: Option<&Path>,
    json: bool,
) -> Result<()> {
    let paths = resolve_run(config, run)?;
    let echo = &paths.preferences_echo;
    let declared = read_declared_relations(echo)
        .with_context(|| format!("Failed to read declared preferences {:?}", echo))?;
    let relations_file = paths.relations(possible);
    let discovered = read_discovered_relations(relations_file)
        .with_context(|| format!("Failed to read relations {:?}", relations_file))?;

    let matrix = RelationMatrix::build(config.alternatives.len(), &declared, &discovered);
    let kind = if possible { "possible" } else { "necessary" };

    if let Some(out) = svg {
        let title = if possible {
            "Possible relations"
        } else {
            "Necessary relations"
        };
        write_matrix_svg(out, &matrix, title)
            .with_context(|| format!("Failed to write SVG {:?}", out))?;
        info!(path = %out.display(), "relation matrix written");
    }

    if json {
        return print_json(&RelationsReport {
            run: &paths.dir,
            kind,
            declared: &declared,
            discovered: &discovered,
            matrix: &matrix,
        });
    }

    println!("{} relations of {}", kind, paths.dir.display());
    print!("{}", render_matrix_text(&matrix));
    println!(
        "R declared: {}  G discovered: {}  . unrelated: {}",
        matrix.count(CellClass::Declared),
        matrix.count(CellClass::Discovered),
        matrix.count(CellClass::Unrelated)
    );
    Ok(())
}

fn load_function(paths: &RunPaths) -> Result<UtilityFunction> {
    get_representative_function(&paths.representative_function).with_context(|| {
        format!(
            "Failed to read representative function {:?}",
            paths.representative_function
        )
    })
}

#[derive(Serialize)]
struct UtilityReport<'a> {
    run: &'a Path,
    function: &'a UtilityFunction,
    curves: &'a [UtilityCurve],
}

fn cmd_utility(
    config: &SessionConfig,
    run: Option<&str>,
    svg: Option<&Path>,
    rows: usize,
    cols: usize,
    json: bool,
) -> Result<()> {
    let paths = resolve_run(config, run)?;
    let function = load_function(&paths)?;
    let curves = utility_curves(&function, &config.criteria);

    if let Some(out) = svg {
        write_utility_grid_svg(out, &curves, rows, cols)
            .with_context(|| format!("Failed to write utility curves to {:?}", out))?;
        info!(path = %out.display(), "utility curves written");
    }

    if json {
        return print_json(&UtilityReport {
            run: &paths.dir,
            function: &function,
            curves: &curves,
        });
    }

    for curve in &curves {
        println!("{} ({})", curve.title, curve.criterion);
        let marginal = function.get(&curve.criterion);
        for sample in marginal.map(|m| m.samples.as_slice()).unwrap_or_default() {
            println!("  {:>12} -> {:.4}", sample.abscissa.to_string(), sample.ordinate);
        }
    }
    Ok(())
}

fn cmd_evaluate(
    config: &SessionConfig,
    run: Option<&str>,
    out: Option<&Path>,
    order: EvalOrder,
    alternatives: Option<&[usize]>,
    json: bool,
) -> Result<Vec<AlternativeScore>> {
    let paths = resolve_run(config, run)?;
    let function = load_function(&paths)?;
    let table = load_table(config)?;
    let scores = evaluate_alternatives(&table, &function, alternatives, order)
        .context("Failed to evaluate alternatives")?;

    match out {
        Some(path) => {
            write_evaluation_csv(path, &scores)
                .with_context(|| format!("Failed to write evaluation to {:?}", path))?;
            println!(
                "Evaluation of {} alternatives written to {:?}",
                scores.len(),
                path
            );
        }
        None if json => print_json(&scores)?,
        None => print!("{}", render_evaluation_csv(&scores)),
    }
    Ok(scores)
}
