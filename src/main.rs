// Terminal front end for the dashboard.
//
// - Loads the report tables once into a `DashboardContext`.
// - Prints the KPI cards and monthly trend for the selected filters.
// - With `--interactive`, loops over a small menu so the category and
//   contract selection can be changed; each change recomputes everything.
use anyhow::{Context, Result};
use contract_dashboard::cli::{Args, SourceSpec};
use contract_dashboard::output::{self, render_dashboard};
use contract_dashboard::util::format_int;
use contract_dashboard::{
    compute, ContractFilter, CsvSource, DashboardContext, DashboardResult, MockSource,
    ReportSource,
};
use std::io::{self, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Current filter selection, as the sidebar would hold it.
struct Session {
    ctx: DashboardContext,
    category: String,
    contracts: Vec<String>,
}

impl Session {
    fn refresh(&self) -> DashboardResult {
        let filter = ContractFilter::from_selection(&self.contracts);
        compute(&self.ctx, &self.category, &filter)
    }

    fn show(&self) -> DashboardResult {
        let result = self.refresh();
        println!("\n{}", render_dashboard(&self.category, &result));
        result
    }
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn open_source(spec: &SourceSpec) -> Box<dyn ReportSource> {
    match spec {
        SourceSpec::Mock(seed) => Box::new(MockSource::new(*seed)),
        SourceSpec::Csv(path) => Box::new(CsvSource::new(path)),
    }
}

/// Read one trimmed line after printing `prompt`. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn choose_category(session: &mut Session) {
    println!("Categories:");
    for (i, c) in session.ctx.categories().iter().enumerate() {
        println!("[{}] {}", i + 1, c);
    }
    let Some(choice) = read_line("Enter choice: ") else { return };
    let picked = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| session.ctx.categories().get(i).cloned())
        .or_else(|| session.ctx.has_category(&choice).then(|| choice.clone()));
    match picked {
        Some(c) => session.category = c,
        None => println!("Invalid choice. Unknown category `{}`.", choice),
    }
}

fn choose_contracts(session: &mut Session) {
    println!("Contracts: {}", session.ctx.contract_ids().join(", "));
    let Some(line) = read_line("Enter ids (comma-separated, `All` or empty for all): ") else {
        return;
    };
    let ids: Vec<String> = line
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    for id in &ids {
        if id != contract_dashboard::ALL_SENTINEL && !session.ctx.has_contract(id) {
            warn!("Unknown contract id `{}`", id);
        }
    }
    session.contracts = ids;
}

fn interactive(session: &mut Session) {
    loop {
        println!(
            "Category: {} | Contracts: {}",
            session.category,
            if session.contracts.is_empty() {
                "All".to_string()
            } else {
                session.contracts.join(", ")
            }
        );
        println!("[1] Change category");
        println!("[2] Change contracts");
        println!("[3] Exit\n");
        match read_line("Enter choice: ").as_deref() {
            Some("1") => {
                choose_category(session);
                session.show();
            }
            Some("2") => {
                choose_contracts(session);
                session.show();
            }
            Some("3") | None => {
                println!("Exiting the program.");
                break;
            }
            Some(_) => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

fn export(args: &Args, result: &DashboardResult) -> Result<()> {
    if let Some(path) = &args.json {
        output::write_json(path, result)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Result exported to {}", path.display());
    }
    if let Some(path) = &args.csv {
        output::write_csv(path, &output::series_rows(&result.series))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Monthly series exported to {}", path.display());
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let source = open_source(&args.source_spec());
    let ctx = DashboardContext::init(source.as_ref()).context("Failed to load report data")?;

    let load = ctx.load_report();
    println!(
        "Loaded {} reports for {} contracts in {} categories.",
        format_int(load.total_rows),
        format_int(load.contracts),
        format_int(load.categories)
    );

    let category = match &args.category {
        Some(c) => {
            if !ctx.has_category(c) {
                warn!("Category `{}` is not present in the loaded data", c);
            }
            c.clone()
        }
        None => ctx
            .default_category()
            .map(str::to_string)
            .context("Report data has no categories")?,
    };
    let contracts = args.contracts.clone().unwrap_or_else(|| ctx.default_selection());
    debug!(%category, ?contracts, "Initial selection");

    let mut session = Session { ctx, category, contracts };
    let result = session.show();
    export(&args, &result)?;

    if args.interactive {
        interactive(&mut session);
    }
    Ok(())
}

fn main() {
    let args = Args::parse_args();
    init_logging(&args);

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
