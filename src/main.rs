use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use propertifi::api::{endpoints, ApiClient, ApiError, BlogQuery, ClientOptions, ManagerFilters};
use propertifi::chart::{self, svg, ChartDatum};
use propertifi::config::{self, Config};
use propertifi::scoring::{calculate_trust_score, estimate_fees, FeeInput, PropertyType, ScoreInput};
use propertifi::wizard::draft::get_drafts_path;
use propertifi::wizard::{DraftStore, FieldErrors, LeadForm, Wizard, WizardError, WizardForm};
use propertifi::{browser, credentials, fetch, output, search};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_VALIDATION: i32 = 5;

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Two-letter state code
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Name search
    #[arg(long)]
    search: Option<String>,
    /// Server-side sort; keeps the server's order instead of trust score
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    page: Option<u32>,
}

impl FilterArgs {
    fn to_filters(&self) -> ManagerFilters {
        ManagerFilters {
            state: self.state.clone(),
            city: self.city.clone(),
            search: self.search.clone(),
            sort: self.sort.clone(),
            page: self.page,
            ..Default::default()
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ChartKind {
    Bar,
    Line,
    Donut,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List property managers by trust score (default if no subcommand)
    Managers {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Open a manager's website by its index number
    Open {
        /// Index number of the manager (1-based, as shown in the list)
        index: usize,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Find cities with listed managers
    Locations { query: String },
    /// Trust score for a manager's listing details
    Score {
        /// BBB letter grade, e.g. "A+"
        #[arg(long)]
        bbb: Option<String>,
        /// Years in business as listed, e.g. "5-10 years"
        #[arg(long, default_value = "")]
        years: String,
        /// Rentals managed as listed, e.g. "500+"
        #[arg(long, default_value = "")]
        rentals: String,
        #[arg(long)]
        verified: bool,
    },
    /// Estimate management fees for a rent roll
    Fees {
        #[arg(long = "type", default_value = "single-family")]
        property_type: String,
        /// Monthly rent per unit
        #[arg(long)]
        rent: f64,
        #[arg(long, default_value_t = 1)]
        units: u32,
    },
    /// Render a JSON array of {label, value, color?} as SVG on stdout
    Chart {
        kind: ChartKind,
        data: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        /// Chart height (donut: width and height)
        #[arg(long, default_value_t = 300.0)]
        height: f64,
    },
    /// Submit an owner lead from a YAML answers file
    Lead {
        #[arg(required_unless_present = "resume")]
        answers: Option<PathBuf>,
        /// Keep the answers as a draft when a step fails
        #[arg(long)]
        save_draft: bool,
        /// Continue a saved draft
        #[arg(long, conflicts_with = "answers")]
        resume: Option<String>,
    },
    /// List blog posts
    Blogs {
        #[arg(long)]
        search: Option<String>,
    },
    /// List frequently asked questions
    Faqs {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "propertifi")]
#[command(about = "Find, score and contact property managers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/propertifi/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn exit_code(e: &ApiError) -> i32 {
    if e.is_auth_error() {
        return EXIT_AUTH;
    }
    match e {
        ApiError::Validation { .. } | ApiError::Rejected { .. } => EXIT_VALIDATION,
        ApiError::InvalidUrl(_) => EXIT_CONFIG,
        _ => EXIT_NETWORK,
    }
}

fn report(e: &ApiError) -> i32 {
    eprintln!("{}", e.user_message());
    exit_code(e)
}

fn build_client(config: &Config) -> Result<ApiClient, ApiError> {
    let api = config.api();
    let (token, source) = credentials::resolve_token(config);
    log::debug!("api {} (token: {:?})", api.base_url(), source);

    ApiClient::new(ClientOptions {
        base_url: api.base_url(),
        token,
        timeout: api.timeout().unwrap_or(None),
        retries: api.retries(),
    })
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  - {}: {}", field, message);
    }
}

fn save_lead_draft(store: &DraftStore, wizard: &Wizard<LeadForm>, existing: Option<&str>) {
    let saved = match existing {
        Some(id) => store.update(id, wizard).map(|_| id.to_string()),
        None => store.save(wizard),
    };
    match saved {
        Ok(id) => eprintln!("Draft saved as {} (continue with `propertifi lead --resume {}`)", id, id),
        Err(e) => eprintln!("Failed to save draft: {:#}", e),
    }
}

fn read_lead_form(path: &Path) -> anyhow::Result<LeadForm> {
    use anyhow::Context;
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read answers at {}", path.display()))?;
    serde_saphyr::from_str(&content).with_context(|| format!("Failed to parse answers in {}", path.display()))
}

async fn run_lead(config: &Config, answers: Option<PathBuf>, save_draft: bool, resume: Option<String>) -> i32 {
    let store = DraftStore::new(get_drafts_path());

    let mut wizard: Wizard<LeadForm> = match (&resume, answers) {
        (Some(id), _) => match store.load(id).and_then(|d| match d {
            Some(draft) => draft.resume(),
            None => anyhow::bail!("No draft with id {}", id),
        }) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_CONFIG;
            }
        },
        (None, Some(path)) => match read_lead_form(&path) {
            Ok(form) => Wizard::new(form),
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_CONFIG;
            }
        },
        (None, None) => {
            eprintln!("Provide an answers file or --resume <draft id>");
            return EXIT_CONFIG;
        }
    };

    loop {
        eprintln!(
            "Step {}/{}: {} ({}%)",
            wizard.step(),
            LeadForm::STEPS,
            wizard.title(),
            wizard.progress_percent()
        );
        if wizard.is_last_step() {
            break;
        }
        if !wizard.next() {
            eprintln!("Please fix the following:");
            print_field_errors(wizard.errors());
            if save_draft {
                save_lead_draft(&store, &wizard, resume.as_deref());
            }
            return EXIT_VALIDATION;
        }
    }

    let client = match build_client(config) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };

    match wizard.submit(&client).await {
        Ok(submitted) => {
            if let Some(message) = submitted.message {
                println!("{}", message);
            }
            if let Some(confirmation) = submitted.data {
                println!(
                    "Confirmation {}: matched with {} property managers",
                    confirmation.confirmation_number, confirmation.matched_managers_count
                );
            }
            if let Some(id) = resume.as_deref() {
                if let Err(e) = store.remove(id) {
                    log::warn!("failed to remove draft {}: {:#}", id, e);
                }
            }
            EXIT_SUCCESS
        }
        Err(err) => {
            if !wizard.errors().is_empty() {
                eprintln!("Please fix the following:");
                print_field_errors(wizard.errors());
            }
            if let Some(message) = wizard.submit_error() {
                eprintln!("{}", message);
            }
            if save_draft {
                save_lead_draft(&store, &wizard, resume.as_deref());
            }
            match err {
                WizardError::Api(ref e) => exit_code(e),
                WizardError::Invalid { .. } => EXIT_VALIDATION,
                WizardError::NotOnFinalStep { .. } => EXIT_CONFIG,
            }
        }
    }
}

fn run_chart(config: &Config, kind: ChartKind, data: &Path, title: &str, height: f64) -> i32 {
    let content = match std::fs::read_to_string(data) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read chart data at {}: {}", data.display(), e);
            return EXIT_CONFIG;
        }
    };
    let points: Vec<ChartDatum> = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid chart data in {}: {}", data.display(), e);
            return EXIT_CONFIG;
        }
    };

    let charts = config.charts();
    let rendered = match kind {
        ChartKind::Bar => svg::render_bar(&chart::bar_chart(&points, height, &charts), title, true),
        ChartKind::Line => {
            let color = charts.color_for(0, &ChartDatum::new("", 0.0));
            svg::render_line(&chart::line_chart(&points, height, &charts), title, &color)
        }
        ChartKind::Donut => svg::render_donut(&chart::donut_chart(&points, height, &charts), title),
    };
    println!("{}", rendered);
    EXIT_SUCCESS
}

async fn run(cli: Cli) -> i32 {
    let command = cli.command.unwrap_or(Commands::Managers {
        filters: FilterArgs::default(),
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        return match config::init::run_init_wizard(config_path) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                EXIT_CONFIG
            }
        };
    }

    let mut config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };
    config::apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }

    let use_colors = output::should_use_colors();

    match command {
        Commands::Score {
            bbb,
            years,
            rentals,
            verified,
        } => {
            let input = ScoreInput {
                bbb_rating: bbb,
                years_in_business: years,
                rentals_managed: rentals,
                is_verified: verified,
            };
            let score = calculate_trust_score(&input, &config.scoring());
            println!("{}", output::format_score_breakdown(&score, use_colors));
            EXIT_SUCCESS
        }
        Commands::Fees {
            property_type,
            rent,
            units,
        } => {
            let Some(property_type) = PropertyType::parse(&property_type) else {
                eprintln!(
                    "Unknown property type '{}'. Use single-family, multi-family, condo, townhouse, commercial, hoa-coa or other.",
                    property_type
                );
                return EXIT_CONFIG;
            };
            let report = estimate_fees(&FeeInput {
                property_type,
                monthly_rent: rent,
                number_of_units: units,
            });
            println!("{}", output::format_fee_report(&report, use_colors));
            EXIT_SUCCESS
        }
        Commands::Chart {
            kind,
            data,
            title,
            height,
        } => run_chart(&config, kind, &data, &title, height),
        Commands::Lead {
            answers,
            save_draft,
            resume,
        } => run_lead(&config, answers, save_draft, resume).await,
        command => {
            let client = match build_client(&config) {
                Ok(c) => c,
                Err(e) => return report(&e),
            };
            let code = run_remote(&client, &config, command, use_colors, cli.verbose).await;
            log::debug!("done in {:?}", start_time.elapsed());
            code
        }
    }
}

async fn run_remote(client: &ApiClient, config: &Config, command: Commands, use_colors: bool, verbose: bool) -> i32 {
    match command {
        Commands::Managers { filters } => {
            let (managers, meta) = match fetch::load_managers(client, &filters.to_filters(), &config.scoring()).await {
                Ok(r) => r,
                Err(e) => return report(&e),
            };
            if verbose && !managers.is_empty() {
                for scored in &managers {
                    println!("{}", output::format_manager_detail(scored, use_colors));
                    println!();
                }
            } else {
                println!("{}", output::format_manager_table(&managers, use_colors));
            }
            let footer = output::format_page_meta(meta.as_ref());
            if !footer.is_empty() {
                println!("{}", footer);
            }
            EXIT_SUCCESS
        }
        Commands::Open { index, filters } => {
            let (managers, _) = match fetch::load_managers(client, &filters.to_filters(), &config.scoring()).await {
                Ok(r) => r,
                Err(e) => return report(&e),
            };
            if index < 1 || index > managers.len() {
                eprintln!("Invalid index {}. Must be between 1 and {}.", index, managers.len());
                return EXIT_CONFIG;
            }
            let scored = &managers[index - 1];
            let Some(url) = browser::manager_url(&scored.manager) else {
                eprintln!("{} has no website listed.", scored.manager.name);
                println!("{}", output::format_manager_detail(scored, use_colors));
                return EXIT_CONFIG;
            };
            if let Err(e) = browser::open_url(&url) {
                eprintln!("Failed to open browser: {:#}", e);
                return EXIT_NETWORK;
            }
            println!("Opening {} in browser: {}", scored.manager.name, url);
            EXIT_SUCCESS
        }
        Commands::Locations { query } => match endpoints::locations(client, &query).await {
            Ok(locations) => {
                println!("{}", output::format_locations(&locations));
                EXIT_SUCCESS
            }
            Err(e) => report(&e),
        },
        Commands::Blogs { search: query } => {
            let all = BlogQuery::All {
                category_id: None,
                search: None,
            };
            match endpoints::blogs(client, &all).await {
                Ok(blogs) => {
                    let hits = search::filter(&blogs, query.as_deref().unwrap_or_default());
                    println!("{}", output::format_blog_list(&hits, use_colors));
                    EXIT_SUCCESS
                }
                Err(e) => report(&e),
            }
        }
        Commands::Faqs { search: query } => match endpoints::faqs(client).await {
            Ok(faqs) => {
                let hits = search::filter(&faqs, query.as_deref().unwrap_or_default());
                println!("{}", output::format_faq_list(&hits, use_colors));
                EXIT_SUCCESS
            }
            Err(e) => report(&e),
        },
        Commands::Score { .. }
        | Commands::Fees { .. }
        | Commands::Chart { .. }
        | Commands::Lead { .. }
        | Commands::Init => EXIT_CONFIG,
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        log::debug!("rustls crypto provider already installed");
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = run(cli).await;
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_managers() {
        let cli = Cli::parse_from(["propertifi"]);
        assert!(cli.command.is_none());
        let cli = Cli::parse_from(["propertifi", "managers", "--state", "TX", "--page", "2"]);
        match cli.command {
            Some(Commands::Managers { filters }) => {
                let f = filters.to_filters();
                assert_eq!(f.state.as_deref(), Some("TX"));
                assert_eq!(f.page, Some(2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lead_requires_answers_or_resume() {
        assert!(Cli::try_parse_from(["propertifi", "lead"]).is_err());
        assert!(Cli::try_parse_from(["propertifi", "lead", "--resume", "lead-1"]).is_ok());
        assert!(Cli::try_parse_from(["propertifi", "lead", "a.yaml", "--resume", "lead-1"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&ApiError::Http { status: 401, message: "x".into() }), EXIT_AUTH);
        assert_eq!(exit_code(&ApiError::Http { status: 500, message: "x".into() }), EXIT_NETWORK);
        assert_eq!(exit_code(&ApiError::Network("down".into())), EXIT_NETWORK);
        assert_eq!(exit_code(&ApiError::Rejected { message: "x".into() }), EXIT_VALIDATION);
        assert_eq!(exit_code(&ApiError::InvalidUrl("x".into())), EXIT_CONFIG);
    }
}
