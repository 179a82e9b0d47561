use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use gallery_panel::config::ConfigError;
use gallery_panel::error::GENERIC_FAILURE_MESSAGE;
use gallery_panel::http::FileUpload;
use gallery_panel::jalali::{self, JalaliDate, JalaliError};
use gallery_panel::services::{InquiryQuery, InquiryReply, MediaOrder, ProductQuery, SortOrder, UploadCategory};
use gallery_panel::validate::{ValidationError, validate_otp, validate_phone};
use gallery_panel::{Access, ApiClient, ApiError, AuthController, FileStorage, Navigator, PanelConfig, SessionStore, StorageError};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{}", describe_api_error(.0))]
    Api(#[from] ApiError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Date(#[from] JalaliError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("not logged in; run `gallery-panel login` first")]
    NotLoggedIn,
    #[error("{0}")]
    Usage(String),
}

#[derive(Parser, Debug)]
#[command(name = "gallery-panel", about = "Jewelry gallery merchant panel CLI")]
struct Cli {
    /// Overrides `PANEL_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `PANEL_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Text a one-time login code to a phone number.
    Otp { phone: String },
    /// Verify a code and store the session.
    Login {
        phone: String,
        /// Prompted for on stdin when omitted.
        #[arg(long)]
        otp: Option<String>,
    },
    Logout,
    /// Show the stored session without calling the server.
    Whoami,
    Profile(ProfileCommand),
    Products(ProductsCommand),
    Inquiries(InquiriesCommand),
    Subscription(SubscriptionCommand),
    Categories(CategoriesCommand),
    Upload(UploadCommand),
    /// Jalali calendar conversions.
    Date(DateCommand),
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProductsSubcommand {
    Mine {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long, default_value_t = false)]
        ascending: bool,
    },
    Latest,
    Read {
        product_id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        product_id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        product_id: String,
    },
    MarkSold {
        product_id: String,
    },
    Media {
        product_id: String,
    },
    /// Reorder media; the first id becomes primary unless `--primary` is set.
    Reorder {
        product_id: String,
        #[arg(required = true)]
        media_ids: Vec<String>,
        #[arg(long)]
        primary: Option<String>,
    },
}

#[derive(Args, Debug)]
struct InquiriesCommand {
    #[command(subcommand)]
    command: InquiriesSubcommand,
}

#[derive(Subcommand, Debug)]
enum InquiriesSubcommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        status: Option<String>,
    },
    Read {
        inquiry_id: String,
    },
    Respond {
        inquiry_id: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value_t = false)]
        unavailable: bool,
        /// Alternative product id; repeat for several.
        #[arg(long = "suggest")]
        suggestions: Vec<String>,
    },
    Stats,
}

#[derive(Args, Debug)]
struct SubscriptionCommand {
    #[command(subcommand)]
    command: SubscriptionSubcommand,
}

#[derive(Subcommand, Debug)]
enum SubscriptionSubcommand {
    Current,
    Plans,
    Limits,
    History,
}

#[derive(Args, Debug)]
struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesSubcommand {
    List,
    Tree,
    Search { query: String },
}

#[derive(Args, Debug)]
struct UploadCommand {
    #[command(subcommand)]
    command: UploadSubcommand,
}

#[derive(Subcommand, Debug)]
enum UploadSubcommand {
    File {
        path: PathBuf,
        #[arg(long, default_value = "general")]
        category: UploadCategory,
        #[arg(long)]
        alt: Option<String>,
    },
    Mine {
        #[arg(long)]
        category: Option<UploadCategory>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Delete {
        upload_id: String,
    },
    Stats,
    /// Attach images to a product.
    ProductMedia {
        product_id: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long, default_value_t = 0)]
        primary: usize,
        #[arg(long = "alt")]
        alt_texts: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct DateCommand {
    #[command(subcommand)]
    command: DateSubcommand,
}

#[derive(Subcommand, Debug)]
enum DateSubcommand {
    Today,
    /// `YYYY-MM-DD` to Jalali.
    ToJalali { date: String },
    /// `YYYY/MM/DD` (Jalali) to Gregorian.
    ToGregorian { date: String },
}

/// Tells the terminal user the session is gone instead of redirecting.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn to_login(&self) {
        eprintln!("session expired; run `gallery-panel login` to sign in again");
    }

    fn account_inactive(&self, message: &str) {
        eprintln!("account unavailable: {message}");
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let command = match cli.command {
        Command::Date(date) => return run_date(date),
        command => command,
    };

    let auth = connect(cli.base_url.as_deref(), cli.session_file)?;
    match command {
        Command::Otp { phone } => {
            let phone = validate_phone(&phone)?;
            print_json(&auth.request_otp(phone).await?)
        }
        Command::Login { phone, otp } => run_login(&auth, &phone, otp).await,
        Command::Logout => {
            auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&auth),
        Command::Profile(profile) => run_profile(&auth, profile).await,
        Command::Products(products) => run_products(require_login(&auth)?, products).await,
        Command::Inquiries(inquiries) => run_inquiries(require_login(&auth)?, inquiries).await,
        Command::Subscription(subscription) => run_subscription(require_login(&auth)?, subscription).await,
        Command::Categories(categories) => run_categories(auth.client(), categories).await,
        Command::Upload(upload) => run_upload(require_login(&auth)?, upload).await,
        Command::Date(date) => run_date(date),
    }
}

fn connect(base_url: Option<&str>, session_file: Option<PathBuf>) -> Result<AuthController, CliError> {
    let mut config = PanelConfig::from_env()?;
    if let Some(base_url) = base_url {
        config.base_url = PanelConfig::new(base_url)?.base_url;
    }
    if let Some(session_file) = session_file {
        config.session_file = session_file;
    }

    let storage = Arc::new(FileStorage::open(&config.session_file)?);
    let session = Arc::new(SessionStore::new(storage));
    session.hydrate();
    tracing::debug!(base_url = %config.base_url, "panel client ready");

    let client = ApiClient::builder(config, session)
        .navigator(Arc::new(TerminalNavigator))
        .build()?;
    Ok(AuthController::new(client))
}

fn require_login(auth: &AuthController) -> Result<&ApiClient, CliError> {
    match auth.session().access() {
        Access::Granted => Ok(auth.client()),
        Access::Pending | Access::LoginRequired => Err(CliError::NotLoggedIn),
    }
}

async fn run_login(auth: &AuthController, phone: &str, otp: Option<String>) -> Result<(), CliError> {
    let phone = validate_phone(phone)?;
    let otp = match otp {
        Some(otp) => otp,
        None => prompt("verification code: ")?,
    };
    let otp = validate_otp(&otp)?;

    let response = auth.verify_and_login(phone, otp).await?;
    let principal = response.principal().cloned().unwrap_or(Value::Null);
    print_json(&json!({ "principal": principal, "flags": response.flags }))
}

fn run_whoami(auth: &AuthController) -> Result<(), CliError> {
    let session = auth.session();
    match session.access() {
        Access::Granted => print_json(session.principal.as_ref().unwrap_or(&Value::Null)),
        Access::Pending | Access::LoginRequired => Err(CliError::NotLoggedIn),
    }
}

async fn run_profile(auth: &AuthController, profile: ProfileCommand) -> Result<(), CliError> {
    let client = require_login(auth)?;
    match profile.command {
        ProfileSubcommand::Show => print_json(&client.jewelers().profile().await?),
        ProfileSubcommand::Update { data } => {
            let changes = serde_json::from_str::<Value>(&data)?;
            let updated = client.jewelers().update_profile(changes).await?;
            auth.update_principal(updated.clone())?;
            print_json(&updated)
        }
    }
}

async fn run_products(client: &ApiClient, products: ProductsCommand) -> Result<(), CliError> {
    let api = client.products();
    let json = match products.command {
        ProductsSubcommand::Mine {
            page,
            limit,
            search,
            category,
            sort_by,
            ascending,
        } => {
            let query = ProductQuery {
                page,
                limit,
                sort_order: sort_by.as_ref().map(|_| if ascending { SortOrder::Asc } else { SortOrder::Desc }),
                sort_by,
                search,
                category_id: category,
            };
            api.mine(&query).await?
        }
        ProductsSubcommand::Latest => api.mine(&ProductQuery::latest()).await?,
        ProductsSubcommand::Read { product_id } => api.by_id(&product_id).await?,
        ProductsSubcommand::Create { data } => api.create(serde_json::from_str(&data)?).await?,
        ProductsSubcommand::Update { product_id, data } => api.update(&product_id, serde_json::from_str(&data)?).await?,
        ProductsSubcommand::Delete { product_id } => api.delete(&product_id).await?,
        ProductsSubcommand::MarkSold { product_id } => api.mark_sold(&product_id).await?,
        ProductsSubcommand::Media { product_id } => client.uploads().product_media(&product_id).await?,
        ProductsSubcommand::Reorder {
            product_id,
            media_ids,
            primary,
        } => {
            let order = match primary {
                Some(primary) => MediaOrder::with_primary(&media_ids, &primary),
                None => MediaOrder::first_primary(&media_ids),
            };
            client.uploads().update_media_order(&product_id, &order).await?
        }
    };
    print_json(&json)
}

async fn run_inquiries(client: &ApiClient, inquiries: InquiriesCommand) -> Result<(), CliError> {
    let api = client.inquiries();
    let json = match inquiries.command {
        InquiriesSubcommand::List { page, limit, status } => {
            api.for_jeweler(&InquiryQuery { page, limit, status }).await?
        }
        InquiriesSubcommand::Read { inquiry_id } => api.by_id(&inquiry_id).await?,
        InquiriesSubcommand::Respond {
            inquiry_id,
            message,
            unavailable,
            suggestions,
        } => {
            let reply = InquiryReply {
                is_available: !unavailable,
                response_message: message,
                suggested_product_ids: suggestions,
            };
            api.respond(&inquiry_id, &reply).await?
        }
        InquiriesSubcommand::Stats => api.stats().await?,
    };
    print_json(&json)
}

async fn run_subscription(client: &ApiClient, subscription: SubscriptionCommand) -> Result<(), CliError> {
    let api = client.subscriptions();
    let json = match subscription.command {
        SubscriptionSubcommand::Current => api.current().await?,
        SubscriptionSubcommand::Plans => api.plans().await?,
        SubscriptionSubcommand::Limits => api.limits().await?,
        SubscriptionSubcommand::History => api.history().await?,
    };
    print_json(&json)
}

async fn run_categories(client: &ApiClient, categories: CategoriesCommand) -> Result<(), CliError> {
    let api = client.categories();
    let json = match categories.command {
        CategoriesSubcommand::List => api.all().await?,
        CategoriesSubcommand::Tree => api.hierarchical().await?,
        CategoriesSubcommand::Search { query } => api.search(&query).await?,
    };
    print_json(&json)
}

async fn run_upload(client: &ApiClient, upload: UploadCommand) -> Result<(), CliError> {
    let api = client.uploads();
    match upload.command {
        UploadSubcommand::File { path, category, alt } => {
            let file = read_upload(&path)?;
            let alt = alt.unwrap_or_else(|| category.default_alt_text().to_owned());
            print_json(&api.upload_single(&file, category, &alt).await?)
        }
        UploadSubcommand::Mine { category, page, limit } => print_json(&api.my_uploads(category, page, limit).await?),
        UploadSubcommand::Delete { upload_id } => {
            api.delete_upload(&upload_id).await?;
            println!("deleted {upload_id}");
            Ok(())
        }
        UploadSubcommand::Stats => print_json(&api.upload_stats().await?),
        UploadSubcommand::ProductMedia {
            product_id,
            paths,
            primary,
            alt_texts,
        } => {
            if primary >= paths.len() {
                return Err(CliError::Usage(format!(
                    "--primary {primary} is out of range for {} file(s)",
                    paths.len()
                )));
            }
            let files = paths.iter().map(|p| read_upload(p)).collect::<Result<Vec<_>, _>>()?;
            print_json(&api.upload_product_media(&product_id, &files, primary, &alt_texts).await?)
        }
    }
}

fn run_date(date: DateCommand) -> Result<(), CliError> {
    let jalali = match date.command {
        DateSubcommand::Today => jalali::to_jalali(time::OffsetDateTime::now_utc().date())?,
        DateSubcommand::ToJalali { date } => jalali::gregorian_str_to_jalali(&date)?,
        DateSubcommand::ToGregorian { date } => {
            let parsed = date.parse::<JalaliDate>()?;
            println!("{}", jalali::jalali_to_gregorian_string(parsed)?);
            return Ok(());
        }
    };
    println!("{jalali}  ({})", jalali.long());
    Ok(())
}

fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    FileUpload::from_path(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn prompt(label: &str) -> Result<String, CliError> {
    let mut stderr = io::stderr();
    stderr.write_all(label.as_bytes())?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Server failures show the server's own message; local failures show the
/// error chain.
fn describe_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Status { status, .. } => {
            format!("{} (HTTP {status})", error.display_message(GENERIC_FAILURE_MESSAGE))
        }
        other => other.to_string(),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
