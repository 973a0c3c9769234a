use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use storefront::application::checkout::{
    CheckoutEngine, CheckoutOutcome, CheckoutPolicy, DeliveryChoice, ScriptedDriver,
};
use storefront::application::customers::CustomerDirectory;
use storefront::application::orders::OrderHistory;
use storefront::domain::catalog::Catalog;
use storefront::domain::customer::CustomerAccount;
use storefront::domain::ledger::PricingLedger;
use storefront::domain::money::Money;
use storefront::domain::order::{DeliveryMethod, OrderId, OrderRecord};
use storefront::domain::ports::{CollectionBackendRef, PaymentGatewayBox};
use storefront::infrastructure::file::FileBackend;
use storefront::infrastructure::gateway::{GatewayConfig, SimulatedGateway};
use storefront::infrastructure::persistence::{CUSTOMERS, ORDERS, PersistenceStore};
use storefront::interfaces::csv::cart_reader::CartReader;
use storefront::interfaces::csv::report_writer::ReportWriter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the customers and orders collections
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Seed for the simulated payment gateway
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Chance that a well-formed card is declined
    #[arg(long, default_value_t = 0.2, global = true)]
    decline_rate: f64,

    /// Charge attempts before an order is abandoned
    #[arg(long, default_value_t = 3, global = true)]
    max_attempts: u32,

    /// Flat fee for mail delivery
    #[arg(long, default_value = "3.00", value_parser = parse_money, global = true)]
    mail_fee: Money,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the product catalog
    Catalog,
    /// Register a new customer account
    Register {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        card: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// Check out a cart file for a registered customer
    Checkout {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        password: String,
        /// Answer to the account's security question
        #[arg(long)]
        answer: String,
        /// Cart CSV file with `item,quantity` rows
        #[arg(long)]
        cart: PathBuf,
        #[arg(long, value_enum, default_value_t = DeliveryArg::Mail)]
        delivery: DeliveryArg,
        /// Card to retry with after a decline, saved onto the account; repeat
        /// for more retries
        #[arg(long = "retry-card")]
        retry_cards: Vec<String>,
    },
    /// List a customer's orders, newest first
    Orders {
        #[arg(long)]
        customer: String,
        /// Show a single order
        #[arg(long)]
        order: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeliveryArg {
    Mail,
    Pickup,
    Abort,
}

impl From<DeliveryArg> for DeliveryChoice {
    fn from(arg: DeliveryArg) -> Self {
        match arg {
            DeliveryArg::Mail => DeliveryChoice::Method(DeliveryMethod::Mail),
            DeliveryArg::Pickup => DeliveryChoice::Method(DeliveryMethod::InStorePickup),
            DeliveryArg::Abort => DeliveryChoice::Abort,
        }
    }
}

fn parse_money(raw: &str) -> std::result::Result<Money, String> {
    let value = Decimal::from_str(raw).map_err(|e| e.to_string())?;
    if value.is_sign_negative() {
        return Err("amount must not be negative".to_string());
    }
    Ok(Money::new(value))
}

fn open_backend(cli: &Cli) -> Result<CollectionBackendRef> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        let store = storefront::infrastructure::rocksdb::RocksDbBackend::open(db_path)
            .into_diagnostic()?;
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if let Some(db_path) = &cli.db_path {
        warn!(
            path = %db_path.display(),
            "built without the storage-rocksdb feature, using file storage instead"
        );
    }

    Ok(Arc::new(FileBackend::new(&cli.data_dir)))
}

fn read_cart(path: &Path, catalog: &Catalog) -> Result<PricingLedger> {
    let file = File::open(path).into_diagnostic()?;
    let mut ledger = PricingLedger::new();
    for row_result in CartReader::new(file).rows() {
        match row_result.and_then(|row| row.resolve(catalog)) {
            Ok((item, quantity)) => ledger.add_line(item, quantity),
            Err(e) => warn!(error = %e, "skipping cart line"),
        }
    }
    Ok(ledger)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::standard();
    let backend = open_backend(&cli)?;
    let customers: PersistenceStore<CustomerAccount> =
        PersistenceStore::new(backend.clone(), CUSTOMERS);
    let orders: PersistenceStore<OrderRecord> = PersistenceStore::new(backend, ORDERS);

    match cli.command {
        Command::Catalog => {
            ReportWriter::new(io::stdout().lock())
                .write_catalog(catalog.items())
                .into_diagnostic()?;
        }
        Command::Register {
            id,
            password,
            name,
            address,
            card,
            question,
            answer,
        } => {
            let mut directory = CustomerDirectory::open(customers).await;
            let durability = directory
                .register(CustomerAccount {
                    id: id.clone(),
                    password,
                    name,
                    address,
                    card,
                    security_question: question,
                    security_answer: answer,
                })
                .await
                .into_diagnostic()?;
            if !durability.is_persisted() {
                eprintln!("Warning: account {id} could not be saved and will be lost on exit");
            }
            println!("Registered customer {id}");
        }
        Command::Checkout {
            customer,
            password,
            answer,
            cart,
            delivery,
            retry_cards,
        } => {
            let directory = CustomerDirectory::open(customers.clone()).await;
            let account = directory
                .authenticate(&customer, &password, &answer)
                .into_diagnostic()?;
            let card = account.card.clone();

            let mut ledger = read_cart(&cart, &catalog)?;
            info!(
                lines = ledger.len(),
                subtotal = %ledger.subtotal(),
                tax = %ledger.tax_amount(),
                total = %ledger.total(),
                "cart loaded"
            );

            let config = GatewayConfig {
                decline_probability: cli.decline_rate,
            };
            let gateway: PaymentGatewayBox = match cli.seed {
                Some(seed) => Box::new(SimulatedGateway::seeded(config, seed)),
                None => Box::new(SimulatedGateway::new(config)),
            };
            let mut engine = CheckoutEngine::with_policy(
                customers,
                orders,
                gateway,
                CheckoutPolicy {
                    max_attempts: cli.max_attempts,
                    mail_fee: cli.mail_fee,
                },
            );
            if let Some(seed) = cli.seed {
                engine = engine.with_order_id_seed(seed);
            }

            let mut driver = ScriptedDriver::new(delivery.into()).with_replacement_cards(retry_cards);
            match engine
                .checkout(&customer, &card, &mut ledger, &mut driver)
                .await
                .into_diagnostic()?
            {
                CheckoutOutcome::Committed(placed) => {
                    ReportWriter::new(io::stdout().lock())
                        .write_orders([&placed.order])
                        .into_diagnostic()?;
                    if !placed.durability.is_persisted() {
                        eprintln!(
                            "Warning: order {} was placed but could not be saved",
                            placed.order.order_id
                        );
                    }
                }
                CheckoutOutcome::Aborted(reason) => {
                    return Err(miette!("Order not placed: {reason}"));
                }
            }
        }
        Command::Orders { customer, order } => {
            let history = OrderHistory::load(&orders).await;
            if history.is_empty() {
                info!("no orders on file");
            }

            let listing = match order {
                Some(raw) => {
                    let order_id: OrderId = raw.parse().into_diagnostic()?;
                    let found = history
                        .find(&order_id)
                        .filter(|record| record.customer_id == customer)
                        .ok_or_else(|| miette!("No order {order_id} for customer {customer}"))?;
                    vec![found]
                }
                None => history.for_customer(&customer),
            };
            ReportWriter::new(io::stdout().lock())
                .write_orders(listing)
                .into_diagnostic()?;
        }
    }

    Ok(())
}
