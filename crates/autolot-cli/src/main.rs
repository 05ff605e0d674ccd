//! Autolot CLI - Browse and manage vehicle listings
//!
//! Talks to the Autolot REST API; no database access of its own.

mod api;
mod config;
mod samples;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use tracing_subscriber::EnvFilter;

use api::{AutolotClient, ListParams, VehicleResponse};
use config::Config;

#[derive(Parser)]
#[command(name = "autolot")]
#[command(about = "Autolot CLI - Browse and manage vehicle listings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vehicles
    List {
        /// Text to look for in title, make, model or description
        #[arg(short, long)]
        search: Option<String>,
        /// Exact make (case-insensitive)
        #[arg(short, long)]
        make: Option<String>,
        /// Exact model year (ignored when --min-year/--max-year are given)
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(long)]
        min_year: Option<i32>,
        #[arg(long)]
        max_year: Option<i32>,
        /// Display order
        #[arg(long, value_enum, default_value_t = SortKey::Newest)]
        sort: SortKey,
        /// Hide sold vehicles
        #[arg(long)]
        available: bool,
    },

    /// Show one vehicle in full
    Show {
        /// Vehicle ID
        id: String,
    },

    /// List distinct makes
    Makes,

    /// List distinct model years
    Years,

    /// Create a vehicle from a JSON file
    Create {
        /// Path to a JSON listing
        #[arg(short, long)]
        file: String,
    },

    /// Mark a vehicle as sold
    Sold {
        /// Vehicle ID
        id: String,
        /// Mark as available again
        #[arg(long)]
        undo: bool,
    },

    /// Post the sample catalogue
    Seed,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the API base URL
    SetUrl {
        /// e.g. https://autolot.shuttle.app
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            search,
            make,
            year,
            min_year,
            max_year,
            sort,
            available,
        } => {
            let params = ListParams {
                search,
                make,
                year,
                min_year,
                max_year,
            };
            cmd_list(params, sort, available).await
        }
        Commands::Show { id } => cmd_show(&id).await,
        Commands::Makes => cmd_makes().await,
        Commands::Years => cmd_years().await,
        Commands::Create { file } => cmd_create(&file).await,
        Commands::Sold { id, undo } => cmd_sold(&id, !undo).await,
        Commands::Seed => cmd_seed().await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)).await,
    }
}

fn client() -> Result<AutolotClient> {
    let config = Config::load()?;
    Ok(AutolotClient::new(&config.base_url))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_list(params: ListParams, sort: SortKey, available: bool) -> Result<()> {
    let mut vehicles = client()?.list_vehicles(&params).await?;

    if available {
        vehicles.retain(|v| !v.sold);
    }
    sort_vehicles(&mut vehicles, sort);

    if vehicles.is_empty() {
        println!("No vehicles found.");
        return Ok(());
    }

    println!("{} vehicles:", vehicles.len().to_string().green());
    for vehicle in &vehicles {
        print_summary(vehicle);
    }

    Ok(())
}

async fn cmd_show(id: &str) -> Result<()> {
    let v = client()?.get_vehicle(id).await?;

    println!("{}", v.title.cyan().bold());
    println!("  ID:           {}", v.id.dimmed());
    println!("  Make / Model: {} {}", v.make, v.model);
    println!("  Year:         {}", v.year);
    println!("  Price:        {}", format_price(v.price));
    println!("  Mileage:      {}", v.mileage);
    if !v.color.is_empty() {
        println!("  Color:        {}", v.color);
    }
    println!("  Fuel:         {}", v.fuel_type);
    println!("  Transmission: {}", v.transmission);
    if !v.seller_phone.is_empty() {
        println!("  Seller:       {}", v.seller_phone);
    }
    println!("  Status:       {}", status_badge(v.sold));
    println!("  Listed:       {}", v.created_at.dimmed());
    println!("  Updated:      {}", v.updated_at.dimmed());
    if !v.description.is_empty() {
        println!("\n  {}", v.description);
    }
    for image in &v.images {
        println!("  {}", image.dimmed());
    }

    Ok(())
}

async fn cmd_makes() -> Result<()> {
    for make in client()?.makes().await? {
        println!("{}", make);
    }
    Ok(())
}

async fn cmd_years() -> Result<()> {
    for year in client()?.years().await? {
        println!("{}", year);
    }
    Ok(())
}

async fn cmd_create(file: &str) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file))?;
    let body: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", file))?;

    let vehicle = client()?.create_vehicle(&body).await?;
    println!("{} Created {}", "✓".green(), vehicle.title.cyan());
    println!("  {}", vehicle.id.dimmed());

    Ok(())
}

async fn cmd_sold(id: &str, sold: bool) -> Result<()> {
    let vehicle = client()?.set_sold(id, sold).await?;
    println!(
        "{} {} is now {}",
        "✓".green(),
        vehicle.title.cyan(),
        status_badge(vehicle.sold)
    );
    Ok(())
}

async fn cmd_seed() -> Result<()> {
    let client = client()?;
    let samples = samples::sample_vehicles()?;

    println!("Seeding {} vehicles...", samples.len());
    let mut created = 0;
    for sample in &samples {
        match client.create_vehicle(sample).await {
            Ok(vehicle) => {
                created += 1;
                println!("  {} {}", "✓".green(), vehicle.title);
            }
            Err(e) => {
                let title = sample["title"].as_str().unwrap_or("?");
                println!("  {} {}: {}", "✗".red(), title, e);
            }
        }
    }

    println!("{} of {} vehicles created", created.to_string().green(), samples.len());
    Ok(())
}

async fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);

            let client = AutolotClient::new(&config.base_url);
            match client.health().await {
                Ok(health) => println!(
                    "  API: {} (database {}, v{})",
                    health.status.green(),
                    health.database,
                    health.version
                ),
                Err(_) => println!("  API: {}", "unreachable".red()),
            }
        }
        ConfigAction::SetUrl { url } => {
            config.set_base_url(&url)?;
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }
    }

    Ok(())
}

// ============================================
// Formatting
// ============================================

fn sort_vehicles(vehicles: &mut [VehicleResponse], sort: SortKey) {
    match sort {
        // Server order is already newest first
        SortKey::Newest => {}
        SortKey::Oldest => vehicles.reverse(),
        SortKey::PriceAsc => vehicles.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => vehicles.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

fn print_summary(v: &VehicleResponse) {
    println!(
        "  {} {} {} {}",
        v.id.dimmed(),
        v.title.cyan().bold(),
        format_price(v.price).green(),
        status_badge(v.sold)
    );
}

fn status_badge(sold: bool) -> colored::ColoredString {
    if sold {
        "SOLD".red()
    } else {
        "available".green()
    }
}

/// `$25,000` style, whole dollars
fn format_price(price: f64) -> String {
    let digits = format!("{:.0}", price.abs());
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return format!("${}", price);
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if price < 0.0 && digits != "0" { "-" } else { "" };
    format!("{}${}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(title: &str, price: f64) -> VehicleResponse {
        VehicleResponse {
            id: title.to_lowercase(),
            title: title.to_string(),
            make: "Make".into(),
            model: "Model".into(),
            year: 2020,
            price,
            images: vec![],
            description: String::new(),
            mileage: 0,
            color: String::new(),
            fuel_type: "Petrol".into(),
            transmission: "Manual".into(),
            seller_phone: String::new(),
            sold: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn titles(vehicles: &[VehicleResponse]) -> Vec<&str> {
        vehicles.iter().map(|v| v.title.as_str()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let listed = vec![vehicle("C", 30000.0), vehicle("B", 10000.0), vehicle("A", 20000.0)];

        let mut v = listed.clone();
        sort_vehicles(&mut v, SortKey::Newest);
        assert_eq!(titles(&v), ["C", "B", "A"]);

        let mut v = listed.clone();
        sort_vehicles(&mut v, SortKey::Oldest);
        assert_eq!(titles(&v), ["A", "B", "C"]);

        let mut v = listed.clone();
        sort_vehicles(&mut v, SortKey::PriceAsc);
        assert_eq!(titles(&v), ["B", "A", "C"]);

        let mut v = listed;
        sort_vehicles(&mut v, SortKey::PriceDesc);
        assert_eq!(titles(&v), ["C", "A", "B"]);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(25000.0), "$25,000");
        assert_eq!(format_price(1234567.4), "$1,234,567");
        assert_eq!(format_price(-1500.0), "-$1,500");
        assert_eq!(format_price(1e20), "$100,000,000,000,000,000,000");
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "autolot", "list", "--make", "Toyota", "--min-year", "2019", "--sort", "price-asc",
        ])
        .unwrap();
        match cli.command {
            Commands::List {
                make, min_year, sort, ..
            } => {
                assert_eq!(make.as_deref(), Some("Toyota"));
                assert_eq!(min_year, Some(2019));
                assert_eq!(sort, SortKey::PriceAsc);
            }
            _ => panic!("expected list"),
        }
    }
}
