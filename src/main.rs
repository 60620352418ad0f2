mod cli;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use rust_decimal::Decimal;
use rusqlite::Connection;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use cli::{Cli, Commands};
use iptu::config::CategoryTable;
use iptu::db::{self, SqliteStore};
use iptu::factory;
use iptu::money::format_currency;
use iptu::property::Property;
use iptu::tax::TaxCalculator;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let Cli { json, db, command } = Cli::parse();

    match command {
        Commands::Init => {
            let conn = db::open_db(db)?;
            db::init_database(&conn)?;
            println!("{} Property registry initialized", "✓".green().bold());
            Ok(())
        }

        Commands::Add {
            registration,
            release_date,
            value,
            area,
            category,
        } => {
            let conn = open(db)?;
            handle_add(&conn, registration, release_date, value, area, category, json)
        }

        Commands::Show { registration } => {
            let conn = open(db)?;
            handle_show(&conn, registration, json)
        }

        Commands::Assess {
            registration,
            discount,
            interest,
            multipliers,
        } => {
            let conn = open(db)?;
            let table = match multipliers {
                Some(path) => CategoryTable::load(&path)?,
                None => CategoryTable::default(),
            };
            handle_assess(&conn, registration, discount, interest, table, json)
        }

        Commands::Delete { registration } => {
            let conn = open(db)?;
            handle_delete(&conn, registration)
        }
    }
}

fn open(db_path: Option<std::path::PathBuf>) -> Result<Connection> {
    let conn = db::open_db(db_path)?;
    db::init_database(&conn)?;
    Ok(conn)
}

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Registration")]
    registration: i64,
    #[tabled(rename = "Release date")]
    release_date: String,
    #[tabled(rename = "Assessed value")]
    value: String,
    #[tabled(rename = "Area (m²)")]
    area: i64,
    #[tabled(rename = "Category")]
    category: char,
}

impl PropertyRow {
    fn from_property(property: &Property) -> Self {
        Self {
            id: property.id(),
            registration: property.registration(),
            release_date: property.release_date().format("%d/%m/%Y").to_string(),
            value: format_currency(property.assessed_value()),
            area: property.area(),
            category: property.category(),
        }
    }
}

fn handle_add(
    conn: &Connection,
    registration: i64,
    release_date: NaiveDate,
    value: Decimal,
    area: i64,
    category: char,
    json: bool,
) -> Result<()> {
    let mut property = Property::new(registration, release_date, value, area, category)?;

    let store = SqliteStore::new(conn);
    property.save(&store);
    if property.id() == 0 {
        bail!("failed to register property {} (duplicate registration?)", registration);
    }

    info!("registered property {} as id {}", registration, property.id());

    if json {
        println!("{}", serde_json::to_string_pretty(&property.to_record())?);
        return Ok(());
    }

    println!("{} Property registered\n", "✓".green().bold());
    let table = Table::new(vec![PropertyRow::from_property(&property)])
        .with(Style::rounded())
        .to_string();
    println!("{}", table);
    Ok(())
}

fn handle_show(conn: &Connection, registration: i64, json: bool) -> Result<()> {
    let store = SqliteStore::new(conn);
    let Some(property) = factory::by_registration(&store, registration)? else {
        println!("No property registered under {}", registration);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&property.to_record())?);
        return Ok(());
    }

    let table = Table::new(vec![PropertyRow::from_property(&property)])
        .with(Style::rounded())
        .to_string();
    println!("{}", table);
    Ok(())
}

fn handle_assess(
    conn: &Connection,
    registration: i64,
    discount: Decimal,
    interest: Decimal,
    table: CategoryTable,
    json: bool,
) -> Result<()> {
    let store = SqliteStore::new(conn);
    let Some(property) = factory::by_registration(&store, registration)? else {
        bail!("no property registered under {}", registration);
    };

    let result = TaxCalculator::with_table(&property, table).assess(discount, interest)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "\n{} IPTU assessment for registration {}\n",
        "✓".green().bold(),
        registration
    );
    println!("  Annual tax due:   {}", format_currency(result.tax_value));
    println!(
        "  Cash price:       {} ({}% discount)",
        format_currency(result.cash_value),
        discount
    );

    let plan = &result.installment_plan;
    if plan.installment_count() == 0 {
        println!("  Installments:     none (no tax due)");
    } else {
        println!(
            "  Installments:     {} x {} (total {})",
            plan.installment_count(),
            format_currency(plan.installment_value()),
            format_currency(plan.total_value())
        );
    }
    Ok(())
}

fn handle_delete(conn: &Connection, registration: i64) -> Result<()> {
    let store = SqliteStore::new(conn);
    let Some(mut property) = factory::by_registration(&store, registration)? else {
        println!("No property registered under {}", registration);
        return Ok(());
    };

    property.delete(&store);
    if property.id() != 0 {
        bail!("failed to delete property {}", registration);
    }

    println!("{} Property {} deleted", "✓".green().bold(), registration);
    Ok(())
}
