use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "iptu")]
#[command(version, about = "Brazilian urban property tax (IPTU) assessment")]
#[command(
    long_about = "Register urban properties and assess their annual IPTU: \
lump-sum cash price and interest-bearing installment plan."
)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to the SQLite database (defaults to ~/.iptu/data.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the property registry database
    Init,

    /// Register a property
    Add {
        /// 8-digit cadastral registration number
        registration: i64,

        /// Release date (YYYY-MM-DD)
        release_date: NaiveDate,

        /// Assessed market value
        value: Decimal,

        /// Area in square meters
        area: i64,

        /// Category letter A-Z (Z is tax exempt)
        category: char,
    },

    /// Show a registered property
    Show {
        /// Cadastral registration number
        registration: i64,
    },

    /// Assess the annual IPTU for a property
    Assess {
        /// Cadastral registration number
        registration: i64,

        /// Cash discount percentage for the lump-sum price
        #[arg(long, default_value = "0")]
        discount: Decimal,

        /// Annual interest percentage applied to installments
        #[arg(long, default_value = "0")]
        interest: Decimal,

        /// TOML file overriding the category multiplier table
        #[arg(long)]
        multipliers: Option<PathBuf>,
    },

    /// Remove a property from the registry
    Delete {
        /// Cadastral registration number
        registration: i64,
    },
}
