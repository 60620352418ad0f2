//! IPTU - Brazilian urban property tax assessment engine
//!
//! This library assesses the annual urban property tax (IPTU) for a
//! registered property, producing a lump-sum cash price and an
//! interest-bearing installment plan, backed by a SQLite property registry.

pub mod config;
pub mod db;
pub mod error;
pub mod factory;
pub mod money;
pub mod property;
pub mod tax;
