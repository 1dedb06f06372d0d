// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Developer commands for the Service Bay workspace:
//!
//! - `cargo xtask ci`: lint, build, test and verify migrations
//! - `cargo xtask lint`: clippy, docs, formatting and typos
//! - `cargo xtask test`: lib and doc tests against in-memory `SQLite`
//! - `cargo xtask verify-migrations`: check that the embedded migrations
//!   produce the expected schema and revert cleanly
//!
//! Nothing here needs external services; every database is an in-memory
//! `SQLite` instance.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::Sqlite;
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Tables the persistence crate's Diesel schema expects.
const EXPECTED_TABLES: [&str; 4] = ["bookings", "service_centers", "time_slots", "vehicles"];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Verify that the migrations build the expected schema and revert cleanly
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, typos, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Run lib tests, then doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Verify the embedded `SQLite` migrations.
///
/// ## What This Command Does
///
/// 1. Applies every migration to a fresh in-memory database
/// 2. Checks the table set, the slot and idempotency keys, and the seat counter
/// 3. Reverts every migration and checks that no table is left behind
/// 4. Re-applies the migrations and checks the schema is identical
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    let applied: SchemaShape = snapshot_schema(&mut conn)?;
    tracing::info!(tables = applied.len(), "Migrations applied");
    check_expected_structure(&applied)?;

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: SchemaShape = snapshot_schema(&mut conn)?;
    if !leftover.is_empty() {
        bail!(
            "Reverting migrations left tables behind: {:?}",
            leftover.keys().collect::<Vec<_>>()
        );
    }
    tracing::info!("Migrations reverted cleanly");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to re-apply migrations: {e}"))?;
    let reapplied: SchemaShape = snapshot_schema(&mut conn)?;
    if reapplied != applied {
        for (name, shape) in &applied {
            if reapplied.get(name) != Some(shape) {
                tracing::error!(table = %name, "Table differs after re-applying migrations");
            }
        }
        bail!("Schema differs after re-applying migrations");
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Table name to table shape, as reported by `SQLite`'s catalog pragmas.
type SchemaShape = BTreeMap<String, TableShape>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TableShape {
    /// Columns in declaration order.
    columns: Vec<ColumnShape>,
    /// `(column, referenced table, referenced column)`.
    references: BTreeSet<(String, String, String)>,
    /// Column lists of `UNIQUE` constraints.
    unique_keys: BTreeSet<Vec<String>>,
    /// Explicitly created indexes by name.
    indexes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnShape {
    name: String,
    declared_type: String,
    not_null: bool,
    primary_key: bool,
}

#[derive(QueryableByName)]
struct CatalogEntry {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct PragmaColumn {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct PragmaReference {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
    #[diesel(sql_type = Text)]
    to: String,
}

#[derive(QueryableByName)]
struct PragmaIndex {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    origin: String,
}

/// Runs `PRAGMA <pragma>(<argument>)` and loads its rows.
fn pragma<T>(conn: &mut SqliteConnection, pragma: &str, argument: &str) -> Result<Vec<T>>
where
    T: QueryableByName<Sqlite> + 'static,
{
    diesel::sql_query(format!("PRAGMA {pragma}({argument})"))
        .load(conn)
        .wrap_err(format!("PRAGMA {pragma}({argument}) failed"))
}

/// Reads every user table's columns, references, unique keys and indexes.
fn snapshot_schema(conn: &mut SqliteConnection) -> Result<SchemaShape> {
    let tables: Vec<CatalogEntry> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut schema: SchemaShape = BTreeMap::new();
    for CatalogEntry { name: table } in tables {
        let mut shape: TableShape = TableShape::default();

        for column in pragma::<PragmaColumn>(conn, "table_info", &table)? {
            shape.columns.push(ColumnShape {
                name: column.name,
                declared_type: column.r#type.to_uppercase(),
                not_null: column.notnull != 0,
                primary_key: column.pk > 0,
            });
        }

        for reference in pragma::<PragmaReference>(conn, "foreign_key_list", &table)? {
            shape
                .references
                .insert((reference.from, reference.table, reference.to));
        }

        for index in pragma::<PragmaIndex>(conn, "index_list", &table)? {
            let columns: Vec<String> = pragma::<CatalogEntry>(conn, "index_info", &index.name)?
                .into_iter()
                .map(|entry| entry.name)
                .collect();
            match index.origin.as_str() {
                "u" => {
                    shape.unique_keys.insert(columns);
                }
                "c" => {
                    shape.indexes.insert(index.name, columns);
                }
                // Primary key indexes are covered by the column flags.
                _ => {}
            }
        }

        schema.insert(table, shape);
    }

    Ok(schema)
}

/// Checks the structure the persistence layer relies on.
fn check_expected_structure(schema: &SchemaShape) -> Result<()> {
    let tables: Vec<&str> = schema.keys().map(String::as_str).collect();
    if tables != EXPECTED_TABLES {
        bail!("Expected tables {EXPECTED_TABLES:?}, found {tables:?}");
    }

    require_unique(schema, "time_slots", &["center_id", "slot_date", "slot_time"])?;
    require_unique(schema, "bookings", &["idempotency_key"])?;

    let counter: &ColumnShape = schema
        .get("time_slots")
        .and_then(|t| t.columns.iter().find(|c| c.name == "booked_count"))
        .ok_or_else(|| eyre!("time_slots.booked_count is missing"))?;
    if !counter.not_null || counter.declared_type != "INTEGER" {
        bail!("time_slots.booked_count must be a non-null INTEGER, found {counter:?}");
    }

    Ok(())
}

fn require_unique(schema: &SchemaShape, table: &str, columns: &[&str]) -> Result<()> {
    let key: Vec<String> = columns.iter().map(|c| String::from(*c)).collect();
    if !schema
        .get(table)
        .is_some_and(|shape| shape.unique_keys.contains(&key))
    {
        bail!("Table {table} is missing a unique key on {columns:?}");
    }
    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
