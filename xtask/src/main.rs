// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the hour ledger workspace.
//!
//! - `cargo xtask ci` runs lint, build and the `SQLite` test suite.
//! - `cargo xtask test-mariadb` runs the ignored backend validation tests
//!   against a throwaway `MariaDB` container.
//! - `cargo xtask verify-migrations` applies both migration trees and fails
//!   when the resulting schemas drift apart.
//!
//! Plain `cargo test` never needs a database server. Everything that does
//! lives here.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

const PERSISTENCE_PACKAGE: &str = "hourledger-persistence";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
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
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

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

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo_nightly(&["fmt", "--all", "--check"]),
            Self::LintTypos => lint_typos(),
            Self::FixFormatting => run_cargo_nightly(&["fmt", "--all"]),
            Self::Test => run_cargo(&["test", "--all-targets", "--all-features"]),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Lint, build and run the default test suite. Backend validation stays opt-in.
fn ci() -> Result<()> {
    lint()?;
    run_cargo(&["build", "--all-targets", "--all-features"])?;
    run_cargo(&["test", "--all-targets", "--all-features"])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    run_cargo_nightly(&["fmt", "--all", "--check"])?;
    lint_typos()
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
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
        cmd!(
            "cargo",
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            package.name.as_str()
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }
    Ok(())
}

fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied()).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    // CARGO is set because we're running in a cargo subcommand
    cmd("cargo", args.iter().copied())
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

// ============================================================================
// MariaDB container
// ============================================================================

/// A throwaway `MariaDB` 11 container. Stopped and removed on drop, so a
/// failing test run still cleans up.
struct MariaDb {
    container: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariaDb {
    fn start(
        container: &'static str,
        database: &'static str,
        password: &'static str,
        port: u16,
    ) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        let db = Self {
            container,
            database,
            user: "hourledger",
            password,
            port,
        };
        db.remove();

        tracing::info!("Starting MariaDB container: {container}");
        cmd!(
            "docker",
            "run",
            "--name",
            container,
            "-e",
            format!("MARIADB_DATABASE={database}"),
            "-e",
            format!("MARIADB_USER={}", db.user),
            "-e",
            format!("MARIADB_PASSWORD={password}"),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        db.wait_ready(30)?;
        Ok(db)
    }

    fn wait_ready(&self, max_attempts: u32) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=max_attempts {
            std::thread::sleep(std::time::Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{max_attempts}");
            let probe = cmd!(
                "docker",
                "exec",
                self.container,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(color_eyre::eyre::eyre!(
            "MariaDB did not become ready within {max_attempts} seconds"
        ))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.container)
            .stdout_null()
            .stderr_null()
            .run();
        let _ = cmd!("docker", "rm", self.container)
            .stdout_null()
            .stderr_null()
            .run();
    }
}

impl Drop for MariaDb {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container {}", self.container);
        self.remove();
    }
}

/// Run the ignored `backend_validation_tests` of the persistence crate
/// against `MariaDB`.
///
/// The tests read `DATABASE_URL` and require
/// `HOURLEDGER_TEST_BACKEND=mariadb`. Port 3307 must be free.
fn test_mariadb() -> Result<()> {
    let db = MariaDb::start("hourledger-test-mariadb", "hourledger_test", "test_password", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", db.url())
    .env("HOURLEDGER_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

// ============================================================================
// Schema parity
// ============================================================================

#[derive(Debug, Default, PartialEq, Eq)]
struct TableShape {
    /// column name -> (normalized type, nullable)
    columns: BTreeMap<String, (String, bool)>,
    primary_key: BTreeSet<String>,
    /// (column, referenced table, referenced column)
    foreign_keys: BTreeSet<(String, String, String)>,
    unique: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

type SchemaShape = BTreeMap<String, TableShape>;

/// Apply both migration trees and compare tables, columns, keys and
/// indexes. Port 3308 must be free.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");
    let db = MariaDb::start(
        "hourledger-verify-migrations",
        "hourledger_verify",
        "verify_password",
        3308,
    )?;

    let mut sqlite = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {e}"))?;

    let mut mysql = MysqlConnection::establish(&db.url()).wrap_err("Failed to connect to MariaDB")?;
    mysql
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_shape = sqlite_schema(&mut sqlite)?;
    let mysql_shape = mysql_schema(&mut mysql, db.database)?;
    compare_schemas(&sqlite_shape, &mysql_shape)?;

    tracing::info!("Schema parity verification passed");
    Ok(())
}

fn sqlite_schema(conn: &mut SqliteConnection) -> Result<SchemaShape> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
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
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut shape = SchemaShape::new();
    for table in tables {
        let mut info = TableShape::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(format!("PRAGMA table_info({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get columns for table {}", table.name))?;
        for col in columns {
            if col.pk > 0 {
                info.primary_key.insert(col.name.clone());
            }
            // SQLite reports INTEGER PRIMARY KEY columns as nullable.
            let nullable = col.notnull == 0 && col.pk == 0;
            info.columns
                .insert(col.name, (normalize_sqlite_type(&col.r#type), nullable));
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get foreign keys for table {}", table.name))?;
        info.foreign_keys
            .extend(fks.into_iter().map(|fk| (fk.from, fk.table, fk.to)));

        let indexes: Vec<IndexInfo> = diesel::sql_query(format!("PRAGMA index_list({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get indexes for table {}", table.name))?;
        for idx in indexes {
            let columns: Vec<TableName> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err_with(|| format!("Failed to get index columns for {}", idx.name))?;
            let columns: Vec<String> = columns.into_iter().map(|c| c.name).collect();
            match idx.origin.as_str() {
                "u" => {
                    info.unique.insert(columns);
                }
                "c" => {
                    info.indexes.insert(columns);
                }
                _ => {}
            }
        }

        shape.insert(table.name, info);
    }
    Ok(shape)
}

fn mysql_schema(conn: &mut MysqlConnection, database: &str) -> Result<SchemaShape> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        ref_table: String,
        #[diesel(sql_type = Text)]
        ref_column: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumn {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT table_name AS table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut shape = SchemaShape::new();
    for table in tables {
        let name = table.table_name;
        let mut info = TableShape::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name AS column_name, data_type AS data_type, \
             is_nullable AS is_nullable, column_key AS column_key \
             FROM information_schema.columns WHERE table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get columns for table {name}"))?;
        for col in columns {
            if col.column_key == "PRI" {
                info.primary_key.insert(col.column_name.clone());
            }
            info.columns.insert(
                col.column_name,
                (normalize_mysql_type(&col.data_type), col.is_nullable == "YES"),
            );
        }

        let fks: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name AS column_name, referenced_table_name AS ref_table, \
             referenced_column_name AS ref_column FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get foreign keys for table {name}"))?;
        info.foreign_keys.extend(
            fks.into_iter()
                .map(|fk| (fk.column_name, fk.ref_table, fk.ref_column)),
        );

        let index_columns: Vec<IndexColumn> = diesel::sql_query(
            "SELECT index_name AS index_name, column_name AS column_name, \
             non_unique AS non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get indexes for table {name}"))?;

        let mut grouped: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();
        for col in index_columns {
            grouped
                .entry(col.index_name)
                .or_insert_with(|| (col.non_unique == 0, Vec::new()))
                .1
                .push(col.column_name);
        }
        for (unique, columns) in grouped.into_values() {
            if unique {
                info.unique.insert(columns);
            } else {
                info.indexes.insert(columns);
            }
        }

        shape.insert(name, info);
    }
    Ok(shape)
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    let normalized = if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else {
        "text"
    };
    normalized.to_string()
}

fn normalize_mysql_type(mysql_type: &str) -> String {
    let normalized = match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        _ => "text",
    };
    normalized.to_string()
}

/// Fail on the first drift between the two schemas.
///
/// `InnoDB` creates an index for every foreign key column, so extra
/// single-column `MySQL` indexes on foreign key columns are tolerated.
fn compare_schemas(sqlite: &SchemaShape, mysql: &SchemaShape) -> Result<()> {
    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();
    if sqlite_tables != mysql_tables {
        return Err(color_eyre::eyre::eyre!(
            "Schema parity check FAILED: only in SQLite {:?}, only in MySQL {:?}",
            sqlite_tables.difference(&mysql_tables).collect::<Vec<_>>(),
            mysql_tables.difference(&sqlite_tables).collect::<Vec<_>>()
        ));
    }

    for (name, lite) in sqlite {
        let Some(my) = mysql.get(name) else {
            continue;
        };
        let mismatch = |what: &str, l: &dyn std::fmt::Debug, m: &dyn std::fmt::Debug| {
            color_eyre::eyre::eyre!(
                "Schema parity check FAILED: {what} mismatch in table '{name}'\n  SQLite: {l:?}\n  MySQL: {m:?}"
            )
        };

        if lite.columns != my.columns {
            return Err(mismatch("column", &lite.columns, &my.columns));
        }
        if lite.primary_key != my.primary_key {
            return Err(mismatch("primary key", &lite.primary_key, &my.primary_key));
        }
        if lite.foreign_keys != my.foreign_keys {
            return Err(mismatch("foreign key", &lite.foreign_keys, &my.foreign_keys));
        }
        if lite.unique != my.unique {
            return Err(mismatch("unique constraint", &lite.unique, &my.unique));
        }

        let fk_columns: BTreeSet<&String> = my.foreign_keys.iter().map(|fk| &fk.0).collect();
        let missing: Vec<&Vec<String>> = lite.indexes.difference(&my.indexes).collect();
        let unexpected: Vec<&Vec<String>> = my
            .indexes
            .difference(&lite.indexes)
            .filter(|cols| !(cols.len() == 1 && fk_columns.contains(&cols[0])))
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(mismatch("index", &missing, &unexpected));
        }
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
