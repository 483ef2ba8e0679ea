//! Schema definitions and migration runner for SurrealDB.
//!
//! All tables are SCHEMAFULL. Closed enumerations (role names, scope
//! types, demo day status) are stored as strings with ASSERT constraints,
//! and the uniqueness of role and scope rows is enforced by UNIQUE indexes.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "members_roles_scopes",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "demo_days",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: members, role assignments, scope entries
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Members (record id = member uid)
-- =======================================================================
DEFINE TABLE member SCHEMAFULL;
DEFINE FIELD name ON TABLE member TYPE string;
DEFINE FIELD email ON TABLE member TYPE option<string>;
DEFINE FIELD created_at ON TABLE member TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE member TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Role assignments
-- =======================================================================
DEFINE TABLE member_role SCHEMAFULL;
DEFINE FIELD member_uid ON TABLE member_role TYPE string;
DEFINE FIELD role_name ON TABLE member_role TYPE string \
    ASSERT $value IN ['DEMO_DAY_ADMIN', 'DIRECTORYADMIN'];
DEFINE FIELD created_at ON TABLE member_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_member_role_unique ON TABLE member_role \
    COLUMNS member_uid, role_name UNIQUE;
DEFINE INDEX idx_member_role_role ON TABLE member_role \
    COLUMNS role_name;

-- =======================================================================
-- Scope entries
-- =======================================================================
DEFINE TABLE member_scope SCHEMAFULL;
DEFINE FIELD member_uid ON TABLE member_scope TYPE string;
DEFINE FIELD scope_type ON TABLE member_scope TYPE string \
    ASSERT $value IN ['HOST'];
DEFINE FIELD scope_value ON TABLE member_scope TYPE string \
    ASSERT string::len($value) > 0;
DEFINE FIELD created_at ON TABLE member_scope TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_member_scope_unique ON TABLE member_scope \
    COLUMNS member_uid, scope_type, scope_value UNIQUE;
";

// -----------------------------------------------------------------------
// Schema v2: demo days
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE TABLE demo_day SCHEMAFULL;
DEFINE FIELD slug_url ON TABLE demo_day TYPE string;
DEFINE FIELD name ON TABLE demo_day TYPE string;
DEFINE FIELD host ON TABLE demo_day TYPE string \
    ASSERT string::len($value) > 0;
DEFINE FIELD status ON TABLE demo_day TYPE string \
    ASSERT $value IN ['UPCOMING', 'LIVE', 'COMPLETED'];
DEFINE FIELD created_at ON TABLE demo_day TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE demo_day TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_demo_day_slug ON TABLE demo_day \
    COLUMNS slug_url UNIQUE;
DEFINE INDEX idx_demo_day_host ON TABLE demo_day \
    COLUMNS host;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}
