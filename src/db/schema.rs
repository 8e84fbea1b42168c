pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS plans (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    budget      TEXT NOT NULL,
    currency    TEXT NOT NULL DEFAULT 'USD',
    title       TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    next_custom INTEGER NOT NULL DEFAULT 1,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS plan_categories (
    plan_id  INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    key      TEXT NOT NULL,
    name     TEXT NOT NULL,
    amount   TEXT NOT NULL,
    color    TEXT NOT NULL DEFAULT '',
    editable BOOLEAN NOT NULL DEFAULT 1,
    PRIMARY KEY (plan_id, key)
);

CREATE INDEX IF NOT EXISTS idx_plan_categories_position ON plan_categories(plan_id, position);

CREATE TABLE IF NOT EXISTS plan_initial_categories (
    plan_id  INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    key      TEXT NOT NULL,
    name     TEXT NOT NULL,
    amount   TEXT NOT NULL,
    color    TEXT NOT NULL DEFAULT '',
    editable BOOLEAN NOT NULL DEFAULT 1,
    PRIMARY KEY (plan_id, key)
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    // v1 did not keep the reset target; the saved categories become it
    r#"
CREATE TABLE IF NOT EXISTS plan_initial_categories (
    plan_id  INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    key      TEXT NOT NULL,
    name     TEXT NOT NULL,
    amount   TEXT NOT NULL,
    color    TEXT NOT NULL DEFAULT '',
    editable BOOLEAN NOT NULL DEFAULT 1,
    PRIMARY KEY (plan_id, key)
);
INSERT OR IGNORE INTO plan_initial_categories
    SELECT plan_id, position, key, name, amount, color, editable FROM plan_categories;
"#,
)];
