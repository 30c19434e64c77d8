//! SQL schema for the personnel SQLite store.
//!
//! Executed at connection startup. There are no migrations; the DDL is
//! idempotent and `PRAGMA user_version` records the layout it created.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    age           INTEGER NOT NULL,
    nom           TEXT    NOT NULL,
    prenom        TEXT    NOT NULL,
    -- NOCASE makes the unique index match the case-insensitive lookups.
    email         TEXT    NOT NULL COLLATE NOCASE UNIQUE,
    telephone     TEXT,
    poste         TEXT,
    departement   TEXT,
    date_embauche TEXT             -- YYYY-MM-DD or NULL
);

CREATE INDEX IF NOT EXISTS persons_departement_idx ON persons(departement);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT` that decodes into a person.
pub const PERSON_COLUMNS: &str =
  "id, name, age, nom, prenom, email, telephone, poste, departement, date_embauche";
