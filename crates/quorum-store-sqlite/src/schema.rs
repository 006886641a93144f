//! SQL schema for the Quorum SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    id          TEXT PRIMARY KEY,
    username    TEXT NOT NULL,
    full_name   TEXT,
    avatar_url  TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Only `status` is ever updated, and not by this application.
CREATE TABLE IF NOT EXISTS features (
    feature_id   TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'pending',
    author_id    TEXT NOT NULL,   -- no FK: authors need not have a profile
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- One row per (feature, voter). A direction change updates in place; a
-- repeated direction deletes the row.
CREATE TABLE IF NOT EXISTS votes (
    vote_id     TEXT PRIMARY KEY,
    feature_id  TEXT NOT NULL REFERENCES features(feature_id),
    voter_id    TEXT NOT NULL,
    direction   INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (feature_id, voter_id),
    CHECK  (direction IN (-1, 1))
);

-- Append-only; `updated_at` mirrors `created_at`. Ties on created_at are
-- broken by rowid (insertion order).
CREATE TABLE IF NOT EXISTS comments (
    comment_id  TEXT PRIMARY KEY,
    feature_id  TEXT NOT NULL REFERENCES features(feature_id),
    author_id   TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS features_created_idx ON features(created_at);
CREATE INDEX IF NOT EXISTS features_author_idx  ON features(author_id);
CREATE INDEX IF NOT EXISTS comments_feature_idx ON comments(feature_id, created_at);

PRAGMA user_version = 1;
";
