//! Cache Store (C7): persists per-document page analyses in a single-file
//! SQLite database with an FTS5 full-text index over page text.
//!
//! A cache entry is keyed by a normalized document name (the source file's
//! base name without extension). Writing an analysis deletes that entry's
//! existing pages and inserts fresh ones inside one transaction, so readers
//! never observe a partially written analysis.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::page::{Orientation, PageAnalysis};

/// Default cache database location, relative to the process's working directory.
pub const DEFAULT_CACHE_PATH: &str = "data/sqlite/sqlite-mcp.db";

/// One page's persisted analysis, as flattened for SQLite storage.
#[derive(Debug, Clone)]
pub struct CachedPage {
    /// Zero-based page index.
    pub page_number: usize,
    /// Full page text.
    pub text: String,
    /// Header band text.
    pub header: String,
    /// Footer band text.
    pub footer: String,
    /// Whether the page matched the monetary pattern.
    pub has_money: bool,
    /// Whether the page matched the national-id pattern.
    pub has_cpf: bool,
    /// Distinct font resource names used on the page.
    pub fonts: Vec<String>,
    /// Text in the bottom 30% of the page, where signatures live.
    pub signature: String,
    /// Portrait or landscape, by media-box aspect ratio.
    pub orientation: Orientation,
}

impl From<&PageAnalysis> for CachedPage {
    fn from(analysis: &PageAnalysis) -> Self {
        Self {
            page_number: analysis.page_index,
            text: analysis.text.clone(),
            header: analysis.header.clone(),
            footer: analysis.footer.clone(),
            has_money: analysis.has_money,
            has_cpf: analysis.has_cpf,
            fonts: analysis.fonts.clone(),
            signature: analysis.signature.clone(),
            orientation: analysis.orientation,
        }
    }
}

fn orientation_to_str(o: Orientation) -> &'static str {
    match o {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    }
}

fn orientation_from_str(s: &str) -> Orientation {
    match s {
        "landscape" => Orientation::Landscape,
        _ => Orientation::Portrait,
    }
}

/// A cached document: its metadata row plus all of its pages.
#[derive(Debug, Clone)]
pub struct CachedDocument {
    /// Normalized cache name.
    pub name: String,
    /// Path to the original source file at analysis time.
    pub source_path: String,
    /// RFC 3339 timestamp of when this entry was written.
    pub created_at: String,
    /// Source file size in bytes, at analysis time.
    pub size_bytes: u64,
    /// Extraction mode label (e.g. the forensic analysis mode used).
    pub mode: String,
    /// Pages, in ascending page-number order.
    pub pages: Vec<CachedPage>,
}

/// SQLite-backed analysis cache.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    /// Open (creating if absent) a cache database at `path`, running schema migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(sqlite_err)?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(sqlite_err)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open the cache database at [`DEFAULT_CACHE_PATH`].
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_CACHE_PATH)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS caches (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    source_path TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    size_bytes INTEGER NOT NULL,
                    mode TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS pages (
                    cache_id INTEGER NOT NULL REFERENCES caches(id) ON DELETE CASCADE,
                    page_number INTEGER NOT NULL,
                    text TEXT NOT NULL,
                    header TEXT NOT NULL,
                    footer TEXT NOT NULL,
                    has_money INTEGER NOT NULL,
                    has_cpf INTEGER NOT NULL,
                    fonts TEXT NOT NULL,
                    signature TEXT NOT NULL DEFAULT '',
                    orientation TEXT NOT NULL DEFAULT 'portrait',
                    UNIQUE(cache_id, page_number)
                );

                CREATE VIRTUAL TABLE IF NOT EXISTS page_fts USING fts5(
                    text, content='pages', content_rowid='rowid'
                );

                CREATE TRIGGER IF NOT EXISTS pages_ai AFTER INSERT ON pages BEGIN
                    INSERT INTO page_fts(rowid, text) VALUES (new.rowid, new.text);
                END;
                CREATE TRIGGER IF NOT EXISTS pages_ad AFTER DELETE ON pages BEGIN
                    INSERT INTO page_fts(page_fts, rowid, text) VALUES('delete', old.rowid, old.text);
                END;
                CREATE TRIGGER IF NOT EXISTS pages_au AFTER UPDATE ON pages BEGIN
                    INSERT INTO page_fts(page_fts, rowid, text) VALUES('delete', old.rowid, old.text);
                    INSERT INTO page_fts(rowid, text) VALUES (new.rowid, new.text);
                END;",
            )
            .map_err(sqlite_err)
    }

    /// Whether a cache entry named `name` exists.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.conn
            .query_row("SELECT 1 FROM caches WHERE name = ?1", params![name], |_| Ok(()))
            .optional()
            .map(|row| row.is_some())
            .map_err(sqlite_err)
    }

    /// Write (inserting or replacing) the analysis for `name`.
    ///
    /// Deletes the entry's existing pages and inserts the new ones inside a
    /// single transaction, so readers see either the old or the new
    /// analysis in full, never a partial one.
    pub fn upsert(
        &mut self,
        name: &str,
        source_path: &str,
        size_bytes: u64,
        mode: &str,
        created_at: &str,
        pages: &[CachedPage],
    ) -> Result<()> {
        let tx = self.conn.transaction().map_err(sqlite_err)?;

        let cache_id: i64 = tx
            .query_row(
                "INSERT INTO caches(name, source_path, created_at, size_bytes, mode)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(name) DO UPDATE SET
                    source_path = excluded.source_path,
                    created_at = excluded.created_at,
                    size_bytes = excluded.size_bytes,
                    mode = excluded.mode
                 RETURNING id",
                params![name, source_path, created_at, size_bytes as i64, mode],
                |row| row.get(0),
            )
            .map_err(sqlite_err)?;

        tx.execute("DELETE FROM pages WHERE cache_id = ?1", params![cache_id])
            .map_err(sqlite_err)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO pages(cache_id, page_number, text, header, footer, has_money, has_cpf, fonts, signature, orientation)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .map_err(sqlite_err)?;
            for page in pages {
                let fonts_json = serde_json::to_string(&page.fonts)
                    .map_err(|e| Error::Store(e.to_string()))?;
                stmt.execute(params![
                    cache_id,
                    page.page_number as i64,
                    page.text,
                    page.header,
                    page.footer,
                    page.has_money,
                    page.has_cpf,
                    fonts_json,
                    page.signature,
                    orientation_to_str(page.orientation),
                ])
                .map_err(sqlite_err)?;
            }
        }

        tx.commit().map_err(sqlite_err)
    }

    /// Load a cache entry, if one exists.
    pub fn load(&self, name: &str) -> Result<Option<CachedDocument>> {
        let cache_row = self
            .conn
            .query_row(
                "SELECT id, source_path, created_at, size_bytes, mode FROM caches WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(sqlite_err)?;

        let Some((cache_id, source_path, created_at, size_bytes, mode)) = cache_row else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare(
                "SELECT page_number, text, header, footer, has_money, has_cpf, fonts, signature, orientation
                 FROM pages WHERE cache_id = ?1 ORDER BY page_number ASC",
            )
            .map_err(sqlite_err)?;
        let pages = stmt
            .query_map(params![cache_id], |row| {
                let fonts_json: String = row.get(6)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, bool>(5)?,
                    fonts_json,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })
            .map_err(sqlite_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sqlite_err)?
            .into_iter()
            .map(|(page_number, text, header, footer, has_money, has_cpf, fonts_json, signature, orientation)| {
                let fonts = serde_json::from_str(&fonts_json).unwrap_or_default();
                CachedPage {
                    page_number: page_number as usize,
                    text,
                    header,
                    footer,
                    has_money,
                    has_cpf,
                    fonts,
                    signature,
                    orientation: orientation_from_str(&orientation),
                }
            })
            .collect();

        Ok(Some(CachedDocument {
            name: name.to_string(),
            source_path,
            created_at,
            size_bytes: size_bytes as u64,
            mode,
            pages,
        }))
    }

    /// List every cache entry's name, in ascending order.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM caches ORDER BY name ASC")
            .map_err(sqlite_err)?;
        stmt.query_map([], |row| row.get(0))
            .map_err(sqlite_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sqlite_err)
    }

    /// Delete a cache entry and its pages.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM caches WHERE name = ?1", params![name])
            .map_err(sqlite_err)?;
        Ok(())
    }

    /// Delete every cache entry.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM caches", []).map_err(sqlite_err)?;
        Ok(())
    }

    /// Page numbers within cache entry `name` whose text matches `fts_query`
    /// (an FTS5 query string, e.g. `"alpha" AND "beta"`). Used by the query
    /// engine's fast path for plain positive term predicates.
    pub fn fts_matching_page_numbers(
        &self,
        name: &str,
        fts_query: &str,
    ) -> Result<std::collections::HashSet<usize>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT p.page_number FROM pages p
                 JOIN page_fts ON page_fts.rowid = p.rowid
                 JOIN caches c ON c.id = p.cache_id
                 WHERE c.name = ?1 AND page_fts MATCH ?2",
            )
            .map_err(sqlite_err)?;
        stmt.query_map(params![name, fts_query], |row| row.get::<_, i64>(0))
            .map_err(sqlite_err)?
            .map(|r| r.map(|n| n as usize))
            .collect::<std::result::Result<std::collections::HashSet<usize>, _>>()
            .map_err(sqlite_err)
    }
}

fn sqlite_err(e: rusqlite::Error) -> Error {
    Error::Store(e.to_string())
}
