//! # Book Query Service
//!
//! Filtered, sorted, paginated access to one reader's shelf, plus the
//! single-row writes.
//!
//! ## List/count consistency
//!
//! The dashboard needs the page of rows *and* the total row count to
//! compute page metadata. Both statements are assembled from the same
//! predicate fragment and bind list ([`BookFilters::predicate`]), so the
//! count can never drift from what pagination would enumerate across all
//! pages. Building the two queries separately is how the filter/count
//! mismatch bug happens, and the shape of this module is what rules it
//! out.
//!
//! ## Ordering
//!
//! Every sort appends `id ASC` so the order is total: equal keys tie-break
//! on insertion order instead of physical row order, which keeps pages
//! stable under concurrent writes.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::{
    error::AppError,
    models::{Book, BookPayload},
};

pub const DEFAULT_LIMIT: u32 = 5;

/// Query-string shape of the dashboard endpoint. Non-numeric `page`/`limit`
/// fail extraction before reaching the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

/// One dashboard page with the metadata the frontend paginates by.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_count: i64,
    pub current_page: u32,
    pub total_pages: i64,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Title,
    Author,
    Rating,
}

impl SortBy {
    /// Anything unrecognized falls back to the rating ordering rather than
    /// erroring, matching what the sort dropdown sends.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("title") => SortBy::Title,
            Some("author") => SortBy::Author,
            _ => SortBy::Rating,
        }
    }

    fn order_clause(&self) -> &'static str {
        match self {
            SortBy::Title => "name ASC, id ASC",
            SortBy::Author => "author ASC, id ASC",
            SortBy::Rating => "rating DESC NULLS LAST, id ASC",
        }
    }
}

/// Optional shelf filters. `None` after normalization means "no filter".
#[derive(Debug, Default)]
pub struct BookFilters {
    search: Option<String>,
    category: Option<String>,
    status: Option<String>,
}

impl BookFilters {
    /// Empty strings and the literal `"All"` sentinel both mean "no
    /// filter".
    pub fn new(
        search: Option<String>,
        category: Option<String>,
        status: Option<String>,
    ) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            category: category.filter(|c| !c.is_empty() && c != "All"),
            status: status.filter(|s| !s.is_empty() && s != "All"),
        }
    }

    /// WHERE fragment plus bind values, shared verbatim by the row query
    /// and the count query. Search is a case-insensitive substring match
    /// over name OR author.
    fn predicate(&self, uid: &str) -> (String, Vec<String>) {
        let mut clause = String::from("uid = ?");
        let mut binds = vec![uid.to_string()];

        if let Some(search) = &self.search {
            clause.push_str(" AND (name LIKE ? OR author LIKE ?)");
            let pattern = format!("%{search}%");
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        if let Some(category) = &self.category {
            clause.push_str(" AND category = ?");
            binds.push(category.clone());
        }
        if let Some(status) = &self.status {
            clause.push_str(" AND status = ?");
            binds.push(status.clone());
        }

        (clause, binds)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    /// Rejects non-positive values so a negative OFFSET can never reach
    /// the store. Pages past the end are fine, they read as empty.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(AppError::Validation(
                "Page must be a positive integer".into(),
            ));
        }
        if limit < 1 {
            return Err(AppError::Validation(
                "Limit must be a positive integer".into(),
            ));
        }

        Ok(Self { page, limit })
    }

    fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

fn total_pages(total_count: i64, limit: u32) -> i64 {
    (total_count + limit as i64 - 1) / limit as i64
}

pub async fn list_books(
    pool: &SqlitePool,
    uid: &str,
    pages: PageParams,
    filters: &BookFilters,
    sort: SortBy,
) -> Result<BookPage, AppError> {
    let (clause, binds) = filters.predicate(uid);

    let row_sql = format!(
        "SELECT * FROM books WHERE {clause} ORDER BY {} LIMIT ? OFFSET ?",
        sort.order_clause()
    );
    let mut rows = sqlx::query_as::<_, Book>(&row_sql);
    for bind in &binds {
        rows = rows.bind(bind);
    }
    let books = rows
        .bind(pages.limit)
        .bind(pages.offset())
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM books WHERE {clause}");
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count = count.bind(bind);
    }
    let total_count = count.fetch_one(pool).await?;

    Ok(BookPage {
        books,
        total_count,
        current_page: pages.page,
        total_pages: total_pages(total_count, pages.limit),
        limit: pages.limit,
    })
}

/// Page count only, for lightweight polling. Same uid scoping as the
/// dashboard, no other filters.
pub async fn count_pages(
    pool: &SqlitePool,
    uid: &str,
    limit: Option<u32>,
) -> Result<i64, AppError> {
    let pages = PageParams::new(None, limit)?;

    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE uid = ?")
        .bind(uid)
        .fetch_one(pool)
        .await?;

    Ok(total_pages(total_count, pages.limit))
}

pub async fn get_book(pool: &SqlitePool, id: i64) -> Result<Book, AppError> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".into()))
}

pub async fn add_book(
    pool: &SqlitePool,
    uid: &str,
    payload: &BookPayload,
) -> Result<Book, AppError> {
    let status = payload.validate()?;
    let cover = payload.cover();

    let result = sqlx::query(
        "INSERT INTO books (name, author, review, rating, cover, category, status, uid)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.author)
    .bind(&payload.review)
    .bind(payload.rating)
    .bind(&cover)
    .bind(&payload.category)
    .bind(status.as_str())
    .bind(uid)
    .execute(pool)
    .await
    .map_err(|e| constraint_error(e, "Book already exists in the database"))?;

    Ok(Book {
        id: result.last_insert_rowid(),
        name: payload.name.clone(),
        author: payload.author.clone(),
        review: payload.review.clone(),
        rating: payload.rating,
        cover,
        category: payload.category.clone(),
        status,
        uid: uid.to_string(),
    })
}

/// Full replacement of the mutable fields. The stored cover is
/// creation-time only and survives updates untouched.
pub async fn update_book(
    pool: &SqlitePool,
    uid: &str,
    id: i64,
    payload: &BookPayload,
) -> Result<Book, AppError> {
    let status = payload.validate()?;

    let result = sqlx::query(
        "UPDATE books
         SET name = ?, author = ?, review = ?, rating = ?, category = ?, status = ?
         WHERE id = ? AND uid = ?",
    )
    .bind(&payload.name)
    .bind(&payload.author)
    .bind(&payload.review)
    .bind(payload.rating)
    .bind(&payload.category)
    .bind(status.as_str())
    .bind(id)
    .bind(uid)
    .execute(pool)
    .await
    .map_err(|e| constraint_error(e, "Another book with this name already exists"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Book not found".into()));
    }

    get_book(pool, id).await
}

pub async fn delete_book(pool: &SqlitePool, uid: &str, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM books WHERE id = ? AND uid = ?")
        .bind(id)
        .bind(uid)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Book not found".into()));
    }

    Ok(())
}

/// Constraint violations carry the write-path semantics: a unique hit is
/// the duplicate-name (or duplicate-uid) conflict, a foreign-key hit means
/// the scoping user does not exist.
fn constraint_error(e: sqlx::Error, conflict: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(conflict.to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::NotFound("User does not exist".to_string())
        }
        _ => AppError::Database(e),
    }
}
