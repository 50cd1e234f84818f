//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod student_repo;
pub mod teacher_repo;

pub use student_repo::StudentRepo;
pub use teacher_repo::TeacherRepo;

/// Page size used when a listing does not ask for one.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Largest page a listing may request.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a requested page size into `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build a case-insensitive substring pattern for `ILIKE`, or `None` when
/// the search is absent or blank. LIKE metacharacters in the input match
/// literally.
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
