//! Keyset ("cursor") pagination over descending BIGSERIAL ids.
//!
//! Lists are fetched with `limit + 1` rows; the extra row, when present,
//! becomes the `nextCursor` the client passes back (`id < cursor`).

use serde::{Deserialize, Serialize};

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
}

/// Common `?limit=&cursor=` query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub cursor: Option<i64>,
}

impl PageQuery {
    /// Clamp the requested limit into `1..=max`, defaulting to `default`.
    pub fn limit_or(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

/// Split `limit + 1` fetched rows into a page and the follow-up cursor.
///
/// The cursor is the id of the page's last row, so the next `id < cursor`
/// fetch resumes exactly where this page ended.
pub fn paginate<T>(mut rows: Vec<T>, limit: i64, id_of: impl Fn(&T) -> i64) -> (Vec<T>, Option<i64>) {
    let next_cursor = if rows.len() as i64 > limit {
        rows.pop();
        rows.last().map(id_of)
    } else {
        None
    };
    (rows, next_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cursor_when_page_not_full() {
        let (items, cursor) = paginate(vec![5i64, 4, 3], 20, |id| *id);
        assert_eq!(items, vec![5, 4, 3]);
        assert_eq!(cursor, None);
    }

    #[test]
    fn full_page_yields_cursor_at_its_last_row() {
        let (items, cursor) = paginate(vec![5i64, 4, 3], 2, |id| *id);
        assert_eq!(items, vec![5, 4]);
        // The follow-up `id < 4` fetch starts at 3: no row is skipped.
        assert_eq!(cursor, Some(4));
    }

    #[test]
    fn limit_clamping() {
        let q = PageQuery { limit: Some(500), cursor: None };
        assert_eq!(q.limit_or(20, 50), 50);
        let q = PageQuery { limit: None, cursor: None };
        assert_eq!(q.limit_or(20, 50), 20);
        let q = PageQuery { limit: Some(0), cursor: None };
        assert_eq!(q.limit_or(20, 50), 1);
    }
}
