pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Trim a page fetched with `limit + 1` rows down to `limit`, reporting
/// whether more rows exist past it.
pub fn page_with_more<T>(mut rows: Vec<T>, limit: i64) -> (Vec<T>, bool) {
    let has_more = rows.len() as i64 > limit;
    rows.truncate(limit as usize);
    (rows, has_more)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn limit_defaults_and_is_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-3)), 1);
        assert_eq!(clamp_limit(Some(1000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_is_floored_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
        assert_eq!(clamp_offset(Some(-5)), 0);
    }

    #[test]
    fn extra_row_signals_more_pages() {
        let (rows, has_more) = page_with_more(vec![1, 2, 3], 2);
        assert_eq!(rows, vec![1, 2]);
        assert!(has_more);

        let (rows, has_more) = page_with_more(vec![1, 2], 2);
        assert_eq!(rows, vec![1, 2]);
        assert!(!has_more);

        let (rows, has_more) = page_with_more(Vec::<i32>::new(), 2);
        assert!(rows.is_empty());
        assert!(!has_more);
    }
}
