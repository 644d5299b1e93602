use serde::{Deserialize, Serialize};

/// One page of results plus the size of the full matching set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

impl<T> PagedResult<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        debug_assert!(items.len() <= total_count);
        Self { items, total_count }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let result: PagedResult<u32> = PagedResult::default();
        assert!(result.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = PagedResult::new(vec![1, 2], 5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"items": [1, 2], "totalCount": 5}));
    }
}
