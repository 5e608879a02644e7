//! Query DTOs - query string parameters

use serde::{Deserialize, Serialize};

fn default_limit() -> i64 {
    100
}

/// `?skip=&limit=` pagination used by every list endpoint
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PaginationQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl PaginationQuery {
    /// Negative values are clamped to zero so they never reach SQL
    pub fn normalized(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn test_normalized_clamps_negatives() {
        let q = PaginationQuery { skip: -5, limit: -1 }.normalized();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 0);
    }
}
