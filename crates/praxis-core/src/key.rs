//! Composite ledger key.
//!
//! Every ledger entry is keyed by (user, topic). User ids are opaque
//! strings handed over by the transport layer; topic ids are validated by
//! [`TopicId`]. Different keys are fully independent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::program::TopicId;

/// Key for both the access ledger and the progress ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    pub user_id: String,
    pub topic_id: TopicId,
}

impl LedgerKey {
    pub fn new(user_id: impl Into<String>, topic_id: TopicId) -> Self {
        Self {
            user_id: user_id.into(),
            topic_id,
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.topic_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_user_and_topic() {
        let key = LedgerKey::new("u42", TopicId::new(3).unwrap());
        assert_eq!(key.to_string(), "u42/3");
    }
}
