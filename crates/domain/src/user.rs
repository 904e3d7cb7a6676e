use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The owner of one or more `JobApplication`s and the audience of every
/// reminder notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub email: String,
}

impl User {
    pub fn new(email: &str) -> Self {
        Self {
            id: Default::default(),
            email: email.to_string(),
        }
    }
}

impl Entity<ID> for User {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
