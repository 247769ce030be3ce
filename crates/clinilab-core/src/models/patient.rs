//! Patient registry models.

use serde::{Deserialize, Serialize};

/// A patient registry record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Unique patient ID
    pub id: String,
    /// Full name
    pub name: String,
    /// National document (CPF)
    pub document: Option<String>,
    /// Date of birth
    pub birth_date: Option<String>,
    /// Insurance plan (convênio) name
    pub insurer: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Additional notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with the required field.
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            document: None,
            birth_date: None,
            insurer: None,
            phone: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
