use serde::{Deserialize, Serialize};

/// A registered customer.
///
/// The card on file is the only field checkout writes to; it is replaced when
/// the customer retries payment with a different card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccount {
    pub id: String,
    pub password: String,
    pub name: String,
    pub address: String,
    pub card: String,
    pub security_question: String,
    pub security_answer: String,
}

impl CustomerAccount {
    pub fn verify_password(&self, password: &str) -> bool {
        self.password == password
    }

    /// Security answers are compared without regard to case.
    pub fn verify_security_answer(&self, answer: &str) -> bool {
        self.security_answer.to_lowercase() == answer.to_lowercase()
    }

    pub fn replace_card(&mut self, card: impl Into<String>) {
        self.card = card.into();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::CustomerAccount;

    pub fn customer(id: &str, card: &str) -> CustomerAccount {
        CustomerAccount {
            id: id.to_string(),
            password: "Secret#1".to_string(),
            name: "Test Customer".to_string(),
            address: "1 Main St".to_string(),
            card: card.to_string(),
            security_question: "What was your first pet's name?".to_string(),
            security_answer: "Rex".to_string(),
        }
    }
}
