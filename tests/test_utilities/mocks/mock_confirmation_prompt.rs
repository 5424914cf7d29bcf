use async_trait::async_trait;
use pmguard::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ConfirmationPrompt that answers with a fixed line
#[derive(Clone)]
pub struct MockConfirmationPrompt {
    answer: String,
    shown: Arc<Mutex<Vec<Vec<FlaggedPackage>>>>,
}

impl MockConfirmationPrompt {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            shown: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Flagged lists shown to the user, one entry per prompt
    pub fn shown(&self) -> Vec<Vec<FlaggedPackage>> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for MockConfirmationPrompt {
    async fn read_confirmation(&self, flagged: &[FlaggedPackage]) -> Result<String> {
        self.shown.lock().unwrap().push(flagged.to_vec());
        Ok(self.answer.clone())
    }
}
