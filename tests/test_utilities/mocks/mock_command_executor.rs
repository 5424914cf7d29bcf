use async_trait::async_trait;
use pmguard::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock CommandExecutor that records invocations instead of spawning
#[derive(Clone)]
pub struct MockCommandExecutor {
    exit_code: i32,
    invocations: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockCommandExecutor {
    pub fn exiting_with(exit_code: i32) -> Self {
        Self {
            exit_code,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.invocations.lock().unwrap().clone()
    }
}

impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::exiting_with(0)
    }
}

#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<i32> {
        self.invocations
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok(self.exit_code)
    }
}
