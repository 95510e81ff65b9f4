use crate::domain::Logger;
use std::sync::RwLock;

/// Logger with a scripted answer that records every prompt and message.
pub struct RecordingLogger {
    proceed: RwLock<bool>,
    declined: RwLock<Vec<String>>,
    prompts: RwLock<Vec<String>>,
    messages: RwLock<Vec<String>>,
}

impl RecordingLogger {
    pub fn new(proceed: bool) -> Self {
        Self {
            proceed: RwLock::new(proceed),
            declined: RwLock::new(Vec::new()),
            prompts: RwLock::new(Vec::new()),
            messages: RwLock::new(Vec::new()),
        }
    }

    pub fn set_proceed(&self, proceed: bool) {
        *self.proceed.write().unwrap() = proceed;
    }

    /// Answer no to any prompt mentioning `needle`, whatever `proceed` says
    pub fn decline_containing(&self, needle: &str) {
        self.declined.write().unwrap().push(needle.to_string());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.read().unwrap().clone()
    }
}

impl Default for RecordingLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Logger for RecordingLogger {
    fn prompt(&self, message: &str) -> bool {
        self.prompts.write().unwrap().push(message.to_string());

        let declined = self
            .declined
            .read()
            .unwrap()
            .iter()
            .any(|needle| message.contains(needle.as_str()));

        !declined && *self.proceed.read().unwrap()
    }

    fn print(&self, message: &str) {
        self.messages.write().unwrap().push(message.to_string());
    }
}
