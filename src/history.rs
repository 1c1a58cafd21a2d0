/// Raw command lines in the order they were executed.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One entry per line; empty when nothing has run yet.
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_order_and_duplicates() {
        let mut history = History::new();
        history.push("ls");
        history.push("cd subdir");
        history.push("ls");

        assert_eq!(history.len(), 3);
        assert_eq!(history.render(), "ls\ncd subdir\nls");
    }

    #[test]
    fn test_history_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.render(), "");
    }
}
