use serde::Deserialize;

// One predefined answer plus the keywords that trigger it
#[derive(Deserialize, Clone)]
pub struct AnswerEntry {
    pub keywords: Vec<String>,
    pub answer: String,
}

// Static keyword-indexed answer table, loaded once at startup
pub struct AnswerTable {
    entries: Vec<AnswerEntry>,
}

impl AnswerTable {
    pub fn load(path: &str) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read answer table {}: {}", path, e))?;
        let entries: Vec<AnswerEntry> = serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid answer table {}: {}", path, e))?;
        Ok(Self { entries })
    }

    // Linear scan, lowercase substring match, first matching entry wins
    pub fn lookup(&self, question: &str) -> Option<&str> {
        let question = question.to_lowercase();
        for entry in &self.entries {
            if entry
                .keywords
                .iter()
                .any(|keyword| question.contains(&keyword.to_lowercase()))
            {
                return Some(&entry.answer);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AnswerTable {
        AnswerTable {
            entries: vec![
                AnswerEntry {
                    keywords: vec!["hours".to_string(), "schedule".to_string()],
                    answer: "The town hall is open Monday to Friday, 9:00 to 14:00.".to_string(),
                },
                AnswerEntry {
                    keywords: vec!["phone".to_string()],
                    answer: "You can reach us at 555-0100.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn matches_keywords_case_insensitively() {
        assert_eq!(
            table().lookup("What are your opening HOURS?"),
            Some("The town hall is open Monday to Friday, 9:00 to 14:00.")
        );
    }

    #[test]
    fn first_matching_entry_wins() {
        let table = AnswerTable {
            entries: vec![
                AnswerEntry {
                    keywords: vec!["market".to_string()],
                    answer: "first".to_string(),
                },
                AnswerEntry {
                    keywords: vec!["market".to_string()],
                    answer: "second".to_string(),
                },
            ],
        };
        assert_eq!(table.lookup("When is the market?"), Some("first"));
    }

    #[test]
    fn unmatched_question_returns_none() {
        assert_eq!(table().lookup("Where can I park my car?"), None);
    }

    #[test]
    fn entries_parse_from_json() {
        let raw = r#"[{"keywords": ["tax", "taxes"], "answer": "Taxes are due in June."}]"#;
        let entries: Vec<AnswerEntry> = serde_json::from_str(raw).unwrap();
        let table = AnswerTable { entries };
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("how do I pay my taxes"), Some("Taxes are due in June."));
    }
}
