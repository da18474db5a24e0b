use crate::models::LearningProgress;

/// Case-insensitive filter over learning-progress records.
///
/// A record matches when the term occurs in its name, its description or
/// any topic name. A blank term returns every record.
pub fn filter_progress<'a>(records: &'a [LearningProgress], term: &str) -> Vec<&'a LearningProgress> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
                || p.topics.iter().any(|t| t.name.to_lowercase().contains(&term))
        })
        .collect()
}
