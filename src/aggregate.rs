//! Per-company aggregates derived from the normalized question set.

use crate::models::{DifficultyCount, Question, TopicRank};

/// How many ranked topics a company keeps.
pub const TOP_TOPIC_LIMIT: usize = 10;

/// Build the difficulty histogram over `questions`.
///
/// Only observed labels appear, in first-seen order; there is no fixed
/// Easy/Medium/Hard scale, so a file using "Hard++" gets a "Hard++" bucket.
pub fn difficulty_histogram(questions: &[Question]) -> Vec<DifficultyCount> {
    let mut histogram: Vec<DifficultyCount> = Vec::new();
    for question in questions {
        match histogram
            .iter_mut()
            .find(|bucket| bucket.level == question.difficulty)
        {
            Some(bucket) => bucket.count += 1,
            None => histogram.push(DifficultyCount {
                level: question.difficulty.clone(),
                count: 1,
            }),
        }
    }
    histogram
}

/// Count topic occurrences and keep the [`TOP_TOPIC_LIMIT`] most frequent.
///
/// Every element of a question's topic list counts as one occurrence. The
/// sort is stable, so topics with equal counts keep their first-seen order;
/// ranks are assigned 1-based after the cut.
pub fn top_topics(questions: &[Question]) -> Vec<TopicRank> {
    let mut counts: Vec<(String, i64)> = Vec::new();
    for question in questions {
        for topic in &question.topics {
            match counts.iter_mut().find(|(name, _)| name == topic) {
                Some((_, count)) => *count += 1,
                None => counts.push((topic.clone(), 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_TOPIC_LIMIT);

    counts
        .into_iter()
        .enumerate()
        .map(|(index, (name, count))| TopicRank {
            name,
            count,
            rank: (index + 1) as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(difficulty: &str, topics: &[&str]) -> Question {
        Question {
            external_id: "1".into(),
            title: "T".into(),
            url: String::new(),
            is_premium: false,
            acceptance: String::new(),
            difficulty: difficulty.into(),
            frequency: 0,
            topics: topics.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_histogram_counts_observed_labels() {
        let questions = vec![
            question("Easy", &[]),
            question("Medium", &[]),
            question("Easy", &[]),
        ];
        let histogram = difficulty_histogram(&questions);
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram[0].level, "Easy");
        assert_eq!(histogram[0].count, 2);
        assert_eq!(histogram[1].level, "Medium");
        assert_eq!(histogram[1].count, 1);
    }

    #[test]
    fn test_histogram_keeps_unconventional_labels() {
        let histogram = difficulty_histogram(&[question("Hard++", &[])]);
        assert_eq!(histogram[0].level, "Hard++");
    }

    #[test]
    fn test_histogram_empty_input() {
        assert!(difficulty_histogram(&[]).is_empty());
    }

    #[test]
    fn test_top_topics_sorted_by_count() {
        let questions = vec![
            question("Easy", &["Array", "Hash Table"]),
            question("Medium", &["Array"]),
            question("Hard", &["Array", "Graph"]),
        ];
        let topics = top_topics(&questions);
        assert_eq!(topics[0].name, "Array");
        assert_eq!(topics[0].count, 3);
        assert_eq!(topics[0].rank, 1);
        assert_eq!(topics[1].count, 1);
    }

    #[test]
    fn test_top_topics_tie_keeps_first_seen_order() {
        let questions = vec![
            question("Easy", &["Array", "Hash Table"]),
            question("Medium", &["Linked List"]),
        ];
        let topics = top_topics(&questions);
        let names: Vec<&str> = topics
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Array", "Hash Table", "Linked List"]);
    }

    #[test]
    fn test_top_topics_truncates_to_limit() {
        let many: Vec<String> = (0..15).map(|i| format!("T{i}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let topics = top_topics(&[question("Easy", &refs)]);
        assert_eq!(topics.len(), TOP_TOPIC_LIMIT);
        assert_eq!(topics.last().unwrap().rank, TOP_TOPIC_LIMIT as i64);
    }

    #[test]
    fn test_duplicate_tags_count_per_occurrence() {
        let topics = top_topics(&[question("Easy", &["Array", "Array"])]);
        assert_eq!(topics[0].count, 2);
    }
}
