use crate::session::phrase::PhraseRecord;

/// Phrases at or above this confidence are left out of practice sessions.
pub const CONFIDENT_THRESHOLD: u8 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub count: usize,
    pub percentage: u8,
}

/// Practiced-count and percentage toward the daily goal.
pub fn progress(phrases: &[PhraseRecord], goal: u32) -> Progress {
    let count = phrases.iter().filter(|p| p.practiced).count();
    let goal = goal.max(1);
    let percentage = (count as f64 / goal as f64 * 100.0).round().min(100.0) as u8;
    Progress { count, percentage }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PracticePick<'a> {
    /// Empty collection, nothing to practice
    NoPhrases,
    /// Every phrase is at or above the confidence threshold
    AllConfident,
    Next(&'a PhraseRecord),
}

/// Pick the next practice target: the lowest-confidence phrase below the
/// threshold, ties broken by collection order.
pub fn next_target(phrases: &[PhraseRecord]) -> PracticePick<'_> {
    if phrases.is_empty() {
        return PracticePick::NoPhrases;
    }
    let mut best: Option<&PhraseRecord> = None;
    for p in phrases.iter().filter(|p| p.confidence < CONFIDENT_THRESHOLD) {
        match best {
            Some(b) if p.confidence >= b.confidence => {}
            _ => best = Some(p),
        }
    }
    match best {
        Some(p) => PracticePick::Next(p),
        None => PracticePick::AllConfident,
    }
}

/// Mean confidence across the collection, rounded; None when empty.
pub fn average_confidence(phrases: &[PhraseRecord]) -> Option<u8> {
    if phrases.is_empty() {
        return None;
    }
    let total: u32 = phrases.iter().map(|p| u32::from(p.confidence)).sum();
    Some((total as f64 / phrases.len() as f64).round() as u8)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::engine::classifier::Tag;
    use crate::session::phrase::PhraseId;

    fn record(id: u64, confidence: u8, practiced: bool) -> PhraseRecord {
        PhraseRecord {
            id: PhraseId(id),
            text: format!("phrase {id}"),
            tag: Tag::General,
            practiced,
            practice_time: 0,
            confidence,
            spoken_count: 0,
            last_practiced: None,
            is_custom: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_counts_practiced() {
        let phrases = vec![record(1, 0, true), record(2, 0, false), record(3, 0, true)];
        let p = progress(&phrases, 12);
        assert_eq!(p.count, 2);
        assert_eq!(p.percentage, 17); // round(2/12 * 100)
    }

    #[test]
    fn test_progress_percentage_caps_at_100() {
        let phrases: Vec<PhraseRecord> = (0..5).map(|i| record(i, 0, true)).collect();
        let p = progress(&phrases, 3);
        assert_eq!(p.count, 5);
        assert_eq!(p.percentage, 100);
    }

    #[test]
    fn test_progress_zero_goal_normalized() {
        let phrases = vec![record(1, 0, true)];
        let p = progress(&phrases, 0);
        assert_eq!(p.percentage, 100);
    }

    #[test]
    fn test_next_target_picks_minimum_confidence() {
        let phrases = vec![record(1, 60, false), record(2, 20, false), record(3, 40, false)];
        match next_target(&phrases) {
            PracticePick::Next(p) => assert_eq!(p.id, PhraseId(2)),
            other => panic!("expected a target, got {other:?}"),
        }
    }

    #[test]
    fn test_next_target_tie_breaks_by_order() {
        let phrases = vec![record(5, 30, false), record(6, 30, false)];
        match next_target(&phrases) {
            PracticePick::Next(p) => assert_eq!(p.id, PhraseId(5)),
            other => panic!("expected a target, got {other:?}"),
        }
    }

    #[test]
    fn test_next_target_all_confident() {
        let phrases = vec![record(1, 70, false), record(2, 95, false)];
        assert_eq!(next_target(&phrases), PracticePick::AllConfident);
    }

    #[test]
    fn test_next_target_empty() {
        assert_eq!(next_target(&[]), PracticePick::NoPhrases);
    }

    #[test]
    fn test_average_confidence() {
        assert_eq!(average_confidence(&[]), None);
        let phrases = vec![record(1, 10, false), record(2, 21, false)];
        assert_eq!(average_confidence(&phrases), Some(16)); // round(15.5)
    }
}
