use std::collections::VecDeque;

use crate::prediction::Prediction;

pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first log of predictions. Oldest entries fall off the end.
#[derive(Debug, Clone)]
pub struct PredictionHistory {
    entries: VecDeque<Prediction>,
    capacity: usize,
}

impl Default for PredictionHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl PredictionHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, prediction: Prediction) {
        self.entries.push_front(prediction);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&Prediction> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prediction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::PredictionResult;

    fn entry(order_id: u64) -> Prediction {
        Prediction::Live(PredictionResult {
            order_id,
            city: "Lahore".into(),
            predicted_eta_minutes: 20.0,
            predicted_delay_minutes: 1.0,
        })
    }

    #[test]
    fn keeps_ten_most_recent_first() {
        let mut history = PredictionHistory::default();
        for id in 1..=11 {
            history.record(entry(id));
        }

        assert_eq!(history.len(), 10);
        let ids: Vec<u64> = history.iter().map(|p| p.result().order_id).collect();
        assert_eq!(ids, (2..=11).rev().collect::<Vec<_>>());
        assert_eq!(history.latest().map(|p| p.result().order_id), Some(11));
    }

    #[test]
    fn starts_empty() {
        let history = PredictionHistory::default();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
