//! Boolean hold-long / flat decision series aligned to a bar sequence.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub buy: bool,
}

/// One decision per bar. `label` names the producer (a strategy or the
/// ensemble) for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignalSeries {
    pub label: String,
    pub points: Vec<SignalPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SignalEventKind {
    Buy,
    Sell,
}

/// A flat→long (`Buy`) or long→flat (`Sell`) transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignalEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub kind: SignalEventKind,
}

impl SignalSeries {
    pub fn new(label: impl Into<String>, points: Vec<SignalPoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn buy_at(&self, index: usize) -> Option<bool> {
        self.points.get(index).map(|p| p.buy)
    }

    pub fn buys(&self) -> impl Iterator<Item = bool> + '_ {
        self.points.iter().map(|p| p.buy)
    }

    /// Decision changes relative to the previous bar. The first bar never
    /// produces an event.
    pub fn events(&self) -> Vec<SignalEvent> {
        self.points
            .windows(2)
            .enumerate()
            .filter_map(|(i, w)| {
                let kind = match (w[0].buy, w[1].buy) {
                    (false, true) => SignalEventKind::Buy,
                    (true, false) => SignalEventKind::Sell,
                    _ => return None,
                };
                Some(SignalEvent {
                    index: i + 1,
                    date: w[1].date,
                    kind,
                })
            })
            .collect()
    }
}
