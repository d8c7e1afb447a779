use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerName;

/// Банк раздачи. Копится через все улицы, обнуляется только при расчёте.
///
/// Помимо общей суммы помним, кто сколько внёс за раздачу:
/// `total` всегда равен сумме `contributions`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub total: Chips,
    pub contributions: BTreeMap<PlayerName, Chips>,
}

impl Pot {
    pub fn add(&mut self, player: &str, amount: Chips) {
        if amount.is_zero() {
            return;
        }
        self.total += amount;
        *self
            .contributions
            .entry(player.to_string())
            .or_insert(Chips::ZERO) += amount;
    }

    /// Сколько игрок внёс в банк с начала раздачи.
    pub fn contributed_by(&self, player: &str) -> Chips {
        self.contributions
            .get(player)
            .copied()
            .unwrap_or(Chips::ZERO)
    }

    /// Забрать весь банк (при раздаче выигрыша).
    pub fn take(&mut self) -> Chips {
        self.contributions.clear();
        std::mem::replace(&mut self.total, Chips::ZERO)
    }
}
