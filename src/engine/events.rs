use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{ActionKind, StreetName};
use crate::domain::PlayerName;
use crate::engine::errors::InsufficientStack;

/// Тип события реплея.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReplayEventKind {
    /// Реплей (пере)запущен.
    ReplayStarted {
        generation: u64,
    },

    /// Блайнд, засеянный при старте.
    BlindPosted {
        player: PlayerName,
        kind: ActionKind,
        amount: Chips,
    },

    /// Действие игрока применено.
    ActionApplied {
        street: usize,
        player: PlayerName,
        kind: ActionKind,
        /// Сколько реально ушло из стека в банк.
        debited: Chips,
        new_stack: Chips,
        pot_after: Chips,
        anomaly: Option<InsufficientStack>,
    },

    /// Переход на новую улицу.
    StreetAdvanced {
        street: usize,
        name: StreetName,
        cards: Vec<Card>,
    },

    /// Действия кончились – шоудаун.
    ShowdownReached {
        winners: Vec<PlayerName>,
    },

    /// Карты игрока открыты на шоудауне.
    HandRevealed {
        player: PlayerName,
        cards: Vec<Card>,
    },

    /// Выплата из банка.
    PotAwarded {
        player: PlayerName,
        amount: Chips,
    },

    /// Банк разыгран, реплей завершён.
    ReplayCompleted,
}

/// Событие с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayEvent {
    pub index: u32,
    pub kind: ReplayEventKind,
}

/// Журнал событий одного запуска реплея.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayLog {
    pub events: Vec<ReplayEvent>,
}

impl ReplayLog {
    pub fn push(&mut self, kind: ReplayEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(ReplayEvent { index: idx, kind });
    }
}
