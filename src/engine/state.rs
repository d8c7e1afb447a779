use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerName;
use crate::engine::errors::InsufficientStack;
use crate::engine::events::ReplayLog;
use crate::engine::pot::Pot;

/// Фаза реплея.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReplayPhase {
    /// Ещё не запускался (или только что сброшен).
    #[default]
    Ready,
    /// Идут действия/улицы.
    Active,
    /// Карты открыты, ждём расчёта банка.
    Showdown,
    /// Банк раздаётся.
    Settling,
    /// Раздача доиграна.
    Complete,
}

/// Разрешение на один расчёт банка для конкретного запуска реплея.
///
/// Выдаётся переходом на шоудаун. После `start()` старые билеты недействительны.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementTicket {
    pub generation: u64,
}

/// Изменяемое состояние одного реплея. Владелец – только `HandReplay`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayState {
    pub street_index: usize,
    pub action_index: usize,
    pub pot: Pot,
    pub stacks: BTreeMap<PlayerName, Chips>,
    /// Что игрок поставил на текущей улице (последняя зафиксированная сумма).
    pub current_street_bets: BTreeMap<PlayerName, Chips>,
    pub folded: BTreeSet<PlayerName>,
    /// Все открытые карты борда с начала раздачи.
    pub board: Vec<Card>,
    pub phase: ReplayPhase,
    pub revealed_hands: BTreeMap<PlayerName, Vec<Card>>,
    pub winners: BTreeSet<PlayerName>,
    /// Индексы блайндов первой улицы, уже применённых при старте.
    pub seeded_blinds: Vec<usize>,
    pub anomalies: Vec<InsufficientStack>,
    pub log: ReplayLog,
    /// Номер запуска: растёт на каждом `start()`.
    pub generation: u64,
}

impl ReplayState {
    pub fn snapshot(&self) -> ReplaySnapshot {
        ReplaySnapshot {
            phase: self.phase,
            pot: self.pot.total,
            stacks: self.stacks.clone(),
            current_street_bets: self.current_street_bets.clone(),
            folded: self.folded.clone(),
            board: self.board.clone(),
            revealed_hands: self.revealed_hands.clone(),
            winners: self.winners.clone(),
        }
    }
}

/// Read-only снимок состояния для презентационного слоя и тестов.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySnapshot {
    pub phase: ReplayPhase,
    pub pot: Chips,
    pub stacks: BTreeMap<PlayerName, Chips>,
    pub current_street_bets: BTreeMap<PlayerName, Chips>,
    pub folded: BTreeSet<PlayerName>,
    pub board: Vec<Card>,
    pub revealed_hands: BTreeMap<PlayerName, Vec<Card>>,
    pub winners: BTreeSet<PlayerName>,
}

impl ReplaySnapshot {
    pub fn stack_of(&self, name: &str) -> Option<Chips> {
        self.stacks.get(name).copied()
    }

    /// Фишки в игре: стеки + банк. Между стартом и концом раздачи не меняется,
    /// если распределение банка совпадает с собранным.
    pub fn chips_in_play(&self) -> Chips {
        self.stacks.values().copied().sum::<Chips>() + self.pot
    }
}
