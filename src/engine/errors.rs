use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Chips, PlayerName, SeatNumber};

/// Ошибки движка реплея.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Запись раздачи нарушает инварианты – реплей не стартует.
    #[error("Некорректная история раздачи: {0}")]
    InvalidHandHistory(#[from] HistoryError),

    /// Шаг/расчёт вызван в фазе, где он невозможен. Состояние не меняется.
    #[error("Недопустимый переход: {0}")]
    IllegalTransition(#[from] IllegalTransition),
}

/// Нарушения инвариантов `HandHistory`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("В раздаче нет игроков")]
    NoPlayers,

    #[error("В раздаче нет hero")]
    NoHero,

    #[error("В раздаче больше одного hero ({0})")]
    MultipleHeroes(usize),

    #[error("Место {0} недопустимо (нумерация мест с 1)")]
    InvalidSeat(SeatNumber),

    #[error("Место {0} занято двумя игроками")]
    DuplicateSeat(SeatNumber),

    #[error("Ник {0} встречается дважды")]
    DuplicateName(PlayerName),

    #[error("В раздаче нет ни одной улицы")]
    NoStreets,

    #[error("Улица {street}, действие {action}: неизвестный игрок {name}")]
    UnknownActionPlayer {
        street: usize,
        action: usize,
        name: PlayerName,
    },

    #[error("Распределение банка ссылается на неизвестного игрока {0}")]
    UnknownDistributionPlayer(PlayerName),
}

/// Почему `step()`/`settle()` отклонён.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum IllegalTransition {
    #[error("реплей ещё не запущен (нужен start)")]
    NotStarted,

    #[error("раздача на шоудауне, ждём расчёта банка")]
    AwaitingSettlement,

    #[error("раздача ещё не дошла до шоудауна, рассчитывать нечего")]
    NotAtShowdown,

    #[error("реплей уже завершён")]
    AlreadyComplete,

    #[error("расчёт банка относится к предыдущему запуску реплея")]
    StaleSettlement,
}

/// Аномалия: ставка больше оставшегося стека.
///
/// Не ошибка – в исторических логах такое бывает (округления при all-in),
/// списание обрезается до стека, а сам факт фиксируется.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("У игрока {player} недостаточно фишек: нужно {requested}, есть {available}")]
pub struct InsufficientStack {
    pub player: PlayerName,
    pub requested: Chips,
    pub available: Chips,
}
