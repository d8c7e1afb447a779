//! Движок реплея: пошаговое воспроизведение записанной раздачи.
//!
//! Высокоуровневый объект: `HandReplay`
//! Основные операции:
//!   - `start` – (пере)запустить реплей и засеять блайнды
//!   - `step` – одно действие / переход улицы / шоудаун
//!   - `settle` – отложенный расчёт банка после шоудауна

pub mod config;
pub mod errors;
pub mod events;
pub mod pot;
pub mod replay;
pub mod showdown;
pub mod state;
pub mod summary;
pub mod validation;

pub use config::{AmountConvention, ReplayConfig, ReplayProfile};
pub use errors::{HistoryError, IllegalTransition, InsufficientStack, ReplayError};
pub use events::{ReplayEvent, ReplayEventKind, ReplayLog};
pub use pot::Pot;
pub use replay::{ActionApplied, HandReplay, StepOutcome};
pub use state::{ReplayPhase, ReplaySnapshot, ReplayState, SettlementTicket};
pub use summary::HandSummary;
pub use validation::validate_history;
