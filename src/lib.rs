//! Реплей записанных покерных раздач.
//!
//! Берём уже распарсенную историю раздачи (`domain::HandHistory`) и проигрываем её
//! действие за действием: стеки, банк, фолды, борд, открытые карты, победители.
//!
//! - `domain` – неизменяемая запись раздачи;
//! - `engine` – машина состояний реплея (`HandReplay`) и снимки состояния;
//! - `session` – асинхронный драйвер с отложенным расчётом банка;
//! - `infra` – JSON-формат и хранилище сохранённых раздач.

pub mod domain;
pub mod engine;
pub mod infra;
pub mod session;

pub use domain::HandHistory;
pub use engine::{HandReplay, ReplayConfig, ReplayError, ReplayPhase, ReplaySnapshot, StepOutcome};
pub use session::ReplaySession;
