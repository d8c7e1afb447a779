//! Асинхронный драйвер реплея с отложенным расчётом банка.
//!
//! `HandReplay` сам по себе синхронный. Сессия добавляет к нему таймер:
//! после шоудауна через `settle_delay` банк раздаётся автоматически,
//! чтобы UI успел показать открытые карты.
//!
//! Всё крутится в одном потоке: задача таймера запускается через
//! `tokio::task::spawn_local`, поэтому сессией можно пользоваться
//! только внутри `tokio::task::LocalSet`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::domain::HandHistory;
use crate::engine::{
    HandReplay, ReplayConfig, ReplayError, ReplayPhase, ReplaySnapshot, SettlementTicket, StepOutcome,
};

/// Реплей + запланированный расчёт банка.
pub struct ReplaySession {
    replay: Rc<RefCell<HandReplay>>,
    /// Задача таймера расчёта (если шоудаун уже был).
    pending: Option<JoinHandle<Result<(), ReplayError>>>,
}

impl ReplaySession {
    pub fn new(hand: HandHistory, config: ReplayConfig) -> Self {
        Self::from_replay(HandReplay::new(hand, config))
    }

    pub fn from_replay(replay: HandReplay) -> Self {
        Self {
            replay: Rc::new(RefCell::new(replay)),
            pending: None,
        }
    }

    /// (Пере)запуск. Сначала снимаем висящий таймер, потом сбрасываем состояние:
    /// старый расчёт не должен сработать по уже сброшенной раздаче.
    pub fn start(&mut self) -> Result<(), ReplayError> {
        self.cancel_pending();
        self.replay.borrow_mut().start()
    }

    pub fn reset(&mut self) -> Result<(), ReplayError> {
        self.start()
    }

    /// Один шаг. На шоудауне планирует расчёт банка.
    pub fn step(&mut self) -> Result<StepOutcome, ReplayError> {
        let outcome = self.replay.borrow_mut().step()?;
        if let StepOutcome::Showdown(ticket) = &outcome {
            self.schedule_settlement(*ticket);
        }
        Ok(outcome)
    }

    fn schedule_settlement(&mut self, ticket: SettlementTicket) {
        self.cancel_pending();

        let replay = Rc::clone(&self.replay);
        let delay = replay.borrow().config().settle_delay();
        debug!("settlement scheduled in {delay:?} (generation={})", ticket.generation);

        self.pending = Some(tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let result = replay.borrow_mut().settle(ticket);
            if let Err(err) = &result {
                warn!("scheduled settlement rejected: {err}");
            }
            result
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("pending settlement cancelled");
            }
            handle.abort();
        }
    }

    /// Есть ли запланированный и ещё не сработавший расчёт.
    pub fn has_pending_settlement(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Дождаться запланированного расчёта.
    ///
    /// `None` – ждать нечего (шоудауна не было или таймер снят рестартом).
    pub async fn settled(&mut self) -> Option<Result<(), ReplayError>> {
        let handle = self.pending.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => None,
        }
    }

    pub fn snapshot(&self) -> ReplaySnapshot {
        self.replay.borrow().snapshot()
    }

    pub fn phase(&self) -> ReplayPhase {
        self.replay.borrow().phase()
    }

    pub fn is_complete(&self) -> bool {
        self.replay.borrow().is_complete()
    }

    pub fn has_next_action(&self) -> bool {
        self.replay.borrow().has_next_action()
    }

    /// Доступ к машине на чтение (журнал действий, события и т.п.).
    pub fn with_replay<R>(&self, f: impl FnOnce(&HandReplay) -> R) -> R {
        f(&self.replay.borrow())
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
