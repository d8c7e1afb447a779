use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{Action, ActionKind, HandHistory, Street};
use crate::domain::PlayerName;
use crate::engine::config::{AmountConvention, ReplayConfig};
use crate::engine::errors::{IllegalTransition, InsufficientStack, ReplayError};
use crate::engine::events::{ReplayEvent, ReplayEventKind};
use crate::engine::showdown::{compute_revealed_hands, compute_winners};
use crate::engine::state::{ReplayPhase, ReplaySnapshot, ReplayState, SettlementTicket};
use crate::engine::validation::validate_history;

/// Результат применения одного действия.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionApplied {
    pub street: usize,
    pub index: usize,
    pub action: Action,
    /// Сколько фишек реально ушло в банк этим действием.
    pub debited: Chips,
    /// Ставка оказалась больше стека – списание обрезано.
    pub anomaly: Option<InsufficientStack>,
}

/// Что сделал один `step()`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepOutcome {
    /// Применено действие игрока.
    Action(ActionApplied),
    /// Открыта следующая улица.
    StreetAdvanced { street: usize, cards: Vec<Card> },
    /// Действия кончились: шоудаун. Билет нужен для отложенного расчёта банка.
    Showdown(SettlementTicket),
}

/// Машина состояний реплея одной раздачи.
///
/// Основные операции:
///   - `start` / `reset` – (пере)запустить реплей, засеять блайнды;
///   - `step` – продвинуться ровно на одну единицу (действие, улица или шоудаун);
///   - `settle` – раздать банк (вызывает драйвер по таймеру после шоудауна).
///
/// Запись раздачи не меняется, всё изменяемое – в `ReplayState`,
/// наружу отдаём только снимки.
#[derive(Clone, Debug)]
pub struct HandReplay {
    hand: Arc<HandHistory>,
    config: ReplayConfig,
    state: ReplayState,
}

impl HandReplay {
    pub fn new(hand: impl Into<Arc<HandHistory>>, config: ReplayConfig) -> Self {
        Self {
            hand: hand.into(),
            config,
            state: ReplayState::default(),
        }
    }

    /// Старт реплея:
    /// - проверяет запись;
    /// - аннулирует билеты на расчёт от прошлых запусков;
    /// - выставляет стартовые стеки, чистит банк/ставки/фолды/борд;
    /// - списывает блайнды первой улицы (без расхода `step()`).
    pub fn start(&mut self) -> Result<(), ReplayError> {
        validate_history(&self.hand)?;

        let hand = Arc::clone(&self.hand);
        let generation = self.state.generation + 1;

        let mut state = ReplayState {
            generation,
            phase: ReplayPhase::Active,
            ..ReplayState::default()
        };
        state.stacks = hand
            .players
            .iter()
            .map(|p| (p.name.clone(), p.starting_stack))
            .collect();
        // Первая улица обычно префлоп с пустым бордом, но модель этого не требует.
        state.board = hand.streets[0].board_cards.clone();
        state.log.push(ReplayEventKind::ReplayStarted { generation });

        self.state = state;
        self.seed_blinds(&hand.streets[0]);

        debug!(
            "replay started: generation={} players={} streets={} pot={}",
            generation,
            hand.players.len(),
            hand.streets.len(),
            self.state.pot.total
        );
        Ok(())
    }

    /// То же, что `start`.
    pub fn reset(&mut self) -> Result<(), ReplayError> {
        self.start()
    }

    /// Первый small blind и первый big blind первой улицы (по типу, не по позиции).
    fn seed_blinds(&mut self, street: &Street) {
        let sb = street
            .actions
            .iter()
            .position(|a| a.kind == ActionKind::PostSmallBlind);
        let bb = street
            .actions
            .iter()
            .position(|a| a.kind == ActionKind::PostBigBlind);

        let mut seeded: Vec<usize> = sb.into_iter().chain(bb).collect();
        seeded.sort_unstable();

        for &idx in &seeded {
            let action = &street.actions[idx];
            let (debited, _) = self.commit(&action.player_name, action.amount);
            self.state
                .current_street_bets
                .insert(action.player_name.clone(), debited);
            self.state.log.push(ReplayEventKind::BlindPosted {
                player: action.player_name.clone(),
                kind: action.kind,
                amount: debited,
            });
        }

        self.state.seeded_blinds = seeded;
    }

    /// Списать `requested` со стека игрока в банк. Больше стека не списываем.
    fn commit(&mut self, player: &str, requested: Chips) -> (Chips, Option<InsufficientStack>) {
        let available = self.state.stacks.get(player).copied().unwrap_or(Chips::ZERO);

        let (debited, anomaly) = if requested > available {
            let anomaly = InsufficientStack {
                player: player.to_string(),
                requested,
                available,
            };
            warn!("{anomaly}; списание обрезано до стека");
            self.state.anomalies.push(anomaly.clone());
            (available, Some(anomaly))
        } else {
            (requested, None)
        };

        if let Some(stack) = self.state.stacks.get_mut(player) {
            *stack -= debited;
        }
        self.state.pot.add(player, debited);
        (debited, anomaly)
    }

    /// Продвинуться на одну единицу.
    ///
    /// Вне фазы `Active` ничего не меняет и сообщает, почему.
    pub fn step(&mut self) -> Result<StepOutcome, ReplayError> {
        match self.state.phase {
            ReplayPhase::Active => {}
            ReplayPhase::Ready => return Err(IllegalTransition::NotStarted.into()),
            ReplayPhase::Showdown | ReplayPhase::Settling => {
                return Err(IllegalTransition::AwaitingSettlement.into())
            }
            ReplayPhase::Complete => return Err(IllegalTransition::AlreadyComplete.into()),
        }

        let hand = Arc::clone(&self.hand);
        let street = &hand.streets[self.state.street_index];

        // Блайнды обрабатываются только при старте.
        while let Some(action) = street.actions.get(self.state.action_index) {
            if !action.kind.is_blind() {
                break;
            }
            let seeded = self.state.street_index == 0
                && self.state.seeded_blinds.contains(&self.state.action_index);
            if !seeded {
                debug!(
                    "skipping blind outside seeding: street={} index={} player={}",
                    self.state.street_index, self.state.action_index, action.player_name
                );
            }
            self.state.action_index += 1;
        }

        if let Some(action) = street.actions.get(self.state.action_index) {
            let applied = self.apply_action(action);
            self.state.action_index += 1;
            return Ok(StepOutcome::Action(applied));
        }

        if self.state.street_index + 1 < hand.streets.len() {
            self.state.street_index += 1;
            self.state.action_index = 0;
            // Банк не трогаем – он копится через улицы.
            self.state.current_street_bets.clear();

            let next = &hand.streets[self.state.street_index];
            self.state.board.extend(next.board_cards.iter().copied());
            self.state.log.push(ReplayEventKind::StreetAdvanced {
                street: self.state.street_index,
                name: next.name.clone(),
                cards: next.board_cards.clone(),
            });
            debug!(
                "street advanced: {} ({}), board={}",
                self.state.street_index,
                next.name,
                self.state.board.len()
            );
            return Ok(StepOutcome::StreetAdvanced {
                street: self.state.street_index,
                cards: next.board_cards.clone(),
            });
        }

        Ok(StepOutcome::Showdown(self.enter_showdown()))
    }

    fn apply_action(&mut self, action: &Action) -> ActionApplied {
        let player = action.player_name.as_str();
        let mut debited = Chips::ZERO;
        let mut anomaly = None;

        match action.kind {
            ActionKind::Fold => {
                self.state.folded.insert(player.to_string());
                self.state.current_street_bets.insert(player.to_string(), Chips::ZERO);
            }
            ActionKind::Check => {}
            ActionKind::Call | ActionKind::Bet | ActionKind::Raise => {
                let prev = self
                    .state
                    .current_street_bets
                    .get(player)
                    .copied()
                    .unwrap_or(Chips::ZERO);

                let requested = match self.config.amount_convention {
                    AmountConvention::StreetTotal => action.amount.saturating_sub(prev),
                    AmountConvention::Increment => action.amount,
                };
                let (paid, short) = self.commit(player, requested);
                debited = paid;
                anomaly = short;

                // Отметка улицы перезаписывается суммой действия (с учётом обрезки по стеку).
                let marker = match self.config.amount_convention {
                    AmountConvention::StreetTotal => action.amount.min(prev + paid),
                    AmountConvention::Increment => paid,
                };
                self.state.current_street_bets.insert(player.to_string(), marker);
            }
            ActionKind::PostSmallBlind | ActionKind::PostBigBlind => {
                // Сюда не попадаем: step() пропускает блайнды.
            }
        }

        let new_stack = self.state.stacks.get(player).copied().unwrap_or(Chips::ZERO);
        self.state.log.push(ReplayEventKind::ActionApplied {
            street: self.state.street_index,
            player: player.to_string(),
            kind: action.kind,
            debited,
            new_stack,
            pot_after: self.state.pot.total,
            anomaly: anomaly.clone(),
        });

        ActionApplied {
            street: self.state.street_index,
            index: self.state.action_index,
            action: action.clone(),
            debited,
            anomaly,
        }
    }

    /// Шоудаун: считаем победителей и чьи карты видны, выдаём билет на расчёт.
    fn enter_showdown(&mut self) -> SettlementTicket {
        let hand = Arc::clone(&self.hand);

        self.state.phase = ReplayPhase::Showdown;
        self.state.winners = compute_winners(&hand);
        self.state.revealed_hands =
            compute_revealed_hands(&hand, &self.state.folded, &self.state.winners);

        self.state.log.push(ReplayEventKind::ShowdownReached {
            winners: self.state.winners.iter().cloned().collect(),
        });
        for (player, cards) in &self.state.revealed_hands {
            self.state.log.push(ReplayEventKind::HandRevealed {
                player: player.clone(),
                cards: cards.clone(),
            });
        }

        debug!(
            "showdown: winners={:?} revealed={}",
            self.state.winners,
            self.state.revealed_hands.len()
        );
        SettlementTicket {
            generation: self.state.generation,
        }
    }

    /// Расчёт банка: выплаты по распределению, банк в ноль, фаза `Complete`.
    ///
    /// Билет от прошлого запуска (до `start()`) отклоняется и ничего не меняет.
    /// До старта – `NotStarted`, до шоудауна – `NotAtShowdown`.
    pub fn settle(&mut self, ticket: SettlementTicket) -> Result<(), ReplayError> {
        if self.state.phase == ReplayPhase::Ready {
            return Err(IllegalTransition::NotStarted.into());
        }
        if ticket.generation != self.state.generation {
            warn!(
                "stale settlement rejected: ticket generation={} current={}",
                ticket.generation, self.state.generation
            );
            return Err(IllegalTransition::StaleSettlement.into());
        }
        match self.state.phase {
            ReplayPhase::Showdown => {}
            ReplayPhase::Complete => return Err(IllegalTransition::AlreadyComplete.into()),
            ReplayPhase::Active => return Err(IllegalTransition::NotAtShowdown.into()),
            ReplayPhase::Settling => return Err(IllegalTransition::AwaitingSettlement.into()),
            ReplayPhase::Ready => return Err(IllegalTransition::NotStarted.into()),
        }

        self.state.phase = ReplayPhase::Settling;

        let hand = Arc::clone(&self.hand);
        for share in &hand.pot_outcome.distribution {
            if let Some(stack) = self.state.stacks.get_mut(&share.player_name) {
                *stack += share.amount;
            }
            self.state.log.push(ReplayEventKind::PotAwarded {
                player: share.player_name.clone(),
                amount: share.amount,
            });
        }

        let collected = self.state.pot.take();
        if collected != hand.pot_outcome.total_distributed() {
            debug!(
                "distributed {} differs from collected pot {}",
                hand.pot_outcome.total_distributed(),
                collected
            );
        }
        self.state.current_street_bets.clear();
        self.state.phase = ReplayPhase::Complete;
        self.state.log.push(ReplayEventKind::ReplayCompleted);

        info!(
            "replay complete: generation={} winners={:?}",
            self.state.generation, self.state.winners
        );
        Ok(())
    }

    /// Синхронно доиграть раздачу до конца (без паузы перед расчётом).
    /// Реплей должен быть запущен.
    pub fn play_out(&mut self) -> Result<ReplaySnapshot, ReplayError> {
        loop {
            if let StepOutcome::Showdown(ticket) = self.step()? {
                self.settle(ticket)?;
                return Ok(self.snapshot());
            }
        }
    }

    // ---- запросы (чистые чтения, в любой фазе) ----

    /// Остались ли действия на текущей улице или следующие улицы.
    pub fn has_next_action(&self) -> bool {
        if !matches!(self.state.phase, ReplayPhase::Ready | ReplayPhase::Active) {
            return false;
        }
        let streets = &self.hand.streets;
        let Some(street) = streets.get(self.state.street_index) else {
            return false;
        };
        let actions_left = street
            .actions
            .iter()
            .skip(self.state.action_index)
            .any(|a| !a.kind.is_blind());
        actions_left || self.state.street_index + 1 < streets.len()
    }

    pub fn current_board(&self) -> &[Card] {
        &self.state.board
    }

    pub fn current_pot(&self) -> Chips {
        self.state.pot.total
    }

    /// Вклад игрока в текущий банк (с начала раздачи, до расчёта).
    pub fn contributed_by(&self, name: &str) -> Chips {
        self.state.pot.contributed_by(name)
    }

    pub fn current_stacks(&self) -> &BTreeMap<PlayerName, Chips> {
        &self.state.stacks
    }

    pub fn current_street_bets(&self) -> &BTreeMap<PlayerName, Chips> {
        &self.state.current_street_bets
    }

    pub fn is_folded(&self, name: &str) -> bool {
        self.state.folded.contains(name)
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == ReplayPhase::Complete
    }

    pub fn phase(&self) -> ReplayPhase {
        self.state.phase
    }

    pub fn snapshot(&self) -> ReplaySnapshot {
        self.state.snapshot()
    }

    pub fn current_street(&self) -> Option<&Street> {
        match self.state.phase {
            ReplayPhase::Ready => None,
            _ => self.hand.streets.get(self.state.street_index),
        }
    }

    /// Уже разыгранные действия в порядке игры: (индекс улицы, действие).
    /// Блайнды, засеянные при старте, считаются разыгранными.
    pub fn action_log(&self) -> Vec<(usize, &Action)> {
        if self.state.phase == ReplayPhase::Ready {
            return Vec::new();
        }

        let mut out = Vec::new();
        for (street_idx, street) in self.hand.streets.iter().enumerate() {
            if street_idx > self.state.street_index {
                break;
            }
            for (idx, action) in street.actions.iter().enumerate() {
                let played = street_idx < self.state.street_index
                    || idx < self.state.action_index
                    || (street_idx == 0 && self.state.seeded_blinds.contains(&idx));
                if played {
                    out.push((street_idx, action));
                }
            }
        }
        out
    }

    pub fn events(&self) -> &[ReplayEvent] {
        &self.state.log.events
    }

    pub fn anomalies(&self) -> &[InsufficientStack] {
        &self.state.anomalies
    }

    pub fn history(&self) -> &HandHistory {
        &self.hand
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }
}
