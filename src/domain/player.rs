use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerName, SeatNumber};

/// Игрок из записанной раздачи.
///
/// Запись неизменяемая: текущие стеки во время реплея живут в `ReplayState`,
/// здесь – только то, что было известно парсеру.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Номер места (уникальный, > 0).
    pub seat: SeatNumber,
    /// Ник (уникальный в пределах раздачи).
    pub name: PlayerName,
    /// Ровно один игрок в раздаче – hero.
    #[serde(default)]
    pub is_hero: bool,
    /// Стек на начало раздачи.
    #[serde(alias = "stack")]
    pub starting_stack: Chips,
    /// Позиция (BTN, SB, BB, UTG...), если парсер её определил.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Карманные карты: известны для hero или для вскрывшихся игроков.
    #[serde(default, alias = "cards", skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<[Card; 2]>,
    /// Карты, показанные на шоудауне (только для не-hero).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cards: Option<Vec<Card>>,
}

impl Player {
    pub fn new(seat: SeatNumber, name: impl Into<PlayerName>, starting_stack: Chips) -> Self {
        Self {
            seat,
            name: name.into(),
            is_hero: false,
            starting_stack,
            position: None,
            hole_cards: None,
            final_cards: None,
        }
    }

    pub fn hero(mut self) -> Self {
        self.is_hero = true;
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_hole_cards(mut self, cards: [Card; 2]) -> Self {
        self.hole_cards = Some(cards);
        self
    }

    pub fn with_final_cards(mut self, cards: Vec<Card>) -> Self {
        self.final_cards = Some(cards);
        self
    }

    /// Показал ли игрок карты на шоудауне (непустой `final_cards`).
    pub fn showed_cards(&self) -> bool {
        self.final_cards.as_ref().is_some_and(|c| !c.is_empty())
    }
}
