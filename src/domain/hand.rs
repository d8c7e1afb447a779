use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::{PlayerName, SeatNumber};

/// Метаданные раздачи (то, что парсер достаёт из заголовка истории).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_id: Option<String>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Размер стола (2–10). Нужен только презентационному слою для раскладки мест.
    pub table_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_seat: Option<SeatNumber>,
}

/// Название улицы. Движку всё равно, сколько улиц в раздаче,
/// название нужно только для логов и журнала действий.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StreetName {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
    Other(String),
}

impl From<String> for StreetName {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "preflop" | "pre-flop" => StreetName::Preflop,
            "flop" => StreetName::Flop,
            "turn" => StreetName::Turn,
            "river" => StreetName::River,
            _ => StreetName::Other(value),
        }
    }
}

impl From<StreetName> for String {
    fn from(name: StreetName) -> Self {
        name.to_string()
    }
}

impl fmt::Display for StreetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreetName::Preflop => write!(f, "preflop"),
            StreetName::Flop => write!(f, "flop"),
            StreetName::Turn => write!(f, "turn"),
            StreetName::River => write!(f, "river"),
            StreetName::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Тип действия игрока. Закрытый набор: строковые варианты от парсера
/// разбираются один раз на входе (`FromStr`), дальше движок матчит только enum.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ActionKind {
    PostSmallBlind,
    PostBigBlind,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionKind {
    pub fn is_blind(self) -> bool {
        matches!(self, ActionKind::PostSmallBlind | ActionKind::PostBigBlind)
    }

    /// Действия, которые двигают фишки в банк.
    pub fn moves_chips(self) -> bool {
        matches!(self, ActionKind::Call | ActionKind::Bet | ActionKind::Raise)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::PostSmallBlind => "postSmallBlind",
            ActionKind::PostBigBlind => "postBigBlind",
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Неизвестный тип действия: {0:?}")]
pub struct UnknownActionKind(pub String);

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "fold" | "folds" => ActionKind::Fold,
            "check" | "checks" => ActionKind::Check,
            "call" | "calls" => ActionKind::Call,
            "bet" | "bets" => ActionKind::Bet,
            "raise" | "raises" => ActionKind::Raise,
            "postsmallblind" | "postssmallblind" | "smallblind" | "sb" => ActionKind::PostSmallBlind,
            "postbigblind" | "postsbigblind" | "bigblind" | "bb" => ActionKind::PostBigBlind,
            _ => return Err(UnknownActionKind(s.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for ActionKind {
    type Error = UnknownActionKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Одно действие из лога раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub player_name: PlayerName,
    #[serde(alias = "action")]
    pub kind: ActionKind,
    /// Для fold/check – ноль.
    #[serde(default)]
    pub amount: Chips,
}

impl Action {
    pub fn new(player_name: impl Into<PlayerName>, kind: ActionKind, amount: Chips) -> Self {
        Self {
            player_name: player_name.into(),
            kind,
            amount,
        }
    }

    pub fn fold(player_name: impl Into<PlayerName>) -> Self {
        Self::new(player_name, ActionKind::Fold, Chips::ZERO)
    }

    pub fn check(player_name: impl Into<PlayerName>) -> Self {
        Self::new(player_name, ActionKind::Check, Chips::ZERO)
    }
}

/// Улица раздачи: открытые на ней карты борда + действия в порядке игры.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Street {
    #[serde(default)]
    pub name: StreetName,
    /// Пусто для префлопа.
    #[serde(default, alias = "cards")]
    pub board_cards: Vec<Card>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Street {
    pub fn new(name: StreetName, board_cards: Vec<Card>, actions: Vec<Action>) -> Self {
        Self {
            name,
            board_cards,
            actions,
        }
    }
}

/// Кто сколько получил из банка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PotShare {
    pub player_name: PlayerName,
    pub amount: Chips,
}

/// Итог раздачи: финальный банк и его распределение.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PotOutcome {
    pub amount: Chips,
    #[serde(default)]
    pub distribution: Vec<PotShare>,
}

impl PotOutcome {
    /// Имена с положительной выплатой, в порядке распределения.
    pub fn winner_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.distribution
            .iter()
            .filter(|share| !share.amount.is_zero())
            .map(|share| share.player_name.as_str())
    }

    pub fn total_distributed(&self) -> Chips {
        self.distribution.iter().map(|s| s.amount).sum()
    }
}

/// Полная записанная раздача – вход движка реплея.
/// Создаётся один раз парсером и дальше не меняется.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandHistory {
    #[serde(default)]
    pub game_info: GameInfo,
    pub players: Vec<Player>,
    pub streets: Vec<Street>,
    #[serde(default, alias = "pot")]
    pub pot_outcome: PotOutcome,
}

impl HandHistory {
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn hero(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_hero)
    }

    /// Сумма стартовых стеков – для проверки сохранения фишек.
    pub fn total_starting_chips(&self) -> Chips {
        self.players.iter().map(|p| p.starting_stack).sum()
    }

    pub fn action_count(&self) -> usize {
        self.streets.iter().map(|s| s.actions.len()).sum()
    }
}
