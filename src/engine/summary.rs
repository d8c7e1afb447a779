use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::HandHistory;
use crate::domain::PlayerName;
use crate::engine::config::ReplayConfig;
use crate::engine::errors::{HistoryError, ReplayError};
use crate::engine::replay::HandReplay;

/// Краткое описание сохранённой раздачи – строка в списке раздач.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandSummary {
    pub hand_id: Option<String>,
    pub hero: PlayerName,
    pub hero_cards: Option<[Card; 2]>,
    /// Позиция hero (BTN, SB...), если парсер её определил.
    pub hero_position: Option<String>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub total_pot: Chips,
    /// Hero получил что-то из банка.
    pub hero_won: bool,
    /// Итог hero относительно стартового стека.
    /// Положительное значение = выигрыш, отрицательное = потеря.
    pub hero_net: i64,
}

impl HandSummary {
    /// Проигрываем раздачу целиком (без пауз) и собираем итог по hero.
    pub fn from_history(hand: &HandHistory) -> Result<Self, ReplayError> {
        let mut replay = HandReplay::new(hand.clone(), ReplayConfig::instant());
        replay.start()?;
        let end = replay.play_out()?;

        let hero = hand.hero().ok_or(HistoryError::NoHero)?;
        let final_stack = end.stack_of(&hero.name).unwrap_or(Chips::ZERO);

        Ok(Self {
            hand_id: hand.game_info.hand_id.clone(),
            hero: hero.name.clone(),
            hero_cards: hero.hole_cards,
            hero_position: hero.position.clone(),
            small_blind: hand.game_info.small_blind,
            big_blind: hand.game_info.big_blind,
            total_pot: hand.pot_outcome.amount,
            hero_won: hand.pot_outcome.winner_names().any(|n| n == hero.name),
            hero_net: final_stack.signed_diff(hero.starting_stack),
        })
    }
}
