use std::collections::{BTreeMap, BTreeSet};

use crate::domain::card::Card;
use crate::domain::hand::HandHistory;
use crate::domain::PlayerName;

/// Победители – все, кому распределение банка дало положительную сумму.
pub fn compute_winners(hand: &HandHistory) -> BTreeSet<PlayerName> {
    hand.pot_outcome
        .winner_names()
        .map(str::to_string)
        .collect()
}

/// Чьи карты видны на шоудауне.
///
/// - сфолдившие не открываются никогда, даже если в записи есть их карты;
/// - hero – всегда, если у него записаны карманные карты;
/// - остальные – если показали карты (`final_cards`) или выиграли и их карты известны.
///
/// Видимость не выдумываем: нет данных – нет карт.
pub fn compute_revealed_hands(
    hand: &HandHistory,
    folded: &BTreeSet<PlayerName>,
    winners: &BTreeSet<PlayerName>,
) -> BTreeMap<PlayerName, Vec<Card>> {
    let mut revealed = BTreeMap::new();

    for p in &hand.players {
        if folded.contains(&p.name) {
            continue;
        }

        let cards: Option<Vec<Card>> = if p.is_hero {
            p.hole_cards.map(|c| c.to_vec())
        } else if p.showed_cards() {
            p.final_cards.clone()
        } else if winners.contains(&p.name) {
            p.hole_cards.map(|c| c.to_vec())
        } else {
            None
        };

        if let Some(cards) = cards {
            revealed.insert(p.name.clone(), cards);
        }
    }

    revealed
}
