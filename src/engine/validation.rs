use std::collections::BTreeSet;

use crate::domain::HandHistory;
use crate::engine::errors::HistoryError;

/// Проверка структурных инвариантов записи перед запуском реплея.
///
/// Легальность ставок (min-raise, очерёдность) не проверяем – только то,
/// без чего движок не может корректно вести учёт фишек.
pub fn validate_history(hand: &HandHistory) -> Result<(), HistoryError> {
    if hand.players.is_empty() {
        return Err(HistoryError::NoPlayers);
    }

    let heroes = hand.players.iter().filter(|p| p.is_hero).count();
    match heroes {
        0 => return Err(HistoryError::NoHero),
        1 => {}
        n => return Err(HistoryError::MultipleHeroes(n)),
    }

    let mut seats = BTreeSet::new();
    let mut names = BTreeSet::new();
    for p in &hand.players {
        if p.seat == 0 {
            return Err(HistoryError::InvalidSeat(p.seat));
        }
        if !seats.insert(p.seat) {
            return Err(HistoryError::DuplicateSeat(p.seat));
        }
        if !names.insert(p.name.as_str()) {
            return Err(HistoryError::DuplicateName(p.name.clone()));
        }
    }

    if hand.streets.is_empty() {
        return Err(HistoryError::NoStreets);
    }

    for (street_idx, street) in hand.streets.iter().enumerate() {
        for (action_idx, action) in street.actions.iter().enumerate() {
            if !names.contains(action.player_name.as_str()) {
                return Err(HistoryError::UnknownActionPlayer {
                    street: street_idx,
                    action: action_idx,
                    name: action.player_name.clone(),
                });
            }
        }
    }

    for share in &hand.pot_outcome.distribution {
        if !names.contains(share.player_name.as_str()) {
            return Err(HistoryError::UnknownDistributionPlayer(share.player_name.clone()));
        }
    }

    Ok(())
}
