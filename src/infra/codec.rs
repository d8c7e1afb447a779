//! JSON-формат истории раздачи (то, о чём договорились парсер и хранилище).
//!
//! Имена полей – camelCase (`isHero`, `startingStack`, `boardCards`, `playerName`,
//! `potOutcome`...). Строковые типы действий ("raises", "posts big blind")
//! превращаются в `ActionKind` здесь, на входе.

use thiserror::Error;

use crate::domain::HandHistory;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_hand_json(input: &str) -> Result<HandHistory, CodecError> {
    Ok(serde_json::from_str(input)?)
}

/// Список раздач (например, выгрузка из хранилища).
pub fn parse_hand_list_json(input: &str) -> Result<Vec<HandHistory>, CodecError> {
    Ok(serde_json::from_str(input)?)
}

pub fn hand_to_json(hand: &HandHistory) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(hand)?)
}

pub fn hand_to_value(hand: &HandHistory) -> Result<serde_json::Value, CodecError> {
    Ok(serde_json::to_value(hand)?)
}

pub fn hand_from_value(value: serde_json::Value) -> Result<HandHistory, CodecError> {
    Ok(serde_json::from_value(value)?)
}
