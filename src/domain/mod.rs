//! Доменная модель записанной раздачи: карты, фишки, игроки, улицы, действия, итог банка.
//!
//! Всё здесь – неизменяемые данные, которые приходят от парсера/хранилища.
//! Изменяемое состояние реплея живёт в `crate::engine`.

pub mod card;
pub mod chips;
pub mod hand;
pub mod player;

/// Ник игрока – он же ключ во всех картах состояния реплея.
pub type PlayerName = String;

/// Номер места за столом (1..table_size).
pub type SeatNumber = u8;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use hand::*;
pub use player::*;
