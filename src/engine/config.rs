//! Конфигурация реплея.
//!
//! Здесь описываем только "правила" воспроизведения, без состояния и без привязки к раздаче.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Как трактовать `amount` у bet/raise/call.
///
/// Источники историй пишут сумму по-разному, поэтому трактовка – настройка, а не константа.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AmountConvention {
    /// `amount` – итоговая ставка игрока на улице ("raise to 6", "call 6").
    /// Списывается разница с уже поставленным на этой улице.
    #[default]
    StreetTotal,
    /// `amount` – сколько фишек игрок докладывает этим действием.
    Increment,
}

/// Готовые профили реплея.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ReplayProfile {
    /// Пауза 1.5 сек перед раздачей банка, чтобы UI успел показать карты.
    Standard,
    /// Без паузы – для аудита и пакетной обработки.
    Instant,
}

/// Правила реплея для одной раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReplayConfig {
    /// Пауза между шоудауном и раздачей банка, мс.
    pub settle_delay_ms: u64,
    pub amount_convention: AmountConvention,
}

impl ReplayConfig {
    /// Строгий конструктор.
    pub const fn new(settle_delay_ms: u64, amount_convention: AmountConvention) -> Self {
        Self {
            settle_delay_ms,
            amount_convention,
        }
    }

    /// Стандартный профиль: 1500 мс паузы, суммы – итоговые ставки на улице.
    pub const fn standard() -> Self {
        Self::new(1_500, AmountConvention::StreetTotal)
    }

    pub const fn instant() -> Self {
        Self::new(0, AmountConvention::StreetTotal)
    }

    pub const fn from_profile(profile: ReplayProfile) -> Self {
        match profile {
            ReplayProfile::Standard => Self::standard(),
            ReplayProfile::Instant => Self::instant(),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_amount_convention(mut self, convention: AmountConvention) -> Self {
        self.amount_convention = convention;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::standard()
    }
}
