use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::HandHistory;
use crate::infra::codec::{hand_from_value, hand_to_value, CodecError};

pub type UserId = String;
pub type SavedHandId = u64;

/// Раздача, сохранённая пользователем.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedHand {
    pub id: SavedHandId,
    /// Монотонная метка времени сохранения (порядковый номер в хранилище).
    pub saved_at: u64,
    pub hand: HandHistory,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Не удалось сериализовать раздачу: {0}")]
    Serialization(#[from] CodecError),

    #[error("Хранилище закрыто")]
    Closed,
}

/// Абстракция хранилища сохранённых раздач.
///
/// Движок реплея его не вызывает: драйвер берёт `HandHistory` отсюда,
/// создаёт `HandReplay` и гоняет его сам.
pub trait HandStore {
    /// Сохранить раздачу пользователя.
    fn save(&mut self, user_id: &str, hand: &HandHistory) -> Result<SavedHandId, StoreError>;

    /// Подписка на раздачи пользователя: свежие сверху, обновляется на каждое сохранение.
    fn subscribe(&mut self, user_id: &str) -> HandSubscription;
}

/// Ленивая подписка на список раздач.
///
/// Список приходит целиком (как снапшот коллекции), отсортирован по времени
/// сохранения по убыванию. Новая подписка сразу видит актуальный список.
#[derive(Clone, Debug)]
pub struct HandSubscription {
    rx: watch::Receiver<Vec<SavedHand>>,
}

impl HandSubscription {
    /// Текущий список, без ожидания.
    pub fn current(&self) -> Vec<SavedHand> {
        self.rx.borrow().clone()
    }

    /// Дождаться следующего изменения и вернуть новый список.
    pub async fn changed(&mut self) -> Result<Vec<SavedHand>, StoreError> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// Документы одного пользователя + канал для подписчиков.
#[derive(Debug)]
struct UserHands {
    documents: Vec<(SavedHandId, u64, serde_json::Value)>,
    tx: watch::Sender<Vec<SavedHand>>,
}

impl UserHands {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            documents: Vec::new(),
            tx,
        }
    }

    /// Раскодировать документы и разослать подписчикам.
    /// Битые документы пропускаем с предупреждением, как при выборке из удалённого стора.
    fn publish(&self) {
        let mut hands: Vec<SavedHand> = self
            .documents
            .iter()
            .filter_map(|(id, saved_at, doc)| match hand_from_value(doc.clone()) {
                Ok(hand) => Some(SavedHand {
                    id: *id,
                    saved_at: *saved_at,
                    hand,
                }),
                Err(err) => {
                    warn!("skipping undecodable saved hand id={id}: {err}");
                    None
                }
            })
            .collect();
        hands.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        self.tx.send_replace(hands);
    }
}

/// Простая in-memory реализация для тестов и локального запуска.
///
/// Раздачи хранятся как JSON-документы – тот же формат, что и у удалённого стора.
#[derive(Debug, Default)]
pub struct InMemoryHandStore {
    users: HashMap<UserId, UserHands>,
    next_id: SavedHandId,
    clock: u64,
}

impl InMemoryHandStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user(&mut self, user_id: &str) -> &mut UserHands {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(UserHands::new)
    }

    /// Положить сырой документ (например, пришедший от старой версии клиента).
    /// Документ, который не раскодируется, хранится, но подписчикам не попадает.
    pub fn save_document(&mut self, user_id: &str, doc: serde_json::Value) -> SavedHandId {
        self.next_id += 1;
        self.clock += 1;
        let (id, saved_at) = (self.next_id, self.clock);

        let user = self.user(user_id);
        user.documents.push((id, saved_at, doc));
        user.publish();
        id
    }

    pub fn count(&self, user_id: &str) -> usize {
        self.users.get(user_id).map_or(0, |u| u.documents.len())
    }
}

impl HandStore for InMemoryHandStore {
    fn save(&mut self, user_id: &str, hand: &HandHistory) -> Result<SavedHandId, StoreError> {
        let doc = hand_to_value(hand)?;
        Ok(self.save_document(user_id, doc))
    }

    fn subscribe(&mut self, user_id: &str) -> HandSubscription {
        HandSubscription {
            rx: self.user(user_id).tx.subscribe(),
        }
    }
}
