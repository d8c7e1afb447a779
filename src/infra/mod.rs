//! Инфраструктурный слой вокруг движка реплея:
//! - JSON-формат истории раздачи;
//! - абстракция хранилища сохранённых раздач (и in-memory реализация).

pub mod codec;
pub mod persistence;

pub use codec::*;
pub use persistence::*;
