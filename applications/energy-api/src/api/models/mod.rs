pub mod history;
pub mod live;

pub use history::{HistoryResponse, Summary};
pub use live::LiveResponse;
