//! Document chat use cases
//! 文档对话用例

mod clear_history;
mod get_history;
mod send_message;

pub use clear_history::ClearChatHistory;
pub use get_history::GetChatHistory;
pub use send_message::SendChatMessage;
