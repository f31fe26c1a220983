#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
}

pub trait OrderQueue {
    /// Returns the id the queue assigned to the message.
    fn send_message(&self, body: &str) -> Result<String, String>;

    /// Receives at most one message, hiding it for `visibility_timeout_secs`.
    /// An empty queue is `Ok(None)`, never an error.
    fn receive_message(&self, visibility_timeout_secs: i32)
        -> Result<Option<ReceivedMessage>, String>;

    fn delete_message(&self, receipt_handle: &str) -> Result<(), String>;
}
