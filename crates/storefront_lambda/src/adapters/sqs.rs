use aws_sdk_sqs::operation::receive_message::builders::ReceiveMessageInputBuilder;
use aws_sdk_sqs::operation::receive_message::ReceiveMessageInput;

use crate::adapters::order_queue::{OrderQueue, ReceivedMessage};
use crate::runtime::config::DEFAULT_RECEIVE_WAIT_SECS;

pub struct SqsOrderQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
    receive_wait_secs: i32,
}

impl SqsOrderQueue {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
            receive_wait_secs: DEFAULT_RECEIVE_WAIT_SECS,
        }
    }

    /// Long-poll wait applied to every receive. Zero falls back to short
    /// polling, which may miss messages that are on the queue.
    pub fn with_receive_wait_secs(mut self, receive_wait_secs: i32) -> Self {
        self.receive_wait_secs = receive_wait_secs;
        self
    }
}

fn receive_request(
    queue_url: &str,
    visibility_timeout_secs: i32,
    receive_wait_secs: i32,
) -> ReceiveMessageInputBuilder {
    ReceiveMessageInput::builder()
        .queue_url(queue_url)
        .max_number_of_messages(1)
        .visibility_timeout(visibility_timeout_secs)
        .wait_time_seconds(receive_wait_secs)
}

impl OrderQueue for SqsOrderQueue {
    fn send_message(&self, body: &str) -> Result<String, String> {
        let client = self.client.clone();
        let queue_url = self.queue_url.clone();
        let message_body = body.to_string();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .send_message()
                    .queue_url(queue_url)
                    .message_body(message_body)
                    .send()
                    .await
                    .map_err(|error| format!("failed to enqueue order message: {error}"))
            })
        })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }

    fn receive_message(
        &self,
        visibility_timeout_secs: i32,
    ) -> Result<Option<ReceivedMessage>, String> {
        let client = self.client.clone();
        let request = receive_request(
            &self.queue_url,
            visibility_timeout_secs,
            self.receive_wait_secs,
        );

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .receive_message()
                    .set_queue_url(request.get_queue_url().clone())
                    .set_max_number_of_messages(*request.get_max_number_of_messages())
                    .set_visibility_timeout(*request.get_visibility_timeout())
                    .set_wait_time_seconds(*request.get_wait_time_seconds())
                    .send()
                    .await
                    .map_err(|error| format!("failed to receive order message: {error}"))
            })
        })?;

        let Some(message) = output.messages().first() else {
            return Ok(None);
        };

        let receipt_handle = message
            .receipt_handle()
            .ok_or_else(|| "received message without a receipt handle".to_string())?;

        Ok(Some(ReceivedMessage {
            message_id: message.message_id().unwrap_or_default().to_string(),
            receipt_handle: receipt_handle.to_string(),
            body: message.body().unwrap_or_default().to_string(),
        }))
    }

    fn delete_message(&self, receipt_handle: &str) -> Result<(), String> {
        let client = self.client.clone();
        let queue_url = self.queue_url.clone();
        let receipt = receipt_handle.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_message()
                    .queue_url(queue_url)
                    .receipt_handle(receipt)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to delete order message: {error}"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_long_polls_for_a_single_message() {
        let request = receive_request("https://queue/orders", 45, DEFAULT_RECEIVE_WAIT_SECS);

        assert_eq!(request.get_queue_url().as_deref(), Some("https://queue/orders"));
        assert_eq!(*request.get_max_number_of_messages(), Some(1));
        assert_eq!(*request.get_visibility_timeout(), Some(45));
        assert_eq!(*request.get_wait_time_seconds(), Some(10));
    }

    #[test]
    fn configured_wait_is_passed_through() {
        let request = receive_request("https://queue/orders", 30, 20);
        assert_eq!(*request.get_wait_time_seconds(), Some(20));
    }
}
