//! In-process stand-ins for the managed table and queue.
//!
//! The queue models visibility: a received message is hidden until it is
//! deleted or [`InMemoryOrderQueue::expire_visibility`] makes it visible again.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use crate::adapters::customer_store::CustomerStore;
use crate::adapters::order_queue::{OrderQueue, ReceivedMessage};
use crate::runtime::contract::CustomerInfo;
use crate::runtime::row::{customer_from_row, customer_row, Row, CUSTOMER_KEY_ATTRIBUTE};

#[derive(Default)]
pub struct InMemoryCustomerStore {
    tables: Mutex<BTreeMap<String, BTreeMap<String, Row>>>,
    calls: Mutex<usize>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of get/put calls that reached the store.
    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("poisoned mutex")
    }

    pub fn row(&self, table_name: &str, customer_id: &str) -> Option<Row> {
        self.tables
            .lock()
            .expect("poisoned mutex")
            .get(table_name)
            .and_then(|rows| rows.get(customer_id))
            .cloned()
    }

    fn record_call(&self) {
        *self.calls.lock().expect("poisoned mutex") += 1;
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn get_customer(
        &self,
        table_name: &str,
        customer_id: &str,
    ) -> Result<Option<CustomerInfo>, String> {
        self.record_call();
        match self.row(table_name, customer_id) {
            Some(row) => customer_from_row(&row)
                .map(Some)
                .map_err(|error| format!("failed to decode row: {error}")),
            None => Ok(None),
        }
    }

    fn put_customer(&self, table_name: &str, info: &CustomerInfo) -> Result<(), String> {
        self.record_call();
        let row = customer_row(info);
        let key = row
            .get(CUSTOMER_KEY_ATTRIBUTE)
            .cloned()
            .ok_or_else(|| "row is missing its key attribute".to_string())?;
        self.tables
            .lock()
            .expect("poisoned mutex")
            .entry(table_name.to_string())
            .or_default()
            .insert(key, row);
        Ok(())
    }
}

#[derive(Default)]
struct QueueState {
    next_id: usize,
    visible: VecDeque<ReceivedMessage>,
    in_flight: Vec<ReceivedMessage>,
    sent: usize,
    deleted: usize,
}

#[derive(Default)]
pub struct InMemoryOrderQueue {
    state: Mutex<QueueState>,
}

impl InMemoryOrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().expect("poisoned mutex").sent
    }

    pub fn deleted_count(&self) -> usize {
        self.state.lock().expect("poisoned mutex").deleted
    }

    pub fn visible_len(&self) -> usize {
        self.state.lock().expect("poisoned mutex").visible.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.state.lock().expect("poisoned mutex").in_flight.len()
    }

    /// Simulates the visibility timeout elapsing for every hidden message.
    pub fn expire_visibility(&self) {
        let mut state = self.state.lock().expect("poisoned mutex");
        let expired: Vec<ReceivedMessage> = state.in_flight.drain(..).collect();
        for message in expired.into_iter().rev() {
            state.visible.push_front(message);
        }
    }
}

impl OrderQueue for InMemoryOrderQueue {
    fn send_message(&self, body: &str) -> Result<String, String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.next_id += 1;
        state.sent += 1;
        let message_id = format!("message-{}", state.next_id);
        state.visible.push_back(ReceivedMessage {
            message_id: message_id.clone(),
            receipt_handle: String::new(),
            body: body.to_string(),
        });
        Ok(message_id)
    }

    fn receive_message(
        &self,
        _visibility_timeout_secs: i32,
    ) -> Result<Option<ReceivedMessage>, String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.next_id += 1;
        let receipt_handle = format!("receipt-{}", state.next_id);
        let Some(mut message) = state.visible.pop_front() else {
            return Ok(None);
        };
        message.receipt_handle = receipt_handle;
        state.in_flight.push(message.clone());
        Ok(Some(message))
    }

    fn delete_message(&self, receipt_handle: &str) -> Result<(), String> {
        let mut state = self.state.lock().expect("poisoned mutex");
        let Some(position) = state
            .in_flight
            .iter()
            .position(|message| message.receipt_handle == receipt_handle)
        else {
            return Err(format!("unknown receipt handle: {receipt_handle}"));
        };
        state.in_flight.remove(position);
        state.deleted += 1;
        Ok(())
    }
}
