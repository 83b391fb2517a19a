//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use dashboard::core::{
    InvoiceChanges, InvoiceId, InvoiceRecord, InvoiceStore, NewInvoice, Revalidator,
};
use std::sync::Mutex;

pub const USER_EMAIL: &str = "user@nextmail.com";
pub const USER_PASSWORD: &str = "123456";

pub fn fixed_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Store whose every call fails
pub struct FailingStore;

#[async_trait]
impl InvoiceStore for FailingStore {
    async fn insert(&self, _: NewInvoice) -> Result<InvoiceId> {
        Err(anyhow!("connection reset by peer"))
    }
    async fn update(&self, _: &InvoiceId, _: InvoiceChanges) -> Result<u64> {
        Err(anyhow!("connection reset by peer"))
    }
    async fn delete(&self, _: &InvoiceId) -> Result<u64> {
        Err(anyhow!("connection reset by peer"))
    }
    async fn get(&self, _: &InvoiceId) -> Result<Option<InvoiceRecord>> {
        Err(anyhow!("connection reset by peer"))
    }
    async fn list(&self) -> Result<Vec<InvoiceRecord>> {
        Err(anyhow!("connection reset by peer"))
    }
}

/// Revalidator that records every path it is asked to invalidate
#[derive(Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Revalidator for RecordingRevalidator {
    fn revalidate_path(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
