//! In-process gateway used by tests.
//!
//! Keeps accounts, rows and the current session in memory, records every call, and can be told
//! to fail specific operations.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use edulink_models::{GatewayUser, Session, SignUpMetadata};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    AuthGateway, GatewayError, GatewayFuture, INVALID_CREDENTIALS, InsertedRecord, Row,
};

const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    SignUp { email: String },
    SignIn { email: String },
    GetSession,
    Insert { table: String },
    Select { table: String },
}

#[derive(Debug)]
struct Account {
    password: String,
    user: GatewayUser,
    confirmed: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    rows: HashMap<String, Vec<Value>>,
    session: Option<Session>,
    calls: Vec<GatewayCall>,
    sign_up_failure: Option<String>,
    sign_in_failure: Option<String>,
    failing_tables: HashSet<String>,
    failing_reads: HashSet<String>,
    requires_confirmation: bool,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates an account directly, without recording a call.
    pub fn seed_account(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> GatewayUser {
        let user = new_user(email, metadata);
        self.state().accounts.insert(
            email.to_ascii_lowercase(),
            Account {
                password: password.to_string(),
                user: user.clone(),
                confirmed: true,
            },
        );
        user
    }

    /// Stores rows directly, without recording a call.
    pub fn seed_rows(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        self.state()
            .rows
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// New accounts start unconfirmed: sign-up returns no session and sign-in is refused until
    /// [`MemoryGateway::confirm_email`] is called.
    pub fn require_email_confirmation(&self) {
        self.state().requires_confirmation = true;
    }

    pub fn confirm_email(&self, email: &str) {
        if let Some(account) = self.state().accounts.get_mut(&email.to_ascii_lowercase()) {
            account.confirmed = true;
        }
    }

    /// The next sign-up fails with `message`.
    pub fn fail_next_sign_up(&self, message: &str) {
        self.state().sign_up_failure = Some(message.to_string());
    }

    /// The next sign-in fails with `message`.
    pub fn fail_next_sign_in(&self, message: &str) {
        self.state().sign_in_failure = Some(message.to_string());
    }

    /// Inserts into `table` fail until [`MemoryGateway::allow_inserts_into`] is called.
    pub fn fail_inserts_into(&self, table: &str) {
        self.state().failing_tables.insert(table.to_string());
    }

    pub fn allow_inserts_into(&self, table: &str) {
        self.state().failing_tables.remove(table);
    }

    /// Selects from `table` fail until [`MemoryGateway::allow_reads_from`] is called.
    pub fn fail_reads_from(&self, table: &str) {
        self.state().failing_reads.insert(table.to_string());
    }

    pub fn allow_reads_from(&self, table: &str) {
        self.state().failing_reads.remove(table);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn sign_up_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::SignUp { .. }))
            .count()
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state().rows.get(table).cloned().unwrap_or_default()
    }

    pub fn account(&self, email: &str) -> Option<GatewayUser> {
        self.state()
            .accounts
            .get(&email.to_ascii_lowercase())
            .map(|account| account.user.clone())
    }

    pub fn sign_out(&self) {
        self.state().session = None;
    }
}

fn new_user(email: &str, metadata: &SignUpMetadata) -> GatewayUser {
    GatewayUser {
        id: Uuid::new_v4().to_string(),
        email: Some(email.to_string()),
        user_metadata: metadata
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect(),
    }
}

fn new_session(user: &GatewayUser) -> Session {
    Session {
        access_token: Uuid::new_v4().to_string(),
        refresh_token: Some(Uuid::new_v4().to_string()),
        user: user.clone(),
    }
}

impl AuthGateway for MemoryGateway {
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        metadata: &'a SignUpMetadata,
    ) -> GatewayFuture<'a, GatewayUser> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(GatewayCall::SignUp {
                email: email.to_string(),
            });

            if let Some(message) = state.sign_up_failure.take() {
                return Err(GatewayError::api(500, message));
            }

            let key = email.to_ascii_lowercase();
            if state.accounts.contains_key(&key) {
                return Err(GatewayError::api(422, "User already registered"));
            }

            let user = new_user(email, metadata);
            let confirmed = !state.requires_confirmation;
            state.accounts.insert(
                key,
                Account {
                    password: password.to_string(),
                    user: user.clone(),
                    confirmed,
                },
            );
            if confirmed {
                state.session = Some(new_session(&user));
            }
            Ok(user)
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> GatewayFuture<'a, Session> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(GatewayCall::SignIn {
                email: email.to_string(),
            });

            if let Some(message) = state.sign_in_failure.take() {
                return Err(GatewayError::api(503, message));
            }

            let user = match state.accounts.get(&email.to_ascii_lowercase()) {
                Some(account) if account.password == password && !account.confirmed => {
                    return Err(GatewayError::api(400, EMAIL_NOT_CONFIRMED));
                }
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(GatewayError::api(400, INVALID_CREDENTIALS)),
            };

            let session = new_session(&user);
            state.session = Some(session.clone());
            Ok(session)
        })
    }

    fn get_session(&self) -> GatewayFuture<'_, Option<Session>> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(GatewayCall::GetSession);
            Ok(state.session.clone())
        })
    }

    fn insert<'a>(
        &'a self,
        table: &'a str,
        record: &'a Value,
    ) -> GatewayFuture<'a, InsertedRecord> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(GatewayCall::Insert {
                table: table.to_string(),
            });

            if state.failing_tables.contains(table) {
                return Err(GatewayError::api(
                    403,
                    format!("new row violates row-level security policy for table \"{}\"", table),
                ));
            }

            let id = Uuid::new_v4().to_string();
            let mut stored = record.clone();
            if let Value::Object(fields) = &mut stored {
                fields.insert("id".to_string(), Value::String(id.clone()));
            }

            state
                .rows
                .entry(table.to_string())
                .or_default()
                .push(stored.clone());

            Ok(InsertedRecord { id, record: stored })
        })
    }

    fn select<'a>(
        &'a self,
        table: &'a str,
        filters: &'a [(&'a str, &'a str)],
    ) -> GatewayFuture<'a, Vec<Row>> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(GatewayCall::Select {
                table: table.to_string(),
            });

            if state.failing_reads.contains(table) {
                return Err(GatewayError::api(
                    500,
                    format!("relation \"{}\" could not be read", table),
                ));
            }

            Ok(state
                .rows
                .get(table)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| matches_filters(row, filters))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }
}

fn matches_filters(row: &Value, filters: &[(&str, &str)]) -> bool {
    filters.iter().all(|(column, expected)| match row.get(*column) {
        Some(Value::String(value)) => value == expected,
        Some(Value::Number(value)) => value.to_string() == *expected,
        Some(Value::Bool(value)) => value.to_string() == *expected,
        _ => false,
    })
}
