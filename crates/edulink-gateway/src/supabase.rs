//! Supabase implementation of [`AuthGateway`].
//!
//! Speaks the GoTrue auth endpoints and the PostgREST table endpoints of one project:
//!
//! - `POST /auth/v1/signup`
//! - `POST /auth/v1/token?grant_type=password`
//! - `POST /rest/v1/{table}` with `Prefer: return=representation`
//! - `GET /rest/v1/{table}?select=*&{column}=eq.{value}`
//!
//! Every request carries the project's `apikey`. The bearer token is the signed-in session's
//! access token, or the anon key when nobody is signed in.

use std::sync::{PoisonError, RwLock};

use edulink_config::GatewayConfig;
use edulink_models::{GatewayUser, Session, SignUpMetadata};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{AuthGateway, GatewayError, GatewayFuture, InsertedRecord, Row};

pub struct SupabaseGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    session: RwLock<Option<Session>>,
}

impl std::fmt::Debug for SupabaseGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SupabaseGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            session: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn bearer_token(&self) -> String {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn store_session(&self, session: Session) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    async fn post(
        &self,
        path: &str,
        body: &Value,
        prefer: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let url = self.config.endpoint(path);
        let mut request = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer_token())
            .json(body);

        if let Some(prefer) = prefer {
            request = request.header("Prefer", prefer);
        }

        self.send(&url, request).await
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, GatewayError> {
        let url = self.config.endpoint(path);
        let request = self
            .client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer_token())
            .query(query);

        self.send(&url, request).await
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Value, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!(%url, status = status.as_u16(), %message, "Gateway request rejected");
            return Err(GatewayError::api(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

impl AuthGateway for SupabaseGateway {
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        metadata: &'a SignUpMetadata,
    ) -> GatewayFuture<'a, GatewayUser> {
        Box::pin(async move {
            let body = json!({
                "email": email,
                "password": password,
                "data": metadata,
            });
            let response = self.post("auth/v1/signup", &body, None).await?;

            let (user, session) = parse_sign_up(response)?;
            if let Some(session) = session {
                debug!("Sign-up returned a session");
                self.store_session(session);
            }

            info!(user_id = %user.id, "Account created");
            Ok(user)
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> GatewayFuture<'a, Session> {
        Box::pin(async move {
            let body = json!({ "email": email, "password": password });
            let response = self
                .post("auth/v1/token?grant_type=password", &body, None)
                .await?;

            let session: Session = serde_json::from_value(response)
                .map_err(|e| GatewayError::Decode(e.to_string()))?;
            self.store_session(session.clone());

            info!(user_id = %session.user.id, "Signed in");
            Ok(session)
        })
    }

    fn get_session(&self) -> GatewayFuture<'_, Option<Session>> {
        Box::pin(async move {
            Ok(self
                .session
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone())
        })
    }

    fn insert<'a>(
        &'a self,
        table: &'a str,
        record: &'a Value,
    ) -> GatewayFuture<'a, InsertedRecord> {
        Box::pin(async move {
            let path = format!("rest/v1/{}", table);
            let response = self
                .post(&path, record, Some("return=representation"))
                .await?;

            let inserted = parse_inserted(table, response)?;
            debug!(table, id = %inserted.id, "Row inserted");
            Ok(inserted)
        })
    }

    fn select<'a>(
        &'a self,
        table: &'a str,
        filters: &'a [(&'a str, &'a str)],
    ) -> GatewayFuture<'a, Vec<Row>> {
        Box::pin(async move {
            let path = format!("rest/v1/{}", table);
            let response = self.get(&path, &select_query(filters)).await?;

            let rows = parse_rows(table, response)?;
            debug!(table, count = rows.len(), "Rows fetched");
            Ok(rows)
        })
    }
}

/// Pulls a readable message out of an error body. GoTrue uses `msg` or `error_description`,
/// PostgREST uses `message`.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|value| {
        ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });

    from_body
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

/// Sign-up answers with the bare user when email confirmation is on, and with a full session
/// when it is off.
fn parse_sign_up(response: Value) -> Result<(GatewayUser, Option<Session>), GatewayError> {
    if response.get("access_token").is_some() {
        let session: Session =
            serde_json::from_value(response).map_err(|e| GatewayError::Decode(e.to_string()))?;
        return Ok((session.user.clone(), Some(session)));
    }

    if response.get("id").is_some() {
        let user: GatewayUser =
            serde_json::from_value(response).map_err(|e| GatewayError::Decode(e.to_string()))?;
        return Ok((user, None));
    }

    Err(GatewayError::MissingUser)
}

/// PostgREST returns the inserted rows as an array.
fn parse_inserted(table: &str, response: Value) -> Result<InsertedRecord, GatewayError> {
    let record = match response {
        Value::Array(rows) => rows.into_iter().next(),
        object @ Value::Object(_) => Some(object),
        _ => None,
    }
    .ok_or_else(|| GatewayError::EmptyInsert(table.to_string()))?;

    let id = match record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(GatewayError::EmptyInsert(table.to_string())),
    };

    Ok(InsertedRecord { id, record })
}

/// PostgREST query string: every column, filtered by equality.
fn select_query(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];
    query.extend(
        filters
            .iter()
            .map(|(column, value)| (column.to_string(), format!("eq.{}", value))),
    );
    query
}

fn parse_rows(table: &str, response: Value) -> Result<Vec<Row>, GatewayError> {
    match response {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(GatewayError::Decode(format!(
            "expected rows from {}, got {}",
            table, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_body_fields() {
        assert_eq!(
            error_message(
                StatusCode::BAD_REQUEST,
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(
            error_message(
                StatusCode::CONFLICT,
                r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#
            ),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"msg":""}"#),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_parse_sign_up_user_only() {
        let (user, session) = parse_sign_up(json!({
            "id": "u1",
            "email": "ada@example.com",
            "user_metadata": { "role": "student", "first_name": "Ada" }
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role(), Some(edulink_models::Role::Student));
        assert!(session.is_none());
    }

    #[test]
    fn test_parse_sign_up_with_session() {
        let (user, session) = parse_sign_up(json!({
            "access_token": "token",
            "refresh_token": "refresh",
            "user": { "id": "u2", "email": "grace@cedar.edu" }
        }))
        .unwrap();

        assert_eq!(user.id, "u2");
        assert_eq!(session.unwrap().access_token, "token");
    }

    #[test]
    fn test_parse_sign_up_without_user() {
        assert!(matches!(
            parse_sign_up(json!({})),
            Err(GatewayError::MissingUser)
        ));
    }

    #[test]
    fn test_parse_inserted() {
        let inserted = parse_inserted(
            "schools",
            json!([{ "id": "s1", "name": "Cedar Academy" }]),
        )
        .unwrap();
        assert_eq!(inserted.id, "s1");
        assert_eq!(inserted.record["name"], "Cedar Academy");

        let numeric = parse_inserted("school_admins", json!([{ "id": 7 }])).unwrap();
        assert_eq!(numeric.id, "7");

        assert!(matches!(
            parse_inserted("schools", json!([])),
            Err(GatewayError::EmptyInsert(table)) if table == "schools"
        ));
    }

    #[test]
    fn test_select_query_filters_by_equality() {
        assert_eq!(
            select_query(&[("id", "42")]),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.42".to_string()),
            ]
        );
        assert_eq!(select_query(&[]).len(), 1);
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows("students", json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        assert_eq!(rows.len(), 2);

        assert!(parse_rows("students", Value::Null).unwrap().is_empty());
        assert!(matches!(
            parse_rows("students", json!({ "id": 1 })),
            Err(GatewayError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_new_gateway_has_no_session() {
        let gateway = SupabaseGateway::new(GatewayConfig::default()).unwrap();
        assert!(gateway.get_session().await.unwrap().is_none());
        assert_eq!(gateway.bearer_token(), "");
    }
}
