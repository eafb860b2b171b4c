use std::sync::Arc;

use crate::{
    AppointmentId, CredentialStore, UserInfo,
    envelope::{self, PayloadError},
    requests, responses,
};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub const LOGIN_PATH: &str = "auth/login";
pub const LOGOUT_PATH: &str = "auth/logout";
pub const REFRESH_PATH: &str = "auth/refresh";

/// An API client for interfacing with the clinic backend.
///
/// Requests carry `Authorization: Bearer <access token>` whenever one is
/// stored. A `401` triggers exactly one refresh; if that works the request is
/// retried once, otherwise the stored credentials are cleared and the call
/// fails with [`ClientError::SessionExpired`].
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub credentials: Arc<dyn CredentialStore>,
}

/// A request description that can be sent more than once.
#[derive(Debug, Clone)]
struct Call {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    /// Auth endpoints answer 401 for bad credentials, which must not be
    /// mistaken for an expired session.
    refreshable: bool,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            refreshable: true,
        }
    }

    fn query(mut self, params: &impl Serialize) -> Result<Self, ClientError> {
        self.query = query_pairs(params).map_err(ClientError::Serialization)?;
        Ok(self)
    }

    fn json(mut self, body: &impl Serialize) -> Result<Self, ClientError> {
        self.body = Some(
            serde_json::to_value(body).map_err(ClientError::Serialization)?,
        );
        Ok(self)
    }

    fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(
        address: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            credentials,
        }
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    fn build(&self, call: &Call) -> reqwest::RequestBuilder {
        let mut request = self
            .inner_client
            .request(call.method.clone(), self.format_url(&call.path));
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        if let Some(token) = self.credentials.access_token() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(&self, call: Call) -> Result<reqwest::Response, ClientError> {
        let response = self.build(&call).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED || !call.refreshable
        {
            return Ok(response);
        }

        tracing::debug!(path = %call.path, "access token rejected, refreshing");
        match self.refresh().await {
            Ok(()) => Ok(self.build(&call).send().await?),
            Err(e) => {
                tracing::warn!(path = %call.path, "session refresh failed: {e}");
                self.credentials.clear();
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, ClientError> {
        let call = Call::new(Method::GET, path).query(params)?;
        ok_payload(self.send(call).await?).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let call = Call::new(Method::POST, path).json(body)?;
        ok_payload(self.send(call).await?).await
    }

    async fn empty_put<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let call = Call::new(Method::PUT, path);
        ok_payload(self.send(call).await?).await
    }

    async fn delete(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<(), ClientError> {
        let call = Call::new(Method::DELETE, path).query(params)?;
        ok_empty(self.send(call).await?).await
    }
}

/// Methods on the backend API
impl APIClient {
    /// Sign in, storing the issued tokens and user id.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<UserInfo, ClientError> {
        let call = Call::new(Method::POST, LOGIN_PATH)
            .json(details)?
            .without_refresh();
        let response: responses::LoginResponse =
            ok_payload(self.send(call).await?).await?;
        self.credentials.save(
            &crate::TokenPair {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            },
            response.user.id,
        );
        Ok(response.user)
    }

    /// Sign out. Local credentials are cleared even if the backend call
    /// fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let call = Call::new(Method::POST, LOGOUT_PATH).without_refresh();
        let result = match self.send(call).await {
            Ok(response) => ok_empty(response).await,
            Err(e) => Err(e),
        };
        self.credentials.clear();
        result
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let refresh_token = self
            .credentials
            .refresh_token()
            .ok_or(ClientError::SessionExpired)?;
        let call = Call::new(Method::POST, REFRESH_PATH)
            .json(&requests::RefreshToken { refresh_token })?
            .without_refresh();
        // Sent directly: a 401 here means the refresh token itself is dead.
        let tokens: responses::RefreshResponse =
            ok_payload(self.build(&call).send().await?).await?;
        self.credentials.update_tokens(
            &tokens.access_token,
            tokens.refresh_token.as_deref(),
        );
        Ok(())
    }

    /// Get the profile and permissions of the signed-in user.
    pub async fn current_user(&self) -> Result<UserInfo, ClientError> {
        self.get("auth/me", &()).await
    }

    /// Pick up the session left by a previous visit, if it is still valid.
    /// `Ok(None)` means there is nobody to sign back in.
    pub async fn resume_session(&self) -> Result<Option<UserInfo>, ClientError> {
        if !self.credentials.has_session() {
            return Ok(None);
        }
        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::SessionExpired) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn list_services(
        &self,
    ) -> Result<Vec<responses::Service>, ClientError> {
        self.get("services", &()).await
    }

    pub async fn list_vaccines(
        &self,
    ) -> Result<Vec<responses::Vaccine>, ClientError> {
        self.get("vaccines", &()).await
    }

    pub async fn list_appointments(
        &self,
        filter: &requests::AppointmentFilter,
    ) -> Result<Vec<responses::Appointment>, ClientError> {
        self.get("appointments", filter).await
    }

    pub async fn register_appointment(
        &self,
        details: &requests::RegisterAppointment,
    ) -> Result<responses::Appointment, ClientError> {
        self.post("appointments", details).await
    }

    /// Approve a pending appointment (staff only).
    pub async fn approve_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<responses::Appointment, ClientError> {
        self.empty_put(&format!("appointments/{appointment_id}/approve"))
            .await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<(), ClientError> {
        self.delete(&format!("appointments/{appointment_id}"), &())
            .await
    }

    pub async fn list_vaccination_plans(
        &self,
        filter: &requests::PlanFilter,
    ) -> Result<Vec<responses::VaccinationPlan>, ClientError> {
        self.get("vaccination-plans", filter).await
    }

    /// Record an administered dose against a vaccination plan.
    pub async fn record_dose(
        &self,
        details: &requests::RecordDose,
    ) -> Result<responses::VaccinationPlan, ClientError> {
        self.post("vaccination-plans/doses", details).await
    }

    pub async fn list_vaccine_lots(
        &self,
    ) -> Result<Vec<responses::VaccineLot>, ClientError> {
        self.get("vaccine-lots", &()).await
    }

    /// Create an import, export or disposal slip.
    pub async fn create_inventory_slip(
        &self,
        details: &requests::CreateInventorySlip,
    ) -> Result<responses::InventorySlip, ClientError> {
        self.post("inventory-slips", details).await
    }

    pub async fn statistics_overview(
        &self,
        range: &requests::StatisticsRange,
    ) -> Result<responses::StatisticsOverview, ClientError> {
        self.get("statistics/overview", range).await
    }

    pub async fn create_payment(
        &self,
        details: &requests::CreatePayment,
    ) -> Result<responses::Payment, ClientError> {
        self.post("payments", details).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the server's message.
    #[error("{1}")]
    APIError(StatusCode, String),
    /// A successful response whose body reported a failure.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),
    #[error("Could not encode request: {0}")]
    Serialization(serde_json::Error),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Unwrap the `payload` of a successful response into the desired type, or
/// return an appropriate error.
pub async fn ok_payload<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let text = response.text().await?;
    let body: Value = serde_json::from_str(&text)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
    let payload = match envelope::classify(body)? {
        Value::Object(mut map) => map.remove("payload"),
        _ => None,
    }
    .ok_or_else(|| {
        ClientError::MalformedResponse("missing payload".to_string())
    })?;
    serde_json::from_value(payload)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// Check that a response without a meaningful body is OK, returning a
/// ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let text = response.text().await?;
    if let Ok(body) = serde_json::from_str::<Value>(&text) {
        envelope::classify(body)?;
    }
    Ok(())
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return ClientError::Network(e),
    };
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| envelope::body_message(&body))
        .or_else(|| (!text.trim().is_empty()).then(|| text.clone()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with {status}"))
        });
    ClientError::APIError(status, message)
}

/// Serialize request parameters as query-string pairs. `null` values are
/// left out; sequences repeat their key.
pub fn query_pairs(
    params: &impl Serialize,
) -> Result<Vec<(String, String)>, serde_json::Error> {
    let Value::Object(map) = serde_json::to_value(params)? else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = query_value(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = query_value(other) {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn query_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::AppointmentStatus;

    fn sorted(mut pairs: Vec<(String, String)>) -> Vec<(String, String)> {
        pairs.sort();
        pairs
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn query_pairs_skip_nulls() {
        let filter = requests::AppointmentFilter {
            status: Some(AppointmentStatus::Pending),
            from: Some("2025-03-01".parse().unwrap()),
            ..Default::default()
        };
        let pairs = query_pairs(&filter).unwrap();
        assert_eq!(
            sorted(pairs),
            vec![pair("from", "2025-03-01"), pair("status", "PENDING")]
        );
    }

    #[test]
    fn query_pairs_of_unit_are_empty() {
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn query_pairs_repeat_sequences_and_stringify_scalars() {
        #[derive(Serialize)]
        struct Params {
            ids: Vec<Option<u32>>,
            page: u32,
            active: bool,
        }
        let pairs = query_pairs(&Params {
            ids: vec![Some(1), None, Some(3)],
            page: 2,
            active: true,
        })
        .unwrap();
        assert_eq!(
            sorted(pairs),
            vec![
                pair("active", "true"),
                pair("ids", "1"),
                pair("ids", "3"),
                pair("page", "2"),
            ]
        );
    }

    #[test]
    fn session_expired_has_fixed_message() {
        assert_eq!(
            ClientError::SessionExpired.to_string(),
            "Your session has expired. Please sign in again."
        );
    }
}
