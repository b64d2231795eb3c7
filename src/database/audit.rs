use super::Database;
use crate::core::Result;
use crate::http::Request;
use crate::query::PlaceholderValue;
use serde_json::json;
use tracing::debug;

const LOG_FACILITY: i64 = 17;
const LOG_TYPE_SESSION: i64 = 21;
const LOG_TYPE_CONNECT: i64 = 11;
const SEVERITY_NOTICE: i64 = 4;
const SEVERITY_INFORMATION: i64 = 5;

const LOG_USER_SQL: &str = "insert into v_log_users_self_insert \
    (log_title, log_type, log_type_sub, log_severity, log_facility, request_client, response_code, log_details) \
    values ($1, $2, $3, $4, $5, ($6::inet, $7, $8), $9, $10::json)";

const LOG_ACTIVITY_SQL: &str = "insert into v_log_user_activity_self_insert \
    (request_path, request_arguments, request_client, request_headers, response_headers, response_code) \
    values ($1, $2, ($3::inet, $4, $5), $6::json, $7::json, $8)";

/// Событие входа и выхода пользователя
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogType {
    Connect { expires: Option<i64> },
    Disconnect,
    Create,
    Failure { user_name: String },
}

impl LogType {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "Logging in to the system.",
            Self::Disconnect => "Logging out of the system.",
            Self::Create => "Created the user account.",
            Self::Failure { .. } => "Failed to login as the user ':user'.",
        }
    }

    #[must_use]
    pub const fn severity(&self) -> i64 {
        match self {
            Self::Failure { .. } => SEVERITY_NOTICE,
            _ => SEVERITY_INFORMATION,
        }
    }

    fn details(&self) -> PlaceholderValue {
        match self {
            Self::Connect { expires } => json!({ "expires": expires }).to_string().into(),
            Self::Failure { user_name } => json!({ "user_name": user_name }).to_string().into(),
            Self::Disconnect | Self::Create => PlaceholderValue::Null,
        }
    }
}

fn client_binds(request: &Request) -> [PlaceholderValue; 3] {
    let (address, port) = request
        .client()
        .map_or(("0.0.0.0".to_string(), 0), |client| (client.ip().to_string(), i64::from(client.port())));
    [address.into(), port.into(), request.user_agent().into()]
}

/// Запись в `v_log_users_self_insert`
pub async fn log_user(
    database: &mut dyn Database,
    request: &Request,
    kind: &LogType,
    response_code: u16,
) -> Result<()> {
    let [address, port, agent] = client_binds(request);
    let binds = vec![
        kind.title().into(),
        LOG_TYPE_SESSION.into(),
        LOG_TYPE_CONNECT.into(),
        kind.severity().into(),
        LOG_FACILITY.into(),
        address,
        port,
        agent,
        i64::from(response_code).into(),
        kind.details(),
    ];

    database.query(LOG_USER_SQL, binds).await?;
    debug!(title = kind.title(), code = response_code, "user event logged");
    Ok(())
}

/// Запись в `v_log_user_activity_self_insert` после того, как ответ определён
pub async fn log_user_activity(
    database: &mut dyn Database,
    request: &Request,
    response_headers: &serde_json::Value,
    response_code: u16,
) -> Result<()> {
    let [address, port, agent] = client_binds(request);
    let binds = vec![
        request.path().into(),
        request.query().unwrap_or_default().into(),
        address,
        port,
        agent,
        request.headers_json().to_string().into(),
        response_headers.to_string().into(),
        i64::from(response_code).into(),
    ];

    database.query(LOG_ACTIVITY_SQL, binds).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_type_severity() {
        assert_eq!(LogType::Connect { expires: None }.severity(), 5);
        assert_eq!(LogType::Disconnect.severity(), 5);
        assert_eq!(LogType::Failure { user_name: "x".into() }.severity(), 4);
    }

    #[test]
    fn test_log_type_details() {
        let connect = LogType::Connect { expires: Some(1_700_000_000) };
        assert_eq!(connect.details(), PlaceholderValue::Text("{\"expires\":1700000000}".into()));
        let failure = LogType::Failure { user_name: "jdoe".into() };
        assert_eq!(failure.details(), PlaceholderValue::Text("{\"user_name\":\"jdoe\"}".into()));
        assert_eq!(LogType::Create.details(), PlaceholderValue::Null);
    }
}
