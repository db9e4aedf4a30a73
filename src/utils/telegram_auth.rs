use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::OffsetDateTime;
use tracing::warn;

use crate::structs::telegram::TelegramUser;
use crate::utils::app_error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Validate a Telegram WebApp init data blob and return the profile it
/// carries.
///
/// The blob is a query string whose `hash` field is
/// `HMAC_SHA256(key = HMAC_SHA256("WebAppData", bot_token), msg = data_check_string)`
/// where `data_check_string` is every other `key=value` pair (values
/// percent-decoded), sorted and joined by `\n`. Payloads whose `auth_date`
/// is older than `max_age` seconds are rejected.
pub fn validate_init_data(
    init_data: &str,
    bot_token: &str,
    max_age: i64,
) -> Result<TelegramUser, AppError> {
    let mut received_hash = None;
    let mut pairs = Vec::new();

    for part in init_data.split('&') {
        let Some((key, value)) = part.split_once('=') else {
            warn!("Init data field without a value: `{part}`");
            return Err(AppError::auth_malformed());
        };
        let value = urlencoding::decode(value)
            .map_err(|e| {
                warn!("Init data field `{key}` is not valid UTF-8: {e}");
                AppError::auth_malformed()
            })?
            .into_owned();
        if key == "hash" {
            received_hash = Some(value);
        } else {
            pairs.push((key.to_string(), value));
        }
    }

    let Some(received_hash) = received_hash else {
        warn!("Init data without a hash field");
        return Err(AppError::auth_malformed());
    };

    pairs.sort();
    let data_check_string = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret = HmacSha256::new_from_slice(b"WebAppData")
        .map_err(|_| AppError::internal_server_error())?;
    secret.update(bot_token.as_bytes());
    let secret = secret.finalize().into_bytes();

    let mut mac =
        HmacSha256::new_from_slice(&secret).map_err(|_| AppError::internal_server_error())?;
    mac.update(data_check_string.as_bytes());

    let received_hash = hex::decode(&received_hash).map_err(|e| {
        warn!("Init data hash is not hex: {e}");
        AppError::auth_invalid()
    })?;
    mac.verify_slice(&received_hash).map_err(|_| {
        warn!("Init data signature mismatch");
        AppError::auth_invalid()
    })?;

    let auth_date = field(&pairs, "auth_date")?;
    let auth_date: i64 = auth_date.parse().map_err(|e| {
        warn!("Invalid auth_date `{auth_date}`: {e}");
        AppError::auth_malformed()
    })?;
    if OffsetDateTime::now_utc().unix_timestamp() - auth_date > max_age {
        warn!("Stale init data, auth_date: {auth_date}");
        return Err(AppError::auth_invalid());
    }

    let user = field(&pairs, "user")?;
    serde_json::from_str(user).map_err(|e| {
        warn!("Cannot deserialize init data user field: {e}");
        AppError::auth_malformed()
    })
}

fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Result<&'a str, AppError> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| {
            warn!("Init data without a {key} field");
            AppError::auth_malformed()
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BOT_TOKEN: &str = "123456:ABC-testtoken";
    const USER_JSON: &str = r#"{"id":99,"first_name":"Alice","username":"alice"}"#;

    fn sign(fields: &[(&str, &str)]) -> String {
        let mut check_pairs: Vec<String> = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        check_pairs.sort();
        let data_check_string = check_pairs.join("\n");

        let mut secret = HmacSha256::new_from_slice(b"WebAppData").unwrap();
        secret.update(BOT_TOKEN.as_bytes());
        let secret = secret.finalize().into_bytes();
        let mut mac = HmacSha256::new_from_slice(&secret).unwrap();
        mac.update(data_check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn init_data(auth_date: i64) -> String {
        let auth_date = auth_date.to_string();
        let hash = sign(&[
            ("auth_date", &auth_date),
            ("query_id", "AAEtest"),
            ("user", USER_JSON),
        ]);
        format!(
            "auth_date={auth_date}&query_id=AAEtest&user={}&hash={hash}",
            urlencoding::encode(USER_JSON)
        )
    }

    #[test]
    fn valid_payload_is_accepted() {
        let data = init_data(OffsetDateTime::now_utc().unix_timestamp());
        let user = validate_init_data(&data, BOT_TOKEN, 86400).unwrap();
        assert_eq!(user.id, 99);
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.last_name, None);
    }

    #[test]
    fn tampered_hash_is_rejected() {
        let data = init_data(OffsetDateTime::now_utc().unix_timestamp());
        let last = if data.ends_with('0') { '1' } else { '0' };
        let mut tampered = data[..data.len() - 1].to_string();
        tampered.push(last);
        let error = validate_init_data(&tampered, BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_invalid());
    }

    #[test]
    fn tampered_field_is_rejected() {
        let data = init_data(OffsetDateTime::now_utc().unix_timestamp());
        let tampered = data.replace("query_id=AAEtest", "query_id=AAEother");
        let error = validate_init_data(&tampered, BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_invalid());
    }

    #[test]
    fn wrong_bot_token_is_rejected() {
        let data = init_data(OffsetDateTime::now_utc().unix_timestamp());
        let error = validate_init_data(&data, "other:token", 86400).unwrap_err();
        assert_eq!(error, AppError::auth_invalid());
    }

    #[test]
    fn stale_auth_date_is_rejected() {
        let data = init_data(OffsetDateTime::now_utc().unix_timestamp() - 172800);
        let error = validate_init_data(&data, BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_invalid());
    }

    #[test]
    fn missing_hash_is_malformed() {
        let error = validate_init_data("auth_date=1&user=%7B%7D", BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_malformed());
    }

    #[test]
    fn missing_user_is_malformed() {
        let auth_date = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let hash = sign(&[("auth_date", &auth_date)]);
        let data = format!("auth_date={auth_date}&hash={hash}");
        let error = validate_init_data(&data, BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_malformed());
    }

    #[test]
    fn user_without_required_fields_is_malformed() {
        let auth_date = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let user = r#"{"id":99}"#;
        let hash = sign(&[("auth_date", &auth_date), ("user", user)]);
        let data = format!(
            "auth_date={auth_date}&user={}&hash={hash}",
            urlencoding::encode(user)
        );
        let error = validate_init_data(&data, BOT_TOKEN, 86400).unwrap_err();
        assert_eq!(error, AppError::auth_malformed());
    }
}
