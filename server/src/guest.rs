//! Search quota for visitors without a session.
//!
//! The counter lives in a signed cookie, `<count>.<issued_at>.<hmac>`, where
//! the HMAC-SHA256 covers `<count>.<issued_at>`. The window is fixed: it
//! starts when the cookie is first issued and is not extended by later
//! searches. A missing, tampered or expired cookie starts a fresh window.
//!
//! Clearing the cookie resets the quota. The signature only stops a client
//! from writing itself a lower count.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::cookies::{build_cookie, get_cookie};

type HmacSha256 = Hmac<Sha256>;

pub const GUEST_COOKIE: &str = "guest_search_count";

/// Searches a guest may run per window.
pub const GUEST_SEARCH_LIMIT: u32 = 3;

/// Window length in seconds.
pub const GUEST_WINDOW_SECS: i64 = 24 * 60 * 60;

pub const GUEST_LIMIT_MESSAGE: &str =
    "Guest search limit reached. Please Sign in or Sign up to continue.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuestCookieError {
    #[error("Malformed guest cookie")]
    Malformed,

    #[error("Guest cookie signature mismatch")]
    BadSignature,

    #[error("Guest cookie expired")]
    Expired,

    #[error("Unusable cookie signing key")]
    InvalidKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCounter {
    pub count: u32,
    /// Unix seconds at which the window opened.
    pub issued_at: i64,
}

fn mac(secret: &[u8], payload: &str) -> Result<HmacSha256, GuestCookieError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| GuestCookieError::InvalidKey)?;
    mac.update(payload.as_bytes());
    Ok(mac)
}

impl GuestCounter {
    pub fn fresh(now: i64) -> Self {
        Self {
            count: 0,
            issued_at: now,
        }
    }

    fn payload(&self) -> String {
        format!("{}.{}", self.count, self.issued_at)
    }

    pub fn encode(&self, secret: &[u8]) -> Result<String, GuestCookieError> {
        let payload = self.payload();
        let signature = hex::encode(mac(secret, &payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn decode(value: &str, secret: &[u8], now: i64) -> Result<Self, GuestCookieError> {
        let mut parts = value.splitn(3, '.');
        let (Some(count), Some(issued_at), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(GuestCookieError::Malformed);
        };

        let counter = Self {
            count: count.parse().map_err(|_| GuestCookieError::Malformed)?,
            issued_at: issued_at.parse().map_err(|_| GuestCookieError::Malformed)?,
        };
        let signature = hex::decode(signature).map_err(|_| GuestCookieError::Malformed)?;

        mac(secret, &counter.payload())?
            .verify_slice(&signature)
            .map_err(|_| GuestCookieError::BadSignature)?;

        if now - counter.issued_at >= GUEST_WINDOW_SECS {
            return Err(GuestCookieError::Expired);
        }

        Ok(counter)
    }

    /// The counter carried by the request, or a fresh one.
    pub fn from_headers(headers: &HeaderMap, secret: &[u8], now: i64) -> Self {
        let Some(value) = get_cookie(headers, GUEST_COOKIE) else {
            return Self::fresh(now);
        };

        match Self::decode(value, secret, now) {
            Ok(counter) => counter,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding guest cookie");
                Self::fresh(now)
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= GUEST_SEARCH_LIMIT
    }

    pub fn record_search(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Seconds until the window closes, at least one.
    pub fn remaining_secs(&self, now: i64) -> i64 {
        (self.issued_at + GUEST_WINDOW_SECS - now).clamp(1, GUEST_WINDOW_SECS)
    }

    /// `Set-Cookie` value carrying this counter until the window closes.
    pub fn set_cookie(
        &self,
        secret: &[u8],
        secure: bool,
        now: i64,
    ) -> Result<String, GuestCookieError> {
        Ok(build_cookie(
            GUEST_COOKIE,
            &self.encode(secret)?,
            self.remaining_secs(now),
            secure,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const NOW: i64 = 1_750_000_000;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{GUEST_COOKIE}={value}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_encoded_counter_decodes() {
        let counter = GuestCounter {
            count: 2,
            issued_at: NOW - 60,
        };
        let value = counter.encode(SECRET).unwrap();
        assert_eq!(GuestCounter::decode(&value, SECRET, NOW), Ok(counter));
    }

    #[test]
    fn test_lowered_count_is_rejected() {
        let counter = GuestCounter {
            count: 3,
            issued_at: NOW,
        };
        let value = counter.encode(SECRET).unwrap();
        let forged = value.replacen("3.", "0.", 1);
        assert_eq!(
            GuestCounter::decode(&forged, SECRET, NOW),
            Err(GuestCookieError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let value = GuestCounter::fresh(NOW).encode(SECRET).unwrap();
        assert_eq!(
            GuestCounter::decode(&value, b"another-secret-another-secret-xx", NOW),
            Err(GuestCookieError::BadSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        for value in ["", "3", "3.abc.00", "x.1.00", "1.2.zz"] {
            assert_eq!(
                GuestCounter::decode(value, SECRET, NOW),
                Err(GuestCookieError::Malformed),
                "value {value:?}"
            );
        }
    }

    #[test]
    fn test_window_is_fixed_from_issue() {
        let counter = GuestCounter {
            count: 3,
            issued_at: NOW - GUEST_WINDOW_SECS,
        };
        let value = counter.encode(SECRET).unwrap();
        assert_eq!(
            GuestCounter::decode(&value, SECRET, NOW),
            Err(GuestCookieError::Expired)
        );
        assert!(GuestCounter::decode(&value, SECRET, NOW - 1).is_ok());
    }

    #[test]
    fn test_from_headers_falls_back_to_fresh() {
        assert_eq!(
            GuestCounter::from_headers(&HeaderMap::new(), SECRET, NOW),
            GuestCounter::fresh(NOW)
        );
        assert_eq!(
            GuestCounter::from_headers(&headers_with("9.1.dead"), SECRET, NOW),
            GuestCounter::fresh(NOW)
        );

        let counter = GuestCounter {
            count: 1,
            issued_at: NOW - 10,
        };
        let headers = headers_with(&counter.encode(SECRET).unwrap());
        assert_eq!(GuestCounter::from_headers(&headers, SECRET, NOW), counter);
    }

    #[test]
    fn test_limit_reached_after_three_searches() {
        let mut counter = GuestCounter::fresh(NOW);
        for _ in 0..GUEST_SEARCH_LIMIT {
            assert!(!counter.is_exhausted());
            counter.record_search();
        }
        assert!(counter.is_exhausted());
    }

    #[test]
    fn test_cookie_max_age_is_time_left_in_window() {
        let counter = GuestCounter {
            count: 1,
            issued_at: NOW - 3600,
        };
        let cookie = counter.set_cookie(SECRET, false, NOW).unwrap();
        assert!(cookie.starts_with(&format!("{GUEST_COOKIE}=1.{}.", NOW - 3600)));
        assert!(cookie.contains(&format!("Max-Age={}", GUEST_WINDOW_SECS - 3600)));
        assert!(cookie.contains("HttpOnly"));
    }
}
