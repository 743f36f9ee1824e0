//! Vendor error codes of the NAS web API and their human messages.
//!
//! Codes below 400 are shared by every API. Codes from 400 upwards are
//! scoped: the same number means different things for the auth API and the
//! task API, so lookups always name the [`ApiScope`].

/// Which NAS API produced an error code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiScope {
    /// `SYNO.API.Auth`
    Auth,
    /// `SYNO.DownloadStation.Task`
    Task,
}

const COMMON: &[(i64, &str)] = &[
    (100, "unknown error"),
    (101, "invalid parameter"),
    (102, "the requested API does not exist"),
    (103, "the requested method does not exist"),
    (104, "the requested version does not support the functionality"),
    (105, "the logged in session does not have permission"),
    (106, "session timeout"),
    (107, "session interrupted by duplicate login"),
    (119, "session id not found"),
];

const AUTH: &[(i64, &str)] = &[
    (400, "no such account or incorrect password"),
    (401, "account disabled"),
    (402, "permission denied"),
    (403, "2-step verification code required"),
    (404, "failed to authenticate 2-step verification code"),
];

const TASK: &[(i64, &str)] = &[
    (400, "file upload failed"),
    (401, "max number of tasks reached"),
    (402, "destination denied"),
    (403, "destination does not exist"),
    (404, "invalid task id"),
    (405, "invalid task action"),
    (406, "no default destination"),
    (407, "set destination failed"),
    (408, "file does not exist"),
];

/// Codes after which the cached session must be dropped and renewed.
const SESSION_EXPIRY: &[i64] = &[106, 107, 119];

/// Static lookup of vendor error codes
pub struct ErrorCatalog;

impl ErrorCatalog {
    /// Look up the message for `code`, API-specific table first.
    pub fn lookup(scope: ApiScope, code: i64) -> Option<&'static str> {
        let scoped = match scope {
            ApiScope::Auth => AUTH,
            ApiScope::Task => TASK,
        };
        find(scoped, code).or_else(|| find(COMMON, code))
    }

    /// Message for `code`, falling back to `unknown error (code N)`.
    pub fn message(scope: ApiScope, code: i64) -> String {
        match Self::lookup(scope, code) {
            Some(msg) => msg.to_string(),
            None => format!("unknown error (code {code})"),
        }
    }

    /// Whether `code` reports an expired or interrupted session.
    pub fn is_session_expiry(code: i64) -> bool {
        SESSION_EXPIRY.contains(&code)
    }
}

fn find(table: &[(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, msg)| *msg)
}
