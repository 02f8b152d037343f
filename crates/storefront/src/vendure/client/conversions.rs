//! Resolution of mutation result unions.
//!
//! Shop API mutations return a union of the success type and a set of
//! `ErrorResult` members. Every error member carries `errorCode` and
//! `message`, so the presence of `errorCode` is enough to tell them apart.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::vendure::VendureError;

/// `Success` union member.
#[derive(Debug, Clone, Deserialize)]
pub struct Success {
    pub success: bool,
}

/// Turn a union payload into the success type or a [`VendureError::UserError`].
pub fn resolve_union<T: DeserializeOwned>(
    operation: &str,
    value: serde_json::Value,
) -> Result<T, VendureError> {
    if value.is_null() {
        return Err(VendureError::NotFound(format!("{operation} returned no result")));
    }

    if let Some(code) = value.get("errorCode").and_then(serde_json::Value::as_str) {
        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        tracing::debug!(operation, code, message = %message, "mutation returned ErrorResult");
        return Err(VendureError::UserError {
            code: code.to_string(),
            message,
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Resolve a `Success | ErrorResult` union to `()`.
pub fn resolve_success(operation: &str, value: serde_json::Value) -> Result<(), VendureError> {
    let Success { success } = resolve_union(operation, value)?;
    if success {
        Ok(())
    } else {
        Err(VendureError::UserError {
            code: "UNKNOWN_ERROR".to_string(),
            message: String::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::vendure::types::{CurrentUser, Order};

    #[test]
    fn test_error_member_becomes_user_error() {
        let value = json!({
            "__typename": "InsufficientStockError",
            "errorCode": "INSUFFICIENT_STOCK_ERROR",
            "message": "Only 2 items were added to the order due to insufficient stock"
        });
        let err = resolve_union::<Order>("addItemToOrder", value).unwrap_err();
        assert!(err.is_code("INSUFFICIENT_STOCK_ERROR"));
        assert_eq!(
            err.user_message("Failed to add to cart"),
            "Only 2 items were added to the order due to insufficient stock"
        );
    }

    #[test]
    fn test_success_member_deserializes() {
        let value = json!({"__typename": "CurrentUser", "id": "3", "identifier": "a@b.co"});
        let user: CurrentUser = resolve_union("login", value).unwrap();
        assert_eq!(user.identifier, "a@b.co");
    }

    #[test]
    fn test_null_result_is_not_found() {
        let err = resolve_success("requestPasswordReset", serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, VendureError::NotFound(_)));
    }

    #[test]
    fn test_success_false_is_an_error() {
        assert!(resolve_success("logout", json!({"success": true})).is_ok());
        assert!(resolve_success("logout", json!({"success": false})).is_err());
    }
}
