// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use jsonrpsee::types::ErrorObject;
use safekart_core::Error;
use serde::{Deserialize, Serialize};

use crate::error_codes::JsonRpcErrorCode;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JsonRpcResponse<T: Serialize> {
    pub data: T,
}

pub type JsonRpcError = jsonrpsee::types::ErrorObjectOwned;
pub type JsonRpcResult<T> = Result<JsonRpcResponse<T>, JsonRpcError>;

impl<T: Serialize> JsonRpcResponse<T> {
    /// Helper method that returns a JsonRpcResponse with the given data.
    pub fn ok(data: T) -> Self {
        JsonRpcResponse { data }
    }
}

/// Builds the error object sent for a failed session operation.
///
/// Validation errors carry the offending field as error data so that a client
/// can highlight it.
pub fn session_error(err: Error) -> JsonRpcError {
    let code = JsonRpcErrorCode::from(&err) as i32;
    match &err {
        Error::Validation(validation) => {
            ErrorObject::owned(code, err.to_string(), Some(validation.clone()))
        }
        _ => ErrorObject::owned(code, err.to_string(), None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use safekart_model::{RequestField, ValidationError};

    use super::*;

    #[test]
    fn validation_errors_carry_the_field() {
        let err = session_error(Error::Validation(ValidationError::missing(
            RequestField::Mrp,
        )));
        assert_eq!(err.code(), JsonRpcErrorCode::Validation as i32);

        let data: ValidationError = serde_json::from_str(err.data().unwrap().get()).unwrap();
        assert_eq!(data.field, RequestField::Mrp);
    }

    #[test]
    fn other_errors_have_no_data() {
        let err = session_error(Error::EmptyInput);
        assert_eq!(err.code(), JsonRpcErrorCode::EmptyInput as i32);
        assert_eq!(err.message(), "input is empty");
        assert!(err.data().is_none());
    }
}
