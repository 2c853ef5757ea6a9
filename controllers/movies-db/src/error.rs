// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::ErrorKind;
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Sort a diesel failure into the store error kinds reported to clients.
pub fn store_error(err: DieselError) -> ErrorKind {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            ErrorKind::StoreConnectivity(info.message().to_owned())
        }

        // Undefined tables or columns, constraint violations
        DieselError::DatabaseError(_, info) => ErrorKind::StoreSchema(info.message().to_owned()),

        DieselError::DeserializationError(e) | DieselError::SerializationError(e) => {
            ErrorKind::StoreSchema(e.to_string())
        }

        other => ErrorKind::StoreConnectivity(other.to_string()),
    }
}

pub fn pool_error(err: PoolError) -> ErrorKind {
    ErrorKind::StoreConnectivity(err.to_string())
}
