//! Collection of macros to digest rows coming back from a generic SQL database

/// Unpacks a vector of Column, and consumes it, parsing into individual variables, checking the
/// vector is big enough.
#[macro_export]
macro_rules! unpack_into {
    (let ($($var:ident),+) = $array:expr) => {
        let ($($var),+) = {
            let mut vec = $array.to_vec();
            vec.reverse();
            let required = 0 $(+ {let _ = stringify!($var); 1})+;
            let found = vec.len();
            (
                $(
                    vec.pop().ok_or_else(|| {
                        let _ = stringify!($var);
                        $crate::ConversionError::MissingColumn(required, found)
                    })?
                ),+
            )
        };
    };
}

/// Parses a SQL column as a string or NULL
#[macro_export]
macro_rules! column_as_nullable_string {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Text(text) => Ok(Some(text.to_owned())),
            $crate::stmt::Column::Blob(bytes) => {
                Ok(Some(String::from_utf8_lossy(&bytes).to_string()))
            }
            $crate::stmt::Column::Null => Ok(None),
            _ => Err($crate::ConversionError::InvalidType(
                "String".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}

/// Parses a SQL column as a string
#[macro_export]
macro_rules! column_as_string {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Text(text) => Ok(text.to_owned()),
            $crate::stmt::Column::Blob(bytes) => Ok(String::from_utf8_lossy(&bytes).to_string()),
            _ => Err($crate::ConversionError::InvalidType(
                "String".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}

/// Parses a column as a number or NULL
#[macro_export]
macro_rules! column_as_nullable_number {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Text(text) => Ok(Some(text.parse().map_err(|_| {
                $crate::ConversionError::InvalidConversion(
                    stringify!($col).to_owned(),
                    "Number".to_owned(),
                )
            })?)),
            $crate::stmt::Column::Integer(n) => Ok(Some(n.try_into().map_err(|_| {
                $crate::ConversionError::InvalidConversion(
                    stringify!($col).to_owned(),
                    "Number".to_owned(),
                )
            })?)),
            $crate::stmt::Column::Null => Ok(None),
            _ => Err($crate::ConversionError::InvalidType(
                "Number".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}

/// Parses a column as a number
#[macro_export]
macro_rules! column_as_number {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Text(text) => text.parse().map_err(|_| {
                $crate::ConversionError::InvalidConversion(
                    stringify!($col).to_owned(),
                    "Number".to_owned(),
                )
            }),
            $crate::stmt::Column::Integer(n) => n.try_into().map_err(|_| {
                $crate::ConversionError::InvalidConversion(
                    stringify!($col).to_owned(),
                    "Number".to_owned(),
                )
            }),
            _ => Err($crate::ConversionError::InvalidType(
                "Number".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}

/// Parses a column stored as 0/1 into a bool
#[macro_export]
macro_rules! column_as_bool {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Integer(n) => Ok(n != 0),
            $crate::stmt::Column::Text(text) => match text.as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                _ => Err($crate::ConversionError::InvalidConversion(
                    stringify!($col).to_owned(),
                    "Bool".to_owned(),
                )),
            },
            _ => Err($crate::ConversionError::InvalidType(
                "Bool".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}

/// Parses a NUMERIC column into a `Decimal`.
///
/// SQLite hands back integral prices as integers and fractional ones as reals.
#[macro_export]
macro_rules! column_as_decimal {
    ($col:expr) => {
        (match $col {
            $crate::stmt::Column::Integer(n) => Ok(rust_decimal::Decimal::from(n)),
            $crate::stmt::Column::Real(f) => {
                <rust_decimal::Decimal as std::str::FromStr>::from_str(&f.to_string())
                    .map_err($crate::ConversionError::from)
            }
            $crate::stmt::Column::Text(text) => {
                <rust_decimal::Decimal as std::str::FromStr>::from_str(text.trim())
                    .map_err($crate::ConversionError::from)
            }
            _ => Err($crate::ConversionError::InvalidType(
                "Decimal".to_owned(),
                stringify!($col).to_owned(),
            )),
        })?
    };
}
