#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

//! Helpers shared by all crates

use error_stack::{Context, Report};

pub mod time;

pub trait ContextExt: Context + Sized {
    #[track_caller]
    fn report(self) -> Report<Self> {
        error_stack::report!(self)
    }
}

impl<E: Context + Sized> ContextExt for E {}

#[cfg(test)]
mod tests {
    use error_stack::{Result, ResultExt};

    use super::*;

    #[derive(thiserror::Error, Debug, PartialEq)]
    #[error("Invalid value")]
    struct InvalidValue;

    fn check_positive(value: i64) -> Result<i64, InvalidValue> {
        if value <= 0 {
            return Err(InvalidValue.report()).attach_printable(format!("value: {}", value));
        }
        Ok(value)
    }

    #[test]
    fn report_keeps_context_and_attachments() {
        let report = check_positive(-1).unwrap_err();
        assert_eq!(report.current_context(), &InvalidValue);
        assert!(format!("{:?}", report).contains("value: -1"));
        assert_eq!(check_positive(3).unwrap(), 3);
    }
}
