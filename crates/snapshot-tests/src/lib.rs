use flexarr::{Error, FlexArray};
use std::fmt::Debug;

/// Renders an operation result the way it appears in snapshots: the array's
/// `Debug` form on success, the error's `Debug` form on failure.
pub fn render<T: Debug>(result: Result<FlexArray<T>, Error>) -> String {
    match result {
        Ok(arr) => format!("{arr:?}"),
        Err(err) => format!("{err:?}"),
    }
}

/// `[10, 20, 30, 40, 50]` with bounds `1 ..= 5`.
pub fn five() -> FlexArray<i32> {
    match FlexArray::from_vec(1, vec![10, 20, 30, 40, 50]) {
        Ok(arr) => arr,
        Err(err) => panic!("{err:?}"),
    }
}
