pub mod leader;
pub mod user;
pub mod voter;

use crate::error::Error;

/// Logs a store failure before handing it back to the caller.
pub(crate) fn reported<T>(res: Result<T, Error>) -> Result<T, Error> {
    res.map_err(|e| {
        log::error!("{}", e);
        e
    })
}
