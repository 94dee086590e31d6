//! Form → validate → persist pipeline

use tracing::warn;

use super::ResultStatus;
use crate::form::{FormSource, PostForm};
use crate::store::StoreResult;

/// Builds a form from `params`, validates it, and runs `persist` only when
/// the form is valid.
///
/// # Errors
///
/// Only errors returned by `persist` propagate; validation failures come
/// back as `Ok(ResultStatus::Failure(form))`.
pub fn process_form<S, F>(params: &S, persist: F) -> StoreResult<ResultStatus>
where
    S: FormSource + ?Sized,
    F: FnOnce(&PostForm) -> StoreResult<()>,
{
    let mut form = PostForm::new(params);
    form.validate();

    if form.valid() {
        persist(&form)?;
        Ok(ResultStatus::Success)
    } else {
        warn!(errors = %form.errors(), "FORM_REJECTED");
        Ok(ResultStatus::Failure(form))
    }
}
