//! Blog use cases
//!
//! Each use case takes the store explicitly. Mutations run the form
//! pipeline and report a [`ResultStatus`]; queries return posts directly.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::form::{FormSource, PostForm};
use crate::post::Post;
use crate::status::{process_form, ResultStatus};
use crate::store::{PostStore, StoreResult};

/// All posts, newest first. Posts created at the same instant keep the
/// store's order.
pub fn list_posts(store: &PostStore) -> Vec<Post> {
    let mut posts = store.all();
    posts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    posts
}

/// The post with `id`, or `None`.
pub fn get_post(id: &str, store: &PostStore) -> Option<Post> {
    store.find(id)
}

/// A blank form for a new post.
pub fn new_post_form() -> PostForm {
    PostForm::default()
}

/// Creates a post stamped with the current time.
pub fn create_post<S>(params: &S, store: &PostStore) -> StoreResult<ResultStatus>
where
    S: FormSource + ?Sized,
{
    create_post_at(params, store, Utc::now())
}

/// Creates a post stamped with `now`.
pub fn create_post_at<S>(
    params: &S,
    store: &PostStore,
    now: DateTime<Utc>,
) -> StoreResult<ResultStatus>
where
    S: FormSource + ?Sized,
{
    process_form(params, |form| {
        store.create(form.to_attributes(), now)?;
        Ok(())
    })
}

/// A form prefilled from the stored post, or `None` when `id` is absent.
pub fn edit_post_form(id: &str, store: &PostStore) -> Option<PostForm> {
    store.find(id).map(|post| PostForm::new(&post))
}

/// Overwrites the editable fields of post `id`. The creation time is
/// never touched.
///
/// # Errors
///
/// `BLOG_RECORD_NOT_FOUND` when the form is valid but no post has `id`.
pub fn update_post<S>(id: &str, params: &S, store: &PostStore) -> StoreResult<ResultStatus>
where
    S: FormSource + ?Sized,
{
    process_form(params, |form| {
        store.update(id, form.to_attributes().into())?;
        Ok(())
    })
}

/// Deletes post `id`. Succeeds whether or not it existed.
pub fn delete_post(id: &str, store: &PostStore) -> StoreResult<ResultStatus> {
    let removed = store.destroy(id)?;
    if !removed {
        info!(post_id = id, "POST_DELETE_NOOP");
    }
    Ok(ResultStatus::Success)
}
