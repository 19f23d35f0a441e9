//! Post handlers: detail, authoring, comments

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use core_kernel::GroupId;
use domain_blog::forms::{INVALID_CHOICE, INVALID_IMAGE};
use domain_blog::{CommentForm, EditAccess, EditOutcome, FormErrors, PostForm};

use crate::dto::post::{PostDetailResponse, PostFormResponse};
use crate::error::WebError;
use crate::extract::{parse_post_id, CurrentUser, MaybeUser};
use crate::media::detect_image;
use crate::redirect::{urls, Found};
use crate::AppState;

/// An image attached to the post form
struct Upload {
    content_type: Option<String>,
    bytes: Bytes,
}

/// The multipart post form as submitted
#[derive(Default)]
struct PostSubmission {
    text: String,
    group: Option<GroupId>,
    image: Option<Upload>,
    /// Errors found while decoding fields
    errors: FormErrors,
}

impl PostSubmission {
    async fn read(mut multipart: Multipart) -> Result<Self, WebError> {
        let mut submission = PostSubmission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => submission.text = field.text().await?,
                "group" => {
                    let raw = field.text().await?;
                    let raw = raw.trim();
                    if !raw.is_empty() {
                        match raw.parse::<GroupId>() {
                            Ok(id) => submission.group = Some(id),
                            Err(_) => submission.errors.add("group", INVALID_CHOICE),
                        }
                    }
                }
                "image" => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        submission.image = Some(Upload {
                            content_type,
                            bytes,
                        });
                    }
                }
                other => debug!(field = other, "Ignoring unknown form field"),
            }
        }

        if let Some(upload) = &submission.image {
            if detect_image(upload.content_type.as_deref(), &upload.bytes).is_err() {
                submission.errors.add("image", INVALID_IMAGE);
            }
        }

        Ok(submission)
    }

    /// Splits into the domain form and the upload, or reports every field error at once
    fn into_parts(self) -> Result<(PostForm, Option<Upload>), WebError> {
        let form = PostForm::new(self.text, self.group);
        if self.errors.is_empty() {
            return Ok((form, self.image));
        }

        let mut errors = self.errors;
        if let Err(text_errors) = form.clean() {
            errors.merge(text_errors);
        }
        Err(WebError::Form(errors))
    }
}

/// Stores the upload, if any, and returns its media path
async fn store_upload(state: &AppState, upload: Option<Upload>) -> Result<Option<String>, WebError> {
    match upload {
        Some(upload) => {
            let path = state
                .media
                .save_image(upload.content_type.as_deref(), &upload.bytes)
                .await?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// Removes a freshly stored upload when the write it belonged to failed
async fn discard_upload(state: &AppState, image: Option<String>) {
    if let Some(path) = image {
        state.media.remove(&path).await;
    }
}

pub async fn post_detail(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostDetailResponse>, WebError> {
    let id = parse_post_id(&post_id)?;
    let detail = state.service.post_detail(id).await?;
    let can_edit = viewer.is_some_and(|v| detail.entry.post.is_authored_by(v.id));
    Ok(Json(PostDetailResponse::new(detail, can_edit)))
}

/// The empty post form
pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
) -> Result<Json<PostFormResponse>, WebError> {
    let groups = state.service.group_choices().await?;
    Ok(Json(PostFormResponse::create(groups)))
}

/// Publishes a post and sends the author to their profile
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    multipart: Multipart,
) -> Result<Found, WebError> {
    let (form, upload) = PostSubmission::read(multipart).await?.into_parts()?;
    let image = store_upload(&state, upload).await?;

    match state.service.create_post(&actor, form, image.clone()).await {
        Ok(_) => Ok(Found::to(urls::profile(&actor.username))),
        Err(e) => {
            discard_upload(&state, image).await;
            Err(e.into())
        }
    }
}

/// The edit form, prefilled; non-authors are sent to the post
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_post_id(&post_id)?;
    match state.service.edit_access(&actor, id).await? {
        EditAccess::Granted(entry) => {
            let groups = state.service.group_choices().await?;
            Ok(Json(PostFormResponse::edit(groups, entry)).into_response())
        }
        EditAccess::NotAuthor => Ok(Found::to(urls::post_detail(id)).into_response()),
    }
}

/// Saves the edit form; without a new upload the current image stays
pub async fn edit_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(post_id): Path<String>,
    multipart: Multipart,
) -> Result<Found, WebError> {
    let id = parse_post_id(&post_id)?;
    let previous_image = match state.service.edit_access(&actor, id).await? {
        EditAccess::Granted(entry) => entry.post.image,
        EditAccess::NotAuthor => return Ok(Found::to(urls::post_detail(id))),
    };

    let (form, upload) = PostSubmission::read(multipart).await?.into_parts()?;
    let image = store_upload(&state, upload).await?;

    match state.service.edit_post(&actor, id, form, image.clone()).await {
        Ok(EditOutcome::Updated(_)) => {
            if image.is_some() {
                discard_upload(&state, previous_image).await;
            }
        }
        Ok(EditOutcome::NotAuthor) => discard_upload(&state, image).await,
        Err(e) => {
            discard_upload(&state, image).await;
            return Err(e.into());
        }
    }

    Ok(Found::to(urls::post_detail(id)))
}

/// Deletes the actor's post and returns to their profile
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Found, WebError> {
    let id = parse_post_id(&post_id)?;
    let image = match state.service.edit_access(&actor, id).await? {
        EditAccess::Granted(entry) => entry.post.image,
        EditAccess::NotAuthor => None,
    };

    if state.service.delete_post(&actor, id).await? {
        discard_upload(&state, image).await;
    } else {
        warn!(post_id = %id, user = %actor.username, "Delete refused for non-author");
    }

    Ok(Found::to(urls::profile(&actor.username)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub text: String,
}

/// Adds a comment; an invalid one is dropped and the user lands on the post anyway
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(post_id): Path<String>,
    Form(input): Form<CommentInput>,
) -> Result<Found, WebError> {
    let id = parse_post_id(&post_id)?;
    state
        .service
        .add_comment(&actor, id, CommentForm::new(input.text))
        .await?;
    Ok(Found::to(urls::post_detail(id)))
}
